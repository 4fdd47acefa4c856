//! Route models
//!
//! Locations requested by the browser and the route decisions the navigator
//! derives from them.

use serde::Serialize;
use std::fmt;
use url::form_urlencoded;

/// Well-known paths
pub mod paths {
    pub const LOGIN: &str = "/login";
    pub const SIGNUP: &str = "/signup";
    pub const RESET_PASSWORD: &str = "/reset-password";
    /// Email verification / password reset callbacks
    pub const FIREBASE_ACTION: &str = "/verify-email";
    pub const AUTH_FLOW: &str = "/auth_flow";
    pub const SPEAKEASY_REDIRECT: &str = "/speakeasy-redirect";
    pub const WORKSPACES: &str = "/workspaces";

    pub const CONNECTIONS: &str = "connections";
    pub const SETTINGS: &str = "settings";
    pub const SOURCE: &str = "source";
    pub const DESTINATION: &str = "destination";
    pub const BILLING: &str = "billing";
    pub const UPCOMING_FEATURES: &str = "upcoming-features";
    pub const CONNECTOR_BUILDER: &str = "connector-builder";
}

/// Requested location: path plus query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    path: String,
    query: Vec<(String, String)>,
}

impl Location {
    /// Parses `/path?key=value&...`. Query pairs are form-urlencoded and
    /// decoded here; the path is kept as given. A fragment is ignored and an
    /// empty path becomes `/`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.split('#').next().unwrap_or_default();
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));

        let path = if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        let query = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        Self { path, query }
    }

    /// `path` with a single encoded query parameter
    pub fn with_param(path: &str, name: &str, value: &str) -> Self {
        Self {
            path: path.to_string(),
            query: vec![(name.to_string(), value.to_string())],
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// First decoded value of query parameter `name`; empty values count as absent.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    /// Non-empty path segments
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

impl From<&str> for Location {
    fn from(raw: &str) -> Self {
        Location::parse(raw)
    }
}

/// Top-level view tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationFlow {
    Loading,
    Unauthenticated,
    PasswordReset,
    Authenticated,
    FirebaseAction,
}

impl NavigationFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationFlow::Loading => "loading",
            NavigationFlow::Unauthenticated => "unauthenticated",
            NavigationFlow::PasswordReset => "password_reset",
            NavigationFlow::Authenticated => "authenticated",
            NavigationFlow::FirebaseAction => "firebase_action",
        }
    }
}

impl fmt::Display for NavigationFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation to another location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: String,
    /// Replace the current history entry instead of pushing
    pub replace: bool,
}

impl Redirect {
    pub fn push(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            replace: false,
        }
    }

    pub fn replace(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            replace: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthenticatedRoute {
    Login,
    Signup,
    Redirect(Redirect),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticatedRoute {
    /// Back to a captured return path
    Redirect(Redirect),
    DefaultView,
    SpeakeasyRedirect,
    WorkspaceList,
    CompleteOauth,
    Workspace(WorkspaceRoute),
}

/// Route inside a workspace. Rendering waits for the workspace data prefetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceRoute {
    pub workspace_id: String,
    pub view: WorkspaceView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    Source,
    Destination,
}

impl ConnectorKind {
    pub fn segment(&self) -> &'static str {
        match self {
            ConnectorKind::Source => paths::SOURCE,
            ConnectorKind::Destination => paths::DESTINATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorTab {
    Settings,
    Connections,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorPage {
    List,
    /// Connector type picker
    Select,
    Create {
        definition_id: String,
    },
    Item {
        connector_id: String,
        tab: ConnectorTab,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceView {
    Connector {
        kind: ConnectorKind,
        page: ConnectorPage,
    },
    /// `rest` is the remainder below the section, handled by nested routers
    Connections {
        rest: String,
    },
    Settings {
        rest: String,
    },
    Billing,
    UpcomingFeatures,
    ConnectorBuilder {
        rest: String,
    },
    Redirect(Redirect),
}

/// Outcome of one navigation evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "flow", content = "route", rename_all = "snake_case")]
pub enum RouteDecision {
    /// Session bootstrap still running
    Loading,
    FirebaseAction,
    Unauthenticated(UnauthenticatedRoute),
    PasswordReset,
    Authenticated(AuthenticatedRoute),
}

impl RouteDecision {
    pub fn flow(&self) -> NavigationFlow {
        match self {
            RouteDecision::Loading => NavigationFlow::Loading,
            RouteDecision::FirebaseAction => NavigationFlow::FirebaseAction,
            RouteDecision::Unauthenticated(_) => NavigationFlow::Unauthenticated,
            RouteDecision::PasswordReset => NavigationFlow::PasswordReset,
            RouteDecision::Authenticated(_) => NavigationFlow::Authenticated,
        }
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            RouteDecision::Unauthenticated(UnauthenticatedRoute::Redirect(r))
            | RouteDecision::Authenticated(AuthenticatedRoute::Redirect(r))
            | RouteDecision::Authenticated(AuthenticatedRoute::Workspace(WorkspaceRoute {
                view: WorkspaceView::Redirect(r),
                ..
            })) => Some(r),
            _ => None,
        }
    }

    /// Workspace whose data must be prefetched before this route renders
    pub fn prefetch_workspace(&self) -> Option<&str> {
        match self {
            RouteDecision::Authenticated(AuthenticatedRoute::Workspace(route)) => {
                Some(&route.workspace_id)
            }
            _ => None,
        }
    }
}
