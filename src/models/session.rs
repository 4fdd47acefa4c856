//! Auth session models

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::role::PermissionGrant;

/// Sign-in provider linked to the actor's account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProvider {
    Password,
    Google,
    Github,
    Sso,
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthProvider::Password => write!(f, "password"),
            AuthProvider::Google => write!(f, "google"),
            AuthProvider::Github => write!(f, "github"),
            AuthProvider::Sso => write!(f, "sso"),
        }
    }
}

/// Authenticated principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub email: String,
    #[serde(default)]
    pub grants: Vec<PermissionGrant>,
}

impl Actor {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            email: email.into(),
            grants: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_grant(mut self, grant: PermissionGrant) -> Self {
        self.grants.push(grant);
        self
    }
}

/// What the auth backend can do for this session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCapabilities {
    /// Whether an interactive login form is available
    pub login_available: bool,
    pub providers: Vec<AuthProvider>,
}

impl AuthCapabilities {
    pub fn with_login() -> Self {
        Self {
            login_available: true,
            providers: vec![AuthProvider::Password],
        }
    }
}

/// Auth session state
///
/// Read-only input to navigation and permission evaluation. Owned and mutated
/// by [`crate::realtime::SessionStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthSessionState {
    pub initialized: bool,
    pub actor: Option<Actor>,
    pub requires_password_reset: bool,
    /// Set by an explicit logout, not by never having logged in
    pub logged_out: bool,
    pub providers: Vec<AuthProvider>,
    pub login_available: bool,
}

impl AuthSessionState {
    /// State before session bootstrap has finished
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Initialized state for `actor` with the given capabilities
    pub fn initialized(actor: Option<Actor>, capabilities: AuthCapabilities) -> Self {
        Self {
            initialized: true,
            actor,
            requires_password_reset: false,
            logged_out: false,
            providers: capabilities.providers,
            login_available: capabilities.login_available,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.actor.is_some()
    }
}
