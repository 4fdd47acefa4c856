//! 导航状态机
//!
//! 根据会话状态与请求位置选择顶层视图树。`decide` 为纯函数：
//! 相同输入总是得到相同的路由决策，调用方在任一输入变化时重新求值。

use crate::{
    config::NavigationConfig,
    models::{
        route::{
            paths, AuthenticatedRoute, ConnectorKind, ConnectorPage, ConnectorTab, Location,
            Redirect, RouteDecision, UnauthenticatedRoute, WorkspaceRoute, WorkspaceView,
        },
        session::AuthSessionState,
    },
};

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    config: NavigationConfig,
}

impl Navigator {
    pub fn new(config: NavigationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// 计算路由决策
    pub fn decide(&self, session: &AuthSessionState, location: &Location) -> RouteDecision {
        let decision = self.evaluate(session, location);

        metrics::counter!("navigation_decisions_total", "flow" => decision.flow().as_str())
            .increment(1);
        tracing::debug!(
            path = %location.path(),
            flow = %decision.flow(),
            authenticated = session.is_authenticated(),
            "Navigation decided"
        );

        decision
    }

    fn evaluate(&self, session: &AuthSessionState, location: &Location) -> RouteDecision {
        if !session.initialized {
            return RouteDecision::Loading;
        }

        // 邮件验证回调在登录前后都必须可达，先于认证状态判断
        if is_exact(location, paths::FIREBASE_ACTION) {
            return RouteDecision::FirebaseAction;
        }

        match session.actor {
            None => self.unauthenticated(session, location),
            Some(_) => RouteDecision::Authenticated(self.authenticated(location)),
        }
    }

    fn unauthenticated(&self, session: &AuthSessionState, location: &Location) -> RouteDecision {
        if session.login_available && is_exact(location, paths::LOGIN) {
            return RouteDecision::Unauthenticated(UnauthenticatedRoute::Login);
        }
        if is_exact(location, paths::SIGNUP) {
            return RouteDecision::Unauthenticated(UnauthenticatedRoute::Signup);
        }
        if session.requires_password_reset && is_exact(location, paths::RESET_PASSWORD) {
            return RouteDecision::PasswordReset;
        }

        RouteDecision::Unauthenticated(UnauthenticatedRoute::Redirect(
            self.login_redirect(session, location),
        ))
    }

    /// 未登录访问其他路径时跳转到登录页，并携带原始路径
    pub fn login_redirect(&self, session: &AuthSessionState, location: &Location) -> Redirect {
        let path = location.path();
        let intentional_logout =
            session.logged_out && path.contains(self.config.account_settings_path.as_str());

        // 登录页自身不可用时不再嵌套 from=/login
        if intentional_logout || is_exact(location, paths::LOGIN) {
            return Redirect::push(paths::LOGIN);
        }

        let target = Location::with_param(paths::LOGIN, &self.config.return_param, path);
        Redirect::push(target.to_string())
    }

    fn authenticated(&self, location: &Location) -> AuthenticatedRoute {
        let segments = location.segments();

        match segments.as_slice() {
            [first, ..]
                if seg_eq(first, paths::LOGIN)
                    || seg_eq(first, paths::SIGNUP)
                    || seg_eq(first, paths::FIREBASE_ACTION) =>
            {
                self.return_or_default(location)
            }
            [only] if seg_eq(only, paths::SPEAKEASY_REDIRECT) => AuthenticatedRoute::SpeakeasyRedirect,
            [only] if seg_eq(only, paths::WORKSPACES) => AuthenticatedRoute::WorkspaceList,
            [only] if seg_eq(only, paths::AUTH_FLOW) => AuthenticatedRoute::CompleteOauth,
            [first, workspace_id, rest @ ..] if seg_eq(first, paths::WORKSPACES) => {
                AuthenticatedRoute::Workspace(WorkspaceRoute {
                    workspace_id: workspace_id.to_string(),
                    view: workspace_view(workspace_id, rest),
                })
            }
            _ => AuthenticatedRoute::DefaultView,
        }
    }

    /// 已登录访问登录 / 注册页：回到记录的原始路径，否则进入默认视图
    fn return_or_default(&self, location: &Location) -> AuthenticatedRoute {
        match location.param(&self.config.return_param) {
            Some(from) if is_local_path(from) => AuthenticatedRoute::Redirect(Redirect::replace(from)),
            Some(from) => {
                tracing::warn!(from = %from, "Ignoring non-local return path");
                AuthenticatedRoute::DefaultView
            }
            None => AuthenticatedRoute::DefaultView,
        }
    }
}

fn workspace_view(workspace_id: &str, rest: &[&str]) -> WorkspaceView {
    match rest {
        [section, tail @ ..] if seg_eq(section, paths::DESTINATION) => WorkspaceView::Connector {
            kind: ConnectorKind::Destination,
            page: connector_page(ConnectorKind::Destination, tail),
        },
        [section, tail @ ..] if seg_eq(section, paths::SOURCE) => WorkspaceView::Connector {
            kind: ConnectorKind::Source,
            page: connector_page(ConnectorKind::Source, tail),
        },
        [section, tail @ ..] if seg_eq(section, paths::CONNECTIONS) => WorkspaceView::Connections {
            rest: tail.join("/"),
        },
        [section, tail @ ..] if seg_eq(section, paths::SETTINGS) => WorkspaceView::Settings {
            rest: tail.join("/"),
        },
        [section] if seg_eq(section, paths::BILLING) => WorkspaceView::Billing,
        [section] if seg_eq(section, paths::UPCOMING_FEATURES) => WorkspaceView::UpcomingFeatures,
        [section, tail @ ..] if seg_eq(section, paths::CONNECTOR_BUILDER) => {
            WorkspaceView::ConnectorBuilder {
                rest: tail.join("/"),
            }
        }
        _ => WorkspaceView::Redirect(Redirect::replace(format!(
            "{}/{}/{}",
            paths::WORKSPACES,
            workspace_id,
            paths::CONNECTIONS
        ))),
    }
}

fn connector_page(kind: ConnectorKind, tail: &[&str]) -> ConnectorPage {
    let new_segment = format!("new-{}", kind.segment());

    match tail {
        [] => ConnectorPage::List,
        [first] if seg_eq(first, &new_segment) => ConnectorPage::Select,
        [first, definition_id] if seg_eq(first, &new_segment) => ConnectorPage::Create {
            definition_id: definition_id.to_string(),
        },
        [connector_id, tab, ..] if seg_eq(tab, paths::CONNECTIONS) => ConnectorPage::Item {
            connector_id: connector_id.to_string(),
            tab: ConnectorTab::Connections,
        },
        [connector_id, ..] => ConnectorPage::Item {
            connector_id: connector_id.to_string(),
            tab: ConnectorTab::Settings,
        },
    }
}

/// 路径段比较（忽略大小写与前导 `/`）
fn seg_eq(segment: &str, literal: &str) -> bool {
    segment.eq_ignore_ascii_case(literal.trim_start_matches('/'))
}

/// 位置是否恰好为单段路径 `literal`（忽略尾部 `/`）
fn is_exact(location: &Location, literal: &str) -> bool {
    matches!(location.segments().as_slice(), [only] if seg_eq(only, literal))
}

/// 同源路径：以 `/` 开头，且第二个字符不是 `/` 或 `\`（浏览器会把 `/\` 视为 `//`）
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}
