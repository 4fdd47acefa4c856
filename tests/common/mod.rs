//! 测试公共模块
//! 提供测试辅助函数和测试工具

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use workspace_access::{
    config::NavigationConfig,
    models::{
        role::PermissionGrant,
        route::{Location, RouteDecision},
        session::{Actor, AuthCapabilities, AuthSessionState},
    },
    services::{Navigator, WorkspaceScopeInvalidator},
};

/// 创建测试导航器（默认配置）
pub fn navigator() -> Navigator {
    Navigator::new(NavigationConfig::default())
}

/// 已初始化、未登录、可登录
pub fn anonymous_session() -> AuthSessionState {
    AuthSessionState::initialized(None, AuthCapabilities::with_login())
}

/// 已初始化、已登录
pub fn signed_in_session() -> AuthSessionState {
    AuthSessionState::initialized(Some(test_actor(vec![])), AuthCapabilities::with_login())
}

/// 主动登出后的会话
pub fn logged_out_session() -> AuthSessionState {
    AuthSessionState {
        logged_out: true,
        ..anonymous_session()
    }
}

pub fn test_actor(grants: Vec<PermissionGrant>) -> Actor {
    grants
        .into_iter()
        .fold(Actor::new("test@example.com"), Actor::with_grant)
}

pub fn decide(session: &AuthSessionState, location: &str) -> RouteDecision {
    navigator().decide(session, &Location::parse(location))
}

/// 记录失效调用的测试失效器
#[derive(Clone, Default)]
pub struct RecordingInvalidator {
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingInvalidator {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl WorkspaceScopeInvalidator for RecordingInvalidator {
    fn invalidate_workspace_scope(&self, workspace_id: &str) {
        self.calls.lock().unwrap().push(workspace_id.to_string());
    }
}
