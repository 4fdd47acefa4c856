//! 会话存储与导航订阅测试

use std::sync::Arc;
use std::time::Duration;
use workspace_access::{
    config::NavigationConfig,
    error::AppError,
    models::{
        route::{AuthenticatedRoute, Redirect, RouteDecision, UnauthenticatedRoute},
        session::{AuthCapabilities, AuthSessionState},
    },
    realtime::{LocationStore, NavigationWatcher, SessionStore},
    services::{workspace_service::NoopInvalidator, Navigator, WorkspaceScopeTracker},
};

mod common;
use common::{test_actor, RecordingInvalidator};

fn watcher_with(
    sessions: &SessionStore,
    start: &str,
) -> (NavigationWatcher<RecordingInvalidator>, Arc<LocationStore>, RecordingInvalidator) {
    let locations = Arc::new(LocationStore::new(start));
    let invalidator = RecordingInvalidator::default();
    let watcher = NavigationWatcher::new(
        Navigator::new(NavigationConfig::default()),
        sessions,
        locations.clone(),
        WorkspaceScopeTracker::new(invalidator.clone()),
    );
    (watcher, locations, invalidator)
}

// ==================== 会话生命周期 ====================

#[test]
fn test_session_initializes_once() {
    let sessions = SessionStore::new();
    assert!(!sessions.snapshot().initialized);

    sessions
        .initialize(None, AuthCapabilities::with_login())
        .unwrap();
    assert!(sessions.snapshot().initialized);

    let second = sessions.initialize(None, AuthCapabilities::with_login());
    assert!(matches!(second, Err(AppError::SessionAlreadyInitialized)));
}

#[test]
fn test_mutations_before_initialize_fail() {
    let sessions = SessionStore::new();
    assert!(matches!(
        sessions.login(test_actor(vec![])),
        Err(AppError::SessionNotInitialized)
    ));
    assert!(matches!(sessions.logout(), Err(AppError::SessionNotInitialized)));
    assert_eq!(sessions.snapshot(), AuthSessionState::uninitialized());
}

#[test]
fn test_login_logout_teardown() {
    let sessions = SessionStore::new();
    sessions
        .initialize(None, AuthCapabilities::with_login())
        .unwrap();

    sessions.login(test_actor(vec![])).unwrap();
    let state = sessions.snapshot();
    assert!(state.is_authenticated());
    assert!(!state.logged_out);

    sessions.require_password_reset().unwrap();
    sessions.logout().unwrap();
    let state = sessions.snapshot();
    assert!(!state.is_authenticated());
    assert!(state.logged_out);
    assert!(!state.requires_password_reset);
}

#[test]
fn test_password_reset_flag_cleared() {
    let sessions = SessionStore::new();
    sessions
        .initialize(None, AuthCapabilities::with_login())
        .unwrap();

    sessions.require_password_reset().unwrap();
    assert!(sessions.snapshot().requires_password_reset);
    sessions.complete_password_reset().unwrap();
    assert!(!sessions.snapshot().requires_password_reset);
}

// ==================== 导航订阅 ====================

#[test]
fn test_watcher_tracks_session_changes() {
    let sessions = SessionStore::new();
    let (mut watcher, _locations, _) = watcher_with(&sessions, "/connections");

    assert_eq!(watcher.current(), RouteDecision::Loading);

    sessions
        .initialize(None, AuthCapabilities::with_login())
        .unwrap();
    assert_eq!(
        watcher.current().flow(),
        workspace_access::models::route::NavigationFlow::Unauthenticated
    );

    sessions.login(test_actor(vec![])).unwrap();
    assert_eq!(
        watcher.current(),
        RouteDecision::Authenticated(AuthenticatedRoute::DefaultView)
    );
}

#[tokio::test]
async fn test_next_decision_wakes_on_location_change() {
    let sessions = SessionStore::new();
    sessions
        .initialize(None, AuthCapabilities::with_login())
        .unwrap();
    let (mut watcher, locations, _) = watcher_with(&sessions, "/login");
    assert_eq!(
        watcher.current(),
        RouteDecision::Unauthenticated(UnauthenticatedRoute::Login)
    );

    locations.navigate("/signup");
    let decision = tokio::time::timeout(Duration::from_secs(1), watcher.next_decision())
        .await
        .expect("watcher did not wake")
        .unwrap();
    assert_eq!(
        decision,
        RouteDecision::Unauthenticated(UnauthenticatedRoute::Signup)
    );
}

#[tokio::test]
async fn test_next_decision_wakes_on_session_change() {
    let sessions = SessionStore::new();
    let (mut watcher, _locations, _) = watcher_with(&sessions, "/login");
    assert_eq!(watcher.current(), RouteDecision::Loading);

    sessions
        .initialize(None, AuthCapabilities::with_login())
        .unwrap();
    let decision = tokio::time::timeout(Duration::from_secs(1), watcher.next_decision())
        .await
        .expect("watcher did not wake")
        .unwrap();
    assert_eq!(
        decision,
        RouteDecision::Unauthenticated(UnauthenticatedRoute::Login)
    );
}

#[test]
fn test_settle_follows_login_detour_and_return() {
    let sessions = SessionStore::new();
    sessions
        .initialize(None, AuthCapabilities::with_login())
        .unwrap();
    let (mut watcher, locations, _) = watcher_with(&sessions, "/workspaces/ws-1/connections");

    // 未登录：跳转到带返回路径的登录页
    assert_eq!(
        watcher.settle(),
        RouteDecision::Unauthenticated(UnauthenticatedRoute::Login)
    );
    assert_eq!(
        locations.current().to_string(),
        "/login?from=%2Fworkspaces%2Fws-1%2Fconnections"
    );

    // 登录后回到原始路径
    sessions.login(test_actor(vec![])).unwrap();
    let decision = watcher.settle();
    assert_eq!(decision.prefetch_workspace(), Some("ws-1"));
    assert_eq!(locations.current().path(), "/workspaces/ws-1/connections");
}

#[test]
fn test_settle_respects_hop_limit() {
    let sessions = SessionStore::new();
    // 无登录能力：/login 重定向到自身
    sessions.initialize(None, AuthCapabilities::default()).unwrap();
    let locations = Arc::new(LocationStore::new("/login"));
    let mut watcher = NavigationWatcher::new(
        Navigator::new(NavigationConfig {
            max_redirect_hops: 2,
            ..NavigationConfig::default()
        }),
        &sessions,
        locations.clone(),
        WorkspaceScopeTracker::new(NoopInvalidator),
    );

    let decision = watcher.settle();
    assert_eq!(
        decision,
        RouteDecision::Unauthenticated(UnauthenticatedRoute::Redirect(Redirect::push("/login")))
    );
    // 返回路径不嵌套
    assert_eq!(locations.current().to_string(), "/login");
}

// ==================== 工作区缓存失效 ====================

#[test]
fn test_workspace_switch_invalidates_scope() {
    let sessions = SessionStore::new();
    sessions
        .initialize(Some(test_actor(vec![])), AuthCapabilities::with_login())
        .unwrap();
    let (mut watcher, locations, invalidator) =
        watcher_with(&sessions, "/workspaces/ws-1/connections");

    watcher.current();
    locations.navigate("/workspaces/ws-1/source");
    watcher.current();
    locations.navigate("/workspaces/ws-2/source");
    watcher.current();
    locations.navigate("/workspaces");
    watcher.current();
    locations.navigate("/workspaces/ws-2/billing");
    watcher.current();

    assert_eq!(invalidator.calls(), vec!["ws-1", "ws-2", "ws-2"]);
}

#[test]
fn test_tracker_ignores_repeated_workspace() {
    let invalidator = RecordingInvalidator::default();
    let tracker = WorkspaceScopeTracker::new(invalidator.clone());

    assert!(tracker.observe(Some("ws-1")));
    assert!(!tracker.observe(Some("ws-1")));
    assert!(!tracker.observe(None));
    assert!(tracker.observe(Some("ws-1")));
    assert_eq!(invalidator.calls(), vec!["ws-1", "ws-1"]);
}
