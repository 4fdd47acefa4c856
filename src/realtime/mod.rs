//! 会话状态与导航订阅
//!
//! `SessionStore` 持有进程级会话状态（只初始化一次，登出时清理），
//! `LocationStore` 持有当前请求位置。`NavigationWatcher` 订阅两者，
//! 任一变化时重新计算路由决策。

use std::sync::Arc;
use tokio::sync::watch;

use crate::{
    error::{AppError, Result},
    models::{
        route::{Location, RouteDecision},
        session::{Actor, AuthCapabilities, AuthSessionState},
    },
    services::{
        navigation_service::Navigator,
        workspace_service::{WorkspaceScopeInvalidator, WorkspaceScopeTracker},
    },
};

/// 进程级会话状态
pub struct SessionStore {
    state: watch::Sender<AuthSessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(AuthSessionState::uninitialized());
        Self { state }
    }

    /// 会话引导完成；每个会话只能调用一次
    pub fn initialize(&self, actor: Option<Actor>, capabilities: AuthCapabilities) -> Result<()> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| {
            if state.initialized {
                result = Err(AppError::SessionAlreadyInitialized);
                return false;
            }
            *state = AuthSessionState::initialized(actor, capabilities);
            true
        });

        if result.is_ok() {
            tracing::info!(authenticated = self.snapshot().is_authenticated(), "Session initialized");
        }
        result
    }

    /// 用户登录
    pub fn login(&self, actor: Actor) -> Result<()> {
        let user_id = actor.user_id;
        self.update(|state| {
            state.actor = Some(actor);
            state.logged_out = false;
        })?;
        tracing::info!(user_id = %user_id, "Actor logged in");
        Ok(())
    }

    /// 用户登出：清理主体并标记为主动登出
    pub fn logout(&self) -> Result<()> {
        self.update(|state| {
            state.actor = None;
            state.logged_out = true;
            state.requires_password_reset = false;
        })?;
        tracing::info!("Actor logged out");
        Ok(())
    }

    pub fn require_password_reset(&self) -> Result<()> {
        self.update(|state| state.requires_password_reset = true)
    }

    pub fn complete_password_reset(&self) -> Result<()> {
        self.update(|state| state.requires_password_reset = false)
    }

    pub fn snapshot(&self) -> AuthSessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSessionState> {
        self.state.subscribe()
    }

    /// 仅在状态实际变化时通知订阅者
    fn update(&self, f: impl FnOnce(&mut AuthSessionState)) -> Result<()> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| {
            if !state.initialized {
                result = Err(AppError::SessionNotInitialized);
                return false;
            }
            let before = state.clone();
            f(state);
            *state != before
        });
        result
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前请求位置
pub struct LocationStore {
    location: watch::Sender<Location>,
}

impl LocationStore {
    pub fn new(initial: impl Into<Location>) -> Self {
        let (location, _) = watch::channel(initial.into());
        Self { location }
    }

    pub fn navigate(&self, raw: &str) {
        let location = Location::parse(raw);
        tracing::debug!(location = %location, "Navigate");
        self.location.send_replace(location);
    }

    pub fn current(&self) -> Location {
        self.location.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.location.subscribe()
    }
}

/// 导航订阅者
pub struct NavigationWatcher<I> {
    navigator: Navigator,
    session: watch::Receiver<AuthSessionState>,
    location: watch::Receiver<Location>,
    locations: Arc<LocationStore>,
    workspaces: WorkspaceScopeTracker<I>,
}

impl<I: WorkspaceScopeInvalidator> NavigationWatcher<I> {
    pub fn new(
        navigator: Navigator,
        sessions: &SessionStore,
        locations: Arc<LocationStore>,
        workspaces: WorkspaceScopeTracker<I>,
    ) -> Self {
        Self {
            navigator,
            session: sessions.subscribe(),
            location: locations.subscribe(),
            locations,
            workspaces,
        }
    }

    pub fn workspaces(&self) -> &WorkspaceScopeTracker<I> {
        &self.workspaces
    }

    /// 基于最新输入同步求值
    pub fn current(&mut self) -> RouteDecision {
        let session = self.session.borrow_and_update().clone();
        let location = self.location.borrow_and_update().clone();

        self.workspaces.observe_location(&location);
        self.navigator.decide(&session, &location)
    }

    /// 等待会话或位置变化后重新求值
    pub async fn next_decision(&mut self) -> Result<RouteDecision> {
        tokio::select! {
            changed = self.session.changed() => changed.map_err(|_| AppError::SessionClosed)?,
            changed = self.location.changed() => changed.map_err(|_| AppError::SessionClosed)?,
        }
        Ok(self.current())
    }

    /// 跟随重定向直到落到具体视图（受最大跳数限制）
    pub fn settle(&mut self) -> RouteDecision {
        let mut decision = self.current();

        for _ in 0..self.navigator.config().max_redirect_hops {
            let Some(redirect) = decision.redirect() else {
                return decision;
            };
            let target = redirect.to.clone();
            self.locations.navigate(&target);
            decision = self.current();
        }

        if decision.redirect().is_some() {
            tracing::warn!(
                location = %self.locations.current(),
                hops = self.navigator.config().max_redirect_hops,
                "Redirect hop limit reached"
            );
        }
        decision
    }
}
