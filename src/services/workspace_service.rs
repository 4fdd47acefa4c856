//! 工作区范围缓存失效
//!
//! 工作区切换时通知外部数据层丢弃该工作区范围内的缓存。
//! 只负责触发，不等待也不重试。

use std::sync::Mutex;

use crate::models::route::{paths, Location};

/// 外部数据层的工作区缓存失效能力
pub trait WorkspaceScopeInvalidator: Send + Sync {
    fn invalidate_workspace_scope(&self, workspace_id: &str);
}

/// 从 `/workspaces/:workspaceId/...` 中取当前工作区 ID
pub fn current_workspace_id(location: &Location) -> Option<String> {
    match location.segments().as_slice() {
        [first, workspace_id, ..]
            if first.eq_ignore_ascii_case(paths::WORKSPACES.trim_start_matches('/')) =>
        {
            Some(workspace_id.to_string())
        }
        _ => None,
    }
}

/// 记录上次观察到的工作区，变化时触发失效
pub struct WorkspaceScopeTracker<I> {
    invalidator: I,
    last_seen: Mutex<Option<String>>,
}

impl<I: WorkspaceScopeInvalidator> WorkspaceScopeTracker<I> {
    pub fn new(invalidator: I) -> Self {
        Self {
            invalidator,
            last_seen: Mutex::new(None),
        }
    }

    /// 观察当前工作区；返回是否触发了失效
    pub fn observe(&self, workspace_id: Option<&str>) -> bool {
        let mut last_seen = match self.last_seen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if last_seen.as_deref() == workspace_id {
            return false;
        }
        *last_seen = workspace_id.map(str::to_string);

        match workspace_id {
            Some(id) => {
                tracing::debug!(workspace_id = %id, "Invalidating workspace scope");
                self.invalidator.invalidate_workspace_scope(id);
                true
            }
            None => false,
        }
    }

    pub fn observe_location(&self, location: &Location) -> bool {
        self.observe(current_workspace_id(location).as_deref())
    }
}

/// 不做任何事的失效器（无外部缓存时使用）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

impl WorkspaceScopeInvalidator for NoopInvalidator {
    fn invalidate_workspace_scope(&self, _workspace_id: &str) {}
}

impl<I: WorkspaceScopeInvalidator + ?Sized> WorkspaceScopeInvalidator for std::sync::Arc<I> {
    fn invalidate_workspace_scope(&self, workspace_id: &str) {
        (**self).invalidate_workspace_scope(workspace_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_workspace_id() {
        assert_eq!(
            current_workspace_id(&Location::parse("/workspaces/ws-1/connections")),
            Some("ws-1".to_string())
        );
        assert_eq!(current_workspace_id(&Location::parse("/workspaces")), None);
        assert_eq!(current_workspace_id(&Location::parse("/connections")), None);
    }
}
