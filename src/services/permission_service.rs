//! 权限检查服务
//!
//! `PermissionEvaluator` 是意图解析器唯一依赖的权限判定能力。
//! `RbacEvaluator` 基于会话中已物化的角色授权进行判定。

use std::collections::HashMap;

use crate::{
    error::Result,
    models::{
        query::PermissionQuery,
        role::{GrantScope, PermissionGrant, Role},
        scope::ResourceScope,
        session::AuthSessionState,
    },
};

/// 权限判定能力
pub trait PermissionEvaluator {
    /// 判断当前主体是否满足查询；失败时错误原样向上传递
    fn evaluate(&self, query: &PermissionQuery) -> Result<bool>;
}

impl<E: PermissionEvaluator + ?Sized> PermissionEvaluator for &E {
    fn evaluate(&self, query: &PermissionQuery) -> Result<bool> {
        (**self).evaluate(query)
    }
}

impl<E: PermissionEvaluator + ?Sized> PermissionEvaluator for std::sync::Arc<E> {
    fn evaluate(&self, query: &PermissionQuery) -> Result<bool> {
        (**self).evaluate(query)
    }
}

/// 环境上下文：未指定 resource_id 的查询回落到当前组织 / 工作区
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    pub organization_id: Option<String>,
    pub workspace_id: Option<String>,
    /// 工作区 -> 所属组织
    pub workspace_organizations: HashMap<String, String>,
}

impl AccessContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// 设置当前工作区；`organization_id` 同时登记为其所属组织
    #[must_use]
    pub fn with_workspace(
        mut self,
        workspace_id: impl Into<String>,
        organization_id: impl Into<String>,
    ) -> Self {
        let workspace_id = workspace_id.into();
        let organization_id = organization_id.into();
        self.workspace_organizations
            .insert(workspace_id.clone(), organization_id.clone());
        self.workspace_id = Some(workspace_id);
        if self.organization_id.is_none() {
            self.organization_id = Some(organization_id);
        }
        self
    }

    /// 登记工作区所属组织（不改变当前工作区）
    #[must_use]
    pub fn with_workspace_organization(
        mut self,
        workspace_id: impl Into<String>,
        organization_id: impl Into<String>,
    ) -> Self {
        self.workspace_organizations
            .insert(workspace_id.into(), organization_id.into());
        self
    }
}

/// 基于角色授权的权限判定
#[derive(Debug, Clone, Default)]
pub struct RbacEvaluator {
    grants: Vec<PermissionGrant>,
    context: AccessContext,
}

impl RbacEvaluator {
    pub fn new(grants: Vec<PermissionGrant>, context: AccessContext) -> Self {
        Self { grants, context }
    }

    /// 从会话构建；未登录时没有任何授权
    pub fn from_session(session: &AuthSessionState, context: AccessContext) -> Self {
        let grants = session
            .actor
            .as_ref()
            .map(|actor| actor.grants.clone())
            .unwrap_or_default();
        Self::new(grants, context)
    }

    pub fn grants(&self) -> &[PermissionGrant] {
        &self.grants
    }

    /// 检查授权是否覆盖查询
    pub fn check_permission(&self, query: &PermissionQuery) -> bool {
        let required = query.role();

        // 实例级授权覆盖所有范围
        if self.holds(&GrantScope::Instance, required) {
            return true;
        }

        match query.resource_type() {
            ResourceScope::Instance => false,
            ResourceScope::Organization => {
                let Some(organization_id) = query
                    .resource_id()
                    .or(self.context.organization_id.as_deref())
                else {
                    tracing::debug!(query = %query, "No organization in context");
                    return false;
                };
                self.holds(&GrantScope::Organization(organization_id.to_string()), required)
            }
            ResourceScope::Workspace => {
                let Some(workspace_id) = query
                    .resource_id()
                    .or(self.context.workspace_id.as_deref())
                else {
                    tracing::debug!(query = %query, "No workspace in context");
                    return false;
                };
                if self.holds(&GrantScope::Workspace(workspace_id.to_string()), required) {
                    return true;
                }
                // 组织级授权覆盖其下的工作区
                self.context
                    .workspace_organizations
                    .get(workspace_id)
                    .is_some_and(|org| {
                        self.holds(&GrantScope::Organization(org.clone()), required)
                    })
            }
        }
    }

    fn holds(&self, scope: &GrantScope, required: Role) -> bool {
        self.grants
            .iter()
            .any(|grant| &grant.scope == scope && grant.role.has_permission_of(required))
    }
}

impl PermissionEvaluator for RbacEvaluator {
    fn evaluate(&self, query: &PermissionQuery) -> Result<bool> {
        let allowed = self.check_permission(query);
        if !allowed {
            tracing::debug!(
                query = %query,
                grants = self.grants.len(),
                "Permission denied"
            );
        }
        Ok(allowed)
    }
}
