//! Resource scope model
//!
//! Every protected resource lives in exactly one tier of the tenant hierarchy.
//! The tier decides which identifier (if any) may narrow a permission query.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::query::PermissionQuery;
use crate::models::role::Role;

/// Resource scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceScope {
    Instance,
    Organization,
    Workspace,
}

impl ResourceScope {
    pub fn all() -> &'static [ResourceScope] {
        &[
            ResourceScope::Instance,
            ResourceScope::Organization,
            ResourceScope::Workspace,
        ]
    }
}

impl fmt::Display for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceScope::Instance => write!(f, "INSTANCE"),
            ResourceScope::Organization => write!(f, "ORGANIZATION"),
            ResourceScope::Workspace => write!(f, "WORKSPACE"),
        }
    }
}

/// Meta accepted by instance-scoped intents. Carries nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceMeta;

/// Meta accepted by organization-scoped intents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationMeta {
    pub organization_id: Option<String>,
}

impl OrganizationMeta {
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: Some(organization_id.into()),
        }
    }
}

/// Meta accepted by workspace-scoped intents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceMeta {
    pub workspace_id: Option<String>,
}

impl WorkspaceMeta {
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: Some(workspace_id.into()),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::InstanceScope {}
    impl Sealed for super::OrganizationScope {}
    impl Sealed for super::WorkspaceScope {}
}

/// Type-level resource scope.
///
/// Implemented only by [`InstanceScope`], [`OrganizationScope`] and
/// [`WorkspaceScope`]. Each implementation fixes the meta shape it accepts and
/// how that meta narrows a query, so a query can only ever pick up the
/// identifier of its own scope.
pub trait ScopeKind: sealed::Sealed {
    const SCOPE: ResourceScope;

    type Meta: Default;

    /// Builds the query for `role`, narrowed by `meta` when it carries an id.
    fn query(role: Role, meta: Option<Self::Meta>) -> PermissionQuery;
}

/// Instance (global) tier
#[derive(Debug, Clone, Copy)]
pub struct InstanceScope;

/// Organization tier
#[derive(Debug, Clone, Copy)]
pub struct OrganizationScope;

/// Workspace tier
#[derive(Debug, Clone, Copy)]
pub struct WorkspaceScope;

impl ScopeKind for InstanceScope {
    const SCOPE: ResourceScope = ResourceScope::Instance;
    type Meta = InstanceMeta;

    fn query(role: Role, _meta: Option<InstanceMeta>) -> PermissionQuery {
        PermissionQuery::instance(role)
    }
}

impl ScopeKind for OrganizationScope {
    const SCOPE: ResourceScope = ResourceScope::Organization;
    type Meta = OrganizationMeta;

    fn query(role: Role, meta: Option<OrganizationMeta>) -> PermissionQuery {
        PermissionQuery::organization(role, meta.and_then(|m| m.organization_id))
    }
}

impl ScopeKind for WorkspaceScope {
    const SCOPE: ResourceScope = ResourceScope::Workspace;
    type Meta = WorkspaceMeta;

    fn query(role: Role, meta: Option<WorkspaceMeta>) -> PermissionQuery {
        PermissionQuery::workspace(role, meta.and_then(|m| m.workspace_id))
    }
}
