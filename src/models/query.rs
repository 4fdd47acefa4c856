//! Permission query sent to the evaluator

use serde::Serialize;
use std::fmt;

use crate::models::role::Role;
use crate::models::scope::ResourceScope;

/// Concrete permission query.
///
/// Fields are private: an instance query never carries a resource id, and an
/// id always belongs to the query's own scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionQuery {
    resource_type: ResourceScope,
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_id: Option<String>,
}

impl PermissionQuery {
    pub fn instance(role: Role) -> Self {
        Self {
            resource_type: ResourceScope::Instance,
            role,
            resource_id: None,
        }
    }

    pub fn organization(role: Role, organization_id: Option<String>) -> Self {
        Self {
            resource_type: ResourceScope::Organization,
            role,
            resource_id: organization_id,
        }
    }

    pub fn workspace(role: Role, workspace_id: Option<String>) -> Self {
        Self {
            resource_type: ResourceScope::Workspace,
            role,
            resource_id: workspace_id,
        }
    }

    pub fn resource_type(&self) -> ResourceScope {
        self.resource_type
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }
}

impl fmt::Display for PermissionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource_id {
            Some(id) => write!(f, "{}:{}@{}", self.resource_type, id, self.role),
            None => write!(f, "{}@{}", self.resource_type, self.role),
        }
    }
}
