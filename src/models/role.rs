//! Role and permission grant models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::scope::ResourceScope;

/// Role held on a resource instance.
///
/// Ordered by privilege: `Reader < Editor < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Reader,
    Editor,
    Admin,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Reader, Role::Editor, Role::Admin]
    }

    /// Returns true if this role has at least the permissions of the given role.
    pub fn has_permission_of(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Reader => write!(f, "READER"),
            Role::Editor => write!(f, "EDITOR"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "READER" => Ok(Role::Reader),
            "EDITOR" => Ok(Role::Editor),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Resource instance a grant is bound to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrantScope {
    Instance,
    Organization(String),
    Workspace(String),
}

impl GrantScope {
    pub fn resource_type(&self) -> ResourceScope {
        match self {
            GrantScope::Instance => ResourceScope::Instance,
            GrantScope::Organization(_) => ResourceScope::Organization,
            GrantScope::Workspace(_) => ResourceScope::Workspace,
        }
    }

    pub fn resource_id(&self) -> Option<&str> {
        match self {
            GrantScope::Instance => None,
            GrantScope::Organization(id) | GrantScope::Workspace(id) => Some(id),
        }
    }
}

/// Permission grant (actor <-> role on a scope)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub scope: GrantScope,
    pub role: Role,
}

impl PermissionGrant {
    pub fn instance(role: Role) -> Self {
        Self {
            scope: GrantScope::Instance,
            role,
        }
    }

    pub fn organization(organization_id: impl Into<String>, role: Role) -> Self {
        Self {
            scope: GrantScope::Organization(organization_id.into()),
            role,
        }
    }

    pub fn workspace(workspace_id: impl Into<String>, role: Role) -> Self {
        Self {
            scope: GrantScope::Workspace(workspace_id.into()),
            role,
        }
    }
}
