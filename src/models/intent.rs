//! Intent registry
//!
//! An intent names a user-facing action ("list organization members") whose
//! permission requirement is looked up rather than computed. The table below is
//! the single source for both the runtime [`Intent`] enum and the typed markers
//! in [`intents`]; an intent without a binding cannot be declared.
//!
//! Typed markers fix the meta shape a call site may pass:
//!
//! ```
//! use workspace_access::models::intent::{intents, ScopedIntent};
//! use workspace_access::models::scope::OrganizationMeta;
//!
//! let query = intents::ListOrganizationMembers::query(Some(OrganizationMeta::new("org-1")));
//! assert_eq!(query.resource_id(), Some("org-1"));
//! ```
//!
//! Passing organization meta to a workspace intent does not compile:
//!
//! ```compile_fail
//! use workspace_access::models::intent::{intents, ScopedIntent};
//! use workspace_access::models::scope::OrganizationMeta;
//!
//! let _ = intents::ListWorkspaceMembers::query(Some(OrganizationMeta::new("org-1")));
//! ```

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::models::query::PermissionQuery;
use crate::models::role::Role;
use crate::models::scope::{ResourceScope, ScopeKind};

/// (scope, minimum role) an intent is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentBinding {
    pub resource_type: ResourceScope,
    pub role: Role,
}

/// Intent with a compile-time scope.
pub trait ScopedIntent: Copy {
    type Scope: ScopeKind;

    const INTENT: Intent;

    fn binding() -> IntentBinding {
        Self::INTENT.binding()
    }

    /// Query for this intent, narrowed by `meta` when it carries an id.
    fn query(meta: Option<MetaOf<Self>>) -> PermissionQuery {
        <Self::Scope as ScopeKind>::query(Self::INTENT.binding().role, meta)
    }
}

/// Meta shape accepted by intent `I`
pub type MetaOf<I> = <<I as ScopedIntent>::Scope as ScopeKind>::Meta;

macro_rules! define_intents {
    ($( $(#[$doc:meta])* $name:ident => ($scope:ty, $role:ident), )+) => {
        /// Closed set of intents
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Intent {
            $( $(#[$doc])* $name, )+
        }

        impl Intent {
            pub const ALL: &'static [Intent] = &[$(Intent::$name,)+];

            pub fn binding(self) -> IntentBinding {
                match self {
                    $(Intent::$name => IntentBinding {
                        resource_type: <$scope as ScopeKind>::SCOPE,
                        role: Role::$role,
                    },)+
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Intent::$name => stringify!($name),)+
                }
            }
        }

        impl FromStr for Intent {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($name) => Ok(Intent::$name),)+
                    other => Err(format!("unknown intent: {}", other)),
                }
            }
        }

        /// Typed intent markers
        pub mod intents {
            use super::{Intent, ScopedIntent};

            $(
                $(#[$doc])*
                #[derive(Debug, Clone, Copy, Default)]
                pub struct $name;

                impl ScopedIntent for $name {
                    type Scope = $scope;
                    const INTENT: Intent = Intent::$name;
                }
            )+
        }
    };
}

define_intents! {
    ListOrganizationMembers => (crate::models::scope::OrganizationScope, Reader),
    UpdateOrganizationPermissions => (crate::models::scope::OrganizationScope, Admin),
    ViewOrganizationSettings => (crate::models::scope::OrganizationScope, Reader),
    CreateOrganizationWorkspaces => (crate::models::scope::OrganizationScope, Editor),

    UpdateWorkspacePermissions => (crate::models::scope::WorkspaceScope, Admin),
    ListWorkspaceMembers => (crate::models::scope::WorkspaceScope, Reader),
    UpdateWorkspace => (crate::models::scope::WorkspaceScope, Editor),
    DeleteWorkspace => (crate::models::scope::WorkspaceScope, Admin),

    /// Instance-wide administration (feature flags, instance settings)
    ManageInstance => (crate::models::scope::InstanceScope, Admin),
}

/// Free-function form of [`Intent::binding`].
pub fn resolve(intent: Intent) -> IntentBinding {
    intent.binding()
}

impl Intent {
    /// Query for this intent with `resource_id` attached to the intent's own
    /// scope. The id is dropped for instance intents.
    pub fn query(self, resource_id: Option<String>) -> PermissionQuery {
        let IntentBinding {
            resource_type,
            role,
        } = self.binding();
        match resource_type {
            ResourceScope::Instance => PermissionQuery::instance(role),
            ResourceScope::Organization => PermissionQuery::organization(role, resource_id),
            ResourceScope::Workspace => PermissionQuery::workspace(role, resource_id),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Intent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scope::{InstanceMeta, OrganizationMeta, WorkspaceMeta};

    #[test]
    fn test_member_and_permission_bindings() {
        assert_eq!(
            resolve(Intent::ListOrganizationMembers),
            IntentBinding {
                resource_type: ResourceScope::Organization,
                role: Role::Reader
            }
        );
        assert_eq!(
            resolve(Intent::UpdateOrganizationPermissions),
            IntentBinding {
                resource_type: ResourceScope::Organization,
                role: Role::Admin
            }
        );
        assert_eq!(
            resolve(Intent::UpdateWorkspacePermissions),
            IntentBinding {
                resource_type: ResourceScope::Workspace,
                role: Role::Admin
            }
        );
        assert_eq!(
            resolve(Intent::ListWorkspaceMembers),
            IntentBinding {
                resource_type: ResourceScope::Workspace,
                role: Role::Reader
            }
        );
    }

    #[test]
    fn test_binding_is_stable() {
        for intent in Intent::ALL {
            assert_eq!(intent.binding(), intent.binding());
        }
    }

    #[test]
    fn test_typed_markers_agree_with_registry() {
        assert_eq!(
            intents::ListOrganizationMembers::binding(),
            Intent::ListOrganizationMembers.binding()
        );
        assert_eq!(
            <intents::ListWorkspaceMembers as ScopedIntent>::INTENT,
            Intent::ListWorkspaceMembers
        );
        assert_eq!(
            intents::ManageInstance::binding().resource_type,
            ResourceScope::Instance
        );
    }

    #[test]
    fn test_name_round_trip() {
        for intent in Intent::ALL {
            assert_eq!(intent.as_str().parse::<Intent>().unwrap(), *intent);
        }
        assert!("DropEverything".parse::<Intent>().is_err());
    }

    #[test]
    fn test_typed_query_uses_own_identifier() {
        let query = intents::UpdateWorkspace::query(Some(WorkspaceMeta::new("ws-9")));
        assert_eq!(query.resource_type(), ResourceScope::Workspace);
        assert_eq!(query.role(), Role::Editor);
        assert_eq!(query.resource_id(), Some("ws-9"));

        let query = intents::ViewOrganizationSettings::query(Some(OrganizationMeta::default()));
        assert_eq!(query.resource_id(), None);

        let query = intents::ManageInstance::query(Some(InstanceMeta));
        assert_eq!(query, PermissionQuery::instance(Role::Admin));
    }

    #[test]
    fn test_runtime_query_drops_id_for_instance() {
        let query = Intent::ManageInstance.query(Some("ignored".to_string()));
        assert_eq!(query.resource_id(), None);

        let query = Intent::DeleteWorkspace.query(Some("ws-1".to_string()));
        assert_eq!(query.resource_type(), ResourceScope::Workspace);
        assert_eq!(query.resource_id(), Some("ws-1"));
    }

    #[test]
    fn test_intent_serializes_as_name() {
        let json = serde_json::to_string(&Intent::ListWorkspaceMembers).unwrap();
        assert_eq!(json, "\"ListWorkspaceMembers\"");
    }
}
