//! Business logic services layer

pub mod intent_service;
pub mod navigation_service;
pub mod permission_service;
pub mod workspace_service;

pub use intent_service::IntentResolver;
pub use navigation_service::Navigator;
pub use permission_service::{AccessContext, PermissionEvaluator, RbacEvaluator};
pub use workspace_service::{WorkspaceScopeInvalidator, WorkspaceScopeTracker};
