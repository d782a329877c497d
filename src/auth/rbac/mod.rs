//! Role-Based Access Control (RBAC)
//!
//! Role catalog, permission matrix, creation hierarchy and the permission gate.

mod gate;
mod permissions;
mod roles;
mod system;
mod types;

pub use gate::{ControlState, Guard, PermissionGate, Requirement};
pub use system::{MAX_CREATION_DEPTH, RoleCatalog};
pub use types::{Action, Area, Module, PermissionMatrix, Role, RoleDefinition};
