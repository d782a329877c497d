//! Authorization
//!
//! Role catalog, canonical role resolution and the permission gate.

pub mod rbac;
pub mod resolver;

pub use rbac::{
    Action, Area, ControlState, Guard, Module, PermissionGate, PermissionMatrix, Requirement, Role,
    RoleCatalog, RoleDefinition,
};
pub use resolver::{Resolution, ResolutionSource, RoleResolver};
