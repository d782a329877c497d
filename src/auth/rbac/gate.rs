//! Permission gate and guards
//!
//! The gate answers view/perform questions for an account by resolving its
//! canonical role first. A negative answer is a plain `false`, never an
//! error. This is a presentation-level decision point; the data-access layer
//! has to enforce the same rules on its side.

use super::system::RoleCatalog;
use super::types::{Action, Area, Module, Role};
use crate::auth::resolver::RoleResolver;
use crate::core::models::Account;
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

/// What a guarded region requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// The area must be visible
    View(Area),
    /// The module action must be allowed
    Perform(Module, Action),
    /// Accounts with this role must be creatable
    Create(Role),
}

/// Rendering state of a guarded control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    Enabled,
    Disabled,
}

/// Permission gate
#[derive(Debug, Clone)]
pub struct PermissionGate {
    catalog: Arc<RoleCatalog>,
    resolver: RoleResolver,
}

impl PermissionGate {
    pub fn new(catalog: Arc<RoleCatalog>) -> Self {
        let resolver = RoleResolver::new(Arc::clone(&catalog));
        Self { catalog, resolver }
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Canonical role of an account
    pub fn role_of(&self, account: &Account) -> Role {
        self.resolver.resolve(&account.indicators)
    }

    /// Whether the account may see an area
    pub fn can_view(&self, account: &Account, area: Area) -> bool {
        self.catalog.can_view(self.role_of(account), area)
    }

    /// Whether the account may perform a module action
    pub fn can_perform(&self, account: &Account, module: Module, action: Action) -> bool {
        self.catalog.allows(self.role_of(account), module, action)
    }

    /// Same as [`Self::can_perform`] with raw identifiers
    pub fn can_perform_ids(&self, account: &Account, module: &str, action: &str) -> bool {
        self.catalog.allows_ids(self.role_of(account), module, action)
    }

    /// Whether the account may create accounts with `target` role
    pub fn can_create(&self, account: &Account, target: Role) -> bool {
        self.catalog.can_create(self.role_of(account), target)
    }

    /// Check a requirement for an already-resolved role
    pub fn check_role(&self, role: Role, requirement: Requirement) -> bool {
        let allowed = match requirement {
            Requirement::View(area) => self.catalog.can_view(role, area),
            Requirement::Perform(module, action) => self.catalog.allows(role, module, action),
            Requirement::Create(target) => self.catalog.can_create(role, target),
        };
        trace!(role = %role, ?requirement, allowed, "permission check");
        allowed
    }

    /// Guard a region for an account
    pub fn guard(&self, account: &Account, requirement: Requirement) -> Guard {
        self.guard_role(self.role_of(account), requirement)
    }

    /// Guard a region for a resolved role
    pub fn guard_role(&self, role: Role, requirement: Requirement) -> Guard {
        Guard {
            role,
            requirement,
            allowed: self.check_role(role, requirement),
        }
    }

    /// Areas visible to the account, in navigation order
    pub fn navigation(&self, account: &Account) -> Vec<Area> {
        self.catalog
            .visible_areas(self.role_of(account))
            .iter()
            .copied()
            .collect()
    }
}

/// A decided guard: either runs the protected path or the fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard {
    role: Role,
    requirement: Requirement,
    allowed: bool,
}

impl Guard {
    pub fn allowed(&self) -> bool {
        self.allowed
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// Run `protected` when allowed, `fallback` otherwise
    pub fn run<T>(&self, protected: impl FnOnce() -> T, fallback: impl FnOnce() -> T) -> T {
        if self.allowed { protected() } else { fallback() }
    }

    /// Run `protected` when allowed, yield `T::default()` (the no-op view) otherwise
    pub fn run_or_default<T: Default>(&self, protected: impl FnOnce() -> T) -> T {
        self.run(protected, T::default)
    }

    /// Map the decision onto a control state
    pub fn control_state(&self) -> ControlState {
        if self.allowed {
            ControlState::Enabled
        } else {
            ControlState::Disabled
        }
    }
}
