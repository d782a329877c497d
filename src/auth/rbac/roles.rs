//! Role-creation policy

use super::system::RoleCatalog;
use super::types::Role;
use crate::utils::error::{AccessError, Result};
use std::collections::BTreeSet;

impl RoleCatalog {
    /// Roles the acting role may create, exactly as tabulated
    pub fn creatable_roles(&self, acting: Role) -> &BTreeSet<Role> {
        &self.definition(acting).creatable_roles
    }

    /// Whether `acting` may create an account with role `target`
    pub fn can_create(&self, acting: Role, target: Role) -> bool {
        self.creatable_roles(acting).contains(&target)
    }

    /// Reject a disallowed creation instead of downgrading it
    pub fn ensure_can_create(&self, acting: Role, target: Role) -> Result<()> {
        if self.can_create(acting, target) {
            Ok(())
        } else {
            Err(AccessError::forbidden(format!(
                "role '{}' may not create '{}' accounts",
                acting, target
            )))
        }
    }

    /// Display label for a role
    pub fn label(&self, role: Role) -> &str {
        &self.definition(role).label
    }
}
