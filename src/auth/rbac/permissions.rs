//! Permission lookups over the catalog

use super::system::RoleCatalog;
use super::types::{Action, Area, Module, PermissionMatrix, Role};
use std::collections::BTreeSet;

impl RoleCatalog {
    /// Permission matrix for a role
    pub fn permissions(&self, role: Role) -> &PermissionMatrix {
        &self.definition(role).permissions
    }

    /// Areas a role may see
    pub fn visible_areas(&self, role: Role) -> &BTreeSet<Area> {
        &self.definition(role).visible_areas
    }

    /// Check a module action for a role, denying anything not tabulated
    pub fn allows(&self, role: Role, module: Module, action: Action) -> bool {
        self.permissions(role).allows(module, action)
    }

    /// Check area visibility for a role
    pub fn can_view(&self, role: Role, area: Area) -> bool {
        self.visible_areas(role).contains(&area)
    }

    /// Check a module action given raw identifiers.
    ///
    /// Unparseable identifiers are simply absent from every matrix.
    pub fn allows_ids(&self, role: Role, module: &str, action: &str) -> bool {
        match (module.parse::<Module>(), action.parse::<Action>()) {
            (Ok(module), Ok(action)) => self.allows(role, module, action),
            _ => false,
        }
    }
}
