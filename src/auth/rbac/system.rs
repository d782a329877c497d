//! Role catalog core functionality

use crate::utils::error::{AccessError, Result};
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::types::{Action, Area, Module, PermissionMatrix, Role, RoleDefinition};

/// Longest allowed chain of creation edges (owner -> manager -> employee)
pub const MAX_CREATION_DEPTH: usize = 2;

/// Immutable table of role definitions
///
/// Holds exactly one definition per [`Role`], stored in [`Role::ALL`] order.
/// Built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleCatalog {
    pub(super) definitions: Vec<RoleDefinition>,
}

impl RoleCatalog {
    /// The built-in agency catalog
    pub fn agency_default() -> Self {
        let definitions = default_definitions();
        debug!("Initialized {} default roles", definitions.len());
        Self { definitions }
    }

    /// Build a catalog from explicit definitions
    ///
    /// Every role must be defined exactly once, and the creation hierarchy
    /// must stay an acyclic graph at most [`MAX_CREATION_DEPTH`] edges deep
    /// in which nobody creates an owner.
    pub fn from_definitions(definitions: Vec<RoleDefinition>) -> Result<Self> {
        info!("Building role catalog from {} definitions", definitions.len());

        let mut slots: Vec<Option<RoleDefinition>> = vec![None; Role::ALL.len()];
        for definition in definitions {
            let slot = &mut slots[definition.role.index()];
            if slot.is_some() {
                return Err(AccessError::config(format!(
                    "Role '{}' is defined more than once",
                    definition.role
                )));
            }
            *slot = Some(definition);
        }

        let mut ordered = Vec::with_capacity(Role::ALL.len());
        for (role, slot) in Role::ALL.iter().zip(slots) {
            match slot {
                Some(definition) => ordered.push(definition),
                None => {
                    return Err(AccessError::config(format!("Role '{}' has no definition", role)));
                }
            }
        }

        let catalog = Self { definitions: ordered };
        catalog.check_hierarchy()?;
        Ok(catalog)
    }

    fn check_hierarchy(&self) -> Result<()> {
        for definition in &self.definitions {
            let acting = definition.role;
            for target in &definition.creatable_roles {
                if *target == acting {
                    return Err(AccessError::config(format!("Role '{}' may not create itself", acting)));
                }
                if *target == Role::Owner {
                    return Err(AccessError::config(format!(
                        "Role '{}' may not create owners",
                        acting
                    )));
                }
            }
        }

        for role in Role::ALL {
            self.walk_creation_chain(&mut vec![role])?;
        }
        Ok(())
    }

    /// Depth-first walk along creation edges from the last role in `path`
    fn walk_creation_chain(&self, path: &mut Vec<Role>) -> Result<()> {
        let Some(&current) = path.last() else {
            return Ok(());
        };

        for target in &self.definition(current).creatable_roles {
            let cycle = path.contains(target);
            path.push(*target);
            let chain = path.iter().map(Role::as_str).collect::<Vec<_>>().join(" -> ");
            if cycle {
                return Err(AccessError::config(format!(
                    "Role creation hierarchy has a cycle: {}",
                    chain
                )));
            }
            if path.len() - 1 > MAX_CREATION_DEPTH {
                return Err(AccessError::config(format!(
                    "Role creation chain deeper than {}: {}",
                    MAX_CREATION_DEPTH, chain
                )));
            }
            self.walk_creation_chain(path)?;
            path.pop();
        }
        Ok(())
    }

    /// Definition for a role
    pub fn definition(&self, role: Role) -> &RoleDefinition {
        &self.definitions[role.index()]
    }

    /// List all role definitions in catalog order
    pub fn list_roles(&self) -> &[RoleDefinition] {
        &self.definitions
    }
}

fn areas(list: &[Area]) -> BTreeSet<Area> {
    list.iter().copied().collect()
}

fn roles(list: &[Role]) -> BTreeSet<Role> {
    list.iter().copied().collect()
}

fn default_definitions() -> Vec<RoleDefinition> {
    use Action::*;

    vec![
        // Owner - full access to the agency
        RoleDefinition {
            role: Role::Owner,
            label: "Agency Owner".to_string(),
            icon: "crown".to_string(),
            color: "amber".to_string(),
            description: "Owns the agency organization and manages every area".to_string(),
            visible_areas: Area::ALL.iter().copied().collect(),
            permissions: PermissionMatrix::new()
                .grant(Module::Trips, &[View, Create, Modify, Cancel, Assign])
                .grant(Module::Bookings, &[View, Create, Modify, Cancel, Refund])
                .grant(Module::SeatMaps, &[View, Modify])
                .grant(Module::Customers, &[View, Modify])
                .grant(Module::Fleet, &[View, Create, Modify, Delete])
                .grant(Module::Employees, &[View, Create, Modify, Delete])
                .grant(Module::Finances, &[View, EditPrices, Export])
                .grant(Module::Reports, &[View, Export])
                .grant(Module::Settings, &[View, Modify]),
            creatable_roles: roles(&[Role::Manager, Role::Employee, Role::Driver]),
        },
        // Manager - day-to-day operations, no pricing or settings
        RoleDefinition {
            role: Role::Manager,
            label: "Manager".to_string(),
            icon: "briefcase".to_string(),
            color: "blue".to_string(),
            description: "Runs daily operations: trips, bookings, fleet and staff rosters".to_string(),
            visible_areas: areas(&[
                Area::Dashboard,
                Area::Trips,
                Area::SeatMaps,
                Area::Bookings,
                Area::Customers,
                Area::Fleet,
                Area::Employees,
                Area::Finances,
                Area::Reports,
            ]),
            permissions: PermissionMatrix::new()
                .grant(Module::Trips, &[View, Create, Modify, Cancel, Assign])
                .grant(Module::Bookings, &[View, Create, Modify, Cancel, Refund])
                .grant(Module::SeatMaps, &[View, Modify])
                .grant(Module::Customers, &[View, Modify])
                .grant(Module::Fleet, &[View, Modify])
                .deny(Module::Fleet, &[Create, Delete])
                .grant(Module::Employees, &[View, Create])
                .deny(Module::Employees, &[Modify, Delete])
                .grant(Module::Finances, &[View, Export])
                .deny(Module::Finances, &[EditPrices])
                .grant(Module::Reports, &[View, Export]),
            creatable_roles: roles(&[Role::Employee, Role::Driver]),
        },
        // Employee - counter work on bookings
        RoleDefinition {
            role: Role::Employee,
            label: "Counter Agent".to_string(),
            icon: "ticket".to_string(),
            color: "green".to_string(),
            description: "Sells and manages bookings at the counter".to_string(),
            visible_areas: areas(&[
                Area::Dashboard,
                Area::Trips,
                Area::SeatMaps,
                Area::Bookings,
                Area::Customers,
            ]),
            permissions: PermissionMatrix::new()
                .grant(Module::Trips, &[View])
                .grant(Module::Bookings, &[View, Create, Modify, Cancel])
                .deny(Module::Bookings, &[Refund])
                .grant(Module::SeatMaps, &[View])
                .grant(Module::Customers, &[View, Modify]),
            creatable_roles: BTreeSet::new(),
        },
        // Driver - read-only view of assigned trips
        RoleDefinition {
            role: Role::Driver,
            label: "Driver".to_string(),
            icon: "bus".to_string(),
            color: "slate".to_string(),
            description: "Sees assigned trips and their passenger lists".to_string(),
            visible_areas: areas(&[Area::Dashboard, Area::Trips]),
            permissions: PermissionMatrix::new()
                .grant(Module::Trips, &[View])
                .grant(Module::Bookings, &[View])
                .grant(Module::SeatMaps, &[View])
                .grant(Module::Fleet, &[View]),
            creatable_roles: BTreeSet::new(),
        },
    ]
}
