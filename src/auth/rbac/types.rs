//! RBAC type definitions

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Canonical agency role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Agency owner (patron), holds the organization record
    Owner,
    /// Agency manager
    Manager,
    /// Counter or office employee
    Employee,
    /// Bus driver
    Driver,
}

impl Role {
    /// Every canonical role, in catalog order
    pub const ALL: [Role; 4] = [Role::Owner, Role::Manager, Role::Employee, Role::Driver];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::Employee => "employee",
            Role::Driver => "driver",
        }
    }

    /// Position of this role in [`Role::ALL`]
    pub(crate) fn index(self) -> usize {
        match self {
            Role::Owner => 0,
            Role::Manager => 1,
            Role::Employee => 2,
            Role::Driver => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Parses canonical role names only, case-insensitively. Legacy tags are
    /// the resolver's business.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            "driver" => Ok(Role::Driver),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Declares a snake_case identifier enum with `ALL`, `as_str`, `Display` and `FromStr`.
macro_rules! identifier_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($tag => Ok($name::$variant),)+
                    other => Err(format!(concat!("Invalid ", stringify!($name), ": {}"), other)),
                }
            }
        }
    };
}

identifier_enum! {
    /// Navigational area of the dashboard
    Area {
        Dashboard => "dashboard",
        Trips => "trips",
        SeatMaps => "seat_maps",
        Bookings => "bookings",
        Customers => "customers",
        Fleet => "fleet",
        Employees => "employees",
        Finances => "finances",
        Reports => "reports",
        Settings => "settings",
    }
}

identifier_enum! {
    /// Module a permission applies to
    Module {
        Trips => "trips",
        Bookings => "bookings",
        SeatMaps => "seat_maps",
        Customers => "customers",
        Fleet => "fleet",
        Employees => "employees",
        Finances => "finances",
        Reports => "reports",
        Settings => "settings",
    }
}

identifier_enum! {
    /// Action within a module
    Action {
        View => "view",
        Create => "create",
        Modify => "modify",
        Cancel => "cancel",
        Refund => "refund",
        Delete => "delete",
        Assign => "assign",
        EditPrices => "edit_prices",
        Export => "export",
    }
}

/// Module × action → allowed
///
/// Absent pairs are denied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix(BTreeMap<Module, BTreeMap<Action, bool>>);

impl PermissionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `actions` on `module`
    pub fn grant(mut self, module: Module, actions: &[Action]) -> Self {
        let entry = self.0.entry(module).or_default();
        for action in actions {
            entry.insert(*action, true);
        }
        self
    }

    /// Record an explicit denial for `actions` on `module`
    pub fn deny(mut self, module: Module, actions: &[Action]) -> Self {
        let entry = self.0.entry(module).or_default();
        for action in actions {
            entry.insert(*action, false);
        }
        self
    }

    /// Closed-world lookup
    pub fn allows(&self, module: Module, action: Action) -> bool {
        self.0
            .get(&module)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(false)
    }

    /// Raw entry, `None` when the pair is not tabulated
    pub fn entry(&self, module: Module, action: Action) -> Option<bool> {
        self.0.get(&module).and_then(|actions| actions.get(&action)).copied()
    }

    /// Allowed actions for a module
    pub fn allowed_actions(&self, module: Module) -> Vec<Action> {
        self.0
            .get(&module)
            .map(|actions| {
                actions
                    .iter()
                    .filter(|(_, allowed)| **allowed)
                    .map(|(action, _)| *action)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tabulated modules
    pub fn modules(&self) -> impl Iterator<Item = Module> + '_ {
        self.0.keys().copied()
    }
}

/// Role definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Role this definition describes
    pub role: Role,
    /// Display label
    pub label: String,
    /// Icon token
    pub icon: String,
    /// Color token
    pub color: String,
    /// Human description
    pub description: String,
    /// Navigational areas the role may see
    pub visible_areas: BTreeSet<Area>,
    /// Capability matrix
    pub permissions: PermissionMatrix,
    /// Roles this role may create accounts for
    pub creatable_roles: BTreeSet<Role>,
}
