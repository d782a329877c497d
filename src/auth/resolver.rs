//! Canonical role resolution
//!
//! Account data carries up to three role signals from different schema
//! generations. They are consulted in a fixed order and the first match wins:
//!
//! 1. ownership of an organization record
//! 2. the profile `role` tag
//! 3. the legacy `employee_role` tag
//! 4. fallback to [`Role::Employee`]

use crate::auth::rbac::{Role, RoleCatalog, RoleDefinition};
use crate::core::models::RoleIndicators;
use crate::utils::error::{AccessError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Profile `role` tags
const PROFILE_ROLE_TAGS: &[(&str, Role)] = &[
    ("agency_manager", Role::Manager),
    ("agency_employee", Role::Employee),
    ("agency_driver", Role::Driver),
    ("manager", Role::Manager),
    ("employee", Role::Employee),
    ("driver", Role::Driver),
    ("admin", Role::Manager),
];

/// Legacy `employee_role` tags; anything else maps to `Employee`
const LEGACY_ROLE_TAGS: &[(&str, Role)] = &[
    ("admin", Role::Manager),
    ("manager", Role::Manager),
    ("employee", Role::Employee),
    ("driver", Role::Driver),
];

/// Which signal produced the canonical role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    OrganizationOwner,
    ProfileRole,
    LegacyEmployeeRole,
    Fallback,
}

/// Resolved role together with the signal it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub role: Role,
    pub source: ResolutionSource,
}

fn lookup(table: &[(&str, Role)], tag: &str) -> Option<Role> {
    let tag = tag.trim().to_ascii_lowercase();
    table
        .iter()
        .find(|(candidate, _)| *candidate == tag)
        .map(|(_, role)| *role)
}

/// Role resolver
#[derive(Debug, Clone)]
pub struct RoleResolver {
    catalog: Arc<RoleCatalog>,
}

impl RoleResolver {
    pub fn new(catalog: Arc<RoleCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve the canonical role. Total: every input yields a role.
    pub fn resolve(&self, indicators: &RoleIndicators) -> Role {
        self.explain(indicators).role
    }

    /// Resolve and report which signal decided
    pub fn explain(&self, indicators: &RoleIndicators) -> Resolution {
        let resolution = if indicators.owns_organization {
            Resolution {
                role: Role::Owner,
                source: ResolutionSource::OrganizationOwner,
            }
        } else if let Some(role) = indicators
            .role
            .as_deref()
            .and_then(|tag| lookup(PROFILE_ROLE_TAGS, tag))
        {
            Resolution {
                role,
                source: ResolutionSource::ProfileRole,
            }
        } else if let Some(tag) = indicators.employee_role.as_deref() {
            Resolution {
                role: lookup(LEGACY_ROLE_TAGS, tag).unwrap_or(Role::Employee),
                source: ResolutionSource::LegacyEmployeeRole,
            }
        } else {
            Resolution {
                role: Role::Employee,
                source: ResolutionSource::Fallback,
            }
        };

        debug!(
            role = %resolution.role,
            source = ?resolution.source,
            "resolved canonical role"
        );
        resolution
    }

    /// Catalog entry for the resolved role
    pub fn definition_for(&self, indicators: &RoleIndicators) -> &RoleDefinition {
        self.catalog.definition(self.resolve(indicators))
    }

    /// Parse a role tag supplied with a provisioning request.
    ///
    /// Accepts canonical names (`Owner`, `manager`, ...) and profile role tags.
    /// Anything else is rejected rather than defaulted, so an obviously invalid
    /// request never reaches the identity service.
    pub fn parse_requested(&self, tag: &str) -> Result<Role> {
        if let Ok(role) = tag.parse::<Role>() {
            return Ok(role);
        }
        lookup(PROFILE_ROLE_TAGS, tag).ok_or_else(|| AccessError::unknown_role(tag.trim()))
    }
}
