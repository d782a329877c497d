//! Account and profile models

use super::default_true;
use crate::auth::rbac::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw role signals found on an account, in any schema generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleIndicators {
    /// Account owns an organization record
    #[serde(default)]
    pub owns_organization: bool,
    /// New-style profile `role` tag
    #[serde(default)]
    pub role: Option<String>,
    /// Legacy `employee_role` tag
    #[serde(default)]
    pub employee_role: Option<String>,
}

/// An account at the provisioning boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// External identity id
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub indicators: RoleIndicators,
    pub is_active: bool,
}

impl Account {
    /// Build an account from its profile row and ownership flag
    pub fn from_profile(profile: ProfileRecord, owns_organization: bool) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            full_name: profile.full_name,
            phone: profile.phone,
            indicators: RoleIndicators {
                owns_organization,
                role: profile.role,
                employee_role: profile.employee_role,
            },
            is_active: profile.is_active,
        }
    }

    /// Name to show in listings, falling back to the email
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

/// Row of the `profiles` table, keyed by identity id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub email: String,
    /// Omitted when unset so a merge keeps the stored value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_role: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileRecord {
    /// Active profile carrying the canonical role tag
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        full_name: Option<String>,
        phone: Option<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            full_name,
            phone,
            role: Some(role.as_str().to_string()),
            employee_role: None,
            is_active: true,
            updated_at: Some(Utc::now()),
        }
    }
}
