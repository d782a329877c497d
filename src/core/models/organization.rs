//! Organization and capability models

use super::default_true;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Row of the `organizations` table; one per owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Organization {
    /// Unverified, active organization for an owner
    pub fn for_owner(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        name: impl Into<String>,
        contact_email: Option<String>,
        contact_phone: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            name: name.into(),
            contact_email,
            contact_phone,
            is_verified: false,
            is_active: true,
        }
    }
}

/// Default child row of an organization (fleet size, service list, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub id: String,
    pub organization_id: String,
    pub kind: String,
    #[serde(default)]
    pub value: Value,
}
