//! Provisioning workflow configuration

use super::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

/// A default capability row attached to every new organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityTemplate {
    /// Capability kind, unique per organization
    pub kind: String,
    /// Initial value
    #[serde(default)]
    pub value: Value,
}

impl CapabilityTemplate {
    pub fn new<S: Into<String>>(kind: S, value: Value) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }
}

/// Provisioning workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Upper bound for each stage, in seconds
    #[serde(default = "default_stage_timeout")]
    pub stage_timeout: u64,
    /// Pause between accounts in batch runs, in milliseconds
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
    /// Attach default capabilities to new organizations
    #[serde(default = "default_true")]
    pub attach_default_capabilities: bool,
    /// Capability rows attached after the organization stage
    #[serde(default = "default_capabilities")]
    pub default_capabilities: Vec<CapabilityTemplate>,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            stage_timeout: default_stage_timeout(),
            batch_delay_ms: default_batch_delay_ms(),
            attach_default_capabilities: true,
            default_capabilities: default_capabilities(),
        }
    }
}

impl ProvisioningConfig {
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

/// Fleet size and service list for a freshly created agency
pub fn default_capabilities() -> Vec<CapabilityTemplate> {
    vec![
        CapabilityTemplate::new("fleet_size", json!(0)),
        CapabilityTemplate::new("services", json!(["passenger_transport"])),
    ]
}
