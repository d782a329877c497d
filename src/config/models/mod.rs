//! Configuration data models
//!
//! This module defines all configuration structures used by the access core.

pub mod logging;
pub mod platform;
pub mod provisioning;

// Re-export all configuration types
pub use logging::*;
pub use platform::*;
pub use provisioning::*;

use serde::{Deserialize, Serialize};

/// Top-level configuration file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    /// External identity and data platform
    #[serde(default)]
    pub platform: PlatformConfig,
    /// Provisioning workflow settings
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

pub fn default_true() -> bool {
    true
}

/// Default platform request timeout in seconds
pub fn default_request_timeout() -> u64 {
    15
}

/// Default per-stage timeout in seconds
pub fn default_stage_timeout() -> u64 {
    20
}

/// Default delay between batch provisioning runs in milliseconds
pub fn default_batch_delay_ms() -> u64 {
    500
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_platform_url() -> String {
    "http://localhost:54321".to_string()
}
