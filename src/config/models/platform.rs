//! External platform configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which platform backend the binaries talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformBackend {
    /// Hosted identity + data platform over HTTP
    #[default]
    Http,
    /// In-process store, for dry runs
    Memory,
}

/// Identity and data platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Backend selection
    #[serde(default)]
    pub backend: PlatformBackend,
    /// Base URL of the platform
    #[serde(default = "default_platform_url")]
    pub url: String,
    /// Public (anonymous) API key
    #[serde(default)]
    pub anon_key: String,
    /// Privileged service key, required only for identity deletion
    #[serde(default)]
    pub service_key: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            backend: PlatformBackend::default(),
            url: default_platform_url(),
            anon_key: String::new(),
            service_key: None,
            request_timeout: default_request_timeout(),
        }
    }
}

impl PlatformConfig {
    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Key used for table access; the service key wins when configured
    pub fn data_key(&self) -> &str {
        self.service_key.as_deref().unwrap_or(&self.anon_key)
    }
}
