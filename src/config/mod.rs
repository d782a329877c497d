//! Configuration management for the access core
//!
//! This module handles loading, validation, and management of configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{AccessError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Access core configuration
    pub access: AccessConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self {
            access: Self::read_file(path.as_ref()).await?,
        };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables (and `.env` when present)
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        dotenvy::dotenv().ok();

        let config = Self {
            access: Self::access_from_env(AccessConfig::default())?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the file when given, otherwise defaults, then overlay the
    /// environment and validate the result
    pub async fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let Some(path) = path else {
            return Self::from_env();
        };
        dotenvy::dotenv().ok();

        let access = Self::read_file(path.as_ref()).await?;
        let config = Self {
            access: Self::access_from_env(access)?,
        };
        config.validate()?;
        Ok(config)
    }

    async fn read_file(path: &Path) -> Result<AccessConfig> {
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AccessError::config(format!("Failed to read config file: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| AccessError::config(format!("Failed to parse config: {}", e)))
    }

    /// Overlay `AGENCY_*` environment variables onto a base configuration
    pub fn access_from_env(access: AccessConfig) -> Result<AccessConfig> {
        Self::access_from_lookup(access, |name| std::env::var(name).ok())
    }

    /// Overlay `AGENCY_*` settings from an arbitrary source
    pub fn access_from_lookup<F>(mut access: AccessConfig, lookup: F) -> Result<AccessConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("AGENCY_PLATFORM_URL") {
            access.platform.url = url;
        }
        if let Some(key) = lookup("AGENCY_ANON_KEY") {
            access.platform.anon_key = key;
        }
        if let Some(key) = lookup("AGENCY_SERVICE_KEY") {
            access.platform.service_key = Some(key);
        }
        if let Some(backend) = lookup("AGENCY_PLATFORM_BACKEND") {
            access.platform.backend = match backend.to_ascii_lowercase().as_str() {
                "http" => PlatformBackend::Http,
                "memory" => PlatformBackend::Memory,
                other => {
                    return Err(AccessError::config(format!(
                        "Invalid AGENCY_PLATFORM_BACKEND: {}",
                        other
                    )));
                }
            };
        }
        if let Some(secs) = lookup("AGENCY_STAGE_TIMEOUT_SECS") {
            access.provisioning.stage_timeout = parse_env_number("AGENCY_STAGE_TIMEOUT_SECS", &secs)?;
        }
        if let Some(ms) = lookup("AGENCY_BATCH_DELAY_MS") {
            access.provisioning.batch_delay_ms = parse_env_number("AGENCY_BATCH_DELAY_MS", &ms)?;
        }
        if let Some(level) = lookup("AGENCY_LOG_LEVEL") {
            access.logging.level = level;
        }
        if let Some(format) = lookup("AGENCY_LOG_FORMAT") {
            access.logging.format = format.parse::<LogFormat>().map_err(AccessError::config)?;
        }
        Ok(access)
    }

    /// Get platform configuration
    pub fn platform(&self) -> &PlatformConfig {
        &self.access.platform
    }

    /// Get provisioning configuration
    pub fn provisioning(&self) -> &ProvisioningConfig {
        &self.access.provisioning
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.access.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        Validate::validate(&self.access).map_err(AccessError::config)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.access)
            .map_err(|e| AccessError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_env_number(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| AccessError::config(format!("Invalid {}: {}", name, e)))
}
