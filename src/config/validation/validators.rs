//! Section validators

use super::trait_def::Validate;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

impl Validate for AccessConfig {
    fn validate(&self) -> Result<(), String> {
        self.platform
            .validate()
            .map_err(|e| format!("Platform config error: {}", e))?;
        self.provisioning
            .validate()
            .map_err(|e| format!("Provisioning config error: {}", e))?;
        self.logging
            .validate()
            .map_err(|e| format!("Logging config error: {}", e))?;
        Ok(())
    }
}

impl Validate for PlatformConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating platform configuration");

        let url = url::Url::parse(&self.url).map_err(|e| format!("Invalid platform URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("Unsupported URL scheme: {}", url.scheme()));
        }

        if self.backend == PlatformBackend::Http && self.anon_key.is_empty() {
            return Err("Anon key cannot be empty for the HTTP backend".to_string());
        }

        if self.request_timeout == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if self.request_timeout > 300 {
            return Err("Request timeout should not exceed 300 seconds".to_string());
        }

        Ok(())
    }
}

impl Validate for ProvisioningConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating provisioning configuration");

        if self.stage_timeout == 0 {
            return Err("Stage timeout must be greater than 0".to_string());
        }

        let mut kinds = HashSet::new();
        for template in &self.default_capabilities {
            if template.kind.trim().is_empty() {
                return Err("Capability kind cannot be empty".to_string());
            }
            if !kinds.insert(template.kind.as_str()) {
                return Err(format!("Duplicate capability kind: {}", template.kind));
            }
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}
