//! Tests for configuration validation

#[cfg(test)]
mod tests {
    use super::super::trait_def::Validate;
    use crate::config::models::*;
    use serde_json::json;

    fn http_platform() -> PlatformConfig {
        PlatformConfig {
            anon_key: "anon-key".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_platform_config_validation() {
        let mut config = http_platform();
        assert!(config.validate().is_ok());

        config.url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.url = "ftp://platform.example.com".to_string();
        assert!(config.validate().is_err());

        config.url = "https://platform.example.com".to_string();
        config.request_timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_http_backend_requires_anon_key() {
        let config = PlatformConfig::default();
        assert!(config.validate().is_err());

        let memory = PlatformConfig {
            backend: PlatformBackend::Memory,
            ..Default::default()
        };
        assert!(memory.validate().is_ok());
    }

    #[test]
    fn test_provisioning_config_validation() {
        let mut config = ProvisioningConfig::default();
        assert!(config.validate().is_ok());

        config.stage_timeout = 0;
        assert!(config.validate().is_err());

        config.stage_timeout = 5;
        config
            .default_capabilities
            .push(CapabilityTemplate::new("fleet_size", json!(3)));
        let err = config.validate().unwrap_err();
        assert!(err.contains("Duplicate capability kind"));
    }

    #[test]
    fn test_access_config_prefixes_section() {
        let config = AccessConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.starts_with("Platform config error"));
    }
}
