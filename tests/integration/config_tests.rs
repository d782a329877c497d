//! Configuration loading tests

#[cfg(test)]
mod tests {
    use agency_access::config::{LogFormat, PlatformBackend};
    use agency_access::{AccessCore, Config, ProvisioningRequest};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_memory_backend_from_file() {
        let file = write_config(
            r#"
platform:
  backend: memory
provisioning:
  stage_timeout: 5
  batch_delay_ms: 0
  default_capabilities:
    - kind: fleet_size
      value: 12
logging:
  format: json
"#,
        );

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.platform().backend, PlatformBackend::Memory);
        assert_eq!(config.logging().format, LogFormat::Json);
        assert_eq!(config.provisioning().default_capabilities.len(), 1);

        let core = AccessCore::new(config).unwrap();
        let report = core
            .provisioner()
            .run(&ProvisioningRequest::new("owner@agency.test", "pw", "owner"))
            .await
            .unwrap();
        assert_eq!(report.summary(), "created");
    }

    #[tokio::test]
    async fn test_http_backend_requires_anon_key() {
        let file = write_config("platform:\n  url: https://platform.test\n");
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("Anon key"));
    }

    #[tokio::test]
    async fn test_invalid_yaml_is_config_error() {
        let file = write_config("platform: [unterminated");
        assert!(Config::from_file(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_load_with_file_matches_from_file() {
        let file = write_config(
            "platform:\n  backend: memory\nprovisioning:\n  stage_timeout: 7\n",
        );

        let loaded = Config::load(Some(file.path())).await.unwrap();
        let direct = Config::from_file(file.path()).await.unwrap();
        assert_eq!(loaded.platform().backend, direct.platform().backend);
        assert_eq!(loaded.provisioning().stage_timeout, 7);
    }

    #[tokio::test]
    async fn test_missing_file() {
        assert!(Config::from_file("/nonexistent/agency.yaml").await.is_err());
    }
}
