//! Error types for the access core

use crate::platform::PlatformError;
use thiserror::Error;

/// Result type alias for the access core
pub type Result<T> = std::result::Result<T, AccessError>;

/// Main error type for the access core
#[derive(Error, Debug)]
pub enum AccessError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested role tag matches no known role
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Acting role may not perform the requested creation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Identity already exists at the identity service
    #[error("Identity already registered: {0}")]
    IdentityConflict(String),

    /// Identity could neither be created nor recovered
    #[error("Identity failure: {0}")]
    IdentityFailure(String),

    /// Profile record could not be written
    #[error("Profile write failure: {0}")]
    ProfileWriteFailure(String),

    /// Organization record could not be written
    #[error("Organization write failure: {0}")]
    OrganizationWriteFailure(String),

    /// Default capability records could not be written
    #[error("Capability write failure: {0}")]
    CapabilityWriteFailure(String),

    /// Raw platform errors outside of a provisioning stage
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),
}
