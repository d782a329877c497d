//! Helper functions for creating specific error types

use super::types::AccessError;

/// Helper functions for creating specific errors
impl AccessError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn unknown_role<S: Into<String>>(tag: S) -> Self {
        Self::UnknownRole(tag.into())
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn identity_failure<S: Into<String>>(message: S) -> Self {
        Self::IdentityFailure(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }
}

impl AccessError {
    /// Whether this error aborts a provisioning run.
    ///
    /// Write failures after the identity exists are collected into the run
    /// report instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::IdentityConflict(_)
                | Self::ProfileWriteFailure(_)
                | Self::OrganizationWriteFailure(_)
                | Self::CapabilityWriteFailure(_)
        )
    }

    /// Short machine-readable tag, used in outcome records and CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Yaml(_) => "yaml",
            Self::Io(_) => "io",
            Self::HttpClient(_) => "http_client",
            Self::Validation(_) => "validation",
            Self::UnknownRole(_) => "unknown_role",
            Self::Forbidden(_) => "forbidden",
            Self::IdentityConflict(_) => "identity_conflict",
            Self::IdentityFailure(_) => "identity_failure",
            Self::ProfileWriteFailure(_) => "profile_write_failure",
            Self::OrganizationWriteFailure(_) => "organization_write_failure",
            Self::CapabilityWriteFailure(_) => "capability_write_failure",
            Self::Platform(_) => "platform",
            Self::NotFound(_) => "not_found",
        }
    }
}
