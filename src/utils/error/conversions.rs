//! Type conversions for AccessError

use super::types::AccessError;
use crate::core::provisioning::Stage;
use crate::platform::PlatformError;

impl AccessError {
    /// Map a platform failure observed during a provisioning stage onto the
    /// stage-specific taxonomy.
    pub fn from_stage(stage: Stage, err: PlatformError) -> Self {
        match (stage, err) {
            (Stage::Identity, PlatformError::AlreadyRegistered(email)) => {
                AccessError::IdentityConflict(email)
            }
            (Stage::Identity, other) => AccessError::IdentityFailure(other.to_string()),
            (Stage::Profile, other) => AccessError::ProfileWriteFailure(other.to_string()),
            (Stage::Organization, other) => {
                AccessError::OrganizationWriteFailure(other.to_string())
            }
            (Stage::Capabilities, other) => AccessError::CapabilityWriteFailure(other.to_string()),
        }
    }
}
