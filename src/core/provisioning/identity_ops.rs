//! Identity stage operations

use super::types::{Stage, StageStatus};
use crate::platform::{Identity, IdentityService, PlatformError, Record};
use crate::utils::error::{AccessError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identity operations against the identity service
pub struct IdentityOperations {
    service: Arc<dyn IdentityService>,
}

impl IdentityOperations {
    pub fn new(service: Arc<dyn IdentityService>) -> Self {
        Self { service }
    }

    /// Create the identity, or recover the existing one by signing in
    pub async fn ensure_identity(
        &self,
        email: &str,
        password: &str,
        metadata: Record,
    ) -> Result<(Identity, StageStatus)> {
        debug!(email = %email, "creating identity");
        match self.service.create_identity(email, password, metadata).await {
            Ok(identity) => {
                info!(email = %email, identity_id = %identity.id, "identity created");
                Ok((identity, StageStatus::Ok))
            }
            Err(err) => match AccessError::from_stage(Stage::Identity, err) {
                AccessError::IdentityConflict(_) => self.recover(email, password).await,
                other => Err(other),
            },
        }
    }

    async fn recover(&self, email: &str, password: &str) -> Result<(Identity, StageStatus)> {
        info!(email = %email, "identity already registered, authenticating");
        match self.service.authenticate(email, password).await {
            Ok(identity) => {
                info!(email = %email, identity_id = %identity.id, "identity recovered");
                Ok((identity, StageStatus::RecoveredViaAuthenticate))
            }
            Err(err) => {
                warn!(email = %email, error = %err, "could not recover existing identity");
                Err(AccessError::identity_failure(format!(
                    "already registered and authentication failed: {}",
                    err
                )))
            }
        }
    }

    /// Remove an identity (cleanup tooling)
    pub async fn delete_identity(&self, id: &str) -> Result<()> {
        info!(identity_id = %id, "deleting identity");
        match self.service.delete_identity(id).await {
            Ok(()) => Ok(()),
            Err(PlatformError::NotFound(id)) => Err(AccessError::not_found(format!("identity {}", id))),
            Err(err) => Err(err.into()),
        }
    }
}
