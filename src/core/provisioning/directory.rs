//! Loading accounts for role resolution

use super::record_ops::RecordOperations;
use crate::auth::rbac::Role;
use crate::auth::resolver::{Resolution, RoleResolver};
use crate::core::models::{Account, RoleIndicators};
use crate::platform::DataStore;
use crate::utils::error::{AccessError, Result};
use std::sync::Arc;
use tracing::debug;

/// Reads accounts and their raw role indicators from the data store
pub struct AccountDirectory {
    records: RecordOperations,
    resolver: RoleResolver,
}

impl AccountDirectory {
    pub fn new(store: Arc<dyn DataStore>, resolver: RoleResolver) -> Self {
        Self {
            records: RecordOperations::new(store),
            resolver,
        }
    }

    /// Load an account by identity id
    pub async fn load(&self, identity_id: &str) -> Result<Account> {
        let profile = self
            .records
            .load_profile(identity_id)
            .await?
            .ok_or_else(|| AccessError::not_found(format!("profile {}", identity_id)))?;
        let owns_organization = self.records.load_organization(identity_id).await?.is_some();

        debug!(identity_id = %identity_id, owns_organization, "account loaded");
        Ok(Account::from_profile(profile, owns_organization))
    }

    /// Role signals currently stored for an identity.
    ///
    /// Unlike [`load`](Self::load) a missing profile is not an error; it just
    /// contributes no tag.
    pub async fn indicators(&self, identity_id: &str) -> Result<RoleIndicators> {
        let profile = self.records.load_profile(identity_id).await?;
        let owns_organization = self.records.load_organization(identity_id).await?.is_some();
        Ok(RoleIndicators {
            owns_organization,
            role: profile.as_ref().and_then(|p| p.role.clone()),
            employee_role: profile.and_then(|p| p.employee_role),
        })
    }

    /// Load an account and resolve its canonical role
    pub async fn resolve(&self, identity_id: &str) -> Result<(Account, Resolution)> {
        let account = self.load(identity_id).await?;
        let resolution = self.resolver.explain(&account.indicators);
        Ok((account, resolution))
    }

    /// Canonical role of an identity
    pub async fn role_of(&self, identity_id: &str) -> Result<Role> {
        Ok(self.resolve(identity_id).await?.1.role)
    }
}
