//! Profile, organization and capability record operations

use super::types::Stage;
use crate::config::CapabilityTemplate;
use crate::core::models::{Capability, Organization, ProfileRecord};
use crate::platform::{DataStore, Filter, Table, from_record, to_record};
use crate::utils::error::{AccessError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Record operations against the data store
pub struct RecordOperations {
    store: Arc<dyn DataStore>,
}

impl RecordOperations {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Upsert a profile keyed by identity id
    pub async fn upsert_profile(&self, profile: &ProfileRecord) -> Result<ProfileRecord> {
        let stage = |e| AccessError::from_stage(Stage::Profile, e);
        let record = to_record(profile).map_err(stage)?;
        let row = self
            .store
            .upsert(Table::Profiles, record, "id")
            .await
            .map_err(stage)?;
        debug!(identity_id = %profile.id, "profile upserted");
        from_record(row).map_err(stage)
    }

    /// Create the owner's organization unless one exists.
    ///
    /// The stored row wins: concurrent runs for the same owner all end up with
    /// the id of whichever row was inserted first, and an existing row is
    /// never modified.
    pub async fn ensure_organization(
        &self,
        owner_id: &str,
        name: &str,
        contact_email: Option<String>,
        contact_phone: Option<String>,
    ) -> Result<Organization> {
        let stage = |e| AccessError::from_stage(Stage::Organization, e);

        let candidate = Organization::for_owner(
            Uuid::new_v4().to_string(),
            owner_id,
            name,
            contact_email,
            contact_phone,
        );
        let record = to_record(&candidate).map_err(stage)?;
        let row = self
            .store
            .insert_or_get(Table::Organizations, record, "owner_id")
            .await
            .map_err(stage)?;
        let organization: Organization = from_record(row).map_err(stage)?;

        if organization.id == candidate.id {
            info!(organization_id = %organization.id, owner_id = %owner_id, "organization created");
        } else {
            debug!(organization_id = %organization.id, "reusing existing organization");
        }
        Ok(organization)
    }

    /// Insert default capabilities whose kind is not present yet.
    ///
    /// Capability ids are derived from organization and kind, so a kind is
    /// stored at most once per organization. Returns the number of rows
    /// inserted.
    pub async fn attach_capabilities(
        &self,
        organization_id: &str,
        templates: &[CapabilityTemplate],
    ) -> Result<usize> {
        let stage = |e| AccessError::from_stage(Stage::Capabilities, e);

        let rows = self
            .store
            .select(
                Table::Capabilities,
                &Filter::new().eq("organization_id", organization_id),
            )
            .await
            .map_err(stage)?;
        let present: HashSet<String> = rows
            .into_iter()
            .filter_map(|row| row.get("kind").and_then(|k| k.as_str()).map(str::to_string))
            .collect();

        let mut inserted = 0;
        for template in templates.iter().filter(|t| !present.contains(&t.kind)) {
            let capability = Capability {
                id: capability_id(organization_id, &template.kind),
                organization_id: organization_id.to_string(),
                kind: template.kind.clone(),
                value: template.value.clone(),
            };
            let record = to_record(&capability).map_err(stage)?;
            let row = self
                .store
                .insert_or_get(Table::Capabilities, record.clone(), "id")
                .await
                .map_err(stage)?;
            if row == record {
                inserted += 1;
            }
        }

        debug!(organization_id = %organization_id, inserted, "capabilities attached");
        Ok(inserted)
    }

    /// Profile row for an identity
    pub async fn load_profile(&self, id: &str) -> Result<Option<ProfileRecord>> {
        let rows = self
            .store
            .select(Table::Profiles, &Filter::new().eq("id", id))
            .await?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(from_record(row)?)),
            None => Ok(None),
        }
    }

    /// Organization owned by an account
    pub async fn load_organization(&self, owner_id: &str) -> Result<Option<Organization>> {
        let rows = self
            .store
            .select(Table::Organizations, &Filter::new().eq("owner_id", owner_id))
            .await?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(from_record(row)?)),
            None => Ok(None),
        }
    }
}

/// Stable capability id for an organization and kind
pub(crate) fn capability_id(organization_id: &str, kind: &str) -> String {
    let name = format!("{}/{}", organization_id, kind);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}
