//! In-process platform backend
//!
//! Holds identities and table rows in memory behind `parking_lot` locks. Not
//! durable. Used for dry runs and tests; it follows the same conflict and
//! upsert rules as the hosted backend.

use super::types::{Filter, Identity, PlatformError, PlatformResult, Record, Table};
use super::{DataStore, IdentityService};
use crate::utils::normalize_email;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredIdentity {
    identity: Identity,
    password: String,
    metadata: Record,
}

/// In-memory identity service and data store
#[derive(Debug, Default)]
pub struct MemoryPlatform {
    /// Keyed by normalized email
    identities: RwLock<HashMap<String, StoredIdentity>>,
    tables: RwLock<HashMap<Table, Vec<Record>>>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered identities
    pub fn identity_count(&self) -> usize {
        self.identities.read().len()
    }

    /// Metadata stored with an identity
    pub fn identity_metadata(&self, email: &str) -> Option<Record> {
        self.identities
            .read()
            .get(&normalize_email(email))
            .map(|stored| stored.metadata.clone())
    }

    /// Snapshot of all rows in a table
    pub fn rows(&self, table: Table) -> Vec<Record> {
        self.tables.read().get(&table).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl IdentityService for MemoryPlatform {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        metadata: Record,
    ) -> PlatformResult<Identity> {
        let key = normalize_email(email);
        let mut identities = self.identities.write();
        if identities.contains_key(&key) {
            return Err(PlatformError::AlreadyRegistered(key));
        }

        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: key.clone(),
        };
        identities.insert(
            key,
            StoredIdentity {
                identity: identity.clone(),
                password: password.to_string(),
                metadata,
            },
        );
        debug!(identity_id = %identity.id, "memory identity created");
        Ok(identity)
    }

    async fn authenticate(&self, email: &str, password: &str) -> PlatformResult<Identity> {
        let key = normalize_email(email);
        match self.identities.read().get(&key) {
            Some(stored) if stored.password == password => Ok(stored.identity.clone()),
            _ => Err(PlatformError::InvalidCredentials(key)),
        }
    }

    async fn delete_identity(&self, id: &str) -> PlatformResult<()> {
        let mut identities = self.identities.write();
        let before = identities.len();
        identities.retain(|_, stored| stored.identity.id != id);
        if identities.len() == before {
            return Err(PlatformError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn conflict_key(table: Table, record: &Record, on_conflict: &str) -> PlatformResult<Value> {
    record.get(on_conflict).cloned().ok_or_else(|| {
        PlatformError::rejected(
            400,
            format!("{} row is missing conflict column '{}'", table, on_conflict),
        )
    })
}

#[async_trait]
impl DataStore for MemoryPlatform {
    async fn upsert(
        &self,
        table: Table,
        record: Record,
        on_conflict: &str,
    ) -> PlatformResult<Record> {
        let key = conflict_key(table, &record, on_conflict)?;

        let mut tables = self.tables.write();
        let rows = tables.entry(table).or_default();
        match rows.iter_mut().find(|row| row.get(on_conflict) == Some(&key)) {
            Some(existing) => {
                for (column, value) in record {
                    existing.insert(column, value);
                }
                Ok(existing.clone())
            }
            None => {
                rows.push(record.clone());
                Ok(record)
            }
        }
    }

    async fn insert_or_get(
        &self,
        table: Table,
        record: Record,
        on_conflict: &str,
    ) -> PlatformResult<Record> {
        let key = conflict_key(table, &record, on_conflict)?;

        let mut tables = self.tables.write();
        let rows = tables.entry(table).or_default();
        if let Some(existing) = rows.iter().find(|row| row.get(on_conflict) == Some(&key)) {
            return Ok(existing.clone());
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn select(&self, table: Table, filter: &Filter) -> PlatformResult<Vec<Record>> {
        Ok(self
            .tables
            .read()
            .get(&table)
            .map(|rows| rows.iter().filter(|row| filter.matches(row)).cloned().collect())
            .unwrap_or_default())
    }
}
