//! External identity and data platform
//!
//! The workflow only depends on the call contract below. The hosted platform
//! offers no transaction spanning several calls, so callers must treat every
//! call as independently committed.

mod http;
mod memory;
mod types;

pub use http::HttpPlatform;
pub use memory::MemoryPlatform;
pub use types::{
    Filter, Identity, PlatformError, PlatformResult, Record, Table, from_record, to_record,
};

use crate::config::{PlatformBackend, PlatformConfig};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Identity service contract
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Create an identity; an existing email yields [`PlatformError::AlreadyRegistered`]
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        metadata: Record,
    ) -> PlatformResult<Identity>;

    /// Sign in with credentials, returning the existing identity
    async fn authenticate(&self, email: &str, password: &str) -> PlatformResult<Identity>;

    /// Delete an identity. Privileged; cleanup tooling only.
    async fn delete_identity(&self, id: &str) -> PlatformResult<()>;
}

/// Table-oriented data store contract
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Insert or merge a record, matching existing rows on `on_conflict`
    async fn upsert(&self, table: Table, record: Record, on_conflict: &str)
    -> PlatformResult<Record>;

    /// Insert a record unless a row with the same `on_conflict` value exists.
    ///
    /// Returns the stored row either way; an existing row is never modified.
    async fn insert_or_get(
        &self,
        table: Table,
        record: Record,
        on_conflict: &str,
    ) -> PlatformResult<Record>;

    /// Rows matching the filter
    async fn select(&self, table: Table, filter: &Filter) -> PlatformResult<Vec<Record>>;
}

/// Connected platform handles
#[derive(Clone)]
pub struct Platform {
    pub identity: Arc<dyn IdentityService>,
    pub store: Arc<dyn DataStore>,
}

impl Platform {
    /// Connect to the configured backend
    pub fn connect(config: &PlatformConfig) -> Result<Self> {
        match config.backend {
            PlatformBackend::Http => {
                info!(url = %config.url, "using HTTP platform backend");
                let http = Arc::new(HttpPlatform::new(config)?);
                Ok(Self {
                    identity: http.clone(),
                    store: http,
                })
            }
            PlatformBackend::Memory => {
                info!("using in-memory platform backend");
                Ok(Self::in_memory(Arc::new(MemoryPlatform::new())))
            }
        }
    }

    /// Share one in-memory platform between both roles
    pub fn in_memory(memory: Arc<MemoryPlatform>) -> Self {
        Self {
            identity: memory.clone(),
            store: memory,
        }
    }
}
