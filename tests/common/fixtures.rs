//! Test fixtures and data factories

use agency_access::config::ProvisioningConfig;
use agency_access::platform::{
    DataStore, Filter, MemoryPlatform, Platform, PlatformError, PlatformResult, Record, Table,
};
use agency_access::{Provisioner, ProvisioningRequest, RoleCatalog};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Factory for provisioning requests
pub struct RequestFactory;

impl RequestFactory {
    fn unique_email(prefix: &str) -> String {
        format!("{}-{}@agency.test", prefix, &Uuid::new_v4().to_string()[..8])
    }

    pub fn owner() -> ProvisioningRequest {
        ProvisioningRequest::new(Self::unique_email("owner"), "Owner#2024", "owner")
            .with_full_name("Awa Ndiaye")
            .with_phone("+221 77 000 00 01")
    }

    pub fn manager() -> ProvisioningRequest {
        ProvisioningRequest::new(Self::unique_email("manager"), "Manager#2024", "agency_manager")
            .with_full_name("Ibrahima Fall")
    }

    pub fn employee() -> ProvisioningRequest {
        ProvisioningRequest::new(Self::unique_email("counter"), "Counter#2024", "agency_employee")
    }

    pub fn driver() -> ProvisioningRequest {
        ProvisioningRequest::new(Self::unique_email("driver"), "Driver#2024", "agency_driver")
    }
}

/// Provisioning config without batch delay
pub fn fast_config() -> ProvisioningConfig {
    ProvisioningConfig {
        batch_delay_ms: 0,
        ..Default::default()
    }
}

/// In-memory platform plus a provisioner wired to it
pub struct TestPlatform {
    pub memory: Arc<MemoryPlatform>,
    provisioner: Provisioner,
}

impl TestPlatform {
    pub fn new() -> Self {
        let memory = Arc::new(MemoryPlatform::new());
        let provisioner = Provisioner::new(
            Platform::in_memory(memory.clone()),
            Arc::new(RoleCatalog::agency_default()),
            fast_config(),
        );
        Self {
            memory,
            provisioner,
        }
    }

    /// Identity service from memory, data store failing on `tables`
    pub fn failing_on(tables: &[Table]) -> Self {
        let memory = Arc::new(MemoryPlatform::new());
        let platform = Platform {
            identity: memory.clone(),
            store: Arc::new(FailingStore::new(memory.clone(), tables)),
        };
        let provisioner = Provisioner::new(
            platform,
            Arc::new(RoleCatalog::agency_default()),
            fast_config(),
        );
        Self {
            memory,
            provisioner,
        }
    }

    pub fn provisioner(&self) -> &Provisioner {
        &self.provisioner
    }

    /// Write a raw profile row, bypassing the workflow
    pub async fn insert_profile(&self, row: Value) -> String {
        let record: Record = row.as_object().cloned().unwrap();
        let id = record["id"].as_str().unwrap().to_string();
        self.memory.upsert(Table::Profiles, record, "id").await.unwrap();
        id
    }
}

impl Default for TestPlatform {
    fn default() -> Self {
        Self::new()
    }
}

/// Data store that rejects writes to selected tables
pub struct FailingStore {
    inner: Arc<MemoryPlatform>,
    failing: HashSet<Table>,
}

impl FailingStore {
    pub fn new(inner: Arc<MemoryPlatform>, tables: &[Table]) -> Self {
        Self {
            inner,
            failing: tables.iter().copied().collect(),
        }
    }

    fn check(&self, table: Table) -> PlatformResult<()> {
        if self.failing.contains(&table) {
            return Err(PlatformError::rejected(
                403,
                format!("writes to {} are not allowed", table),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DataStore for FailingStore {
    async fn upsert(
        &self,
        table: Table,
        record: Record,
        on_conflict: &str,
    ) -> PlatformResult<Record> {
        self.check(table)?;
        self.inner.upsert(table, record, on_conflict).await
    }

    async fn insert_or_get(
        &self,
        table: Table,
        record: Record,
        on_conflict: &str,
    ) -> PlatformResult<Record> {
        self.check(table)?;
        self.inner.insert_or_get(table, record, on_conflict).await
    }

    async fn select(&self, table: Table, filter: &Filter) -> PlatformResult<Vec<Record>> {
        self.inner.select(table, filter).await
    }
}
