//! # agency-access
//!
//! Authorization and account-provisioning core for a bus-agency operations
//! dashboard.
//!
//! ## Features
//!
//! - **Role Catalog**: four agency roles with visible areas, a closed-world
//!   permission matrix and a one-directional creation hierarchy
//! - **Role Resolver**: reconciles organization ownership, profile role tags
//!   and legacy employee roles into one canonical role
//! - **Permission Gate**: view/perform checks and guards for conditional
//!   rendering and action enabling
//! - **Provisioning**: create-or-reuse identity, profile, organization and
//!   default capabilities against a platform without cross-call transactions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agency_access::{AccessCore, Config, ProvisioningRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/agency.yaml").await?;
//!     let core = AccessCore::new(config)?;
//!
//!     let request = ProvisioningRequest::new("owner@agency.test", "change-me", "owner")
//!         .with_full_name("Awa Ndiaye");
//!     let report = core.provisioner().run(&request).await?;
//!     println!("{}: {}", report.email, report.summary());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod core;
pub mod platform;
pub mod utils;

// Re-export main types
pub use auth::{
    Action, Area, ControlState, Guard, Module, PermissionGate, Requirement, Role, RoleCatalog,
    RoleResolver,
};
pub use config::Config;
pub use crate::core::models::{Account, RoleIndicators};
pub use crate::core::provisioning::{
    AccountDirectory, Provisioner, ProvisioningReport, ProvisioningRequest, ProvisioningState,
    Stage, StageOutcome, StageStatus,
};
pub use platform::{DataStore, IdentityService, MemoryPlatform, Platform};
pub use utils::error::{AccessError, Result};

use std::sync::Arc;
use tracing::info;

/// Wired access core: one shared catalog, a gate and a provisioner
pub struct AccessCore {
    config: Config,
    gate: PermissionGate,
    provisioner: Provisioner,
}

impl AccessCore {
    /// Connect to the configured platform with the default agency catalog
    pub fn new(config: Config) -> Result<Self> {
        let platform = Platform::connect(config.platform())?;
        Ok(Self::with_platform(config, platform, Arc::new(RoleCatalog::agency_default())))
    }

    /// Build over an already connected platform and catalog
    pub fn with_platform(config: Config, platform: Platform, catalog: Arc<RoleCatalog>) -> Self {
        info!(roles = catalog.list_roles().len(), "creating access core");
        let gate = PermissionGate::new(Arc::clone(&catalog));
        let provisioner = Provisioner::new(platform, catalog, config.provisioning().clone());
        Self {
            config,
            gate,
            provisioner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    pub fn provisioner(&self) -> &Provisioner {
        &self.provisioner
    }

    pub fn directory(&self) -> AccountDirectory {
        self.provisioner.directory()
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
