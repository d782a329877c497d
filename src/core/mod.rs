//! Core functionality for the access core
//!
//! Account models and the provisioning workflow.

pub mod models;
pub mod provisioning;

pub use models::{Account, Capability, Organization, ProfileRecord, RoleIndicators};
pub use provisioning::{AccountDirectory, Provisioner, ProvisioningReport, ProvisioningRequest};
