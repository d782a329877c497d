//! Account provisioning
//!
//! Creates or reuses an identity, then writes the profile, the owner's
//! organization and its default capabilities.

mod directory;
mod identity_ops;
mod manager;
mod record_ops;
mod types;

pub use directory::AccountDirectory;
pub use manager::Provisioner;
pub use types::{
    ProvisioningReport, ProvisioningRequest, ProvisioningState, Stage, StageOutcome, StageStatus,
};
