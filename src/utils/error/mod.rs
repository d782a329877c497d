//! Error handling for the access core
//!
//! This module defines the error taxonomy shared by the catalog, the resolver
//! and the provisioning workflow.

mod conversions;
mod helpers;
mod types;

pub use types::{AccessError, Result};
