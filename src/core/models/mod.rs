//! Core data models for the access core

pub mod account;
pub mod organization;

pub use account::*;
pub use organization::*;

pub(crate) fn default_true() -> bool {
    true
}
