//! Common test utilities for agency-access
//!
//! # Usage
//!
//! ```rust
//! use crate::common::{RequestFactory, TestPlatform};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let platform = TestPlatform::new();
//!     let report = platform.provisioner().run(&RequestFactory::owner()).await.unwrap();
//!     // ...
//! }
//! ```

pub mod fixtures;

pub use fixtures::{FailingStore, RequestFactory, TestPlatform};
