//! Test Utilities Crate
//!
//! Shared test infrastructure for the claims analytics test suite.
//!
//! # Modules
//!
//! - `builders`: Builder patterns for test claims and rules
//! - `fixtures`: Pre-built data sets for common scenarios

pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
