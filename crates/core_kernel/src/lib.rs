//! Core Kernel - Foundational types for the claims analytics engine
//!
//! This crate provides the fundamental building blocks used across all domain
//! modules:
//! - Money and Rate types with precise decimal arithmetic
//! - Strongly-typed identifiers

pub mod identifiers;
pub mod money;

pub use identifiers::{AnalysisId, ClaimId, ProviderId, RuleId};
pub use money::{Currency, Money, MoneyError, Rate};
