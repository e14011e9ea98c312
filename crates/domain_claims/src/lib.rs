//! Claims Domain
//!
//! This crate implements the claim/rule/provider data model, the rejection
//! classifier, and the rule impact analyzer.
//!
//! # Data flow
//!
//! ```text
//! Rule Store -> Classifier -> classified claims -> Impact Analysis
//! ```

pub mod claim;
pub mod classifier;
pub mod error;
pub mod impact;
pub mod provider;
pub mod rule;
pub mod store;

pub use claim::{Claim, ClaimStatus, RejectionCategory};
pub use classifier::{classify, match_score, ClaimCategory, Classification};
pub use error::ClaimError;
pub use impact::{
    analyze_impact, derive_training_suggestions, RejectionAnalysis, SuggestionPriority,
    TrainingSuggestion,
};
pub use provider::InsuranceProvider;
pub use rule::{LocalizedText, RejectionRule, Severity};
pub use store::{InMemoryRuleStore, RuleStore};
