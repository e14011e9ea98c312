//! Insurance provider metadata

use serde::{Deserialize, Serialize};

use crate::rule::{LocalizedText, RejectionRule};
use core_kernel::ProviderId;

/// A provider participating in the claims program
///
/// Used only for rule scoping and comparative ranking; provider lifecycle
/// management is outside this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceProvider {
    /// Unique identifier
    pub id: ProviderId,
    /// Display name
    pub name: LocalizedText,
    /// Short provider code
    pub code: String,
    /// Provider-specific classification rules
    pub rules: Vec<RejectionRule>,
    /// Custom medical category labels configured for this provider
    pub custom_medical_categories: Vec<String>,
    /// Custom technical category labels configured for this provider
    pub custom_technical_categories: Vec<String>,
}

impl InsuranceProvider {
    /// Creates a provider with no custom rules or categories
    pub fn new(id: ProviderId, name: LocalizedText, code: impl Into<String>) -> Self {
        Self {
            id,
            name,
            code: code.into(),
            rules: Vec::new(),
            custom_medical_categories: Vec::new(),
            custom_technical_categories: Vec::new(),
        }
    }

    /// The provider's active provider-specific rules
    pub fn active_rules(&self) -> impl Iterator<Item = &RejectionRule> {
        self.rules.iter().filter(|r| r.active)
    }
}
