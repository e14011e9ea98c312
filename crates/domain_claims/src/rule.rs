//! Rejection rules and severity

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::claim::RejectionCategory;
use core_kernel::{ProviderId, Rate, RuleId};

/// Severity of the problem a rule describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Fixed recovery rate applied to matched amounts of auto-fixable rules
    pub fn recovery_rate(&self) -> Rate {
        match self {
            Severity::Critical => Rate::new(dec!(0.8)),
            Severity::High => Rate::new(dec!(0.6)),
            Severity::Medium => Rate::new(dec!(0.4)),
            Severity::Low => Rate::new(dec!(0.2)),
        }
    }
}

/// Bilingual display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub ar: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }
}

/// A configured classification rule
///
/// Rules are immutable inputs within one analysis run; their lifecycle
/// (versioning, CRUD) lives in the external rule store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionRule {
    /// Unique identifier
    pub id: RuleId,
    /// Display name
    pub name: LocalizedText,
    /// Longer description
    pub description: LocalizedText,
    /// Cause family this rule maps to
    pub category: RejectionCategory,
    /// Subcategory label
    pub subcategory: String,
    /// Primary keyword list
    pub keywords: Vec<String>,
    /// Secondary keyword list; merged with `keywords` for matching
    pub keywords_secondary: Vec<String>,
    /// Payer error codes associated with this cause
    pub error_codes: Vec<String>,
    /// Severity
    pub severity: Severity,
    /// Whether the cause is fixable without clinical review
    pub auto_fixable: bool,
    /// Suggested corrective action
    pub fix_suggestion: Option<String>,
    /// Owning provider, for provider-specific rules
    pub provider_id: Option<ProviderId>,
    /// True when the rule only applies to the owning provider's claims
    pub provider_specific: bool,
    /// Active flag; the rule store only hands out active rules
    pub active: bool,
}

impl RejectionRule {
    /// The two keyword lists treated as one merged set for matching
    pub fn merged_keywords(&self) -> impl Iterator<Item = &String> {
        self.keywords.iter().chain(self.keywords_secondary.iter())
    }

    /// Total keyword count across both lists
    pub fn keyword_count(&self) -> usize {
        self.keywords.len() + self.keywords_secondary.len()
    }

    /// Whether this rule may be applied to a claim from `provider_id`
    ///
    /// Provider-specific rules only apply to claims whose provider matches
    /// the rule's owner; global rules apply to everyone.
    pub fn applies_to(&self, provider_id: ProviderId) -> bool {
        if !self.provider_specific {
            return true;
        }
        self.provider_id == Some(provider_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rule() -> RejectionRule {
        RejectionRule {
            id: RuleId::new_v7(),
            name: LocalizedText::new("Missing Documentation", "وثائق ناقصة"),
            description: LocalizedText::new("Required documents absent", "المستندات المطلوبة غائبة"),
            category: RejectionCategory::Technical,
            subcategory: "Documentation".to_string(),
            keywords: vec!["missing documentation".to_string()],
            keywords_secondary: vec!["incomplete file".to_string()],
            error_codes: vec!["DOC-01".to_string()],
            severity: Severity::High,
            auto_fixable: true,
            fix_suggestion: Some("Attach the missing documents and resubmit".to_string()),
            provider_id: None,
            provider_specific: false,
            active: true,
        }
    }

    #[test]
    fn test_merged_keywords() {
        let rule = sample_rule();
        let merged: Vec<&String> = rule.merged_keywords().collect();
        assert_eq!(merged.len(), 2);
        assert_eq!(rule.keyword_count(), 2);
    }

    #[test]
    fn test_global_rule_applies_to_any_provider() {
        let rule = sample_rule();
        assert!(rule.applies_to(ProviderId::new()));
    }

    #[test]
    fn test_provider_specific_rule_scoping() {
        let owner = ProviderId::new();
        let mut rule = sample_rule();
        rule.provider_specific = true;
        rule.provider_id = Some(owner);

        assert!(rule.applies_to(owner));
        assert!(!rule.applies_to(ProviderId::new()));
    }

    #[test]
    fn test_recovery_rates() {
        use rust_decimal_macros::dec;
        assert_eq!(Severity::Critical.recovery_rate().as_decimal(), dec!(0.8));
        assert_eq!(Severity::High.recovery_rate().as_decimal(), dec!(0.6));
        assert_eq!(Severity::Medium.recovery_rate().as_decimal(), dec!(0.4));
        assert_eq!(Severity::Low.recovery_rate().as_decimal(), dec!(0.2));
    }
}
