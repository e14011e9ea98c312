//! Rule store collaborator interface
//!
//! The engine reads its active rule set through this port. The production
//! adapter lives outside this crate; an in-memory implementation is provided
//! for embedding and tests.

use std::collections::HashMap;

use crate::provider::InsuranceProvider;
use crate::rule::RejectionRule;
use core_kernel::ProviderId;

/// Read-only source of active classification rules
///
/// Implementations must hand out only rules with `active == true`, global
/// rules from `active_global_rules` and provider-specific ones from
/// `active_provider_rules`.
pub trait RuleStore: Send + Sync {
    /// Active global rules, in configured order
    fn active_global_rules(&self) -> Vec<RejectionRule>;

    /// Active provider-specific rules owned by `provider_id`
    fn active_provider_rules(&self, provider_id: ProviderId) -> Vec<RejectionRule>;
}

/// In-memory rule store backed by plain collections
#[derive(Debug, Clone, Default)]
pub struct InMemoryRuleStore {
    global_rules: Vec<RejectionRule>,
    provider_rules: HashMap<ProviderId, Vec<RejectionRule>>,
}

impl InMemoryRuleStore {
    /// Creates a store from global rules and provider metadata
    ///
    /// Inactive provider rules are dropped at construction.
    pub fn new(global_rules: Vec<RejectionRule>, providers: &[InsuranceProvider]) -> Self {
        let provider_rules = providers
            .iter()
            .map(|p| (p.id, p.active_rules().cloned().collect()))
            .collect();
        Self {
            global_rules,
            provider_rules,
        }
    }

    /// Creates a store with global rules only
    pub fn with_global_rules(global_rules: Vec<RejectionRule>) -> Self {
        Self {
            global_rules,
            provider_rules: HashMap::new(),
        }
    }
}

impl RuleStore for InMemoryRuleStore {
    fn active_global_rules(&self) -> Vec<RejectionRule> {
        self.global_rules
            .iter()
            .filter(|r| r.active && !r.provider_specific)
            .cloned()
            .collect()
    }

    fn active_provider_rules(&self, provider_id: ProviderId) -> Vec<RejectionRule> {
        self.provider_rules
            .get(&provider_id)
            .map(|rules| {
                rules
                    .iter()
                    .filter(|r| r.active && r.applies_to(provider_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::RejectionCategory;
    use crate::rule::{LocalizedText, Severity};
    use core_kernel::RuleId;

    fn rule(active: bool, provider_specific: bool, owner: Option<ProviderId>) -> RejectionRule {
        RejectionRule {
            id: RuleId::new_v7(),
            name: LocalizedText::new("Test", "اختبار"),
            description: LocalizedText::new("", ""),
            category: RejectionCategory::Technical,
            subcategory: "Documentation".to_string(),
            keywords: vec!["missing".to_string()],
            keywords_secondary: Vec::new(),
            error_codes: Vec::new(),
            severity: Severity::Medium,
            auto_fixable: false,
            fix_suggestion: None,
            provider_id: owner,
            provider_specific,
            active,
        }
    }

    #[test]
    fn test_inactive_rules_filtered() {
        let store = InMemoryRuleStore::with_global_rules(vec![
            rule(true, false, None),
            rule(false, false, None),
        ]);
        assert_eq!(store.active_global_rules().len(), 1);
    }

    #[test]
    fn test_provider_rules_scoped_to_owner() {
        let owner = ProviderId::new();
        let provider = InsuranceProvider {
            id: owner,
            name: LocalizedText::new("Clinic", "عيادة"),
            code: "CLN".to_string(),
            rules: vec![rule(true, true, Some(owner)), rule(false, true, Some(owner))],
            custom_medical_categories: Vec::new(),
            custom_technical_categories: Vec::new(),
        };
        let store = InMemoryRuleStore::new(Vec::new(), &[provider]);

        assert_eq!(store.active_provider_rules(owner).len(), 1);
        assert!(store.active_provider_rules(ProviderId::new()).is_empty());
    }
}
