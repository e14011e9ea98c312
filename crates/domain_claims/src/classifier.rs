//! Rejection classifier
//!
//! Matches a claim's rejection narrative and codes against the active rule
//! set. Rules are tried in a fixed order (global rules first, then the
//! claim's provider-specific rules); the first rule reaching the
//! classification threshold wins, so ordering acts as the tie-break.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::claim::RejectionCategory;
use crate::rule::RejectionRule;
use crate::store::RuleStore;
use core_kernel::{ProviderId, RuleId};

/// Minimum match score for a rule to classify a claim
pub const CLASSIFICATION_THRESHOLD: f64 = 0.7;

/// Weight of the keyword overlap component
const KEYWORD_WEIGHT: f64 = 0.7;

/// Weight of the error-code overlap component
const CODE_WEIGHT: f64 = 0.3;

/// Confidence assigned when only the fallback dictionary matched
const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Indicators that push an unmatched rejection toward the medical family
static MEDICAL_INDICATORS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "medical necessity",
        "diagnosis",
        "clinical",
        "treatment",
        "physician",
        "medication",
    ]
});

/// Indicators that push an unmatched rejection toward the technical family
static TECHNICAL_INDICATORS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "data", "code", "billing", "missing", "format", "invalid", "expired",
    ]
});

/// Category assigned by classification
///
/// `Unknown` is a classifier outcome only; classified claims carry a
/// [`RejectionCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimCategory {
    Medical,
    Technical,
    Unknown,
}

impl From<RejectionCategory> for ClaimCategory {
    fn from(category: RejectionCategory) -> Self {
        match category {
            RejectionCategory::Medical => ClaimCategory::Medical,
            RejectionCategory::Technical => ClaimCategory::Technical,
        }
    }
}

impl ClaimCategory {
    /// Converts back to a claim-level category, when known
    pub fn as_rejection_category(&self) -> Option<RejectionCategory> {
        match self {
            ClaimCategory::Medical => Some(RejectionCategory::Medical),
            ClaimCategory::Technical => Some(RejectionCategory::Technical),
            ClaimCategory::Unknown => None,
        }
    }
}

/// Outcome of classifying one rejection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub category: ClaimCategory,
    pub subcategory: String,
    pub confidence: f64,
    pub matched_rule: Option<RuleId>,
}

/// Blended 0..=1 match score between a rejection and a rule
///
/// Keyword overlap contributes up to 0.7 (matched over total across the
/// merged keyword list), error-code overlap up to 0.3. A claim code matches
/// a rule code when either contains the other, so "DOC-01-A" still matches
/// "DOC-01". Empty keyword or code lists contribute 0 rather than dividing
/// by zero.
pub fn match_score(reason: &str, codes: &[String], rule: &RejectionRule) -> f64 {
    let reason = reason.to_lowercase();

    let keyword_total = rule.keyword_count();
    let keyword_score = if keyword_total == 0 {
        0.0
    } else {
        let matched = rule
            .merged_keywords()
            .filter(|k| !k.trim().is_empty() && reason.contains(&k.to_lowercase()))
            .count();
        matched as f64 / keyword_total as f64 * KEYWORD_WEIGHT
    };

    let code_total = rule.error_codes.len();
    let code_score = if code_total == 0 {
        0.0
    } else {
        let matched = rule
            .error_codes
            .iter()
            .filter(|rule_code| {
                let rule_code = rule_code.to_lowercase();
                codes.iter().any(|claim_code| {
                    let claim_code = claim_code.to_lowercase();
                    claim_code.contains(&rule_code) || rule_code.contains(&claim_code)
                })
            })
            .count();
        matched as f64 / code_total as f64 * CODE_WEIGHT
    };

    (keyword_score + code_score).min(1.0)
}

/// Classifies one rejection against the active rule set
///
/// Global rules are tried first, then the provider's own rules when a
/// provider id is given. Falls back to the fixed indicator dictionaries
/// when no rule reaches [`CLASSIFICATION_THRESHOLD`].
pub fn classify(
    reason: &str,
    codes: &[String],
    provider_id: Option<ProviderId>,
    store: &dyn RuleStore,
) -> Classification {
    let mut rules = store.active_global_rules();
    if let Some(provider_id) = provider_id {
        rules.extend(store.active_provider_rules(provider_id));
    }

    for rule in &rules {
        let score = match_score(reason, codes, rule);
        if score >= CLASSIFICATION_THRESHOLD {
            tracing::debug!(rule = %rule.id, score, "rule classified rejection");
            return Classification {
                category: rule.category.into(),
                subcategory: rule.subcategory.clone(),
                confidence: score,
                matched_rule: Some(rule.id),
            };
        }
    }

    classify_by_indicators(reason)
}

/// Keyword-dictionary fallback used when no rule is confident enough
fn classify_by_indicators(reason: &str) -> Classification {
    let reason = reason.to_lowercase();

    if MEDICAL_INDICATORS.iter().any(|k| reason.contains(k)) {
        return Classification {
            category: ClaimCategory::Medical,
            subcategory: "Medical Review Required".to_string(),
            confidence: FALLBACK_CONFIDENCE,
            matched_rule: None,
        };
    }

    if TECHNICAL_INDICATORS.iter().any(|k| reason.contains(k)) {
        return Classification {
            category: ClaimCategory::Technical,
            subcategory: "Data/System Issue".to_string(),
            confidence: FALLBACK_CONFIDENCE,
            matched_rule: None,
        };
    }

    Classification {
        category: ClaimCategory::Unknown,
        subcategory: "Unclassified".to_string(),
        confidence: FALLBACK_CONFIDENCE,
        matched_rule: None,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::rule::{LocalizedText, Severity};
    use crate::store::InMemoryRuleStore;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn match_score_stays_in_unit_interval(
            reason in ".{0,80}",
            keywords in proptest::collection::vec("[a-z]{1,10}", 0..5),
            codes in proptest::collection::vec("[A-Z0-9-]{1,8}", 0..4)
        ) {
            let rule = RejectionRule {
                id: RuleId::new_v7(),
                name: LocalizedText::new("p", "p"),
                description: LocalizedText::new("", ""),
                category: RejectionCategory::Technical,
                subcategory: "x".to_string(),
                keywords,
                keywords_secondary: Vec::new(),
                error_codes: codes.clone(),
                severity: Severity::Low,
                auto_fixable: false,
                fix_suggestion: None,
                provider_id: None,
                provider_specific: false,
                active: true,
            };
            let score = match_score(&reason, &codes, &rule);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn classify_always_returns_known_category(reason in ".{0,120}") {
            let store = InMemoryRuleStore::default();
            let result = classify(&reason, &[], None, &store);
            prop_assert!(matches!(
                result.category,
                ClaimCategory::Medical | ClaimCategory::Technical | ClaimCategory::Unknown
            ));
        }
    }
}
