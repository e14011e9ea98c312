//! Rule impact analysis
//!
//! Aggregates how many rejected claims each active rule explains, estimates
//! the recoverable amount for auto-fixable causes, and derives training
//! suggestions from the match pattern.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::claim::{Claim, RejectionCategory};
use crate::classifier::match_score;
use crate::rule::{RejectionRule, Severity};
use core_kernel::{ClaimId, Currency, Money, RuleId};

/// Minimum match score for a claim to count toward a rule's impact
///
/// Looser than the classification threshold so impact analysis surfaces
/// more candidate matches than single-best-rule classification. Exclusive:
/// a score of exactly 0.6 does not match.
pub const IMPACT_THRESHOLD: f64 = 0.6;

/// Maximum number of training suggestions emitted per run
const MAX_SUGGESTIONS: usize = 10;

/// Medical match count above which a clinical-review suggestion is emitted
const MEDICAL_PATTERN_THRESHOLD: usize = 5;

/// Impact of one rule across the rejected claim set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionAnalysis {
    pub rule_id: RuleId,
    pub rule_name: String,
    pub category: RejectionCategory,
    pub severity: Severity,
    pub matched_claims: Vec<ClaimId>,
    /// Mean match score across the matched claims
    pub confidence: f64,
    pub suggested_action: String,
    /// Zero unless the rule is auto-fixable
    pub estimated_savings: Money,
}

impl RejectionAnalysis {
    /// Combined impact used for ranking: savings scaled by match count
    pub fn combined_impact(&self) -> Decimal {
        self.estimated_savings.amount() * Decimal::from(self.matched_claims.len())
    }
}

/// Priority of a training suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    High,
    Medium,
    Low,
}

/// A provider-training suggestion derived from the match pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSuggestion {
    pub priority: SuggestionPriority,
    pub topic: String,
    pub detail: String,
}

/// Ranks active rules by estimated financial impact over the rejected claims
///
/// A claim counts toward a rule when the rule's provider scope admits it and
/// the match score exceeds [`IMPACT_THRESHOLD`]. Rules with no matches are
/// omitted. Output is ordered descending by combined impact (savings ×
/// matches); the sort is stable, so equal-impact rules keep input order.
pub fn analyze_impact(rejected_claims: &[Claim], rules: &[RejectionRule]) -> Vec<RejectionAnalysis> {
    let mut analyses: Vec<RejectionAnalysis> = rules
        .iter()
        .filter_map(|rule| analyze_rule(rejected_claims, rule))
        .collect();

    analyses.sort_by(|a, b| b.combined_impact().cmp(&a.combined_impact()));
    analyses
}

fn analyze_rule(rejected_claims: &[Claim], rule: &RejectionRule) -> Option<RejectionAnalysis> {
    let mut matched_claims = Vec::new();
    let mut score_sum = 0.0;
    let mut matched_total = Money::zero(
        rejected_claims
            .first()
            .map(|c| c.amount.currency())
            .unwrap_or(Currency::SAR),
    );

    for claim in rejected_claims {
        if !rule.applies_to(claim.provider_id) {
            continue;
        }
        let reason = claim.rejection_reason.as_deref().unwrap_or("");
        let score = match_score(reason, &claim.codes(), rule);
        if score > IMPACT_THRESHOLD {
            // Claims in a different currency than the aggregate are skipped
            // rather than aborting the run
            let Ok(total) = matched_total.checked_add(&claim.amount) else {
                continue;
            };
            matched_claims.push(claim.id);
            score_sum += score;
            matched_total = total;
        }
    }

    if matched_claims.is_empty() {
        return None;
    }

    let confidence = score_sum / matched_claims.len() as f64;
    let estimated_savings = if rule.auto_fixable {
        rule.severity.recovery_rate().apply(&matched_total)
    } else {
        Money::zero(matched_total.currency())
    };

    Some(RejectionAnalysis {
        rule_id: rule.id,
        rule_name: rule.name.en.clone(),
        category: rule.category,
        severity: rule.severity,
        matched_claims,
        confidence,
        suggested_action: rule
            .fix_suggestion
            .clone()
            .unwrap_or_else(|| format!("Review claims rejected under '{}'", rule.name.en)),
        estimated_savings,
    })
}

/// Derives provider-training suggestions from rule impact analyses
///
/// One high-priority suggestion per critical/high-severity rule, plus
/// pattern-level suggestions when technical matches outnumber medical ones
/// and when medical matches exceed a fixed count. Capped at ten, highest
/// priority first.
pub fn derive_training_suggestions(analyses: &[RejectionAnalysis]) -> Vec<TrainingSuggestion> {
    let mut suggestions = Vec::new();

    for analysis in analyses {
        if matches!(analysis.severity, Severity::Critical | Severity::High) {
            suggestions.push(TrainingSuggestion {
                priority: SuggestionPriority::High,
                topic: analysis.rule_name.clone(),
                detail: analysis.suggested_action.clone(),
            });
        }
    }

    let technical_matches: usize = analyses
        .iter()
        .filter(|a| a.category == RejectionCategory::Technical)
        .map(|a| a.matched_claims.len())
        .sum();
    let medical_matches: usize = analyses
        .iter()
        .filter(|a| a.category == RejectionCategory::Medical)
        .map(|a| a.matched_claims.len())
        .sum();

    if technical_matches > medical_matches {
        suggestions.push(TrainingSuggestion {
            priority: SuggestionPriority::Medium,
            topic: "Data entry and billing procedures".to_string(),
            detail: "Technical rejections outnumber medical ones; focus training on \
                     submission data quality"
                .to_string(),
        });
    }

    if medical_matches > MEDICAL_PATTERN_THRESHOLD {
        suggestions.push(TrainingSuggestion {
            priority: SuggestionPriority::Medium,
            topic: "Clinical documentation".to_string(),
            detail: "Recurring medical-necessity rejections; review documentation of \
                     diagnoses and treatment plans"
                .to_string(),
        });
    }

    suggestions.sort_by_key(|s| s.priority);
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
