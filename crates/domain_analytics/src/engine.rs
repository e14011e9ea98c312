//! Analysis orchestration
//!
//! One engine run classifies every unclassified rejected claim, then
//! computes the impact, statistical, trend, comparative, and predictive
//! summaries as a single consistent snapshot. Runs are synchronous and
//! pure apart from the set-only classification mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::comparative::{ComparativeAnalyzer, ComparativeSummary};
use crate::error::AnalyticsError;
use crate::predictive::{analyze_predictions, PredictionSummary};
use crate::statistics::{analyze_statistics, StatisticalSummary};
use crate::trends::{TrendAnalyzer, TrendSummary};
use core_kernel::AnalysisId;
use domain_claims::{
    analyze_impact, classify, derive_training_suggestions, Claim, RejectionAnalysis,
    RejectionRule, RuleStore, TrainingSuggestion,
};

/// Complete output of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: AnalysisId,
    pub generated_at: DateTime<Utc>,
    pub rule_impacts: Vec<RejectionAnalysis>,
    pub training_suggestions: Vec<TrainingSuggestion>,
    pub statistics: StatisticalSummary,
    pub trends: TrendSummary,
    pub comparisons: ComparativeSummary,
    pub predictions: PredictionSummary,
}

/// Stateless analysis engine
///
/// Rule and provider inputs are passed per call rather than held as global
/// state, so parallel runs over different datasets cannot interfere.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    as_of: DateTime<Utc>,
}

impl AnalyticsEngine {
    /// Engine anchored at the current time
    pub fn new() -> Self {
        Self { as_of: Utc::now() }
    }

    /// Engine anchored at a fixed point, for reproducible runs
    pub fn at(as_of: DateTime<Utc>) -> Self {
        Self { as_of }
    }

    /// Runs a full analysis over the claim set
    ///
    /// Rejected claims without a category are classified first; the
    /// category/subcategory assignment is the only mutation performed.
    /// Claims failing validation, and claims whose currency differs from
    /// the first valid claim's, are skipped from aggregates with a
    /// warning. An empty (or fully invalid) claim set is an error.
    pub fn run(
        &self,
        claims: &mut [Claim],
        store: &dyn RuleStore,
    ) -> Result<AnalysisResult, AnalyticsError> {
        for claim in claims.iter_mut() {
            if claim.validate().is_err() {
                continue;
            }
            if claim.is_rejected() && claim.rejection_category.is_none() {
                let reason = claim.rejection_reason.clone().unwrap_or_default();
                let classification = classify(&reason, &claim.codes(), Some(claim.provider_id), store);
                if let Some(category) = classification.category.as_rejection_category() {
                    claim.set_classification(category, classification.subcategory)?;
                }
            }
        }

        // All aggregates are computed in the currency of the first valid
        // claim; claims in any other currency are skipped like invalid ones
        let baseline_currency = claims
            .iter()
            .find(|claim| claim.validate().is_ok())
            .map(|claim| claim.amount.currency());

        let valid: Vec<Claim> = claims
            .iter()
            .filter(|claim| match claim.validate() {
                Ok(()) => true,
                Err(error) => {
                    warn!(claim = %claim.id, %error, "skipping invalid claim");
                    false
                }
            })
            .filter(|claim| {
                if Some(claim.amount.currency()) == baseline_currency {
                    true
                } else {
                    warn!(
                        claim = %claim.id,
                        currency = %claim.amount.currency(),
                        "skipping claim in non-baseline currency"
                    );
                    false
                }
            })
            .cloned()
            .collect();

        if valid.is_empty() {
            return Err(AnalyticsError::EmptyDataset);
        }

        let rejected: Vec<Claim> = valid.iter().filter(|c| c.is_rejected()).cloned().collect();
        let rules = active_rules_for(&valid, store);

        debug!(
            claims = valid.len(),
            rejected = rejected.len(),
            rules = rules.len(),
            "starting analysis run"
        );

        let rule_impacts = analyze_impact(&rejected, &rules);
        let training_suggestions = derive_training_suggestions(&rule_impacts);
        let statistics = analyze_statistics(&valid)?;
        let trends = TrendAnalyzer::at(self.as_of).analyze(&valid)?;
        let comparisons = ComparativeAnalyzer::at(self.as_of).analyze(&valid)?;
        let predictions = analyze_predictions(&valid)?;

        Ok(AnalysisResult {
            id: AnalysisId::new_v7(),
            generated_at: self.as_of,
            rule_impacts,
            training_suggestions,
            statistics,
            trends,
            comparisons,
            predictions,
        })
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Global rules followed by provider-specific rules for every provider seen
/// in the claim set, providers in first-appearance order
fn active_rules_for(claims: &[Claim], store: &dyn RuleStore) -> Vec<RejectionRule> {
    let mut rules = store.active_global_rules();

    let mut seen = Vec::new();
    for claim in claims {
        if !seen.contains(&claim.provider_id) {
            seen.push(claim.provider_id);
            rules.extend(store.active_provider_rules(claim.provider_id));
        }
    }

    rules
}
