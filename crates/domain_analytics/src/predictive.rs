//! Heuristic prediction: approval likelihood, fraud risk, and forecasts
//!
//! These are fixed scoring rules, not learned models. Every threshold and
//! weight below is part of the behavioral contract and must not be tuned
//! from data.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use core_kernel::{ClaimId, Currency, Money, ProviderId, Rate};
use domain_claims::{Claim, ClaimStatus};

/// Amount above which approval likelihood is penalized
const HIGH_AMOUNT: Decimal = dec!(10000);

/// Provider rejection rate (percent) above which approval is penalized
const RISKY_PROVIDER_PERCENT: Decimal = dec!(20);

/// Processing days above which approval is penalized
const SLOW_PROCESSING_DAYS: u32 = 15;

/// Amount above which a fraud point weight is added
const FRAUD_AMOUNT: Decimal = dec!(50000);

/// Provider claim volume above which a fraud point weight is added
const FRAUD_VOLUME: usize = 100;

/// Predicted decision for one claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictedStatus {
    Approved,
    Rejected,
}

/// Approval-likelihood estimate for one claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalPrediction {
    pub claim_id: ClaimId,
    /// Clamped to [0.1, 0.9]
    pub score: f64,
    pub predicted: PredictedStatus,
}

/// All approval predictions plus the self-consistency measure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalSummary {
    pub predictions: Vec<ApprovalPrediction>,
    /// Fraction of claims whose prediction matches the recorded status.
    /// Self-consistency against the heuristic, not held-out validation.
    pub accuracy: f64,
}

/// Risk tier of a fraud score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

/// One suspicious claim with its score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudIndicator {
    pub claim_id: ClaimId,
    pub score: u32,
    pub risk: RiskLevel,
}

/// Fraud screening output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudSummary {
    /// Claims with a non-zero score, highest first
    pub suspicious_claims: Vec<FraudIndicator>,
    /// High-risk claims over total claims
    pub fraud_rate: Rate,
}

/// Next-month cost projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostForecast {
    pub projected_amount: Money,
    /// Step function of history length
    pub confidence: f64,
    pub months_of_history: usize,
}

/// Near-term volume projection from the last three months
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeForecast {
    pub next_month_claims: Decimal,
    pub next_month_rejection_rate: Rate,
    pub next_quarter_claims: Decimal,
}

/// Full prediction summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSummary {
    pub approvals: ApprovalSummary,
    pub fraud: FraudSummary,
    pub cost_forecast: CostForecast,
    pub volume_forecast: VolumeForecast,
}

/// Runs all prediction heuristics over the claim set
pub fn analyze_predictions(claims: &[Claim]) -> Result<PredictionSummary, AnalyticsError> {
    if claims.is_empty() {
        return Err(AnalyticsError::EmptyDataset);
    }

    let provider_stats = provider_stats(claims);

    Ok(PredictionSummary {
        approvals: approval_summary(claims, &provider_stats),
        fraud: fraud_summary(claims, &provider_stats),
        cost_forecast: cost_forecast(claims),
        volume_forecast: volume_forecast(claims),
    })
}

struct ProviderStats {
    total: usize,
    rejection_rate: Rate,
}

fn provider_stats(claims: &[Claim]) -> HashMap<ProviderId, ProviderStats> {
    let mut counts: HashMap<ProviderId, (usize, usize)> = HashMap::new();
    for claim in claims {
        let entry = counts.entry(claim.provider_id).or_insert((0, 0));
        entry.0 += 1;
        if claim.is_rejected() {
            entry.1 += 1;
        }
    }
    counts
        .into_iter()
        .map(|(provider, (total, rejected))| {
            (
                provider,
                ProviderStats {
                    total,
                    rejection_rate: Rate::ratio(rejected, total),
                },
            )
        })
        .collect()
}

/// Approval likelihood scoring table:
/// start 0.5; -0.2 for amount over 10k; -0.15 for a provider rejecting more
/// than 20%; -0.1 for processing over 15 days; clamp to [0.1, 0.9]
fn approval_score(claim: &Claim, providers: &HashMap<ProviderId, ProviderStats>) -> f64 {
    let mut score: f64 = 0.5;

    if claim.amount.amount() > HIGH_AMOUNT {
        score -= 0.2;
    }
    if let Some(stats) = providers.get(&claim.provider_id) {
        if stats.rejection_rate.as_percentage() > RISKY_PROVIDER_PERCENT {
            score -= 0.15;
        }
    }
    if claim.processing_days > SLOW_PROCESSING_DAYS {
        score -= 0.1;
    }

    score.clamp(0.1, 0.9)
}

fn approval_summary(
    claims: &[Claim],
    providers: &HashMap<ProviderId, ProviderStats>,
) -> ApprovalSummary {
    let predictions: Vec<ApprovalPrediction> = claims
        .iter()
        .map(|claim| {
            let score = approval_score(claim, providers);
            ApprovalPrediction {
                claim_id: claim.id,
                score,
                predicted: if score > 0.5 {
                    PredictedStatus::Approved
                } else {
                    PredictedStatus::Rejected
                },
            }
        })
        .collect();

    let matched = claims
        .iter()
        .zip(predictions.iter())
        .filter(|(claim, prediction)| {
            matches!(
                (claim.status, prediction.predicted),
                (ClaimStatus::Approved, PredictedStatus::Approved)
                    | (ClaimStatus::Rejected, PredictedStatus::Rejected)
            )
        })
        .count();

    let accuracy = if claims.is_empty() {
        0.0
    } else {
        matched as f64 / claims.len() as f64
    };

    ApprovalSummary {
        predictions,
        accuracy,
    }
}

/// Fraud scoring table:
/// +30 for amount over 50k; +20 for same-day processing; +15 for a provider
/// with more than 100 claims
fn fraud_score(claim: &Claim, providers: &HashMap<ProviderId, ProviderStats>) -> u32 {
    let mut score = 0;

    if claim.amount.amount() > FRAUD_AMOUNT {
        score += 30;
    }
    if claim.processing_days < 1 {
        score += 20;
    }
    if providers
        .get(&claim.provider_id)
        .is_some_and(|stats| stats.total > FRAUD_VOLUME)
    {
        score += 15;
    }

    score
}

fn risk_level(score: u32) -> RiskLevel {
    if score >= 40 {
        RiskLevel::High
    } else if score >= 20 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn fraud_summary(claims: &[Claim], providers: &HashMap<ProviderId, ProviderStats>) -> FraudSummary {
    let mut suspicious_claims: Vec<FraudIndicator> = claims
        .iter()
        .filter_map(|claim| {
            let score = fraud_score(claim, providers);
            (score > 0).then(|| FraudIndicator {
                claim_id: claim.id,
                score,
                risk: risk_level(score),
            })
        })
        .collect();

    suspicious_claims.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.claim_id.as_uuid().cmp(b.claim_id.as_uuid()))
    });

    let high_risk = suspicious_claims
        .iter()
        .filter(|i| i.risk == RiskLevel::High)
        .count();

    FraudSummary {
        suspicious_claims,
        fraud_rate: Rate::ratio(high_risk, claims.len()),
    }
}

/// Monthly amount totals keyed `YYYY-MM`, chronological
fn monthly_totals(claims: &[Claim]) -> (Vec<Money>, Currency) {
    let currency = claims
        .first()
        .map(|c| c.amount.currency())
        .unwrap_or(Currency::SAR);

    let mut buckets: BTreeMap<String, Money> = BTreeMap::new();
    for claim in claims {
        let key = format!(
            "{:04}-{:02}",
            claim.submission_date.year(),
            claim.submission_date.month()
        );
        let entry = buckets.entry(key).or_insert_with(|| Money::zero(currency));
        // Foreign-currency amounts are left out of the monthly totals
        if let Ok(next) = entry.checked_add(&claim.amount) {
            *entry = next;
        }
    }

    (buckets.into_values().collect(), currency)
}

/// Moving average of monthly totals, nudged by half the latest delta
fn cost_forecast(claims: &[Claim]) -> CostForecast {
    let (totals, currency) = monthly_totals(claims);
    let months = totals.len();

    let sum = totals
        .iter()
        .fold(Money::zero(currency), |acc, m| acc + *m);
    let average = sum
        .divide(Decimal::from(months.max(1)))
        .unwrap_or_else(|_| Money::zero(currency));

    let adjustment = if months >= 2 {
        let latest = totals[months - 1];
        let prior = totals[months - 2];
        (latest - prior).multiply(dec!(0.5))
    } else {
        Money::zero(currency)
    };

    let confidence = if months >= 6 {
        0.8
    } else if months >= 3 {
        0.6
    } else {
        0.3
    };

    CostForecast {
        projected_amount: average + adjustment,
        confidence,
        months_of_history: months,
    }
}

/// Last three months of counts and rejection rates, projected flat
fn volume_forecast(claims: &[Claim]) -> VolumeForecast {
    let mut buckets: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for claim in claims {
        let key = format!(
            "{:04}-{:02}",
            claim.submission_date.year(),
            claim.submission_date.month()
        );
        let entry = buckets.entry(key).or_insert((0, 0));
        entry.0 += 1;
        if claim.is_rejected() {
            entry.1 += 1;
        }
    }

    let recent: Vec<(usize, usize)> = buckets.into_values().collect();
    let window = &recent[recent.len().saturating_sub(3)..];
    let n = Decimal::from(window.len().max(1));

    let count_avg: Decimal = window
        .iter()
        .map(|(total, _)| Decimal::from(*total))
        .sum::<Decimal>()
        / n;
    let rate_avg: Decimal = window
        .iter()
        .map(|(total, rejected)| Rate::ratio(*rejected, *total).as_decimal())
        .sum::<Decimal>()
        / n;

    VolumeForecast {
        next_month_claims: count_avg,
        next_month_rejection_rate: Rate::new(rate_avg),
        next_quarter_claims: count_avg * dec!(3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_tiers() {
        assert_eq!(risk_level(40), RiskLevel::High);
        assert_eq!(risk_level(39), RiskLevel::Medium);
        assert_eq!(risk_level(20), RiskLevel::Medium);
        assert_eq!(risk_level(19), RiskLevel::Low);
        assert_eq!(risk_level(0), RiskLevel::Low);
    }
}
