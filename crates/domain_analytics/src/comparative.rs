//! Comparative analysis: provider ranking, category frequency, and
//! adjacent-period comparison

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use core_kernel::{Currency, Money, ProviderId, Rate};
use domain_claims::{Claim, RejectionCategory};

/// Fixed industry-average rejection rate used for benchmark labeling
const INDUSTRY_BENCHMARK_PERCENT: Decimal = dec!(15);

/// Category frequency above which impact is labeled high
const HIGH_IMPACT_FREQUENCY: usize = 50;

/// Category frequency below which impact is labeled low
const LOW_IMPACT_FREQUENCY: usize = 10;

/// Length of each comparison window in days
const PERIOD_DAYS: i64 = 30;

/// Position of a provider's rejection rate relative to the benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkPosition {
    Above,
    Below,
    At,
}

/// One provider's aggregate standing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRanking {
    pub provider_id: ProviderId,
    pub provider_name: String,
    /// 1 = lowest rejection rate
    pub rank: usize,
    pub total_claims: usize,
    pub rejected_claims: usize,
    pub total_amount: Money,
    pub rejection_rate: Rate,
    pub average_amount: Money,
    pub benchmark: BenchmarkPosition,
}

/// Relative weight of a rejection category/subcategory pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

/// Frequency of one classified rejection cause
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryComparison {
    pub category: RejectionCategory,
    pub subcategory: String,
    pub frequency: usize,
    pub impact: ImpactLevel,
}

/// Claim activity within one comparison window
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodStats {
    pub total_claims: usize,
    pub rejected_claims: usize,
    pub rejection_rate: Rate,
}

/// The 30-day window ending now against the preceding 30 days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub current: PeriodStats,
    pub previous: PeriodStats,
    /// Percentage change in rejections; 0 when the previous period had none
    pub rejection_change_percent: Decimal,
}

/// Full comparative summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparativeSummary {
    pub provider_rankings: Vec<ProviderRanking>,
    pub category_comparisons: Vec<CategoryComparison>,
    pub period_comparison: PeriodComparison,
}

/// Ranks providers and categories against fixed benchmarks
#[derive(Debug, Clone)]
pub struct ComparativeAnalyzer {
    as_of: DateTime<Utc>,
}

impl ComparativeAnalyzer {
    /// Analyzer anchored at the current time
    pub fn new() -> Self {
        Self { as_of: Utc::now() }
    }

    /// Analyzer anchored at a fixed point, for reproducible runs
    pub fn at(as_of: DateTime<Utc>) -> Self {
        Self { as_of }
    }

    /// Computes the comparative summary
    pub fn analyze(&self, claims: &[Claim]) -> Result<ComparativeSummary, AnalyticsError> {
        if claims.is_empty() {
            return Err(AnalyticsError::EmptyDataset);
        }

        Ok(ComparativeSummary {
            provider_rankings: provider_rankings(claims),
            category_comparisons: category_comparisons(claims),
            period_comparison: period_comparison(claims, self.as_of),
        })
    }
}

impl Default for ComparativeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn provider_rankings(claims: &[Claim]) -> Vec<ProviderRanking> {
    struct Aggregate {
        name: String,
        total: usize,
        rejected: usize,
        amount: Money,
    }

    let currency = claims
        .first()
        .map(|c| c.amount.currency())
        .unwrap_or(Currency::SAR);

    let mut aggregates: HashMap<ProviderId, Aggregate> = HashMap::new();
    for claim in claims {
        let entry = aggregates.entry(claim.provider_id).or_insert(Aggregate {
            name: claim.provider_name.clone(),
            total: 0,
            rejected: 0,
            amount: Money::zero(currency),
        });
        entry.total += 1;
        if claim.is_rejected() {
            entry.rejected += 1;
        }
        // Foreign-currency amounts are left out of the totals
        if let Ok(next) = entry.amount.checked_add(&claim.amount) {
            entry.amount = next;
        }
    }

    let mut rankings: Vec<ProviderRanking> = aggregates
        .into_iter()
        .map(|(provider_id, agg)| {
            let rejection_rate = Rate::ratio(agg.rejected, agg.total);
            let average_amount = agg
                .amount
                .divide(Decimal::from(agg.total.max(1)))
                .unwrap_or_else(|_| Money::zero(currency));
            ProviderRanking {
                provider_id,
                provider_name: agg.name,
                rank: 0,
                total_claims: agg.total,
                rejected_claims: agg.rejected,
                total_amount: agg.amount,
                rejection_rate,
                average_amount,
                benchmark: benchmark_position(rejection_rate),
            }
        })
        .collect();

    // Ascending by rejection rate; provider id breaks ties so the order is
    // deterministic regardless of map iteration order
    rankings.sort_by(|a, b| {
        a.rejection_rate
            .cmp(&b.rejection_rate)
            .then_with(|| a.provider_id.as_uuid().cmp(b.provider_id.as_uuid()))
    });
    for (index, ranking) in rankings.iter_mut().enumerate() {
        ranking.rank = index + 1;
    }
    rankings
}

/// Labels a rejection rate against the fixed industry benchmark
///
/// Exactly 15% is `At`; the decimal comparison makes the edge exact.
fn benchmark_position(rate: Rate) -> BenchmarkPosition {
    let percent = rate.as_percentage();
    if percent > INDUSTRY_BENCHMARK_PERCENT {
        BenchmarkPosition::Above
    } else if percent < INDUSTRY_BENCHMARK_PERCENT {
        BenchmarkPosition::Below
    } else {
        BenchmarkPosition::At
    }
}

fn category_comparisons(claims: &[Claim]) -> Vec<CategoryComparison> {
    let mut frequencies: HashMap<(RejectionCategory, String), usize> = HashMap::new();
    for claim in claims.iter().filter(|c| c.is_rejected()) {
        if let (Some(category), Some(subcategory)) =
            (claim.rejection_category, claim.rejection_subcategory.as_ref())
        {
            *frequencies.entry((category, subcategory.clone())).or_insert(0) += 1;
        }
    }

    let mut comparisons: Vec<CategoryComparison> = frequencies
        .into_iter()
        .map(|((category, subcategory), frequency)| CategoryComparison {
            category,
            subcategory,
            frequency,
            impact: impact_level(frequency),
        })
        .collect();

    comparisons.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.subcategory.cmp(&b.subcategory))
    });
    comparisons
}

fn impact_level(frequency: usize) -> ImpactLevel {
    if frequency > HIGH_IMPACT_FREQUENCY {
        ImpactLevel::High
    } else if frequency < LOW_IMPACT_FREQUENCY {
        ImpactLevel::Low
    } else {
        ImpactLevel::Medium
    }
}

fn period_comparison(claims: &[Claim], as_of: DateTime<Utc>) -> PeriodComparison {
    let current_start = as_of - Duration::days(PERIOD_DAYS);
    let previous_start = as_of - Duration::days(2 * PERIOD_DAYS);

    let stats_between = |start: DateTime<Utc>, end: DateTime<Utc>| {
        let in_window: Vec<&Claim> = claims
            .iter()
            .filter(|c| c.submission_date > start && c.submission_date <= end)
            .collect();
        let rejected = in_window.iter().filter(|c| c.is_rejected()).count();
        PeriodStats {
            total_claims: in_window.len(),
            rejected_claims: rejected,
            rejection_rate: Rate::ratio(rejected, in_window.len()),
        }
    };

    let current = stats_between(current_start, as_of);
    let previous = stats_between(previous_start, current_start);

    let rejection_change_percent = if previous.rejected_claims == 0 {
        dec!(0)
    } else {
        (Decimal::from(current.rejected_claims) - Decimal::from(previous.rejected_claims))
            / Decimal::from(previous.rejected_claims)
            * dec!(100)
    };

    PeriodComparison {
        current,
        previous,
        rejection_change_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_position_edges() {
        assert_eq!(benchmark_position(Rate::ratio(3, 20)), BenchmarkPosition::At);
        assert_eq!(
            benchmark_position(Rate::ratio(4, 20)),
            BenchmarkPosition::Above
        );
        assert_eq!(
            benchmark_position(Rate::ratio(2, 20)),
            BenchmarkPosition::Below
        );
    }

    #[test]
    fn test_impact_level_thresholds() {
        assert_eq!(impact_level(51), ImpactLevel::High);
        assert_eq!(impact_level(50), ImpactLevel::Medium);
        assert_eq!(impact_level(10), ImpactLevel::Medium);
        assert_eq!(impact_level(9), ImpactLevel::Low);
    }
}
