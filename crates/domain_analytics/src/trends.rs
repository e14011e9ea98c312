//! Trend analysis over submission-date buckets
//!
//! Percent changes are computed in decimal arithmetic so the exact-10% band
//! edge is deterministic (110 after 100 is stable, 111 is increasing).

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use core_kernel::{Currency, Money, Rate};
use domain_claims::Claim;

/// Band width for the month-over-month direction label, in percent
const DIRECTION_BAND: Decimal = dec!(10);

/// Direction of a monthly claim-volume trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// One calendar month of claim activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM` bucket key
    pub month: String,
    pub total_claims: usize,
    pub rejected_claims: usize,
    pub average_amount: Money,
    pub rejection_rate: Rate,
    pub direction: TrendDirection,
}

/// Average activity for one fixed calendar quarter across all years present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarterPattern {
    /// Quarter number, 1 through 4
    pub quarter: u32,
    pub average_claims: Decimal,
    pub average_rejection_rate: Rate,
}

/// Current calendar year compared against the previous one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearOverYear {
    pub current_year: i32,
    pub previous_year: i32,
    /// Percentage change in claim count
    pub claim_growth_percent: Decimal,
    /// Percentage-point difference in rejection rate (not relative)
    pub rejection_rate_change_points: Decimal,
}

/// Full trend summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Chronologically ordered monthly buckets
    pub monthly: Vec<MonthlyTrend>,
    /// Quarters that have data, ascending
    pub seasonal: Vec<QuarterPattern>,
    /// Absent when the previous calendar year has no claims
    pub year_over_year: Option<YearOverYear>,
}

/// Buckets claims by calendar month, quarter, and year
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    as_of: DateTime<Utc>,
}

impl TrendAnalyzer {
    /// Analyzer anchored at the current time
    pub fn new() -> Self {
        Self { as_of: Utc::now() }
    }

    /// Analyzer anchored at a fixed point, for reproducible runs
    pub fn at(as_of: DateTime<Utc>) -> Self {
        Self { as_of }
    }

    /// Computes the trend summary over the claim set
    pub fn analyze(&self, claims: &[Claim]) -> Result<TrendSummary, AnalyticsError> {
        if claims.is_empty() {
            return Err(AnalyticsError::EmptyDataset);
        }

        Ok(TrendSummary {
            monthly: monthly_trends(claims),
            seasonal: seasonal_patterns(claims),
            year_over_year: year_over_year(claims, self.as_of.year()),
        })
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn month_key(claim: &Claim) -> String {
    format!(
        "{:04}-{:02}",
        claim.submission_date.year(),
        claim.submission_date.month()
    )
}

fn monthly_trends(claims: &[Claim]) -> Vec<MonthlyTrend> {
    let mut buckets: BTreeMap<String, Vec<&Claim>> = BTreeMap::new();
    for claim in claims {
        buckets.entry(month_key(claim)).or_default().push(claim);
    }

    let currency = claims
        .first()
        .map(|c| c.amount.currency())
        .unwrap_or(Currency::SAR);

    let mut months = Vec::with_capacity(buckets.len());
    let mut previous_count: Option<usize> = None;

    for (month, bucket) in buckets {
        let total = bucket.len();
        let rejected = bucket.iter().filter(|c| c.is_rejected()).count();
        // Amounts in a foreign currency are left out of the average
        let mut sum = Money::zero(currency);
        let mut summed = 0usize;
        for claim in &bucket {
            if let Ok(next) = sum.checked_add(&claim.amount) {
                sum = next;
                summed += 1;
            }
        }
        let average_amount = sum
            .divide(Decimal::from(summed.max(1)))
            .unwrap_or_else(|_| Money::zero(currency));

        months.push(MonthlyTrend {
            month,
            total_claims: total,
            rejected_claims: rejected,
            average_amount,
            rejection_rate: Rate::ratio(rejected, total),
            direction: direction(previous_count, total),
        });
        previous_count = Some(total);
    }

    months
}

/// Month-over-month direction label
///
/// The earliest month has no predecessor and is always stable; a previous
/// month with zero claims also yields stable (division guard).
fn direction(previous: Option<usize>, current: usize) -> TrendDirection {
    let previous = match previous {
        Some(p) if p > 0 => p,
        _ => return TrendDirection::Stable,
    };

    let change = (Decimal::from(current) - Decimal::from(previous)) / Decimal::from(previous)
        * dec!(100);
    if change > DIRECTION_BAND {
        TrendDirection::Increasing
    } else if change < -DIRECTION_BAND {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

fn seasonal_patterns(claims: &[Claim]) -> Vec<QuarterPattern> {
    // Per (year, quarter) counts, then averaged per quarter across years
    let mut year_quarter: BTreeMap<(i32, u32), (usize, usize)> = BTreeMap::new();
    for claim in claims {
        let year = claim.submission_date.year();
        let quarter = (claim.submission_date.month() - 1) / 3 + 1;
        let entry = year_quarter.entry((year, quarter)).or_insert((0, 0));
        entry.0 += 1;
        if claim.is_rejected() {
            entry.1 += 1;
        }
    }

    let mut per_quarter: BTreeMap<u32, Vec<(usize, usize)>> = BTreeMap::new();
    for ((_, quarter), counts) in year_quarter {
        per_quarter.entry(quarter).or_default().push(counts);
    }

    per_quarter
        .into_iter()
        .map(|(quarter, samples)| {
            let n = Decimal::from(samples.len());
            let total: Decimal = samples.iter().map(|(t, _)| Decimal::from(*t)).sum();
            let rate_sum: Decimal = samples
                .iter()
                .map(|(t, r)| Rate::ratio(*r, *t).as_decimal())
                .sum();
            QuarterPattern {
                quarter,
                average_claims: total / n,
                average_rejection_rate: Rate::new(rate_sum / n),
            }
        })
        .collect()
}

fn year_over_year(claims: &[Claim], current_year: i32) -> Option<YearOverYear> {
    let previous_year = current_year - 1;

    let count_for = |year: i32| {
        claims
            .iter()
            .filter(|c| c.submission_date.year() == year)
            .count()
    };
    let rejected_for = |year: i32| {
        claims
            .iter()
            .filter(|c| c.submission_date.year() == year && c.is_rejected())
            .count()
    };

    let previous_total = count_for(previous_year);
    if previous_total == 0 {
        return None;
    }
    let current_total = count_for(current_year);

    let growth = (Decimal::from(current_total) - Decimal::from(previous_total))
        / Decimal::from(previous_total)
        * dec!(100);

    let current_rate = Rate::ratio(rejected_for(current_year), current_total).as_percentage();
    let previous_rate = Rate::ratio(rejected_for(previous_year), previous_total).as_percentage();

    Some(YearOverYear {
        current_year,
        previous_year,
        claim_growth_percent: growth,
        rejection_rate_change_points: current_rate - previous_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_band_is_exclusive() {
        // 110 after 100 is exactly +10%, which is stable
        assert_eq!(direction(Some(100), 110), TrendDirection::Stable);
        assert_eq!(direction(Some(100), 111), TrendDirection::Increasing);
        assert_eq!(direction(Some(100), 90), TrendDirection::Stable);
        assert_eq!(direction(Some(100), 89), TrendDirection::Decreasing);
    }

    #[test]
    fn test_first_month_is_stable() {
        assert_eq!(direction(None, 42), TrendDirection::Stable);
    }

    #[test]
    fn test_zero_previous_month_is_stable() {
        assert_eq!(direction(Some(0), 42), TrendDirection::Stable);
    }
}
