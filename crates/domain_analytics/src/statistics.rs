//! Descriptive statistics over claim amounts and processing times
//!
//! Moment statistics are computed in f64; per-provider rejection rates use
//! decimal arithmetic so percentage comparisons elsewhere stay exact.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use core_kernel::{ClaimId, ProviderId, Rate};
use domain_claims::Claim;

/// Factor of standard deviations beyond the mean that flags an outlier
const OUTLIER_SIGMA: f64 = 2.0;

/// Quartile cut points of a distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// Central tendency and dispersion of claim amounts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub quartiles: Quartiles,
}

/// Central tendency and dispersion of processing times
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessingTimeStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

/// Statistical summary over the full claim population
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub amounts: DistributionStats,
    pub processing_time: ProcessingTimeStats,
    /// Pearson correlation between amount and processing time
    pub amount_time_correlation: f64,
    /// Rejection rate per provider, as a percentage
    pub rejection_rate_by_provider: HashMap<ProviderId, Rate>,
    /// Claims whose amount exceeds mean + 2 sigma
    pub amount_outliers: Vec<ClaimId>,
    /// Claims whose processing time exceeds mean + 2 sigma
    pub time_outliers: Vec<ClaimId>,
}

/// Computes the statistical summary
///
/// Amount statistics cover claims with amount > 0, time statistics cover
/// claims with processing time > 0. Fails with [`AnalyticsError::EmptyDataset`]
/// on an empty claim set rather than returning zeros.
pub fn analyze_statistics(claims: &[Claim]) -> Result<StatisticalSummary, AnalyticsError> {
    if claims.is_empty() {
        return Err(AnalyticsError::EmptyDataset);
    }

    let amount_claims: Vec<&Claim> = claims.iter().filter(|c| c.amount.is_positive()).collect();
    let time_claims: Vec<&Claim> = claims.iter().filter(|c| c.processing_days > 0).collect();

    let amounts: Vec<f64> = amount_claims.iter().map(|c| c.amount.to_f64()).collect();
    let times: Vec<f64> = time_claims.iter().map(|c| c.processing_days as f64).collect();

    let amount_stats = distribution_stats(&amounts);
    let time_stats = ProcessingTimeStats {
        mean: mean(&times),
        median: median(&times),
        std_dev: population_std_dev(&times),
    };

    // Paired per claim, in input order
    let paired_amounts: Vec<f64> = claims.iter().map(|c| c.amount.to_f64()).collect();
    let paired_times: Vec<f64> = claims.iter().map(|c| c.processing_days as f64).collect();
    let correlation = pearson(&paired_amounts, &paired_times);

    let amount_cutoff = amount_stats.mean + OUTLIER_SIGMA * amount_stats.std_dev;
    let amount_outliers = amount_claims
        .iter()
        .filter(|c| c.amount.to_f64() > amount_cutoff)
        .map(|c| c.id)
        .collect();

    let time_cutoff = time_stats.mean + OUTLIER_SIGMA * time_stats.std_dev;
    let time_outliers = time_claims
        .iter()
        .filter(|c| (c.processing_days as f64) > time_cutoff)
        .map(|c| c.id)
        .collect();

    Ok(StatisticalSummary {
        amounts: amount_stats,
        processing_time: time_stats,
        amount_time_correlation: correlation,
        rejection_rate_by_provider: rejection_rate_by_provider(claims),
        amount_outliers,
        time_outliers,
    })
}

fn distribution_stats(values: &[f64]) -> DistributionStats {
    let (min, max) = if values.is_empty() {
        (0.0, 0.0)
    } else {
        (
            values.iter().cloned().fold(f64::INFINITY, f64::min),
            values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        )
    };
    DistributionStats {
        mean: mean(values),
        median: median(values),
        std_dev: population_std_dev(values),
        min,
        max,
        quartiles: Quartiles {
            q1: percentile(values, 25.0),
            q2: percentile(values, 50.0),
            q3: percentile(values, 75.0),
        },
    }
}

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; 0 for an empty slice
pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

/// Population standard deviation; 0 for an empty slice
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percentile by linear interpolation between closest ranks; 0 when empty
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("claim metrics are finite"));

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Pearson correlation coefficient of two equal-length series
///
/// Returns 0 (not NaN) when either series has zero variance or the series
/// are shorter than two elements.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];

    let mx = mean(xs);
    let my = mean(ys);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mx;
        let dy = ys[i] - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

fn rejection_rate_by_provider(claims: &[Claim]) -> HashMap<ProviderId, Rate> {
    let mut totals: HashMap<ProviderId, (usize, usize)> = HashMap::new();
    for claim in claims {
        let entry = totals.entry(claim.provider_id).or_insert((0, 0));
        entry.0 += 1;
        if claim.is_rejected() {
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(provider, (total, rejected))| (provider, Rate::ratio(rejected, total)))
        .collect()
}
