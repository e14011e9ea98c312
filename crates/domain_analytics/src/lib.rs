//! Analytics Domain
//!
//! Statistical, trend, comparative, and predictive analysis over classified
//! claims, plus the engine that assembles one complete analysis snapshot.
//!
//! # Data flow
//!
//! ```text
//! classified claims -> {statistics, trends, comparisons, predictions}
//!                   -> AnalysisResult
//! ```
//!
//! All computation is synchronous and in-memory; the engine never performs
//! I/O.

pub mod comparative;
pub mod engine;
pub mod error;
pub mod predictive;
pub mod statistics;
pub mod trends;

pub use comparative::{
    BenchmarkPosition, CategoryComparison, ComparativeAnalyzer, ComparativeSummary, ImpactLevel,
    PeriodComparison, PeriodStats, ProviderRanking,
};
pub use engine::{AnalysisResult, AnalyticsEngine};
pub use error::AnalyticsError;
pub use predictive::{
    analyze_predictions, ApprovalPrediction, ApprovalSummary, CostForecast, FraudIndicator,
    FraudSummary, PredictedStatus, PredictionSummary, RiskLevel, VolumeForecast,
};
pub use statistics::{
    analyze_statistics, DistributionStats, ProcessingTimeStats, Quartiles, StatisticalSummary,
};
pub use trends::{MonthlyTrend, QuarterPattern, TrendAnalyzer, TrendDirection, TrendSummary, YearOverYear};
