//! Analytics domain errors

use thiserror::Error;

/// Errors that can occur in the analytics domain
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Statistics over zero claims fail loudly instead of returning a
    /// zero-filled summary that looks valid
    #[error("Cannot analyze an empty claim set")]
    EmptyDataset,

    #[error(transparent)]
    Claim(#[from] domain_claims::ClaimError),
}
