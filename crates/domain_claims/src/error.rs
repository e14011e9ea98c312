//! Claims domain errors

use thiserror::Error;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim is missing required field: {0}")]
    MissingField(&'static str),

    #[error("Claim {claim_number} has a negative amount")]
    NegativeAmount { claim_number: String },

    #[error("Claim {claim_number} is not rejected; classification applies to rejected claims only")]
    NotRejected { claim_number: String },
}
