//! Claim record

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClaimError;
use core_kernel::{ClaimId, Money, ProviderId};

/// Claim status as recorded by the payer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Approved,
    Rejected,
    Pending,
}

/// Cause family a rejection is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectionCategory {
    Medical,
    Technical,
}

/// One insurance claim as received from the ingestion step
///
/// Claims are created once by ingestion and never deleted here. The only
/// fields this engine mutates are `rejection_category` and
/// `rejection_subcategory`, and only on rejected claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Claim number assigned by the provider
    pub claim_number: String,
    /// Patient name
    pub patient_name: String,
    /// Submitting provider
    pub provider_id: ProviderId,
    /// Provider display name
    pub provider_name: String,
    /// Date of service
    pub service_date: NaiveDate,
    /// Date the claim was submitted to the payer
    pub submission_date: DateTime<Utc>,
    /// Claimed amount (non-negative)
    pub amount: Money,
    /// Status
    pub status: ClaimStatus,
    /// Free-text rejection narrative, if rejected
    pub rejection_reason: Option<String>,
    /// Classified rejection category
    pub rejection_category: Option<RejectionCategory>,
    /// Classified rejection subcategory
    pub rejection_subcategory: Option<String>,
    /// Days between submission and decision
    pub processing_days: u32,
    /// ICD diagnosis code
    pub diagnosis_code: String,
    /// CPT procedure code
    pub procedure_code: String,
    /// Member number on the policy
    pub membership_number: String,
    /// Policy number
    pub policy_number: String,
}

impl Claim {
    /// Validates the identifying fields and amount
    ///
    /// Invalid claims are skipped by aggregate computations; they never
    /// abort an analysis run.
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.claim_number.trim().is_empty() {
            return Err(ClaimError::MissingField("claim_number"));
        }
        if self.amount.is_negative() {
            return Err(ClaimError::NegativeAmount {
                claim_number: self.claim_number.clone(),
            });
        }
        Ok(())
    }

    /// Returns the non-empty diagnosis and procedure codes
    pub fn codes(&self) -> Vec<String> {
        [&self.diagnosis_code, &self.procedure_code]
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .cloned()
            .collect()
    }

    /// Returns true if the claim was rejected
    pub fn is_rejected(&self) -> bool {
        self.status == ClaimStatus::Rejected
    }

    /// Records the classification outcome on a rejected claim
    ///
    /// Set-only: an existing category is never overwritten or erased.
    pub fn set_classification(
        &mut self,
        category: RejectionCategory,
        subcategory: impl Into<String>,
    ) -> Result<(), ClaimError> {
        if self.status != ClaimStatus::Rejected {
            return Err(ClaimError::NotRejected {
                claim_number: self.claim_number.clone(),
            });
        }
        if self.rejection_category.is_none() {
            self.rejection_category = Some(category);
            self.rejection_subcategory = Some(subcategory.into());
        }
        Ok(())
    }
}
