//! Test Data Builders
//!
//! Builder patterns for constructing test claims and rules with sensible
//! defaults, so tests specify only the fields they care about.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, Currency, Money, ProviderId, RuleId};
use domain_claims::claim::{Claim, ClaimStatus, RejectionCategory};
use domain_claims::rule::{LocalizedText, RejectionRule, Severity};

/// Builder for constructing test claims
pub struct ClaimBuilder {
    id: ClaimId,
    claim_number: String,
    provider_id: ProviderId,
    provider_name: String,
    submission_date: DateTime<Utc>,
    amount: Money,
    status: ClaimStatus,
    rejection_reason: Option<String>,
    rejection_category: Option<RejectionCategory>,
    rejection_subcategory: Option<String>,
    processing_days: u32,
    diagnosis_code: String,
    procedure_code: String,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// Creates a builder with default values
    pub fn new() -> Self {
        Self {
            id: ClaimId::new_v7(),
            claim_number: "CLM-0001".to_string(),
            provider_id: ProviderId::new(),
            provider_name: "Test Medical Center".to_string(),
            submission_date: Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
            amount: Money::new(dec!(1000), Currency::SAR),
            status: ClaimStatus::Approved,
            rejection_reason: None,
            rejection_category: None,
            rejection_subcategory: None,
            processing_days: 5,
            diagnosis_code: "E11.9".to_string(),
            procedure_code: "99213".to_string(),
        }
    }

    /// Sets the claim number
    pub fn with_claim_number(mut self, number: impl Into<String>) -> Self {
        self.claim_number = number.into();
        self
    }

    /// Sets the provider
    pub fn with_provider(mut self, id: ProviderId, name: impl Into<String>) -> Self {
        self.provider_id = id;
        self.provider_name = name.into();
        self
    }

    /// Sets the submission date
    pub fn with_submission_date(mut self, date: DateTime<Utc>) -> Self {
        self.submission_date = date;
        self
    }

    /// Sets the amount
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Money::new(amount, Currency::SAR);
        self
    }

    /// Sets the status
    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    /// Marks the claim rejected with the given narrative
    pub fn rejected(mut self, reason: impl Into<String>) -> Self {
        self.status = ClaimStatus::Rejected;
        self.rejection_reason = Some(reason.into());
        self
    }

    /// Sets an already-classified category
    pub fn classified(mut self, category: RejectionCategory, subcategory: impl Into<String>) -> Self {
        self.rejection_category = Some(category);
        self.rejection_subcategory = Some(subcategory.into());
        self
    }

    /// Sets the processing time in days
    pub fn with_processing_days(mut self, days: u32) -> Self {
        self.processing_days = days;
        self
    }

    /// Sets the diagnosis and procedure codes
    pub fn with_codes(mut self, diagnosis: impl Into<String>, procedure: impl Into<String>) -> Self {
        self.diagnosis_code = diagnosis.into();
        self.procedure_code = procedure.into();
        self
    }

    /// Builds the claim
    pub fn build(self) -> Claim {
        Claim {
            id: self.id,
            claim_number: self.claim_number,
            patient_name: "Test Patient".to_string(),
            provider_id: self.provider_id,
            provider_name: self.provider_name,
            service_date: self.submission_date.date_naive() - chrono::Days::new(3),
            submission_date: self.submission_date,
            amount: self.amount,
            status: self.status,
            rejection_reason: self.rejection_reason,
            rejection_category: self.rejection_category,
            rejection_subcategory: self.rejection_subcategory,
            processing_days: self.processing_days,
            diagnosis_code: self.diagnosis_code,
            procedure_code: self.procedure_code,
            membership_number: "M-0001".to_string(),
            policy_number: "P-0001".to_string(),
        }
    }
}

/// Builder for constructing test rejection rules
pub struct RuleBuilder {
    id: RuleId,
    name: String,
    category: RejectionCategory,
    subcategory: String,
    keywords: Vec<String>,
    keywords_secondary: Vec<String>,
    error_codes: Vec<String>,
    severity: Severity,
    auto_fixable: bool,
    fix_suggestion: Option<String>,
    provider_id: Option<ProviderId>,
    provider_specific: bool,
    active: bool,
}

impl Default for RuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBuilder {
    /// Creates a builder with default values
    pub fn new() -> Self {
        Self {
            id: RuleId::new_v7(),
            name: "Test Rule".to_string(),
            category: RejectionCategory::Technical,
            subcategory: "Documentation".to_string(),
            keywords: vec!["missing documentation".to_string()],
            keywords_secondary: Vec::new(),
            error_codes: Vec::new(),
            severity: Severity::Medium,
            auto_fixable: false,
            fix_suggestion: None,
            provider_id: None,
            provider_specific: false,
            active: true,
        }
    }

    /// Sets the English display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the category and subcategory
    pub fn with_category(mut self, category: RejectionCategory, subcategory: impl Into<String>) -> Self {
        self.category = category;
        self.subcategory = subcategory.into();
        self
    }

    /// Sets the primary keyword list
    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Sets the secondary keyword list
    pub fn with_secondary_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords_secondary = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Sets the error-code list
    pub fn with_error_codes(mut self, codes: &[&str]) -> Self {
        self.error_codes = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Sets the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Marks the rule auto-fixable with a suggestion
    pub fn auto_fixable(mut self, suggestion: impl Into<String>) -> Self {
        self.auto_fixable = true;
        self.fix_suggestion = Some(suggestion.into());
        self
    }

    /// Scopes the rule to a single provider
    pub fn for_provider(mut self, provider_id: ProviderId) -> Self {
        self.provider_id = Some(provider_id);
        self.provider_specific = true;
        self
    }

    /// Deactivates the rule
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Builds the rule
    pub fn build(self) -> RejectionRule {
        RejectionRule {
            id: self.id,
            name: LocalizedText::new(self.name.clone(), self.name),
            description: LocalizedText::new("", ""),
            category: self.category,
            subcategory: self.subcategory,
            keywords: self.keywords,
            keywords_secondary: self.keywords_secondary,
            error_codes: self.error_codes,
            severity: self.severity,
            auto_fixable: self.auto_fixable,
            fix_suggestion: self.fix_suggestion,
            provider_id: self.provider_id,
            provider_specific: self.provider_specific,
            active: self.active,
        }
    }
}

/// Returns a submission date `months_back` whole months before the anchor
pub fn months_before(anchor: DateTime<Utc>, months_back: u32) -> DateTime<Utc> {
    let mut year = anchor.date_naive().year();
    let mut month = anchor.date_naive().month() as i32 - months_back as i32;
    while month < 1 {
        month += 12;
        year -= 1;
    }
    Utc.with_ymd_and_hms(year, month as u32, 15, 12, 0, 0).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_builder_defaults_validate() {
        let claim = ClaimBuilder::new().build();
        assert!(claim.validate().is_ok());
        assert_eq!(claim.status, ClaimStatus::Approved);
    }

    #[test]
    fn test_rejected_builder_sets_reason() {
        let claim = ClaimBuilder::new().rejected("missing documentation").build();
        assert_eq!(claim.status, ClaimStatus::Rejected);
        assert!(claim.rejection_reason.is_some());
    }

    #[test]
    fn test_months_before_wraps_year() {
        let anchor = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();
        let shifted = months_before(anchor, 3);
        assert_eq!(shifted.date_naive().year(), 2023);
        assert_eq!(shifted.date_naive().month(), 11);
    }
}
