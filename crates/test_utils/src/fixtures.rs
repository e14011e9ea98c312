//! Pre-built fixture sets for common test scenarios

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::ProviderId;
use domain_claims::claim::{Claim, RejectionCategory};
use domain_claims::rule::{RejectionRule, Severity};
use domain_claims::store::InMemoryRuleStore;

use crate::builders::{months_before, ClaimBuilder, RuleBuilder};

/// A deterministic anchor timestamp for reproducible runs
pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

/// The standard global rule set: documentation, authorization, coding
pub fn standard_rules() -> Vec<RejectionRule> {
    vec![
        RuleBuilder::new()
            .with_name("Missing Documentation")
            .with_category(RejectionCategory::Technical, "Documentation")
            .with_keywords(&["missing documentation"])
            .with_error_codes(&["DOC-01"])
            .with_severity(Severity::High)
            .auto_fixable("Attach the missing documents and resubmit")
            .build(),
        RuleBuilder::new()
            .with_name("Prior Authorization")
            .with_category(RejectionCategory::Medical, "Prior Authorization")
            .with_keywords(&["prior authorization"])
            .with_error_codes(&["AUTH-02"])
            .with_severity(Severity::Critical)
            .build(),
        RuleBuilder::new()
            .with_name("Invalid Procedure Code")
            .with_category(RejectionCategory::Technical, "Coding")
            .with_keywords(&["invalid procedure code"])
            .with_error_codes(&["CODE-11"])
            .with_severity(Severity::Medium)
            .auto_fixable("Correct the procedure code against the CPT list")
            .build(),
    ]
}

/// A rule store holding the standard global rules
pub fn standard_store() -> InMemoryRuleStore {
    InMemoryRuleStore::with_global_rules(standard_rules())
}

/// A mixed claim population: two providers, three months of history,
/// approved and rejected claims
pub fn mixed_claims() -> Vec<Claim> {
    let anchor = anchor();
    let clinic = ProviderId::new();
    let hospital = ProviderId::new();
    let mut claims = Vec::new();

    for months_back in 0..3u32 {
        let date = months_before(anchor, months_back);
        for i in 0..4 {
            claims.push(
                ClaimBuilder::new()
                    .with_claim_number(format!("CLM-A{months_back}{i}"))
                    .with_provider(clinic, "Downtown Clinic")
                    .with_submission_date(date)
                    .with_amount(dec!(800) + rust_decimal::Decimal::from(i * 100))
                    .with_processing_days(4 + i)
                    .build(),
            );
        }
        claims.push(
            ClaimBuilder::new()
                .with_claim_number(format!("CLM-R{months_back}"))
                .with_provider(hospital, "General Hospital")
                .with_submission_date(date)
                .with_amount(dec!(4500))
                .with_processing_days(12)
                .rejected("missing documentation")
                .build(),
        );
    }

    claims
}
