//! Comprehensive tests for domain_claims

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, Currency, Money, ProviderId, RuleId};

use domain_claims::claim::{Claim, ClaimStatus, RejectionCategory};
use domain_claims::classifier::{classify, ClaimCategory};
use domain_claims::impact::{analyze_impact, derive_training_suggestions, SuggestionPriority};
use domain_claims::rule::{LocalizedText, RejectionRule, Severity};
use domain_claims::store::InMemoryRuleStore;

fn claim(amount: Decimal, reason: &str) -> Claim {
    Claim {
        id: ClaimId::new_v7(),
        claim_number: format!("CLM-{}", ClaimId::new()),
        patient_name: "Test Patient".to_string(),
        provider_id: ProviderId::new(),
        provider_name: "Test Clinic".to_string(),
        service_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        submission_date: Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap(),
        amount: Money::new(amount, Currency::SAR),
        status: ClaimStatus::Rejected,
        rejection_reason: Some(reason.to_string()),
        rejection_category: None,
        rejection_subcategory: None,
        processing_days: 5,
        diagnosis_code: "J45.0".to_string(),
        procedure_code: "94010".to_string(),
        membership_number: "M-1".to_string(),
        policy_number: "P-1".to_string(),
    }
}

fn rule(
    name: &str,
    category: RejectionCategory,
    subcategory: &str,
    keywords: Vec<&str>,
    severity: Severity,
    auto_fixable: bool,
) -> RejectionRule {
    RejectionRule {
        id: RuleId::new_v7(),
        name: LocalizedText::new(name, name),
        description: LocalizedText::new("", ""),
        category,
        subcategory: subcategory.to_string(),
        keywords: keywords.into_iter().map(String::from).collect(),
        keywords_secondary: Vec::new(),
        error_codes: Vec::new(),
        severity,
        auto_fixable,
        fix_suggestion: None,
        provider_id: None,
        provider_specific: false,
        active: true,
    }
}

// ============================================================================
// Classification Scenario Tests
// ============================================================================

mod classification_tests {
    use super::*;

    #[test]
    fn test_documentation_and_authorization_scenario() {
        let rules = vec![
            rule(
                "Missing Documentation",
                RejectionCategory::Technical,
                "Documentation",
                vec!["missing documentation"],
                Severity::High,
                true,
            ),
            rule(
                "Prior Authorization",
                RejectionCategory::Medical,
                "Prior Authorization",
                vec!["prior authorization"],
                Severity::High,
                false,
            ),
        ];
        let store = InMemoryRuleStore::with_global_rules(rules);

        let doc_claim = claim(dec!(5000), "missing documentation");
        let auth_claim = claim(dec!(20000), "prior authorization required");

        let doc = classify(
            doc_claim.rejection_reason.as_deref().unwrap(),
            &doc_claim.codes(),
            None,
            &store,
        );
        assert_eq!(doc.category, ClaimCategory::Technical);
        assert_eq!(doc.subcategory, "Documentation");
        assert!(doc.confidence >= 0.7);

        let auth = classify(
            auth_claim.rejection_reason.as_deref().unwrap(),
            &auth_claim.codes(),
            None,
            &store,
        );
        assert_eq!(auth.category, ClaimCategory::Medical);
        assert_eq!(auth.subcategory, "Prior Authorization");
        assert!(auth.confidence >= 0.7);
    }

    #[test]
    fn test_full_keyword_match_reaches_classification_threshold() {
        // A full keyword match scores exactly 0.7, which classifies
        let store = InMemoryRuleStore::with_global_rules(vec![rule(
            "Duplicate",
            RejectionCategory::Technical,
            "Duplicate Submission",
            vec!["duplicate"],
            Severity::Medium,
            false,
        )]);

        let result = classify("duplicate", &[], None, &store);
        assert_eq!(result.subcategory, "Duplicate Submission");
        assert!(result.matched_rule.is_some());
    }
}

// ============================================================================
// Impact Analysis Tests
// ============================================================================

mod impact_tests {
    use super::*;

    #[test]
    fn test_combined_impact_ranking() {
        // savings 1000 x 2 matches = 2000 vs savings 300 x 10 matches = 3000;
        // the second rule must rank first
        let few_large = rule(
            "Few Large",
            RejectionCategory::Technical,
            "A",
            vec!["duplicate submission"],
            Severity::Critical, // recovery 0.8
            true,
        );
        let many_small = rule(
            "Many Small",
            RejectionCategory::Technical,
            "B",
            vec!["expired policy"],
            Severity::Low, // recovery 0.2
            true,
        );

        let mut claims = Vec::new();
        for _ in 0..2 {
            claims.push(claim(dec!(625), "duplicate submission")); // 1250 * 0.8 = 1000
        }
        for _ in 0..10 {
            claims.push(claim(dec!(150), "expired policy")); // 1500 * 0.2 = 300
        }

        let analyses = analyze_impact(&claims, &[few_large, many_small]);
        assert_eq!(analyses.len(), 2);
        assert_eq!(analyses[0].rule_name, "Many Small");
        assert_eq!(analyses[0].estimated_savings.amount(), dec!(300));
        assert_eq!(analyses[1].estimated_savings.amount(), dec!(1000));
    }

    #[test]
    fn test_rules_without_matches_are_omitted() {
        let unmatched = rule(
            "Never Matches",
            RejectionCategory::Medical,
            "X",
            vec!["completely different phrase"],
            Severity::High,
            true,
        );
        let claims = vec![claim(dec!(100), "missing documentation")];

        assert!(analyze_impact(&claims, &[unmatched]).is_empty());
    }

    #[test]
    fn test_score_at_impact_threshold_is_excluded() {
        // 6 of 7 keywords matched: keyword score never exceeds 0.6, so the
        // claim does not count (the threshold is exclusive)
        let seven_keywords = rule(
            "Seven Keywords",
            RejectionCategory::Technical,
            "X",
            vec!["alpha", "bravo", "carol", "delta", "echos", "froth", "gulfs"],
            Severity::High,
            true,
        );
        let six_matched = claim(dec!(100), "alpha bravo carol delta echos froth");

        assert!(analyze_impact(&[six_matched], &[seven_keywords.clone()]).is_empty());

        // All seven matched scores 0.7 and is included
        let seven_matched = claim(dec!(100), "alpha bravo carol delta echos froth gulfs");
        let analyses = analyze_impact(&[seven_matched], &[seven_keywords]);
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].matched_claims.len(), 1);
    }

    #[test]
    fn test_foreign_currency_claims_left_out_of_impact() {
        let doc_rule = rule(
            "Missing Documentation",
            RejectionCategory::Technical,
            "Documentation",
            vec!["missing documentation"],
            Severity::High, // recovery 0.6
            true,
        );
        let sar_claim = claim(dec!(1000), "missing documentation");
        let mut usd_claim = claim(dec!(1000), "missing documentation");
        usd_claim.amount = Money::new(dec!(1000), Currency::USD);

        // The mismatched claim is dropped from the totals; the run completes
        let analyses = analyze_impact(&[sar_claim.clone(), usd_claim], &[doc_rule]);
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].matched_claims, vec![sar_claim.id]);
        assert_eq!(analyses[0].estimated_savings.amount(), dec!(600));
    }

    #[test]
    fn test_non_auto_fixable_rule_has_zero_savings() {
        let manual = rule(
            "Manual Review",
            RejectionCategory::Medical,
            "X",
            vec!["medical necessity"],
            Severity::Critical,
            false,
        );
        let claims = vec![claim(dec!(9000), "medical necessity not established")];

        let analyses = analyze_impact(&claims, &[manual]);
        assert_eq!(analyses.len(), 1);
        assert!(analyses[0].estimated_savings.is_zero());
    }

    #[test]
    fn test_provider_specific_rule_skips_other_providers() {
        let owner = ProviderId::new();
        let mut scoped = rule(
            "Scoped",
            RejectionCategory::Technical,
            "X",
            vec!["missing documentation"],
            Severity::High,
            true,
        );
        scoped.provider_specific = true;
        scoped.provider_id = Some(owner);

        let mut own_claim = claim(dec!(500), "missing documentation");
        own_claim.provider_id = owner;
        let other_claim = claim(dec!(500), "missing documentation");

        let analyses = analyze_impact(&[own_claim.clone(), other_claim], &[scoped]);
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].matched_claims, vec![own_claim.id]);
    }

    #[test]
    fn test_impact_analysis_is_idempotent() {
        let rules = vec![
            rule(
                "Missing Documentation",
                RejectionCategory::Technical,
                "Documentation",
                vec!["missing documentation"],
                Severity::High,
                true,
            ),
            rule(
                "Prior Authorization",
                RejectionCategory::Medical,
                "Prior Authorization",
                vec!["prior authorization"],
                Severity::Critical,
                true,
            ),
        ];
        let claims = vec![
            claim(dec!(5000), "missing documentation"),
            claim(dec!(20000), "prior authorization required"),
            claim(dec!(1200), "missing documentation attached late"),
        ];

        let first = analyze_impact(&claims, &rules);
        let second = analyze_impact(&claims, &rules);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

// ============================================================================
// Training Suggestion Tests
// ============================================================================

mod suggestion_tests {
    use super::*;

    #[test]
    fn test_high_priority_for_critical_and_high_severity() {
        let rules = vec![
            rule(
                "Critical Cause",
                RejectionCategory::Technical,
                "A",
                vec!["expired policy"],
                Severity::Critical,
                true,
            ),
            rule(
                "Low Cause",
                RejectionCategory::Technical,
                "B",
                vec!["wrong member"],
                Severity::Low,
                true,
            ),
        ];
        let claims = vec![
            claim(dec!(100), "expired policy"),
            claim(dec!(100), "wrong member"),
        ];

        let analyses = analyze_impact(&claims, &rules);
        let suggestions = derive_training_suggestions(&analyses);

        assert!(suggestions
            .iter()
            .any(|s| s.priority == SuggestionPriority::High && s.topic == "Critical Cause"));
        assert!(!suggestions.iter().any(|s| s.topic == "Low Cause"));
    }

    #[test]
    fn test_technical_over_medical_pattern_suggestion() {
        let rules = vec![
            rule(
                "Tech",
                RejectionCategory::Technical,
                "A",
                vec!["expired policy"],
                Severity::Low,
                true,
            ),
            rule(
                "Med",
                RejectionCategory::Medical,
                "B",
                vec!["medical necessity"],
                Severity::Low,
                false,
            ),
        ];
        let claims = vec![
            claim(dec!(100), "expired policy"),
            claim(dec!(100), "expired policy"),
            claim(dec!(100), "medical necessity"),
        ];

        let analyses = analyze_impact(&claims, &rules);
        let suggestions = derive_training_suggestions(&analyses);

        assert!(suggestions
            .iter()
            .any(|s| s.topic == "Data entry and billing procedures"));
    }

    #[test]
    fn test_medical_volume_pattern_suggestion() {
        let rules = vec![rule(
            "Med",
            RejectionCategory::Medical,
            "B",
            vec!["medical necessity"],
            Severity::Low,
            false,
        )];
        let claims: Vec<Claim> = (0..6)
            .map(|_| claim(dec!(100), "medical necessity"))
            .collect();

        let analyses = analyze_impact(&claims, &rules);
        let suggestions = derive_training_suggestions(&analyses);

        assert!(suggestions.iter().any(|s| s.topic == "Clinical documentation"));
    }

    #[test]
    fn test_suggestions_capped_at_ten_highest_priority_first() {
        let mut rules = Vec::new();
        let mut claims = Vec::new();
        for i in 0..12 {
            let keyword = format!("cause number {i}");
            rules.push(rule(
                &format!("Rule {i}"),
                RejectionCategory::Technical,
                "X",
                vec![keyword.as_str()],
                Severity::Critical,
                true,
            ));
            claims.push(claim(dec!(50), &keyword));
        }

        let analyses = analyze_impact(&claims, &rules);
        let suggestions = derive_training_suggestions(&analyses);

        assert_eq!(suggestions.len(), 10);
        assert!(suggestions
            .windows(2)
            .all(|w| w[0].priority <= w[1].priority));
    }
}
