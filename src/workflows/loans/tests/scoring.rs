use super::common::*;

#[test]
fn strong_applicant_scores_ninety_five_and_is_recommended() {
    let engine = risk_engine();
    // payment = 25000/36 ~= 694.4, DTI ~= 0.239, LTI ~= 0.417
    let application = application("strong", 25_000.0, 36, 5_000.0);
    let report = credit_report("2", 750, 500.0);

    let assessment = engine.assess(&application, &report);

    assert_eq!(assessment.score, 95);
    assert!(assessment.recommended);
    assert_eq!(
        assessment.reasons,
        vec![
            "Excellent credit history".to_string(),
            "Strong debt management".to_string(),
            "Appropriate loan amount for income".to_string(),
        ]
    );
}

#[test]
fn stretched_applicant_scores_forty_five_and_is_not_recommended() {
    let engine = risk_engine();
    // payment = 75000/120 = 625, DTI = (1600 + 625) / 5000 = 0.445, LTI = 1.25
    let application = application("stretched", 75_000.0, 120, 5_000.0);
    let report = credit_report("2", 600, 1_600.0);

    let assessment = engine.assess(&application, &report);

    assert_eq!(assessment.score, 45);
    assert!(!assessment.recommended);
    assert!(assessment
        .reasons
        .contains(&"Debt-to-income ratio too high".to_string()));
}

#[test]
fn scoring_is_idempotent() {
    let engine = risk_engine();
    let application = application("repeat", 40_000.0, 48, 4_200.0);
    let report = credit_report("2", 680, 900.0);

    let first = engine.assess(&application, &report);
    let second = engine.assess(&application, &report);

    assert_eq!(first, second);
}

#[test]
fn score_stays_within_bounds_and_reasons_are_never_empty() {
    let engine = risk_engine();
    let cases = [
        (application("floor", 500_000.0, 12, 1_000.0), 300u16, 5_000.0),
        (application("ceiling", 10_000.0, 60, 20_000.0), 820, 0.0),
        (application("zero-income", 10_000.0, 24, 0.0), 700, 400.0),
        (application("zero-term", 10_000.0, 0, 5_000.0), 700, 400.0),
    ];

    for (application, score, obligations) in cases {
        let report = credit_report("2", score, obligations);
        let assessment = engine.assess(&application, &report);
        assert!(
            (5..=100).contains(&assessment.score),
            "score {} out of range for {}",
            assessment.score,
            application.id.0
        );
        assert!(
            !assessment.reasons.is_empty(),
            "reasons empty for {}",
            application.id.0
        );
    }
}

#[test]
fn credit_gate_blocks_recommendation_despite_good_score() {
    let engine = risk_engine();
    // credit 610 -> 15 pts, DTI 0.239 -> 25, LTI 0.417 -> 20, +10 = 70 >= 60,
    // but the 650 bureau gate fails.
    let application = application("gated", 25_000.0, 36, 5_000.0);
    let report = credit_report("2", 610, 500.0);

    let assessment = engine.assess(&application, &report);

    assert_eq!(assessment.score, 70);
    assert!(!assessment.recommended);
    assert!(assessment
        .reasons
        .contains(&"Credit score below minimum threshold".to_string()));
}

#[test]
fn recommended_with_no_standout_factors_gets_default_reason() {
    let engine = risk_engine();
    // credit 660 -> 25, DTI (400 + 1000)/4000 = 0.35 -> 15, LTI 2.5 -> 10,
    // +10 = 60: recommended, no negative flags, no positive thresholds met.
    let application = application("plain", 120_000.0, 120, 4_000.0);
    let report = credit_report("2", 660, 400.0);

    let assessment = engine.assess(&application, &report);

    assert_eq!(assessment.score, 60);
    assert!(assessment.recommended);
    assert_eq!(
        assessment.reasons,
        vec!["No specific risk factors identified".to_string()]
    );
}

#[test]
fn low_credit_band_flags_the_score() {
    let engine = risk_engine();
    let application = application("low-credit", 25_000.0, 36, 5_000.0);
    let report = credit_report("2", 540, 500.0);

    let assessment = engine.assess(&application, &report);

    assert!(assessment
        .reasons
        .contains(&"Low credit score increases risk".to_string()));
    assert!(!assessment.recommended);
}

#[test]
fn oversized_loan_flags_loan_to_income() {
    let engine = risk_engine();
    // LTI = 300000 / 48000 = 6.25 > 3.5: zero points plus a reason.
    let application = application("oversized", 300_000.0, 120, 4_000.0);
    let report = credit_report("2", 760, 200.0);

    let assessment = engine.assess(&application, &report);

    assert!(assessment
        .reasons
        .contains(&"Loan amount too high relative to income".to_string()));
}
