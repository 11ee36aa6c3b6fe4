use super::config::RiskConfig;
use crate::workflows::loans::domain::{CreditReport, LoanApplication};

/// Intermediate ratios shared by the banded components and the
/// recommendation step.
pub(crate) struct RiskSignals {
    pub dti: f64,
    pub lti: f64,
}

pub(crate) fn derive_signals(application: &LoanApplication, report: &CreditReport) -> RiskSignals {
    // Flat principal/term split, no amortization. Zero income or a zero term
    // falls into the worst band rather than dividing by zero.
    let monthly_payment = if application.loan_term_months == 0 {
        f64::INFINITY
    } else {
        application.loan_amount / f64::from(application.loan_term_months)
    };

    let (dti, lti) = if application.income_monthly > 0.0 {
        (
            (report.monthly_obligations + monthly_payment) / application.income_monthly,
            application.loan_amount / (application.income_monthly * 12.0),
        )
    } else {
        (f64::INFINITY, f64::INFINITY)
    };

    RiskSignals { dti, lti }
}

/// Credit bureau component, up to 40 points.
pub(crate) fn credit_component(bureau_score: u16) -> (u8, Option<&'static str>) {
    if bureau_score >= 750 {
        (40, None)
    } else if bureau_score >= 700 {
        (35, None)
    } else if bureau_score >= 650 {
        (25, None)
    } else if bureau_score >= 600 {
        (15, None)
    } else {
        (5, Some("Low credit score increases risk"))
    }
}

/// Debt-to-income component, up to 30 points.
pub(crate) fn dti_component(dti: f64, config: &RiskConfig) -> (u8, Option<&'static str>) {
    if dti <= 0.20 {
        (30, None)
    } else if dti <= 0.30 {
        (25, None)
    } else if dti <= config.dti_threshold {
        (15, None)
    } else {
        (5, Some("Debt-to-income ratio too high"))
    }
}

/// Loan-to-income component, up to 20 points.
pub(crate) fn lti_component(lti: f64, config: &RiskConfig) -> (u8, Option<&'static str>) {
    if lti <= 1.0 {
        (20, None)
    } else if lti <= 2.0 {
        (15, None)
    } else if lti <= config.lti_threshold {
        (10, None)
    } else {
        (0, Some("Loan amount too high relative to income"))
    }
}

/// No stability signal is collected today, so every applicant gets the full
/// employment component.
pub(crate) const EMPLOYMENT_STABILITY_POINTS: u8 = 10;
