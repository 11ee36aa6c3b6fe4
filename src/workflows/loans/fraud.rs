use serde::{Deserialize, Serialize};

use super::domain::{LoanApplication, UserId};

/// Bureau-style income figure used to cross-check declared income. Injected
/// so the heuristics never bake in a magic constant.
pub trait ReferenceIncomeSource: Send + Sync {
    fn reference_income(&self, user: &UserId) -> Option<f64>;
}

/// Single-figure source for development wiring and tests.
pub struct FixedReferenceIncome(pub f64);

impl ReferenceIncomeSource for FixedReferenceIncome {
    fn reference_income(&self, _user: &UserId) -> Option<f64> {
        Some(self.0)
    }
}

/// Dials for the two heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudConfig {
    /// Amounts above income times this multiple are flagged.
    pub income_multiple_ceiling: f64,
    /// Relative declared-vs-reference income gap tolerated before flagging.
    pub income_discrepancy_tolerance: f64,
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            income_multiple_ceiling: 24.0,
            income_discrepancy_tolerance: 0.30,
        }
    }
}

/// Outcome of the fraud heuristics. A clean screen carries an empty reasons
/// list, never a placeholder message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudReport {
    pub fraud_detected: bool,
    pub reasons: Vec<String>,
}

/// Pure heuristic pass. Each rule fires independently and appends its own
/// reason; multiple reasons may co-occur.
pub fn screen(
    application: &LoanApplication,
    reference_income: Option<f64>,
    config: &FraudConfig,
) -> FraudReport {
    let mut reasons = Vec::new();
    let mut fraud_detected = false;

    if application.loan_amount > application.income_monthly * config.income_multiple_ceiling {
        reasons.push("Unusual loan amount relative to income".to_string());
        fraud_detected = true;
    }

    if let Some(reference) = reference_income {
        if reference > 0.0 {
            let discrepancy = (application.income_monthly - reference).abs() / reference;
            if discrepancy > config.income_discrepancy_tolerance {
                reasons.push("Significant income discrepancy".to_string());
                fraud_detected = true;
            }
        }
    }

    FraudReport {
        fraud_detected,
        reasons,
    }
}
