mod config;
mod scoring;

pub use config::RiskConfig;

use serde::{Deserialize, Serialize};

use super::domain::{CreditReport, LoanApplication};

/// Stateless scorer that turns an application plus its credit report into a
/// 0-100 composite score and an advisory recommendation.
pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Pure computation: identical inputs always yield identical output.
    pub fn assess(&self, application: &LoanApplication, report: &CreditReport) -> RiskAssessment {
        let signals = scoring::derive_signals(application, report);
        let mut reasons: Vec<String> = Vec::new();

        let (credit_points, credit_flag) = scoring::credit_component(report.score);
        if let Some(flag) = credit_flag {
            reasons.push(flag.to_string());
        }

        let (dti_points, dti_flag) = scoring::dti_component(signals.dti, &self.config);
        if let Some(flag) = dti_flag {
            reasons.push(flag.to_string());
        }

        let (lti_points, lti_flag) = scoring::lti_component(signals.lti, &self.config);
        if let Some(flag) = lti_flag {
            reasons.push(flag.to_string());
        }

        let score =
            credit_points + dti_points + lti_points + scoring::EMPLOYMENT_STABILITY_POINTS;

        let clears_floor = score >= self.config.recommendation_floor;
        let recommended = clears_floor && report.score >= self.config.minimum_credit_score;

        if clears_floor && !recommended {
            reasons.push("Credit score below minimum threshold".to_string());
        }

        if recommended && reasons.is_empty() {
            if report.score >= 700 {
                reasons.push("Excellent credit history".to_string());
            }
            if signals.dti <= 0.30 {
                reasons.push("Strong debt management".to_string());
            }
            if signals.lti <= 2.0 {
                reasons.push("Appropriate loan amount for income".to_string());
            }
        }

        if reasons.is_empty() {
            reasons.push("No specific risk factors identified".to_string());
        }

        RiskAssessment {
            score,
            recommended,
            reasons,
        }
    }
}

/// Scorer output surfaced to officers as a decision aid, never binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub recommended: bool,
    pub reasons: Vec<String>,
}
