use serde::{Deserialize, Serialize};

/// Gate thresholds applied on top of the fixed scoring bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// DTI above this is the worst debt band (43% is the common cutoff).
    pub dti_threshold: f64,
    /// LTI above this earns no loan-size points.
    pub lti_threshold: f64,
    /// Bureau score an applicant must clear to be recommended at all.
    pub minimum_credit_score: u16,
    /// Composite score required before a recommendation is considered.
    pub recommendation_floor: u8,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            dti_threshold: 0.43,
            lti_threshold: 3.5,
            minimum_credit_score: 650,
            recommendation_floor: 60,
        }
    }
}
