use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::documents::DocumentReport;
use super::evaluation::RiskAssessment;
use super::fraud::FraudReport;

/// Identifier wrapper for loan applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for the applicant owning a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for attached documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

/// Declared employment situation captured at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Retired,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentStatus::Employed => "employed",
            EmploymentStatus::SelfEmployed => "self_employed",
            EmploymentStatus::Unemployed => "unemployed",
            EmploymentStatus::Retired => "retired",
        }
    }
}

/// Lifecycle status tracked throughout the loan application workflow.
///
/// Transitions run one way: draft -> submitted -> under_review, then the
/// terminal approve/reject split. Terminal states accept nothing further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Rejected
        )
    }

    pub const fn can_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Draft, ApplicationStatus::Submitted)
                | (ApplicationStatus::Submitted, ApplicationStatus::UnderReview)
                | (ApplicationStatus::UnderReview, ApplicationStatus::Approved)
                | (ApplicationStatus::UnderReview, ApplicationStatus::Rejected)
        )
    }
}

/// Officer decision closing out a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub const fn resulting_status(self) -> ApplicationStatus {
        match self {
            Decision::Approve => ApplicationStatus::Approved,
            Decision::Reject => ApplicationStatus::Rejected,
        }
    }
}

/// Categories of supporting documentation accepted at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Id,
    IncomeProof,
    TaxReturn,
    BankStatement,
    BusinessPlan,
    Other,
}

/// One attached file record. The verified flag defaults to false and is only
/// flipped by the document verification pass during review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub name: String,
    pub url: String,
    pub verified: bool,
    pub uploaded_at: DateTime<Utc>,
}

/// Whether the risk engine has produced an assessment for the record yet.
///
/// Kept as a sum type (rather than a nullable score plus a nullable
/// recommendation) so a half-populated assessment cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RiskEvaluation {
    Pending,
    Scored(RiskAssessment),
}

impl RiskEvaluation {
    pub fn is_scored(&self) -> bool {
        matches!(self, RiskEvaluation::Scored(_))
    }

    pub fn score(&self) -> Option<u8> {
        match self {
            RiskEvaluation::Pending => None,
            RiskEvaluation::Scored(assessment) => Some(assessment.score),
        }
    }

    pub fn assessment(&self) -> Option<&RiskAssessment> {
        match self {
            RiskEvaluation::Pending => None,
            RiskEvaluation::Scored(assessment) => Some(assessment),
        }
    }
}

/// Fraud and document results captured during review. Only stored when the
/// service is configured to persist screening outcomes; otherwise they are
/// returned to the caller transiently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub fraud: FraudReport,
    pub documents: DocumentReport,
}

/// One applicant's loan request as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub applicant_name: String,
    pub email: String,
    pub phone: String,
    pub loan_amount: f64,
    pub loan_purpose: String,
    pub loan_term_months: u32,
    pub employment_status: EmploymentStatus,
    pub income_monthly: f64,
    pub existing_debts: f64,
    pub credit_score: Option<u16>,
    pub status: ApplicationStatus,
    pub documents: Vec<Document>,
    pub assessment: RiskEvaluation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screening: Option<ScreeningOutcome>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoanApplication {
    pub fn risk_score(&self) -> Option<u8> {
        self.assessment.score()
    }
}

/// One historical credit line on a bureau report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLine {
    pub loan_type: String,
    pub status: String,
    pub amount: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Bureau-sourced credit snapshot. Read-only input to scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditReport {
    pub user_id: UserId,
    pub score: u16,
    pub total_debts: f64,
    pub monthly_obligations: f64,
    pub history: Vec<CreditLine>,
}
