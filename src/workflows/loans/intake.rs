use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationId, ApplicationStatus, Document, DocumentId, DocumentKind, EmploymentStatus,
    LoanApplication, RiskEvaluation, UserId,
};

/// Inbound creation payload before any validation has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApplication {
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
    #[serde(default)]
    pub credit_score: Option<u16>,
    #[serde(default)]
    pub documents: Vec<DocumentDescriptor>,
}

/// Metadata for a document attached at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub kind: DocumentKind,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Rejections raised before anything is persisted.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("loan amount {found} is below the minimum of {minimum}")]
    AmountBelowMinimum { minimum: f64, found: f64 },
    #[error("loan amount must be a positive finite number")]
    AmountNotPositive,
    #[error("loan term of {found} months is below the minimum of {minimum}")]
    TermTooShort { minimum: u32, found: u32 },
    #[error("monthly income {found} is below the minimum of {minimum}")]
    IncomeBelowMinimum { minimum: f64, found: f64 },
    #[error("existing debts must be a non-negative finite number")]
    InvalidDebts,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("applicant name must not be empty")]
    MissingApplicantName,
}

const DEFAULT_MINIMUM_LOAN_AMOUNT: f64 = 1_000.0;
const DEFAULT_MINIMUM_TERM_MONTHS: u32 = 6;
const DEFAULT_MINIMUM_MONTHLY_INCOME: f64 = 1_000.0;

/// Intake floors, adjustable per deployment.
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    pub minimum_loan_amount: f64,
    pub minimum_term_months: u32,
    pub minimum_monthly_income: f64,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            minimum_loan_amount: DEFAULT_MINIMUM_LOAN_AMOUNT,
            minimum_term_months: DEFAULT_MINIMUM_TERM_MONTHS,
            minimum_monthly_income: DEFAULT_MINIMUM_MONTHLY_INCOME,
        }
    }
}

static DOCUMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_document_id() -> DocumentId {
    let id = DOCUMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DocumentId(format!("doc-{id:06}"))
}

/// Guard responsible for turning raw submissions into draft applications.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    /// Validate a submission and build the draft record. The application id
    /// stays a placeholder until the service assigns one.
    pub fn application_from_submission(
        &self,
        submission: NewApplication,
    ) -> Result<LoanApplication, ValidationError> {
        if submission.applicant_name.trim().is_empty() {
            return Err(ValidationError::MissingApplicantName);
        }

        if !is_plausible_email(&submission.email) {
            return Err(ValidationError::InvalidEmail(submission.email));
        }

        if !submission.loan_amount.is_finite() || submission.loan_amount <= 0.0 {
            return Err(ValidationError::AmountNotPositive);
        }

        if submission.loan_amount < self.policy.minimum_loan_amount {
            return Err(ValidationError::AmountBelowMinimum {
                minimum: self.policy.minimum_loan_amount,
                found: submission.loan_amount,
            });
        }

        if submission.loan_term_months < self.policy.minimum_term_months {
            return Err(ValidationError::TermTooShort {
                minimum: self.policy.minimum_term_months,
                found: submission.loan_term_months,
            });
        }

        if !submission.income_monthly.is_finite()
            || submission.income_monthly < self.policy.minimum_monthly_income
        {
            return Err(ValidationError::IncomeBelowMinimum {
                minimum: self.policy.minimum_monthly_income,
                found: submission.income_monthly,
            });
        }

        if !submission.existing_debts.is_finite() || submission.existing_debts < 0.0 {
            return Err(ValidationError::InvalidDebts);
        }

        let now = Utc::now();
        let documents = submission
            .documents
            .into_iter()
            .map(|descriptor| Document {
                id: next_document_id(),
                kind: descriptor.kind,
                name: descriptor.name,
                url: descriptor.url,
                verified: false,
                uploaded_at: now,
            })
            .collect();

        Ok(LoanApplication {
            id: ApplicationId("pending".to_string()),
            user_id: submission.user_id,
            applicant_name: submission.applicant_name,
            email: submission.email,
            phone: submission.phone,
            loan_amount: submission.loan_amount,
            loan_purpose: submission.loan_purpose,
            loan_term_months: submission.loan_term_months,
            employment_status: submission.employment_status,
            income_monthly: submission.income_monthly,
            existing_debts: submission.existing_debts,
            credit_score: submission.credit_score,
            status: ApplicationStatus::Draft,
            documents,
            assessment: RiskEvaluation::Pending,
            screening: None,
            created_at: now,
            updated_at: now,
        })
    }
}

fn is_plausible_email(raw: &str) -> bool {
    let mut parts = raw.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}
