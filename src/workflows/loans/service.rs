use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::task::JoinError;
use tokio::time::error::Elapsed;
use tokio::time::timeout;
use tracing::{info, warn};

use super::catalog::{standard_catalog, LoanType};
use super::credit::{CreditProviderError, CreditReportProvider};
use super::documents::{verify_documents, DocumentReport, DocumentVerifier};
use super::domain::{
    ApplicationId, ApplicationStatus, Decision, LoanApplication, RiskEvaluation, ScreeningOutcome,
    UserId,
};
use super::evaluation::{RiskAssessment, RiskConfig, RiskEngine};
use super::fraud::{self, FraudConfig, FraudReport, ReferenceIncomeSource};
use super::intake::{IntakeGuard, NewApplication, ValidationError};
use super::repository::{ApplicationRepository, RepositoryError};

/// Service-level knobs for the review phase.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Budget per evaluator during review; overrun counts as failure.
    pub evaluator_timeout: Duration,
    /// When true, fraud and document outcomes are stored on the record
    /// instead of only being returned to the caller.
    pub persist_screening_outcomes: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            evaluator_timeout: Duration::from_secs(5),
            persist_screening_outcomes: false,
        }
    }
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Service owning the status transition table and orchestrating the intake
/// guard, risk engine, fraud heuristics, and document verification.
pub struct LoanApplicationService<R> {
    repository: Arc<R>,
    bureau: Arc<dyn CreditReportProvider>,
    verifier: Arc<dyn DocumentVerifier>,
    reference_income: Arc<dyn ReferenceIncomeSource>,
    engine: Arc<RiskEngine>,
    guard: IntakeGuard,
    fraud_config: FraudConfig,
    config: LifecycleConfig,
    // Serializes transitions per application id so two concurrent reviews
    // cannot interleave on the same record. Entries are dropped once the
    // record is terminal or turns out not to exist.
    locks: Mutex<HashMap<ApplicationId, Arc<tokio::sync::Mutex<()>>>>,
}

impl<R> LoanApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        bureau: Arc<dyn CreditReportProvider>,
        verifier: Arc<dyn DocumentVerifier>,
        reference_income: Arc<dyn ReferenceIncomeSource>,
    ) -> Self {
        Self::with_configs(
            repository,
            bureau,
            verifier,
            reference_income,
            RiskConfig::default(),
            IntakeGuard::default(),
            FraudConfig::default(),
            LifecycleConfig::default(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_configs(
        repository: Arc<R>,
        bureau: Arc<dyn CreditReportProvider>,
        verifier: Arc<dyn DocumentVerifier>,
        reference_income: Arc<dyn ReferenceIncomeSource>,
        risk_config: RiskConfig,
        guard: IntakeGuard,
        fraud_config: FraudConfig,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            repository,
            bureau,
            verifier,
            reference_income,
            engine: Arc::new(RiskEngine::new(risk_config)),
            guard,
            fraud_config,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Validate a submission and persist the draft record.
    pub fn create(&self, submission: NewApplication) -> Result<LoanApplication, ServiceError> {
        let mut application = self.guard.application_from_submission(submission)?;
        application.id = next_application_id();

        let stored = self.repository.insert(application)?;
        info!(application = %stored.id.0, user = %stored.user_id.0, "loan application drafted");
        Ok(stored)
    }

    /// draft -> submitted, with a best-effort first risk assessment. A
    /// missing credit report or scorer failure does not block the
    /// submission; the assessment simply stays pending.
    pub async fn submit(&self, id: &ApplicationId) -> Result<LoanApplication, ServiceError> {
        let lock = self.lock_for(id);
        let _permit = lock.lock().await;

        let mut application = self.fetch_locked(id)?;

        if !application.status.can_transition_to(ApplicationStatus::Submitted) {
            return Err(self.refuse_transition("submit", id, application.status));
        }

        application.status = ApplicationStatus::Submitted;
        application.updated_at = Utc::now();

        match self.bureau.report(&application.user_id) {
            Ok(Some(report)) => {
                let assessment = self.engine.assess(&application, &report);
                application.assessment = RiskEvaluation::Scored(assessment);
            }
            Ok(None) => {
                warn!(application = %id.0, "credit report missing, submitting without a score");
            }
            Err(error) => {
                warn!(application = %id.0, %error, "risk assessment failed, submitting without a score");
            }
        }

        self.repository.update(application.clone())?;
        info!(application = %id.0, from = "draft", to = "submitted", "application submitted");
        Ok(application)
    }

    /// submitted -> under_review. Risk, fraud, and document evaluation run
    /// concurrently against the same snapshot; their write targets are
    /// disjoint. Nothing is committed unless all three complete within the
    /// evaluator budget, so a failed review leaves the record submitted.
    pub async fn review(&self, id: &ApplicationId) -> Result<ReviewOutcome, ServiceError> {
        let lock = self.lock_for(id);
        let _permit = lock.lock().await;

        let application = self.fetch_locked(id)?;

        if !application.status.can_transition_to(ApplicationStatus::UnderReview) {
            return Err(self.refuse_transition("review", id, application.status));
        }

        let report = self
            .bureau
            .report(&application.user_id)?
            .ok_or(ServiceError::CreditReportNotFound)?;

        let budget = self.config.evaluator_timeout;

        let risk_task = {
            let engine = Arc::clone(&self.engine);
            let snapshot = application.clone();
            let report = report.clone();
            timeout(
                budget,
                tokio::task::spawn_blocking(move || engine.assess(&snapshot, &report)),
            )
        };
        let fraud_task = {
            let snapshot = application.clone();
            let source = Arc::clone(&self.reference_income);
            let config = self.fraud_config.clone();
            timeout(
                budget,
                tokio::task::spawn_blocking(move || {
                    let reference = source.reference_income(&snapshot.user_id);
                    fraud::screen(&snapshot, reference, &config)
                }),
            )
        };
        let documents_task = {
            let snapshot = application.clone();
            let verifier = Arc::clone(&self.verifier);
            timeout(
                budget,
                tokio::task::spawn_blocking(move || {
                    verify_documents(&snapshot.documents, verifier.as_ref())
                }),
            )
        };

        let (risk, fraud, documents) = tokio::join!(risk_task, fraud_task, documents_task);
        let risk = unwrap_evaluator(risk, "risk scoring")?;
        let fraud = unwrap_evaluator(fraud, "fraud screening")?;
        let documents = unwrap_evaluator(documents, "document verification")?;

        let mut updated = application;
        updated.status = ApplicationStatus::UnderReview;
        updated.assessment = RiskEvaluation::Scored(risk.clone());
        // Matching by id, not name: documents may share a display name.
        for document in &mut updated.documents {
            if !documents.failed_document_ids.contains(&document.id) {
                document.verified = true;
            }
        }
        if self.config.persist_screening_outcomes {
            updated.screening = Some(ScreeningOutcome {
                fraud: fraud.clone(),
                documents: documents.clone(),
            });
        }
        updated.updated_at = Utc::now();

        self.repository.update(updated)?;
        info!(
            application = %id.0,
            from = "submitted",
            to = "under_review",
            risk_score = risk.score,
            fraud_detected = fraud.fraud_detected,
            documents_verified = documents.verified,
            "application review completed"
        );

        Ok(ReviewOutcome {
            risk,
            fraud,
            documents,
        })
    }

    /// under_review -> approved | rejected. Terminal states accept nothing
    /// further.
    pub async fn decide(
        &self,
        id: &ApplicationId,
        decision: Decision,
    ) -> Result<LoanApplication, ServiceError> {
        let lock = self.lock_for(id);
        let _permit = lock.lock().await;

        let mut application = self.fetch_locked(id)?;

        let next = decision.resulting_status();
        if !application.status.can_transition_to(next) {
            return Err(self.refuse_transition("process", id, application.status));
        }

        application.status = next;
        application.updated_at = Utc::now();

        self.repository.update(application.clone())?;
        self.discard_lock(id);
        info!(
            application = %id.0,
            from = "under_review",
            to = next.label(),
            "application decided"
        );
        Ok(application)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<LoanApplication, ServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(ServiceError::ApplicationNotFound)
    }

    pub fn list_by_user(&self, user: &UserId) -> Result<Vec<LoanApplication>, ServiceError> {
        Ok(self.repository.list_by_user(user)?)
    }

    pub fn list_all(&self) -> Result<Vec<LoanApplication>, ServiceError> {
        Ok(self.repository.list_all()?)
    }

    pub fn loan_types(&self) -> Vec<LoanType> {
        standard_catalog()
    }

    fn lock_for(&self, id: &ApplicationId) -> Arc<tokio::sync::Mutex<()>> {
        let mut guard = self.locks.lock().expect("lock table mutex poisoned");
        Arc::clone(guard.entry(id.clone()).or_default())
    }

    fn discard_lock(&self, id: &ApplicationId) {
        let mut guard = self.locks.lock().expect("lock table mutex poisoned");
        guard.remove(id);
    }

    // Fetch under the per-id lock; an unknown id also drops the lock entry
    // created for it.
    fn fetch_locked(&self, id: &ApplicationId) -> Result<LoanApplication, ServiceError> {
        match self.repository.fetch(id)? {
            Some(application) => Ok(application),
            None => {
                self.discard_lock(id);
                Err(ServiceError::ApplicationNotFound)
            }
        }
    }

    fn refuse_transition(
        &self,
        operation: &'static str,
        id: &ApplicationId,
        current: ApplicationStatus,
    ) -> ServiceError {
        if current.is_terminal() {
            self.discard_lock(id);
        }
        ServiceError::InvalidState { operation, current }
    }

    #[cfg(test)]
    pub(super) fn tracked_locks(&self) -> usize {
        self.locks.lock().expect("lock table mutex poisoned").len()
    }
}

fn unwrap_evaluator<T>(
    result: Result<Result<T, JoinError>, Elapsed>,
    stage: &'static str,
) -> Result<T, ServiceError> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join)) => Err(ServiceError::ReviewFailed(format!("{stage} aborted: {join}"))),
        Err(_) => Err(ServiceError::ReviewFailed(format!(
            "{stage} exceeded the evaluator budget"
        ))),
    }
}

/// Everything a completed review hands back to the officer. Risk is also
/// persisted on the record; fraud and documents persist only when configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutcome {
    pub risk: RiskAssessment,
    pub fraud: FraudReport,
    pub documents: DocumentReport,
}

/// Error raised by the lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("application not found")]
    ApplicationNotFound,
    #[error("credit report not found")]
    CreditReportNotFound,
    #[error("cannot {operation} application in {} status", .current.label())]
    InvalidState {
        operation: &'static str,
        current: ApplicationStatus,
    },
    #[error("review process failed: {0}")]
    ReviewFailed(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Credit(#[from] CreditProviderError),
}
