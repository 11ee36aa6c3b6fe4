use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::loans::credit::InMemoryCreditBureau;
use crate::workflows::loans::documents::DocumentVerifier;
use crate::workflows::loans::domain::{
    ApplicationId, ApplicationStatus, CreditReport, Document, DocumentId, DocumentKind,
    EmploymentStatus, LoanApplication, RiskEvaluation, UserId,
};
use crate::workflows::loans::evaluation::{RiskConfig, RiskEngine};
use crate::workflows::loans::fraud::{FixedReferenceIncome, ReferenceIncomeSource};
use crate::workflows::loans::intake::{DocumentDescriptor, IntakeGuard, NewApplication};
use crate::workflows::loans::repository::InMemoryRepository;
use crate::workflows::loans::service::{LifecycleConfig, LoanApplicationService};
use crate::workflows::loans::FraudConfig;

pub(super) fn submission() -> NewApplication {
    NewApplication {
        user_id: UserId("2".to_string()),
        applicant_name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        phone: "123-456-7890".to_string(),
        loan_amount: 25_000.0,
        loan_purpose: "Home renovation".to_string(),
        loan_term_months: 36,
        employment_status: EmploymentStatus::Employed,
        income_monthly: 5_000.0,
        existing_debts: 10_000.0,
        credit_score: Some(720),
        documents: vec![
            DocumentDescriptor {
                kind: DocumentKind::Id,
                name: "ID Card".to_string(),
                url: "/documents/id.pdf".to_string(),
            },
            DocumentDescriptor {
                kind: DocumentKind::IncomeProof,
                name: "Pay Slip".to_string(),
                url: "/documents/payslip.pdf".to_string(),
            },
        ],
    }
}

pub(super) fn credit_report(user: &str, score: u16, monthly_obligations: f64) -> CreditReport {
    CreditReport {
        user_id: UserId(user.to_string()),
        score,
        total_debts: 10_000.0,
        monthly_obligations,
        history: Vec::new(),
    }
}

/// Direct record builder for engine-level tests that bypass intake.
pub(super) fn application(
    suffix: &str,
    loan_amount: f64,
    loan_term_months: u32,
    income_monthly: f64,
) -> LoanApplication {
    let now = Utc::now();
    LoanApplication {
        id: ApplicationId(format!("app-{suffix}")),
        user_id: UserId("2".to_string()),
        applicant_name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        phone: "123-456-7890".to_string(),
        loan_amount,
        loan_purpose: "Home renovation".to_string(),
        loan_term_months,
        employment_status: EmploymentStatus::Employed,
        income_monthly,
        existing_debts: 10_000.0,
        credit_score: None,
        status: ApplicationStatus::Submitted,
        documents: vec![Document {
            id: DocumentId(format!("doc-{suffix}")),
            kind: DocumentKind::Id,
            name: "ID Card".to_string(),
            url: "/documents/id.pdf".to_string(),
            verified: false,
            uploaded_at: now,
        }],
        assessment: RiskEvaluation::Pending,
        screening: None,
        created_at: now,
        updated_at: now,
    }
}

pub(super) fn risk_engine() -> RiskEngine {
    RiskEngine::new(RiskConfig::default())
}

/// Verifier stub that records every inspection.
pub(super) struct CountingVerifier {
    verdict: bool,
    calls: AtomicUsize,
}

impl CountingVerifier {
    pub(super) fn passing() -> Self {
        Self {
            verdict: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DocumentVerifier for CountingVerifier {
    fn inspect(&self, _document: &Document) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict
    }
}

/// Verifier stub rejecting specific document ids, chosen after the service
/// is wired up (intake assigns the ids).
pub(super) struct IdListVerifier {
    rejected: Mutex<HashSet<DocumentId>>,
}

impl IdListVerifier {
    pub(super) fn new() -> Self {
        Self {
            rejected: Mutex::new(HashSet::new()),
        }
    }

    pub(super) fn reject(&self, id: DocumentId) {
        self.rejected
            .lock()
            .expect("verifier mutex poisoned")
            .insert(id);
    }
}

impl DocumentVerifier for IdListVerifier {
    fn inspect(&self, document: &Document) -> bool {
        !self
            .rejected
            .lock()
            .expect("verifier mutex poisoned")
            .contains(&document.id)
    }
}

/// Verifier that panics, standing in for a crashed verification backend.
pub(super) struct PanickingVerifier;

impl DocumentVerifier for PanickingVerifier {
    fn inspect(&self, _document: &Document) -> bool {
        panic!("verification backend crashed")
    }
}

/// Verifier that blocks past any reasonable evaluator budget.
pub(super) struct StalledVerifier(pub(super) Duration);

impl DocumentVerifier for StalledVerifier {
    fn inspect(&self, _document: &Document) -> bool {
        std::thread::sleep(self.0);
        true
    }
}

pub(super) type MemoryService = LoanApplicationService<InMemoryRepository>;

pub(super) fn build_service() -> (Arc<MemoryService>, Arc<InMemoryRepository>, Arc<CountingVerifier>)
{
    service_with(
        Arc::new(CountingVerifier::passing()),
        vec![credit_report("2", 720, 500.0)],
        LifecycleConfig::default(),
    )
}

pub(super) fn service_with(
    verifier: Arc<CountingVerifier>,
    reports: Vec<CreditReport>,
    config: LifecycleConfig,
) -> (Arc<MemoryService>, Arc<InMemoryRepository>, Arc<CountingVerifier>)
{
    let repository = Arc::new(InMemoryRepository::default());
    let service = LoanApplicationService::with_configs(
        repository.clone(),
        Arc::new(InMemoryCreditBureau::with_reports(reports)),
        verifier.clone(),
        reference_income(),
        RiskConfig::default(),
        IntakeGuard::default(),
        FraudConfig::default(),
        config,
    );
    (Arc::new(service), repository, verifier)
}

pub(super) fn service_with_verifier(
    verifier: Arc<dyn DocumentVerifier>,
    config: LifecycleConfig,
) -> (Arc<MemoryService>, Arc<InMemoryRepository>) {
    let repository = Arc::new(InMemoryRepository::default());
    let service = LoanApplicationService::with_configs(
        repository.clone(),
        Arc::new(InMemoryCreditBureau::with_reports(vec![credit_report(
            "2", 720, 500.0,
        )])),
        verifier,
        reference_income(),
        RiskConfig::default(),
        IntakeGuard::default(),
        FraudConfig::default(),
        config,
    );
    (Arc::new(service), repository)
}

// Reference figure matching the stock submission income so the fraud screen
// stays quiet unless a test says otherwise.
fn reference_income() -> Arc<dyn ReferenceIncomeSource> {
    Arc::new(FixedReferenceIncome(5_000.0))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
