//! Loan application intake, lifecycle, and risk assessment workflow.
//!
//! The lifecycle service owns the status transition table
//! (draft -> submitted -> under_review -> approved/rejected) and orchestrates
//! the risk engine, fraud heuristics, and document verification at the
//! transitions that require them. Storage, credit data, reference income,
//! and document inspection are all trait seams so the workflow can run
//! against in-memory stand-ins in tests and the dev server.

pub mod catalog;
pub mod credit;
pub mod documents;
pub mod domain;
pub(crate) mod evaluation;
pub mod fraud;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{standard_catalog, LoanType};
pub use credit::{CreditProviderError, CreditReportProvider, InMemoryCreditBureau};
pub use documents::{
    verify_documents, ApprovingVerifier, DocumentReport, DocumentVerifier, NameListVerifier,
    SamplingVerifier,
};
pub use domain::{
    ApplicationId, ApplicationStatus, CreditLine, CreditReport, Decision, Document, DocumentId,
    DocumentKind, EmploymentStatus, LoanApplication, RiskEvaluation, ScreeningOutcome, UserId,
};
pub use evaluation::{RiskAssessment, RiskConfig, RiskEngine};
pub use fraud::{FixedReferenceIncome, FraudConfig, FraudReport, ReferenceIncomeSource};
pub use intake::{DocumentDescriptor, IntakeGuard, IntakePolicy, NewApplication, ValidationError};
pub use repository::{
    ApplicationRepository, ApplicationStatusView, InMemoryRepository, RepositoryError,
};
pub use router::loan_router;
pub use service::{LifecycleConfig, LoanApplicationService, ReviewOutcome, ServiceError};
