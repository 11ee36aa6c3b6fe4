use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

use super::domain::{ApplicationId, LoanApplication, UserId};

/// Storage abstraction so the lifecycle service can be exercised in
/// isolation. Updates replace the whole record, and the store guarantees
/// atomic single-record read-modify-write.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: LoanApplication) -> Result<LoanApplication, RepositoryError>;
    fn update(&self, application: LoanApplication) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<LoanApplication>, RepositoryError>;
    fn list_by_user(&self, user: &UserId) -> Result<Vec<LoanApplication>, RepositoryError>;
    fn list_all(&self) -> Result<Vec<LoanApplication>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Map-backed store used by the dev server and tests. A database-backed
/// implementation plugs in behind the same trait.
#[derive(Default)]
pub struct InMemoryRepository {
    records: Mutex<HashMap<ApplicationId, LoanApplication>>,
}

impl ApplicationRepository for InMemoryRepository {
    fn insert(&self, application: LoanApplication) -> Result<LoanApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: LoanApplication) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&application.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<LoanApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_by_user(&self, user: &UserId) -> Result<Vec<LoanApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<LoanApplication> = guard
            .values()
            .filter(|application| &application.user_id == user)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
    }

    fn list_all(&self) -> Result<Vec<LoanApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<LoanApplication> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub status: &'static str,
    pub decision_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u8>,
}

impl ApplicationStatusView {
    pub fn from_application(application: &LoanApplication) -> Self {
        let decision_rationale = match application.assessment.assessment() {
            Some(assessment) => assessment.reasons.join("; "),
            None => "pending risk assessment".to_string(),
        };

        Self {
            application_id: application.id.clone(),
            status: application.status.label(),
            decision_rationale,
            risk_score: application.risk_score(),
        }
    }
}
