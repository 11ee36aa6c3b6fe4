use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{CreditReport, UserId};

/// Bureau lookup abstraction so the service never depends on a concrete
/// credit data source.
pub trait CreditReportProvider: Send + Sync {
    fn report(&self, user: &UserId) -> Result<Option<CreditReport>, CreditProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CreditProviderError {
    #[error("credit bureau unavailable: {0}")]
    Unavailable(String),
}

/// Map-backed bureau stand-in for development and tests.
#[derive(Default)]
pub struct InMemoryCreditBureau {
    reports: Mutex<HashMap<UserId, CreditReport>>,
}

impl InMemoryCreditBureau {
    pub fn with_reports(reports: impl IntoIterator<Item = CreditReport>) -> Self {
        let reports = reports
            .into_iter()
            .map(|report| (report.user_id.clone(), report))
            .collect();
        Self {
            reports: Mutex::new(reports),
        }
    }

    pub fn put(&self, report: CreditReport) {
        self.reports
            .lock()
            .expect("credit bureau mutex poisoned")
            .insert(report.user_id.clone(), report);
    }
}

impl CreditReportProvider for InMemoryCreditBureau {
    fn report(&self, user: &UserId) -> Result<Option<CreditReport>, CreditProviderError> {
        let guard = self.reports.lock().expect("credit bureau mutex poisoned");
        Ok(guard.get(user).cloned())
    }
}
