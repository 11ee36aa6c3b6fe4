use serde::{Deserialize, Serialize};

use super::domain::DocumentKind;

/// Catalog entry describing one loan product. Display and intake validation
/// data only; the lifecycle state machine never consults it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub interest_rate: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    pub min_term_months: u32,
    pub max_term_months: u32,
    pub required_documents: Vec<DocumentKind>,
}

/// The three standard products offered today.
pub fn standard_catalog() -> Vec<LoanType> {
    vec![
        LoanType {
            id: "personal".to_string(),
            name: "Personal Loan".to_string(),
            description: "General purpose personal loan".to_string(),
            interest_rate: 9.5,
            min_amount: 1_000.0,
            max_amount: 50_000.0,
            min_term_months: 6,
            max_term_months: 60,
            required_documents: vec![
                DocumentKind::Id,
                DocumentKind::IncomeProof,
                DocumentKind::BankStatement,
            ],
        },
        LoanType {
            id: "home".to_string(),
            name: "Home Loan".to_string(),
            description: "Loan for home purchase or renovation".to_string(),
            interest_rate: 7.5,
            min_amount: 10_000.0,
            max_amount: 500_000.0,
            min_term_months: 12,
            max_term_months: 360,
            required_documents: vec![
                DocumentKind::Id,
                DocumentKind::IncomeProof,
                DocumentKind::TaxReturn,
                DocumentKind::BankStatement,
            ],
        },
        LoanType {
            id: "business".to_string(),
            name: "Business Loan".to_string(),
            description: "Loan for business purposes".to_string(),
            interest_rate: 11.0,
            min_amount: 5_000.0,
            max_amount: 200_000.0,
            min_term_months: 12,
            max_term_months: 84,
            required_documents: vec![
                DocumentKind::Id,
                DocumentKind::IncomeProof,
                DocumentKind::TaxReturn,
                DocumentKind::BankStatement,
                DocumentKind::BusinessPlan,
            ],
        },
    ]
}
