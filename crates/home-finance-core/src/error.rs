use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeFinanceError {
    #[error("Invalid loan parameters: {field} — {reason}")]
    InvalidLoanParameters { field: String, reason: String },

    #[error("Invalid budget category: {field} — {reason}")]
    InvalidBudgetCategory { field: String, reason: String },
}
