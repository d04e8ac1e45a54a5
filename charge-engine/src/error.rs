//! Charge engine error types

use shared::error::{AppError, ErrorCode};
use shared::settlement::ReviewAction;
use thiserror::Error;

/// Errors raised by the adjustment engine and submission validation
///
/// All of these are local validation failures: they are caught before any
/// request leaves the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChargeError {
    #[error("Charge line item {index} not found (sheet has {len} items)")]
    ItemNotFound { index: usize, len: usize },

    #[error("A reason is required for {0}")]
    ReasonRequired(ReviewAction),

    #[error("Waive percentage must be greater than 0 and at most 100, got {0}")]
    InvalidWaivePercentage(f64),

    #[error("{field} must be a finite amount between 0 and 1,000,000, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("There are no included charges to process")]
    NothingToCharge,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ChargeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ItemNotFound { .. } => ErrorCode::ChargeItemNotFound,
            Self::ReasonRequired(_) => ErrorCode::ReasonRequired,
            Self::InvalidWaivePercentage(_) => ErrorCode::InvalidWaivePercentage,
            Self::InvalidAmount { .. } => ErrorCode::InvalidChargeAmount,
            Self::NothingToCharge => ErrorCode::NothingToCharge,
            Self::InvalidRequest(_) => ErrorCode::InvalidRequest,
        }
    }
}

impl From<ChargeError> for AppError {
    fn from(err: ChargeError) -> Self {
        let app = AppError::with_message(err.code(), err.to_string());
        match err {
            ChargeError::ItemNotFound { index, .. } => app.with_detail("index", index),
            ChargeError::ReasonRequired(action) => app.with_detail("action", action.as_str()),
            ChargeError::InvalidAmount { field, .. } => app.with_detail("field", field),
            _ => app,
        }
    }
}

pub type EngineResult<T> = Result<T, ChargeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_app_error_keeps_code_and_detail() {
        let app: AppError = ChargeError::ReasonRequired(ReviewAction::Waive).into();
        assert_eq!(app.code, ErrorCode::ReasonRequired);
        assert_eq!(app.message, "A reason is required for waive");
        assert_eq!(
            app.details.unwrap().get("action"),
            Some(&serde_json::Value::from("waive"))
        );
    }
}
