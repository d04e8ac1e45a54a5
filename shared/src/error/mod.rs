//! Unified error system for the trip-charge review
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Booking and charge errors
//! - 5xxx: Payment errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::BookingNotFound);
//! assert_eq!(err.http_status(), shared::http::StatusCode::NOT_FOUND);
//!
//! let err = AppError::with_message(ErrorCode::ReasonRequired, "Waive reason is required")
//!     .with_detail("field", "waiveReason");
//! assert!(err.details.is_some());
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
