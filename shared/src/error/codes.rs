//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Booking and charge errors
//! - 5xxx: Payment errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    PermissionDenied = 2001,

    // ==================== 4xxx: Booking / Charges ====================
    BookingNotFound = 4001,
    ChargeItemNotFound = 4002,
    ChargeNotesMalformed = 4003,
    ReasonRequired = 4004,
    InvalidWaivePercentage = 4005,
    InvalidChargeAmount = 4006,
    NothingToCharge = 4007,

    // ==================== 5xxx: Payment ====================
    PaymentFailed = 5001,
    ChargeDeclined = 5002,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    NetworkError = 9003,
    TimeoutError = 9004,
    ConfigError = 9005,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Booking / Charges
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::ChargeItemNotFound => "Charge line item not found",
            ErrorCode::ChargeNotesMalformed => "Stored charge notes could not be parsed",
            ErrorCode::ReasonRequired => "A reason is required for this action",
            ErrorCode::InvalidWaivePercentage => "Waive percentage must be between 0 and 100",
            ErrorCode::InvalidChargeAmount => "Charge amount is invalid",
            ErrorCode::NothingToCharge => "There are no charges to process",

            // Payment
            ErrorCode::PaymentFailed => "Payment failed",
            ErrorCode::ChargeDeclined => "Charge was declined by the payment provider",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Request timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Returned when a u16 does not correspond to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,
            1001 => ErrorCode::NotAuthenticated,
            2001 => ErrorCode::PermissionDenied,
            4001 => ErrorCode::BookingNotFound,
            4002 => ErrorCode::ChargeItemNotFound,
            4003 => ErrorCode::ChargeNotesMalformed,
            4004 => ErrorCode::ReasonRequired,
            4005 => ErrorCode::InvalidWaivePercentage,
            4006 => ErrorCode::InvalidChargeAmount,
            4007 => ErrorCode::NothingToCharge,
            5001 => ErrorCode::PaymentFailed,
            5002 => ErrorCode::ChargeDeclined,
            9001 => ErrorCode::InternalError,
            9003 => ErrorCode::NetworkError,
            9004 => ErrorCode::TimeoutError,
            9005 => ErrorCode::ConfigError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
