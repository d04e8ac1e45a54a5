//! Client error types

use charge_engine::ChargeError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request rejected locally, nothing was sent
    #[error("Validation error: {0}")]
    Rejected(#[from] ChargeError),

    /// Booking id cannot be used as a URL path segment, nothing was sent
    #[error("Invalid booking id: {0:?}")]
    InvalidBookingId(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The verification endpoint has no such booking
    #[error("Booking {booking_id} not found: {message}")]
    BookingNotFound { booking_id: String, message: String },

    /// Server-side validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-2xx response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Rejected(e) => e.code(),
            Self::InvalidBookingId(_) => ErrorCode::InvalidRequest,
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Unauthorized => ErrorCode::NotAuthenticated,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::BookingNotFound { .. } => ErrorCode::BookingNotFound,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Server { status, .. } => shared::http::StatusCode::from_u16(*status)
                .map(ErrorCode::from_http_status)
                .unwrap_or(ErrorCode::InternalError),
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Raised before any network I/O
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Rejected(_) | Self::InvalidBookingId(_) | Self::Config(_)
        )
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let app = AppError::with_message(err.code(), err.to_string());
        match err {
            ClientError::Rejected(e) => e.into(),
            ClientError::BookingNotFound { booking_id, .. } => app.with_detail("bookingId", booking_id),
            ClientError::Server { status, .. } => app.with_detail("status", status),
            _ => app,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
