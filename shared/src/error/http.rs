//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::BookingNotFound | Self::ChargeItemNotFound => {
                StatusCode::NOT_FOUND
            }

            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied => StatusCode::FORBIDDEN,

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ReasonRequired
            | Self::InvalidWaivePercentage
            | Self::InvalidChargeAmount
            | Self::NothingToCharge => StatusCode::BAD_REQUEST,

            Self::ChargeNotesMalformed => StatusCode::UNPROCESSABLE_ENTITY,

            Self::PaymentFailed | Self::ChargeDeclined => StatusCode::PAYMENT_REQUIRED,

            Self::NetworkError => StatusCode::BAD_GATEWAY,
            Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            Self::Unknown | Self::InternalError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Best-effort reverse mapping used when the remote side only gives us a status
    pub fn from_http_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::ValidationFailed,
            StatusCode::UNAUTHORIZED => Self::NotAuthenticated,
            StatusCode::FORBIDDEN => Self::PermissionDenied,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::UNPROCESSABLE_ENTITY => Self::InvalidRequest,
            StatusCode::PAYMENT_REQUIRED => Self::PaymentFailed,
            StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => Self::TimeoutError,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => Self::NetworkError,
            s if s.is_server_error() => Self::InternalError,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_codes_are_bad_request() {
        assert_eq!(ErrorCode::ReasonRequired.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::InvalidWaivePercentage.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_from_http_status() {
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::NOT_FOUND),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::INTERNAL_SERVER_ERROR),
            ErrorCode::InternalError
        );
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::IM_A_TEAPOT),
            ErrorCode::Unknown
        );
    }
}
