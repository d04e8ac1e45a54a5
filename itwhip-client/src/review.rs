//! Admin verification endpoint

use crate::{ClientError, ClientResult, HttpClient};
use shared::settlement::{SettlementRequest, SettlementResponse};
use shared::VerificationReview;

/// Client for `/api/admin/rentals/verifications/{id}/approve`
#[derive(Debug, Clone)]
pub struct VerificationClient {
    http: HttpClient,
}

/// Booking ids are opaque tokens: ASCII letters, digits, `-` and `_`
fn is_valid_booking_id(booking_id: &str) -> bool {
    !booking_id.is_empty()
        && booking_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl VerificationClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn path(booking_id: &str) -> ClientResult<String> {
        if !is_valid_booking_id(booking_id) {
            return Err(ClientError::InvalidBookingId(booking_id.to_string()));
        }
        Ok(format!("api/admin/rentals/verifications/{}/approve", booking_id))
    }

    fn booking_not_found(booking_id: &str, err: ClientError) -> ClientError {
        match err {
            ClientError::NotFound(message) => ClientError::BookingNotFound {
                booking_id: booking_id.to_string(),
                message,
            },
            other => other,
        }
    }

    /// Load booking, stored charges and AI verification for one booking
    pub async fn fetch_review(&self, booking_id: &str) -> ClientResult<VerificationReview> {
        let path = Self::path(booking_id)?;
        tracing::debug!(booking_id, "Fetching verification review");
        self.http
            .get(&path)
            .await
            .map_err(|e| Self::booking_not_found(booking_id, e))
    }

    /// Post a settlement action
    ///
    /// The booking id and the request are validated first; either failing
    /// returns a local error without any I/O.
    pub async fn submit(
        &self,
        booking_id: &str,
        request: &SettlementRequest,
    ) -> ClientResult<SettlementResponse> {
        let path = Self::path(booking_id)?;
        charge_engine::validate_request(request)?;

        tracing::info!(
            booking_id,
            action = %request.action,
            charges = request.charges.as_ref().map_or(0, Vec::len),
            waive_percentage = request.waive_percentage,
            "Submitting settlement action"
        );
        self.http
            .post(&path, request)
            .await
            .map_err(|e| Self::booking_not_found(booking_id, e))
    }
}
