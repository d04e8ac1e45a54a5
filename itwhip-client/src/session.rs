//! One admin review of one booking
//!
//! The sheet is derived once at load and then only changes through explicit
//! mutations. A failed submission leaves booking and sheet as they were and
//! records a dismissible [`Notice`]. Methods that hit the network take
//! `&mut self`, so a second submission cannot start while one is in flight.

use crate::{ClientError, ClientResult, VerificationClient};
use charge_engine::{
    ChargePolicy, ChargeSheet, ChargeSource, DerivedCharges, EngineResult, StatusProjection,
    TotalDiscrepancy, WaiveRequest, derive_for_review, project_status, submission,
};
use shared::error::{AppError, ErrorCode};
use shared::settlement::{SettlementRequest, SettlementResponse};
use shared::{Booking, VerificationReview};

/// Shown when a failure carries no message of its own
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    /// The payment layer declined the charge
    ChargeFailed,
    Success,
}

/// Banner message for the reviewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_ERROR.to_string()
        } else {
            message
        };
        Self { kind, message }
    }
}

/// Result of a submission the server accepted
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Completed(SettlementResponse),
    /// Accepted, but the charge itself failed; follow up with `retry_payment`
    ChargeFailed {
        reason: String,
        response: SettlementResponse,
    },
}

impl SubmissionOutcome {
    pub fn response(&self) -> &SettlementResponse {
        match self {
            Self::Completed(response) | Self::ChargeFailed { response, .. } => response,
        }
    }

    /// `ChargeDeclined` error for a charge the payment layer refused
    pub fn declined(&self) -> Option<AppError> {
        match self {
            Self::Completed(_) => None,
            Self::ChargeFailed { reason, .. } => Some(
                AppError::with_message(ErrorCode::ChargeDeclined, format!("Charge failed: {}", reason))
                    .with_detail("reason", reason.as_str()),
            ),
        }
    }
}

pub struct ReviewSession {
    client: VerificationClient,
    policy: ChargePolicy,
    booking_id: String,
    review: VerificationReview,
    source: ChargeSource,
    derived_total: f64,
    discrepancy: Option<TotalDiscrepancy>,
    sheet: ChargeSheet,
    notice: Option<Notice>,
}

impl ReviewSession {
    /// Fetch the review and derive its charge sheet
    pub async fn load(
        client: VerificationClient,
        policy: ChargePolicy,
        booking_id: impl Into<String>,
    ) -> ClientResult<Self> {
        let booking_id = booking_id.into();
        let review = client.fetch_review(&booking_id).await?;
        Ok(Self::from_review(client, policy, booking_id, review))
    }

    /// Start a session from an already fetched review
    pub fn from_review(
        client: VerificationClient,
        policy: ChargePolicy,
        booking_id: impl Into<String>,
        review: VerificationReview,
    ) -> Self {
        let derived = derive_for_review(&review, &policy);
        let DerivedCharges {
            source,
            items,
            total,
            discrepancy,
        } = derived;
        tracing::debug!(
            booking_id = %review.booking.id,
            ?source,
            items = items.len(),
            total,
            "Review session started"
        );
        Self {
            client,
            policy,
            booking_id: booking_id.into(),
            review,
            source,
            derived_total: total,
            discrepancy,
            sheet: ChargeSheet::new(items),
            notice: None,
        }
    }

    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    pub fn review(&self) -> &VerificationReview {
        &self.review
    }

    pub fn booking(&self) -> &Booking {
        &self.review.booking
    }

    pub fn sheet(&self) -> &ChargeSheet {
        &self.sheet
    }

    pub fn source(&self) -> ChargeSource {
        self.source
    }

    /// Total as derived, before any adjustment
    pub fn derived_total(&self) -> f64 {
        self.derived_total
    }

    pub fn discrepancy(&self) -> Option<&TotalDiscrepancy> {
        self.discrepancy.as_ref()
    }

    pub fn status(&self) -> StatusProjection {
        project_status(&self.review.booking)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn toggle_inclusion(&mut self, index: usize) -> EngineResult<bool> {
        self.sheet.toggle_inclusion(index)
    }

    pub fn set_adjusted_amount(&mut self, index: usize, amount: f64) -> EngineResult<f64> {
        self.sheet.set_adjusted_amount(index, amount)
    }

    pub fn reset_item(&mut self, index: usize) -> EngineResult<()> {
        self.sheet.reset(index)
    }

    pub async fn approve(&mut self, notes: &str) -> ClientResult<SubmissionOutcome> {
        let request = submission::approve(notes, self.is_post_trip());
        self.submit(request).await
    }

    pub async fn reject(&mut self, reason: &str) -> ClientResult<SubmissionOutcome> {
        let request = submission::reject(reason, self.is_post_trip());
        self.submit_built(request).await
    }

    pub async fn process_charges(&mut self, notes: &str) -> ClientResult<SubmissionOutcome> {
        let request = submission::process_charges(&self.sheet, notes);
        self.submit_built(request).await
    }

    pub async fn adjust(&mut self, reason: &str, notes: &str) -> ClientResult<SubmissionOutcome> {
        let request = submission::adjust(&self.sheet, reason, notes);
        self.submit_built(request).await
    }

    pub async fn waive(
        &mut self,
        waive: &WaiveRequest,
        notes: &str,
    ) -> ClientResult<SubmissionOutcome> {
        let request = submission::waive(&self.sheet, waive, notes);
        self.submit_built(request).await
    }

    pub async fn review_dispute(&mut self, notes: &str) -> ClientResult<SubmissionOutcome> {
        let request = submission::review_dispute(notes, self.is_post_trip());
        self.submit(request).await
    }

    pub async fn retry_payment(&mut self, notes: &str) -> ClientResult<SubmissionOutcome> {
        self.submit(submission::retry_payment(notes)).await
    }

    fn is_post_trip(&self) -> bool {
        self.review.booking.is_post_trip()
    }

    async fn submit_built(
        &mut self,
        request: EngineResult<SettlementRequest>,
    ) -> ClientResult<SubmissionOutcome> {
        match request {
            Ok(request) => self.submit(request).await,
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Send a settlement request
    ///
    /// On success the review is re-fetched and the sheet derived again. A
    /// failed re-fetch keeps the current state and only logs.
    pub async fn submit(&mut self, request: SettlementRequest) -> ClientResult<SubmissionOutcome> {
        let response = match self.client.submit(&self.booking_id, &request).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e)),
        };

        if let Some(reason) = response.charge_failure() {
            let outcome = SubmissionOutcome::ChargeFailed {
                reason: reason.to_string(),
                response: response.clone(),
            };
            if let Some(declined) = outcome.declined() {
                tracing::warn!(
                    booking_id = %self.booking_id,
                    action = %request.action,
                    code = %declined.code,
                    reason,
                    "Charge failed at payment layer"
                );
                self.notice = Some(Notice::new(NoticeKind::ChargeFailed, declined.message));
            }
            return Ok(outcome);
        }

        let message = response
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("{} completed", request.action));
        self.notice = Some(Notice::new(NoticeKind::Success, message));
        self.refresh().await;
        Ok(SubmissionOutcome::Completed(response))
    }

    async fn refresh(&mut self) {
        match self.client.fetch_review(&self.booking_id).await {
            Ok(review) => {
                let derived = derive_for_review(&review, &self.policy);
                self.source = derived.source;
                self.derived_total = derived.total;
                self.discrepancy = derived.discrepancy;
                self.sheet = ChargeSheet::new(derived.items);
                self.review = review;
            }
            Err(e) => {
                tracing::warn!(booking_id = %self.booking_id, error = %e, "Refresh after submit failed");
            }
        }
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        let message = match &err {
            ClientError::Rejected(e) => e.to_string(),
            ClientError::InvalidBookingId(_) => err.to_string(),
            ClientError::Forbidden(m)
            | ClientError::NotFound(m)
            | ClientError::BookingNotFound { message: m, .. }
            | ClientError::Validation(m)
            | ClientError::Server { message: m, .. } => m.clone(),
            ClientError::Unauthorized => "Your session has expired. Please sign in again.".into(),
            _ => String::new(),
        };
        if err.is_local() {
            tracing::debug!(booking_id = %self.booking_id, error = %err, "Submission blocked locally");
        } else {
            tracing::error!(booking_id = %self.booking_id, error = %err, "Submission failed");
        }
        self.notice = Some(Notice::new(NoticeKind::Error, message));
        err
    }
}
