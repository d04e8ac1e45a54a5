//! Booking record as returned by the admin verification endpoint

mod telemetry;

pub use telemetry::{FuelLevel, TripTelemetry, UnknownFuelLevel};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Status Types
// ============================================================================

/// Overall booking status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
    NoShow,
    /// Any status this build does not know about
    #[serde(other)]
    Unknown,
}

/// Trip progress as tracked by the trip subsystem
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    #[default]
    NotStarted,
    Active,
    Completed,
    #[serde(other)]
    Unknown,
}

/// Guest document verification outcome
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Submitted,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

/// Payment state of the booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Authorized,
    #[serde(alias = "CAPTURED")]
    Paid,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// Funds were actually collected (refunds imply a prior capture)
    pub fn is_captured(&self) -> bool {
        matches!(self, Self::Paid | Self::Refunded)
    }
}

// ============================================================================
// Booking
// ============================================================================

/// Denormalized booking record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_code: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_status: Option<TripStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_ended_at: Option<DateTime<Utc>>,
    /// Free-text field that may hold a serialized charge breakdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges_notes: Option<String>,
    #[serde(flatten)]
    pub telemetry: TripTelemetry,
}

impl Booking {
    /// Trip has been returned (used to tell post-trip reviews apart)
    pub fn is_post_trip(&self) -> bool {
        self.trip_ended_at.is_some()
            || self.telemetry.actual_end_time.is_some()
            || matches!(self.trip_status, Some(TripStatus::Completed))
    }
}
