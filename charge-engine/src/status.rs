//! Booking status projection
//!
//! Derives the five-stage progress indicator from denormalized booking
//! fields. Pure projection: no transitions are enforced, and missing or
//! inconsistent fields simply leave a stage unreached.

use serde::Serialize;
use shared::booking::{Booking, BookingStatus, PaymentStatus, TripStatus, VerificationStatus};

/// Progress stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStage {
    Booked,
    Verified,
    Confirmed,
    Active,
    Completed,
}

impl BookingStage {
    pub const ALL: [BookingStage; 5] = [
        Self::Booked,
        Self::Verified,
        Self::Confirmed,
        Self::Active,
        Self::Completed,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Booked => "Booked",
            Self::Verified => "Verified",
            Self::Confirmed => "Confirmed",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

/// One step of the indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageState {
    pub stage: BookingStage,
    pub label: &'static str,
    pub reached: bool,
}

/// Progress indicator for one booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusProjection {
    pub stages: Vec<StageState>,
    /// Furthest stage reached
    pub current: BookingStage,
    pub cancelled: bool,
}

impl StatusProjection {
    pub fn is_reached(&self, stage: BookingStage) -> bool {
        stage <= self.current
    }
}

/// Project `booking` onto the five stages
///
/// For `CANCELLED` bookings the status field no longer says how far the
/// booking got, so progress is read from side effects that were already
/// recorded: captured payment, approved verification, started trip.
pub fn project_status(booking: &Booking) -> StatusProjection {
    let cancelled = booking.status == BookingStatus::Cancelled;
    let current = if cancelled {
        progress_before_cancellation(booking)
    } else {
        progress(booking)
    };

    // Stage 3 reads "Charges" while a returned trip waits for settlement
    let charges_pending = !cancelled
        && booking.status != BookingStatus::Completed
        && booking.is_post_trip();

    let stages = BookingStage::ALL
        .into_iter()
        .map(|stage| StageState {
            stage,
            label: if stage == BookingStage::Confirmed && charges_pending {
                "Charges"
            } else {
                stage.label()
            },
            reached: stage <= current,
        })
        .collect();

    StatusProjection {
        stages,
        current,
        cancelled,
    }
}

fn progress(booking: &Booking) -> BookingStage {
    let status = booking.status;
    let trip = booking.trip_status;

    let completed = status == BookingStatus::Completed || trip == Some(TripStatus::Completed);
    let active = status == BookingStatus::Active
        || trip == Some(TripStatus::Active)
        || booking.trip_started_at.is_some();
    let confirmed = status == BookingStatus::Confirmed
        || matches!(
            booking.payment_status,
            Some(PaymentStatus::Authorized | PaymentStatus::Paid)
        );
    let verified = booking.verification_status == Some(VerificationStatus::Approved);

    if completed {
        BookingStage::Completed
    } else if active {
        BookingStage::Active
    } else if confirmed {
        BookingStage::Confirmed
    } else if verified {
        BookingStage::Verified
    } else {
        BookingStage::Booked
    }
}

fn progress_before_cancellation(booking: &Booking) -> BookingStage {
    let trip_started = booking.trip_started_at.is_some()
        || matches!(
            booking.trip_status,
            Some(TripStatus::Active | TripStatus::Completed)
        );
    let payment_captured = booking.payment_status.is_some_and(|p| p.is_captured());
    let verified = booking.verification_status == Some(VerificationStatus::Approved);

    if trip_started {
        BookingStage::Active
    } else if payment_captured {
        BookingStage::Confirmed
    } else if verified {
        BookingStage::Verified
    } else {
        BookingStage::Booked
    }
}
