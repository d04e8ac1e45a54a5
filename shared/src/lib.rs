//! Shared types for the ItWhip trip-charge review
//!
//! Common types used by the charge engine and the admin API client:
//! booking records and trip telemetry, charge records and line items,
//! settlement request/response payloads and the unified error system.

pub mod booking;
pub mod charges;
pub mod error;
pub mod review;
pub mod settlement;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use booking::{
    Booking, BookingStatus, FuelLevel, PaymentStatus, TripStatus, TripTelemetry,
    VerificationStatus,
};
pub use charges::{BreakdownEntry, ChargeBreakdown, ChargeLineItem, ChargeType, StoredChargeRecord};
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use review::VerificationReview;
pub use settlement::{
    ChargeAdjustment, ChargeResult, ChargeStatus, PaymentResult, ReviewAction,
    SettlementRequest, SettlementResponse,
};
