//! Post-trip charge engine
//!
//! Pure domain logic for the admin trip-charge review:
//!
//! - [`derivation`]: itemized charges from a stored record, serialized notes
//!   or trip telemetry
//! - [`adjustment`]: toggle / override / waive math over a [`ChargeSheet`]
//! - [`submission`]: settlement request builders and their validation
//! - [`status`]: five-stage booking progress projection
//!
//! Money is carried as `f64` on the wire and computed with `rust_decimal`.

pub mod adjustment;
pub mod config;
pub mod derivation;
pub mod error;
pub mod money;
pub mod status;
pub mod submission;

pub use adjustment::{ChargeSheet, WaiveKind, WaiveRequest};
pub use config::ChargePolicy;
pub use derivation::{ChargeSource, DerivedCharges, TotalDiscrepancy, derive_charges, derive_for_review};
pub use error::{ChargeError, EngineResult};
pub use status::{BookingStage, StageState, StatusProjection, project_status};
pub use submission::validate_request;
