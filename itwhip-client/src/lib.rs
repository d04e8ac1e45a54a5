//! ItWhip Client - admin verification API client
//!
//! Fetches a booking's verification review, drives a [`ReviewSession`] over
//! its charge sheet and posts settlement actions.

pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod review;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use review::VerificationClient;
pub use session::{Notice, NoticeKind, ReviewSession, SubmissionOutcome};

// Re-export shared types for convenience
pub use shared::settlement::{SettlementRequest, SettlementResponse};
pub use shared::VerificationReview;
