//! Settlement request/response for `POST .../verifications/{bookingId}/approve`

use crate::charges::{ChargeLineItem, ChargeType};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Review Action
// ============================================================================

/// Action an admin submits for a booking under review
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    /// Approve the guest's verification
    Approve,
    /// Reject the guest's verification
    Reject,
    /// Charge the included items as-is
    ProcessCharges,
    /// Charge with per-item adjustments recorded for audit
    Adjust,
    /// Waive 100% of the adjusted total
    Waive,
    /// Waive part of the adjusted total
    PartialWaive,
    /// Open a dispute review
    ReviewDispute,
    /// Re-attempt a failed charge
    RetryPayment,
}

impl ReviewAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::ProcessCharges => "process_charges",
            Self::Adjust => "adjust",
            Self::Waive => "waive",
            Self::PartialWaive => "partial_waive",
            Self::ReviewDispute => "review_dispute",
            Self::RetryPayment => "retry_payment",
        }
    }

    /// Actions that settle post-trip charges
    pub const fn is_charge_action(&self) -> bool {
        matches!(
            self,
            Self::ProcessCharges | Self::Adjust | Self::Waive | Self::PartialWaive
        )
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request
// ============================================================================

/// Per-item adjustment detail sent with `adjust` for audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeAdjustment {
    #[serde(rename = "type")]
    pub charge_type: ChargeType,
    pub original_amount: f64,
    pub adjusted_amount: f64,
    pub included: bool,
    pub reason: String,
}

/// Body of the settlement POST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRequest {
    pub action: ReviewAction,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_post_trip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<Vec<ChargeLineItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waive_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waive_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_adjustments: Option<Vec<ChargeAdjustment>>,
}

impl SettlementRequest {
    /// Bare request for `action`; builders fill in the rest
    pub fn new(action: ReviewAction, notes: impl Into<String>, is_post_trip: bool) -> Self {
        Self {
            action,
            notes: notes.into(),
            is_post_trip,
            charges: None,
            waive_percentage: None,
            waive_reason: None,
            charge_adjustments: None,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// Outcome of the charge attempt at the payment layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    #[serde(alias = "success", alias = "succeeded", alias = "completed")]
    Charged,
    Pending,
    Waived,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeResult {
    pub status: ChargeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub status: String,
}

/// Response of the settlement POST
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_result: Option<ChargeResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SettlementResponse {
    /// Failure reason when the payment layer rejected the charge
    pub fn charge_failure(&self) -> Option<&str> {
        self.charge_result
            .as_ref()
            .filter(|r| r.status == ChargeStatus::Failed)
            .map(|r| r.error.as_deref().unwrap_or("Charge failed"))
    }
}
