use super::{ChargeSheet, clamp_percentage};
use crate::error::{ChargeError, EngineResult};
use crate::money::{percent_to_f64, to_decimal};
use serde::Serialize;
use shared::settlement::ReviewAction;

/// How the admin expressed the waive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaiveKind {
    Percentage,
    /// Dollar amount, stored as its equivalent percentage
    Amount,
}

/// Transient waive instruction, applied by the backend at settlement
///
/// Never mutates the line items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaiveRequest {
    pub kind: WaiveKind,
    /// 0..=100
    pub percentage: f64,
    pub reason: String,
}

impl WaiveRequest {
    pub fn percentage(percentage: f64, reason: impl Into<String>) -> Self {
        let pct = if percentage.is_finite() {
            percent_to_f64(clamp_percentage(to_decimal(percentage)))
        } else {
            0.0
        };
        Self {
            kind: WaiveKind::Percentage,
            percentage: pct,
            reason: reason.into(),
        }
    }

    /// Waive a dollar amount of the sheet's current adjusted total
    pub fn amount(sheet: &ChargeSheet, amount: f64, reason: impl Into<String>) -> Self {
        let pct = if amount.is_finite() {
            sheet.percentage_for_amount(amount)
        } else {
            0.0
        };
        Self {
            kind: WaiveKind::Amount,
            percentage: pct,
            reason: reason.into(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.percentage >= 100.0
    }

    /// `waive` for a full waive, `partial_waive` otherwise
    pub fn action(&self) -> ReviewAction {
        if self.is_full() {
            ReviewAction::Waive
        } else {
            ReviewAction::PartialWaive
        }
    }

    pub fn waived_amount(&self, sheet: &ChargeSheet) -> f64 {
        sheet.waived_amount(self.percentage)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.reason.trim().is_empty() {
            return Err(ChargeError::ReasonRequired(self.action()));
        }
        if !(self.percentage > 0.0 && self.percentage <= 100.0) {
            return Err(ChargeError::InvalidWaivePercentage(self.percentage));
        }
        Ok(())
    }
}
