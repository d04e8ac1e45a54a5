//! Settlement request builders and validation
//!
//! Every builder validates its output with [`validate_request`], the same
//! check the client runs before sending a hand-built request. A request that
//! fails validation never reaches the network.

use crate::adjustment::{ChargeSheet, WaiveRequest};
use crate::error::{ChargeError, EngineResult};
use crate::money::{require_amount, sum_amounts};
use shared::charges::ChargeLineItem;
use shared::settlement::{ChargeAdjustment, ReviewAction, SettlementRequest};

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn included_charges(sheet: &ChargeSheet) -> Vec<ChargeLineItem> {
    sheet.included_items().cloned().collect()
}

/// Approve the guest's verification
pub fn approve(notes: impl Into<String>, is_post_trip: bool) -> SettlementRequest {
    SettlementRequest::new(ReviewAction::Approve, notes, is_post_trip)
}

/// Reject the guest's verification; `reason` goes into `notes`
pub fn reject(reason: impl Into<String>, is_post_trip: bool) -> EngineResult<SettlementRequest> {
    let request = SettlementRequest::new(ReviewAction::Reject, reason, is_post_trip);
    validate_request(&request)?;
    Ok(request)
}

/// Charge the included items as they are
pub fn process_charges(sheet: &ChargeSheet, notes: impl Into<String>) -> EngineResult<SettlementRequest> {
    let mut request = SettlementRequest::new(ReviewAction::ProcessCharges, notes, true);
    request.charges = Some(included_charges(sheet));
    validate_request(&request)?;
    Ok(request)
}

/// Charge the adjusted total, recording every item's adjustment for audit
pub fn adjust(
    sheet: &ChargeSheet,
    reason: &str,
    notes: impl Into<String>,
) -> EngineResult<SettlementRequest> {
    if is_blank(reason) {
        return Err(ChargeError::ReasonRequired(ReviewAction::Adjust));
    }

    let mut request = SettlementRequest::new(ReviewAction::Adjust, notes, true);
    request.charges = Some(included_charges(sheet));
    request.charge_adjustments = Some(
        sheet
            .items()
            .iter()
            .map(|item| ChargeAdjustment {
                charge_type: item.charge_type(),
                original_amount: item.original_amount(),
                adjusted_amount: item.adjusted_amount(),
                included: item.included(),
                reason: reason.trim().to_string(),
            })
            .collect(),
    );
    validate_request(&request)?;
    Ok(request)
}

/// Full or partial waive of the sheet's adjusted total
pub fn waive(
    sheet: &ChargeSheet,
    waive: &WaiveRequest,
    notes: impl Into<String>,
) -> EngineResult<SettlementRequest> {
    waive.validate()?;

    let mut request = SettlementRequest::new(waive.action(), notes, true);
    request.charges = Some(included_charges(sheet));
    request.waive_percentage = Some(waive.percentage);
    request.waive_reason = Some(waive.reason.trim().to_string());
    validate_request(&request)?;
    Ok(request)
}

/// Open a dispute review
pub fn review_dispute(notes: impl Into<String>, is_post_trip: bool) -> SettlementRequest {
    SettlementRequest::new(ReviewAction::ReviewDispute, notes, is_post_trip)
}

/// Re-attempt a charge the payment layer declined
pub fn retry_payment(notes: impl Into<String>) -> SettlementRequest {
    SettlementRequest::new(ReviewAction::RetryPayment, notes, true)
}

/// Check the preconditions of `request.action`
pub fn validate_request(request: &SettlementRequest) -> EngineResult<()> {
    match request.action {
        ReviewAction::Reject => {
            if is_blank(&request.notes) {
                return Err(ChargeError::ReasonRequired(ReviewAction::Reject));
            }
        }
        ReviewAction::ProcessCharges => {
            validate_charges(request.charges.as_deref())?;
        }
        ReviewAction::Adjust => {
            let adjustments = request
                .charge_adjustments
                .as_deref()
                .filter(|a| !a.is_empty())
                .ok_or(ChargeError::NothingToCharge)?;
            for adj in adjustments {
                if is_blank(&adj.reason) {
                    return Err(ChargeError::ReasonRequired(ReviewAction::Adjust));
                }
                require_amount(adj.original_amount, "originalAmount")?;
                require_amount(adj.adjusted_amount, "adjustedAmount")?;
            }
            if let Some(charges) = request.charges.as_deref() {
                for item in charges {
                    require_amount(item.adjusted_amount(), "adjustedAmount")?;
                }
            }
        }
        ReviewAction::Waive | ReviewAction::PartialWaive => {
            let reason = request.waive_reason.as_deref().unwrap_or_default();
            if is_blank(reason) {
                return Err(ChargeError::ReasonRequired(request.action));
            }
            let pct = request.waive_percentage.unwrap_or(0.0);
            if !(pct.is_finite() && pct > 0.0 && pct <= 100.0) {
                return Err(ChargeError::InvalidWaivePercentage(pct));
            }
            let full = pct >= 100.0;
            if full != (request.action == ReviewAction::Waive) {
                return Err(ChargeError::InvalidRequest(format!(
                    "{} does not match a waive of {}%",
                    request.action, pct
                )));
            }
        }
        ReviewAction::Approve | ReviewAction::ReviewDispute | ReviewAction::RetryPayment => {}
    }
    Ok(())
}

fn validate_charges(charges: Option<&[ChargeLineItem]>) -> EngineResult<()> {
    let charges = charges.unwrap_or_default();
    for item in charges {
        require_amount(item.adjusted_amount(), "adjustedAmount")?;
    }
    let total = sum_amounts(
        charges
            .iter()
            .filter(|i| i.included())
            .map(ChargeLineItem::adjusted_amount),
    );
    if total.is_zero() {
        return Err(ChargeError::NothingToCharge);
    }
    Ok(())
}
