//! Charge derivation
//!
//! Produces the itemized post-trip charges for a booking. Exactly one source
//! is used, first match wins:
//!
//! 1. Stored charge record (non-empty). Its `totalCharges` is authoritative.
//! 2. Breakdown serialized in `chargesNotes`. Total is the line-item sum.
//! 3. Manual computation from trip telemetry. Total is the line-item sum.
//!
//! Item types are re-inferred from labels afterwards, whatever the source.

mod classify;
mod notes;
mod reconcile;
mod stored;
mod telemetry;

pub use classify::normalize_types;
pub use notes::{NotesParseError, items_from_breakdown, parse_charge_notes};
pub use reconcile::{TotalDiscrepancy, reconcile};
pub use stored::items_from_record;
pub use telemetry::{
    compute_charges, damage_charge, fuel_charge, late_charge, late_hours, mileage_charge,
    overage_miles,
};

use crate::config::ChargePolicy;
use crate::money::{sum_amounts, to_f64};
use serde::Serialize;
use shared::booking::Booking;
use shared::charges::{ChargeLineItem, StoredChargeRecord};
use shared::review::VerificationReview;

/// Where the derived charges came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeSource {
    StoredRecord,
    ChargeNotes,
    Telemetry,
}

/// Immutable snapshot of derived charges
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedCharges {
    pub source: ChargeSource,
    pub items: Vec<ChargeLineItem>,
    /// Authoritative total for the source (see module docs)
    pub total: f64,
    /// Set when a reported total disagrees with the line items
    pub discrepancy: Option<TotalDiscrepancy>,
}

impl DerivedCharges {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Derive charges for a review payload
pub fn derive_for_review(review: &VerificationReview, policy: &ChargePolicy) -> DerivedCharges {
    derive_charges(&review.booking, review.stored_charges(), policy)
}

/// Derive charges for `booking`, preferring `stored` when it is non-empty
pub fn derive_charges(
    booking: &Booking,
    stored: Option<&StoredChargeRecord>,
    policy: &ChargePolicy,
) -> DerivedCharges {
    let mut derived = select_source(booking, stored, policy);
    normalize_types(&mut derived.items);

    tracing::debug!(
        booking_id = %booking.id,
        source = ?derived.source,
        items = derived.items.len(),
        total = derived.total,
        "Derived post-trip charges"
    );
    derived
}

fn select_source(
    booking: &Booking,
    stored: Option<&StoredChargeRecord>,
    policy: &ChargePolicy,
) -> DerivedCharges {
    // 1. Stored record
    if let Some(record) = stored.filter(|r| !r.is_empty()) {
        let items = items_from_record(record);
        let summed = to_f64(sum_amounts(items.iter().map(ChargeLineItem::original_amount)));
        let (total, discrepancy) = match record.total_charges.filter(|t| t.is_finite()) {
            Some(reported) => (reported, reconcile(reported, &items)),
            None => {
                tracing::debug!(booking_id = %booking.id, "Stored record has no total, using line-item sum");
                (summed, None)
            }
        };
        if let Some(d) = &discrepancy {
            tracing::warn!(
                booking_id = %booking.id,
                reported_total = d.reported_total,
                line_item_total = d.line_item_total,
                difference = d.difference,
                "Stored charge total does not match its line items"
            );
        }
        return DerivedCharges {
            source: ChargeSource::StoredRecord,
            items,
            total,
            discrepancy,
        };
    }

    // 2. Serialized notes
    match parse_charge_notes(booking.charges_notes.as_deref()) {
        Ok(breakdown) => {
            let items = items_from_breakdown(&breakdown);
            let total = to_f64(sum_amounts(items.iter().map(ChargeLineItem::original_amount)));
            let discrepancy = breakdown.total.and_then(|t| reconcile(t, &items));
            if let Some(d) = &discrepancy {
                tracing::warn!(
                    booking_id = %booking.id,
                    reported_total = d.reported_total,
                    line_item_total = d.line_item_total,
                    "Charge notes total does not match its breakdown, using breakdown sum"
                );
            }
            return DerivedCharges {
                source: ChargeSource::ChargeNotes,
                items,
                total,
                discrepancy,
            };
        }
        Err(NotesParseError::Empty) => {}
        Err(e) => {
            tracing::warn!(
                booking_id = %booking.id,
                code = %e.code(),
                error = %e,
                "Ignoring unparsable charge notes"
            );
        }
    }

    // 3. Telemetry
    let items = compute_charges(&booking.telemetry, policy);
    let total = to_f64(sum_amounts(items.iter().map(ChargeLineItem::original_amount)));
    DerivedCharges {
        source: ChargeSource::Telemetry,
        items,
        total,
        discrepancy: None,
    }
}

#[cfg(test)]
mod tests;
