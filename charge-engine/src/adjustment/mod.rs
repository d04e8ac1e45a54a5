//! Adjustment engine
//!
//! [`ChargeSheet`] owns the line items for one review. Mutations go through
//! index-checked methods; the adjusted total is always recomputed from the
//! items, never cached.

mod waive;

pub use waive::{WaiveKind, WaiveRequest};

use crate::derivation::DerivedCharges;
use crate::error::{ChargeError, EngineResult};
use crate::money::{MAX_AMOUNT, percent_to_f64, round_money, sum_amounts, to_decimal, to_f64};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::charges::ChargeLineItem;

/// Mutable list of line items under admin review
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChargeSheet {
    items: Vec<ChargeLineItem>,
}

impl ChargeSheet {
    pub fn new(items: Vec<ChargeLineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ChargeLineItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&ChargeLineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn included_items(&self) -> impl Iterator<Item = &ChargeLineItem> {
        self.items.iter().filter(|i| i.included())
    }

    fn item_mut(&mut self, index: usize) -> EngineResult<&mut ChargeLineItem> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(ChargeError::ItemNotFound { index, len })
    }

    /// Flip `included` on one item; returns the new value
    pub fn toggle_inclusion(&mut self, index: usize) -> EngineResult<bool> {
        let item = self.item_mut(index)?;
        item.toggle_included();
        Ok(item.included())
    }

    /// Override one item's adjusted amount; returns the stored (clamped) value
    ///
    /// Negative input clamps to zero; anything above [`MAX_AMOUNT`] is rejected.
    pub fn set_adjusted_amount(&mut self, index: usize, amount: f64) -> EngineResult<f64> {
        if amount > MAX_AMOUNT {
            return Err(ChargeError::InvalidAmount {
                field: "adjustedAmount",
                value: amount,
            });
        }
        let item = self.item_mut(index)?;
        item.set_adjusted_amount(amount);
        Ok(item.adjusted_amount())
    }

    /// Restore one item to its derived state
    pub fn reset(&mut self, index: usize) -> EngineResult<()> {
        self.item_mut(index)?.reset();
        Ok(())
    }

    pub fn has_adjustments(&self) -> bool {
        self.items.iter().any(ChargeLineItem::is_modified)
    }

    /// Sum of `adjusted_amount` over included items: the amount to charge
    pub fn adjusted_total(&self) -> f64 {
        to_f64(self.adjusted_total_decimal())
    }

    fn adjusted_total_decimal(&self) -> Decimal {
        round_money(sum_amounts(self.included_items().map(ChargeLineItem::adjusted_amount)))
    }

    /// Sum of `original_amount` over all items, for display
    pub fn original_total(&self) -> f64 {
        to_f64(sum_amounts(self.items.iter().map(ChargeLineItem::original_amount)))
    }

    /// `adjusted_total * percentage / 100`, percentage clamped to 0..=100
    pub fn waived_amount(&self, percentage: f64) -> f64 {
        let pct = clamp_percentage(to_decimal(percentage));
        to_f64(self.adjusted_total_decimal().saturating_mul(pct) / Decimal::ONE_HUNDRED)
    }

    /// Back-solve the waive percentage for a dollar amount, capped at 100
    ///
    /// A zero adjusted total yields 0%.
    pub fn percentage_for_amount(&self, amount: f64) -> f64 {
        let total = self.adjusted_total_decimal();
        if total.is_zero() {
            return 0.0;
        }
        let pct = to_decimal(amount)
            .checked_div(total)
            .map_or(Decimal::ONE_HUNDRED, |ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED));
        percent_to_f64(clamp_percentage(pct))
    }
}

impl From<DerivedCharges> for ChargeSheet {
    fn from(derived: DerivedCharges) -> Self {
        Self::new(derived.items)
    }
}

pub(crate) fn clamp_percentage(pct: Decimal) -> Decimal {
    pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}
