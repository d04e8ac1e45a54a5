//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for the wire.

use crate::error::ChargeError;
use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Percentages keep more precision so a back-solved waive reproduces the amount
const PERCENT_DECIMAL_PLACES: u32 = 4;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum amount a single line item may carry ($1,000,000)
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field: &'static str) -> Result<(), ChargeError> {
    if !value.is_finite() {
        return Err(ChargeError::InvalidAmount { field, value });
    }
    Ok(())
}

/// Validate a monetary amount: finite, non-negative and at most [`MAX_AMOUNT`]
#[inline]
pub fn require_amount(value: f64, field: &'static str) -> Result<(), ChargeError> {
    require_finite(value, field)?;
    if !(0.0..=MAX_AMOUNT).contains(&value) {
        return Err(ChargeError::InvalidAmount { field, value });
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Values beyond Decimal's range saturate; NaN becomes zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    match Decimal::from_f64(value) {
        Some(d) => d,
        None if value.is_nan() => Decimal::ZERO,
        None if value > 0.0 => Decimal::MAX,
        None => Decimal::MIN,
    }
}

/// Round to 2 decimal places, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for the wire, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Convert a percentage Decimal to f64, rounded to 4 decimal places
#[inline]
pub fn percent_to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(PERCENT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Sum wire amounts in Decimal
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = f64>,
{
    amounts
        .into_iter()
        .map(to_decimal)
        .fold(Decimal::ZERO, |acc, d| acc.saturating_add(d))
}

/// `true` when the two amounts differ by more than one cent
#[inline]
pub fn differs(a: Decimal, b: Decimal) -> bool {
    a.saturating_sub(b).abs() > MONEY_TOLERANCE
}
