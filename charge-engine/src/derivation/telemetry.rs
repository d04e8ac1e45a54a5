//! Manual charge computation from trip telemetry
//!
//! Four independent charge types. A missing reading means the charge does
//! not apply; it is never an error.

use crate::config::ChargePolicy;
use crate::money::to_f64;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::booking::TripTelemetry;
use shared::charges::{ChargeLineItem, ChargeType};

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// All telemetry-derived charges, in canonical order
pub fn compute_charges(telemetry: &TripTelemetry, policy: &ChargePolicy) -> Vec<ChargeLineItem> {
    [
        mileage_charge(telemetry, policy),
        fuel_charge(telemetry, policy),
        late_charge(telemetry, policy),
        damage_charge(telemetry, policy),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Miles driven beyond `number_of_days * included_miles_per_day`
///
/// A missing or sub-one day count is treated as a one-day rental. A reading
/// pair whose distance does not fit in `i64` is treated as missing.
pub fn overage_miles(telemetry: &TripTelemetry, policy: &ChargePolicy) -> Option<(Decimal, Decimal)> {
    let start = telemetry.start_mileage?;
    let end = telemetry.end_mileage?;
    let days = telemetry.number_of_days.unwrap_or(1).max(1);

    let actual = Decimal::from(end.checked_sub(start)?);
    let included = Decimal::from(days).saturating_mul(policy.included_miles_per_day);
    let overage = (actual - included).max(Decimal::ZERO);
    Some((overage, included))
}

pub fn mileage_charge(telemetry: &TripTelemetry, policy: &ChargePolicy) -> Option<ChargeLineItem> {
    let (overage, included) = overage_miles(telemetry, policy)?;
    if overage.is_zero() {
        return None;
    }

    let amount = overage.saturating_mul(policy.mileage_rate);
    Some(ChargeLineItem::new(
        ChargeType::Mileage,
        ChargeType::Mileage.label(),
        to_f64(amount),
        Some(format!(
            "{} mi over {} mi allowance @ ${}/mi",
            overage, included, policy.mileage_rate
        )),
    ))
}

pub fn fuel_charge(telemetry: &TripTelemetry, policy: &ChargePolicy) -> Option<ChargeLineItem> {
    let start = telemetry.fuel_level_start?;
    let end = telemetry.fuel_level_end?;
    let deficit = start.quarters().saturating_sub(end.quarters());
    if deficit == 0 {
        return None;
    }

    let amount = Decimal::from(deficit) * policy.fuel_rate_per_quarter;
    Some(ChargeLineItem::new(
        ChargeType::Fuel,
        ChargeType::Fuel.label(),
        to_f64(amount),
        Some(format!(
            "Picked up at {}, returned at {}: {} quarter tank(s) @ ${}",
            start, end, deficit, policy.fuel_rate_per_quarter
        )),
    ))
}

/// Started hours between the scheduled and actual return, 0 when on time
pub fn late_hours(scheduled: DateTime<Utc>, actual: DateTime<Utc>) -> i64 {
    let late_ms = (actual - scheduled).num_milliseconds();
    if late_ms <= 0 {
        return 0;
    }
    // ceil(late_ms / 1h)
    (late_ms + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR
}

pub fn late_charge(telemetry: &TripTelemetry, policy: &ChargePolicy) -> Option<ChargeLineItem> {
    let actual = telemetry.actual_end_time?;
    let scheduled = telemetry.scheduled_end_time?;
    let hours = late_hours(scheduled, actual);
    if hours == 0 {
        return None;
    }

    let amount = Decimal::from(hours) * policy.late_rate_per_hour;
    Some(ChargeLineItem::new(
        ChargeType::Late,
        ChargeType::Late.label(),
        to_f64(amount),
        Some(format!(
            "{} hour(s) late @ ${}/hr",
            hours, policy.late_rate_per_hour
        )),
    ))
}

pub fn damage_charge(telemetry: &TripTelemetry, policy: &ChargePolicy) -> Option<ChargeLineItem> {
    if !telemetry.damage_reported {
        return None;
    }

    let details = telemetry
        .damage_description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "Damage reported at return".to_string());

    Some(ChargeLineItem::new(
        ChargeType::Damage,
        ChargeType::Damage.label(),
        to_f64(policy.damage_flat_fee),
        Some(details),
    ))
}
