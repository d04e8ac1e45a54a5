use rust_decimal::Decimal;
use std::str::FromStr;

/// Rates used when charges are computed from trip telemetry
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | CHARGE_INCLUDED_MILES_PER_DAY | 200 | Free miles per rental day |
/// | CHARGE_MILEAGE_RATE | 0.45 | Per mile over the allowance |
/// | CHARGE_FUEL_RATE_PER_QUARTER | 75 | Per quarter tank short on return |
/// | CHARGE_LATE_RATE_PER_HOUR | 25 | Per started hour past the scheduled return |
/// | CHARGE_DAMAGE_FLAT_FEE | 500 | Flat fee when damage is reported |
///
/// Unparsable or negative values fall back to the default.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargePolicy {
    pub included_miles_per_day: Decimal,
    pub mileage_rate: Decimal,
    pub fuel_rate_per_quarter: Decimal,
    pub late_rate_per_hour: Decimal,
    /// Not scaled by severity; product has not settled a damage schedule yet
    pub damage_flat_fee: Decimal,
}

impl ChargePolicy {
    pub const DEFAULT_INCLUDED_MILES_PER_DAY: Decimal = Decimal::from_parts(200, 0, 0, false, 0);
    pub const DEFAULT_MILEAGE_RATE: Decimal = Decimal::from_parts(45, 0, 0, false, 2);
    pub const DEFAULT_FUEL_RATE_PER_QUARTER: Decimal = Decimal::from_parts(75, 0, 0, false, 0);
    pub const DEFAULT_LATE_RATE_PER_HOUR: Decimal = Decimal::from_parts(25, 0, 0, false, 0);
    pub const DEFAULT_DAMAGE_FLAT_FEE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

    /// Load the policy from environment variables
    pub fn from_env() -> Self {
        Self {
            included_miles_per_day: env_rate(
                "CHARGE_INCLUDED_MILES_PER_DAY",
                Self::DEFAULT_INCLUDED_MILES_PER_DAY,
            ),
            mileage_rate: env_rate("CHARGE_MILEAGE_RATE", Self::DEFAULT_MILEAGE_RATE),
            fuel_rate_per_quarter: env_rate(
                "CHARGE_FUEL_RATE_PER_QUARTER",
                Self::DEFAULT_FUEL_RATE_PER_QUARTER,
            ),
            late_rate_per_hour: env_rate(
                "CHARGE_LATE_RATE_PER_HOUR",
                Self::DEFAULT_LATE_RATE_PER_HOUR,
            ),
            damage_flat_fee: env_rate("CHARGE_DAMAGE_FLAT_FEE", Self::DEFAULT_DAMAGE_FLAT_FEE),
        }
    }

    pub fn with_damage_flat_fee(mut self, fee: Decimal) -> Self {
        self.damage_flat_fee = fee.max(Decimal::ZERO);
        self
    }

    pub fn with_mileage(mut self, included_miles_per_day: Decimal, rate: Decimal) -> Self {
        self.included_miles_per_day = included_miles_per_day.max(Decimal::ZERO);
        self.mileage_rate = rate.max(Decimal::ZERO);
        self
    }
}

impl Default for ChargePolicy {
    fn default() -> Self {
        Self {
            included_miles_per_day: Self::DEFAULT_INCLUDED_MILES_PER_DAY,
            mileage_rate: Self::DEFAULT_MILEAGE_RATE,
            fuel_rate_per_quarter: Self::DEFAULT_FUEL_RATE_PER_QUARTER,
            late_rate_per_hour: Self::DEFAULT_LATE_RATE_PER_HOUR,
            damage_flat_fee: Self::DEFAULT_DAMAGE_FLAT_FEE,
        }
    }
}

fn env_rate(key: &str, default: Decimal) -> Decimal {
    match std::env::var(key) {
        Ok(raw) => parse_rate(&raw).unwrap_or_else(|| {
            tracing::warn!(key, value = %raw, default = %default, "Invalid charge rate, using default");
            default
        }),
        Err(_) => default,
    }
}

fn parse_rate(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim())
        .ok()
        .filter(|d| !d.is_sign_negative())
}
