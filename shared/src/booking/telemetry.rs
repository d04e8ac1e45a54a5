//! Trip telemetry recorded at pickup and return

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Fuel Level
// ============================================================================

/// Fuel gauge reading in quarter-tank steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FuelLevel {
    #[serde(rename = "Empty")]
    Empty,
    #[serde(rename = "1/4")]
    Quarter,
    #[serde(rename = "1/2")]
    Half,
    #[serde(rename = "3/4")]
    ThreeQuarters,
    #[serde(rename = "Full")]
    Full,
}

impl FuelLevel {
    /// Position on the 0 (Empty) .. 4 (Full) scale
    pub const fn quarters(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Quarter => 1,
            Self::Half => 2,
            Self::ThreeQuarters => 3,
            Self::Full => 4,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Quarter => "1/4",
            Self::Half => "1/2",
            Self::ThreeQuarters => "3/4",
            Self::Full => "Full",
        }
    }
}

impl fmt::Display for FuelLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized fuel gauge label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fuel level: {0:?}")]
pub struct UnknownFuelLevel(pub String);

impl FromStr for FuelLevel {
    type Err = UnknownFuelLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" | "e" | "0" | "0/4" => Ok(Self::Empty),
            "1/4" => Ok(Self::Quarter),
            "1/2" | "2/4" => Ok(Self::Half),
            "3/4" => Ok(Self::ThreeQuarters),
            "full" | "f" | "4/4" => Ok(Self::Full),
            _ => Err(UnknownFuelLevel(s.to_string())),
        }
    }
}

/// Deserialize an optional fuel level, mapping unrecognized labels to `None`
fn lenient_fuel_level<'de, D>(deserializer: D) -> Result<Option<FuelLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

// ============================================================================
// Trip Telemetry
// ============================================================================

/// Readings captured by the trip subsystem, read-only for charge derivation
///
/// Every field is optional on the wire: a missing reading means the
/// corresponding charge simply does not apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripTelemetry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_mileage: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_fuel_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub fuel_level_start: Option<FuelLevel>,
    #[serde(
        default,
        deserialize_with = "lenient_fuel_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub fuel_level_end: Option<FuelLevel>,
    /// When the car was actually returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end_time: Option<DateTime<Utc>>,
    /// Scheduled return time
    #[serde(default, rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub scheduled_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub damage_reported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_days: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_level_scale() {
        assert_eq!(FuelLevel::Empty.quarters(), 0);
        assert_eq!(FuelLevel::Half.quarters(), 2);
        assert_eq!(FuelLevel::Full.quarters(), 4);
        assert!(FuelLevel::Full > FuelLevel::ThreeQuarters);
    }

    #[test]
    fn test_fuel_level_parse() {
        assert_eq!("Full".parse::<FuelLevel>(), Ok(FuelLevel::Full));
        assert_eq!(" 3/4 ".parse::<FuelLevel>(), Ok(FuelLevel::ThreeQuarters));
        assert_eq!("empty".parse::<FuelLevel>(), Ok(FuelLevel::Empty));
        assert!("half-ish".parse::<FuelLevel>().is_err());
    }

    #[test]
    fn test_telemetry_from_camel_case_json() {
        let json = r#"{
            "startMileage": 1000,
            "endMileage": 1500,
            "fuelLevelStart": "Full",
            "fuelLevelEnd": "1/2",
            "endDate": "2024-01-01T10:00:00Z",
            "actualEndTime": "2024-01-01T13:30:00Z",
            "damageReported": false,
            "numberOfDays": 2
        }"#;
        let t: TripTelemetry = serde_json::from_str(json).unwrap();
        assert_eq!(t.start_mileage, Some(1000));
        assert_eq!(t.end_mileage, Some(1500));
        assert_eq!(t.fuel_level_start, Some(FuelLevel::Full));
        assert_eq!(t.fuel_level_end, Some(FuelLevel::Half));
        assert!(t.scheduled_end_time.is_some());
        assert_eq!(t.number_of_days, Some(2));
    }

    #[test]
    fn test_unknown_fuel_level_is_treated_as_missing() {
        let json = r#"{ "fuelLevelStart": "7/8", "fuelLevelEnd": null }"#;
        let t: TripTelemetry = serde_json::from_str(json).unwrap();
        assert_eq!(t.fuel_level_start, None);
        assert_eq!(t.fuel_level_end, None);
        assert!(!t.damage_reported);
    }
}
