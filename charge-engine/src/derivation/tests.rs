use super::*;
use chrono::{TimeZone, Utc};
use shared::booking::{FuelLevel, TripTelemetry};
use shared::charges::ChargeType;

fn booking_with(telemetry: TripTelemetry, notes: Option<&str>) -> Booking {
    Booking {
        id: "bk_test".to_string(),
        charges_notes: notes.map(str::to_string),
        telemetry,
        ..Default::default()
    }
}

fn returned_trip() -> TripTelemetry {
    TripTelemetry {
        start_mileage: Some(1000),
        end_mileage: Some(1500),
        fuel_level_start: Some(FuelLevel::Full),
        fuel_level_end: Some(FuelLevel::Full),
        damage_reported: false,
        number_of_days: Some(2),
        ..Default::default()
    }
}

const NOTES: &str = r#"{"total": 80, "breakdown": [{"label": "Cleaning fee", "amount": 80}]}"#;

#[test]
fn test_mileage_only_scenario() {
    let booking = booking_with(returned_trip(), None);
    let derived = derive_charges(&booking, None, &ChargePolicy::default());

    assert_eq!(derived.source, ChargeSource::Telemetry);
    assert_eq!(derived.items.len(), 1);
    assert_eq!(derived.items[0].charge_type(), ChargeType::Mileage);
    assert_eq!(derived.total, 45.0);
    assert!(derived.discrepancy.is_none());
}

#[test]
fn test_stored_record_wins_over_notes_and_telemetry() {
    let booking = booking_with(returned_trip(), Some(NOTES));
    let record = StoredChargeRecord {
        fuel_charge: Some(75.0),
        late_charge: Some(50.0),
        total_charges: Some(125.0),
        ..Default::default()
    };
    let derived = derive_charges(&booking, Some(&record), &ChargePolicy::default());

    assert_eq!(derived.source, ChargeSource::StoredRecord);
    let types: Vec<_> = derived.items.iter().map(|i| i.charge_type()).collect();
    assert_eq!(types, vec![ChargeType::Fuel, ChargeType::Late]);
    assert_eq!(derived.total, 125.0);
}

#[test]
fn test_stored_total_is_authoritative_but_flagged() {
    let booking = booking_with(TripTelemetry::default(), None);
    let record = StoredChargeRecord {
        mileage_charge: Some(45.0),
        total_charges: Some(60.0),
        ..Default::default()
    };
    let derived = derive_charges(&booking, Some(&record), &ChargePolicy::default());

    assert_eq!(derived.total, 60.0);
    let d = derived.discrepancy.unwrap();
    assert_eq!(d.line_item_total, 45.0);
    assert_eq!(d.difference, 15.0);
}

#[test]
fn test_stored_record_without_total_sums_items() {
    let booking = booking_with(TripTelemetry::default(), None);
    let record = StoredChargeRecord {
        mileage_charge: Some(45.0),
        damage_charge: Some(500.0),
        ..Default::default()
    };
    let derived = derive_charges(&booking, Some(&record), &ChargePolicy::default());
    assert_eq!(derived.total, 545.0);
    assert!(derived.discrepancy.is_none());
}

#[test]
fn test_empty_stored_record_falls_through_to_notes() {
    let booking = booking_with(returned_trip(), Some(NOTES));
    let empty = StoredChargeRecord {
        total_charges: Some(0.0),
        ..Default::default()
    };
    let derived = derive_charges(&booking, Some(&empty), &ChargePolicy::default());

    assert_eq!(derived.source, ChargeSource::ChargeNotes);
    assert_eq!(derived.items.len(), 1);
    assert_eq!(derived.items[0].charge_type(), ChargeType::Cleaning);
    assert_eq!(derived.total, 80.0);
}

#[test]
fn test_notes_total_is_resummed() {
    let notes = r#"{"total": 999, "breakdown": [
        {"label": "Fuel Charge", "amount": 75},
        {"label": "Late Return", "amount": 25}
    ]}"#;
    let booking = booking_with(TripTelemetry::default(), Some(notes));
    let derived = derive_charges(&booking, None, &ChargePolicy::default());

    assert_eq!(derived.total, 100.0);
    assert_eq!(derived.discrepancy.unwrap().reported_total, 999.0);
}

#[test]
fn test_malformed_notes_fall_through_to_telemetry() {
    let booking = booking_with(returned_trip(), Some("{not json"));
    let derived = derive_charges(&booking, None, &ChargePolicy::default());

    assert_eq!(derived.source, ChargeSource::Telemetry);
    assert_eq!(derived.total, 45.0);
}

#[test]
fn test_all_telemetry_charges() {
    let telemetry = TripTelemetry {
        start_mileage: Some(1000),
        end_mileage: Some(1500),
        fuel_level_start: Some(FuelLevel::Full),
        fuel_level_end: Some(FuelLevel::Half),
        scheduled_end_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()),
        actual_end_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 13, 30, 0).unwrap()),
        damage_reported: true,
        damage_description: None,
        number_of_days: Some(2),
    };
    let derived = derive_charges(&booking_with(telemetry, None), None, &ChargePolicy::default());

    // 45 mileage + 150 fuel + 100 late + 500 damage
    assert_eq!(derived.items.len(), 4);
    assert_eq!(derived.total, 795.0);
    assert!(derived.items.iter().all(|i| i.included()));
}

#[test]
fn test_nothing_applies() {
    let derived = derive_charges(
        &booking_with(TripTelemetry::default(), None),
        None,
        &ChargePolicy::default(),
    );
    assert_eq!(derived.source, ChargeSource::Telemetry);
    assert!(derived.is_empty());
    assert_eq!(derived.total, 0.0);
}

#[test]
fn test_derive_for_review_ignores_empty_record() {
    let review = VerificationReview {
        booking: booking_with(returned_trip(), None),
        charges: Some(StoredChargeRecord::default()),
        ai_verification: None,
    };
    let derived = derive_for_review(&review, &ChargePolicy::default());
    assert_eq!(derived.source, ChargeSource::Telemetry);
}

#[test]
fn test_extreme_odometer_payload_derives_without_mileage() {
    let booking: Booking = serde_json::from_str(
        r#"{"id": "bk_odo", "startMileage": -9000000000000000000,
            "endMileage": 9000000000000000000, "numberOfDays": 1}"#,
    )
    .unwrap();
    let derived = derive_charges(&booking, None, &ChargePolicy::default());
    assert_eq!(derived.source, ChargeSource::Telemetry);
    assert!(derived.is_empty());
}
