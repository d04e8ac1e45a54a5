//! Charge breakdown serialized into the booking's `chargesNotes`

use crate::money::require_finite;
use shared::charges::{ChargeBreakdown, ChargeLineItem, ChargeType};
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Why `chargesNotes` could not be used as a charge breakdown
#[derive(Debug, Error)]
pub enum NotesParseError {
    /// No notes, or only whitespace
    #[error("charge notes are empty")]
    Empty,

    #[error("charge notes are not a valid breakdown: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("charge notes contain an invalid amount for {label:?}: {amount}")]
    InvalidAmount { label: String, amount: f64 },
}

impl NotesParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Empty => ErrorCode::RequiredField,
            Self::Malformed(_) | Self::InvalidAmount { .. } => ErrorCode::ChargeNotesMalformed,
        }
    }
}

impl From<NotesParseError> for AppError {
    fn from(err: NotesParseError) -> Self {
        let app = AppError::with_message(err.code(), err.to_string())
            .with_detail("field", "chargesNotes");
        match err {
            NotesParseError::InvalidAmount { label, .. } => app.with_detail("label", label),
            _ => app,
        }
    }
}

/// Parse `chargesNotes` into a breakdown
///
/// Accepts `{ "total": .., "breakdown": [{ "label", "amount", "details"? }] }`.
/// The caller owns the precedence decision; nothing is swallowed here.
pub fn parse_charge_notes(notes: Option<&str>) -> Result<ChargeBreakdown, NotesParseError> {
    let raw = notes.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(NotesParseError::Empty);
    }

    let breakdown: ChargeBreakdown = serde_json::from_str(raw)?;
    for entry in &breakdown.breakdown {
        if require_finite(entry.amount, "amount").is_err() {
            return Err(NotesParseError::InvalidAmount {
                label: entry.label.clone(),
                amount: entry.amount,
            });
        }
    }
    Ok(breakdown)
}

/// One line item per breakdown entry, in the order given
pub fn items_from_breakdown(breakdown: &ChargeBreakdown) -> Vec<ChargeLineItem> {
    breakdown
        .breakdown
        .iter()
        .map(|entry| {
            ChargeLineItem::new(
                ChargeType::infer_from_label(&entry.label),
                entry.label.clone(),
                entry.amount,
                entry.details.clone(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_breakdown() {
        let notes = r#"{"total": 175, "breakdown": [
            {"label": "Mileage Overage", "amount": 100, "details": "222 mi over"},
            {"label": "Fuel Charge", "amount": 75}
        ]}"#;
        let parsed = parse_charge_notes(Some(notes)).unwrap();
        assert_eq!(parsed.total, Some(175.0));
        let items = items_from_breakdown(&parsed);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].details(), Some("222 mi over"));
        assert_eq!(items[1].charge_type(), ChargeType::Fuel);
    }

    #[test]
    fn test_empty_notes() {
        assert!(matches!(parse_charge_notes(None), Err(NotesParseError::Empty)));
        assert!(matches!(
            parse_charge_notes(Some("   ")),
            Err(NotesParseError::Empty)
        ));
    }

    #[test]
    fn test_free_text_notes_are_malformed() {
        let result = parse_charge_notes(Some("Guest returned car with a full tank"));
        assert!(matches!(result, Err(NotesParseError::Malformed(_))));

        let wrong_shape = parse_charge_notes(Some(r#"{"breakdown": "none"}"#));
        assert!(matches!(wrong_shape, Err(NotesParseError::Malformed(_))));
    }

    #[test]
    fn test_error_codes() {
        let empty: AppError = NotesParseError::Empty.into();
        assert_eq!(empty.code, ErrorCode::RequiredField);

        let malformed = parse_charge_notes(Some("not json")).unwrap_err();
        assert_eq!(malformed.code(), ErrorCode::ChargeNotesMalformed);

        let invalid = NotesParseError::InvalidAmount {
            label: "Fuel Charge".into(),
            amount: f64::NAN,
        };
        let app: AppError = invalid.into();
        assert_eq!(app.code, ErrorCode::ChargeNotesMalformed);
        let details = app.details.unwrap();
        assert_eq!(details.get("label"), Some(&serde_json::Value::from("Fuel Charge")));
        assert_eq!(details.get("field"), Some(&serde_json::Value::from("chargesNotes")));
    }
}
