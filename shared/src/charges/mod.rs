//! Post-trip charge types

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Charge Type
// ============================================================================

/// Kind of post-trip charge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChargeType {
    #[default]
    Mileage,
    Fuel,
    Late,
    Damage,
    Cleaning,
}

impl ChargeType {
    /// Infer the charge type from a display label
    ///
    /// Case-insensitive substring match, checked in order: fuel, late,
    /// damage, cleaning. Anything else is treated as mileage.
    pub fn infer_from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("fuel") {
            Self::Fuel
        } else if label.contains("late") {
            Self::Late
        } else if label.contains("damage") {
            Self::Damage
        } else if label.contains("cleaning") {
            Self::Cleaning
        } else {
            Self::Mileage
        }
    }

    /// Canonical display label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mileage => "Mileage Overage",
            Self::Fuel => "Fuel Charge",
            Self::Late => "Late Return",
            Self::Damage => "Damage",
            Self::Cleaning => "Cleaning",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mileage => "mileage",
            Self::Fuel => "fuel",
            Self::Late => "late",
            Self::Damage => "damage",
            Self::Cleaning => "cleaning",
        }
    }
}

impl fmt::Display for ChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Charge Line Item
// ============================================================================

/// One itemized post-trip charge under admin review
///
/// `original_amount` is fixed at construction. `adjusted_amount` starts equal
/// to it and is the only amount an admin may change; it never goes below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LineItemRepr")]
pub struct ChargeLineItem {
    #[serde(rename = "type")]
    charge_type: ChargeType,
    label: String,
    original_amount: f64,
    adjusted_amount: f64,
    included: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Wire shape; normalized through [`ChargeLineItem::from`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemRepr {
    #[serde(rename = "type", default)]
    charge_type: Option<ChargeType>,
    label: String,
    original_amount: f64,
    #[serde(default)]
    adjusted_amount: Option<f64>,
    #[serde(default = "default_included")]
    included: bool,
    #[serde(default)]
    details: Option<String>,
}

fn default_included() -> bool {
    true
}

impl From<LineItemRepr> for ChargeLineItem {
    fn from(repr: LineItemRepr) -> Self {
        let charge_type = repr
            .charge_type
            .unwrap_or_else(|| ChargeType::infer_from_label(&repr.label));
        let mut item = ChargeLineItem::new(charge_type, repr.label, repr.original_amount, repr.details);
        if let Some(adjusted) = repr.adjusted_amount {
            item.set_adjusted_amount(adjusted);
        }
        item.included = repr.included;
        item
    }
}

/// Clamp an admin-entered amount: never negative, non-finite becomes zero
#[inline]
fn clamp_amount(amount: f64) -> f64 {
    if amount.is_finite() { amount.max(0.0) } else { 0.0 }
}

impl ChargeLineItem {
    pub fn new(
        charge_type: ChargeType,
        label: impl Into<String>,
        amount: f64,
        details: Option<String>,
    ) -> Self {
        Self {
            charge_type,
            label: label.into(),
            original_amount: amount,
            adjusted_amount: clamp_amount(amount),
            included: true,
            details,
        }
    }

    pub fn charge_type(&self) -> ChargeType {
        self.charge_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn original_amount(&self) -> f64 {
        self.original_amount
    }

    pub fn adjusted_amount(&self) -> f64 {
        self.adjusted_amount
    }

    pub fn included(&self) -> bool {
        self.included
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Overwrite the adjusted amount, clamped to `>= 0`
    pub fn set_adjusted_amount(&mut self, amount: f64) {
        self.adjusted_amount = clamp_amount(amount);
    }

    pub fn toggle_included(&mut self) {
        self.included = !self.included;
    }

    /// Back to the derived state: original amount, included
    pub fn reset(&mut self) {
        self.adjusted_amount = clamp_amount(self.original_amount);
        self.included = true;
    }

    /// Re-derive `charge_type` from the label
    pub fn reclassify(&mut self) {
        self.charge_type = ChargeType::infer_from_label(&self.label);
    }

    /// Whether the admin changed anything on this item
    pub fn is_modified(&self) -> bool {
        !self.included || self.adjusted_amount != clamp_amount(self.original_amount)
    }
}

// ============================================================================
// Stored Charge Record
// ============================================================================

/// Previously persisted charge computation for a trip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredChargeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_charges: Option<f64>,
}

impl StoredChargeRecord {
    /// Charge fields in canonical display order
    pub fn fields(&self) -> [(ChargeType, Option<f64>); 5] {
        [
            (ChargeType::Mileage, self.mileage_charge),
            (ChargeType::Fuel, self.fuel_charge),
            (ChargeType::Late, self.late_charge),
            (ChargeType::Damage, self.damage_charge),
            (ChargeType::Cleaning, self.cleaning_charge),
        ]
    }

    /// No charge field and no total carries a non-zero value
    pub fn is_empty(&self) -> bool {
        let nonzero = |v: Option<f64>| v.is_some_and(|x| x != 0.0 && x.is_finite());
        !nonzero(self.total_charges) && self.fields().iter().all(|(_, v)| !nonzero(*v))
    }
}

// ============================================================================
// Serialized Breakdown (charges notes)
// ============================================================================

/// Charge breakdown serialized into the booking's free-text notes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default)]
    pub breakdown: Vec<BreakdownEntry>,
}

/// One entry in a serialized breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
