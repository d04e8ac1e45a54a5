//! Cross-check a reported total against its line items

use crate::money::{differs, sum_amounts, to_decimal, to_f64};
use serde::Serialize;
use shared::charges::ChargeLineItem;

/// A reported total that does not match the sum of its line items
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalDiscrepancy {
    pub reported_total: f64,
    pub line_item_total: f64,
    /// `reported_total - line_item_total`
    pub difference: f64,
}

/// Compare `reported_total` with the sum of original amounts
///
/// Differences within one cent are rounding noise and not reported.
pub fn reconcile(reported_total: f64, items: &[ChargeLineItem]) -> Option<TotalDiscrepancy> {
    let reported = to_decimal(reported_total);
    let summed = sum_amounts(items.iter().map(ChargeLineItem::original_amount));
    if !differs(reported, summed) {
        return None;
    }

    Some(TotalDiscrepancy {
        reported_total: to_f64(reported),
        line_item_total: to_f64(summed),
        difference: to_f64(reported - summed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::charges::ChargeType;

    fn items() -> Vec<ChargeLineItem> {
        vec![
            ChargeLineItem::new(ChargeType::Mileage, "Mileage Overage", 45.0, None),
            ChargeLineItem::new(ChargeType::Fuel, "Fuel Charge", 75.0, None),
        ]
    }

    #[test]
    fn test_matching_total() {
        assert_eq!(reconcile(120.0, &items()), None);
        assert_eq!(reconcile(120.01, &items()), None);
    }

    #[test]
    fn test_mismatched_total() {
        let d = reconcile(150.0, &items()).unwrap();
        assert_eq!(d.reported_total, 150.0);
        assert_eq!(d.line_item_total, 120.0);
        assert_eq!(d.difference, 30.0);
    }
}
