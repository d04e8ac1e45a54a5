//! Line items from a persisted charge record

use shared::charges::{ChargeLineItem, StoredChargeRecord};

/// One line item per non-zero charge field, in canonical order
pub fn items_from_record(record: &StoredChargeRecord) -> Vec<ChargeLineItem> {
    record
        .fields()
        .into_iter()
        .filter_map(|(charge_type, amount)| {
            let amount = amount.filter(|a| a.is_finite() && *a != 0.0)?;
            Some(ChargeLineItem::new(
                charge_type,
                charge_type.label(),
                amount,
                None,
            ))
        })
        .collect()
}
