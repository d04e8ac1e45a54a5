//! Charge type normalization

use shared::charges::ChargeLineItem;

/// Re-derive every item's type from its label
///
/// Whatever path produced the items, toggle/adjust logic downstream keys on
/// the type inferred here.
pub fn normalize_types(items: &mut [ChargeLineItem]) {
    for item in items.iter_mut() {
        let before = item.charge_type();
        item.reclassify();
        if item.charge_type() != before {
            tracing::debug!(
                label = item.label(),
                from = %before,
                to = %item.charge_type(),
                "Reclassified charge line item"
            );
        }
    }
}
