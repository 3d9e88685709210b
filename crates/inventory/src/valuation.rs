//! Inventory valuation over the full store (never the filtered view).

use serde::Serialize;

use stockroom_core::ValueObject;

use crate::item::Item;

/// `Σ price × quantity` over every item.
pub fn total_value(items: &[Item]) -> f64 {
    items.iter().map(Item::value).sum()
}

/// `total_value / item_count`, or 0 for an empty store.
pub fn average_price(items: &[Item]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    total_value(items) / items.len() as f64
}

/// Summed as `u128`: every quantity fits in `u64`, their total may not.
pub fn total_quantity(items: &[Item]) -> u128 {
    items.iter().map(|item| u128::from(item.quantity())).sum()
}

/// Summary of the whole inventory, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySummary {
    pub item_count: usize,
    pub total_quantity: u128,
    pub total_value: f64,
    pub average_price: f64,
}

impl ValueObject for InventorySummary {}

impl InventorySummary {
    pub fn of(items: &[Item]) -> Self {
        Self {
            item_count: items.len(),
            total_quantity: total_quantity(items),
            total_value: total_value(items),
            average_price: average_price(items),
        }
    }
}
