//! Inventory aggregates.

use crate::model::record::Record;

/// Aggregate figures over a set of records.
///
/// An empty set yields zeros and `average_price = None`; no division happens.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InventorySummary {
    pub count: usize,
    pub total_quantity: u64,
    /// Sum of `quantity * price`.
    pub total_value: f64,
    pub out_of_stock_count: usize,
    /// Mean unit price, `None` when there are no records.
    pub average_price: Option<f64>,
}

impl InventorySummary {
    pub fn from_records(records: &[Record]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let mut summary = Self {
            count: records.len(),
            ..Self::default()
        };
        let mut price_sum = 0.0;
        for record in records {
            summary.total_quantity = summary.total_quantity.saturating_add(record.quantity());
            summary.total_value += record.value();
            price_sum += record.price();
            if record.is_out_of_stock() {
                summary.out_of_stock_count += 1;
            }
        }
        summary.average_price = Some(price_sum / records.len() as f64);
        summary
    }
}
