//! Text search, predicate filters and result ordering.
//!
//! # Invariants
//! - Text matching is case-insensitive substring matching.
//! - An empty needle matches every record.
//! - Sorting never changes the repository's stored order; it only applies
//!   to returned copies.

use crate::model::record::Record;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Text field targeted by [`matches_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Id,
    Name,
}

/// Ordering applied to listing and search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListOrder {
    /// Order in which records were added (or loaded).
    #[default]
    Insertion,
    /// Ascending by normalized identifier.
    ById,
}

impl Display for ListOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Insertion => f.write_str("insertion"),
            Self::ById => f.write_str("id"),
        }
    }
}

impl FromStr for ListOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "insertion" => Ok(Self::Insertion),
            "id" | "by_id" => Ok(Self::ById),
            other => Err(format!(
                "unsupported list order `{other}`; expected insertion|id"
            )),
        }
    }
}

/// Built-in record predicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordFilter {
    /// Quantity is zero.
    OutOfStock,
    /// Quantity is above zero.
    InStock,
    /// Price is at most the given bound.
    PriceAtMost(f64),
    /// Quantity is strictly below the given threshold.
    QuantityBelow(u64),
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        match *self {
            Self::OutOfStock => record.is_out_of_stock(),
            Self::InStock => !record.is_out_of_stock(),
            Self::PriceAtMost(bound) => record.price() <= bound,
            Self::QuantityBelow(threshold) => record.quantity() < threshold,
        }
    }
}

/// Returns whether `field` of `record` contains `needle`, ignoring case.
pub fn matches_text(record: &Record, needle: &str, field: SearchField) -> bool {
    let haystack = match field {
        SearchField::Id => record.id().as_str(),
        SearchField::Name => record.name(),
    };
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Sorts `records` in place according to `order`.
pub fn sort_records(records: &mut [Record], order: ListOrder) {
    match order {
        ListOrder::Insertion => {}
        ListOrder::ById => records.sort_by(|a, b| a.id().cmp(b.id())),
    }
}
