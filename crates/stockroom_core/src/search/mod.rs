//! Query layer over the in-memory record collection.
//!
//! # Responsibility
//! - Provide text search, predicate filters and listing order.
//! - Compute inventory aggregates.
//!
//! All queries are linear scans; record counts are expected to be small.

pub mod query;
pub mod summary;
