//! Domain model for inventory records and the library catalog.
//!
//! # Responsibility
//! - Define canonical data structures used by repository and services.
//! - Own identifier normalization and attribute validation.
//!
//! # Invariants
//! - Every record is identified by a normalized `RecordId`.
//! - Values that reach a `Record` have already passed validation.

pub mod library;
pub mod record;
