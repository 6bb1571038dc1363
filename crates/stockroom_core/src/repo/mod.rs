//! Repository layer: keyed record collection with write-through persistence.
//!
//! # Responsibility
//! - Enforce identifier uniqueness and attribute validation on every write.
//! - Keep memory and the configured `RecordStore` in step.
//!
//! # Invariants
//! - No two records share a normalized identifier.
//! - After any failed save, in-memory state equals the last persisted state.
//! - Reads hand out copies; internal records are never aliased.

pub mod record_repo;
