//! Persistence adapters for the record repository.
//!
//! # Responsibility
//! - Define the `RecordStore` contract used for write-through persistence.
//! - Provide a flat JSON file backend and an in-memory backend.
//!
//! # Invariants
//! - `save` receives the full repository state, never a delta.
//! - `load` of an absent or blank source yields an empty record list.
//! - A failed `save` leaves the previously persisted state readable.

use crate::model::record::Record;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document;
mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure reported by a `RecordStore`.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying file could not be read or written.
    Io {
        location: String,
        source: std::io::Error,
    },
    /// Stored text is not a valid record document.
    Malformed { location: String, message: String },
    /// Records could not be encoded.
    Serialize(String),
    /// Failure injected by a test double.
    Injected(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { location, source } => write!(f, "i/o error on `{location}`: {source}"),
            Self::Malformed { location, message } => {
                write!(f, "malformed record document `{location}`: {message}")
            }
            Self::Serialize(message) => write!(f, "failed to encode records: {message}"),
            Self::Injected(message) => write!(f, "injected store failure: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Storage backend contract for [`crate::Repository`].
pub trait RecordStore {
    /// Reads the full persisted record list in stored order.
    fn load(&self) -> StoreResult<Vec<Record>>;
    /// Replaces the persisted state with `records`.
    fn save(&mut self, records: &[Record]) -> StoreResult<()>;
    /// Short human-readable location used in log events and messages.
    fn describe(&self) -> String;
}
