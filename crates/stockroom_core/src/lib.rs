//! Core domain logic for Stockroom.
//! This crate is the single source of truth for inventory invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;

pub use config::{ConfigError, StockroomConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::library::{Book, Member};
pub use model::record::{NewRecord, Record, RecordId, RecordPatch, ValidationError};
pub use repo::record_repo::{RepoError, RepoResult, Repository, RepositoryOptions};
pub use search::query::{ListOrder, RecordFilter, SearchField};
pub use search::summary::InventorySummary;
pub use service::inventory_service::{InventoryReport, InventoryService};
pub use service::library_service::{
    BookField, LibraryError, LibraryResult, LibraryService, LibraryStats, NewBook,
    DEFAULT_LOAN_LIMIT,
};
pub use store::{JsonFileStore, MemoryStore, RecordStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
