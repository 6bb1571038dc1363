//! Keyed record repository with write-through persistence and rollback.
//!
//! # Responsibility
//! - Provide add/remove/update/get over normalized record identifiers.
//! - Answer search, filter, listing and aggregate queries.
//! - Persist the full state after every successful mutation.
//!
//! # Invariants
//! - A mutation is visible only if the following save succeeded; otherwise
//!   it is reverted before the error is returned.
//! - Stored order is insertion order; `ListOrder` only shapes query output.
//! - Load failures never abort construction; they degrade to an empty
//!   repository and are exposed through `load_warning`.

use crate::model::record::{NewRecord, Record, RecordId, RecordPatch, ValidationError};
use crate::search::query::{matches_text, sort_records, ListOrder, RecordFilter, SearchField};
use crate::search::summary::InventorySummary;
use crate::store::{JsonFileStore, MemoryStore, RecordStore, StoreError, StoreResult};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record CRUD operations.
#[derive(Debug)]
pub enum RepoError {
    /// Identifier already present (after normalization).
    DuplicateId(RecordId),
    NotFound(RecordId),
    Validation(ValidationError),
    /// Save failed; the attempted mutation was rolled back.
    Persistence(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "record already exists: {id}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "change not saved: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::DuplicateId(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Construction options for [`Repository`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// Ordering of `list_all`, `search` and `filter` results.
    pub list_order: ListOrder,
}

/// Keyed record repository backed by a `RecordStore`.
pub struct Repository<S: RecordStore> {
    store: S,
    records: Vec<Record>,
    options: RepositoryOptions,
    load_warning: Option<StoreError>,
}

impl Repository<MemoryStore> {
    /// Creates an empty repository persisted only in memory.
    pub fn in_memory() -> Self {
        Self::open(MemoryStore::new(), RepositoryOptions::default())
    }
}

impl<S: RecordStore> Repository<S> {
    /// Hydrates a repository from `store`.
    ///
    /// A load failure is logged, kept as [`Repository::load_warning`], and
    /// yields an empty repository. The store is not rewritten until the
    /// first successful mutation.
    pub fn open(store: S, options: RepositoryOptions) -> Self {
        let (records, load_warning) = match store.load() {
            Ok(records) => {
                info!(
                    "event=repo_open module=repo status=ok store={} records={}",
                    store.describe(),
                    records.len()
                );
                (records, None)
            }
            Err(err) => {
                warn!(
                    "event=repo_open module=repo status=degraded store={} error={}",
                    store.describe(),
                    err
                );
                (Vec::new(), Some(err))
            }
        };

        Self {
            store,
            records,
            options,
            load_warning,
        }
    }

    /// Error raised while loading, if the repository started empty because of it.
    ///
    /// Cleared by the first successful save, which replaces the bad document.
    pub fn load_warning(&self) -> Option<&StoreError> {
        self.load_warning.as_ref()
    }

    pub fn options(&self) -> RepositoryOptions {
        self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backend, e.g. to toggle failure injection.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Adds a new record and persists.
    ///
    /// # Errors
    /// - `Validation` for a bad identifier or attribute.
    /// - `DuplicateId` when the normalized id is taken.
    /// - `Persistence` when the save fails (record is not kept).
    pub fn add(&mut self, id: &str, fields: NewRecord) -> RepoResult<RecordId> {
        let id = RecordId::parse(id)?;
        if self.position(&id).is_some() {
            return Err(RepoError::DuplicateId(id));
        }

        let record = Record::new(id.clone(), fields)?;
        self.records.push(record);
        if let Err(err) = self.persist("add", &id) {
            self.records.pop();
            return Err(err);
        }

        info!("event=record_add module=repo status=ok id={id}");
        Ok(id)
    }

    /// Removes a record and persists; returns the removed record.
    pub fn remove(&mut self, id: &str) -> RepoResult<Record> {
        let id = RecordId::parse(id)?;
        let index = self
            .position(&id)
            .ok_or_else(|| RepoError::NotFound(id.clone()))?;

        let removed = self.records.remove(index);
        if let Err(err) = self.persist("remove", &id) {
            self.records.insert(index, removed);
            return Err(err);
        }

        info!("event=record_remove module=repo status=ok id={id}");
        Ok(removed)
    }

    /// Applies `patch` to one record and persists; returns the new value.
    ///
    /// The whole patch is validated before anything changes.
    pub fn update(&mut self, id: &str, patch: &RecordPatch) -> RepoResult<Record> {
        let id = RecordId::parse(id)?;
        let index = self
            .position(&id)
            .ok_or_else(|| RepoError::NotFound(id.clone()))?;

        let updated = self.records[index].apply(patch)?;
        let previous = std::mem::replace(&mut self.records[index], updated.clone());
        if let Err(err) = self.persist("update", &id) {
            self.records[index] = previous;
            return Err(err);
        }

        info!("event=record_update module=repo status=ok id={id}");
        Ok(updated)
    }

    /// Exact lookup by normalized identifier.
    ///
    /// Input that is not a valid identifier simply finds nothing.
    pub fn get(&self, id: &str) -> Option<Record> {
        let id = RecordId::parse(id).ok()?;
        self.position(&id).map(|index| self.records[index].clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Case-insensitive substring search on one text field.
    pub fn search(&self, needle: &str, field: SearchField) -> Vec<Record> {
        self.filter(|record| matches_text(record, needle, field))
    }

    /// Returns copies of all records satisfying `predicate`.
    pub fn filter(&self, predicate: impl Fn(&Record) -> bool) -> Vec<Record> {
        let mut matches: Vec<Record> = self
            .records
            .iter()
            .filter(|&record| predicate(record))
            .cloned()
            .collect();
        sort_records(&mut matches, self.options.list_order);
        matches
    }

    pub fn matching(&self, filter: RecordFilter) -> Vec<Record> {
        self.filter(|record| filter.matches(record))
    }

    pub fn out_of_stock(&self) -> Vec<Record> {
        self.matching(RecordFilter::OutOfStock)
    }

    pub fn list_all(&self) -> Vec<Record> {
        self.filter(|_| true)
    }

    pub fn aggregate(&self) -> InventorySummary {
        InventorySummary::from_records(&self.records)
    }

    /// Writes a snapshot of the current records to `path` as a keyed JSON
    /// document.
    ///
    /// The live store is not touched and the snapshot loads like any data
    /// file. An existing file at `path` is replaced atomically.
    pub fn backup_to(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let mut snapshot = JsonFileStore::new(path.as_ref());
        match snapshot.save(&self.records) {
            Ok(()) => {
                info!(
                    "event=repo_backup module=repo status=ok target={} records={}",
                    snapshot.describe(),
                    self.records.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=repo_backup module=repo status=error target={} error={err}",
                    snapshot.describe()
                );
                Err(err)
            }
        }
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn persist(&mut self, operation: &str, id: &RecordId) -> RepoResult<()> {
        self.store.save(&self.records).map_err(|err| {
            error!(
                "event=record_{operation} module=repo status=rolled_back id={id} store={} error={err}",
                self.store.describe()
            );
            RepoError::Persistence(err)
        })?;
        self.load_warning = None;
        Ok(())
    }
}
