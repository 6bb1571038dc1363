//! Flat JSON file backend.
//!
//! # Invariants
//! - Missing and blank files load as an empty record list.
//! - Saves go through a sibling temporary file that is synced and then
//!   renamed over the target, so the target is either the old or the new
//!   document, never a partial one.
//! - The temporary file is removed when a save fails before the rename.

use super::{document, RecordStore, StoreError, StoreResult};
use crate::model::record::Record;
use log::{debug, error, info};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Record store persisted as one JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            location: self.describe(),
            source,
        }
    }

    fn write_atomically(&self, text: &str) -> StoreResult<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(dir).map_err(|err| self.io_error(err))?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|err| self.io_error(err))?;
        temp.write_all(text.as_bytes())
            .map_err(|err| self.io_error(err))?;
        temp.as_file()
            .sync_all()
            .map_err(|err| self.io_error(err))?;
        temp.persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> StoreResult<Vec<Record>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=store_load module=store status=missing path={}",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        let records = document::decode(&text).map_err(|message| StoreError::Malformed {
            location: self.describe(),
            message,
        })?;
        debug!(
            "event=store_load module=store status=ok path={} records={}",
            self.path.display(),
            records.len()
        );
        Ok(records)
    }

    fn save(&mut self, records: &[Record]) -> StoreResult<()> {
        let started_at = Instant::now();
        let text = document::encode(records).map_err(StoreError::Serialize)?;

        match self.write_atomically(&text) {
            Ok(()) => {
                debug!(
                    "event=store_save module=store status=ok path={} records={} duration_ms={}",
                    self.path.display(),
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error path={} duration_ms={} error={}",
                    self.path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
