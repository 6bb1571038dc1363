//! In-memory backend used for tests and throwaway sessions.

use super::{document, RecordStore, StoreError, StoreResult};
use crate::model::record::Record;

/// Record store that keeps the last saved document text in memory.
///
/// Saves go through the same codec as [`super::JsonFileStore`], so the
/// stored text is exactly what would have been written to disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: Option<String>,
    fail_saves: bool,
    save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose next `load` parses `text`.
    pub fn with_document(text: impl Into<String>) -> Self {
        Self {
            document: Some(text.into()),
            ..Self::default()
        }
    }

    /// Makes every following `save` fail until switched off again.
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Last successfully saved document text.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> StoreResult<Vec<Record>> {
        match self.document.as_deref() {
            Some(text) => document::decode(text).map_err(|message| StoreError::Malformed {
                location: self.describe(),
                message,
            }),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, records: &[Record]) -> StoreResult<()> {
        if self.fail_saves {
            return Err(StoreError::Injected("save disabled".to_string()));
        }
        self.document = Some(document::encode(records).map_err(StoreError::Serialize)?);
        self.save_count += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
