//! Inventory use-case service.
//!
//! # Responsibility
//! - Provide the stock-keeping use cases (add, remove, restock, reprice).
//! - Delegate persistence and validation to `Repository`.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or rollback.
//! - Service layer remains storage-agnostic.

use crate::model::record::{NewRecord, Record, RecordId, RecordPatch, ValidationError};
use crate::repo::record_repo::{RepoError, RepoResult, Repository};
use crate::search::query::SearchField;
use crate::search::summary::InventorySummary;
use crate::store::RecordStore;

/// Snapshot of all records plus their aggregate figures.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryReport {
    pub records: Vec<Record>,
    pub summary: InventorySummary,
}

/// Use-case facade over a record repository.
pub struct InventoryService<S: RecordStore> {
    repo: Repository<S>,
}

impl<S: RecordStore> InventoryService<S> {
    pub fn new(repo: Repository<S>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut Repository<S> {
        &mut self.repo
    }

    pub fn add_product(
        &mut self,
        id: &str,
        name: &str,
        quantity: i64,
        price: f64,
    ) -> RepoResult<RecordId> {
        self.repo.add(id, NewRecord::new(name, quantity, price))
    }

    pub fn remove_product(&mut self, id: &str) -> RepoResult<Record> {
        self.repo.remove(id)
    }

    pub fn get_product(&self, id: &str) -> Option<Record> {
        self.repo.get(id)
    }

    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> RepoResult<Record> {
        self.repo.update(id, &RecordPatch::quantity(quantity))
    }

    pub fn set_price(&mut self, id: &str, price: f64) -> RepoResult<Record> {
        self.repo.update(id, &RecordPatch::price(price))
    }

    pub fn rename(&mut self, id: &str, name: &str) -> RepoResult<Record> {
        self.repo.update(id, &RecordPatch::name(name))
    }

    /// Adjusts stock by a signed `delta`.
    ///
    /// # Errors
    /// - `Validation(NegativeQuantity)` when stock would drop below zero.
    /// - `Validation(QuantityOverflow)` when the sum leaves the `i64` range.
    pub fn restock(&mut self, id: &str, delta: i64) -> RepoResult<Record> {
        let current = self.repo.get(id).ok_or_else(|| match RecordId::parse(id) {
            Ok(parsed) => RepoError::NotFound(parsed),
            Err(err) => RepoError::Validation(err),
        })?;

        let next = i64::try_from(current.quantity())
            .ok()
            .and_then(|quantity| quantity.checked_add(delta))
            .ok_or(ValidationError::QuantityOverflow)?;
        self.repo.update(id, &RecordPatch::quantity(next))
    }

    pub fn find_by_name(&self, needle: &str) -> Vec<Record> {
        self.repo.search(needle, SearchField::Name)
    }

    pub fn out_of_stock(&self) -> Vec<Record> {
        self.repo.out_of_stock()
    }

    pub fn report(&self) -> InventoryReport {
        InventoryReport {
            records: self.repo.list_all(),
            summary: self.repo.aggregate(),
        }
    }
}
