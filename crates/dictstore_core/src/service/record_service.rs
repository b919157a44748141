//! Record use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for dictionary records.
//! - Validate dictionary names before delegating to the record store.

use crate::model::dictionary::{RawRecordData, RecordId, StoredRecord};
use crate::repo::record_repo::RecordStore;
use crate::repo::StoreResult;
use crate::service::check_dictionary_name;

/// Use-case wrapper for record CRUD operations.
pub struct RecordService<R: RecordStore> {
    store: R,
}

impl<R: RecordStore> RecordService<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }

    /// Lists every record under a dictionary.
    pub fn list(&self, dictionary_name: &str) -> StoreResult<Vec<StoredRecord>> {
        check_dictionary_name(dictionary_name)?;
        self.store.list(dictionary_name)
    }

    /// Gets one record by id within a dictionary.
    pub fn get(&self, dictionary_name: &str, id: RecordId) -> StoreResult<StoredRecord> {
        check_dictionary_name(dictionary_name)?;
        self.store.get(dictionary_name, id)
    }

    /// Validates and persists a new record; returns the assigned id.
    pub fn add(&self, dictionary_name: &str, raw: &RawRecordData) -> StoreResult<RecordId> {
        check_dictionary_name(dictionary_name)?;
        self.store.add(dictionary_name, raw)
    }

    /// Validates and updates a record in place, inserting it under the
    /// given id when no matching row exists.
    pub fn update(
        &self,
        dictionary_name: &str,
        id: RecordId,
        raw: &RawRecordData,
    ) -> StoreResult<()> {
        check_dictionary_name(dictionary_name)?;
        self.store.update(dictionary_name, id, raw)
    }

    /// Deletes a record by id within a dictionary.
    pub fn delete(&self, dictionary_name: &str, id: RecordId) -> StoreResult<()> {
        check_dictionary_name(dictionary_name)?;
        self.store.delete(dictionary_name, id)
    }
}
