//! Schema-validated dictionary record store.
//!
//! Clients define named, typed schemas ("dictionaries") and store records
//! that must conform to a chosen schema. This crate is the single source
//! of truth for the validation and atomicity invariants; transport layers
//! map its errors onto protocol responses.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging};
pub use model::dictionary::{
    DictionaryField, DictionaryStructure, FieldType, FieldValue, PayloadError, RawRecordData,
    RecordData, RecordId, StoredRecord, StructureError,
};
pub use repo::record_repo::{RecordStore, SqliteRecordStore};
pub use repo::registry_repo::{SchemaRegistry, SqliteSchemaRegistry};
pub use repo::{StoreError, StoreResult};
pub use service::record_service::RecordService;
pub use service::registry_service::RegistryService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
