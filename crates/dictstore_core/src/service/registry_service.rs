//! Schema registry use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for dictionary management.
//! - Validate names and structures before delegating to the registry.

use crate::model::dictionary::DictionaryStructure;
use crate::repo::registry_repo::SchemaRegistry;
use crate::repo::StoreResult;
use crate::service::check_dictionary_name;

/// Use-case wrapper for dictionary definition management.
pub struct RegistryService<R: SchemaRegistry> {
    registry: R,
}

impl<R: SchemaRegistry> RegistryService<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Returns every dictionary name in backing-store order.
    pub fn list_all(&self) -> StoreResult<Vec<String>> {
        self.registry.list_all()
    }

    /// Creates a new dictionary.
    ///
    /// # Contract
    /// - Fails `InvalidArgument` on a blank/overlong name or a structure
    ///   with no fields, empty field names, or duplicate field names.
    /// - Fails `Conflict` when the name is already taken.
    pub fn create(&self, name: &str, structure: &DictionaryStructure) -> StoreResult<()> {
        check_dictionary_name(name)?;
        structure.validate()?;
        self.registry.create(name, structure)
    }

    /// Clones a dictionary's structure and records under a new name.
    ///
    /// # Contract
    /// - Fails `NotFound` when the source is absent.
    /// - Fails `Conflict` when the target name is already taken.
    /// - Copied records receive fresh identifiers; payloads are copied
    ///   verbatim without re-validation.
    pub fn copy(&self, from_name: &str, to_name: &str) -> StoreResult<()> {
        check_dictionary_name(from_name)?;
        check_dictionary_name(to_name)?;
        self.registry.copy(from_name, to_name)
    }

    /// Deletes a dictionary and all of its records.
    ///
    /// Fails `NotFound` when the dictionary does not exist.
    pub fn delete(&self, name: &str) -> StoreResult<()> {
        check_dictionary_name(name)?;
        self.registry.delete(name)
    }
}
