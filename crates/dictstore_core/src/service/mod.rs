//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own identifier and structure sanity checks so repositories only see
//!   well-formed arguments.

pub mod record_service;
pub mod registry_service;

use crate::model::dictionary::MAX_NAME_LENGTH;
use crate::repo::{StoreError, StoreResult};

/// Rejects blank or overlong dictionary names before any transaction is
/// opened. The length cap mirrors the `dictionaries` table definition.
pub(crate) fn check_dictionary_name(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidArgument(
            "dictionary name must not be blank".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(StoreError::InvalidArgument(format!(
            "dictionary name exceeds {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}
