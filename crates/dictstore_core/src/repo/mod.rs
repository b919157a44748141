//! Repository layer: SQLite-backed schema registry and record store.
//!
//! # Responsibility
//! - Define the persistence contracts for dictionaries and records.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every public operation runs inside exactly one transaction; a failed
//!   precondition (missing dictionary, failed validation) aborts before
//!   any write is committed.
//! - Errors map one-to-one onto the transport taxonomy:
//!   NotFound -> 404, Conflict -> 409, InvalidArgument -> 400,
//!   Storage -> 500.

use crate::db::DbError;
use crate::model::dictionary::{PayloadError, StructureError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod record_repo;
pub mod registry_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Domain error for dictionary and record operations.
#[derive(Debug)]
pub enum StoreError {
    /// Referenced dictionary or record does not exist.
    NotFound(String),
    /// Duplicate dictionary name or record identifier.
    Conflict(String),
    /// Malformed identifier, structure, or payload failing validation.
    InvalidArgument(String),
    /// Backing-store failure not otherwise classified.
    Storage(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(message) => write!(f, "{message}"),
            Self::Conflict(message) => write!(f, "{message}"),
            Self::InvalidArgument(message) => write!(f, "{message}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

impl From<PayloadError> for StoreError {
    fn from(value: PayloadError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<StructureError> for StoreError {
    fn from(value: StructureError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

/// Recognizes a duplicate-key signature in a SQLite failure so the caller
/// can reclassify it as `Conflict` instead of `Storage`.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
