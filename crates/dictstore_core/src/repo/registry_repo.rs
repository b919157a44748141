//! Schema registry contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own dictionary definitions: list, create, copy, delete.
//! - Enforce name uniqueness through the backing store's constraint,
//!   not a pre-check, so detection and insert are one atomic step.
//!
//! # Invariants
//! - `delete` removes a dictionary's records in the same transaction as
//!   the dictionary row.
//! - `copy` duplicates record payloads verbatim under fresh identifiers;
//!   a failure at any step leaves no partial dictionary or records.

use crate::db::DbError;
use crate::model::dictionary::DictionaryStructure;
use crate::repo::{is_unique_violation, StoreError, StoreResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

/// Registry interface for dictionary definitions.
pub trait SchemaRegistry {
    fn list_all(&self) -> StoreResult<Vec<String>>;
    fn create(&self, name: &str, structure: &DictionaryStructure) -> StoreResult<()>;
    fn copy(&self, from_name: &str, to_name: &str) -> StoreResult<()>;
    fn delete(&self, name: &str) -> StoreResult<()>;
}

/// SQLite-backed schema registry.
pub struct SqliteSchemaRegistry<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSchemaRegistry<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SchemaRegistry for SqliteSchemaRegistry<'_> {
    fn list_all(&self) -> StoreResult<Vec<String>> {
        let tx = self.conn.unchecked_transaction()?;
        let names = {
            let mut stmt = tx.prepare("SELECT name FROM dictionaries;")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        tx.commit()?;
        Ok(names)
    }

    fn create(&self, name: &str, structure: &DictionaryStructure) -> StoreResult<()> {
        let structure_json = encode_structure(structure)?;

        let tx = self.conn.unchecked_transaction()?;
        insert_dictionary(&tx, name, &structure_json)?;
        tx.commit()?;

        info!("event=dictionary_create module=registry status=ok name={name}");
        Ok(())
    }

    fn copy(&self, from_name: &str, to_name: &str) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let structure_json: Option<String> = tx
            .query_row(
                "SELECT structure FROM dictionaries WHERE name = ?1;",
                [from_name],
                |row| row.get(0),
            )
            .optional()?;
        let structure_json = structure_json.ok_or_else(|| {
            StoreError::NotFound(format!("source dictionary `{from_name}` not found"))
        })?;

        insert_dictionary(&tx, to_name, &structure_json)?;

        // Verbatim payload copy under fresh autoincrement ids; the source
        // rows are not re-validated.
        tx.execute(
            "INSERT INTO dictionary_records (dictionary_name, data)
             SELECT ?1, data FROM dictionary_records WHERE dictionary_name = ?2;",
            params![to_name, from_name],
        )?;

        tx.commit()?;

        info!("event=dictionary_copy module=registry status=ok from={from_name} to={to_name}");
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        // Records go first; a no-op when the dictionary never existed.
        tx.execute(
            "DELETE FROM dictionary_records WHERE dictionary_name = ?1;",
            [name],
        )?;

        let deleted = tx.execute("DELETE FROM dictionaries WHERE name = ?1;", [name])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!(
                "dictionary `{name}` not found"
            )));
        }

        tx.commit()?;

        info!("event=dictionary_delete module=registry status=ok name={name}");
        Ok(())
    }
}

/// Inserts a dictionary row, reclassifying a unique-key violation as
/// `Conflict`. Shared by `create` and `copy` so both detect duplicates
/// the same way.
fn insert_dictionary(tx: &Transaction<'_>, name: &str, structure_json: &str) -> StoreResult<()> {
    let inserted = tx.execute(
        "INSERT INTO dictionaries (name, structure) VALUES (?1, ?2);",
        params![name, structure_json],
    );

    match inserted {
        Ok(_) => Ok(()),
        Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict(format!(
            "dictionary `{name}` already exists"
        ))),
        Err(err) => Err(err.into()),
    }
}

fn encode_structure(structure: &DictionaryStructure) -> StoreResult<String> {
    serde_json::to_string(structure).map_err(|err| {
        StoreError::Storage(DbError::Corrupted {
            table: "dictionaries",
            detail: err.to_string(),
        })
    })
}
