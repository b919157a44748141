//! Record store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own records scoped to a dictionary: list, get, add, update, delete.
//! - Canonicalize raw JSON payloads and validate them against the
//!   dictionary's structure before any write.
//!
//! # Invariants
//! - Every write path validates against the owning dictionary's structure
//!   inside the same transaction that performs the write.
//! - `update` matches by `(dictionary_name, id)`; the fallback insert uses
//!   the caller-supplied id and surfaces an id taken by another dictionary
//!   as `Conflict`.

use crate::db::DbError;
use crate::model::dictionary::{
    DictionaryStructure, RawRecordData, RecordData, RecordId, StoredRecord,
};
use crate::repo::{is_unique_violation, StoreError, StoreResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

/// Store interface for dictionary records.
pub trait RecordStore {
    fn list(&self, dictionary_name: &str) -> StoreResult<Vec<StoredRecord>>;
    fn get(&self, dictionary_name: &str, id: RecordId) -> StoreResult<StoredRecord>;
    fn add(&self, dictionary_name: &str, raw: &RawRecordData) -> StoreResult<RecordId>;
    fn update(&self, dictionary_name: &str, id: RecordId, raw: &RawRecordData) -> StoreResult<()>;
    fn delete(&self, dictionary_name: &str, id: RecordId) -> StoreResult<()>;
}

/// SQLite-backed record store.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn list(&self, dictionary_name: &str) -> StoreResult<Vec<StoredRecord>> {
        let tx = self.conn.unchecked_transaction()?;
        require_dictionary(&tx, dictionary_name)?;

        let records = {
            let mut stmt = tx.prepare(
                "SELECT id, data FROM dictionary_records
                 WHERE dictionary_name = ?1
                 ORDER BY id;",
            )?;
            let rows = stmt.query_map([dictionary_name], |row| {
                Ok((row.get::<_, RecordId>(0)?, row.get::<_, String>(1)?))
            })?;

            let mut records = Vec::new();
            for row in rows {
                let (id, blob) = row?;
                records.push(StoredRecord {
                    id,
                    data: decode_record_data(&blob)?,
                });
            }
            records
        };

        tx.commit()?;
        Ok(records)
    }

    fn get(&self, dictionary_name: &str, id: RecordId) -> StoreResult<StoredRecord> {
        let tx = self.conn.unchecked_transaction()?;
        require_dictionary(&tx, dictionary_name)?;

        let row: Option<String> = tx
            .query_row(
                "SELECT data FROM dictionary_records
                 WHERE dictionary_name = ?1 AND id = ?2;",
                params![dictionary_name, id],
                |row| row.get(0),
            )
            .optional()?;
        let blob = row.ok_or_else(|| {
            StoreError::NotFound(format!(
                "record {id} in dictionary `{dictionary_name}` not found"
            ))
        })?;

        let record = StoredRecord {
            id,
            data: decode_record_data(&blob)?,
        };
        tx.commit()?;
        Ok(record)
    }

    fn add(&self, dictionary_name: &str, raw: &RawRecordData) -> StoreResult<RecordId> {
        let tx = self.conn.unchecked_transaction()?;

        let structure = load_structure(&tx, dictionary_name)?;
        let data = canonicalize(raw);
        structure.validate_data(&data)?;

        tx.execute(
            "INSERT INTO dictionary_records (dictionary_name, data) VALUES (?1, ?2);",
            params![dictionary_name, encode_record_data(&data)?],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;

        info!("event=record_add module=records status=ok dictionary={dictionary_name} id={id}");
        Ok(id)
    }

    fn update(&self, dictionary_name: &str, id: RecordId, raw: &RawRecordData) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let structure = load_structure(&tx, dictionary_name)?;
        let data = canonicalize(raw);
        structure.validate_data(&data)?;
        let blob = encode_record_data(&data)?;

        let changed = tx.execute(
            "UPDATE dictionary_records SET data = ?1
             WHERE id = ?2 AND dictionary_name = ?3;",
            params![blob, id, dictionary_name],
        )?;

        if changed == 0 {
            // Upsert fallback: keep the caller-supplied id as the primary
            // key. An id already owned by another dictionary trips the
            // primary-key constraint.
            let inserted = tx.execute(
                "INSERT INTO dictionary_records (id, dictionary_name, data)
                 VALUES (?1, ?2, ?3);",
                params![id, dictionary_name, blob],
            );
            match inserted {
                Ok(_) => {}
                Err(err) if is_unique_violation(&err) => {
                    return Err(StoreError::Conflict(format!(
                        "record id {id} is already in use by another dictionary"
                    )));
                }
                Err(err) => return Err(err.into()),
            }
        }

        tx.commit()?;

        info!(
            "event=record_update module=records status=ok dictionary={dictionary_name} id={id}"
        );
        Ok(())
    }

    fn delete(&self, dictionary_name: &str, id: RecordId) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        require_dictionary(&tx, dictionary_name)?;

        let deleted = tx.execute(
            "DELETE FROM dictionary_records
             WHERE id = ?1 AND dictionary_name = ?2;",
            params![id, dictionary_name],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!(
                "record {id} in dictionary `{dictionary_name}` not found"
            )));
        }

        tx.commit()?;

        info!(
            "event=record_delete module=records status=ok dictionary={dictionary_name} id={id}"
        );
        Ok(())
    }
}

/// Fails with `NotFound` when the dictionary row is absent.
fn require_dictionary(tx: &Transaction<'_>, name: &str) -> StoreResult<()> {
    let exists: Option<i64> = tx
        .query_row(
            "SELECT 1 FROM dictionaries WHERE name = ?1;",
            [name],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(StoreError::NotFound(format!(
            "dictionary `{name}` not found"
        )));
    }
    Ok(())
}

/// Loads and decodes a dictionary's structure, failing with `NotFound`
/// when the dictionary row is absent.
fn load_structure(tx: &Transaction<'_>, name: &str) -> StoreResult<DictionaryStructure> {
    let blob: Option<String> = tx
        .query_row(
            "SELECT structure FROM dictionaries WHERE name = ?1;",
            [name],
            |row| row.get(0),
        )
        .optional()?;
    let blob = blob.ok_or_else(|| StoreError::NotFound(format!("dictionary `{name}` not found")))?;

    serde_json::from_str(&blob).map_err(|err| {
        StoreError::Storage(DbError::Corrupted {
            table: "dictionaries",
            detail: err.to_string(),
        })
    })
}

/// Canonicalizes raw JSON values into the textual encoding the validator
/// checks: strings keep their content unquoted, other scalars keep their
/// literal text, and non-scalars fall back to compact JSON.
fn canonicalize(raw: &RawRecordData) -> RecordData {
    raw.iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}

fn encode_record_data(data: &RecordData) -> StoreResult<String> {
    serde_json::to_string(data).map_err(|err| {
        StoreError::Storage(DbError::Corrupted {
            table: "dictionary_records",
            detail: err.to_string(),
        })
    })
}

fn decode_record_data(blob: &str) -> StoreResult<RecordData> {
    serde_json::from_str(blob).map_err(|err| {
        StoreError::Storage(DbError::Corrupted {
            table: "dictionary_records",
            detail: err.to_string(),
        })
    })
}
