use dictstore_core::db::open_db_in_memory;
use dictstore_core::{
    DictionaryField, DictionaryStructure, FieldType, RawRecordData, RecordService,
    RegistryService, SqliteRecordStore, SqliteSchemaRegistry, StoreError,
};
use rusqlite::Connection;
use std::collections::HashSet;

#[test]
fn create_then_list_contains_name_once() {
    let conn = open_db_in_memory().unwrap();
    let registry = RegistryService::new(SqliteSchemaRegistry::new(&conn));

    registry.create("products", &sample_structure()).unwrap();

    let names = registry.list_all().unwrap();
    assert_eq!(
        names.iter().filter(|name| *name == "products").count(),
        1,
        "expected exactly one `products` entry, got {names:?}"
    );
}

#[test]
fn create_duplicate_name_fails_conflict_and_keeps_first_structure() {
    let conn = open_db_in_memory().unwrap();
    let registry = RegistryService::new(SqliteSchemaRegistry::new(&conn));

    let first = sample_structure();
    registry.create("products", &first).unwrap();

    let second = DictionaryStructure::new(vec![DictionaryField::new("other", FieldType::Boolean)]);
    let err = registry.create("products", &second).unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "got {err}");

    assert_eq!(persisted_structure(&conn, "products"), first);
}

#[test]
fn delete_removes_dictionary_and_all_its_records() {
    let conn = open_db_in_memory().unwrap();
    let registry = RegistryService::new(SqliteSchemaRegistry::new(&conn));
    let records = RecordService::new(SqliteRecordStore::new(&conn));

    registry.create("people", &sample_structure()).unwrap();
    records.add("people", &raw_person("John", "25")).unwrap();
    records.add("people", &raw_person("Jane", "30")).unwrap();

    registry.delete("people").unwrap();

    assert!(!registry.list_all().unwrap().contains(&"people".to_string()));
    assert!(matches!(
        records.list("people").unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert_eq!(record_count(&conn, "people"), 0);
}

#[test]
fn delete_nonexistent_dictionary_fails_not_found_without_side_effects() {
    let conn = open_db_in_memory().unwrap();
    let registry = RegistryService::new(SqliteSchemaRegistry::new(&conn));
    let records = RecordService::new(SqliteRecordStore::new(&conn));

    registry.create("keep", &sample_structure()).unwrap();
    records.add("keep", &raw_person("John", "25")).unwrap();

    let err = registry.delete("missing").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    assert_eq!(registry.list_all().unwrap(), vec!["keep".to_string()]);
    assert_eq!(records.list("keep").unwrap().len(), 1);
}

#[test]
fn copy_duplicates_structure_and_records_with_fresh_ids() {
    let conn = open_db_in_memory().unwrap();
    let registry = RegistryService::new(SqliteSchemaRegistry::new(&conn));
    let records = RecordService::new(SqliteRecordStore::new(&conn));

    registry.create("source", &sample_structure()).unwrap();
    records.add("source", &raw_person("John", "25")).unwrap();
    records.add("source", &raw_person("Jane", "30")).unwrap();

    registry.copy("source", "target").unwrap();

    assert_eq!(persisted_structure(&conn, "target"), sample_structure());

    let source_records = records.list("source").unwrap();
    let target_records = records.list("target").unwrap();
    assert_eq!(source_records.len(), 2);
    assert_eq!(target_records.len(), 2);
    for (source, target) in source_records.iter().zip(&target_records) {
        assert_eq!(source.data, target.data);
    }

    let source_ids: HashSet<_> = source_records.iter().map(|record| record.id).collect();
    let target_ids: HashSet<_> = target_records.iter().map(|record| record.id).collect();
    assert!(
        source_ids.is_disjoint(&target_ids),
        "copied records must receive fresh ids"
    );
}

#[test]
fn copy_empty_dictionary_creates_empty_target() {
    let conn = open_db_in_memory().unwrap();
    let registry = RegistryService::new(SqliteSchemaRegistry::new(&conn));
    let records = RecordService::new(SqliteRecordStore::new(&conn));

    registry.create("source", &sample_structure()).unwrap();
    registry.copy("source", "target").unwrap();

    let mut names = registry.list_all().unwrap();
    names.sort();
    assert_eq!(names, vec!["source".to_string(), "target".to_string()]);
    assert!(records.list("target").unwrap().is_empty());
}

#[test]
fn copy_missing_source_fails_not_found() {
    let conn = open_db_in_memory().unwrap();
    let registry = RegistryService::new(SqliteSchemaRegistry::new(&conn));

    let err = registry.copy("missing", "target").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert!(registry.list_all().unwrap().is_empty());
}

#[test]
fn copy_to_existing_target_fails_conflict_and_leaves_target_untouched() {
    let conn = open_db_in_memory().unwrap();
    let registry = RegistryService::new(SqliteSchemaRegistry::new(&conn));
    let records = RecordService::new(SqliteRecordStore::new(&conn));

    registry.create("source", &sample_structure()).unwrap();
    records.add("source", &raw_person("John", "25")).unwrap();

    registry.create("target", &sample_structure()).unwrap();
    records.add("target", &raw_person("Jane", "30")).unwrap();

    let err = registry.copy("source", "target").unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "got {err}");

    let target_records = records.list("target").unwrap();
    assert_eq!(target_records.len(), 1);
    assert_eq!(target_records[0].data["name"], "Jane");
}

#[test]
fn blank_and_overlong_names_fail_invalid_argument() {
    let conn = open_db_in_memory().unwrap();
    let registry = RegistryService::new(SqliteSchemaRegistry::new(&conn));

    let err = registry.create("  ", &sample_structure()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));

    let long_name = "x".repeat(51);
    let err = registry.create(&long_name, &sample_structure()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));

    let err = registry.copy("source", "").unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));

    assert!(registry.list_all().unwrap().is_empty());
}

#[test]
fn malformed_structures_fail_invalid_argument() {
    let conn = open_db_in_memory().unwrap();
    let registry = RegistryService::new(SqliteSchemaRegistry::new(&conn));

    let empty = DictionaryStructure::new(vec![]);
    assert!(matches!(
        registry.create("dict", &empty).unwrap_err(),
        StoreError::InvalidArgument(_)
    ));

    let duplicated = DictionaryStructure::new(vec![
        DictionaryField::new("name", FieldType::String),
        DictionaryField::new("name", FieldType::Number),
    ]);
    assert!(matches!(
        registry.create("dict", &duplicated).unwrap_err(),
        StoreError::InvalidArgument(_)
    ));

    assert!(registry.list_all().unwrap().is_empty());
}

fn sample_structure() -> DictionaryStructure {
    DictionaryStructure::new(vec![
        DictionaryField::new("name", FieldType::String),
        DictionaryField::new("age", FieldType::Number),
    ])
}

fn raw_person(name: &str, age: &str) -> RawRecordData {
    [
        (
            "name".to_string(),
            serde_json::Value::String(name.to_string()),
        ),
        (
            "age".to_string(),
            serde_json::Value::String(age.to_string()),
        ),
    ]
    .into_iter()
    .collect()
}

fn persisted_structure(conn: &Connection, name: &str) -> DictionaryStructure {
    let blob: String = conn
        .query_row(
            "SELECT structure FROM dictionaries WHERE name = ?1;",
            [name],
            |row| row.get(0),
        )
        .unwrap();
    serde_json::from_str(&blob).unwrap()
}

fn record_count(conn: &Connection, dictionary_name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM dictionary_records WHERE dictionary_name = ?1;",
        [dictionary_name],
        |row| row.get(0),
    )
    .unwrap()
}
