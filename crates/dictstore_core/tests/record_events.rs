use dictstore_core::db::open_db_in_memory;
use dictstore_core::{
    DictionaryField, DictionaryStructure, FieldType, RawRecordData, RecordService,
    RegistryService, SqliteRecordStore, SqliteSchemaRegistry,
};
use log::{LevelFilter, Metadata, Record};
use serde_json::json;
use std::sync::Mutex;

static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.lock().unwrap().push(record.args().to_string());
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

// This test binary runs in its own process, so installing a global capture
// logger does not interfere with the file-based logging bootstrap.
#[test]
fn mutating_operations_emit_events_and_failed_ones_do_not() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Info);

    let conn = open_db_in_memory().unwrap();
    let registry = RegistryService::new(SqliteSchemaRegistry::new(&conn));
    let records = RecordService::new(SqliteRecordStore::new(&conn));

    let structure = DictionaryStructure::new(vec![
        DictionaryField::new("name", FieldType::String),
        DictionaryField::new("age", FieldType::Number),
    ]);
    registry.create("people", &structure).unwrap();

    let id = records.add("people", &person("John", "25")).unwrap();
    records.update("people", id, &person("Johnny", "26")).unwrap();
    records.delete("people", id).unwrap();

    assert_event(&format!(
        "event=record_add module=records status=ok dictionary=people id={id}"
    ));
    assert_event(&format!(
        "event=record_update module=records status=ok dictionary=people id={id}"
    ));
    assert_event(&format!(
        "event=record_delete module=records status=ok dictionary=people id={id}"
    ));
    assert_event("event=dictionary_create module=registry status=ok name=people");

    // A rejected write must not report success.
    let before = captured_count("event=record_add");
    records
        .add("people", &person("Jane", "not-a-number"))
        .unwrap_err();
    assert_eq!(captured_count("event=record_add"), before);
}

fn person(name: &str, age: &str) -> RawRecordData {
    [
        ("name".to_string(), json!(name)),
        ("age".to_string(), json!(age)),
    ]
    .into_iter()
    .collect()
}

fn assert_event(expected: &str) {
    let events = CAPTURED.lock().unwrap();
    assert!(
        events.iter().any(|event| event == expected),
        "missing event `{expected}`, got {events:?}"
    );
}

fn captured_count(prefix: &str) -> usize {
    CAPTURED
        .lock()
        .unwrap()
        .iter()
        .filter(|event| event.starts_with(prefix))
        .count()
}
