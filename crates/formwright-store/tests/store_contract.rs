//! Contract checks shared by every store backend: the engine only ever sees
//! the `SchemaStore` trait, so each backend must behave identically.

use formwright_core::model::{FieldDefinition, FieldType, FormSchema};
use formwright_store::{MemoryStore, SchemaStore, StoreError};

#[cfg(feature = "fs")]
use formwright_store::JsonFileStore;

fn sample(name: &str) -> FormSchema {
    let mut schema = FormSchema::new(name);
    schema.fields.push(FieldDefinition::new(FieldType::Text));
    schema.fields.push(FieldDefinition::new(FieldType::Checkbox));
    schema
}

fn exercise_contract(store: &mut dyn SchemaStore) {
    store.open().unwrap();
    assert!(store.load_all().unwrap().is_empty());

    let first = sample("first");
    let second = sample("second");
    store.save(&first).unwrap();
    store.save(&second).unwrap();

    let all = store.load_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, first.id);
    assert_eq!(all[1].id, second.id);

    assert!(matches!(store.save(&first), Err(StoreError::Rejected(_))));

    store.close().unwrap();
    assert!(matches!(store.load_all(), Err(StoreError::Closed)));
}

#[test]
fn memory_store_honors_contract() {
    let mut store = MemoryStore::new();
    exercise_contract(&mut store);
}

#[cfg(feature = "fs")]
#[test]
fn json_file_store_honors_contract() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("forms.json"));
    exercise_contract(&mut store);
}

#[cfg(feature = "sqlite")]
#[test]
fn sqlite_store_honors_contract() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = formwright_store::SqliteStore::new(dir.path().join("forms.db"));
    exercise_contract(&mut store);
}
