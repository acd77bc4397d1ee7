//! JSON-file schema store.
//!
//! Persists the full schema list as one JSON array document, rewritten on
//! every save. This mirrors the original deployment shape (a single
//! well-known key in a browser key-value store) while keeping the document
//! readable and diffable.

use std::fs;
use std::path::{Path, PathBuf};

use formwright_core::model::FormSchema;

use crate::{SchemaStore, StoreError, StoreResult};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    open: bool,
}

impl JsonFileStore {
    /// A store backed by the document at `path`. Call
    /// [`SchemaStore::open`] before use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            open: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StoreResult<Vec<FormSchema>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| {
            StoreError::Serialization(format!(
                "failed to decode {}: {e}",
                self.path.display()
            ))
        })
    }

    fn write_document(&self, schemas: &[FormSchema]) -> StoreResult<()> {
        let text = serde_json::to_string_pretty(schemas)
            .map_err(|e| StoreError::Serialization(format!("failed to encode store: {e}")))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl SchemaStore for JsonFileStore {
    /// Ensures the parent directory exists and the document (if present)
    /// decodes, so corruption is reported here rather than on first save.
    fn open(&mut self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.read_document()?;
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> StoreResult<()> {
        self.open = false;
        Ok(())
    }

    fn load_all(&self) -> StoreResult<Vec<FormSchema>> {
        if !self.open {
            return Err(StoreError::Closed);
        }
        self.read_document()
    }

    fn save(&mut self, schema: &FormSchema) -> StoreResult<()> {
        if !self.open {
            return Err(StoreError::Closed);
        }
        let mut schemas = self.read_document()?;
        if schemas.iter().any(|s| s.id == schema.id) {
            return Err(StoreError::Rejected(format!(
                "schema id already saved: {}",
                schema.id
            )));
        }
        schemas.push(schema.clone());
        self.write_document(&schemas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_core::model::{FieldDefinition, FieldType};

    fn schema_with_field(name: &str) -> FormSchema {
        let mut schema = FormSchema::new(name);
        schema.fields.push(FieldDefinition::new(FieldType::Text));
        schema
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forms.json");

        let saved = schema_with_field("persisted");
        {
            let mut store = JsonFileStore::new(&path);
            store.open().unwrap();
            store.save(&saved).unwrap();
            store.close().unwrap();
        }

        let mut store = JsonFileStore::new(&path);
        store.open().unwrap();
        let all = store.load_all().unwrap();
        assert_eq!(all, vec![saved]);
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("forms.json"));
        store.open().unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn corrupt_document_is_reported_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forms.json");
        fs::write(&path, "not json").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert!(matches!(
            store.open(),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn duplicate_id_is_rejected_across_saves() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("forms.json"));
        store.open().unwrap();

        let schema = schema_with_field("once");
        store.save(&schema).unwrap();
        assert!(matches!(
            store.save(&schema),
            Err(StoreError::Rejected(_))
        ));
        assert_eq!(store.load_all().unwrap().len(), 1);
    }
}
