//! In-memory schema store.
//!
//! The standard test double for the [`SchemaStore`] contract, also usable
//! by hosts that keep schemas for the lifetime of the process only.

use parking_lot::Mutex;

use formwright_core::model::FormSchema;

use crate::{SchemaStore, StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    open: bool,
    schemas: Mutex<Vec<FormSchema>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved schemas.
    pub fn len(&self) -> usize {
        self.schemas.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.lock().is_empty()
    }
}

impl SchemaStore for MemoryStore {
    fn open(&mut self) -> StoreResult<()> {
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
        Ok(self.schemas.lock().clone())
    }

    fn save(&mut self, schema: &FormSchema) -> StoreResult<()> {
        if !self.open {
            return Err(StoreError::Closed);
        }
        let mut schemas = self.schemas.lock();
        if schemas.iter().any(|s| s.id == schema.id) {
            return Err(StoreError::Rejected(format!(
                "schema id already saved: {}",
                schema.id
            )));
        }
        schemas.push(schema.clone());
        Ok(())
    }
}
