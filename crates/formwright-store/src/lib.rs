//! formwright-store
//!
//! Schema persistence adapters for Formwright. The core engine never touches
//! storage; hosts inject a [`SchemaStore`] implementation:
//!
//! - [`MemoryStore`] — in-memory, for tests and embedding
//! - [`JsonFileStore`] — one JSON array document on disk (`fs` feature,
//!   default)
//! - [`SqliteStore`] — SQLite-backed (`sqlite` feature)
//!
//! Saved schemas are immutable: `save` appends and rejects duplicate ids.
//! `load_all` returns insertion order. A store failure never corrupts
//! in-memory engine state; it surfaces as a [`StoreError`], which converts
//! into the core's persistence error kind.

pub mod memory;

#[cfg(feature = "fs")]
pub mod jsonfile;

#[cfg(feature = "sqlite")]
pub mod sqlite;

use formwright_core::model::FormSchema;
use formwright_core::FormError;
use thiserror::Error;

pub use memory::MemoryStore;

#[cfg(feature = "fs")]
pub use jsonfile::JsonFileStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has not been opened, or was closed.
    #[error("store is not open")]
    Closed,

    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failure: {0}")]
    Serialization(String),

    /// The schema was refused (duplicate id, structural defect).
    #[error("schema rejected: {0}")]
    Rejected(String),

    #[cfg(feature = "sqlite")]
    #[error("sqlite failure: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<StoreError> for FormError {
    fn from(err: StoreError) -> Self {
        FormError::persistence(err.to_string())
    }
}

/// Persistence contract for form schemas.
///
/// Lifecycle is explicit: a store must be opened before use and refuses
/// operations after close. Both calls are idempotent.
pub trait SchemaStore {
    fn open(&mut self) -> StoreResult<()>;

    fn close(&mut self) -> StoreResult<()>;

    /// All saved schemas, in insertion order.
    fn load_all(&self) -> StoreResult<Vec<FormSchema>>;

    /// Append one schema. Duplicate ids are rejected: saved schemas are
    /// immutable snapshots.
    fn save(&mut self, schema: &FormSchema) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_converts_to_persistence() {
        let err: FormError = StoreError::Closed.into();
        assert!(matches!(err, FormError::Persistence(_)));
        assert!(err.to_string().contains("not open"));
    }
}
