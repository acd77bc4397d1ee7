//! SQLite-backed schema store.
//!
//! One `forms` table, field definitions stored as their JSON document in a
//! text column. Insertion order is the rowid order, which `load_all`
//! returns explicitly.

use std::path::PathBuf;

use rusqlite::{params, Connection};

use formwright_core::model::FormSchema;

use crate::{SchemaStore, StoreError, StoreResult};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS forms (
    seq        INTEGER PRIMARY KEY AUTOINCREMENT,
    id         TEXT NOT NULL UNIQUE,
    name       TEXT NOT NULL,
    created_at TEXT NOT NULL,
    fields     TEXT NOT NULL
)";

pub struct SqliteStore {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    fn conn(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }
}

impl SchemaStore for SqliteStore {
    fn open(&mut self) -> StoreResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.path)?;
        conn.execute(CREATE_TABLE, [])?;
        self.conn = Some(conn);
        Ok(())
    }

    fn close(&mut self) -> StoreResult<()> {
        self.conn = None;
        Ok(())
    }

    fn load_all(&self) -> StoreResult<Vec<FormSchema>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, created_at, fields FROM forms ORDER BY seq")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut schemas = Vec::new();
        for row in rows {
            let (id, name, created_at, fields_json) = row?;
            let fields = serde_json::from_str(&fields_json).map_err(|e| {
                StoreError::Serialization(format!("failed to decode fields for {id}: {e}"))
            })?;
            schemas.push(FormSchema {
                id,
                name,
                created_at,
                fields,
            });
        }
        Ok(schemas)
    }

    fn save(&mut self, schema: &FormSchema) -> StoreResult<()> {
        let conn = self.conn()?;

        let existing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM forms WHERE id = ?1",
            params![schema.id],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Err(StoreError::Rejected(format!(
                "schema id already saved: {}",
                schema.id
            )));
        }

        let fields_json = serde_json::to_string(&schema.fields)
            .map_err(|e| StoreError::Serialization(format!("failed to encode fields: {e}")))?;
        conn.execute(
            "INSERT INTO forms (id, name, created_at, fields) VALUES (?1, ?2, ?3, ?4)",
            params![schema.id, schema.name, schema.created_at, fields_json],
        )?;
        Ok(())
    }
}
