use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use formwright_store::SchemaStore;

use crate::{cmd, output};

#[derive(Debug, Serialize)]
pub struct ListRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub field_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ListOut {
    pub schemas: Vec<ListRow>,
}

pub fn run(store_root: &str) -> Result<()> {
    let store = cmd::open_store(store_root)?;
    let schemas = store.load_all().map_err(formwright_core::FormError::from)?;

    let rows: Vec<ListRow> = schemas
        .iter()
        .map(|s| ListRow {
            id: s.id.clone(),
            name: s.name.clone(),
            created_at: s.created_at.clone(),
            field_count: s.fields.len(),
        })
        .collect();

    if output::is_json() {
        output::print(&ListOut { schemas: rows })?;
        return Ok(());
    }

    let mut out = output::stdout();
    if rows.is_empty() {
        writeln!(out, "no saved forms")?;
        return Ok(());
    }
    for row in &rows {
        writeln!(
            out,
            "{}  {} field(s)  created {}  ({})",
            row.name, row.field_count, row.created_at, row.id
        )?;
    }
    Ok(())
}
