use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use formwright_core::config::LimitsConfig;
use formwright_core::model::validate as model_validate;
use formwright_store::SchemaStore;

use crate::{cmd, io, output};

#[derive(Debug, Serialize)]
pub struct SaveOut {
    pub ok: bool,
    pub id: String,
    pub name: String,
    pub field_count: usize,
}

pub fn run(store_root: &str, schema_path: &str) -> Result<()> {
    let schema = io::read_schema(schema_path)?;

    model_validate::schema_with_limits(&schema, &LimitsConfig::default())
        .context("schema failed structural validation")?;

    let mut store = cmd::open_store(store_root)?;
    store
        .save(&schema)
        .map_err(formwright_core::FormError::from)?;

    let report = SaveOut {
        ok: true,
        id: schema.id.clone(),
        name: schema.name.clone(),
        field_count: schema.fields.len(),
    };

    if output::is_json() {
        output::print(&report)?;
        return Ok(());
    }

    let mut out = output::stdout();
    writeln!(
        out,
        "saved {} ({} field(s)) as {}",
        report.name, report.field_count, report.id
    )?;
    Ok(())
}
