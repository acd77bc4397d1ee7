use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use formwright_core::model::{ErrorSet, ValueSet};
use formwright_core::validate::{seed_values, Engine};

use crate::{io, output};

#[derive(Debug, Serialize)]
pub struct EvalOut {
    pub ok: bool,
    pub values: ValueSet,
    pub errors: ErrorSet,
}

pub fn run(schema_path: &str, values_path: Option<&str>, seed: bool) -> Result<()> {
    let schema = io::read_schema(schema_path)?;

    let mut values = if seed {
        seed_values(&schema)
    } else {
        ValueSet::new()
    };
    if let Some(path) = values_path {
        for (id, value) in io::read_values(path)? {
            values.insert(id, value);
        }
    }

    let (resolved, errors) = Engine::new().resolve_values(&schema, &values);
    let report = EvalOut {
        ok: errors.is_empty(),
        values: resolved,
        errors,
    };

    if output::is_json() {
        output::print(&report)?;
        return Ok(());
    }

    let mut out = output::stdout();
    for field in &schema.fields {
        let value = report
            .values
            .get(&field.id)
            .map(String::as_str)
            .unwrap_or("");
        let marker = if field.is_derived { " (derived)" } else { "" };
        writeln!(out, "{}{}: {}", field.display_name(), marker, value)?;
    }
    for (id, message) in &report.errors {
        writeln!(out, "error {id}: {message}")?;
    }
    Ok(())
}
