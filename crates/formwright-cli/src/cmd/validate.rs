use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use termcolor::{Color, ColorSpec, WriteColor};

use formwright_core::model::{ErrorSet, ValueSet};
use formwright_core::validate::{seed_values, Engine};

use crate::{io, output};

#[derive(Debug, Serialize)]
pub struct ValidateOut {
    pub ok: bool,
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

    let errors = Engine::new().validate(&schema, &values);
    let ok = errors.is_empty();

    if output::is_json() {
        output::print(&ValidateOut {
            ok,
            errors: errors.clone(),
        })?;
    } else {
        print_human(&schema.name, &errors)?;
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn print_human(name: &str, errors: &ErrorSet) -> Result<()> {
    let mut out = output::stdout();
    if errors.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "{name}: all fields valid")?;
        out.reset()?;
        return Ok(());
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    writeln!(out, "{name}: {} field error(s)", errors.len())?;
    out.reset()?;
    for (id, message) in errors {
        writeln!(out, "  {id}: {message}")?;
    }
    Ok(())
}
