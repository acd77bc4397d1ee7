use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use formwright_core::config::LimitsConfig;
use formwright_core::graph::{self, GraphIssue};
use formwright_core::model::{validate as model_validate, FormSchema};

use crate::{io, output};

#[derive(Debug, Serialize)]
pub struct FieldRow {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub derived: bool,
}

#[derive(Debug, Serialize)]
pub struct InspectOut {
    pub ok: bool,
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub fields: Vec<FieldRow>,
    pub evaluation_order: Vec<String>,
    pub diagnostics: Vec<String>,
}

pub fn run(schema_path: &str) -> Result<()> {
    let schema = io::read_schema(schema_path)?;
    let report = inspect(&schema);

    if output::is_json() {
        output::print(&report)?;
    } else {
        print_human(&report)?;
    }
    Ok(())
}

fn inspect(schema: &FormSchema) -> InspectOut {
    let mut diagnostics = Vec::new();

    if let Err(err) = model_validate::schema_with_limits(schema, &LimitsConfig::default()) {
        diagnostics.push(err.to_string());
    }

    let analysis = graph::analyze(schema);
    for issue in &analysis.issues {
        diagnostics.push(match issue {
            GraphIssue::Cycle { field_ids } => {
                format!("cyclic dependency among derived fields: {}", field_ids.join(", "))
            }
            GraphIssue::DanglingParent {
                field_id,
                missing_id,
            } => format!("field {field_id} references missing parent field {missing_id}"),
        });
    }

    let fields = schema
        .fields
        .iter()
        .map(|f| FieldRow {
            id: f.id.clone(),
            label: f.display_name(),
            field_type: f.field_type.as_str().to_string(),
            required: f.is_required(),
            derived: f.is_derived,
        })
        .collect();

    InspectOut {
        ok: diagnostics.is_empty(),
        id: schema.id.clone(),
        name: schema.name.clone(),
        created_at: schema.created_at.clone(),
        fields,
        evaluation_order: analysis.order,
        diagnostics,
    }
}

fn print_human(report: &InspectOut) -> Result<()> {
    let mut out = output::stdout();
    writeln!(out, "{} ({})", report.name, report.id)?;
    writeln!(out, "created: {}", report.created_at)?;
    writeln!(out, "fields:")?;
    for f in &report.fields {
        let mut flags = Vec::new();
        if f.required {
            flags.push("required");
        }
        if f.derived {
            flags.push("derived");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        writeln!(out, "  {} <{}>{}  ({})", f.label, f.field_type, flags, f.id)?;
    }
    if !report.evaluation_order.is_empty() {
        writeln!(out, "derived evaluation order: {}", report.evaluation_order.join(" -> "))?;
    }
    for d in &report.diagnostics {
        writeln!(out, "diagnostic: {d}")?;
    }
    Ok(())
}
