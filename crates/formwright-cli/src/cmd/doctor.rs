use anyhow::Result;
use serde::Serialize;

use formwright_store::SchemaStore;

use crate::{cmd, output};

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub checks: Vec<Check>,
}

pub fn run(store_root: &str) -> Result<()> {
    let mut checks = Vec::new();

    // Store root must be creatable and writable.
    let root_ok = std::fs::create_dir_all(store_root).is_ok();
    checks.push(Check {
        name: "store-root".to_string(),
        ok: root_ok,
        detail: format!("directory {store_root}"),
    });

    // The store document, if present, must decode.
    let (doc_ok, doc_detail) = match cmd::open_store(store_root) {
        Ok(store) => match store.load_all() {
            Ok(schemas) => (true, format!("{} schema(s) saved", schemas.len())),
            Err(e) => (false, e.to_string()),
        },
        Err(e) => (false, e.to_string()),
    };
    checks.push(Check {
        name: "store-document".to_string(),
        ok: doc_ok,
        detail: doc_detail,
    });

    let engine = formwright_core::validate::Engine::new();
    checks.push(Check {
        name: "engine".to_string(),
        ok: true,
        detail: format!("formula interpreter: {}", engine.interpreter_name()),
    });

    let ok = checks.iter().all(|c| c.ok);
    output::print(&DoctorOut { ok, checks })?;
    Ok(())
}
