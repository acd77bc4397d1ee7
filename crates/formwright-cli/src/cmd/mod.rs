use std::path::PathBuf;

use anyhow::{Context, Result};

use formwright_store::JsonFileStore;
use formwright_store::SchemaStore;

use crate::args::{Cli, Command};

mod doctor;
mod eval;
mod inspect;
mod list;
mod save;
mod validate;

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Validate {
            schema,
            values,
            seed,
        } => validate::run(&schema, values.as_deref(), seed),
        Command::Inspect { schema } => inspect::run(&schema),
        Command::Eval {
            schema,
            values,
            seed,
        } => eval::run(&schema, values.as_deref(), seed),
        Command::List => list::run(&cli.store_root),
        Command::Save { schema } => save::run(&cli.store_root, &schema),
        Command::Doctor => doctor::run(&cli.store_root),
    }
}

/// Path of the store document under the store root.
pub(crate) fn store_document(store_root: &str) -> PathBuf {
    PathBuf::from(store_root).join("forms.json")
}

pub(crate) fn open_store(store_root: &str) -> Result<JsonFileStore> {
    let mut store = JsonFileStore::new(store_document(store_root));
    store
        .open()
        .with_context(|| format!("failed to open store at {store_root}"))?;
    Ok(store)
}
