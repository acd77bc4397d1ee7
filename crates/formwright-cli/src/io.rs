//! File input helpers: schema and value documents arrive as local JSON.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use formwright_core::model::{FormSchema, ValueSet};

pub fn read_schema<P: AsRef<Path>>(path: P) -> Result<FormSchema> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).map_err(|e| anyhow!("invalid schema document: {e}"))
}

/// Values are a flat JSON object of field id to string value. Checkbox state
/// arrives as `"true"` / `"false"`, like every other value.
pub fn read_values<P: AsRef<Path>>(path: P) -> Result<ValueSet> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).map_err(|e| anyhow!("invalid values document: {e}"))
}
