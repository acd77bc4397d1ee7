//! Configuration structures for formwright-core.
//!
//! The core crate does not read environment variables. All configuration is
//! provided explicitly by the caller so that identical inputs always produce
//! identical results.

use crate::errors::{FormError, FormResult};

/// Size limits applied to schemas at the editing/persistence boundary.
///
/// The engine itself never allocates proportionally to anything but the
/// schema it is handed; these limits exist so hosts can bound what they
/// accept before a schema enters the engine.
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_fields: usize,
    pub max_options: usize,
    pub max_label_bytes: usize,
    pub max_formula_bytes: usize,
    pub max_parents: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_fields: 256,
            max_options: 64,
            max_label_bytes: 1024,
            max_formula_bytes: 4096,
            max_parents: 32,
        }
    }
}

/// Validate a limits object.
pub fn validate_limits(limits: &LimitsConfig) -> FormResult<()> {
    if limits.max_fields == 0 {
        return Err(FormError::invalid_argument(
            "max_fields must be greater than zero",
        ));
    }
    if limits.max_parents == 0 {
        return Err(FormError::invalid_argument(
            "max_parents must be greater than zero",
        ));
    }
    if limits.max_formula_bytes == 0 {
        return Err(FormError::invalid_argument(
            "max_formula_bytes must be greater than zero",
        ));
    }
    Ok(())
}
