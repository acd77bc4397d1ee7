//! formwright-core
//!
//! Core engine for Formwright:
//! - Form schema model: field definitions, per-type validation rules,
//!   value/error sets
//! - Schema editing as an explicit command/reducer
//! - Rule-based validation (fixed-order fold, last failing check wins)
//! - Dependency-aware derived-field evaluation with deterministic ordering
//! - A pluggable formula interpreter with a built-in substitution +
//!   arithmetic implementation
//!
//! The crate is pure and synchronous: no I/O, no environment reads, no
//! shared mutable state. Persistence lives in `formwright-store`.

pub mod config;
pub mod errors;
pub mod formula;
pub mod graph;
pub mod model;
pub mod rules;
pub mod validate;

pub use crate::errors::{FormError, FormResult};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::LimitsConfig;
    pub use crate::formula::{FormulaContext, FormulaInterpreter, SubstitutionInterpreter};
    pub use crate::graph::{analyze, evaluation_order, DependencyAnalysis, GraphIssue};
    pub use crate::model::edit::{apply, FieldEdit, RuleEdit};
    pub use crate::model::{
        ErrorSet, FieldDefinition, FieldId, FieldType, FormSchema, ValidationRules, ValueSet,
    };
    pub use crate::validate::{seed_values, validate, Engine};
    pub use crate::{FormError, FormResult};
}
