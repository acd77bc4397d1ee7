//! Error types for formwright-core.
//!
//! One crate-level error enum plus a result alias. Per-field validation
//! failures are never represented here: they are data, returned in an
//! `ErrorSet` by the form validator. The variants below cover schema
//! authoring defects, formula resolution failures, and boundary failures.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type FormResult<T> = Result<T, FormError>;

/// Errors produced by the engine.
#[derive(Debug, Clone, Error)]
pub enum FormError {
    /// A caller-supplied argument is malformed or inconsistent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Encoding or decoding a schema or value set failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An internal invariant was violated.
    #[error("invariant violation: {0}")]
    Invariant(String),

    /// The parent relation over derived fields contains a cycle.
    ///
    /// Names every derived field that could not be ordered.
    #[error("cyclic dependency among derived fields: {}", .field_ids.join(", "))]
    CyclicDependency { field_ids: Vec<String> },

    /// A derived field declares a parent id that does not exist in the schema.
    #[error("field {field_id} references missing parent field {missing_id}")]
    DanglingParentReference { field_id: String, missing_id: String },

    /// A formula contains an explicit reference that matches none of the
    /// field's declared parents.
    #[error("field {field_id} formula references unknown parent: {reference}")]
    UnresolvedFormulaReference { field_id: String, reference: String },

    /// The schema store boundary failed. In-memory state is unaffected.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl FormError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    pub fn cyclic_dependency(field_ids: Vec<String>) -> Self {
        Self::CyclicDependency { field_ids }
    }

    pub fn dangling_parent(field_id: impl Into<String>, missing_id: impl Into<String>) -> Self {
        Self::DanglingParentReference {
            field_id: field_id.into(),
            missing_id: missing_id.into(),
        }
    }

    pub fn unresolved_reference(field_id: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::UnresolvedFormulaReference {
            field_id: field_id.into(),
            reference: reference.into(),
        }
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_names_all_fields() {
        let err = FormError::cyclic_dependency(vec!["x".to_string(), "y".to_string()]);
        let s = err.to_string();
        assert!(s.contains('x'));
        assert!(s.contains('y'));
    }

    #[test]
    fn dangling_message_names_both_ids() {
        let err = FormError::dangling_parent("child", "ghost");
        let s = err.to_string();
        assert!(s.contains("child"));
        assert!(s.contains("ghost"));
    }
}
