//! Formwright data models.
//!
//! This module defines the strongly-typed representation of a form schema:
//! field definitions, their per-type validation rules, and the value/error
//! maps a validation pass operates on.
//!
//! Design goals:
//! - **Round-trip fidelity:** the serialized shape matches the persisted
//!   document format exactly (camelCase keys, absent optionals omitted).
//! - **Deterministic iteration:** value and error maps are `BTreeMap`s.
//! - **Minimal policy:** models are mostly "dumb" data. Structural checks
//!   live in [`validate`]; mutation goes through [`edit`]; rule evaluation
//!   lives in `crate::rules`.

pub mod edit;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::{FormError, FormResult};

/// Opaque field identifier, unique within a schema.
pub type FieldId = String;

/// Current values for one in-progress form session, keyed by field id.
///
/// All values are strings; checkbox state is encoded as `"true"` / `"false"`.
pub type ValueSet = BTreeMap<FieldId, String>;

/// Per-field error messages. Absence of a key means no error. At most one
/// message is retained per field.
pub type ErrorSet = BTreeMap<FieldId, String>;

/// Checkbox values are a two-valued string domain.
pub const CHECKBOX_TRUE: &str = "true";
pub const CHECKBOX_FALSE: &str = "false";

/// The supported field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
        }
    }

    /// All field types, in builder palette order.
    pub fn all() -> [FieldType; 7] {
        [
            Self::Text,
            Self::Number,
            Self::Textarea,
            Self::Select,
            Self::Radio,
            Self::Checkbox,
            Self::Date,
        ]
    }

    /// Types that carry an options list.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }
}

/// The persisted validation-rule shape: every key optional, keys meaningful
/// only for a subset of field types. Inapplicable keys survive round-trips
/// untouched; evaluation goes through [`ValidationRules::typed`], which
/// projects out exactly the keys that apply to the field's type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
}

impl ValidationRules {
    /// True when no rule key is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Project the rules applicable to `field_type`. Keys outside the
    /// projection are unrepresentable in the result, so the evaluator can
    /// never consult an inapplicable rule.
    pub fn typed(&self, field_type: FieldType) -> TypedRules {
        match field_type {
            FieldType::Text => TypedRules::Text {
                min_length: self.min_length,
                max_length: self.max_length,
                email: self.email.unwrap_or(false),
                password: self.password.unwrap_or(false),
            },
            FieldType::Textarea => TypedRules::Textarea {
                min_length: self.min_length,
                max_length: self.max_length,
            },
            FieldType::Number => TypedRules::Number {
                min: self.min_number,
                max: self.max_number,
            },
            FieldType::Date => TypedRules::Date {
                min: self.min_date.clone(),
                max: self.max_date.clone(),
            },
            FieldType::Select | FieldType::Radio | FieldType::Checkbox => TypedRules::Unconstrained,
        }
    }
}

/// Validation rules narrowed to one field type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedRules {
    Text {
        min_length: Option<u32>,
        max_length: Option<u32>,
        email: bool,
        password: bool,
    },
    Textarea {
        min_length: Option<u32>,
        max_length: Option<u32>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Date {
        min: Option<String>,
        max: Option<String>,
    },
    Unconstrained,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Unique within the schema, stable for the schema's lifetime.
    pub id: FieldId,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Display name. May be empty; surfaces listing fields must fall back
    /// to [`FieldDefinition::display_name`].
    #[serde(default)]
    pub label: String,

    /// Meaningful only for non-derived fields; see
    /// [`FieldDefinition::is_required`].
    #[serde(default)]
    pub required: bool,

    /// Seed value used when no input exists yet.
    #[serde(default)]
    pub default_value: String,

    /// Ordered option list for select/radio (and, for compatibility with the
    /// persisted shape, checkbox).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validations: Option<ValidationRules>,

    /// When true, the field's value is computed from its parents and
    /// `required`/`validations` are not enforced.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_derived: bool,

    /// Parent field ids this field is computed from. Non-empty only for
    /// derived fields; never contains the field's own id.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_field_ids: Vec<FieldId>,

    /// Free-text description of how parent values combine. Interpreted by a
    /// `crate::formula::FormulaInterpreter`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub formula: String,
}

impl FieldDefinition {
    /// Create a field with the builder defaults for `field_type`: empty
    /// label, not required, a `"false"` default for checkbox, and a seed
    /// option list for option-carrying types.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            field_type,
            label: String::new(),
            required: false,
            default_value: if field_type == FieldType::Checkbox {
                CHECKBOX_FALSE.to_string()
            } else {
                String::new()
            },
            options: if field_type.has_options() {
                Some(vec!["Option 1".to_string(), "Option 2".to_string()])
            } else {
                None
            },
            validations: Some(ValidationRules::default()),
            is_derived: false,
            parent_field_ids: Vec::new(),
            formula: String::new(),
        }
    }

    /// Whether `required` is in force. Derived fields are always exempt.
    pub fn is_required(&self) -> bool {
        self.required && !self.is_derived
    }

    /// Label fallback for field listings (dependency selection, inspection).
    pub fn display_name(&self) -> String {
        if self.label.is_empty() {
            format!("(No label) - {}", self.field_type.as_str())
        } else {
            self.label.clone()
        }
    }

    /// Label fallback used inside error messages.
    pub fn error_label(&self) -> &str {
        if self.label.is_empty() {
            "Field"
        } else {
            &self.label
        }
    }
}

/// A named, ordered sequence of field definitions.
///
/// Order is significant: it is the rendering order and the tie-break order
/// for any processing that must be deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub id: String,
    pub name: String,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FormSchema {
    /// Create an empty schema stamped with the current UTC time.
    pub fn new(name: impl Into<String>) -> Self {
        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::new());
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at,
            fields: Vec::new(),
        }
    }

    /// Look up a field by id.
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Position of a field in schema order.
    pub fn field_index(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Fields flagged as derived, in schema order.
    pub fn derived_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.is_derived)
    }
}

/// Structural invariant checks for model consumers.
///
/// These are intentionally minimal: they cover the invariants the model
/// itself owns (id uniqueness, parent reference shape). Cycle detection is
/// performed per pass by `crate::graph`, and rule-key applicability is
/// handled by [`ValidationRules::typed`] rather than rejected here.
pub mod validate {
    use super::*;
    use crate::config::LimitsConfig;
    use crate::errors::{FormError, FormResult};

    /// Validate basic structural invariants of a schema.
    ///
    /// Checks:
    /// - field ids are non-empty and unique
    /// - derived fields reference only ids present in the schema
    /// - no field lists itself as a parent
    /// - only derived fields declare parents
    pub fn schema_basic(schema: &FormSchema) -> FormResult<()> {
        use std::collections::BTreeSet;

        let mut ids = BTreeSet::new();
        for f in &schema.fields {
            if f.id.trim().is_empty() {
                return Err(FormError::invalid_argument("field id is empty"));
            }
            if !ids.insert(f.id.as_str()) {
                return Err(FormError::invalid_argument(format!(
                    "duplicate field id: {}",
                    f.id
                )));
            }
        }

        for f in &schema.fields {
            if !f.is_derived && !f.parent_field_ids.is_empty() {
                return Err(FormError::invalid_argument(format!(
                    "field {} declares parents but is not derived",
                    f.id
                )));
            }
            for pid in &f.parent_field_ids {
                if pid == &f.id {
                    return Err(FormError::invalid_argument(format!(
                        "field {} lists itself as a parent",
                        f.id
                    )));
                }
                if !ids.contains(pid.as_str()) {
                    return Err(FormError::dangling_parent(&f.id, pid));
                }
            }
        }

        Ok(())
    }

    /// [`schema_basic`] plus explicit size limits.
    pub fn schema_with_limits(schema: &FormSchema, limits: &LimitsConfig) -> FormResult<()> {
        schema_basic(schema)?;

        if schema.fields.len() > limits.max_fields {
            return Err(FormError::invalid_argument(format!(
                "schema has {} fields (limit {})",
                schema.fields.len(),
                limits.max_fields
            )));
        }

        for f in &schema.fields {
            if f.label.len() > limits.max_label_bytes {
                return Err(FormError::invalid_argument(format!(
                    "field {} label exceeds {} bytes",
                    f.id, limits.max_label_bytes
                )));
            }
            if f.formula.len() > limits.max_formula_bytes {
                return Err(FormError::invalid_argument(format!(
                    "field {} formula exceeds {} bytes",
                    f.id, limits.max_formula_bytes
                )));
            }
            if f.parent_field_ids.len() > limits.max_parents {
                return Err(FormError::invalid_argument(format!(
                    "field {} has {} parents (limit {})",
                    f.id,
                    f.parent_field_ids.len(),
                    limits.max_parents
                )));
            }
            if let Some(options) = &f.options {
                if options.len() > limits.max_options {
                    return Err(FormError::invalid_argument(format!(
                        "field {} has {} options (limit {})",
                        f.id,
                        options.len(),
                        limits.max_options
                    )));
                }
            }
        }

        Ok(())
    }
}
