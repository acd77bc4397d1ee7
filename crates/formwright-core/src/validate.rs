//! Validation orchestration.
//!
//! [`Engine::validate`] turns a schema plus a value set into per-field
//! errors. It never aborts on a single field's failure: dependency defects
//! and formula failures become ErrorSet entries for the implicated fields,
//! and every other field is still validated.
//!
//! Guarantees:
//! - no side effects on the schema or the caller's values
//! - repeated calls with identical inputs produce identical output
//! - derived fields' values are never taken from user input

use crate::formula::{
    FormulaContext, FormulaInterpreter, ResolvedParent, SubstitutionInterpreter,
};
use crate::graph::{self, GraphIssue};
use crate::model::{ErrorSet, FieldDefinition, FieldType, FormSchema, ValueSet, CHECKBOX_FALSE};
use crate::rules;
use crate::FormError;

/// The form validator. Holds the formula interpreter; everything else is
/// stateless.
pub struct Engine {
    interpreter: Box<dyn FormulaInterpreter>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with the built-in substitution interpreter.
    pub fn new() -> Self {
        Self {
            interpreter: Box::new(SubstitutionInterpreter),
        }
    }

    /// Engine with a caller-supplied formula interpreter.
    pub fn with_interpreter(interpreter: Box<dyn FormulaInterpreter>) -> Self {
        Self { interpreter }
    }

    pub fn interpreter_name(&self) -> &str {
        self.interpreter.name()
    }

    /// Validate `values` against `schema`.
    ///
    /// Procedure: order derived fields, compute their values, then fold the
    /// rule evaluator over every non-derived field against the augmented
    /// working set. Schema-authoring defects (cycles, dangling parents,
    /// unresolved formula references) surface as entries keyed to the
    /// implicated field ids.
    pub fn validate(&self, schema: &FormSchema, values: &ValueSet) -> ErrorSet {
        let (resolved, mut errors) = self.resolve_values(schema, values);

        for field in &schema.fields {
            if field.is_derived {
                continue;
            }
            let value = resolved.get(&field.id).map(String::as_str).unwrap_or("");
            if let Some(message) = rules::evaluate_field(field, value) {
                errors.insert(field.id.clone(), message);
            }
        }

        errors
    }

    /// Compute derived values over a working copy of `values`.
    ///
    /// Returns the augmented value set together with any errors from the
    /// dependency analysis or formula evaluation. Render layers use this to
    /// display derived fields; [`Engine::validate`] builds on it.
    pub fn resolve_values(&self, schema: &FormSchema, values: &ValueSet) -> (ValueSet, ErrorSet) {
        let analysis = graph::analyze(schema);

        // Fields implicated in an issue are already absent from the order;
        // here they only pick up their diagnostic message.
        let mut errors = ErrorSet::new();
        for issue in &analysis.issues {
            match issue {
                GraphIssue::Cycle { field_ids } => {
                    for id in field_ids {
                        errors.insert(id.clone(), cycle_message(schema.field(id)));
                    }
                }
                GraphIssue::DanglingParent {
                    field_id,
                    missing_id,
                } => {
                    errors.insert(
                        field_id.clone(),
                        dangling_message(schema.field(field_id), missing_id),
                    );
                }
            }
        }

        let mut working = values.clone();
        for field in schema.derived_fields() {
            working.remove(&field.id);
        }

        for id in &analysis.order {
            let Some(field) = schema.field(id) else {
                continue;
            };
            let parents: Vec<ResolvedParent> = field
                .parent_field_ids
                .iter()
                .filter_map(|pid| {
                    schema.field(pid).map(|p| ResolvedParent {
                        id: p.id.clone(),
                        label: p.label.clone(),
                        value: working.get(pid).cloned().unwrap_or_default(),
                    })
                })
                .collect();
            let ctx = FormulaContext {
                field,
                parents: &parents,
                formula: &field.formula,
            };
            match self.interpreter.evaluate(&ctx) {
                Ok(value) => {
                    working.insert(field.id.clone(), value);
                }
                Err(err) => {
                    errors.insert(field.id.clone(), formula_message(field, &err));
                }
            }
        }

        (working, errors)
    }
}

/// Validate with the default engine.
pub fn validate(schema: &FormSchema, values: &ValueSet) -> ErrorSet {
    Engine::new().validate(schema, values)
}

/// Seed a fresh session value set from field defaults: `defaultValue`, or
/// `"false"` for checkbox fields without one.
pub fn seed_values(schema: &FormSchema) -> ValueSet {
    let mut values = ValueSet::new();
    for field in &schema.fields {
        let value = if field.default_value.is_empty() && field.field_type == FieldType::Checkbox {
            CHECKBOX_FALSE.to_string()
        } else {
            field.default_value.clone()
        };
        values.insert(field.id.clone(), value);
    }
    values
}

fn cycle_message(field: Option<&FieldDefinition>) -> String {
    match field {
        Some(f) => format!("{} is part of a cyclic dependency", f.error_label()),
        None => "Field is part of a cyclic dependency".to_string(),
    }
}

fn dangling_message(field: Option<&FieldDefinition>, missing_id: &str) -> String {
    let label = field.map(|f| f.error_label()).unwrap_or("Field");
    format!("{label} references a missing parent field: {missing_id}")
}

fn formula_message(field: &FieldDefinition, err: &FormError) -> String {
    match err {
        FormError::UnresolvedFormulaReference { reference, .. } => format!(
            "{} has an unresolvable formula reference: {}",
            field.error_label(),
            reference
        ),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDefinition, ValidationRules};

    fn plain(id: &str, label: &str) -> FieldDefinition {
        let mut f = FieldDefinition::new(FieldType::Text);
        f.id = id.to_string();
        f.label = label.to_string();
        f
    }

    fn derived(id: &str, label: &str, parents: &[&str], formula: &str) -> FieldDefinition {
        let mut f = plain(id, label);
        f.is_derived = true;
        f.parent_field_ids = parents.iter().map(|s| s.to_string()).collect();
        f.formula = formula.to_string();
        f
    }

    fn schema(fields: Vec<FieldDefinition>) -> FormSchema {
        let mut s = FormSchema::new("demo");
        s.fields = fields;
        s
    }

    fn values(pairs: &[(&str, &str)]) -> ValueSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn required_field_round_trip() {
        let mut f = plain("1", "Name");
        f.required = true;
        let s = schema(vec![f]);

        let errors = validate(&s, &ValueSet::new());
        assert_eq!(errors.get("1").map(String::as_str), Some("Name is required"));

        let errors = validate(&s, &values(&[("1", "Ann")]));
        assert!(errors.is_empty());
    }

    #[test]
    fn derived_value_feeds_resolution() {
        let mut age = plain("1", "Age");
        age.field_type = FieldType::Number;
        let s = schema(vec![age, derived("2", "YearsLeft", &["1"], "100 - Age")]);

        let engine = Engine::new();
        let (resolved, errors) = engine.resolve_values(&s, &values(&[("1", "30")]));
        assert!(errors.is_empty());
        assert_eq!(resolved.get("2").map(String::as_str), Some("70"));
    }

    #[test]
    fn derived_chain_uses_topological_order() {
        // Declared out of order: C before B before A.
        let s = schema(vec![
            derived("c", "C", &["b"], "b + 1"),
            derived("b", "B", &["a"], "a + 1"),
            plain("a", "a"),
        ]);
        let engine = Engine::new();
        let (resolved, errors) = engine.resolve_values(&s, &values(&[("a", "1")]));
        assert!(errors.is_empty());
        assert_eq!(resolved.get("b").map(String::as_str), Some("2"));
        assert_eq!(resolved.get("c").map(String::as_str), Some("3"));
    }

    #[test]
    fn derived_values_ignore_user_input() {
        let s = schema(vec![
            plain("a", "A"),
            derived("d", "D", &["a"], "A"),
        ]);
        let engine = Engine::new();
        let (resolved, _) = engine.resolve_values(&s, &values(&[("a", "x"), ("d", "forged")]));
        assert_eq!(resolved.get("d").map(String::as_str), Some("x"));
    }

    #[test]
    fn cycle_errors_do_not_block_other_fields() {
        let mut name = plain("n", "Name");
        name.required = true;
        let s = schema(vec![
            derived("x", "X", &["y"], "y"),
            derived("y", "Y", &["x"], "x"),
            name,
        ]);

        let errors = validate(&s, &ValueSet::new());
        assert_eq!(
            errors.get("x").map(String::as_str),
            Some("X is part of a cyclic dependency")
        );
        assert_eq!(
            errors.get("y").map(String::as_str),
            Some("Y is part of a cyclic dependency")
        );
        assert_eq!(errors.get("n").map(String::as_str), Some("Name is required"));
    }

    #[test]
    fn unresolved_formula_reference_is_per_field() {
        let mut name = plain("n", "Name");
        name.required = true;
        let s = schema(vec![
            plain("a", "A"),
            derived("d", "Total", &["a"], "{Missing} + 1"),
            name,
        ]);

        let errors = validate(&s, &values(&[("n", "Ann")]));
        assert_eq!(
            errors.get("d").map(String::as_str),
            Some("Total has an unresolvable formula reference: Missing")
        );
        assert!(errors.get("n").is_none());
        assert!(errors.get("a").is_none());
    }

    #[test]
    fn validate_is_idempotent() {
        let mut f = plain("1", "Name");
        f.required = true;
        f.validations = Some(ValidationRules {
            min_length: Some(3),
            ..ValidationRules::default()
        });
        let s = schema(vec![f, derived("2", "Echo", &["1"], "Name")]);
        let vals = values(&[("1", "Jo")]);

        let first = validate(&s, &vals);
        let second = validate(&s, &vals);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn validate_does_not_mutate_inputs() {
        let s = schema(vec![plain("a", "A"), derived("d", "D", &["a"], "A")]);
        let vals = values(&[("a", "1")]);
        let before = (s.clone(), vals.clone());
        let _ = validate(&s, &vals);
        assert_eq!(before, (s, vals));
    }

    #[test]
    fn seeding_uses_defaults_and_checkbox_false() {
        let mut text = plain("t", "T");
        text.default_value = "hello".to_string();
        let checkbox = {
            let mut f = FieldDefinition::new(FieldType::Checkbox);
            f.id = "c".to_string();
            f.default_value = String::new();
            f
        };
        let s = schema(vec![text, checkbox]);
        let seeded = seed_values(&s);
        assert_eq!(seeded.get("t").map(String::as_str), Some("hello"));
        assert_eq!(seeded.get("c").map(String::as_str), Some("false"));
    }

    #[test]
    fn validation_runs_against_derived_augmented_values() {
        // A non-derived required field is unaffected by derived computation
        // elsewhere in the schema.
        let mut req = plain("r", "R");
        req.required = true;
        let s = schema(vec![plain("a", "A"), derived("d", "D", &["a"], "A"), req]);
        let errors = validate(&s, &values(&[("a", "1"), ("r", "ok")]));
        assert!(errors.is_empty());
    }
}
