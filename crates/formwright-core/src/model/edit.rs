//! Schema mutation as an explicit command/reducer.
//!
//! Every builder-side edit funnels through [`apply`], which keeps the
//! invariant-preserving rules in one testable place:
//! - turning a field non-derived clears its parents and formula
//! - a field can never list itself as a parent
//! - parent references must name fields present in the schema
//!
//! Cycles are not checked here; they are detected per validation/render pass
//! by `crate::graph`, since the schema can change between passes.

use crate::errors::{FormError, FormResult};
use crate::model::{FieldDefinition, FieldId, FieldType, FormSchema};

/// One edit to a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    /// Append a new field with the defaults for its type.
    Add { field_type: FieldType },
    SetLabel { id: FieldId, label: String },
    SetRequired { id: FieldId, required: bool },
    SetDefaultValue { id: FieldId, value: String },
    SetOptions { id: FieldId, options: Vec<String> },
    /// Write one validation key. The key need not match the field's current
    /// type; the evaluator ignores inapplicable keys, which keeps edits
    /// robust to type changes.
    SetValidation { id: FieldId, rule: RuleEdit },
    /// Setting `false` clears parents and formula unconditionally. Setting
    /// `true` leaves existing properties untouched; exemption from
    /// `required`/`validations` is enforced at evaluation time.
    SetDerived { id: FieldId, derived: bool },
    SetParents { id: FieldId, parent_ids: Vec<FieldId> },
    SetFormula { id: FieldId, formula: String },
    /// No-op when the field is already first.
    MoveUp { id: FieldId },
    /// No-op when the field is already last.
    MoveDown { id: FieldId },
    Remove { id: FieldId },
}

/// A single validation-rule assignment. `None` clears the key.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleEdit {
    MinLength(Option<u32>),
    MaxLength(Option<u32>),
    Email(bool),
    Password(bool),
    MinNumber(Option<f64>),
    MaxNumber(Option<f64>),
    MinDate(Option<String>),
    MaxDate(Option<String>),
}

/// Apply one edit to the schema in place.
pub fn apply(schema: &mut FormSchema, edit: FieldEdit) -> FormResult<()> {
    match edit {
        FieldEdit::Add { field_type } => {
            schema.fields.push(FieldDefinition::new(field_type));
            Ok(())
        }
        FieldEdit::SetLabel { id, label } => {
            field_mut(schema, &id)?.label = label;
            Ok(())
        }
        FieldEdit::SetRequired { id, required } => {
            field_mut(schema, &id)?.required = required;
            Ok(())
        }
        FieldEdit::SetDefaultValue { id, value } => {
            field_mut(schema, &id)?.default_value = value;
            Ok(())
        }
        FieldEdit::SetOptions { id, options } => {
            field_mut(schema, &id)?.options = Some(options);
            Ok(())
        }
        FieldEdit::SetValidation { id, rule } => {
            let field = field_mut(schema, &id)?;
            let rules = field.validations.get_or_insert_with(Default::default);
            match rule {
                RuleEdit::MinLength(v) => rules.min_length = v,
                RuleEdit::MaxLength(v) => rules.max_length = v,
                RuleEdit::Email(v) => rules.email = Some(v),
                RuleEdit::Password(v) => rules.password = Some(v),
                RuleEdit::MinNumber(v) => rules.min_number = v,
                RuleEdit::MaxNumber(v) => rules.max_number = v,
                RuleEdit::MinDate(v) => rules.min_date = v,
                RuleEdit::MaxDate(v) => rules.max_date = v,
            }
            Ok(())
        }
        FieldEdit::SetDerived { id, derived } => {
            let field = field_mut(schema, &id)?;
            field.is_derived = derived;
            if !derived {
                field.parent_field_ids.clear();
                field.formula.clear();
            }
            Ok(())
        }
        FieldEdit::SetParents { id, parent_ids } => {
            if parent_ids.iter().any(|p| p == &id) {
                return Err(FormError::invalid_argument(format!(
                    "field {id} cannot be its own parent"
                )));
            }
            for pid in &parent_ids {
                if schema.field(pid).is_none() {
                    return Err(FormError::dangling_parent(&id, pid));
                }
            }
            field_mut(schema, &id)?.parent_field_ids = parent_ids;
            Ok(())
        }
        FieldEdit::SetFormula { id, formula } => {
            field_mut(schema, &id)?.formula = formula;
            Ok(())
        }
        FieldEdit::MoveUp { id } => {
            let idx = field_index(schema, &id)?;
            if idx > 0 {
                schema.fields.swap(idx - 1, idx);
            }
            Ok(())
        }
        FieldEdit::MoveDown { id } => {
            let idx = field_index(schema, &id)?;
            if idx + 1 < schema.fields.len() {
                schema.fields.swap(idx, idx + 1);
            }
            Ok(())
        }
        FieldEdit::Remove { id } => {
            let idx = field_index(schema, &id)?;
            schema.fields.remove(idx);
            Ok(())
        }
    }
}

fn field_index(schema: &FormSchema, id: &str) -> FormResult<usize> {
    schema
        .field_index(id)
        .ok_or_else(|| FormError::invalid_argument(format!("no field with id {id}")))
}

fn field_mut<'a>(schema: &'a mut FormSchema, id: &str) -> FormResult<&'a mut FieldDefinition> {
    let idx = field_index(schema, id)?;
    Ok(&mut schema.fields[idx])
}
