//! Derived value evaluation.
//!
//! A derived field's formula is free text. The engine guarantees correct
//! parent resolution and evaluation ordering; what the text *means* is owned
//! by a pluggable [`FormulaInterpreter`]. The built-in
//! [`SubstitutionInterpreter`] substitutes parent references and evaluates
//! plain arithmetic; hosts wanting a richer expression language supply their
//! own interpreter.
//!
//! Reference resolution, in both interpreters and formulas:
//! - `{name}` is an explicit reference, resolved against the declared
//!   parents by label or id; an unmatched braced name is an
//!   `UnresolvedFormulaReference` error.
//! - bare occurrences of a parent's label or id are substituted
//!   opportunistically (whole-word, longest name first); all other text
//!   passes through unchanged.

mod arith;

use crate::errors::{FormError, FormResult};
use crate::model::{FieldDefinition, FieldId};

/// A parent field resolved for one evaluation: identity plus current value.
#[derive(Debug, Clone)]
pub struct ResolvedParent {
    pub id: FieldId,
    pub label: String,
    pub value: String,
}

/// Everything an interpreter sees for one derived field.
#[derive(Debug)]
pub struct FormulaContext<'a> {
    pub field: &'a FieldDefinition,
    pub parents: &'a [ResolvedParent],
    pub formula: &'a str,
}

/// Strategy for turning a formula plus resolved parents into a value.
///
/// Implementations must be deterministic: identical parent values and
/// formula text always produce the same output.
pub trait FormulaInterpreter {
    fn name(&self) -> &str;

    fn evaluate(&self, ctx: &FormulaContext<'_>) -> FormResult<String>;
}

/// The built-in interpreter: reference substitution plus `+ - * /`
/// arithmetic with parentheses. When the substituted text is not an
/// arithmetic expression it is returned as-is.
#[derive(Debug, Default)]
pub struct SubstitutionInterpreter;

impl FormulaInterpreter for SubstitutionInterpreter {
    fn name(&self) -> &str {
        "substitution"
    }

    fn evaluate(&self, ctx: &FormulaContext<'_>) -> FormResult<String> {
        let resolved = resolve_braces(ctx)?;
        let substituted = substitute_bare_names(&resolved, ctx.parents);

        match arith::try_eval(&substituted) {
            Some(n) if n.is_finite() => Ok(arith::format_number(n)),
            _ => Ok(substituted),
        }
    }
}

fn lookup<'a>(parents: &'a [ResolvedParent], name: &str) -> Option<&'a ResolvedParent> {
    parents
        .iter()
        .find(|p| !p.label.is_empty() && p.label == name)
        .or_else(|| parents.iter().find(|p| p.id == name))
}

/// Replace every `{name}` span with the matching parent's value. An
/// unterminated `{` is treated as literal text.
fn resolve_braces(ctx: &FormulaContext<'_>) -> FormResult<String> {
    let mut out = String::with_capacity(ctx.formula.len());
    let mut rest = ctx.formula;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = after[..end].trim();
                let parent = lookup(ctx.parents, name).ok_or_else(|| {
                    FormError::unresolved_reference(&ctx.field.id, name)
                })?;
                out.push_str(&parent.value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Substitute whole-word occurrences of each parent's label and id.
///
/// Names are tried longest first at every position, so a label that
/// contains another label ("Birth Year" vs "Year") resolves to the longer
/// one. Word boundaries are judged against the original formula text, so
/// substituted values never cascade into further substitutions.
fn substitute_bare_names(text: &str, parents: &[ResolvedParent]) -> String {
    let mut names: Vec<(&str, &str)> = Vec::new();
    for p in parents {
        if !p.label.is_empty() {
            names.push((p.label.as_str(), p.value.as_str()));
        }
        if !p.id.is_empty() {
            names.push((p.id.as_str(), p.value.as_str()));
        }
    }
    names.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        let rest = &text[i..];
        let mut matched = None;
        for (name, value) in &names {
            if !rest.starts_with(name) {
                continue;
            }
            let end = i + name.len();
            let before_ok = text[..i].chars().next_back().map_or(true, |c| !is_word(c));
            let after_ok = text[end..].chars().next().map_or(true, |c| !is_word(c));
            if before_ok && after_ok {
                matched = Some((end, *value));
                break;
            }
        }
        match matched {
            Some((end, value)) => {
                out.push_str(value);
                i = end;
            }
            None => {
                // Safe: i is always on a char boundary.
                let c = rest.chars().next().unwrap_or('\0');
                out.push(c);
                i += c.len_utf8().max(1);
            }
        }
    }
    out
}
