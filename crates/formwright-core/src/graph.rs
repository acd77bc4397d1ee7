//! Dependency graph over derived fields.
//!
//! Builds a directed graph with an edge parent -> child for every declared
//! parent reference and produces a deterministic topological evaluation
//! order: every derived field is ordered after all of its parents, ties
//! broken by schema order.
//!
//! The builder is pure and is invoked once per validation/render pass; the
//! schema can change between passes, so nothing is cached.

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{FormError, FormResult};
use crate::model::{FieldId, FormSchema};

/// One schema-authoring defect found while ordering derived fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// Every derived field that could not be ordered: the members of each
    /// cycle plus any derived field downstream of one. All are excluded
    /// from derived computation.
    Cycle { field_ids: Vec<FieldId> },
    /// A derived field names a parent id not present in the schema.
    DanglingParent {
        field_id: FieldId,
        missing_id: FieldId,
    },
}

/// Result of analyzing a schema's derived-field dependencies.
#[derive(Debug, Clone, Default)]
pub struct DependencyAnalysis {
    /// Evaluation order over the derived fields that could be ordered.
    pub order: Vec<FieldId>,
    /// Defects found; fields implicated in an issue are absent from `order`.
    pub issues: Vec<GraphIssue>,
}

impl DependencyAnalysis {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Analyze the schema, collecting every issue instead of failing on the
/// first. The orchestrator uses this to keep validating unaffected fields.
pub fn analyze(schema: &FormSchema) -> DependencyAnalysis {
    let index: BTreeMap<&str, usize> = schema
        .fields
        .iter()
        .enumerate()
        .map(|(i, f)| (f.id.as_str(), i))
        .collect();

    let mut issues = Vec::new();

    // Derived fields with a dangling parent are excluded up front.
    let mut excluded = BTreeSet::new();
    for (i, field) in schema.fields.iter().enumerate() {
        if !field.is_derived {
            continue;
        }
        for pid in &field.parent_field_ids {
            if !index.contains_key(pid.as_str()) {
                issues.push(GraphIssue::DanglingParent {
                    field_id: field.id.clone(),
                    missing_id: pid.clone(),
                });
                excluded.insert(i);
            }
        }
    }

    // Edges among the remaining derived fields. Parents that are not derived
    // are already resolved and do not constrain the order.
    let mut in_degree: BTreeMap<usize, usize> = BTreeMap::new();
    let mut children: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, field) in schema.fields.iter().enumerate() {
        if !field.is_derived || excluded.contains(&i) {
            continue;
        }
        in_degree.entry(i).or_insert(0);
        for pid in &field.parent_field_ids {
            let Some(&pi) = index.get(pid.as_str()) else {
                continue;
            };
            if !schema.fields[pi].is_derived || excluded.contains(&pi) {
                continue;
            }
            children.entry(pi).or_default().push(i);
            *in_degree.entry(i).or_insert(0) += 1;
        }
    }

    // Kahn's algorithm; the ready set is a BTreeSet of schema positions, so
    // ties always resolve to the earliest-declared field.
    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(i, _)| *i)
        .collect();

    let mut order = Vec::new();
    while let Some(&i) = ready.iter().next() {
        ready.remove(&i);
        order.push(i);
        if let Some(kids) = children.get(&i) {
            for &c in kids {
                if let Some(d) = in_degree.get_mut(&c) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(c);
                    }
                }
            }
        }
    }

    if order.len() < in_degree.len() {
        let placed: BTreeSet<usize> = order.iter().copied().collect();
        let stuck: Vec<FieldId> = in_degree
            .keys()
            .filter(|i| !placed.contains(i))
            .map(|&i| schema.fields[i].id.clone())
            .collect();
        issues.push(GraphIssue::Cycle { field_ids: stuck });
    }

    DependencyAnalysis {
        order: order
            .into_iter()
            .map(|i| schema.fields[i].id.clone())
            .collect(),
        issues,
    }
}

/// Strict form of [`analyze`]: fail on the first defect.
pub fn evaluation_order(schema: &FormSchema) -> FormResult<Vec<FieldId>> {
    let analysis = analyze(schema);
    if let Some(issue) = analysis.issues.into_iter().next() {
        return Err(match issue {
            GraphIssue::Cycle { field_ids } => FormError::cyclic_dependency(field_ids),
            GraphIssue::DanglingParent {
                field_id,
                missing_id,
            } => FormError::dangling_parent(field_id, missing_id),
        });
    }
    Ok(analysis.order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDefinition, FieldType};
    use assert_matches::assert_matches;

    fn plain(id: &str) -> FieldDefinition {
        let mut f = FieldDefinition::new(FieldType::Text);
        f.id = id.to_string();
        f
    }

    fn derived(id: &str, parents: &[&str]) -> FieldDefinition {
        let mut f = plain(id);
        f.is_derived = true;
        f.parent_field_ids = parents.iter().map(|s| s.to_string()).collect();
        f
    }

    fn schema(fields: Vec<FieldDefinition>) -> FormSchema {
        let mut s = FormSchema::new("demo");
        s.fields = fields;
        s
    }

    #[test]
    fn chain_orders_parents_first() {
        // Declared C, B, A: evaluation must still run B before C.
        let s = schema(vec![
            derived("c", &["b"]),
            derived("b", &["a"]),
            plain("a"),
        ]);
        let order = evaluation_order(&s).unwrap();
        assert_eq!(order, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn ties_break_by_schema_order() {
        let s = schema(vec![
            plain("a"),
            derived("y", &["a"]),
            derived("x", &["a"]),
        ]);
        let order = evaluation_order(&s).unwrap();
        assert_eq!(order, vec!["y".to_string(), "x".to_string()]);
    }

    #[test]
    fn two_cycle_names_both_fields() {
        let s = schema(vec![derived("x", &["y"]), derived("y", &["x"])]);
        let err = evaluation_order(&s).unwrap_err();
        assert_matches!(
            err,
            FormError::CyclicDependency { ref field_ids }
                if field_ids.contains(&"x".to_string()) && field_ids.contains(&"y".to_string())
        );
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let s = schema(vec![derived("x", &["x"])]);
        assert_matches!(
            evaluation_order(&s),
            Err(FormError::CyclicDependency { .. })
        );
    }

    #[test]
    fn dangling_parent_is_reported_and_others_still_order() {
        let s = schema(vec![
            plain("a"),
            derived("broken", &["ghost"]),
            derived("ok", &["a"]),
        ]);
        let analysis = analyze(&s);
        assert_eq!(analysis.order, vec!["ok".to_string()]);
        assert_matches!(
            analysis.issues.as_slice(),
            [GraphIssue::DanglingParent { field_id, missing_id }]
                if field_id == "broken" && missing_id == "ghost"
        );
    }

    #[test]
    fn field_downstream_of_cycle_is_excluded() {
        let s = schema(vec![
            derived("x", &["y"]),
            derived("y", &["x"]),
            derived("z", &["x"]),
        ]);
        let analysis = analyze(&s);
        assert!(analysis.order.is_empty());
        assert_matches!(
            analysis.issues.as_slice(),
            [GraphIssue::Cycle { field_ids }] if field_ids.len() == 3
        );
    }

    #[test]
    fn mixed_parents_only_constrain_on_derived() {
        let s = schema(vec![
            plain("a"),
            plain("b"),
            derived("sum", &["a", "b"]),
            derived("double", &["sum", "a"]),
        ]);
        let order = evaluation_order(&s).unwrap();
        assert_eq!(order, vec!["sum".to_string(), "double".to_string()]);
    }
}
