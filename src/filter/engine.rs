//! Filter Engine (C14): evaluates parsed criteria against annotated
//! variants, including the `transcript_consequences.`-prefixed nested
//! pass and the `pickOutput` pre-filter (spec.md §4.14).

use log::warn;
use serde_json::Value;

use crate::annotation::AnnotatedVariant;
use crate::filter::model::{Criterion, Operator};
use crate::filter::path;

const NESTED_PREFIX: &str = "transcript_consequences.";

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

fn evaluate_one(target: Option<&Value>, criterion: &Criterion) -> bool {
    match criterion.operator {
        Operator::Eq => target == Some(&criterion.value),
        Operator::Ne => target != Some(&criterion.value),
        Operator::In | Operator::Nin => {
            let Value::Array(items) = &criterion.value else {
                warn!("filter on '{}' used {{in,nin}} with a non-array operand", criterion.path);
                return false;
            };
            let contains = target.map(|t| items.contains(t)).unwrap_or(false);
            if criterion.operator == Operator::In {
                contains
            } else {
                !contains
            }
        }
        Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
            let (Some(target), Some(operand)) = (target.and_then(as_f64), as_f64(&criterion.value)) else {
                warn!(
                    "filter on '{}' used a numeric operator against a non-numeric operand",
                    criterion.path
                );
                return false;
            };
            match criterion.operator {
                Operator::Gt => target > operand,
                Operator::Gte => target >= operand,
                Operator::Lt => target < operand,
                Operator::Lte => target <= operand,
                _ => unreachable!(),
            }
        }
    }
}

/// Evaluates every criterion (AND) against `value` for a path that is
/// not itself the `transcript_consequences.` nested form.
fn matches_all(value: &Value, criteria: &[Criterion]) -> bool {
    criteria.iter().all(|criterion| {
        let resolved = path::resolve(value, &criterion.path);
        evaluate_one(resolved.as_ref(), criterion)
    })
}

#[derive(Debug, Clone, Default)]
pub struct FilterStats {
    pub top_level_before: usize,
    pub top_level_after: usize,
    pub nested_before: usize,
    pub nested_after: usize,
}

/// `pickOutput` mode (spec.md §4.14): restricts each variant's
/// `transcript_consequences` to `pick==1` entries, applied before any
/// other filter criteria.
pub fn apply_pick_output(variants: &mut [AnnotatedVariant]) {
    for variant in variants.iter_mut() {
        variant.transcript_consequences.retain(|tc| tc.pick == Some(1));
    }
}

/// Runs C14 over `variants`: top-level criteria first (drops whole
/// variants), then any `transcript_consequences.`-prefixed criteria
/// (prunes each surviving variant's nested array) (spec.md §4.14).
pub fn apply_filters(variants: Vec<AnnotatedVariant>, criteria: &[Criterion]) -> (Vec<AnnotatedVariant>, FilterStats) {
    let (nested, top_level): (Vec<&Criterion>, Vec<&Criterion>) =
        criteria.iter().partition(|c| c.path.starts_with(NESTED_PREFIX));

    let mut stats = FilterStats {
        top_level_before: variants.len(),
        ..Default::default()
    };

    let mut retained: Vec<AnnotatedVariant> = if top_level.is_empty() {
        variants
    } else {
        variants
            .into_iter()
            .filter(|variant| {
                let value = serde_json::to_value(variant).unwrap_or(Value::Null);
                matches_all(&value, &top_level.iter().map(|c| (*c).clone()).collect::<Vec<_>>())
            })
            .collect()
    };
    stats.top_level_after = retained.len();

    if !nested.is_empty() {
        let nested_criteria: Vec<Criterion> = nested
            .iter()
            .map(|c| Criterion {
                path: c.path.trim_start_matches(NESTED_PREFIX).to_string(),
                operator: c.operator,
                value: c.value.clone(),
            })
            .collect();

        for variant in retained.iter_mut() {
            stats.nested_before += variant.transcript_consequences.len();
            variant.transcript_consequences.retain(|tc| {
                let value = serde_json::to_value(tc).unwrap_or(Value::Null);
                matches_all(&value, &nested_criteria)
            });
            stats.nested_after += variant.transcript_consequences.len();
        }
    }

    (retained, stats)
}
