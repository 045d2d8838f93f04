//! Dotted/wildcard path resolution over `serde_json::Value` (spec.md
//! §4.14, §9 "dotted-path value extraction over dynamic trees").

use serde_json::Value;

fn resolve_segments<'a>(value: &'a Value, segments: &[&str]) -> Vec<&'a Value> {
    let Some((segment, rest)) = segments.split_first() else {
        return vec![value];
    };

    if *segment == "*" {
        return match value {
            Value::Array(items) => items.iter().flat_map(|item| resolve_segments(item, rest)).collect(),
            Value::Object(map) => map.values().flat_map(|item| resolve_segments(item, rest)).collect(),
            _ => Vec::new(),
        };
    }

    match value {
        Value::Object(map) => map
            .get(*segment)
            .map(|child| resolve_segments(child, rest))
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Resolves `path` (`.`-delimited, `*` wildcard segments allowed) against
/// `value`. A wildcard branch that matches exactly one value returns that
/// value directly; matching zero values returns `None`; matching more
/// than one returns the full array of matches (spec.md §4.14).
pub fn resolve<'a>(value: &'a Value, path: &str) -> Option<Value> {
    let segments: Vec<&str> = path.split('.').collect();
    let matches = resolve_segments(value, &segments);

    match matches.len() {
        0 => None,
        1 => Some(matches[0].clone()),
        _ => Some(Value::Array(matches.into_iter().cloned().collect())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn simple_dotted_path_resolves_nested_field() {
        let value = json!({"a": {"b": 42}});
        assert_eq!(resolve(&value, "a.b"), Some(json!(42)));
    }

    #[test]
    fn wildcard_over_array_returns_single_match_unwrapped() {
        let value = json!({"items": [{"gene": "BRCA1"}]});
        assert_eq!(resolve(&value, "items.*.gene"), Some(json!("BRCA1")));
    }

    #[test]
    fn wildcard_over_array_returns_array_for_multiple_matches() {
        let value = json!({"items": [{"gene": "BRCA1"}, {"gene": "BRCA2"}]});
        assert_eq!(
            resolve(&value, "items.*.gene"),
            Some(json!(["BRCA1", "BRCA2"]))
        );
    }

    #[test]
    fn missing_path_resolves_to_none() {
        let value = json!({"a": 1});
        assert_eq!(resolve(&value, "a.b.c"), None);
    }
}
