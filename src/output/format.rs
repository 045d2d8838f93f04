//! Flattener & Output Formatter (C13, part 2): renders flattened rows as
//! CSV/TSV text, and the full annotated-variant tree as JSON
//! (spec.md §4.13).

use crate::output::flatten::{column_names, flatten, Row};
use crate::annotation::AnnotatedVariant;

/// JSON output is the full filtered object as-is — spec.md §4.13 doesn't
/// require the row-per-consequence flattening CSV/TSV use, only "the
/// full filtered object, stable key order not required".
pub fn format_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// CSV quoting rule (spec.md §4.13): fields containing `,`, `"`, or a
/// newline are wrapped in `"`, with embedded `"` doubled. TSV never
/// quotes.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn render_delimited(rows: &[Row], columns: &[&str], delimiter: char, quote: bool) -> String {
    let mut out = String::new();
    out.push_str(&columns.join(&delimiter.to_string()));
    out.push('\n');

    for row in rows {
        let values: Vec<String> = row
            .iter()
            .map(|(_, value)| if quote { csv_escape(value) } else { value.clone() })
            .collect();
        out.push_str(&values.join(&delimiter.to_string()));
        out.push('\n');
    }
    out
}

pub fn format_csv(variants: &[AnnotatedVariant], include_inheritance: bool) -> String {
    let rows = flatten(variants, include_inheritance);
    let columns = column_names(include_inheritance);
    render_delimited(&rows, &columns, ',', true)
}

pub fn format_tsv(variants: &[AnnotatedVariant], include_inheritance: bool) -> String {
    let rows = flatten(variants, include_inheritance);
    let columns = column_names(include_inheritance);
    render_delimited(&rows, &columns, '\t', false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::InputFormat;

    fn variant_with_comma_in_field() -> AnnotatedVariant {
        AnnotatedVariant {
            variant_key: "1-1-A-G".to_string(),
            original_input: "1-1-A-G".to_string(),
            input_format: InputFormat::Vcf,
            seq_region_name: Some("1".to_string()),
            start: Some(1),
            end: Some(1),
            allele_string: Some("A/G".to_string()),
            most_severe_consequence: Some("missense_variant, splice_region_variant".to_string()),
            transcript_consequences: Vec::new(),
            colocated_variants: None,
            meta: None,
            inheritance: None,
            error: None,
        }
    }

    #[test]
    fn csv_quotes_fields_containing_a_comma() {
        let variant = variant_with_comma_in_field();
        let csv = format_csv(std::slice::from_ref(&variant), false);
        assert!(csv.contains("\"missense_variant, splice_region_variant\""));
    }

    #[test]
    fn tsv_does_not_quote_commas() {
        let variant = variant_with_comma_in_field();
        let tsv = format_tsv(std::slice::from_ref(&variant), false);
        assert!(tsv.contains("missense_variant, splice_region_variant\t"));
    }

    #[test]
    fn empty_input_emits_header_row_only() {
        let csv = format_csv(&[], false);
        assert_eq!(csv.lines().count(), 1);
    }
}
