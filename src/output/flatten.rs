//! Flattener (C13, part 1): produces one row per
//! `(AnnotatedVariant, TranscriptConsequence)` pair, in the fixed column
//! order spec.md §4.13 names. Rows are returned as ordered `(column,
//! value)` pairs so every downstream format (JSON object, CSV/TSV line)
//! can build itself from the same data without re-deriving column order.

use crate::annotation::AnnotatedVariant;
use crate::codec::{encode_variant_key, VariantKey};

pub const BASE_COLUMNS: &[&str] = &[
    "OriginalInput",
    "VEPInput",
    "Location",
    "Allele",
    "MostSevereConsequence",
    "Impact",
    "GeneSymbol",
    "GeneID",
    "FeatureType",
    "TranscriptID",
    "ConsequenceTerms",
    "MANE",
    "HGVSc",
    "HGVSp",
    "ProteinPosition",
    "Amino_acids",
    "Codons",
    "ExistingVariation",
    "CADD",
    "SIFT",
    "PolyPhen",
];

pub const INHERITANCE_COLUMNS: &[&str] = &[
    "PrioritizedPattern",
    "PossiblePatterns",
    "CompHetCandidate",
    "CompHetPartners",
    "CompHetLikelyPaternal",
    "CompHetLikelyMaternal",
];

/// One flattened output row: column name paired with its rendered value
/// (empty string for absent data), in column order.
pub type Row = Vec<(&'static str, String)>;

pub fn column_names(include_inheritance: bool) -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = BASE_COLUMNS.to_vec();
    if include_inheritance {
        columns.extend_from_slice(INHERITANCE_COLUMNS);
    }
    columns
}

/// Flattens `variants` into rows, honoring spec.md §4.13: a variant with
/// no transcript consequences still produces exactly one row with the
/// consequence-level columns defaulted to empty.
pub fn flatten(variants: &[AnnotatedVariant], include_inheritance: bool) -> Vec<Row> {
    let mut rows = Vec::new();
    for variant in variants {
        let base = base_values(variant);
        let inheritance = include_inheritance.then(|| inheritance_values(variant));

        if variant.transcript_consequences.is_empty() {
            rows.push(build_row(&base, None, inheritance.as_deref()));
        } else {
            for tc in &variant.transcript_consequences {
                rows.push(build_row(&base, Some(tc), inheritance.as_deref()));
            }
        }
    }
    rows
}

fn build_row(
    base: &[(&'static str, String)],
    tc: Option<&crate::annotation::TranscriptConsequence>,
    inheritance: Option<&[(&'static str, String)]>,
) -> Row {
    let mut row: Row = base.to_vec();

    let tc_value = |value: Option<String>| value.unwrap_or_default();
    row.push(("Impact", tc_value(tc.and_then(|tc| tc.impact).map(|i| i.as_str().to_string()))));
    row.push(("GeneSymbol", tc_value(tc.and_then(|tc| tc.gene_symbol.clone()))));
    row.push(("GeneID", tc_value(tc.and_then(|tc| tc.gene_id.clone()))));
    row.push(("FeatureType", tc_value(tc.and_then(|tc| tc.feature_type.clone()))));
    row.push(("TranscriptID", tc_value(tc.and_then(|tc| tc.transcript_id.clone()))));
    row.push((
        "ConsequenceTerms",
        tc.map(|tc| tc.consequence_terms.join("&")).unwrap_or_default(),
    ));
    row.push((
        "MANE",
        tc.and_then(|tc| tc.mane.as_ref()).map(|m| m.join("&")).unwrap_or_default(),
    ));
    row.push(("HGVSc", tc_value(tc.and_then(|tc| tc.hgvsc.clone()))));
    row.push(("HGVSp", tc_value(tc.and_then(|tc| tc.hgvsp.clone()))));
    row.push((
        "ProteinPosition",
        tc.and_then(protein_position).unwrap_or_default(),
    ));
    row.push(("Amino_acids", tc_value(tc.and_then(|tc| tc.amino_acids.clone()))));
    row.push(("Codons", tc_value(tc.and_then(|tc| tc.codons.clone()))));
    row.push(("ExistingVariation", String::new()));
    row.push(("CADD", String::new()));
    row.push(("SIFT", tc_value(tc.and_then(|tc| tc.sift_prediction.clone()))));
    row.push(("PolyPhen", tc_value(tc.and_then(|tc| tc.polyphen_prediction.clone()))));

    if let Some(inheritance) = inheritance {
        row.extend_from_slice(inheritance);
    }

    row
}

fn protein_position(tc: &crate::annotation::TranscriptConsequence) -> Option<String> {
    match (tc.protein_start, tc.protein_end) {
        (Some(start), Some(end)) if start == end => Some(start.to_string()),
        (Some(start), Some(end)) => Some(format!("{start}-{end}")),
        (Some(start), None) => Some(start.to_string()),
        (None, Some(end)) => Some(end.to_string()),
        (None, None) => None,
    }
}

/// Columns that don't vary across a variant's transcript consequences.
/// Returned with placeholders for the consequence-level columns so
/// `build_row` can splice the per-TC values into the same fixed slots.
fn base_values(variant: &AnnotatedVariant) -> Row {
    let vep_input = VariantKey::parse(&variant.variant_key)
        .map(|key| encode_variant_key(&key).as_vep_region_string())
        .unwrap_or_default();

    let location = match (&variant.seq_region_name, variant.start, variant.end) {
        (Some(chrom), Some(start), Some(end)) => format!("{chrom}:{start}-{end}(1)"),
        (Some(chrom), Some(start), None) => format!("{chrom}:{start}(1)"),
        _ => String::new(),
    };

    vec![
        ("OriginalInput", variant.original_input.clone()),
        ("VEPInput", vep_input),
        ("Location", location),
        ("Allele", variant.allele_string.clone().unwrap_or_default()),
        (
            "MostSevereConsequence",
            variant.most_severe_consequence.clone().unwrap_or_default(),
        ),
    ]
}

fn inheritance_values(variant: &AnnotatedVariant) -> Row {
    let Some(result) = &variant.inheritance else {
        return INHERITANCE_COLUMNS.iter().map(|&name| (name, String::new())).collect();
    };

    let possible = result
        .possible_patterns
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join("&");

    let (candidate, partners, paternal, maternal) = match &result.comp_het_details {
        Some(details) => (
            details.is_candidate.to_string(),
            details.partner_variant_keys.iter().cloned().collect::<Vec<_>>().join("&"),
            details.likely_paternal_keys.iter().cloned().collect::<Vec<_>>().join("&"),
            details.likely_maternal_keys.iter().cloned().collect::<Vec<_>>().join("&"),
        ),
        None => (String::new(), String::new(), String::new(), String::new()),
    };

    vec![
        ("PrioritizedPattern", result.prioritized_pattern.as_str().to_string()),
        ("PossiblePatterns", possible),
        ("CompHetCandidate", candidate),
        ("CompHetPartners", partners),
        ("CompHetLikelyPaternal", paternal),
        ("CompHetLikelyMaternal", maternal),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::InputFormat;

    fn bare_variant() -> AnnotatedVariant {
        AnnotatedVariant {
            variant_key: "1-65568-A-C".to_string(),
            original_input: "1-65568-A-C".to_string(),
            input_format: InputFormat::Vcf,
            seq_region_name: Some("1".to_string()),
            start: Some(65568),
            end: Some(65568),
            allele_string: Some("A/C".to_string()),
            most_severe_consequence: Some("missense_variant".to_string()),
            transcript_consequences: Vec::new(),
            colocated_variants: None,
            meta: None,
            inheritance: None,
            error: None,
        }
    }

    #[test]
    fn variant_without_consequences_produces_exactly_one_row() {
        let variant = bare_variant();
        let rows = flatten(std::slice::from_ref(&variant), false);
        assert_eq!(rows.len(), 1);
        let gene_symbol = rows[0].iter().find(|(col, _)| *col == "GeneSymbol").unwrap();
        assert_eq!(gene_symbol.1, "");
    }

    #[test]
    fn variant_with_two_consequences_produces_two_rows() {
        let mut variant = bare_variant();
        variant.transcript_consequences = vec![
            crate::annotation::TranscriptConsequence {
                gene_symbol: Some("GENE1".to_string()),
                ..Default::default()
            },
            crate::annotation::TranscriptConsequence {
                gene_symbol: Some("GENE2".to_string()),
                ..Default::default()
            },
        ];
        let rows = flatten(std::slice::from_ref(&variant), false);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn inheritance_columns_are_omitted_when_not_requested() {
        let variant = bare_variant();
        let rows = flatten(std::slice::from_ref(&variant), false);
        assert!(!rows[0].iter().any(|(col, _)| *col == "PrioritizedPattern"));
    }
}
