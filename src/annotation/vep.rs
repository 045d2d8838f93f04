//! Client for the Ensembl VEP region endpoint (spec.md §6), plus the
//! JSON-to-[`AnnotatedVariant`] deserialization that turns a raw VEP
//! annotation object into this crate's typed record.

use crate::annotation::error::AnnotationError;
use crate::annotation::model::{AnnotatedVariant, Impact, InputFormat, TranscriptConsequence};
use crate::config::PipelineConfig;
use crate::http::{Method, RetryingClient};

/// POSTs one chunk of VEP region strings and returns the raw response
/// array, one entry per requested region (not necessarily in request
/// order — callers must associate back by `input`/canonical key, per
/// spec.md §4.6 step 5).
pub fn fetch_vep_chunk(
    client: &RetryingClient,
    config: &PipelineConfig,
    region_strings: &[String],
) -> Result<Vec<serde_json::Value>, AnnotationError> {
    let body = serde_json::json!({ "variants": region_strings });
    let response = client.fetch(
        &config.vep_region_endpoint(),
        &[],
        Method::Post,
        Some(body),
        false,
    )?;
    Ok(response.as_array().cloned().unwrap_or_default())
}

/// Builds an [`AnnotatedVariant`] from a raw VEP annotation object,
/// preserving the originating input string and its detected format.
pub fn annotation_from_vep_json(
    original_input: &str,
    variant_key: &str,
    input_format: InputFormat,
    raw: &serde_json::Value,
) -> AnnotatedVariant {
    let transcript_consequences = raw
        .get("transcript_consequences")
        .and_then(|v| v.as_array())
        .map(|array| array.iter().map(transcript_consequence_from_json).collect())
        .unwrap_or_default();

    AnnotatedVariant {
        variant_key: variant_key.to_string(),
        original_input: original_input.to_string(),
        input_format,
        seq_region_name: raw.get("seq_region_name").and_then(|v| v.as_str()).map(String::from),
        start: raw.get("start").and_then(|v| v.as_u64()),
        end: raw.get("end").and_then(|v| v.as_u64()),
        allele_string: raw.get("allele_string").and_then(|v| v.as_str()).map(String::from),
        most_severe_consequence: raw
            .get("most_severe_consequence")
            .and_then(|v| v.as_str())
            .map(String::from),
        transcript_consequences,
        colocated_variants: raw.get("colocated_variants").cloned(),
        meta: None,
        inheritance: None,
        error: None,
    }
}

fn transcript_consequence_from_json(raw: &serde_json::Value) -> TranscriptConsequence {
    TranscriptConsequence {
        transcript_id: str_field(raw, "transcript_id"),
        gene_id: str_field(raw, "gene_id"),
        gene_symbol: str_field(raw, "gene_symbol"),
        feature_type: str_field(raw, "feature_type"),
        biotype: str_field(raw, "biotype"),
        impact: str_field(raw, "impact").and_then(|s| Impact::parse(&s)),
        consequence_terms: raw
            .get("consequence_terms")
            .and_then(|v| v.as_array())
            .map(|array| array.iter().filter_map(|t| t.as_str().map(String::from)).collect())
            .unwrap_or_default(),
        hgvsc: str_field(raw, "hgvsc"),
        hgvsp: str_field(raw, "hgvsp"),
        protein_start: raw.get("protein_start").and_then(|v| v.as_u64()),
        protein_end: raw.get("protein_end").and_then(|v| v.as_u64()),
        amino_acids: str_field(raw, "amino_acids"),
        codons: str_field(raw, "codons"),
        sift_prediction: str_field(raw, "sift_prediction"),
        polyphen_prediction: str_field(raw, "polyphen_prediction"),
        pick: raw.get("pick").and_then(|v| v.as_u64()).map(|v| v as u8),
        mane: raw
            .get("mane")
            .and_then(|v| v.as_array())
            .map(|array| array.iter().filter_map(|m| m.as_str().map(String::from)).collect()),
    }
}

fn str_field(raw: &serde_json::Value, key: &str) -> Option<String> {
    raw.get(key).and_then(|v| v.as_str()).map(String::from)
}
