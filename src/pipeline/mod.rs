//! Pipeline Driver (C15): the top-level function that accepts one or
//! many variant inputs, detects their format, and invokes the batch
//! annotator (C6), inheritance orchestrator (C12), filter engine (C14),
//! and output formatter (C13) in order (spec.md §4.15).

pub mod model;

pub use model::{detect_format, Meta, PipelineInput, PipelineOutput};

use std::sync::Arc;

use log::info;

use crate::annotation::{annotate_batch, AnnotatedVariant, BatchInput};
use crate::cache::Cache;
use crate::config::PipelineConfig;
use crate::error::VariantLinkerError;
use crate::filter::{apply_filters, apply_pick_output, parse_criteria};
use crate::http::{HttpTransport, ReqwestTransport, RetryingClient};
use crate::output::{format_csv, format_json, format_tsv, format_vcf, OutputFormat};
use crate::vcf::{read_vcf, OriginalRecord, VcfData};
use std::collections::HashMap;

/// Runs the full pipeline for one invocation: ingestion, batch
/// annotation, inheritance analysis (VCF/PED inputs only), filtering,
/// and output formatting (spec.md §4.15).
pub fn run_pipeline(input: PipelineInput, config: &PipelineConfig) -> Result<PipelineOutput, VariantLinkerError> {
    let mut steps_performed: Vec<String> = Vec::new();

    if let Some(scoring_path) = &input.scoring_config_path {
        steps_performed.push(format!(
            "scoring config '{}' accepted but not evaluated (external collaborator)",
            scoring_path.display()
        ));
    }

    if input.variant.is_none() && input.variants.is_empty() && input.vcf_path.is_none() {
        return Err(VariantLinkerError::Config(
            "no input was given: supply --variant, --variants-file, or --vcf-input".to_string(),
        ));
    }

    // A VCF/variants-file input that legitimately resolves to zero
    // variants (e.g. a header-only VCF) is not an error (spec.md §8):
    // it produces an empty, but well-formed, output.
    let (batch_inputs, vcf_data) = collect_inputs(&input)?;

    let batch_size = batch_inputs.len();
    let batch_processing = batch_size > 1 || input.vcf_path.is_some();

    let pedigree = match &input.ped_path {
        Some(path) => Some(crate::pedigree::parse_ped_file(path)?),
        None => None,
    };

    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new());
    let cache = if config.cache_enabled {
        let max_size = crate::cache::parse_size(&config.cache_max_size)?;
        let dir = config.cache_dir.clone().unwrap_or_else(Cache::default_dir);
        Some(Arc::new(Cache::new(dir, max_size, config.cache_ttl)))
    } else {
        None
    };
    let client = RetryingClient::new(transport, cache, config.max_retries);

    let mut annotated: Vec<AnnotatedVariant> = annotate_batch(&client, config, &batch_inputs)?;
    steps_performed.push(format!("annotated {batch_size} input(s)"));

    let inheritance_calculated = if let Some(vcf_data) = &vcf_data {
        crate::inheritance::run_inheritance_analysis(
            &mut annotated,
            &vcf_data.genotypes_map,
            &vcf_data.samples,
            pedigree.as_ref(),
            input.sample_roles.as_ref(),
            config,
        );
        steps_performed.push("inheritance analysis completed".to_string());
        true
    } else {
        false
    };

    if input.pick_output {
        apply_pick_output(&mut annotated);
        steps_performed.push("pick-output applied: kept only pick==1 transcript consequences".to_string());
    }

    if let Some(filter_json) = &input.filter {
        let criteria = parse_criteria(filter_json)?;
        let before = annotated.len();
        let (filtered, stats) = apply_filters(annotated, &criteria);
        annotated = filtered;
        steps_performed.push(format!(
            "filter applied: {before} -> {} variant(s) ({} -> {} transcript consequences)",
            annotated.len(),
            stats.nested_before,
            stats.nested_after
        ));
    }

    let variant_type = summarize_variant_type(&batch_inputs);
    let output_format = input.output_format.unwrap_or(OutputFormat::Json);

    let rendered = render(&annotated, output_format, inheritance_calculated, vcf_data.as_ref())?;
    steps_performed.push(format!("formatted output as {output_format:?}"));

    info!("pipeline run complete: {batch_size} input(s), format {output_format:?}");

    Ok(PipelineOutput {
        rendered,
        meta: Meta {
            batch_size,
            batch_processing,
            steps_performed,
            variant_type,
            inheritance_calculated,
        },
    })
}

fn collect_inputs(input: &PipelineInput) -> Result<(Vec<BatchInput>, Option<VcfData>), VariantLinkerError> {
    if let Some(vcf_path) = &input.vcf_path {
        let vcf_data = read_vcf(vcf_path)?;
        let batch_inputs = vcf_data
            .variants_to_process
            .iter()
            .map(|key| BatchInput {
                original: key.to_string(),
                input_format: crate::annotation::InputFormat::Vcf,
            })
            .collect();
        return Ok((batch_inputs, Some(vcf_data)));
    }

    let mut raw_inputs: Vec<String> = Vec::new();
    if let Some(variant) = &input.variant {
        raw_inputs.push(variant.clone());
    }
    raw_inputs.extend(input.variants.iter().cloned());

    let batch_inputs = raw_inputs
        .into_iter()
        .map(|original| {
            let input_format = detect_format(&original);
            BatchInput { original, input_format }
        })
        .collect();

    Ok((batch_inputs, None))
}

fn summarize_variant_type(inputs: &[BatchInput]) -> String {
    let mut formats = inputs.iter().map(|i| i.input_format);
    let Some(first) = formats.next() else {
        return "NONE".to_string();
    };
    if formats.all(|f| f == first) {
        format!("{first:?}").to_uppercase()
    } else {
        "MIXED".to_string()
    }
}

fn render(
    annotated: &[AnnotatedVariant],
    format: OutputFormat,
    inheritance_calculated: bool,
    vcf_data: Option<&VcfData>,
) -> Result<String, VariantLinkerError> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({ "variants": annotated });
            Ok(format_json(&value))
        }
        OutputFormat::Csv => Ok(format_csv(annotated, inheritance_calculated)),
        OutputFormat::Tsv => Ok(format_tsv(annotated, inheritance_calculated)),
        OutputFormat::Vcf => {
            let empty_map: HashMap<crate::codec::VariantKey, OriginalRecord> = HashMap::new();
            let (header_lines, record_map): (&[String], &HashMap<_, _>) = match vcf_data {
                Some(data) => (&data.header_lines, &data.vcf_record_map),
                None => (&[], &empty_map),
            };
            Ok(format_vcf(annotated, header_lines, record_map))
        }
        OutputFormat::Schema => Ok(format_json(&schema_value())),
    }
}

fn schema_value() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "variants": { "type": "array", "items": { "$ref": "#/definitions/AnnotatedVariant" } },
            "meta": { "type": "object" }
        },
        "definitions": {
            "AnnotatedVariant": {
                "type": "object",
                "properties": {
                    "variant_key": { "type": "string" },
                    "original_input": { "type": "string" },
                    "input_format": { "type": "string", "enum": ["VCF", "HGVS", "RSID", "CNV"] },
                    "transcript_consequences": { "type": "array" },
                    "inheritance": { "type": ["object", "null"] },
                    "error": { "type": ["string", "null"] }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_format_classifies_canonical_rsid_and_hgvs() {
        assert_eq!(detect_format("1-65568-A-C"), crate::annotation::InputFormat::Vcf);
        assert_eq!(detect_format("rs6025"), crate::annotation::InputFormat::Rsid);
        assert_eq!(detect_format("ENST00000302118:c.137G>A"), crate::annotation::InputFormat::Hgvs);
    }

    #[test]
    fn batch_processing_is_true_for_multiple_variants() {
        let input = PipelineInput {
            variants: vec!["1-1-A-G".to_string(), "1-2-A-G".to_string()],
            ..Default::default()
        };
        let (batch_inputs, vcf_data) = collect_inputs(&input).unwrap();
        assert_eq!(batch_inputs.len(), 2);
        assert!(vcf_data.is_none());
    }

    #[test]
    fn no_input_is_rejected() {
        let config = PipelineConfig::default();
        let err = run_pipeline(PipelineInput::default(), &config).unwrap_err();
        assert!(matches!(err, VariantLinkerError::Config(_)));
    }
}
