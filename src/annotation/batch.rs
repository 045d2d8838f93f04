//! Batch Annotator (C6): chunks a mixed list of variant inputs, recodes
//! non-canonical ones, fetches VEP consequences for the rest, and merges
//! everything back into one ordered [`AnnotatedVariant`] list.
//!
//! Chunk dispatch to both endpoints is paced through one shared
//! [`ratelimit::Ratelimiter`] governor rather than a per-worker sleep —
//! the same throttle-at-the-call-site shape `psnairne-PIVOT` uses in
//! `src/hgnc/hgnc_client.rs` and `src/hgvs/hgvs_client.rs`
//! (`if let Err(duration) = rate_limiter.try_wait() { sleep(duration) }`),
//! generalized here so that up to `config.fanout` chunk requests can be
//! in flight at once, all drawing from the same governor.

use std::thread;
use std::thread::sleep;
use std::time::Duration;

use log::{info, warn};
use ratelimit::Ratelimiter;

use crate::annotation::error::AnnotationError;
use crate::annotation::model::{AnnotatedVariant, InputFormat};
use crate::annotation::recoder::recode_chunk;
use crate::annotation::vep::{annotation_from_vep_json, fetch_vep_chunk};
use crate::codec::{is_canonical_variant_key, vcf_to_ensembl};
use crate::config::PipelineConfig;
use crate::http::RetryingClient;

pub struct BatchInput {
    pub original: String,
    pub input_format: InputFormat,
}

/// Builds the shared governor chunk dispatch draws from: one token
/// refills every `config.inter_chunk_pause`, with a burst capacity of
/// `config.fanout` so up to that many chunk requests can fire back to
/// back before the governor starts making callers wait.
fn build_chunk_governor(config: &PipelineConfig) -> Ratelimiter {
    let refill_interval = if config.inter_chunk_pause.is_zero() {
        Duration::from_millis(1)
    } else {
        config.inter_chunk_pause
    };
    Ratelimiter::builder(1, refill_interval)
        .max_tokens(config.fanout.max(1) as u64)
        .build()
        .expect("building chunk dispatch rate limiter failed")
}

/// Blocks the calling thread until the shared governor issues it a token.
fn throttle(governor: &Ratelimiter) {
    if let Err(wait) = governor.try_wait() {
        sleep(wait);
    }
}

/// Runs the full C6 algorithm over `inputs`, returning one
/// [`AnnotatedVariant`] per input in the same order. A chunk that fails
/// after retries aborts the whole batch with [`AnnotationError::AnnotationFailed`]
/// unless `config.partial_results` is set, in which case the inputs in that
/// chunk are stubbed with an error and the batch continues.
pub fn annotate_batch(
    client: &RetryingClient,
    config: &PipelineConfig,
    inputs: &[BatchInput],
) -> Result<Vec<AnnotatedVariant>, AnnotationError> {
    let mut canonical_keys: Vec<Option<String>> = Vec::with_capacity(inputs.len());
    let mut needs_recoding_indices = Vec::new();

    for (index, input) in inputs.iter().enumerate() {
        if is_canonical_variant_key(&input.original) {
            canonical_keys.push(Some(input.original.clone()));
        } else {
            canonical_keys.push(None);
            needs_recoding_indices.push(index);
        }
    }

    let mut errors: Vec<Option<String>> = vec![None; inputs.len()];
    let governor = build_chunk_governor(config);
    let fanout = config.fanout.max(1);

    // Step 2-3: recode the non-canonical inputs in chunks, up to `fanout`
    // chunks concurrently in flight, each paced by the shared governor.
    let recoder_chunks: Vec<&[usize]> = needs_recoding_indices.chunks(config.recoder_chunk_size).collect();
    for group in recoder_chunks.chunks(fanout) {
        let group_results: Vec<(&[usize], Result<Vec<Option<String>>, AnnotationError>)> = thread::scope(|scope| {
            let handles: Vec<_> = group
                .iter()
                .map(|&chunk_indices| {
                    let chunk_inputs: Vec<String> = chunk_indices
                        .iter()
                        .map(|&index| inputs[index].original.clone())
                        .collect();
                    scope.spawn(move || {
                        throttle(&governor);
                        (chunk_indices, recode_chunk(client, config, &chunk_inputs))
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("recoder chunk worker thread panicked"))
                .collect()
        });

        for (chunk_indices, recoded) in group_results {
            let recoded = match recoded {
                Ok(recoded) => recoded,
                Err(err) => {
                    if config.partial_results {
                        warn!("recoder chunk failed, marking {} inputs errored: {err}", chunk_indices.len());
                        for &index in chunk_indices {
                            errors[index] = Some(err.to_string());
                        }
                        continue;
                    }
                    return Err(AnnotationError::AnnotationFailed(err.to_string()));
                }
            };

            for (&index, recoded_key) in chunk_indices.iter().zip(recoded.into_iter()) {
                match recoded_key {
                    Some(key) => canonical_keys[index] = Some(key),
                    None => errors[index] = Some(AnnotationError::Unrecodable(inputs[index].original.clone()).to_string()),
                }
            }
        }
    }

    // Step 4: convert every resolved canonical key to a VEP region string.
    let mut region_by_index: Vec<Option<String>> = vec![None; inputs.len()];
    for index in 0..inputs.len() {
        if errors[index].is_some() {
            continue;
        }
        let Some(key) = &canonical_keys[index] else {
            continue;
        };
        match vcf_to_ensembl(key) {
            Ok(region_allele) => region_by_index[index] = Some(region_allele.as_vep_region_string()),
            Err(err) => errors[index] = Some(err.to_string()),
        }
    }

    let vep_indices: Vec<usize> = (0..inputs.len())
        .filter(|&index| region_by_index[index].is_some())
        .collect();

    let mut raw_annotations: Vec<Option<serde_json::Value>> = vec![None; inputs.len()];

    // Same bounded, governor-paced concurrent dispatch as the recoder
    // stage above, now over VEP region chunks.
    let vep_chunks: Vec<&[usize]> = vep_indices.chunks(config.vep_chunk_size).collect();
    for group in vep_chunks.chunks(fanout) {
        let group_results: Vec<(&[usize], Result<Vec<serde_json::Value>, AnnotationError>)> = thread::scope(|scope| {
            let handles: Vec<_> = group
                .iter()
                .map(|&chunk_indices| {
                    let region_strings: Vec<String> = chunk_indices
                        .iter()
                        .map(|&index| region_by_index[index].clone().unwrap())
                        .collect();
                    scope.spawn(move || {
                        throttle(&governor);
                        (chunk_indices, fetch_vep_chunk(client, config, &region_strings))
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("VEP chunk worker thread panicked"))
                .collect()
        });

        for (chunk_indices, responses) in group_results {
            let responses = match responses {
                Ok(responses) => responses,
                Err(err) => {
                    if config.partial_results {
                        warn!("VEP chunk failed, marking {} inputs errored: {err}", chunk_indices.len());
                        for &index in chunk_indices {
                            errors[index] = Some(err.to_string());
                        }
                        continue;
                    }
                    return Err(AnnotationError::AnnotationFailed(err.to_string()));
                }
            };

            // Step 5: associate each response back to its originating index
            // by matching on the canonical key or the Ensembl `input` field.
            // The VEP region endpoint echoes back the bare region string (no
            // trailing allele) in its own `input` field, so the allele
            // suffix must be stripped from what we sent before comparing.
            for &index in chunk_indices {
                let canonical_key = canonical_keys[index].as_deref().unwrap_or_default();
                let region_only = region_by_index[index]
                    .as_deref()
                    .and_then(|full| full.split(' ').next())
                    .unwrap_or_default();
                let matched = responses.iter().find(|raw| {
                    raw.get("input").and_then(|v| v.as_str()) == Some(region_only)
                        || raw.get("id").and_then(|v| v.as_str()) == Some(canonical_key)
                });
                match matched {
                    Some(raw) => raw_annotations[index] = Some(raw.clone()),
                    None => {
                        info!("no VEP annotation matched input at index {index}, leaving unmatched");
                    }
                }
            }
        }
    }

    // Step 6: emit one AnnotatedVariant per original input, preserving order.
    let mut output = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        if let Some(error) = &errors[index] {
            output.push(AnnotatedVariant::stub_with_error(
                input.original.clone(),
                input.input_format,
                error.clone(),
            ));
            continue;
        }

        let canonical_key = canonical_keys[index]
            .clone()
            .unwrap_or_else(|| input.original.clone());

        match &raw_annotations[index] {
            Some(raw) => output.push(annotation_from_vep_json(&input.original, &canonical_key, input.input_format, raw)),
            None => output.push(AnnotatedVariant::stub_with_error(
                input.original.clone(),
                input.input_format,
                "no VEP annotation was returned for this input".to_string(),
            )),
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::transport::{MockTransport, RawResponse};
    use std::sync::Arc;
    use std::time::Duration;

    fn ok(body: serde_json::Value) -> Result<RawResponse, crate::http::HttpError> {
        Ok(RawResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    #[test]
    fn canonical_input_skips_recoding_and_is_annotated() {
        let vep_response = serde_json::json!([
            { "input": "1:65568-65568:1", "most_severe_consequence": "missense_variant" }
        ]);
        let transport = Arc::new(MockTransport::new(vec![ok(vep_response)]));
        let client = RetryingClient::new(transport, None, 3);
        let mut config = PipelineConfig::default();
        config.inter_chunk_pause = Duration::from_millis(0);

        let inputs = vec![BatchInput {
            original: "1-65568-A-C".to_string(),
            input_format: InputFormat::Vcf,
        }];

        let results = annotate_batch(&client, &config, &inputs).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].variant_key, "1-65568-A-C");
        assert_eq!(results[0].most_severe_consequence.as_deref(), Some("missense_variant"));
        assert!(results[0].error.is_none());
    }

    #[test]
    fn hgvs_input_is_recoded_before_vep_lookup() {
        let recoder_response = serde_json::json!([
            { "A": { "vcf_string": ["1-55039974-G-A"] } }
        ]);
        let vep_response = serde_json::json!([
            { "input": "1:55039974-55039974:1", "most_severe_consequence": "missense_variant" }
        ]);
        let transport = Arc::new(MockTransport::new(vec![ok(recoder_response), ok(vep_response)]));
        let client = RetryingClient::new(transport, None, 3);
        let mut config = PipelineConfig::default();
        config.inter_chunk_pause = Duration::from_millis(0);

        let inputs = vec![BatchInput {
            original: "ENST00000302118:c.137G>A".to_string(),
            input_format: InputFormat::Hgvs,
        }];

        let results = annotate_batch(&client, &config, &inputs).unwrap();
        assert_eq!(results[0].variant_key, "1-55039974-G-A");
        assert_eq!(results[0].input_format, InputFormat::Hgvs);
    }

    #[test]
    fn unrecodable_input_is_stubbed_with_error_and_does_not_abort_batch() {
        let recoder_response = serde_json::json!([{ "A": {} }]);
        let vep_response = serde_json::json!([
            { "input": "1:65568-65568:1", "most_severe_consequence": "missense_variant" }
        ]);
        let transport = Arc::new(MockTransport::new(vec![ok(recoder_response), ok(vep_response)]));
        let client = RetryingClient::new(transport, None, 3);
        let mut config = PipelineConfig::default();
        config.inter_chunk_pause = Duration::from_millis(0);

        let inputs = vec![
            BatchInput {
                original: "rs_unknown".to_string(),
                input_format: InputFormat::Rsid,
            },
            BatchInput {
                original: "1-65568-A-C".to_string(),
                input_format: InputFormat::Vcf,
            },
        ];

        let results = annotate_batch(&client, &config, &inputs).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].error.is_some());
        assert!(results[1].error.is_none());
    }
}
