//! Client for the Ensembl variant_recoder endpoint (spec.md §6).

use crate::annotation::error::AnnotationError;
use crate::codec::is_canonical_variant_key;
use crate::config::PipelineConfig;
use crate::http::{Method, RetryingClient};

/// POSTs one chunk of non-canonical inputs to the recoder endpoint and
/// returns, for each input (in order), the first `vcf_string` entry that
/// matches the canonical variant-key regex, or `None` if the response
/// contained no such entry (spec.md §4.6 step 2).
pub fn recode_chunk(
    client: &RetryingClient,
    config: &PipelineConfig,
    inputs: &[String],
) -> Result<Vec<Option<String>>, AnnotationError> {
    let body = serde_json::json!({ "ids": inputs });
    let response = client.fetch(
        &config.recoder_endpoint(),
        &[],
        Method::Post,
        Some(body),
        false,
    )?;

    let entries = response.as_array().cloned().unwrap_or_default();
    let mut results = Vec::with_capacity(inputs.len());

    for (index, _input) in inputs.iter().enumerate() {
        let entry = entries.get(index);
        results.push(entry.and_then(extract_canonical_vcf_string));
    }

    Ok(results)
}

/// A recoder entry is an object mapping allele-letter keys (`"A"`, `"a"`,
/// ...) to sub-objects that may contain a `vcf_string` array. We scan every
/// value in the entry for the first array entry that parses as a canonical
/// variant key.
fn extract_canonical_vcf_string(entry: &serde_json::Value) -> Option<String> {
    let object = entry.as_object()?;
    for value in object.values() {
        let Some(vcf_strings) = value.get("vcf_string").and_then(|v| v.as_array()) else {
            continue;
        };
        for candidate in vcf_strings {
            if let Some(candidate_str) = candidate.as_str() {
                if is_canonical_variant_key(candidate_str) {
                    return Some(candidate_str.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::transport::{MockTransport, RawResponse};
    use std::sync::Arc;

    #[test]
    fn extracts_first_canonical_vcf_string_per_entry() {
        let response = serde_json::json!([
            {
                "A": { "vcf_string": ["1-55039974-G-A", "1-55039974-G-T"] }
            }
        ]);
        let transport = Arc::new(MockTransport::new(vec![Ok(RawResponse {
            status: 200,
            body: response.to_string(),
        })]));
        let client = RetryingClient::new(transport, None, 3);
        let config = PipelineConfig::default();
        let results = recode_chunk(&client, &config, &["ENST00000302118:c.137G>A".to_string()]).unwrap();
        assert_eq!(results, vec![Some("1-55039974-G-A".to_string())]);
    }

    #[test]
    fn missing_vcf_string_yields_none() {
        let response = serde_json::json!([{ "A": {} }]);
        let transport = Arc::new(MockTransport::new(vec![Ok(RawResponse {
            status: 200,
            body: response.to_string(),
        })]));
        let client = RetryingClient::new(transport, None, 3);
        let config = PipelineConfig::default();
        let results = recode_chunk(&client, &config, &["rs123".to_string()]).unwrap();
        assert_eq!(results, vec![None]);
    }
}
