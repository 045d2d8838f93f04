//! Retrying, cache-aware HTTP client (C5). Wraps an [`HttpTransport`] with
//! the exponential-backoff-over-transient-failure loop spec.md §4.5
//! describes, the cache consult/populate step, and URL/querystring
//! construction. PIVOT's clients (`HGNCClient`, `HGVSClient`) hit a single
//! fixed endpoint with no retry; this generalizes that shape to the two
//! services (recoder, VEP) this crate talks to, each of which needs
//! retries because batch annotation runs can span thousands of requests.

use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use log::{debug, warn};

use crate::cache::Cache;
use crate::http::error::HttpError;
use crate::http::transport::HttpTransport;

const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

pub struct RetryingClient {
    transport: Arc<dyn HttpTransport>,
    cache: Option<Arc<Cache>>,
    max_retries: u32,
}

impl RetryingClient {
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Option<Arc<Cache>>, max_retries: u32) -> Self {
        RetryingClient {
            transport,
            cache,
            max_retries,
        }
    }

    /// Issues a GET or POST request against `url`, honoring the cache
    /// (GETs only — POST bodies vary per chunk so they are never cached
    /// directly; the batch annotator caches by variant key instead) and
    /// retrying transient failures with exponential backoff.
    ///
    /// `query_params` are appended as a querystring; any parameter literally
    /// named `content-type` is dropped, mirroring spec.md §4.5's note that
    /// the Ensembl REST endpoints reject a `content-type` query parameter
    /// leaking in from a copy-pasted cURL invocation.
    pub fn fetch(
        &self,
        url: &str,
        query_params: &[(&str, &str)],
        method: Method,
        body: Option<serde_json::Value>,
        cache_enabled: bool,
    ) -> Result<serde_json::Value, HttpError> {
        let full_url = build_url(url, query_params);

        if cache_enabled && method == Method::Get {
            if let Some(cache) = &self.cache {
                if let Some(cached) = cache.get(&full_url) {
                    debug!("cache hit for '{full_url}'");
                    return Ok(cached);
                }
            }
        }

        let mut attempt: u32 = 0;
        loop {
            let outcome = match method {
                Method::Get => self.transport.get(&full_url),
                Method::Post => {
                    let payload = body.clone().unwrap_or(serde_json::Value::Null);
                    self.transport.post_json(&full_url, &payload)
                }
            };

            let raw = match outcome {
                Ok(raw) => raw,
                Err(err) => {
                    if attempt >= self.max_retries {
                        return Err(err);
                    }
                    attempt += 1;
                    warn!("network error on attempt {attempt} for '{full_url}': {err}, retrying");
                    sleep(backoff_delay(attempt));
                    continue;
                }
            };

            if RETRYABLE_STATUSES.contains(&raw.status) {
                if attempt >= self.max_retries {
                    return Err(HttpError::Upstream {
                        url: full_url,
                        status: raw.status,
                        body: raw.body,
                    });
                }
                attempt += 1;
                warn!(
                    "retryable status {} on attempt {attempt} for '{full_url}', retrying",
                    raw.status
                );
                sleep(backoff_delay(attempt));
                continue;
            }

            if !(200..300).contains(&raw.status) {
                return Err(HttpError::Upstream {
                    url: full_url,
                    status: raw.status,
                    body: raw.body,
                });
            }

            let value: serde_json::Value =
                serde_json::from_str(&raw.body).map_err(|err| HttpError::InvalidJson {
                    url: full_url.clone(),
                    message: err.to_string(),
                })?;

            if cache_enabled && method == Method::Get {
                if let Some(cache) = &self.cache {
                    cache.set(&full_url, value.clone());
                }
            }

            return Ok(value);
        }
    }
}

/// Exponential backoff starting at 250ms, doubling per attempt, capped at
/// 8s so a long retry sequence doesn't stall a batch run indefinitely.
fn backoff_delay(attempt: u32) -> Duration {
    let millis = 250u64.saturating_mul(1u64 << attempt.min(5));
    Duration::from_millis(millis.min(8000))
}

fn build_url(base: &str, query_params: &[(&str, &str)]) -> String {
    let filtered: Vec<(&str, &str)> = query_params
        .iter()
        .filter(|(key, _)| !key.eq_ignore_ascii_case("content-type"))
        .copied()
        .collect();

    if filtered.is_empty() {
        return base.to_string();
    }

    let querystring = filtered
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{base}?{querystring}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::transport::{MockTransport, RawResponse};

    fn ok(body: &str) -> Result<RawResponse, HttpError> {
        Ok(RawResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn status(code: u16) -> Result<RawResponse, HttpError> {
        Ok(RawResponse {
            status: code,
            body: "upstream error".to_string(),
        })
    }

    #[test]
    fn successful_get_returns_parsed_json() {
        let transport = Arc::new(MockTransport::new(vec![ok(r#"{"a":1}"#)]));
        let client = RetryingClient::new(transport, None, 3);
        let result = client
            .fetch("https://rest.ensembl.org/x", &[], Method::Get, None, false)
            .unwrap();
        assert_eq!(result, serde_json::json!({"a": 1}));
    }

    #[test]
    fn retryable_status_is_retried_then_succeeds() {
        let transport = Arc::new(MockTransport::new(vec![
            status(503),
            status(500),
            ok(r#"{"ok":true}"#),
        ]));
        let client = RetryingClient::new(transport, None, 3);
        let result = client
            .fetch("https://rest.ensembl.org/x", &[], Method::Get, None, false)
            .unwrap();
        assert_eq!(result, serde_json::json!({"ok": true}));
    }

    #[test]
    fn exhausting_retries_on_retryable_status_returns_upstream_error() {
        let transport = Arc::new(MockTransport::new(vec![
            status(503),
            status(503),
            status(503),
            status(503),
        ]));
        let client = RetryingClient::new(transport, None, 3);
        let err = client
            .fetch("https://rest.ensembl.org/x", &[], Method::Get, None, false)
            .unwrap_err();
        assert!(matches!(err, HttpError::Upstream { status: 503, .. }));
    }

    #[test]
    fn non_retryable_status_propagates_immediately() {
        let transport = Arc::new(MockTransport::new(vec![status(404)]));
        let client = RetryingClient::new(transport.clone(), None, 3);
        let err = client
            .fetch("https://rest.ensembl.org/x", &[], Method::Get, None, false)
            .unwrap_err();
        assert!(matches!(err, HttpError::Upstream { status: 404, .. }));
        assert_eq!(transport.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn content_type_query_param_is_stripped() {
        let url = build_url("https://x/y", &[("content-type", "json"), ("format", "full")]);
        assert_eq!(url, "https://x/y?format=full");
    }

    #[test]
    fn get_result_is_served_from_cache_on_second_call() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(Cache::new(
            dir.path().to_path_buf(),
            1024 * 1024,
            Duration::from_secs(60),
        ));
        let transport = Arc::new(MockTransport::new(vec![ok(r#"{"a":1}"#)]));
        let client = RetryingClient::new(transport.clone(), Some(cache), 3);

        let first = client
            .fetch("https://rest.ensembl.org/x", &[], Method::Get, None, true)
            .unwrap();
        let second = client
            .fetch("https://rest.ensembl.org/x", &[], Method::Get, None, true)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.calls.lock().unwrap().len(), 1);
    }
}
