//! The seam between [`crate::http::client::RetryingClient`] and the
//! actual network. `ReqwestClientTransport` wraps `reqwest::blocking`
//! exactly the way `psnairne-PIVOT`'s `HGNCClient`/`HGVSClient` do
//! (`src/hgnc/hgnc_client.rs`, `src/hgvs/hgvs_client.rs`); `MockTransport`
//! is the deterministic test double this crate needs that PIVOT doesn't
//! (PIVOT's tests call the live HGNC/VariantValidator APIs directly).

use std::collections::VecDeque;
use std::sync::Mutex;

use reqwest::blocking::Client;

use crate::http::error::HttpError;

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str) -> Result<RawResponse, HttpError>;
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<RawResponse, HttpError>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        ReqwestTransport {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<RawResponse, HttpError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", "variant-linker")
            .header("Accept", "application/json")
            .send()
            .map_err(|err| HttpError::Network {
                url: url.to_string(),
                message: err.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|err| HttpError::Network {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        Ok(RawResponse { status, body })
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<RawResponse, HttpError> {
        let response = self
            .client
            .post(url)
            .header("User-Agent", "variant-linker")
            .header("Accept", "application/json")
            .json(body)
            .send()
            .map_err(|err| HttpError::Network {
                url: url.to_string(),
                message: err.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|err| HttpError::Network {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        Ok(RawResponse { status, body })
    }
}

/// A scripted transport for unit tests: each call to `get`/`post_json`
/// pops the next queued response (or error) regardless of URL, the same
/// "serve canned answers from a map" spirit as PIVOT's `MockHGNCClient`
/// (`src/hgnc/mock_hgnc_client.rs`), adapted to a call queue since this
/// crate's retry logic needs to script a sequence of failures-then-success.
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse, HttpError>>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new(responses: Vec<Result<RawResponse, HttpError>>) -> Self {
        MockTransport {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn next_response(&self, url: &str) -> Result<RawResponse, HttpError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(HttpError::Network {
                    url: url.to_string(),
                    message: "MockTransport exhausted".to_string(),
                })
            })
    }
}

impl HttpTransport for MockTransport {
    fn get(&self, url: &str) -> Result<RawResponse, HttpError> {
        self.next_response(url)
    }

    fn post_json(&self, url: &str, _body: &serde_json::Value) -> Result<RawResponse, HttpError> {
        self.next_response(url)
    }
}
