use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum HttpError {
    #[error("network error calling '{url}': {message}")]
    Network { url: String, message: String },

    #[error("upstream error: HTTP {status} from '{url}': {body}")]
    Upstream {
        url: String,
        status: u16,
        body: String,
    },

    #[error("request to '{0}' was cancelled before completion")]
    Cancelled(String),

    #[error("response from '{url}' was not valid JSON: {message}")]
    InvalidJson { url: String, message: String },
}
