use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum AnnotationError {
    #[error("input '{0}' could not be recoded to a canonical variant key")]
    Unrecodable(String),

    #[error("chunk request failed after retries: {0}")]
    AnnotationFailed(String),

    #[error(transparent)]
    Http(#[from] crate::http::HttpError),

    #[error(transparent)]
    Codec(#[from] crate::codec::CodecError),
}
