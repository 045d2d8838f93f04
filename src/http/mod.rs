//! Retrying HTTP Client (C5).

pub mod client;
pub mod error;
pub mod transport;

pub use client::{Method, RetryingClient};
pub use error::HttpError;
pub use transport::{HttpTransport, MockTransport, RawResponse, ReqwestTransport};
