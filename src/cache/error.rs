use thiserror::Error;

/// The only cache error that is ever actually surfaced to a caller:
/// malformed configuration. Every runtime cache failure (missing file,
/// corrupt content, I/O error) is swallowed into a `None`/`false` return
/// so a degraded cache never breaks the pipeline (spec.md §4.4, §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("invalid cache size '{0}': expected a number followed by B, KB, MB, or GB")]
    InvalidSize(String),
}
