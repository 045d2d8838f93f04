use thiserror::Error;

/// Errors from C8–C11. Trapped per variant/gene by
/// [`crate::inheritance::orchestrator`]: a failure here is recorded
/// against the affected [`crate::inheritance::model::InheritanceResult`]
/// or [`crate::inheritance::model::CompHetDetails`] rather than aborting
/// the pipeline (spec.md §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InheritanceError {
    #[error("could not parse variant key '{0}' for inheritance analysis")]
    InvalidVariantKey(String),

    #[error("compound heterozygous analysis for gene '{0}' failed: {1}")]
    CompHetFailed(String, String),
}
