use thiserror::Error;

use crate::annotation::AnnotationError;
use crate::cache::CacheError;
use crate::codec::CodecError;
use crate::filter::FilterError;
use crate::http::HttpError;
use crate::inheritance::InheritanceError;
use crate::output::OutputError;
use crate::pedigree::PedigreeError;
use crate::vcf::VcfError;

/// Top-level error for the pipeline driver, aggregating every submodule's
/// error type. Individual submodules keep their own narrower error enums;
/// this one exists only at the seam where the driver has to return a
/// single `Result` to its caller (library consumer or CLI binary).
#[derive(Debug, Error)]
pub enum VariantLinkerError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Vcf(#[from] VcfError),

    #[error(transparent)]
    Pedigree(#[from] PedigreeError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Inheritance(#[from] InheritanceError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("invalid pipeline configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
