use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid variant string '{0}': expected exactly four hyphen-delimited fields CHROM-POS-REF-ALT")]
    InvalidVariant(String),

    #[error("invalid variant string '{0}': position '{1}' is not an integer")]
    InvalidPosition(String, String),

    #[error("cannot reconstruct a VCF key from region '{0}' and allele '{1}' without reference sequence")]
    Unsupported(String, String),
}
