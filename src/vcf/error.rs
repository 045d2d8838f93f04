use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcfError {
    #[error("failed to read VCF file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("VCF file '{0}' has no header lines at all")]
    MissingHeader(String),
}
