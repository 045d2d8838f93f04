use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("unknown output format '{0}'")]
    UnknownFormat(String),

    #[error("failed to write output to '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
