use thiserror::Error;

#[derive(Debug, Error)]
pub enum PedigreeError {
    #[error("failed to read PED file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PED row {line} has {found} fields, expected at least 6: '{row}'")]
    MalformedRow {
        line: usize,
        found: usize,
        row: String,
    },
}
