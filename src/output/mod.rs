//! Flattener & Output Formatter (C13): turns annotated variants into
//! JSON, CSV, TSV, or VCF text (spec.md §4.13).

pub mod error;
pub mod flatten;
pub mod format;
pub mod vcf_writer;

pub use error::OutputError;
pub use flatten::{column_names, flatten as flatten_variants, Row};
pub use format::{format_csv, format_json, format_tsv};
pub use vcf_writer::format_vcf;

/// Output formats the pipeline driver (C15) and CLI accept
/// (spec.md §4.15, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
    Tsv,
    Vcf,
    Schema,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Result<Self, OutputError> {
        match raw.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "vcf" => Ok(OutputFormat::Vcf),
            "schema" => Ok(OutputFormat::Schema),
            other => Err(OutputError::UnknownFormat(other.to_string())),
        }
    }
}
