//! Pipeline Driver (C15) data model: the input/output envelope and
//! format detection (spec.md §4.15).

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::annotation::InputFormat;
use crate::inheritance::SampleRoles;
use crate::output::OutputFormat;

fn rsid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^rs\d+$").expect("invalid rsID regex literal"))
}

/// Classifies a single free-form variant input string (spec.md §4.15):
/// a canonical `CHROM-POS-REF-ALT` key is `VCF`, an `rs\d+` token is
/// `RSID`, everything else is assumed `HGVS`.
pub fn detect_format(input: &str) -> InputFormat {
    if crate::codec::is_canonical_variant_key(input) {
        InputFormat::Vcf
    } else if rsid_regex().is_match(input) {
        InputFormat::Rsid
    } else {
        InputFormat::Hgvs
    }
}

/// Everything [`crate::pipeline::run_pipeline`] needs to drive one
/// invocation (spec.md §4.15, §6).
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    pub variant: Option<String>,
    pub variants: Vec<String>,
    pub vcf_path: Option<PathBuf>,
    pub ped_path: Option<PathBuf>,
    pub sample_roles: Option<SampleRoles>,
    pub filter: Option<serde_json::Value>,
    pub pick_output: bool,
    pub output_format: Option<OutputFormat>,
    /// Accepted and recorded in `meta.steps_performed` but never
    /// evaluated: the scoring-formula evaluator is an external
    /// collaborator outside this crate's scope (spec.md §1).
    pub scoring_config_path: Option<PathBuf>,
}

/// Run metadata attached to every pipeline output (spec.md §4.15).
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub batch_size: usize,
    pub batch_processing: bool,
    pub steps_performed: Vec<String>,
    pub variant_type: String,
    pub inheritance_calculated: bool,
}

pub struct PipelineOutput {
    pub rendered: String,
    pub meta: Meta,
}
