//! # variant-linker
//!
//! A library that annotates genetic variants by orchestrating calls to the
//! Ensembl Variant Recoder and Variant Effect Predictor (VEP) REST services,
//! then derives inheritance patterns and compound heterozygosity from the
//! annotated variants and an optional pedigree.
//!
//! The crate is organized leaf-first:
//!
//! - [`codec`] converts between the compact `CHROM-POS-REF-ALT` variant key
//!   and the Ensembl `region/allele` form.
//! - [`vcf`] reads VCF files into variants + genotype matrices, and writes
//!   annotated variants back out as VCF.
//! - [`pedigree`] parses PED files.
//! - [`cache`] provides an in-memory + on-disk cache for HTTP responses.
//! - [`http`] is a retrying HTTP client used by the annotation clients.
//! - [`annotation`] batches variant lookups across the recoder and VEP
//!   endpoints and assembles [`annotation::model::AnnotatedVariant`] values.
//! - [`genotype`] classifies genotype strings (ref/het/hom-alt/missing).
//! - [`inheritance`] deduces Mendelian inheritance patterns, checks
//!   segregation, prioritizes among candidates, and finds compound
//!   heterozygous variant pairs.
//! - [`output`] flattens annotated variants into row-per-consequence tables
//!   and formats them as JSON, CSV, TSV, or VCF.
//! - [`filter`] applies JSON-API-style filter criteria to annotation arrays.
//! - [`pipeline`] is the top-level driver tying all of the above together.

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod genotype;
pub mod http;
pub mod output;
pub mod pedigree;
pub mod vcf;

pub mod annotation;
pub mod inheritance;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::VariantLinkerError;
pub use pipeline::{run_pipeline, PipelineInput, PipelineOutput};
