//! Batch Annotator (C6): the data model ([`model`]) and clients for the
//! two Ensembl services this crate orchestrates ([`recoder`], [`vep`]),
//! tied together by [`batch`].

pub mod batch;
pub mod error;
pub mod model;
pub mod recoder;
pub mod vep;

pub use batch::{annotate_batch, BatchInput};
pub use error::AnnotationError;
pub use model::{AnnotatedVariant, Impact, InputFormat, TranscriptConsequence};
