//! Inheritance engine: pattern deduction (C8), segregation (C9),
//! prioritization (C10), compound heterozygosity (C11), and the
//! orchestrator (C12) tying them together (spec.md §4.8-§4.12).

pub mod comphet;
pub mod deducer;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod prioritizer;
pub mod segregation;

pub use comphet::analyze_compound_het;
pub use deducer::deduce;
pub use error::InheritanceError;
pub use model::{
    CompHetDetails, CompHetStatus, InheritanceResult, Pattern, SampleRoles, SegregationStatus,
};
pub use orchestrator::run_inheritance_analysis;
pub use prioritizer::prioritize;
pub use segregation::check_segregation;
