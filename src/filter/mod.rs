//! Filter Engine (C14): JSON-API-style filter criteria over annotation
//! arrays, with a dotted/wildcard path resolver and a `pickOutput`
//! pre-filter (spec.md §4.14).

pub mod engine;
pub mod error;
pub mod model;
pub mod path;

pub use engine::{apply_filters, apply_pick_output, FilterStats};
pub use error::FilterError;
pub use model::{parse_criteria, Criterion, Operator};
