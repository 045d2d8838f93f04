//! VCF Reader (C2).

pub mod error;
pub mod reader;
pub mod record;

pub use error::VcfError;
pub use reader::{read_vcf, read_vcf_str, VcfData};
pub use record::{GenotypeMatrix, OriginalRecord};
