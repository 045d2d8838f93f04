//! VCF Reader (C2): streams a VCF file, splits multi-allelic records into
//! per-ALT variants, extracts per-sample genotypes, and retains enough of
//! the original record to support faithful VCF re-emission later.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::warn;

use crate::codec::VariantKey;
use crate::vcf::error::VcfError;
use crate::vcf::record::{GenotypeMatrix, OriginalRecord};

/// Everything [`read_vcf`] extracts from a source file.
#[derive(Debug, Clone, Default)]
pub struct VcfData {
    /// Variant keys in file order, one per ALT allele.
    pub variants_to_process: Vec<VariantKey>,
    /// The original (per-ALT) record each key was split from.
    pub vcf_record_map: HashMap<VariantKey, OriginalRecord>,
    /// The contiguous `#`-prefixed header block, verbatim.
    pub header_lines: Vec<String>,
    /// Sample IDs, in column order.
    pub samples: Vec<String>,
    /// Per-variant, per-sample genotype strings.
    pub genotypes_map: GenotypeMatrix,
}

/// Reads a VCF file into a [`VcfData`]. The whole read fails only on I/O
/// error or total absence of a header block; everything else (missing
/// `##fileformat=`, missing `#CHROM`, malformed data lines, ALT-less
/// records) is logged as a warning and skipped (spec.md §4.2).
pub fn read_vcf(path: impl AsRef<Path>) -> Result<VcfData, VcfError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| VcfError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_vcf_str(&contents, &path.display().to_string())
}

/// Core parser, separated from file I/O so it can be unit-tested against
/// literal VCF text without touching the filesystem.
pub fn read_vcf_str(contents: &str, source_label: &str) -> Result<VcfData, VcfError> {
    let mut header_lines = Vec::new();
    let mut samples: Vec<String> = Vec::new();
    let mut lines = contents.lines().peekable();

    while let Some(line) = lines.peek() {
        if line.starts_with('#') {
            let line = lines.next().unwrap();
            if line.starts_with("#CHROM") {
                let fields: Vec<&str> = line.split('\t').collect();
                if fields.len() > 9 {
                    samples = fields[9..]
                        .iter()
                        .map(|s| s.trim().trim_end_matches('\r').to_string())
                        .collect();
                }
            }
            header_lines.push(line.to_string());
        } else {
            break;
        }
    }

    if header_lines.is_empty() {
        return Err(VcfError::MissingHeader(source_label.to_string()));
    }

    if !header_lines.iter().any(|l| l.starts_with("##fileformat=")) {
        warn!("{source_label}: missing ##fileformat= header line");
    }
    if !header_lines.iter().any(|l| l.starts_with("#CHROM")) {
        warn!("{source_label}: missing #CHROM column header line");
    }

    let mut variants_to_process = Vec::new();
    let mut vcf_record_map = HashMap::new();
    let mut genotypes_map: GenotypeMatrix = HashMap::new();

    for (line_no, line) in lines.enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 8 {
            warn!(
                "{source_label}: line {} has fewer than the 8 mandatory VCF columns, skipping",
                line_no + 1
            );
            continue;
        }

        let chrom = fields[0].to_string();
        let pos: u64 = match fields[1].parse() {
            Ok(p) => p,
            Err(_) => {
                warn!(
                    "{source_label}: line {} has a non-integer POS '{}', skipping",
                    line_no + 1,
                    fields[1]
                );
                continue;
            }
        };
        let id = fields[2].to_string();
        let reference = fields[3].to_string();
        let alt_field = fields[4];
        let qual = fields[5].to_string();
        let filter = fields[6].to_string();
        let info = fields[7].to_string();
        let format = fields.get(8).map(|s| s.to_string());
        let sample_fields: Vec<String> = fields.get(9..).map(|s| s.to_vec()).unwrap_or_default();
        let sample_fields: Vec<String> = sample_fields.into_iter().map(|s| s.to_string()).collect();

        if alt_field.is_empty() || alt_field == "." {
            warn!(
                "{source_label}: line {} has an empty or missing ALT, skipping",
                line_no + 1
            );
            continue;
        }

        let alt_alleles: Vec<String> = alt_field.split(',').map(|s| s.to_string()).collect();

        let gt_index = format
            .as_deref()
            .and_then(|f| f.split(':').position(|field| field == "GT"));

        for alt in &alt_alleles {
            let key = VariantKey::new(chrom.clone(), pos, reference.clone(), alt.clone());

            let record = OriginalRecord {
                chrom: chrom.clone(),
                pos,
                id: id.clone(),
                reference: reference.clone(),
                alt_alleles: alt_alleles.clone(),
                alt: alt.clone(),
                qual: qual.clone(),
                filter: filter.clone(),
                info: info.clone(),
                format: format.clone(),
                sample_fields: sample_fields.clone(),
            };

            let mut sample_genotypes = HashMap::new();
            for (sample_idx, sample_id) in samples.iter().enumerate() {
                let raw = sample_fields.get(sample_idx).map(|s| s.as_str());
                let gt = extract_genotype(raw, gt_index);
                sample_genotypes.insert(sample_id.clone(), gt);
            }

            variants_to_process.push(key.clone());
            vcf_record_map.insert(key.clone(), record);
            genotypes_map.insert(key, sample_genotypes);
        }
    }

    Ok(VcfData {
        variants_to_process,
        vcf_record_map,
        header_lines,
        samples,
        genotypes_map,
    })
}

/// Normalizes a single sample's raw FORMAT-field string down to its GT
/// value. Missing sample data, an absent GT subfield, or an explicit `.`
/// all normalize to `"./."`. If several comma-separated values are
/// found where one was expected, the first is taken (spec.md §4.2).
fn extract_genotype(raw_sample_field: Option<&str>, gt_index: Option<usize>) -> String {
    let gt_index = match gt_index {
        Some(idx) => idx,
        None => return "./.".to_string(),
    };
    let raw = match raw_sample_field {
        Some(raw) if !raw.is_empty() => raw,
        _ => return "./.".to_string(),
    };

    let subfields: Vec<&str> = raw.split(':').collect();
    let gt_raw = match subfields.get(gt_index) {
        Some(field) => *field,
        None => return "./.".to_string(),
    };

    let gt_raw = gt_raw.split(',').next().unwrap_or(gt_raw).trim();

    if gt_raw.is_empty() || gt_raw == "." {
        "./.".to_string()
    } else {
        gt_raw.to_string()
    }
}
