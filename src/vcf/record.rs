//! The original VCF data record a [`crate::codec::VariantKey`] was split
//! from, retained verbatim (minus the ALT split) so output assembly can
//! faithfully merge original INFO fields with synthesized annotation
//! columns (spec.md §4.2, §4.13).

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalRecord {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
    pub reference: String,
    /// The full, un-split ALT list from the source record (used when
    /// re-grouping split variants back into one VCF output row).
    pub alt_alleles: Vec<String>,
    /// This record's specific ALT allele (post multi-allelic split).
    pub alt: String,
    pub qual: String,
    pub filter: String,
    /// Raw `key=value;key;...` INFO string, unparsed beyond splitting on
    /// `;` for iteration by consumers that need individual fields.
    pub info: String,
    pub format: Option<String>,
    /// Raw per-sample FORMAT-field strings, in column order, before GT
    /// extraction. Other FORMAT fields are preserved here but not
    /// consumed further (spec.md §6).
    pub sample_fields: Vec<String>,
}

impl OriginalRecord {
    /// Individual `key=value` (or bare flag) INFO entries, in original
    /// order, excluding any prior `VL_CSQ` field (so output assembly can
    /// safely re-append a fresh one).
    pub fn info_fields_excluding(&self, excluded_key: &str) -> Vec<String> {
        if self.info == "." || self.info.is_empty() {
            return Vec::new();
        }
        self.info
            .split(';')
            .filter(|field| {
                let key = field.split('=').next().unwrap_or(field);
                key != excluded_key
            })
            .map(|field| field.to_string())
            .collect()
    }
}

/// Per-variant, per-sample genotype strings. Invariant: for every
/// `VariantKey` present, the inner map has an entry (possibly `./.`) for
/// every declared sample (spec.md §3).
pub type GenotypeMatrix =
    HashMap<crate::codec::VariantKey, HashMap<String, String>>;
