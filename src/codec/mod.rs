//! Variant Key & Format Codec (C1).
//!
//! Converts between the compact `CHROM-POS-REF-ALT` variant key and the
//! Ensembl `region/allele` form required by the VEP region endpoint. Pure,
//! deterministic, allocation-light — the same spirit as
//! `psnairne-PIVOT`'s `VcfVar` (see `src/hgvs/vcf_var.rs` in the teacher
//! repo), generalized from "holds four fields" into "also knows how to
//! re-derive the Ensembl region string for each variant class."

pub mod error;

pub use error::CodecError;

use once_cell_like::OnceRegex;
use regex::Regex;

/// A canonical variant key: `CHROM-POS-REF-ALT`, with any `chr` prefix
/// stripped from `CHROM` and `REF`/`ALT` held uppercase. Uniquely
/// identifies a single-allele variant — multi-allelic VCF records are
/// split so that one `VariantKey` exists per ALT (see [`crate::vcf`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantKey {
    chrom: String,
    pos: u64,
    reference: String,
    alternate: String,
}

impl VariantKey {
    pub fn new(
        chrom: impl Into<String>,
        pos: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        VariantKey {
            chrom: strip_chr_prefix(&chrom.into()).to_string(),
            pos,
            reference: reference.into().to_uppercase(),
            alternate: alternate.into().to_uppercase(),
        }
    }

    /// Parses a `CHROM-POS-REF-ALT` string into a [`VariantKey`].
    pub fn parse(raw: &str) -> Result<Self, CodecError> {
        let fields: Vec<&str> = raw.split('-').collect();
        if fields.len() != 4 {
            return Err(CodecError::InvalidVariant(raw.to_string()));
        }
        let pos = fields[1]
            .parse::<u64>()
            .map_err(|_| CodecError::InvalidPosition(raw.to_string(), fields[1].to_string()))?;
        Ok(VariantKey::new(fields[0], pos, fields[2], fields[3]))
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn pos(&self) -> u64 {
        self.pos
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn alternate(&self) -> &str {
        &self.alternate
    }

    pub fn is_x_chromosomal(&self) -> bool {
        self.chrom.eq_ignore_ascii_case("x")
    }
}

impl std::fmt::Display for VariantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.chrom, self.pos, self.reference, self.alternate
        )
    }
}

/// The Ensembl `region/allele` pair a variant encodes to for the VEP
/// region endpoint: `{region: "CHROM:START-END:STRAND", allele}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionAllele {
    pub region: String,
    pub allele: String,
}

impl RegionAllele {
    /// The full VEP region string, `"{region} {allele}"`, as accepted in
    /// the `variants` array of a VEP region POST body.
    pub fn as_vep_region_string(&self) -> String {
        format!("{} {}", self.region, self.allele)
    }
}

fn strip_chr_prefix(chrom: &str) -> &str {
    if chrom.len() > 3 && chrom[..3].eq_ignore_ascii_case("chr") {
        &chrom[3..]
    } else {
        chrom
    }
}

/// Converts a `CHROM-POS-REF-ALT` string into its Ensembl region/allele
/// form. Fails with [`CodecError::InvalidVariant`] when the input does not
/// split into exactly four hyphen-delimited fields, or
/// [`CodecError::InvalidPosition`] when `POS` is not an integer.
///
/// Classifies REF/ALT by the literal detection rules (spec.md's
/// region/allele table), in order:
///
/// - `|REF|=|ALT|=1` — SNV: single-base region, allele is `ALT`.
/// - `|REF|>1 ∧ ALT=REF[0]` — deletion: region spans `REF[1:]`, allele is
///   `"-"`.
/// - `|REF|=1 ∧ ALT` starts with `REF` — insertion: a zero-length region
///   anchored immediately after `REF`, allele is `ALT[1:]`.
/// - `|REF|=|ALT|>1` — MNP: region spans all of `REF`, allele is `ALT`,
///   untrimmed.
/// - otherwise — complex substitution: trim the common suffix then the
///   common prefix shared by REF and ALT (the same minimal-representation
///   trick Ensembl itself performs before querying the region endpoint)
///   and re-derive the region/allele from whatever remains.
pub fn vcf_to_ensembl(vcf: &str) -> Result<RegionAllele, CodecError> {
    let key = VariantKey::parse(vcf)?;
    Ok(encode_variant_key(&key))
}

/// Same as [`vcf_to_ensembl`] but operating on an already-parsed
/// [`VariantKey`], for callers (like [`crate::annotation::batch`]) that
/// already hold one.
pub fn encode_variant_key(key: &VariantKey) -> RegionAllele {
    let chrom = key.chrom();
    let pos = key.pos();
    let reference = key.reference();
    let alternate = key.alternate();

    if reference.len() == 1 && alternate.len() == 1 {
        // SNV.
        return RegionAllele {
            region: format!("{chrom}:{pos}-{pos}:1"),
            allele: alternate.to_string(),
        };
    }

    if reference.len() > 1 && alternate.len() == 1 && alternate == &reference[0..1] {
        // Deletion: region spans REF[1:], allele is "-".
        let end = pos + reference.len() as u64 - 1;
        return RegionAllele {
            region: format!("{}:{}-{}:1", chrom, pos + 1, end),
            allele: "-".to_string(),
        };
    }

    if reference.len() == 1 && alternate.len() > 1 && alternate.starts_with(reference) {
        // Insertion: zero-length interval immediately after REF.
        return RegionAllele {
            region: format!("{}:{}-{}:1", chrom, pos + 1, pos),
            allele: alternate[1..].to_string(),
        };
    }

    if reference.len() == alternate.len() && reference.len() > 1 {
        // MNP: region spans all of REF, allele is ALT, untrimmed.
        let end = pos + reference.len() as u64 - 1;
        return RegionAllele {
            region: format!("{chrom}:{pos}-{end}:1"),
            allele: alternate.to_string(),
        };
    }

    // Complex substitution: trim common flanks, then recompute.
    let (prefix_len, ref_trimmed, alt_trimmed) = trim_common(reference, alternate);
    let anchor_pos = pos + prefix_len as u64;

    if ref_trimmed.is_empty() {
        RegionAllele {
            region: format!("{}:{}-{}:1", chrom, anchor_pos, anchor_pos - 1),
            allele: alt_trimmed,
        }
    } else if alt_trimmed.is_empty() {
        let end = anchor_pos + ref_trimmed.len() as u64 - 1;
        RegionAllele {
            region: format!("{chrom}:{anchor_pos}-{end}:1"),
            allele: "-".to_string(),
        }
    } else {
        let end = anchor_pos + ref_trimmed.len() as u64 - 1;
        RegionAllele {
            region: format!("{chrom}:{anchor_pos}-{end}:1"),
            allele: alt_trimmed,
        }
    }
}

/// Strips the common suffix then the common prefix shared by `reference`
/// and `alternate`, returning `(prefix_len_trimmed, trimmed_ref,
/// trimmed_alt)`.
fn trim_common(reference: &str, alternate: &str) -> (usize, String, String) {
    let mut r: Vec<char> = reference.chars().collect();
    let mut a: Vec<char> = alternate.chars().collect();

    while !r.is_empty() && !a.is_empty() && r.last() == a.last() {
        r.pop();
        a.pop();
    }

    let mut prefix_len = 0;
    while !r.is_empty() && !a.is_empty() && r[0] == a[0] {
        r.remove(0);
        a.remove(0);
        prefix_len += 1;
    }

    (prefix_len, r.into_iter().collect(), a.into_iter().collect())
}

/// The reverse conversion always fails: reconstructing a VCF
/// `CHROM-POS-REF-ALT` key from an Ensembl region/allele pair requires
/// reference bases that are not present in the region/allele form itself
/// (spec.md §4.1).
pub fn ensembl_to_vcf(region: &str, allele: &str) -> Result<VariantKey, CodecError> {
    Err(CodecError::Unsupported(
        region.to_string(),
        allele.to_string(),
    ))
}

/// Matches a canonical `CHROM-POS-REF-ALT` variant key, `chr` prefix
/// permitted, case-insensitive. Used by [`crate::annotation::batch`] to
/// classify inputs as "already canonical" versus "needs recoding."
pub fn canonical_variant_key_regex() -> &'static Regex {
    static RE: OnceRegex = OnceRegex::new(r"(?i)^(chr)?[0-9XYM]+-\d+-[ACGT]+-[ACGT]+$");
    RE.get()
}

pub fn is_canonical_variant_key(input: &str) -> bool {
    canonical_variant_key_regex().is_match(input)
}

/// A tiny once-initialized regex cell, avoiding a dependency on
/// `once_cell`/`lazy_static` for a single use site.
mod once_cell_like {
    use regex::Regex;
    use std::sync::OnceLock;

    pub struct OnceRegex {
        cell: OnceLock<Regex>,
        pattern: &'static str,
    }

    impl OnceRegex {
        pub const fn new(pattern: &'static str) -> Self {
            OnceRegex {
                cell: OnceLock::new(),
                pattern,
            }
        }

        pub fn get(&self) -> &Regex {
            self.cell
                .get_or_init(|| Regex::new(self.pattern).expect("invalid regex literal"))
        }
    }
}
