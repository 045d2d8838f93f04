//! Genotype Classifier (C7).
//!
//! A handful of boolean predicates over a raw genotype string
//! (`A[DELIM]B`, `DELIM ∈ {/, |, -}`) used throughout [`crate::inheritance`]
//! to test Mendelian rules without re-deriving allele parsing at every call
//! site (spec.md §4.7).

use std::sync::OnceLock;

use regex::Regex;

fn genotype_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9.]+)[/|-]([0-9.]+)$").expect("invalid genotype regex literal")
    })
}

/// Splits a genotype string into its two allele substrings, or `None` if
/// it does not match the `A[DELIM]B` shape at all.
fn alleles(genotype: &str) -> Option<(&str, &str)> {
    let captures = genotype_regex().captures(genotype.trim())?;
    let first = captures.get(1)?.as_str();
    let second = captures.get(2)?.as_str();
    Some((first, second))
}

/// Matches `./.`, `.|.`, `.-.`, or any genotype string containing a `.` at
/// all (spec.md §4.7: missing is "any string containing `.`").
pub fn is_missing(genotype: &str) -> bool {
    genotype.contains('.')
}

/// Both alleles are the reference allele (`0`).
pub fn is_ref(genotype: &str) -> bool {
    if is_missing(genotype) {
        return false;
    }
    match alleles(genotype) {
        Some((a, b)) => a == "0" && b == "0",
        None => false,
    }
}

/// Exactly two distinct, non-missing alleles (excludes `0/0` and `1/1`,
/// and anything homozygous for a non-reference allele).
pub fn is_het(genotype: &str) -> bool {
    if is_missing(genotype) {
        return false;
    }
    match alleles(genotype) {
        Some((a, b)) => a != b,
        None => false,
    }
}

/// Both alleles identical and non-reference (e.g. `1/1`, `2/2`).
pub fn is_hom_alt(genotype: &str) -> bool {
    if is_missing(genotype) {
        return false;
    }
    match alleles(genotype) {
        Some((a, b)) => a == b && a != "0",
        None => false,
    }
}

/// Carries at least one non-reference allele (het or hom-alt).
pub fn is_variant(genotype: &str) -> bool {
    is_het(genotype) || is_hom_alt(genotype)
}

/// Same as [`is_missing`]/[`is_variant`] but operating on an
/// `Option<&str>`, treating an absent genotype (sample not declared for
/// this variant) the same as an explicit `./.` — used by
/// [`crate::inheritance::comphet`] when a parent's genotype at a
/// particular variant may simply not be present in the matrix.
pub fn is_missing_opt(genotype: Option<&str>) -> bool {
    genotype.map(is_missing).unwrap_or(true)
}

pub fn is_ref_opt(genotype: Option<&str>) -> bool {
    genotype.map(is_ref).unwrap_or(false)
}

pub fn is_variant_opt(genotype: Option<&str>) -> bool {
    genotype.map(is_variant).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0/0", false, true, false, false)]
    #[case("0|0", false, true, false, false)]
    #[case("0/1", true, false, false, true)]
    #[case("1|0", true, false, false, true)]
    #[case("1/1", false, false, true, true)]
    #[case("1-1", false, false, true, true)]
    #[case("./.", false, false, false, false)]
    #[case(".|.", false, false, false, false)]
    #[case(".-.", false, false, false, false)]
    #[case("0/.", false, false, false, false)]
    fn classifies_across_delimiters(
        #[case] genotype: &str,
        #[case] expected_het: bool,
        #[case] expected_ref: bool,
        #[case] expected_hom_alt: bool,
        #[case] expected_variant: bool,
    ) {
        assert_eq!(is_het(genotype), expected_het, "is_het({genotype})");
        assert_eq!(is_ref(genotype), expected_ref, "is_ref({genotype})");
        assert_eq!(is_hom_alt(genotype), expected_hom_alt, "is_hom_alt({genotype})");
        assert_eq!(is_variant(genotype), expected_variant, "is_variant({genotype})");
    }

    #[test]
    fn missing_matches_any_dot_containing_string() {
        assert!(is_missing("./."));
        assert!(is_missing(".|."));
        assert!(is_missing(".-."));
        assert!(is_missing("0/."));
        assert!(!is_missing("0/1"));
    }

    #[test]
    fn multiallelic_alleles_beyond_one_are_not_hom_alt_or_het_confused() {
        assert!(is_het("1/2"));
        assert!(!is_hom_alt("1/2"));
        assert!(is_hom_alt("2/2"));
    }

    #[test]
    fn absent_genotype_option_behaves_like_missing() {
        assert!(is_missing_opt(None));
        assert!(!is_ref_opt(None));
        assert!(!is_variant_opt(None));
        assert!(is_variant_opt(Some("0/1")));
    }
}
