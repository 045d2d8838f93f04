//! Compound-Het Analyzer (C11): given the variants of one gene, the
//! genotype matrix, an optional pedigree, and an index sample, determines
//! whether two or more heterozygous variants form a confirmed or
//! possible compound-heterozygous pair (spec.md §4.11).

use std::collections::{BTreeSet, HashMap};

use crate::genotype::{is_missing_opt, is_ref_opt, is_variant_opt};
use crate::inheritance::model::{CompHetDetails, CompHetStatus};
use crate::pedigree::PedigreeEntry;

fn possible(
    status: CompHetStatus,
    gene_symbol: &str,
    het_variants: &[String],
) -> CompHetDetails {
    CompHetDetails {
        status,
        is_candidate: false,
        is_possible: true,
        gene_symbol: gene_symbol.to_string(),
        partner_variant_keys: het_variants.iter().cloned().collect(),
        likely_paternal_keys: BTreeSet::new(),
        likely_maternal_keys: BTreeSet::new(),
        ambiguous_keys: het_variants.iter().cloned().collect(),
        error: None,
    }
}

/// Runs C11 for one gene's variant group. Returns `None` when fewer than
/// two variants are heterozygous in the index sample (spec.md §4.11 step
/// 1: "require ≥2").
pub fn analyze_compound_het(
    gene_symbol: &str,
    variant_keys: &[String],
    genotypes_by_variant: &HashMap<String, HashMap<String, String>>,
    pedigree: Option<&HashMap<String, PedigreeEntry>>,
    index_sample: &str,
) -> Option<CompHetDetails> {
    let het_variants: Vec<String> = variant_keys
        .iter()
        .filter(|key| {
            genotypes_by_variant
                .get(*key)
                .and_then(|sample_gts| sample_gts.get(index_sample))
                .map(|gt| crate::genotype::is_het(gt))
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    if het_variants.len() < 2 {
        return None;
    }

    let Some(pedigree) = pedigree else {
        return Some(possible(CompHetStatus::PossibleNoPedigree, gene_symbol, &het_variants));
    };

    let Some(index_entry) = pedigree.get(index_sample) else {
        return Some(possible(
            CompHetStatus::PossibleMissingParents,
            gene_symbol,
            &het_variants,
        ));
    };

    let (Some(father_id), Some(mother_id)) = (&index_entry.father_id, &index_entry.mother_id) else {
        return Some(possible(
            CompHetStatus::PossibleMissingParents,
            gene_symbol,
            &het_variants,
        ));
    };

    let neither_parent_genotyped_anywhere = het_variants.iter().all(|key| {
        let sample_gts = &genotypes_by_variant[key];
        !sample_gts.contains_key(father_id) && !sample_gts.contains_key(mother_id)
    });
    if neither_parent_genotyped_anywhere {
        return Some(possible(
            CompHetStatus::PossibleMissingParentGenotypes,
            gene_symbol,
            &het_variants,
        ));
    }

    let mut paternal = BTreeSet::new();
    let mut maternal = BTreeSet::new();
    let mut ambiguous = BTreeSet::new();

    for key in &het_variants {
        let sample_gts = &genotypes_by_variant[key];
        let father_gt = sample_gts.get(father_id).map(String::as_str);
        let mother_gt = sample_gts.get(mother_id).map(String::as_str);

        let f_variant = is_variant_opt(father_gt);
        let f_ref = is_ref_opt(father_gt);
        let f_missing = is_missing_opt(father_gt);
        let m_variant = is_variant_opt(mother_gt);
        let m_ref = is_ref_opt(mother_gt);
        let m_missing = is_missing_opt(mother_gt);

        if f_variant && m_ref {
            paternal.insert(key.clone());
        } else if m_variant && f_ref {
            maternal.insert(key.clone());
        } else if f_missing && !m_missing {
            // Tentative assignment: only the mother's status is known.
            if m_ref {
                paternal.insert(key.clone());
            } else if m_variant {
                maternal.insert(key.clone());
            } else {
                ambiguous.insert(key.clone());
            }
        } else if m_missing && !f_missing {
            if f_ref {
                maternal.insert(key.clone());
            } else if f_variant {
                paternal.insert(key.clone());
            } else {
                ambiguous.insert(key.clone());
            }
        } else {
            // Both variant, both ref, or both missing: indeterminate.
            ambiguous.insert(key.clone());
        }
    }

    let is_candidate = !paternal.is_empty() && !maternal.is_empty();

    Some(CompHetDetails {
        status: if is_candidate {
            CompHetStatus::Confirmed
        } else {
            CompHetStatus::PossibleAmbiguousOrigin
        },
        is_candidate,
        is_possible: !is_candidate,
        gene_symbol: gene_symbol.to_string(),
        partner_variant_keys: het_variants.iter().cloned().collect(),
        likely_paternal_keys: paternal,
        likely_maternal_keys: maternal,
        ambiguous_keys: ambiguous,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedigree::{AffectedStatus, Sex};

    fn pedigree_with_trio() -> HashMap<String, PedigreeEntry> {
        let mut pedigree = HashMap::new();
        pedigree.insert(
            "Index".to_string(),
            PedigreeEntry {
                family_id: "FAM".to_string(),
                sample_id: "Index".to_string(),
                father_id: Some("Father".to_string()),
                mother_id: Some("Mother".to_string()),
                sex: Sex::Male,
                affected_status: AffectedStatus::Affected,
            },
        );
        pedigree
    }

    #[test]
    fn confirms_compound_het_from_opposite_parents() {
        let mut genotypes: HashMap<String, HashMap<String, String>> = HashMap::new();
        genotypes.insert(
            "V1".to_string(),
            HashMap::from([
                ("Index".to_string(), "0/1".to_string()),
                ("Mother".to_string(), "0/1".to_string()),
                ("Father".to_string(), "0/0".to_string()),
            ]),
        );
        genotypes.insert(
            "V2".to_string(),
            HashMap::from([
                ("Index".to_string(), "0/1".to_string()),
                ("Mother".to_string(), "0/0".to_string()),
                ("Father".to_string(), "0/1".to_string()),
            ]),
        );

        let pedigree = pedigree_with_trio();
        let details = analyze_compound_het(
            "GENE",
            &["V1".to_string(), "V2".to_string()],
            &genotypes,
            Some(&pedigree),
            "Index",
        )
        .unwrap();

        assert!(details.is_candidate);
        assert_eq!(details.status, CompHetStatus::Confirmed);
        assert!(details.likely_maternal_keys.contains("V1"));
        assert!(details.likely_paternal_keys.contains("V2"));
    }

    #[test]
    fn no_pedigree_yields_possible_no_pedigree() {
        let mut genotypes: HashMap<String, HashMap<String, String>> = HashMap::new();
        genotypes.insert(
            "V1".to_string(),
            HashMap::from([("Index".to_string(), "0/1".to_string())]),
        );
        genotypes.insert(
            "V2".to_string(),
            HashMap::from([("Index".to_string(), "0/1".to_string())]),
        );

        let details = analyze_compound_het(
            "GENE",
            &["V1".to_string(), "V2".to_string()],
            &genotypes,
            None,
            "Index",
        )
        .unwrap();

        assert!(!details.is_candidate);
        assert_eq!(details.status, CompHetStatus::PossibleNoPedigree);
    }

    #[test]
    fn fewer_than_two_het_variants_yields_none() {
        let mut genotypes: HashMap<String, HashMap<String, String>> = HashMap::new();
        genotypes.insert(
            "V1".to_string(),
            HashMap::from([("Index".to_string(), "0/1".to_string())]),
        );
        genotypes.insert(
            "V2".to_string(),
            HashMap::from([("Index".to_string(), "0/0".to_string())]),
        );

        let result = analyze_compound_het(
            "GENE",
            &["V1".to_string(), "V2".to_string()],
            &genotypes,
            None,
            "Index",
        );
        assert!(result.is_none());
    }

    #[test]
    fn both_variant_parents_is_ambiguous_not_confirmed() {
        let mut genotypes: HashMap<String, HashMap<String, String>> = HashMap::new();
        genotypes.insert(
            "V1".to_string(),
            HashMap::from([
                ("Index".to_string(), "0/1".to_string()),
                ("Mother".to_string(), "0/1".to_string()),
                ("Father".to_string(), "0/1".to_string()),
            ]),
        );
        genotypes.insert(
            "V2".to_string(),
            HashMap::from([
                ("Index".to_string(), "0/1".to_string()),
                ("Mother".to_string(), "0/1".to_string()),
                ("Father".to_string(), "0/1".to_string()),
            ]),
        );

        let pedigree = pedigree_with_trio();
        let details = analyze_compound_het(
            "GENE",
            &["V1".to_string(), "V2".to_string()],
            &genotypes,
            Some(&pedigree),
            "Index",
        )
        .unwrap();

        assert!(!details.is_candidate);
        assert_eq!(details.ambiguous_keys.len(), 2);
    }
}
