//! Segregation Checker (C9): given a pattern and a pedigree, classifies
//! how well the variant's presence co-occurs with affected status among
//! genotyped family members (spec.md §4.9).

use std::collections::HashMap;

use crate::genotype::{is_missing, is_variant};
use crate::inheritance::model::{Pattern, SegregationStatus};
use crate::pedigree::{AffectedStatus, PedigreeEntry};

/// `pattern` doesn't change how the counts are computed — segregation is
/// a property of the variant against the pedigree, not of any one
/// candidate pattern — but is accepted (and logged) to match spec.md
/// §4.9's signature and so call sites read as "check segregation of
/// *this* pattern" at the orchestrator layer.
pub fn check_segregation(
    pattern: Pattern,
    genotypes: &HashMap<String, String>,
    pedigree: &HashMap<String, PedigreeEntry>,
) -> SegregationStatus {
    log::trace!("checking segregation for pattern {pattern}");

    let mut any_affected = false;
    let mut affected_with_variant = 0u32;
    let mut affected_without_variant = 0u32;

    for entry in pedigree.values() {
        if entry.affected_status != AffectedStatus::Affected {
            continue;
        }
        any_affected = true;

        let Some(gt) = genotypes.get(&entry.sample_id) else {
            continue;
        };
        if is_missing(gt) {
            continue;
        }
        if is_variant(gt) {
            affected_with_variant += 1;
        } else {
            affected_without_variant += 1;
        }
    }

    if !any_affected {
        return SegregationStatus::UnknownNoAffected;
    }
    if affected_without_variant > 0 {
        return SegregationStatus::DoesNotSegregate;
    }
    if affected_with_variant > 0 {
        return SegregationStatus::Segregates;
    }
    SegregationStatus::UnknownMissingData
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedigree::Sex;

    fn entry(sample_id: &str, affected: AffectedStatus) -> PedigreeEntry {
        PedigreeEntry {
            family_id: "FAM".to_string(),
            sample_id: sample_id.to_string(),
            father_id: None,
            mother_id: None,
            sex: Sex::Unknown,
            affected_status: affected,
        }
    }

    #[test]
    fn segregates_when_every_genotyped_affected_carries_the_variant() {
        let mut pedigree = HashMap::new();
        pedigree.insert("A".to_string(), entry("A", AffectedStatus::Affected));
        pedigree.insert("B".to_string(), entry("B", AffectedStatus::Affected));
        let mut genotypes = HashMap::new();
        genotypes.insert("A".to_string(), "0/1".to_string());
        genotypes.insert("B".to_string(), "0/1".to_string());

        assert_eq!(
            check_segregation(Pattern::AutosomalDominant, &genotypes, &pedigree),
            SegregationStatus::Segregates
        );
    }

    #[test]
    fn does_not_segregate_when_one_affected_lacks_the_variant() {
        let mut pedigree = HashMap::new();
        pedigree.insert("A".to_string(), entry("A", AffectedStatus::Affected));
        pedigree.insert("B".to_string(), entry("B", AffectedStatus::Affected));
        let mut genotypes = HashMap::new();
        genotypes.insert("A".to_string(), "0/1".to_string());
        genotypes.insert("B".to_string(), "0/0".to_string());

        assert_eq!(
            check_segregation(Pattern::AutosomalDominant, &genotypes, &pedigree),
            SegregationStatus::DoesNotSegregate
        );
    }

    #[test]
    fn unknown_no_affected_when_pedigree_has_none() {
        let mut pedigree = HashMap::new();
        pedigree.insert("A".to_string(), entry("A", AffectedStatus::Unaffected));
        let genotypes = HashMap::new();

        assert_eq!(
            check_segregation(Pattern::AutosomalDominant, &genotypes, &pedigree),
            SegregationStatus::UnknownNoAffected
        );
    }

    #[test]
    fn unknown_missing_data_when_affected_genotypes_are_all_missing() {
        let mut pedigree = HashMap::new();
        pedigree.insert("A".to_string(), entry("A", AffectedStatus::Affected));
        let mut genotypes = HashMap::new();
        genotypes.insert("A".to_string(), "./.".to_string());

        assert_eq!(
            check_segregation(Pattern::AutosomalDominant, &genotypes, &pedigree),
            SegregationStatus::UnknownMissingData
        );
    }
}
