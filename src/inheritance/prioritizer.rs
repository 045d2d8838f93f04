//! Pattern Prioritizer (C10): ranks candidate patterns against
//! segregation evidence into the single `prioritizedPattern` spec.md §3
//! requires every [`InheritanceResult`](crate::inheritance::model::InheritanceResult)
//! to carry (spec.md §4.10).

use std::collections::HashMap;

use crate::inheritance::model::{Pattern, SegregationStatus};

/// Base rank (lower wins) per spec.md §4.10's ordering:
/// `de_novo > compound_heterozygous > autosomal_recessive >
/// x_linked_recessive > x_linked_dominant > autosomal_dominant > any
/// *_possible variants > reference > non_mendelian > unknown_*`.
fn base_rank(pattern: Pattern) -> u16 {
    match pattern {
        Pattern::DeNovo => 0,
        Pattern::CompoundHeterozygous => 1,
        Pattern::AutosomalRecessive => 2,
        Pattern::XLinkedRecessive => 3,
        Pattern::XLinkedDominant => 4,
        Pattern::AutosomalDominant => 5,
        Pattern::DeNovoCandidate
        | Pattern::AutosomalRecessivePossible
        | Pattern::AutosomalDominantPossible
        | Pattern::CompoundHeterozygousPossible => 6,
        Pattern::Reference => 7,
        Pattern::NonMendelian => 8,
        // unknown_*, and the remaining observational/flag patterns
        // (dominant, homozygous, potential_x_linked, incomplete_*) —
        // none of these are ever themselves a prioritized-pattern
        // candidate in practice (dominant/homozygous only arise in
        // single-sample mode, where there's nothing to prioritize
        // against; the incomplete_* flags are appended alongside a
        // chosen pattern, never standing in for one) but are ranked
        // last for completeness.
        _ => 9,
    }
}

/// A rank one tier below `_possible` (base rank 6) but still ahead of
/// `reference` (7) — spec.md §4.10: "does_not_segregate demotes that
/// specific candidate below `_possible` variants."
const DOES_NOT_SEGREGATE_RANK: u16 = 65;

fn rank(pattern: Pattern, segregation: Option<SegregationStatus>) -> u16 {
    if segregation == Some(SegregationStatus::DoesNotSegregate) {
        DOES_NOT_SEGREGATE_RANK
    } else {
        base_rank(pattern) * 10
    }
}

/// Selects one pattern from `candidates` (spec.md §4.10). Deterministic:
/// ties in rank are broken by the candidates' original order, which is
/// itself deterministic given the same genotypes/pedigree (spec.md §8).
pub fn prioritize(
    candidates: &[Pattern],
    segregation: &HashMap<Pattern, SegregationStatus>,
) -> Pattern {
    candidates
        .iter()
        .copied()
        .min_by_key(|pattern| rank(*pattern, segregation.get(pattern).copied()))
        .unwrap_or(Pattern::UnknownInsufficientData)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn de_novo_outranks_autosomal_dominant() {
        let candidates = vec![Pattern::AutosomalDominant, Pattern::DeNovo];
        let segregation = HashMap::new();
        assert_eq!(prioritize(&candidates, &segregation), Pattern::DeNovo);
    }

    #[test]
    fn does_not_segregate_demotes_below_possible_forms() {
        let candidates = vec![Pattern::AutosomalDominant, Pattern::AutosomalDominantPossible];
        let mut segregation = HashMap::new();
        segregation.insert(Pattern::AutosomalDominant, SegregationStatus::DoesNotSegregate);

        assert_eq!(
            prioritize(&candidates, &segregation),
            Pattern::AutosomalDominantPossible
        );
    }

    #[test]
    fn empty_candidates_falls_back_to_unknown_insufficient_data() {
        let segregation = HashMap::new();
        assert_eq!(prioritize(&[], &segregation), Pattern::UnknownInsufficientData);
    }

    #[test]
    fn compound_het_outranks_autosomal_recessive() {
        let candidates = vec![Pattern::AutosomalRecessive, Pattern::CompoundHeterozygous];
        let segregation = HashMap::new();
        assert_eq!(
            prioritize(&candidates, &segregation),
            Pattern::CompoundHeterozygous
        );
    }
}
