//! Pattern Deducer (C8): from per-variant genotypes plus an optional
//! pedigree/trio map and chromosome, emits every inheritance pattern
//! consistent with the observed genotypes (spec.md §4.8).

use std::collections::HashMap;

use crate::genotype::{is_het, is_hom_alt, is_missing, is_ref, is_variant};
use crate::inheritance::model::{Pattern, SampleRoles};
use crate::pedigree::{AffectedStatus, PedigreeEntry, Sex};

fn is_x_chromosome(chrom: &str) -> bool {
    chrom.trim_start_matches("chr").eq_ignore_ascii_case("x")
}

/// Mode selection plus dispatch (spec.md §4.8): PED mode, explicit trio,
/// default trio, single sample, in that priority order.
pub fn deduce(
    genotypes: &HashMap<String, String>,
    sample_order: &[String],
    pedigree: Option<&HashMap<String, PedigreeEntry>>,
    sample_roles: Option<&SampleRoles>,
    chrom: &str,
) -> Vec<Pattern> {
    let is_x = is_x_chromosome(chrom);

    if let Some(pedigree) = pedigree {
        if pedigree_covers_any_genotyped_sample(genotypes, pedigree) {
            return deduce_ped_mode(genotypes, pedigree, is_x);
        }
    }

    if let Some(roles) = sample_roles {
        if let (Some(index), Some(mother), Some(father)) =
            (&roles.index, &roles.mother, &roles.father)
        {
            if let Some(index_gt) = genotypes.get(index) {
                return deduce_trio_like(
                    index_gt,
                    genotypes.get(mother).map(String::as_str),
                    genotypes.get(father).map(String::as_str),
                    None,
                    is_x,
                );
            }
        }
    }

    let genotyped_in_order: Vec<&String> = sample_order
        .iter()
        .filter(|sample| genotypes.contains_key(*sample))
        .collect();

    if genotyped_in_order.len() >= 3 {
        let index = genotyped_in_order[0];
        let mother = genotyped_in_order[1];
        let father = genotyped_in_order[2];
        return deduce_trio_like(
            &genotypes[index],
            Some(genotypes[mother].as_str()),
            Some(genotypes[father].as_str()),
            None,
            is_x,
        );
    }

    if genotyped_in_order.len() == 1 {
        return deduce_single(&genotypes[genotyped_in_order[0]], is_x);
    }

    vec![Pattern::UnknownInsufficientData]
}

fn pedigree_covers_any_genotyped_sample(
    genotypes: &HashMap<String, String>,
    pedigree: &HashMap<String, PedigreeEntry>,
) -> bool {
    genotypes.keys().any(|sample| pedigree.contains_key(sample))
}

/// Shared trio-rule evaluation (spec.md §4.8 rule table), used directly
/// by explicit-trio/default-trio mode and, per affected individual, by
/// PED mode. `index_sex` is `Some` only in PED mode, where the pedigree
/// actually records sex; trio modes fall back to the zygosity-only X
/// rules (see DESIGN.md for this simplification).
fn candidate_patterns(
    index_gt: &str,
    mother_gt: Option<&str>,
    father_gt: Option<&str>,
    index_sex: Option<Sex>,
    is_x: bool,
) -> Vec<Pattern> {
    let mut out = Vec::new();

    let i_homalt = is_hom_alt(index_gt);

    let m_present = mother_gt.is_some();
    let f_present = father_gt.is_some();
    let m_missing = mother_gt.map(is_missing).unwrap_or(true);
    let f_missing = father_gt.map(is_missing).unwrap_or(true);
    let m_ref = mother_gt.map(is_ref).unwrap_or(false);
    let f_ref = father_gt.map(is_ref).unwrap_or(false);
    let m_het = mother_gt.map(is_het).unwrap_or(false);
    let f_het = father_gt.map(is_het).unwrap_or(false);
    let m_variant = mother_gt.map(is_variant).unwrap_or(false);
    let f_variant = father_gt.map(is_variant).unwrap_or(false);

    let both_known = m_present && f_present && !m_missing && !f_missing;

    // de_novo / de_novo_candidate
    if both_known && m_ref && f_ref {
        out.push(Pattern::DeNovo);
    } else if (m_ref && f_missing && f_present) || (f_ref && m_missing && m_present) {
        out.push(Pattern::DeNovoCandidate);
    }

    // autosomal_recessive / _possible
    if i_homalt {
        if both_known && m_het && f_het {
            out.push(Pattern::AutosomalRecessive);
        } else if (m_het && f_missing && f_present) || (f_het && m_missing && m_present) {
            out.push(Pattern::AutosomalRecessivePossible);
        }
    }

    // autosomal_dominant / _possible
    if both_known && (m_variant || f_variant) {
        out.push(Pattern::AutosomalDominant);
    } else if (m_missing && m_present && f_variant) || (f_missing && f_present && m_variant) {
        out.push(Pattern::AutosomalDominantPossible);
    }

    // X-linked rules only apply on the X chromosome.
    if is_x {
        let female_path = i_homalt && m_variant && f_variant;
        let male_path = match index_sex {
            Some(Sex::Male) => is_variant(index_gt) && m_variant && f_ref,
            Some(Sex::Female) => false,
            None => is_variant(index_gt) && m_variant && f_ref,
        };
        if female_path || male_path {
            out.push(Pattern::XLinkedRecessive);
        }

        let maternal_transmission = is_variant(index_gt) && m_variant;
        let paternal_to_son_contradiction =
            matches!(index_sex, Some(Sex::Male)) && f_variant && !m_variant;
        let paternal_to_daughter =
            matches!(index_sex, Some(Sex::Female)) && f_variant && !m_variant;

        if paternal_to_daughter {
            out.push(Pattern::XLinkedDominant);
        } else if maternal_transmission && !paternal_to_son_contradiction {
            out.push(Pattern::XLinkedDominant);
        }
    }

    out
}

fn deduce_trio_like(
    index_gt: &str,
    mother_gt: Option<&str>,
    father_gt: Option<&str>,
    index_sex: Option<Sex>,
    is_x: bool,
) -> Vec<Pattern> {
    if is_missing(index_gt) {
        return vec![Pattern::UnknownMissingGenotype];
    }
    if is_ref(index_gt) {
        return vec![Pattern::Reference];
    }

    let patterns = candidate_patterns(index_gt, mother_gt, father_gt, index_sex, is_x);
    if patterns.is_empty() {
        vec![Pattern::NonMendelian]
    } else {
        patterns
    }
}

fn deduce_single(genotype: &str, is_x: bool) -> Vec<Pattern> {
    if is_missing(genotype) {
        return vec![Pattern::UnknownMissingGenotype];
    }
    if is_ref(genotype) {
        return vec![Pattern::Reference];
    }

    let mut out = if is_hom_alt(genotype) {
        vec![Pattern::Homozygous]
    } else {
        vec![Pattern::Dominant]
    };
    if is_x {
        out.push(Pattern::PotentialXLinked);
    }
    out
}

fn deduce_ped_mode(
    genotypes: &HashMap<String, String>,
    pedigree: &HashMap<String, PedigreeEntry>,
    is_x: bool,
) -> Vec<Pattern> {
    let mut affected: Vec<&PedigreeEntry> = Vec::new();
    let mut unaffected: Vec<&PedigreeEntry> = Vec::new();

    for (sample_id, entry) in pedigree {
        if !genotypes.contains_key(sample_id) {
            continue;
        }
        match entry.affected_status {
            AffectedStatus::Affected => affected.push(entry),
            AffectedStatus::Unaffected => unaffected.push(entry),
            AffectedStatus::Unknown => {}
        }
    }

    let anyone_variant = genotypes.values().any(|gt| is_variant(gt));
    if !anyone_variant {
        return vec![Pattern::Reference];
    }

    let affected_with_genotype = affected.iter().any(|entry| {
        genotypes
            .get(&entry.sample_id)
            .map(|gt| !is_missing(gt))
            .unwrap_or(false)
    });
    if !affected_with_genotype {
        return vec![Pattern::UnknownNoAffectedWithGenotype];
    }

    let mut consistent: Vec<Pattern> = Vec::new();
    let mut push_unique = |pattern: Pattern, out: &mut Vec<Pattern>| {
        if !out.contains(&pattern) {
            out.push(pattern);
        }
    };

    for entry in &affected {
        let Some(gt) = genotypes.get(&entry.sample_id) else {
            continue;
        };
        if is_missing(gt) || is_ref(gt) {
            // ref/missing affected individuals don't themselves yield a
            // candidate pattern; they're picked up by the
            // incomplete_segregation check below.
            continue;
        }

        let mother_gt = entry
            .mother_id
            .as_ref()
            .and_then(|mother| genotypes.get(mother))
            .map(String::as_str);
        let father_gt = entry
            .father_id
            .as_ref()
            .and_then(|father| genotypes.get(father))
            .map(String::as_str);

        for pattern in candidate_patterns(gt, mother_gt, father_gt, Some(entry.sex), is_x) {
            push_unique(pattern, &mut consistent);
        }
    }

    if consistent.is_empty() {
        consistent.push(Pattern::UnknownWithMissingData);
    }

    let dominant_consistent = consistent.iter().any(|p| {
        matches!(
            p,
            Pattern::AutosomalDominant | Pattern::AutosomalDominantPossible | Pattern::XLinkedDominant
        )
    });
    let unaffected_carrier_exists = unaffected.iter().any(|entry| {
        genotypes
            .get(&entry.sample_id)
            .map(|gt| is_variant(gt))
            .unwrap_or(false)
    });
    if dominant_consistent && unaffected_carrier_exists {
        push_unique(Pattern::IncompletePenetrance, &mut consistent);
    }

    let affected_lacking_variant = affected.iter().any(|entry| {
        genotypes
            .get(&entry.sample_id)
            .map(|gt| !is_missing(gt) && !is_variant(gt))
            .unwrap_or(false)
    });
    if affected_lacking_variant {
        push_unique(Pattern::IncompleteSegregation, &mut consistent);
    }

    consistent
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gts(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(sample, gt)| (sample.to_string(), gt.to_string()))
            .collect()
    }

    #[test]
    fn trio_de_novo() {
        let genotypes = gts(&[("Index", "0/1"), ("Mother", "0/0"), ("Father", "0/0")]);
        let order = vec!["Index".to_string(), "Mother".to_string(), "Father".to_string()];
        let patterns = deduce(&genotypes, &order, None, None, "1");
        assert_eq!(patterns, vec![Pattern::DeNovo]);
    }

    #[test]
    fn trio_autosomal_recessive() {
        let genotypes = gts(&[("Index", "1/1"), ("Mother", "0/1"), ("Father", "0/1")]);
        let order = vec!["Index".to_string(), "Mother".to_string(), "Father".to_string()];
        let patterns = deduce(&genotypes, &order, None, None, "1");
        assert_eq!(patterns, vec![Pattern::AutosomalRecessive]);
    }

    #[test]
    fn explicit_sample_map_is_used_over_default_order() {
        use crate::inheritance::model::SampleRoles;
        let genotypes = gts(&[
            ("Child", "0/1"),
            ("Mom", "0/0"),
            ("Dad", "0/0"),
            ("Sibling", "0/0"),
        ]);
        let roles = SampleRoles {
            index: Some("Child".to_string()),
            mother: Some("Mom".to_string()),
            father: Some("Dad".to_string()),
        };
        let order = vec![
            "Sibling".to_string(),
            "Mom".to_string(),
            "Dad".to_string(),
            "Child".to_string(),
        ];
        let patterns = deduce(&genotypes, &order, None, Some(&roles), "1");
        assert_eq!(patterns, vec![Pattern::DeNovo]);
    }

    #[test]
    fn single_sample_het_is_dominant() {
        let genotypes = gts(&[("S1", "0/1")]);
        let order = vec!["S1".to_string()];
        let patterns = deduce(&genotypes, &order, None, None, "1");
        assert_eq!(patterns, vec![Pattern::Dominant]);
    }

    #[test]
    fn single_sample_on_x_flags_potential_x_linked() {
        let genotypes = gts(&[("S1", "1/1")]);
        let order = vec!["S1".to_string()];
        let patterns = deduce(&genotypes, &order, None, None, "X");
        assert_eq!(patterns, vec![Pattern::Homozygous, Pattern::PotentialXLinked]);
    }

    #[test]
    fn missing_single_genotype_is_unknown() {
        let genotypes = gts(&[("S1", "./.")]);
        let order = vec!["S1".to_string()];
        let patterns = deduce(&genotypes, &order, None, None, "1");
        assert_eq!(patterns, vec![Pattern::UnknownMissingGenotype]);
    }

    #[test]
    fn reference_trio_yields_reference() {
        let genotypes = gts(&[("Index", "0/0"), ("Mother", "0/0"), ("Father", "0/0")]);
        let order = vec!["Index".to_string(), "Mother".to_string(), "Father".to_string()];
        let patterns = deduce(&genotypes, &order, None, None, "1");
        assert_eq!(patterns, vec![Pattern::Reference]);
    }

    #[test]
    fn ped_mode_reference_when_no_one_carries_variant() {
        let mut pedigree = HashMap::new();
        pedigree.insert(
            "Index".to_string(),
            PedigreeEntry {
                family_id: "FAM".to_string(),
                sample_id: "Index".to_string(),
                father_id: None,
                mother_id: None,
                sex: Sex::Male,
                affected_status: AffectedStatus::Affected,
            },
        );
        let genotypes = gts(&[("Index", "0/0")]);
        let order = vec!["Index".to_string()];
        let patterns = deduce(&genotypes, &order, Some(&pedigree), None, "1");
        assert_eq!(patterns, vec![Pattern::Reference]);
    }

    #[test]
    fn ped_mode_flags_incomplete_segregation_when_an_affected_lacks_the_variant() {
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
        pedigree.insert(
            "Sibling".to_string(),
            PedigreeEntry {
                family_id: "FAM".to_string(),
                sample_id: "Sibling".to_string(),
                father_id: Some("Father".to_string()),
                mother_id: Some("Mother".to_string()),
                sex: Sex::Female,
                affected_status: AffectedStatus::Affected,
            },
        );
        pedigree.insert(
            "Mother".to_string(),
            PedigreeEntry {
                family_id: "FAM".to_string(),
                sample_id: "Mother".to_string(),
                father_id: None,
                mother_id: None,
                sex: Sex::Female,
                affected_status: AffectedStatus::Unaffected,
            },
        );
        pedigree.insert(
            "Father".to_string(),
            PedigreeEntry {
                family_id: "FAM".to_string(),
                sample_id: "Father".to_string(),
                father_id: None,
                mother_id: None,
                sex: Sex::Male,
                affected_status: AffectedStatus::Unaffected,
            },
        );

        let genotypes = gts(&[
            ("Index", "0/1"),
            ("Sibling", "0/0"),
            ("Mother", "0/1"),
            ("Father", "0/0"),
        ]);
        let order = vec![
            "Index".to_string(),
            "Sibling".to_string(),
            "Mother".to_string(),
            "Father".to_string(),
        ];
        let patterns = deduce(&genotypes, &order, Some(&pedigree), None, "1");
        assert!(patterns.contains(&Pattern::IncompleteSegregation));
        assert!(patterns.contains(&Pattern::AutosomalDominant));
    }
}
