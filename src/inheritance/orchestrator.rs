//! Inheritance Orchestrator (C12): the two-pass driver combining C8–C11.
//! Pass 1 deduces and prioritizes a per-variant pattern; pass 2 groups by
//! gene and layers compound-heterozygous evidence on top (spec.md §4.12).

use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::annotation::AnnotatedVariant;
use crate::codec::VariantKey;
use crate::config::PipelineConfig;
use crate::inheritance::comphet::analyze_compound_het;
use crate::inheritance::deducer::deduce;
use crate::inheritance::model::{
    CompHetDetails, InheritanceResult, Pattern, SampleRoles, SegregationStatus,
};
use crate::inheritance::prioritizer::prioritize;
use crate::inheritance::segregation::check_segregation;
use crate::pedigree::{AffectedStatus, PedigreeEntry};
use crate::vcf::GenotypeMatrix;

/// Runs the full two-pass analysis over `annotated`, attaching an
/// [`InheritanceResult`] to every variant for which genotype data was
/// available. Variants with no entry in `genotypes` (non-VCF inputs, or
/// inputs that failed annotation) are left untouched.
pub fn run_inheritance_analysis(
    annotated: &mut [AnnotatedVariant],
    genotypes: &GenotypeMatrix,
    sample_order: &[String],
    pedigree: Option<&HashMap<String, PedigreeEntry>>,
    sample_roles: Option<&SampleRoles>,
    config: &PipelineConfig,
) {
    let index_sample = determine_index_sample(sample_roles, pedigree, sample_order);

    // Pass 1: per-variant pattern deduction, segregation check, and
    // prioritization.
    let mut results: HashMap<String, InheritanceResult> = HashMap::new();
    for variant in annotated.iter() {
        if variant.error.is_some() {
            continue;
        }
        let Ok(variant_key) = VariantKey::parse(&variant.variant_key) else {
            continue;
        };
        let Some(sample_genotypes) = genotypes.get(&variant_key) else {
            continue;
        };

        let candidates = deduce(
            sample_genotypes,
            sample_order,
            pedigree,
            sample_roles,
            variant_key.chrom(),
        );

        let mut segregation_status: HashMap<Pattern, SegregationStatus> = HashMap::new();
        if let Some(pedigree) = pedigree {
            for pattern in candidates.iter().filter(|p| p.is_segregation_testable()) {
                segregation_status.insert(
                    *pattern,
                    check_segregation(*pattern, sample_genotypes, pedigree),
                );
            }
        }

        let prioritized_pattern = prioritize(&candidates, &segregation_status);

        results.insert(
            variant.variant_key.clone(),
            InheritanceResult {
                prioritized_pattern,
                possible_patterns: candidates.into_iter().collect::<BTreeSet<_>>(),
                segregation_status,
                comp_het_details: None,
                error: None,
            },
        );
    }

    debug!("inheritance pass 1 complete: {} variants classified", results.len());

    // Pass 2: group by gene, layer compound-het evidence over pass 1.
    if let Some(index_sample) = &index_sample {
        apply_compound_het_pass(annotated, &mut results, genotypes, pedigree, index_sample, config);
    }

    debug!("inheritance pass 2 (compound heterozygosity) complete");

    for variant in annotated.iter_mut() {
        if let Some(result) = results.remove(&variant.variant_key) {
            variant.inheritance = Some(result);
        }
    }
}

fn determine_index_sample(
    sample_roles: Option<&SampleRoles>,
    pedigree: Option<&HashMap<String, PedigreeEntry>>,
    sample_order: &[String],
) -> Option<String> {
    if let Some(roles) = sample_roles {
        if let Some(index) = &roles.index {
            return Some(index.clone());
        }
    }
    if let Some(pedigree) = pedigree {
        for sample in sample_order {
            if let Some(entry) = pedigree.get(sample) {
                if entry.affected_status == AffectedStatus::Affected {
                    return Some(sample.clone());
                }
            }
        }
    }
    sample_order.first().cloned()
}

fn primary_gene_symbol(variant: &AnnotatedVariant) -> String {
    variant
        .transcript_consequences
        .iter()
        .find(|tc| tc.pick == Some(1))
        .and_then(|tc| tc.gene_symbol.clone())
        .or_else(|| {
            variant
                .transcript_consequences
                .iter()
                .find_map(|tc| tc.gene_symbol.clone())
        })
        .unwrap_or_else(|| format!("NO_GENE_{}", variant.seq_region_name.clone().unwrap_or_default()))
}

/// Confirmed-strong patterns a confirmed CompHet call will not override
/// (spec.md §4.12).
fn is_strong_against_confirmed_comphet(pattern: Pattern) -> bool {
    matches!(
        pattern,
        Pattern::DeNovo
            | Pattern::AutosomalRecessive
            | Pattern::XLinkedRecessive
            | Pattern::CompoundHeterozygous
    )
}

/// The full confirmed-Mendelian tier a *possible* CompHet call will not
/// override (spec.md §4.12: only "weak/unknown" patterns are overridden).
fn is_confirmed_mendelian(pattern: Pattern) -> bool {
    matches!(
        pattern,
        Pattern::DeNovo
            | Pattern::AutosomalRecessive
            | Pattern::AutosomalDominant
            | Pattern::XLinkedRecessive
            | Pattern::XLinkedDominant
            | Pattern::CompoundHeterozygous
    )
}

fn apply_compound_het_pass(
    annotated: &[AnnotatedVariant],
    results: &mut HashMap<String, InheritanceResult>,
    genotypes: &GenotypeMatrix,
    pedigree: Option<&HashMap<String, PedigreeEntry>>,
    index_sample: &str,
    config: &PipelineConfig,
) {
    let mut genes: HashMap<String, Vec<String>> = HashMap::new();
    for variant in annotated {
        if variant.error.is_some() {
            continue;
        }
        let gene = primary_gene_symbol(variant);
        if gene.starts_with("NO_GENE_") {
            continue;
        }
        genes.entry(gene).or_default().push(variant.variant_key.clone());
    }

    // A by-string genotype lookup keyed on the same VariantKey strings
    // used throughout `results`/`genes`, built once for C11.
    let mut genotypes_by_key: HashMap<String, HashMap<String, String>> = HashMap::new();
    for (key, sample_gts) in genotypes {
        genotypes_by_key.insert(key.to_string(), sample_gts.clone());
    }

    for (gene, variant_keys) in genes {
        if variant_keys.len() < 2 {
            continue;
        }

        let details = match analyze_compound_het(
            &gene,
            &variant_keys,
            &genotypes_by_key,
            pedigree,
            index_sample,
        ) {
            Some(details) => details,
            None => continue,
        };

        for key in &details.partner_variant_keys {
            let Some(result) = results.get_mut(key) else {
                continue;
            };

            let mut per_variant_details = details.clone();
            per_variant_details.partner_variant_keys = details.partners_excluding(key);

            if details.is_candidate {
                let current = result.prioritized_pattern;
                let overrides = if is_strong_against_confirmed_comphet(current) {
                    false
                } else if current == Pattern::AutosomalDominant {
                    config.comphet_overrides_dominant
                } else {
                    true
                };
                if overrides {
                    result.prioritized_pattern = Pattern::CompoundHeterozygous;
                }
                result.possible_patterns.insert(Pattern::CompoundHeterozygous);
            } else {
                let current = result.prioritized_pattern;
                if !is_confirmed_mendelian(current) {
                    result.prioritized_pattern = Pattern::CompoundHeterozygousPossible;
                }
                result
                    .possible_patterns
                    .insert(Pattern::CompoundHeterozygousPossible);
            }

            result.comp_het_details = Some(per_variant_details);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{InputFormat, TranscriptConsequence};

    fn variant(key: &str, gene: &str) -> AnnotatedVariant {
        AnnotatedVariant {
            variant_key: key.to_string(),
            original_input: key.to_string(),
            input_format: InputFormat::Vcf,
            seq_region_name: Some("1".to_string()),
            start: None,
            end: None,
            allele_string: None,
            most_severe_consequence: None,
            transcript_consequences: vec![TranscriptConsequence {
                gene_symbol: Some(gene.to_string()),
                pick: Some(1),
                ..Default::default()
            }],
            colocated_variants: None,
            meta: None,
            inheritance: None,
            error: None,
        }
    }

    #[test]
    fn compound_heterozygous_scenario_from_spec_example_6() {
        let v1 = VariantKey::parse("1-100-A-C").unwrap();
        let v2 = VariantKey::parse("1-200-A-C").unwrap();

        let mut genotypes: GenotypeMatrix = HashMap::new();
        genotypes.insert(
            v1.clone(),
            HashMap::from([
                ("Index".to_string(), "0/1".to_string()),
                ("Mother".to_string(), "0/1".to_string()),
                ("Father".to_string(), "0/0".to_string()),
            ]),
        );
        genotypes.insert(
            v2.clone(),
            HashMap::from([
                ("Index".to_string(), "0/1".to_string()),
                ("Mother".to_string(), "0/0".to_string()),
                ("Father".to_string(), "0/1".to_string()),
            ]),
        );

        let pedigree: HashMap<String, PedigreeEntry> = HashMap::from([(
            "Index".to_string(),
            PedigreeEntry {
                family_id: "FAM".to_string(),
                sample_id: "Index".to_string(),
                father_id: Some("Father".to_string()),
                mother_id: Some("Mother".to_string()),
                sex: crate::pedigree::Sex::Male,
                affected_status: AffectedStatus::Affected,
            },
        )]);

        let mut annotated = vec![variant("1-100-A-C", "GENE"), variant("1-200-A-C", "GENE")];
        let sample_order = vec!["Index".to_string(), "Mother".to_string(), "Father".to_string()];
        let config = PipelineConfig::default();

        run_inheritance_analysis(
            &mut annotated,
            &genotypes,
            &sample_order,
            Some(&pedigree),
            None,
            &config,
        );

        let r1 = annotated[0].inheritance.as_ref().unwrap();
        let r2 = annotated[1].inheritance.as_ref().unwrap();

        assert_eq!(r1.prioritized_pattern, Pattern::CompoundHeterozygous);
        assert_eq!(r2.prioritized_pattern, Pattern::CompoundHeterozygous);
        assert!(r1.comp_het_details.as_ref().unwrap().is_candidate);
        assert!(r1
            .comp_het_details
            .as_ref()
            .unwrap()
            .likely_maternal_keys
            .contains("1-100-A-C"));
        assert!(r2
            .comp_het_details
            .as_ref()
            .unwrap()
            .likely_paternal_keys
            .contains("1-200-A-C"));
    }

    #[test]
    fn variants_without_genotype_data_are_left_without_an_inheritance_result() {
        let mut annotated = vec![variant("1-100-A-C", "GENE")];
        let genotypes: GenotypeMatrix = HashMap::new();
        let sample_order = vec![];
        let config = PipelineConfig::default();

        run_inheritance_analysis(&mut annotated, &genotypes, &sample_order, None, None, &config);
        assert!(annotated[0].inheritance.is_none());
    }
}
