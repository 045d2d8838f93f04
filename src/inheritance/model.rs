//! Shared data model for the inheritance engine: the candidate
//! [`Pattern`] enumeration, [`SegregationStatus`], the trio role mapping
//! [`SampleRoles`], and the per-variant [`InheritanceResult`] /
//! [`CompHetDetails`] records spec.md §3 names (`InheritanceResult`,
//! `CompHetDetails`).
//!
//! Patterns are modeled as a closed enum rather than free-form strings —
//! the "ubiquitous ad-hoc objects" replacement spec.md §9 calls for —
//! while still serializing to exactly the snake_case names the spec
//! tables use, so a JSON consumer sees the same vocabulary either way.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// A candidate (or terminal) inheritance classification. Variants are
/// grouped below by the table each is defined in (spec.md §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    // Terminal / observational classifications.
    Reference,
    NonMendelian,
    Homozygous,
    Dominant,
    PotentialXLinked,

    // Trio / PED rule table (spec.md §4.8).
    DeNovo,
    DeNovoCandidate,
    AutosomalRecessive,
    AutosomalRecessivePossible,
    AutosomalDominant,
    AutosomalDominantPossible,
    XLinkedRecessive,
    XLinkedDominant,

    // Cross-variant (C11), attached by the orchestrator's pass 2.
    CompoundHeterozygous,
    CompoundHeterozygousPossible,

    // PED-mode flags, appended alongside a prioritized pattern rather
    // than competing with one (spec.md §4.8).
    IncompletePenetrance,
    IncompleteSegregation,

    // Unknown / insufficient-data terminals.
    UnknownMissingGenotype,
    UnknownWithMissingData,
    UnknownNoAffectedWithGenotype,
    /// Neither a pedigree, an explicit/default trio, nor a single sample
    /// — e.g. exactly two genotyped samples with no pedigree. Not named
    /// in spec.md's four deducer modes; see DESIGN.md for this
    /// extension.
    UnknownInsufficientData,
}

impl Pattern {
    pub fn as_str(self) -> &'static str {
        match self {
            Pattern::Reference => "reference",
            Pattern::NonMendelian => "non_mendelian",
            Pattern::Homozygous => "homozygous",
            Pattern::Dominant => "dominant",
            Pattern::PotentialXLinked => "potential_x_linked",
            Pattern::DeNovo => "de_novo",
            Pattern::DeNovoCandidate => "de_novo_candidate",
            Pattern::AutosomalRecessive => "autosomal_recessive",
            Pattern::AutosomalRecessivePossible => "autosomal_recessive_possible",
            Pattern::AutosomalDominant => "autosomal_dominant",
            Pattern::AutosomalDominantPossible => "autosomal_dominant_possible",
            Pattern::XLinkedRecessive => "x_linked_recessive",
            Pattern::XLinkedDominant => "x_linked_dominant",
            Pattern::CompoundHeterozygous => "compound_heterozygous",
            Pattern::CompoundHeterozygousPossible => "compound_heterozygous_possible",
            Pattern::IncompletePenetrance => "incomplete_penetrance",
            Pattern::IncompleteSegregation => "incomplete_segregation",
            Pattern::UnknownMissingGenotype => "unknown_missing_genotype",
            Pattern::UnknownWithMissingData => "unknown_with_missing_data",
            Pattern::UnknownNoAffectedWithGenotype => "unknown_no_affected_with_genotype",
            Pattern::UnknownInsufficientData => "unknown_insufficient_data",
        }
    }

    /// Patterns the segregation checker (C9) is meaningfully run against:
    /// the confident trio/PED Mendelian calls. Observational terminals
    /// (`reference`, `dominant`, `homozygous`, `non_mendelian`), `_possible`
    /// forms, and `unknown_*`/flag patterns are excluded, per spec.md
    /// §4.12's pass-1 description.
    pub fn is_segregation_testable(self) -> bool {
        matches!(
            self,
            Pattern::DeNovo
                | Pattern::AutosomalRecessive
                | Pattern::AutosomalDominant
                | Pattern::XLinkedRecessive
                | Pattern::XLinkedDominant
        )
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Segregation classification for one pattern against a pedigree
/// (spec.md §4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegregationStatus {
    Segregates,
    DoesNotSegregate,
    UnknownMissingData,
    UnknownNoAffected,
}

/// Explicit trio role mapping (spec.md §4.8 mode 2, "explicit trio").
#[derive(Debug, Clone, Default)]
pub struct SampleRoles {
    pub index: Option<String>,
    pub mother: Option<String>,
    pub father: Option<String>,
}

/// Per-variant inheritance analysis result, attached to
/// [`crate::annotation::AnnotatedVariant::inheritance`] by
/// [`crate::inheritance::orchestrator::run_inheritance_analysis`]
/// (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InheritanceResult {
    pub prioritized_pattern: Pattern,
    pub possible_patterns: BTreeSet<Pattern>,
    pub segregation_status: HashMap<Pattern, SegregationStatus>,
    pub comp_het_details: Option<CompHetDetails>,
    pub error: Option<String>,
}

/// The status a [`CompHetDetails`] record was resolved to (spec.md
/// §4.11). The two `possible_*` variants before parent genotypes were
/// even looked at are distinguished from the generic
/// `compound_heterozygous_possible` pattern so a consumer can tell *why*
/// confirmation wasn't reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompHetStatus {
    Confirmed,
    PossibleNoPedigree,
    PossibleMissingParents,
    PossibleMissingParentGenotypes,
    PossibleAmbiguousOrigin,
}

/// Cross-variant compound-heterozygosity evidence for one gene (spec.md
/// §3, §4.11).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompHetDetails {
    pub status: CompHetStatus,
    pub is_candidate: bool,
    pub is_possible: bool,
    pub gene_symbol: String,
    pub partner_variant_keys: BTreeSet<String>,
    pub likely_paternal_keys: BTreeSet<String>,
    pub likely_maternal_keys: BTreeSet<String>,
    pub ambiguous_keys: BTreeSet<String>,
    pub error: Option<String>,
}

impl CompHetDetails {
    /// `partnerVariantKeys` for a given variant is every other het
    /// variant sharing this gene's group; callers construct one
    /// `CompHetDetails` per variant with the other keys as partners.
    pub fn partners_excluding(&self, key: &str) -> BTreeSet<String> {
        self.partner_variant_keys
            .iter()
            .filter(|k| k.as_str() != key)
            .cloned()
            .collect()
    }
}
