//! AnnotatedVariant / TranscriptConsequence data model (spec.md §3).

use serde::{Deserialize, Serialize};

use crate::inheritance::InheritanceResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputFormat {
    Vcf,
    Hgvs,
    Rsid,
    Cnv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MODIFIER")]
    Modifier,
}

impl Impact {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "HIGH" => Some(Impact::High),
            "MODERATE" => Some(Impact::Moderate),
            "LOW" => Some(Impact::Low),
            "MODIFIER" => Some(Impact::Modifier),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "HIGH",
            Impact::Moderate => "MODERATE",
            Impact::Low => "LOW",
            Impact::Modifier => "MODIFIER",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptConsequence {
    pub transcript_id: Option<String>,
    pub gene_id: Option<String>,
    pub gene_symbol: Option<String>,
    pub feature_type: Option<String>,
    pub biotype: Option<String>,
    pub impact: Option<Impact>,
    #[serde(default)]
    pub consequence_terms: Vec<String>,
    pub hgvsc: Option<String>,
    pub hgvsp: Option<String>,
    pub protein_start: Option<u64>,
    pub protein_end: Option<u64>,
    pub amino_acids: Option<String>,
    pub codons: Option<String>,
    pub sift_prediction: Option<String>,
    pub polyphen_prediction: Option<String>,
    pub pick: Option<u8>,
    pub mane: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedVariant {
    pub variant_key: String,
    pub original_input: String,
    pub input_format: InputFormat,
    pub seq_region_name: Option<String>,
    pub start: Option<u64>,
    pub end: Option<u64>,
    pub allele_string: Option<String>,
    pub most_severe_consequence: Option<String>,
    #[serde(default)]
    pub transcript_consequences: Vec<TranscriptConsequence>,
    pub colocated_variants: Option<serde_json::Value>,
    pub meta: Option<serde_json::Value>,
    pub inheritance: Option<InheritanceResult>,
    pub error: Option<String>,
}

impl AnnotatedVariant {
    pub fn stub_with_error(original_input: impl Into<String>, input_format: InputFormat, error: impl Into<String>) -> Self {
        let original_input = original_input.into();
        AnnotatedVariant {
            variant_key: original_input.clone(),
            original_input,
            input_format,
            seq_region_name: None,
            start: None,
            end: None,
            allele_string: None,
            most_severe_consequence: None,
            transcript_consequences: Vec::new(),
            colocated_variants: None,
            meta: None,
            inheritance: None,
            error: Some(error.into()),
        }
    }

    pub fn gene_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .transcript_consequences
            .iter()
            .filter_map(|tc| tc.gene_symbol.clone())
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}
