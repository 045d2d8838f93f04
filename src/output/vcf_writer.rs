//! Flattener & Output Formatter (C13, part 3): re-emits annotated
//! variants as a VCF, merging original INFO fields with a synthesized
//! `VL_CSQ` (and, when present, `VL_DED_INH`/`VL_COMPHET`) INFO entry
//! (spec.md §4.13, §6).

use std::collections::HashMap;

use crate::annotation::{AnnotatedVariant, TranscriptConsequence};
use crate::codec::VariantKey;
use crate::vcf::OriginalRecord;

const VL_CSQ_INFO_HEADER: &str = "##INFO=<ID=VL_CSQ,Number=.,Type=String,Description=\"Consequence annotations from variant-linker. Format: Allele|Consequence|IMPACT|SYMBOL|Gene|Feature_type|Feature|BIOTYPE|HGVSc|HGVSp|Protein_position|Amino_acids|Codons|Existing_variation|SIFT|PolyPhen\">";

/// Renders `variants` (with their originating [`OriginalRecord`]s) back
/// into VCF text. `header_lines` is the source file's verbatim header
/// block; `record_map` associates each variant key back to the VCF row
/// it was split from.
pub fn format_vcf(
    variants: &[AnnotatedVariant],
    header_lines: &[String],
    record_map: &HashMap<VariantKey, OriginalRecord>,
) -> String {
    let mut out = String::new();
    out.push_str(&render_header(header_lines));

    if variants.is_empty() {
        out.push('\n');
        return out;
    }

    for group in group_by_chrom_pos_ref(variants, record_map) {
        out.push_str(&render_row(&group));
        out.push('\n');
    }

    out
}

/// Copies the original header verbatim, filling in the two lines
/// spec.md §4.13 requires when missing, and inserting the `VL_CSQ`
/// declaration if it isn't already present.
fn render_header(header_lines: &[String]) -> String {
    let mut lines: Vec<String> = header_lines.to_vec();

    if !lines.iter().any(|line| line.starts_with("##fileformat=")) {
        lines.insert(0, "##fileformat=VCFv4.2".to_string());
    }
    if !lines.iter().any(|line| line.starts_with("##INFO=<ID=VL_CSQ")) {
        let insert_at = lines.iter().position(|l| l.starts_with("#CHROM")).unwrap_or(lines.len());
        lines.insert(insert_at, VL_CSQ_INFO_HEADER.to_string());
    }
    if !lines.iter().any(|line| line.starts_with("#CHROM")) {
        lines.push("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO".to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

struct RowGroup<'a> {
    chrom: String,
    pos: u64,
    reference: String,
    id: String,
    qual: String,
    filter: String,
    info_fields: Vec<String>,
    format: Option<String>,
    sample_fields: Vec<String>,
    alts: Vec<String>,
    members: Vec<&'a AnnotatedVariant>,
}

/// Groups variants by `(CHROM, POS, REF)` in first-seen order, pairing
/// each with its originating [`OriginalRecord`] (spec.md §4.13).
fn group_by_chrom_pos_ref<'a>(
    variants: &'a [AnnotatedVariant],
    record_map: &HashMap<VariantKey, OriginalRecord>,
) -> Vec<RowGroup<'a>> {
    let mut order: Vec<(String, u64, String)> = Vec::new();
    let mut groups: HashMap<(String, u64, String), RowGroup<'a>> = HashMap::new();

    for variant in variants {
        let Ok(key) = VariantKey::parse(&variant.variant_key) else {
            continue;
        };
        let Some(record) = record_map.get(&key) else {
            continue;
        };
        let group_key = (record.chrom.clone(), record.pos, record.reference.clone());

        groups
            .entry(group_key.clone())
            .and_modify(|group| {
                group.alts.push(record.alt.clone());
                group.members.push(variant);
            })
            .or_insert_with(|| {
                order.push(group_key.clone());
                RowGroup {
                    chrom: record.chrom.clone(),
                    pos: record.pos,
                    reference: record.reference.clone(),
                    id: blank_to_dot(&record.id),
                    qual: blank_to_dot(&record.qual),
                    filter: blank_to_dot_or_pass(&record.filter),
                    info_fields: record.info_fields_excluding("VL_CSQ"),
                    format: record.format.clone(),
                    sample_fields: record.sample_fields.clone(),
                    alts: vec![record.alt.clone()],
                    members: vec![variant],
                }
            });
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .collect()
}

fn blank_to_dot(value: &str) -> String {
    if value.is_empty() {
        ".".to_string()
    } else {
        value.to_string()
    }
}

fn blank_to_dot_or_pass(value: &str) -> String {
    if value.is_empty() {
        "PASS".to_string()
    } else {
        value.to_string()
    }
}

fn render_row(group: &RowGroup) -> String {
    let csq_entries: Vec<String> = group.members.iter().map(|v| csq_entry(v)).collect();
    let inheritance_entries: Vec<String> = group
        .members
        .iter()
        .map(|v| v.inheritance.as_ref().map(|r| r.prioritized_pattern.as_str().to_string()).unwrap_or_default())
        .collect();
    let comphet_entries: Vec<String> = group
        .members
        .iter()
        .map(|v| comphet_entry(v))
        .collect();

    let mut info_fields = group.info_fields.clone();
    info_fields.push(format!("VL_CSQ={}", csq_entries.join(",")));
    if inheritance_entries.iter().any(|e| !e.is_empty()) {
        info_fields.push(format!("VL_DED_INH={}", inheritance_entries.join(",")));
    }
    if comphet_entries.iter().any(|e| !e.is_empty()) {
        info_fields.push(format!("VL_COMPHET={}", comphet_entries.join(",")));
    }

    let info = if info_fields.is_empty() {
        ".".to_string()
    } else {
        info_fields.join(";")
    };

    let mut columns = vec![
        group.chrom.clone(),
        group.pos.to_string(),
        group.id.clone(),
        group.reference.clone(),
        group.alts.join(","),
        group.qual.clone(),
        group.filter.clone(),
        info,
    ];

    if let Some(format) = &group.format {
        columns.push(format.clone());
        columns.extend(group.sample_fields.iter().cloned());
    }

    columns.join("\t")
}

/// The single consequence picked to represent each ALT allele in
/// `VL_CSQ`: the `pick==1` transcript if present, otherwise the first.
fn representative_consequence(variant: &AnnotatedVariant) -> Option<&TranscriptConsequence> {
    variant
        .transcript_consequences
        .iter()
        .find(|tc| tc.pick == Some(1))
        .or_else(|| variant.transcript_consequences.first())
}

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn csq_entry(variant: &AnnotatedVariant) -> String {
    let tc = representative_consequence(variant);
    let field = |value: Option<&str>| encode(value.unwrap_or(""));

    let allele = variant.allele_string.clone().unwrap_or_default();
    let consequence = tc.map(|tc| tc.consequence_terms.join("&")).unwrap_or_default();
    let impact = tc.and_then(|tc| tc.impact).map(|i| i.as_str().to_string()).unwrap_or_default();

    let parts = [
        field(Some(&allele)),
        field(Some(&consequence)),
        field(Some(&impact)),
        field(tc.and_then(|tc| tc.gene_symbol.as_deref())),
        field(tc.and_then(|tc| tc.gene_id.as_deref())),
        field(tc.and_then(|tc| tc.feature_type.as_deref())),
        field(tc.and_then(|tc| tc.transcript_id.as_deref())),
        field(tc.and_then(|tc| tc.biotype.as_deref())),
        field(tc.and_then(|tc| tc.hgvsc.as_deref())),
        field(tc.and_then(|tc| tc.hgvsp.as_deref())),
        field(tc.and_then(protein_position).as_deref()),
        field(tc.and_then(|tc| tc.amino_acids.as_deref())),
        field(tc.and_then(|tc| tc.codons.as_deref())),
        field(None),
        field(tc.and_then(|tc| tc.sift_prediction.as_deref())),
        field(tc.and_then(|tc| tc.polyphen_prediction.as_deref())),
    ];

    parts.join("|")
}

fn protein_position(tc: &TranscriptConsequence) -> Option<String> {
    match (tc.protein_start, tc.protein_end) {
        (Some(start), Some(end)) if start == end => Some(start.to_string()),
        (Some(start), Some(end)) => Some(format!("{start}-{end}")),
        (Some(start), None) => Some(start.to_string()),
        (None, Some(end)) => Some(end.to_string()),
        (None, None) => None,
    }
}

fn comphet_entry(variant: &AnnotatedVariant) -> String {
    let Some(result) = &variant.inheritance else {
        return String::new();
    };
    let Some(details) = &result.comp_het_details else {
        return String::new();
    };
    let partners = details.partner_variant_keys.iter().cloned().collect::<Vec<_>>().join("&");
    encode(&format!(
        "{}:{}:{}",
        details.gene_symbol,
        if details.is_candidate { "candidate" } else { "possible" },
        partners
    ))
}
