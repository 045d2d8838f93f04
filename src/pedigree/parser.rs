use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::warn;

use crate::pedigree::entry::{build_entry, PedigreeEntry};
use crate::pedigree::error::PedigreeError;

/// Parses a tab- or whitespace-separated PED file into a mapping from
/// sample ID to [`PedigreeEntry`] (spec.md §4.3, §6).
pub fn parse_ped_file(path: impl AsRef<Path>) -> Result<HashMap<String, PedigreeEntry>, PedigreeError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| PedigreeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_ped_str(&contents)
}

/// Core parser, usable directly against literal PED text.
pub fn parse_ped_str(contents: &str) -> Result<HashMap<String, PedigreeEntry>, PedigreeError> {
    let mut entries = HashMap::new();

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 6 {
            warn!(
                "PED row {} has {} fields, expected at least 6, skipping: '{}'",
                line_no + 1,
                fields.len(),
                line
            );
            continue;
        }

        let entry = build_entry(fields[0], fields[1], fields[2], fields[3], fields[4], fields[5]);
        entries.insert(entry.sample_id.clone(), entry);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedigree::entry::{AffectedStatus, Sex};

    const TRIO_PED: &str = "FAM1\tIndex\tFather\tMother\t1\t2\nFAM1\tFather\t0\t0\t1\t1\nFAM1\tMother\t0\t0\t2\t1\n";

    #[test]
    fn parses_trio_with_parent_links() {
        let entries = parse_ped_str(TRIO_PED).unwrap();
        let index = &entries["Index"];
        assert_eq!(index.father_id.as_deref(), Some("Father"));
        assert_eq!(index.mother_id.as_deref(), Some("Mother"));
        assert_eq!(index.sex, Sex::Male);
        assert_eq!(index.affected_status, AffectedStatus::Affected);
    }

    #[test]
    fn zero_parent_ids_are_none() {
        let entries = parse_ped_str(TRIO_PED).unwrap();
        assert_eq!(entries["Father"].father_id, None);
        assert_eq!(entries["Father"].mother_id, None);
    }

    #[test]
    fn accepts_whitespace_delimited_rows() {
        let ped = "FAM1 Sample1 0 0 1 2\n";
        let entries = parse_ped_str(ped).unwrap();
        assert!(entries.contains_key("Sample1"));
    }

    #[test]
    fn skips_malformed_rows() {
        let ped = "FAM1\tIncomplete\t0\t0\n";
        let entries = parse_ped_str(ped).unwrap();
        assert!(entries.is_empty());
    }
}
