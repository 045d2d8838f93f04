use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Sex {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Sex {
    /// Parses PED sex codes (`1`=male, `2`=female, `0`=unknown), also
    /// accepting the equivalent words case-insensitively since the spec
    /// requires numeric or string values to be handled uniformly
    /// (spec.md §4.3).
    pub fn parse(raw: &str) -> Sex {
        match raw.trim() {
            "1" => Sex::Male,
            "2" => Sex::Female,
            other if other.eq_ignore_ascii_case("male") || other.eq_ignore_ascii_case("m") => {
                Sex::Male
            }
            other if other.eq_ignore_ascii_case("female") || other.eq_ignore_ascii_case("f") => {
                Sex::Female
            }
            _ => Sex::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AffectedStatus {
    #[default]
    Unknown,
    Unaffected,
    Affected,
}

impl AffectedStatus {
    /// Parses PED affected-status codes (`1`=unaffected, `2`=affected,
    /// `0`=unknown), also accepting the equivalent words
    /// case-insensitively (spec.md §4.3).
    pub fn parse(raw: &str) -> AffectedStatus {
        match raw.trim() {
            "1" => AffectedStatus::Unaffected,
            "2" => AffectedStatus::Affected,
            other if other.eq_ignore_ascii_case("unaffected") => AffectedStatus::Unaffected,
            other if other.eq_ignore_ascii_case("affected") => AffectedStatus::Affected,
            _ => AffectedStatus::Unknown,
        }
    }

    pub fn is_affected(self) -> bool {
        matches!(self, AffectedStatus::Affected)
    }
}

/// One row of a PED pedigree file (spec.md §3, §6). `"0"` for
/// `father_id`/`mother_id` denotes an absent/unknown parent and is
/// represented as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedigreeEntry {
    pub family_id: String,
    pub sample_id: String,
    pub father_id: Option<String>,
    pub mother_id: Option<String>,
    pub sex: Sex,
    pub affected_status: AffectedStatus,
}

impl PedigreeEntry {
    pub fn has_parents(&self) -> bool {
        self.father_id.is_some() && self.mother_id.is_some()
    }
}

fn parse_parent_id(raw: &str) -> Option<String> {
    if raw == "0" {
        None
    } else {
        Some(raw.to_string())
    }
}

pub(super) fn build_entry(
    family_id: &str,
    sample_id: &str,
    father_id: &str,
    mother_id: &str,
    sex: &str,
    affected_status: &str,
) -> PedigreeEntry {
    PedigreeEntry {
        family_id: family_id.to_string(),
        sample_id: sample_id.to_string(),
        father_id: parse_parent_id(father_id),
        mother_id: parse_parent_id(mother_id),
        sex: Sex::parse(sex),
        affected_status: AffectedStatus::parse(affected_status),
    }
}
