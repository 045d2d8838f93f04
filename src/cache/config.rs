use regex::Regex;
use std::sync::OnceLock;

use crate::cache::error::CacheError;

fn size_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(\d+(?:\.\d+)?)(B|KB|MB|GB)$").expect("invalid size regex literal")
    })
}

/// Parses a human cache-size string (`"500MB"`, `"1.5GB"`, case
/// insensitive) into a byte count. Anything not matching
/// `^\d+(\.\d+)?(B|KB|MB|GB)$` raises [`CacheError::InvalidSize`]
/// (spec.md §4.4).
pub fn parse_size(raw: &str) -> Result<u64, CacheError> {
    let captures = size_regex()
        .captures(raw.trim())
        .ok_or_else(|| CacheError::InvalidSize(raw.to_string()))?;

    let magnitude: f64 = captures[1]
        .parse()
        .map_err(|_| CacheError::InvalidSize(raw.to_string()))?;

    let unit_multiplier: f64 = match captures[2].to_uppercase().as_str() {
        "B" => 1.0,
        "KB" => 1024.0,
        "MB" => 1024.0 * 1024.0,
        "GB" => 1024.0 * 1024.0 * 1024.0,
        _ => return Err(CacheError::InvalidSize(raw.to_string())),
    };

    Ok((magnitude * unit_multiplier) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("500MB", 500 * 1024 * 1024)]
    #[case("1GB", 1024 * 1024 * 1024)]
    #[case("100b", 100)]
    #[case("2.5kb", 2560)]
    fn parses_valid_sizes(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(parse_size(input).unwrap(), expected);
    }

    #[rstest]
    #[case("500")]
    #[case("MB")]
    #[case("500TB")]
    #[case("")]
    fn rejects_invalid_sizes(#[case] input: &str) {
        assert!(parse_size(input).is_err());
    }
}
