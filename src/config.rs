//! Pipeline-wide configuration.
//!
//! Mirrors the way `psnairne-PIVOT`'s clients take their API URL as a plain
//! constructor argument with a `Default` impl pointing at the real service,
//! generalized here into a single struct since this crate talks to two
//! services (recoder + VEP) and has many more dials (chunk sizes, retries,
//! cache behavior, fan-out).

use std::path::PathBuf;
use std::time::Duration;

/// Default Ensembl REST base URL, overridable by the `ENSEMBL_BASE_URL`
/// environment variable (spec.md §6).
pub const DEFAULT_ENSEMBL_BASE_URL: &str = "https://rest.ensembl.org";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base URL for the Ensembl recoder and VEP endpoints.
    pub ensembl_base_url: String,
    /// Species path segment, e.g. `"homo_sapiens"`.
    pub species: String,
    /// Number of inputs per recoder POST chunk (default 200).
    pub recoder_chunk_size: usize,
    /// Number of inputs per VEP POST chunk (default 200).
    pub vep_chunk_size: usize,
    /// Maximum number of retries (in addition to the initial attempt) for
    /// a retryable HTTP failure.
    pub max_retries: u32,
    /// Pause between dispatching successive chunks to the same endpoint.
    pub inter_chunk_pause: Duration,
    /// Upper bound on concurrently in-flight chunk requests. Consumed by
    /// `annotation::batch` as both the worker-pool width and the burst
    /// capacity of its shared rate-limiting governor.
    pub fanout: usize,
    /// Whether the HTTP client should consult/populate the cache.
    pub cache_enabled: bool,
    /// TTL applied to newly-written cache entries.
    pub cache_ttl: Duration,
    /// Cache size cap, in the `^\d+(\.\d+)?(B|KB|MB|GB)$` string form
    /// accepted by [`crate::cache::parse_size`].
    pub cache_max_size: String,
    /// Override for the persistent cache directory; `None` uses the
    /// platform default cache directory.
    pub cache_dir: Option<PathBuf>,
    /// If true, a chunk failing after retries marks its inputs as errored
    /// and the pipeline continues; if false, the whole run aborts.
    pub partial_results: bool,
    /// Policy toggle for spec.md §9 Open Question (a): whether a confirmed
    /// compound-heterozygous call overrides a prioritized
    /// `autosomal_dominant` pattern.
    pub comphet_overrides_dominant: bool,
}

impl PipelineConfig {
    /// Builds the base config, then applies the `ENSEMBL_BASE_URL`
    /// environment override if present.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("ENSEMBL_BASE_URL") {
            if !base_url.is_empty() {
                config.ensembl_base_url = base_url;
            }
        }
        config
    }

    pub fn recoder_endpoint(&self) -> String {
        format!(
            "{}/variant_recoder/{}",
            self.ensembl_base_url.trim_end_matches('/'),
            self.species
        )
    }

    pub fn vep_region_endpoint(&self) -> String {
        format!(
            "{}/vep/{}/region",
            self.ensembl_base_url.trim_end_matches('/'),
            self.species
        )
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            ensembl_base_url: DEFAULT_ENSEMBL_BASE_URL.to_string(),
            species: "homo_sapiens".to_string(),
            recoder_chunk_size: 200,
            vep_chunk_size: 200,
            max_retries: 3,
            inter_chunk_pause: Duration::from_millis(100),
            fanout: 4,
            cache_enabled: true,
            cache_ttl: Duration::from_secs(7 * 24 * 3600),
            cache_max_size: "500MB".to_string(),
            cache_dir: None,
            partial_results: false,
            comphet_overrides_dominant: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoder_endpoint_joins_base_url_and_species() {
        let config = PipelineConfig {
            ensembl_base_url: "https://rest.ensembl.org/".to_string(),
            species: "homo_sapiens".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.recoder_endpoint(),
            "https://rest.ensembl.org/variant_recoder/homo_sapiens"
        );
    }

    #[test]
    fn vep_endpoint_joins_base_url_and_species() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.vep_region_endpoint(),
            "https://rest.ensembl.org/vep/homo_sapiens/region"
        );
    }
}
