use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

fn default_min_video_views() -> u64 {
    1_000
}

/// Tracked-term tables consulted by the normalizer and the digest builder.
///
/// Loaded once per run from a YAML file and passed by value into
/// [`crate::Normalizer`]; nothing in the pipeline reads process-wide state,
/// so tests can construct arbitrary term sets inline.
#[derive(Debug, Clone, Deserialize)]
pub struct TermConfig {
    /// Our brand's name variants. Emphasized wherever they appear in
    /// collected text, and used to decide whether a comment is relevant.
    pub brand_terms: Vec<String>,
    /// Competitor name variants, used by the digest builder to split counts.
    pub competitor_terms: Vec<String>,
    /// Marketplace/spam terms. A candidate whose title contains any of these
    /// is discarded outright.
    pub exclude_terms: Vec<String>,
    /// Substrings a forum's display name must contain for its posts to count
    /// (e.g. EV-enthusiast community names).
    pub target_communities: Vec<String>,
    /// Search queries run against both sources, one collection pass each.
    pub search_topics: Vec<String>,
    /// Videos below this view count are discarded.
    #[serde(default = "default_min_video_views")]
    pub min_video_views: u64,
}

impl TermConfig {
    /// True if `keyword` is one of our brand's name variants.
    #[must_use]
    pub fn is_brand_keyword(&self, keyword: &str) -> bool {
        self.brand_terms.iter().any(|t| t == keyword)
    }

    /// True if `keyword` is a competitor name variant.
    #[must_use]
    pub fn is_competitor_keyword(&self, keyword: &str) -> bool {
        self.competitor_terms.iter().any(|t| t == keyword)
    }
}

/// Load and validate the term tables from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_terms(path: &Path) -> Result<TermConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TermsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_terms(&content)
}

/// Parse and validate term tables from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` on YAML errors or validation failures.
pub fn parse_terms(yaml: &str) -> Result<TermConfig, ConfigError> {
    let terms: TermConfig = serde_yaml::from_str(yaml)?;
    validate_terms(&terms)?;
    Ok(terms)
}

fn validate_terms(terms: &TermConfig) -> Result<(), ConfigError> {
    if terms.brand_terms.is_empty() {
        return Err(ConfigError::Validation(
            "brand_terms must not be empty".to_owned(),
        ));
    }
    if terms.search_topics.is_empty() {
        return Err(ConfigError::Validation(
            "search_topics must not be empty".to_owned(),
        ));
    }

    let lists: [(&str, &[String]); 5] = [
        ("brand_terms", &terms.brand_terms),
        ("competitor_terms", &terms.competitor_terms),
        ("exclude_terms", &terms.exclude_terms),
        ("target_communities", &terms.target_communities),
        ("search_topics", &terms.search_topics),
    ];
    for (name, list) in lists {
        if list.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{name} contains an empty entry"
            )));
        }
    }

    let mut seen = HashSet::new();
    for topic in &terms.search_topics {
        if !seen.insert(topic.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate search topic: '{topic}'"
            )));
        }
    }

    Ok(())
}
