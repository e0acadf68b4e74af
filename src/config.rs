//! Runtime configuration.
//!
//! Settings come from an optional YAML file; every field has a default so an
//! empty (or absent) file yields a working configuration. Command-line flags
//! are applied on top by [`Config::apply_cli`].
//!
//! ```yaml
//! data_dir: ./data
//! categories: [news, sport, Opinion, culture]
//! articles_per_category: 200
//! page_size: 50
//! politeness_delay_ms: 1000
//! api_keys: [key-one, key-two]
//! ```

use crate::cli::Cli;
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Largest page size the content API accepts.
pub const MAX_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Search endpoint of the content API.
    pub base_url: String,
    /// Publisher name written into the header line of every stored article.
    pub source_name: String,
    /// Root of the article store; one sub-directory per category.
    pub data_dir: PathBuf,
    /// Categories in collection order. Also the storage partition names.
    pub categories: Vec<String>,
    /// New articles to collect per category, per API key.
    pub articles_per_category: usize,
    pub page_size: u32,
    /// Pause after every processed page.
    pub politeness_delay_ms: u64,
    /// Pause after a transient fetch failure.
    pub backoff_delay_ms: u64,
    /// Keys are used in order; a key is abandoned once the provider reports
    /// its quota as exhausted.
    pub api_keys: Vec<String>,
    /// Overwrite articles that are already stored instead of skipping them.
    pub force_refresh: bool,
    /// Lower-cased category name to provider section code, for categories
    /// whose section code differs from their name.
    pub section_overrides: BTreeMap<String, String>,
    pub sensed_csv: PathBuf,
    pub processed_csv: PathBuf,
    pub features_csv: PathBuf,
    pub models_dir: PathBuf,
    pub trail_max_features: usize,
    pub tag_max_features: usize,
    pub min_author_articles: usize,
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://content.guardianapis.com/search".to_string(),
            source_name: "The Guardian".to_string(),
            data_dir: PathBuf::from("data"),
            categories: ["news", "sport", "Opinion", "culture"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            articles_per_category: 200,
            page_size: 50,
            politeness_delay_ms: 1000,
            backoff_delay_ms: 5000,
            api_keys: Vec::new(),
            force_refresh: false,
            section_overrides: BTreeMap::from([(
                "opinion".to_string(),
                "commentisfree".to_string(),
            )]),
            sensed_csv: PathBuf::from("sensed_data.csv"),
            processed_csv: PathBuf::from("processed_data_separated.csv"),
            features_csv: PathBuf::from("dataset_features_final.csv"),
            models_dir: PathBuf::from("models"),
            trail_max_features: 1000,
            tag_max_features: 500,
            min_author_articles: 3,
            top_n: 10,
        }
    }
}

impl Config {
    /// Load the YAML file at `path`, or the defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let config = Self::from_yaml(&raw)?;
                info!(path = %path.display(), "Loaded configuration");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Overlay command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.data_dir {
            self.data_dir = dir.clone();
        }
        if !cli.api_keys.is_empty() {
            self.api_keys = cli.api_keys.clone();
        }
        if cli.force_refresh {
            self.force_refresh = true;
        }
        if let Some(n) = cli.articles_per_category {
            self.articles_per_category = n;
        }
        if let Some(n) = cli.page_size {
            self.page_size = n;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(PipelineError::Config("no categories configured".into()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(PipelineError::Config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.articles_per_category == 0 {
            return Err(PipelineError::Config(
                "articles_per_category must be positive".into(),
            ));
        }
        Url::parse(&self.base_url)
            .map_err(|e| PipelineError::Config(format!("invalid base_url: {e}")))?;
        Ok(())
    }

    /// Extra checks that only matter when talking to the content API.
    pub fn validate_for_collection(&self) -> Result<()> {
        self.validate()?;
        if self.api_keys.iter().all(|k| k.trim().is_empty()) {
            return Err(PipelineError::Config(
                "no API keys configured (use --api-key or GUARDIAN_API_KEYS)".into(),
            ));
        }
        Ok(())
    }

    /// Provider section code for a category.
    pub fn section_code(&self, category: &str) -> String {
        let lowered = category.to_lowercase();
        self.section_overrides
            .get(&lowered)
            .cloned()
            .unwrap_or(lowered)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn backoff_delay(&self) -> Duration {
        Duration::from_millis(self.backoff_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.categories.len(), 4);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "page_size: 25\ncategories: [sport]\napi_keys: [abc]\n",
        )
        .unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.categories, vec!["sport".to_string()]);
        assert_eq!(config.articles_per_category, 200);
        assert_eq!(config.source_name, "The Guardian");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("  \n").unwrap();
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_section_code_mapping() {
        let config = Config::default();
        assert_eq!(config.section_code("Opinion"), "commentisfree");
        assert_eq!(config.section_code("Sport"), "sport");
        assert_eq!(config.section_code("news"), "news");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.categories.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.base_url = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_collection_requires_keys() {
        let mut config = Config::default();
        assert!(config.validate_for_collection().is_err());
        config.api_keys = vec!["k1".into()];
        assert!(config.validate_for_collection().is_ok());
    }
}
