use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for codesearch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build the TF-IDF vector space; `false` forces the lexical fallback
    pub use_tfidf: bool,
    /// Vectorizer parameters for the TF-IDF model
    pub vectorizer: VectorizerConfig,
    /// Heuristic boosts applied by the re-ranker
    pub ranking: RankingConfig,
}

/// Parameters of the term-weighting model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Vocabulary cap (most frequent terms across the corpus are kept)
    pub max_features: usize,
    /// Inclusive (min, max) n-gram lengths
    pub ngram_range: (usize, usize),
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Codebases whose elements get a small boost when re-ranking
    pub preferred_codebases: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_tfidf: true,
            vectorizer: VectorizerConfig::default(),
            ranking: RankingConfig::default(),
        }
    }
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 1000,
            ngram_range: (1, 2),
            min_df: 1,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            preferred_codebases: vec!["dspy".to_string(), "dspy_cli".to_string()],
        }
    }
}

impl RankingConfig {
    pub fn is_preferred(&self, codebase: &str) -> bool {
        self.preferred_codebases.iter().any(|c| c == codebase)
    }
}

impl Config {
    /// Get the default configuration directory
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
            .map(|home| home.join(".codesearch"))
    }

    /// Default location of the JSON config file
    pub fn default_path() -> Result<PathBuf> {
        Self::default_base_dir().map(|base| base.join("config.json"))
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` (or the default location); missing files yield defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Ok(p) => p,
                Err(_) => return Ok(Self::default()),
            },
        };

        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let v = &self.vectorizer;
        if v.max_features == 0 {
            return Err(Error::Config("max_features must be at least 1".to_string()));
        }
        let (min_n, max_n) = v.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::Config(format!(
                "Invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }
        if v.min_df == 0 {
            return Err(Error::Config("min_df must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.use_tfidf);
        assert_eq!(config.vectorizer.max_features, 1000);
        assert_eq!(config.vectorizer.ngram_range, (1, 2));
        assert_eq!(config.vectorizer.min_df, 1);
        assert!(config.ranking.is_preferred("dspy"));
        assert!(!config.ranking.is_preferred("other"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"use_tfidf": false, "vectorizer": {"max_features": 50}}"#)
            .unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.use_tfidf);
        assert_eq!(config.vectorizer.max_features, 50);
        assert_eq!(config.vectorizer.ngram_range, (1, 2));
        assert_eq!(config.ranking, RankingConfig::default());
    }

    #[test]
    fn test_invalid_ngram_range_rejected() {
        let mut config = Config::default();
        config.vectorizer.ngram_range = (2, 1);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.vectorizer.ngram_range = (0, 1);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");
        let config = Config::load_or_default(Some(&path)).unwrap();
        assert_eq!(config, Config::default());
    }
}
