//! Configuration management

use std::env;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub insight: InsightConfig,
    pub storage: StorageConfig,
}

/// Insight provider endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub struct InsightConfig {
    /// Base URL of the local model endpoint
    pub base_url: String,
    /// Model name
    pub model: String,
}

/// Annotation persistence settings
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory for per-document annotation files
    pub annotations_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            insight: InsightConfig {
                base_url: "http://localhost:11434".to_string(),
                model: "llama3".to_string(),
            },
            storage: StorageConfig {
                annotations_dir: PathBuf::from("./annotations"),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            insight: InsightConfig {
                base_url: env::var("INSIGHT_BASE_URL")
                    .unwrap_or(defaults.insight.base_url),
                model: env::var("INSIGHT_MODEL").unwrap_or(defaults.insight.model),
            },
            storage: StorageConfig {
                annotations_dir: env::var("ANNOTATIONS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.annotations_dir),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.insight.base_url, "http://localhost:11434");
        assert_eq!(config.storage.annotations_dir, PathBuf::from("./annotations"));
    }
}
