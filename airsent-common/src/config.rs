//! Configuration management for the airsent dashboard

use crate::error::{AirsentError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Word cloud settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCloudConfig {
    /// Maximum number of words handed to the renderer
    pub max_words: usize,
    /// Stop words removed in addition to the built-in English list
    pub extra_stopwords: Vec<String>,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            max_words: 200,
            extra_stopwords: Vec::new(),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Path of the tweets CSV file
    pub data_path: PathBuf,
    /// Server bind address
    pub bind_address: String,
    /// Page title
    pub title: String,
    /// Page background color
    pub background_color: String,
    pub word_cloud: WordCloudConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("Tweets.csv"),
            bind_address: "127.0.0.1:8080".to_string(),
            title: "Sentiment Analysis on Tweets about US Airlines".to_string(),
            background_color: "#120128".to_string(),
            word_cloud: WordCloudConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override settings from `AIRSENT_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(data) = lookup("AIRSENT_DATA") {
            debug!("data path overridden from environment: {}", data);
            self.data_path = PathBuf::from(data);
        }

        if let Some(bind) = lookup("AIRSENT_BIND") {
            self.bind_address = bind;
        }

        if let Some(max_words) = lookup("AIRSENT_MAX_WORDS") {
            self.word_cloud.max_words = max_words.parse().unwrap_or(self.word_cloud.max_words);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.word_cloud.max_words == 0 {
            return Err(AirsentError::Config("word_cloud.max_words must be positive".into()));
        }
        if self.title.trim().is_empty() {
            return Err(AirsentError::Config("title must not be empty".into()));
        }
        Ok(())
    }
}

/// Configuration source for loading dashboard settings
pub enum ConfigSource {
    File(PathBuf),
    Default,
}

/// Load dashboard configuration from a source. File and default sources still
/// honor environment overrides.
pub fn load_config(source: ConfigSource) -> Result<DashboardConfig> {
    let mut config = match source {
        ConfigSource::File(path) => DashboardConfig::from_file(&path)?,
        ConfigSource::Default => DashboardConfig::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}
