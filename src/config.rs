//! Configuration module for Tusk

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::path::PathBuf;

use crate::content::PlainTextStyle;
use crate::gesture::SwipeThresholds;
use crate::paths;

/// Placeholder replaced by the tag in `hashtag_url_template`
pub const TAG_PLACEHOLDER: &str = "{tag}";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL template for hashtag links; `{tag}` is replaced by the encoded tag
    #[serde(default = "default_hashtag_url_template")]
    pub hashtag_url_template: String,

    /// Host substrings whose links are not treated as external (e.g. own instance)
    #[serde(default)]
    pub excluded_link_hosts: Vec<String>,

    /// How post bodies are rendered as plain text
    #[serde(default)]
    pub plain_text_style: PlainTextStyle,

    /// Column width for wrapped CLI output
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,

    /// Swipe gesture thresholds
    #[serde(default)]
    pub swipe: SwipeThresholds,
}

fn default_hashtag_url_template() -> String {
    format!("{}://tags/{TAG_PLACEHOLDER}", crate::content::DEFAULT_HASHTAG_SCHEME)
}

fn default_wrap_width() -> usize {
    80
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hashtag_url_template: default_hashtag_url_template(),
            excluded_link_hosts: Vec::new(),
            plain_text_style: PlainTextStyle::default(),
            wrap_width: default_wrap_width(),
            swipe: SwipeThresholds::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Hashtag link for `tag` according to `hashtag_url_template`
    pub fn hashtag_url(&self, tag: &str) -> String {
        self.hashtag_url_template
            .replace(TAG_PLACEHOLDER, &urlencoding::encode(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::default_hashtag_url;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            excluded_link_hosts: vec!["mastodon.social".to_string()],
            plain_text_style: PlainTextStyle::Lines,
            wrap_width: 60,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let contents = "plain_text_style = \"flat\"\n[swipe]\nmin_distance = 40.0\n";
        std::fs::write(&path, contents).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.plain_text_style, PlainTextStyle::Flat);
        assert!((config.swipe.min_distance - 40.0).abs() < f64::EPSILON);
        assert!((config.swipe.dominance - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.wrap_width, 80);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "wrap_width = \"wide\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_hashtag_url() {
        let config = Config::default();
        assert_eq!(config.hashtag_url("café"), default_hashtag_url("café"));

        let custom = Config {
            hashtag_url_template: "https://m.s/tags/{tag}".to_string(),
            ..Config::default()
        };
        assert_eq!(custom.hashtag_url("rust"), "https://m.s/tags/rust");
    }
}
