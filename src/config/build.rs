//! Build configuration (vellum.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Content source root, relative to the base directory
    pub root: String,

    /// Output locations
    pub output: OutputConfig,

    /// Glob pattern per collection, relative to the content root
    pub collections: CollectionPatterns,

    /// Plain-text excerpt budget in characters
    pub excerpt_length: usize,

    /// Reading-speed constant for derived reading time
    pub words_per_minute: u32,

    /// Code highlighting
    pub highlight: HighlightConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: "content".to_string(),
            output: OutputConfig::default(),
            collections: CollectionPatterns::default(),
            excerpt_length: 260,
            words_per_minute: 200,
            highlight: HighlightConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: BuildConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Data directory the JSON collections are written into
    pub data: String,

    /// Directory referenced assets are copied into
    pub assets: String,

    /// URL prefix rewritten asset references get
    pub base: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data: ".vellum".to_string(),
            assets: "public/static".to_string(),
            base: "/static/".to_string(),
        }
    }
}

/// Glob pattern per collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionPatterns {
    pub posts: String,
    pub pages: String,
    pub authors: String,
}

impl Default for CollectionPatterns {
    fn default() -> Self {
        Self {
            posts: "posts/**/*.md".to_string(),
            pages: "pages/**/*.md".to_string(),
            authors: "authors/**/*.md".to_string(),
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BuildConfig::default();
        assert_eq!(config.root, "content");
        assert_eq!(config.output.data, ".vellum");
        assert_eq!(config.output.base, "/static/");
        assert_eq!(config.collections.posts, "posts/**/*.md");
        assert_eq!(config.excerpt_length, 260);
        assert_eq!(config.words_per_minute, 200);
        assert!(config.highlight.enable);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
root: src/content
output:
  data: generated
excerpt_length: 120
highlight:
  enable: false
"#;
        let config: BuildConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.root, "src/content");
        assert_eq!(config.output.data, "generated");
        // unspecified nested keys keep their defaults
        assert_eq!(config.output.assets, "public/static");
        assert_eq!(config.excerpt_length, 120);
        assert!(!config.highlight.enable);
        assert_eq!(config.words_per_minute, 200);
    }
}
