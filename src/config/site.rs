//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::NavigationOrder;

/// Main site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub url: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,

    // Source
    /// Collection name given to files found under `source_dir`; the page
    /// query selects files of this collection
    pub source_instance_name: String,

    // Slugs
    /// Prefix stripped from relative paths before they become slugs
    pub base_path: String,
    pub trailing_slash: bool,
    pub slugify: bool,

    // Post pages
    pub path_prefix: String,
    /// Post template, relative to the site directory. The built-in
    /// template is used when unset.
    pub template: Option<PathBuf>,
    pub navigation: NavigationOrder,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            url: "http://example.com".to_string(),

            source_dir: "content".to_string(),
            public_dir: "public".to_string(),

            source_instance_name: "blog".to_string(),

            base_path: "src/pages".to_string(),
            trailing_slash: true,
            slugify: false,

            path_prefix: "/blog".to_string(),
            template: None,
            navigation: NavigationOrder::Listing,

            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let mut config: SiteConfig =
            serde_yaml::from_str(&content).with_context(|| format!("parsing config {:?}", path))?;
        config.normalize();
        Ok(config)
    }

    /// Page paths are `path_prefix + slug` and slugs start with `/`, so the
    /// prefix loses any trailing slash
    fn normalize(&mut self) {
        let trimmed = self.path_prefix.trim_end_matches('/').len();
        self.path_prefix.truncate(trimmed);
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}
