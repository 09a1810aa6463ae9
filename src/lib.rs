//! blog-pages: blog post pages for a static site
//!
//! This crate builds one page per blog post from a directory of markdown
//! files. Every markdown node gets a `slug` field derived from its file
//! location, and every post page links to its neighbours in the post list.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use generator::TemplateRef;

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// A site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open the site in `base_dir`, reading `_config.yml` when it exists
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        }
    }

    /// Template post pages are rendered with
    pub fn template(&self) -> TemplateRef {
        match &self.config.template {
            Some(path) => TemplateRef::File(self.base_dir.join(path)),
            None => TemplateRef::Builtin,
        }
    }

    /// Build the site
    pub fn build(&self) -> Result<usize> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
