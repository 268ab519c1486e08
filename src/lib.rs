//! vellum: a build-time markdown content collection compiler
//!
//! Reads a tree of markdown files with YAML front-matter, validates each
//! file against its collection's schema (posts, pages, authors), derives
//! slugs, excerpts, reading-time metadata and sanitized HTML, copies
//! referenced assets under content-hashed names, and produces typed,
//! immutable collections plus a JSON data directory.

pub mod assets;
pub mod commands;
pub mod config;
pub mod content;
pub mod report;
pub mod schema;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main application: configuration plus resolved directories
#[derive(Debug, Clone)]
pub struct Vellum {
    /// Build configuration
    pub config: config::BuildConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content source root
    pub content_dir: PathBuf,
    /// Data directory the JSON collections are written into
    pub data_dir: PathBuf,
    /// Directory referenced assets are copied into
    pub assets_dir: PathBuf,
}

impl Vellum {
    /// Create an instance from a base directory
    ///
    /// Reads `vellum.yml` when present; a missing file means all defaults.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("vellum.yml");

        let config = if config_path.exists() {
            config::BuildConfig::load(&config_path)?
        } else {
            config::BuildConfig::default()
        };

        let content_dir = base_dir.join(&config.root);
        let data_dir = base_dir.join(&config.output.data);
        let assets_dir = base_dir.join(&config.output.assets);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            data_dir,
            assets_dir,
        })
    }

    /// Run the load-and-validate pass and write all outputs
    pub fn build(&self, clean: bool) -> Result<content::Collections> {
        commands::build::run(self, clean)
    }
}
