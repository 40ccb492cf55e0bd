//! postmatter: a front-matter content layer for Markdown post
//! collections
//!
//! This crate parses Markdown documents with front-matter metadata
//! into typed `Post` records, validates whole collections with
//! per-document error reporting, and exports the parsed records as a
//! JSON manifest for an external renderer to consume. It does not
//! render, template, or serve anything itself.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;

use anyhow::Result;
use std::path::Path;

/// Collection configuration file name
pub const CONFIG_FILE: &str = "postmatter.yml";

/// The main Postmatter application
#[derive(Clone)]
pub struct Postmatter {
    /// Collection configuration
    pub config: config::CollectionConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Directory holding the post documents
    pub content_dir: std::path::PathBuf,
}

impl Postmatter {
    /// Create a new Postmatter instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::CollectionConfig::load(&config_path)?
        } else {
            config::CollectionConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    /// Load the post collection, with draft inclusion taken from config
    pub fn load(&self) -> content::LoadReport {
        content::ContentLoader::new(self).load_posts()
    }

    /// Initialize a collection in the base directory
    pub fn init(&self) -> Result<()> {
        commands::init::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, draft: bool, path: Option<&str>) -> Result<()> {
        commands::new::run(self, title, draft, path)
    }

    /// Validate every document in the collection, drafts included
    pub fn check(&self) -> Result<()> {
        commands::check::run(self)
    }
}
