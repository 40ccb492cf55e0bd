//! Content loader - loads the post collection from the content directory

use chrono_tz::Tz;
use glob::Pattern;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

use super::{MetadataError, Post};
use crate::Postmatter;

/// Why a single document failed to load
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("unreadable file: {0}")]
    Io(#[from] std::io::Error),
}

/// One document that failed to load, and why
#[derive(Debug)]
pub struct LoadFailure {
    /// Source path relative to the content directory
    pub source: String,
    pub error: DocumentError,
}

/// Outcome of loading a collection.
///
/// A failure is terminal for its own document only; every sibling
/// still loads, so `posts` stays usable alongside `failures`.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Parsed posts, newest first
    pub posts: Vec<Post>,
    /// Per-document failures, by source path
    pub failures: Vec<LoadFailure>,
    /// Drafts parsed fine but left out of `posts`
    pub drafts_skipped: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads posts from the content directory
pub struct ContentLoader<'a> {
    app: &'a Postmatter,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(app: &'a Postmatter) -> Self {
        Self { app }
    }

    /// Load all posts, with draft inclusion taken from config
    pub fn load_posts(&self) -> LoadReport {
        self.load_posts_with(self.app.config.include_drafts)
    }

    /// Load all posts from the content directory.
    ///
    /// Every markdown file is parsed independently; a document that
    /// fails lands in `failures` and never aborts the walk.
    pub fn load_posts_with(&self, include_drafts: bool) -> LoadReport {
        let content_dir = &self.app.content_dir;
        if !content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", content_dir);
            return LoadReport::default();
        }

        let excludes = self.compile_excludes();
        let tz = self.app.config.tz();
        let mut report = LoadReport::default();

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            let source = relative_source(path, content_dir);
            if excludes.iter().any(|pattern| pattern.matches(&source)) {
                tracing::debug!("Skipping excluded file {}", source);
                continue;
            }

            match load_post(path, &source, tz) {
                Ok(post) if post.draft && !include_drafts => {
                    report.drafts_skipped += 1;
                }
                Ok(post) => report.posts.push(post),
                Err(error) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, error);
                    report.failures.push(LoadFailure { source, error });
                }
            }
        }

        // Sort by date descending (newest first); ties break on source
        // path so the order never depends on directory iteration
        report
            .posts
            .sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.source.cmp(&b.source)));
        report.failures.sort_by(|a, b| a.source.cmp(&b.source));

        report
    }

    /// Compile config exclude patterns, dropping invalid ones with a
    /// warning
    fn compile_excludes(&self) -> Vec<Pattern> {
        self.app
            .config
            .exclude
            .iter()
            .filter_map(|raw| match Pattern::new(raw) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!("Ignoring invalid exclude pattern `{}`: {}", raw, e);
                    None
                }
            })
            .collect()
    }
}

/// Load a single post from a file
fn load_post(path: &Path, source: &str, tz: Tz) -> Result<Post, DocumentError> {
    let text = fs::read_to_string(path)?;
    let mut post = Post::from_document(&text, tz)?;
    post.source = source.to_string();
    Ok(post)
}

fn relative_source(path: &Path, content_dir: &Path) -> String {
    path.strip_prefix(content_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
