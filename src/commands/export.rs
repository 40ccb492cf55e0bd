//! Export the collection as a JSON manifest
//!
//! The manifest is the hand-off point to whatever renders the site:
//! bodies stay raw Markdown, dates are RFC 3339, and fenced-code
//! language hints are listed per post so a renderer can set up
//! highlighting without re-scanning.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::content::{markdown, ContentLoader, LoadReport, Post};
use crate::Postmatter;

const SUMMARY_CHARS: usize = 160;

/// Manifest handed to the downstream renderer
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub title: String,
    pub author: String,
    pub language: String,
    pub generated_at: DateTime<FixedOffset>,
    pub posts: Vec<ManifestPost>,
}

/// One post record in the manifest
#[derive(Debug, Serialize)]
pub struct ManifestPost {
    pub title: String,
    pub date: DateTime<FixedOffset>,
    pub draft: bool,
    pub source: String,
    pub body: String,
    pub summary: String,
    pub code_languages: Vec<String>,
    /// Custom front-matter fields, namespaced under their own key: an
    /// author's `summary` or `source` lands here, never over the
    /// computed fields above
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Build the manifest for a loaded collection
pub fn manifest(app: &Postmatter, report: &LoadReport) -> Manifest {
    Manifest {
        title: app.config.title.clone(),
        author: app.config.author.clone(),
        language: app.config.language.clone(),
        generated_at: Utc::now().fixed_offset(),
        posts: report.posts.iter().map(manifest_post).collect(),
    }
}

fn manifest_post(post: &Post) -> ManifestPost {
    ManifestPost {
        title: post.title.clone(),
        date: post.date,
        draft: post.draft,
        source: post.source.clone(),
        body: post.body.clone(),
        summary: markdown::plain_summary(&post.body, SUMMARY_CHARS),
        code_languages: markdown::code_languages(&post.body),
        extra: post.extra.clone(),
    }
}

/// Run the export command
pub fn run(app: &Postmatter, output: Option<&Path>, drafts: bool) -> Result<()> {
    let loader = ContentLoader::new(app);
    let report = if drafts {
        loader.load_posts_with(true)
    } else {
        loader.load_posts()
    };

    for failure in &report.failures {
        tracing::warn!("Leaving {} out of the manifest: {}", failure.source, failure.error);
    }

    let manifest = manifest(app, &report);
    let json = serde_json::to_string_pretty(&manifest)?;

    match output {
        Some(path) => {
            fs::write(path, &json).with_context(|| format!("Failed to write {:?}", path))?;
            println!("Exported {} post(s) to {:?}", manifest.posts.len(), path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn collection_with(docs: &[(&str, &str)]) -> (TempDir, Postmatter) {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("posts");
        fs::create_dir_all(&posts).unwrap();
        for (name, text) in docs {
            fs::write(posts.join(name), text).unwrap();
        }
        let app = Postmatter::new(dir.path()).unwrap();
        (dir, app)
    }

    #[test]
    fn test_manifest_records_scan_results() {
        let (_dir, app) = collection_with(&[(
            "post.md",
            "---\ntitle: T\ndate: 2023-01-01T00:00:00+00:00\ntags:\n- a\n---\n\n\
             Intro line.\n\n```rust\nfn x() {}\n```\n",
        )]);
        let report = app.load();
        let manifest = manifest(&app, &report);

        assert_eq!(manifest.posts.len(), 1);
        let record = &manifest.posts[0];
        assert_eq!(record.title, "T");
        assert_eq!(record.summary, "Intro line.");
        assert_eq!(record.code_languages, ["rust"]);
        assert!(record.extra.contains_key("tags"));
    }

    #[test]
    fn test_author_extras_cannot_shadow_record_fields() {
        let (_dir, app) = collection_with(&[(
            "post.md",
            "---\ntitle: T\ndate: 2023-01-01\nsummary: author-provided\n---\n\n\
             Computed from the body.\n",
        )]);
        let report = app.load();
        let json = serde_json::to_string_pretty(&manifest(&app, &report)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let record = &value["posts"][0];
        assert_eq!(record["summary"], "Computed from the body.");
        assert_eq!(record["extra"]["summary"], "author-provided");
    }

    #[test]
    fn test_export_writes_valid_json() {
        let (dir, app) = collection_with(&[
            ("a.md", "---\ntitle: A\ndate: 2023-02-01\n---\nbody a"),
            ("b.md", "---\ntitle: B\ndate: 2023-01-01\n---\nbody b"),
        ]);
        let out = dir.path().join("manifest.json");

        run(&app, Some(&out), false).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["title"], "Postmatter");
        let posts = json["posts"].as_array().unwrap();
        assert_eq!(posts.len(), 2);
        // Newest first, raw markdown body, RFC 3339 date
        assert_eq!(posts[0]["title"], "A");
        assert_eq!(posts[0]["body"], "body a");
        assert_eq!(posts[0]["date"], "2023-02-01T00:00:00+00:00");
        assert_eq!(posts[1]["title"], "B");
    }

    #[test]
    fn test_drafts_only_exported_on_request() {
        let (dir, app) = collection_with(&[
            ("p.md", "---\ntitle: P\ndate: 2023-01-02\n---\n"),
            ("d.md", "---\ntitle: D\ndate: 2023-01-01\ndraft: true\n---\n"),
        ]);

        let out = dir.path().join("published.json");
        run(&app, Some(&out), false).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["posts"].as_array().unwrap().len(), 1);

        let out = dir.path().join("all.json");
        run(&app, Some(&out), true).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        let posts = json["posts"].as_array().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1]["draft"], true);
    }
}
