//! List the post collection

use anyhow::Result;

use crate::content::{markdown, ContentLoader};
use crate::helpers::date::format_date;
use crate::Postmatter;

const SUMMARY_CHARS: usize = 48;

/// List posts with date, title, source, and a one-line summary
pub fn run(app: &Postmatter, drafts: bool) -> Result<()> {
    let loader = ContentLoader::new(app);
    let report = if drafts {
        loader.load_posts_with(true)
    } else {
        loader.load_posts()
    };

    println!("Posts ({}):", report.posts.len());
    for post in &report.posts {
        let date = format_date(&post.date, &app.config.date_format);
        let marker = if post.draft { " (draft)" } else { "" };
        println!("  {} - {} [{}]{}", date, post.title, post.source, marker);

        let summary = markdown::plain_summary(&post.body, SUMMARY_CHARS);
        if !summary.is_empty() {
            println!("      {}", summary);
        }
    }

    if report.drafts_skipped > 0 {
        println!(
            "{} draft(s) not shown; pass --drafts to include them",
            report.drafts_skipped
        );
    }
    if !report.is_clean() {
        println!(
            "{} document(s) failed to parse; run `postmatter check` for details",
            report.failures.len()
        );
    }

    Ok(())
}
