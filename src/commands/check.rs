//! Validate every document in the collection

use anyhow::Result;

use crate::content::ContentLoader;
use crate::Postmatter;

/// Parse everything, drafts included, and report each failure.
///
/// Returns an error when any document failed, so an invoking build
/// process sees a nonzero exit.
pub fn run(app: &Postmatter) -> Result<()> {
    let report = ContentLoader::new(app).load_posts_with(true);

    for failure in &report.failures {
        println!("{}: {}", failure.source, failure.error);
    }

    println!(
        "Checked {} document(s): {} ok, {} failed",
        report.posts.len() + report.failures.len(),
        report.posts.len(),
        report.failures.len()
    );

    if !report.is_clean() {
        anyhow::bail!("{} document(s) failed to parse", report.failures.len());
    }

    Ok(())
}
