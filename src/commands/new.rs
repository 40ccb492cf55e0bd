//! Create a new post

use anyhow::Result;
use chrono::Utc;
use std::fs;

use crate::content::FrontMatter;
use crate::Postmatter;

/// Create a new post document
pub fn run(app: &Postmatter, title: &str, draft: bool, path: Option<&str>) -> Result<()> {
    let now = Utc::now().with_timezone(&app.config.tz()).fixed_offset();

    // Generate filename
    let filename = if let Some(p) = path {
        format!("{}.md", p.trim_end_matches(".md"))
    } else {
        let slug = slug::slugify(title);
        app.config
            .new_post_name
            .replace(":title", &slug)
            .replace(":year", &now.format("%Y").to_string())
            .replace(":month", &now.format("%m").to_string())
            .replace(":day", &now.format("%d").to_string())
    };

    // Patterns like :year/:title.md produce nested paths
    let file_path = app.content_dir.join(&filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    // The document goes through the same serializer that round-trips
    // parsed posts, so whatever `new` writes is parseable by definition
    let fm = FrontMatter {
        title: Some(title.to_string()),
        date: Some(now.to_rfc3339()),
        draft: draft.then_some(true),
        ..Default::default()
    };
    let content = fm.to_document("")?;

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}
