//! Initialize a new post collection

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::{Postmatter, CONFIG_FILE};

/// Initialize a new collection in the given directory
pub fn init_collection(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("posts"))?;

    // Create default postmatter.yml
    let config_content = r#"# Postmatter Configuration

# Collection
title: Postmatter
description: ''
author: John Doe
language: en
timezone: ''

# Directory
content_dir: posts
exclude: []

# Writing
new_post_name: :title.md
include_drafts: false

# Date format for listings
date_format: YYYY-MM-DD
"#;

    fs::write(target_dir.join(CONFIG_FILE), config_content)?;

    // Create a sample post. The scaffolded config resolves offset-less
    // dates in UTC, so the sample is stamped in UTC wall-clock time.
    let now = chrono::Utc::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
---

Welcome to your post collection. This is your first post; edit it or
delete it, then create your own:

```bash
$ postmatter new "My New Post"
```

Fenced code blocks keep their language hint for whatever renders the
collection later:

```rust
fn main() {{
    println!("hello");
}}
```

Run `postmatter check` before every build to catch malformed metadata.
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("posts/hello-world.md"), sample_post)?;

    Ok(())
}

/// Run the init command with an existing Postmatter instance
pub fn run(app: &Postmatter) -> Result<()> {
    init_collection(&app.base_dir)
}
