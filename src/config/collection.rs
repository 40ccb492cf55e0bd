//! Collection configuration (postmatter.yml)

use anyhow::{bail, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main collection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    // Collection
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    /// IANA zone offset-less post dates resolve in; empty means UTC
    pub timezone: String,

    // Directory
    pub content_dir: String,
    #[serde(default)]
    pub exclude: Vec<String>,

    // Writing
    pub new_post_name: String,
    pub include_drafts: bool,

    // Date format for listings (Moment.js tokens)
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            title: "Postmatter".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            content_dir: "posts".to_string(),
            exclude: Vec::new(),

            new_post_name: ":title.md".to_string(),
            include_drafts: false,

            date_format: "YYYY-MM-DD".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl CollectionConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: CollectionConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would only fail later
    fn validate(&self) -> Result<()> {
        if !self.timezone.is_empty() && self.timezone.parse::<Tz>().is_err() {
            bail!(
                "invalid timezone `{}` (expected an IANA name like Asia/Tokyo)",
                self.timezone
            );
        }
        Ok(())
    }

    /// The timezone offset-less post dates are resolved in
    pub fn tz(&self) -> Tz {
        if self.timezone.is_empty() {
            return Tz::UTC;
        }
        self.timezone.parse().unwrap_or(Tz::UTC)
    }
}
