//! The Post model

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::frontmatter::{FrontMatter, MetadataError};

/// A blog post parsed from a front-matter document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date, keeping the timezone offset it resolved to
    pub date: DateTime<FixedOffset>,

    /// Drafts are excluded from published output
    pub draft: bool,

    /// Raw markdown body; may be empty
    pub body: String,

    /// Source file path relative to the collection root.
    /// Empty for posts parsed from bare text.
    pub source: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Post {
    /// Parse a complete document into a post.
    ///
    /// This is the whole per-document contract: the metadata block must
    /// parse, `title` and `date` must be present, and `draft` defaults
    /// to false when absent. A failure is terminal for this document
    /// only; callers loading a collection report it and move on.
    pub fn from_document(text: &str, tz: Tz) -> Result<Self, MetadataError> {
        let (fm, body) = FrontMatter::parse(text)?;
        let date = fm.parse_date(tz)?;
        let title = fm.title.ok_or(MetadataError::MissingField("title"))?;

        Ok(Self {
            title,
            date,
            draft: fm.draft.unwrap_or(false),
            body: body.to_string(),
            source: String::new(),
            extra: fm.extra,
        })
    }

    /// Rebuild the metadata block this post serializes to.
    ///
    /// The date is written as RFC 3339 and `draft` is only emitted when
    /// true, matching the convention that published posts simply omit
    /// the key.
    pub fn front_matter(&self) -> FrontMatter {
        FrontMatter {
            title: Some(self.title.clone()),
            date: Some(self.date.to_rfc3339()),
            draft: self.draft.then_some(true),
            extra: self.extra.clone(),
        }
    }

    /// Serialize back into front-matter document form
    pub fn to_document(&self) -> Result<String, MetadataError> {
        self.front_matter().to_document(&self.body)
    }

    /// Whether this post belongs in published output
    pub fn published(&self) -> bool {
        !self.draft
    }
}
