//! Front-matter parsing and serialization

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fence line opening and closing a YAML metadata block
pub const YAML_FENCE: &str = "---";
/// Fence line opening and closing a TOML metadata block
pub const TOML_FENCE: &str = "+++";

/// Why a document's metadata could not be parsed.
///
/// Every variant is a malformed-metadata failure: terminal for the one
/// document it occurred in, never for the rest of the collection.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("document does not start with a front-matter block")]
    MissingBlock,

    #[error("front-matter block is never closed (no `{0}` line)")]
    MissingDelimiter(&'static str),

    #[error("missing required `{0}` field")]
    MissingField(&'static str),

    #[error("`{field}` must be a {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unparseable date `{0}`")]
    InvalidDate(String),

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML front-matter: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Front-matter data from a post, exactly as authored.
///
/// Everything is optional at this layer; required-field validation
/// happens when a `Post` is built from the document. Keys that are
/// never written are never serialized back, so re-serializing a
/// document does not invent metadata the author left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Date as authored; typed parsing is a separate step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Drafts are excluded from published output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,

    /// Additional custom fields, in authored order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from a full document.
    /// Returns (front_matter, body).
    ///
    /// A `---` opening line selects YAML, a `+++` line selects TOML.
    /// A document that opens no block at all is `MissingBlock`; one
    /// that opens a block and never closes it is `MissingDelimiter`.
    pub fn parse(text: &str) -> Result<(Self, &str), MetadataError> {
        // Editors on some platforms prepend a BOM; it is not content.
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        if let Some(rest) = strip_opening_fence(text, YAML_FENCE) {
            let (block, body) = split_at_closing_fence(rest, YAML_FENCE)?;
            let fm = if block.trim().is_empty() {
                // An empty block is legal; missing fields are caught later
                FrontMatter::default()
            } else {
                serde_yaml::from_str(block)?
            };
            return Ok((fm, body));
        }

        if let Some(rest) = strip_opening_fence(text, TOML_FENCE) {
            let (block, body) = split_at_closing_fence(rest, TOML_FENCE)?;
            return Ok((Self::from_toml(block)?, body));
        }

        Err(MetadataError::MissingBlock)
    }

    /// Parse a TOML metadata block into the same shape YAML parses to.
    ///
    /// TOML datetime literals become their string form and go through
    /// the same date parsing as YAML dates; unknown values land in
    /// `extra` as YAML values so one representation serves both formats.
    fn from_toml(block: &str) -> Result<Self, MetadataError> {
        let table: toml::Table = toml::from_str(block)?;
        let mut fm = FrontMatter::default();

        for (key, value) in table {
            match key.as_str() {
                "title" => match value {
                    toml::Value::String(s) => fm.title = Some(s),
                    _ => {
                        return Err(MetadataError::InvalidField {
                            field: "title",
                            expected: "string",
                        })
                    }
                },
                "date" => match value {
                    toml::Value::String(s) => fm.date = Some(s),
                    toml::Value::Datetime(dt) => fm.date = Some(dt.to_string()),
                    _ => {
                        return Err(MetadataError::InvalidField {
                            field: "date",
                            expected: "date or string",
                        })
                    }
                },
                "draft" => match value {
                    toml::Value::Boolean(b) => fm.draft = Some(b),
                    _ => {
                        return Err(MetadataError::InvalidField {
                            field: "draft",
                            expected: "boolean",
                        })
                    }
                },
                _ => {
                    fm.extra.insert(key, toml_value_to_yaml(value));
                }
            }
        }

        Ok(fm)
    }

    /// Parse the date field into a typed timestamp.
    ///
    /// Dates written with an offset keep it; offset-less dates are
    /// resolved in `tz`.
    pub fn parse_date(&self, tz: Tz) -> Result<DateTime<FixedOffset>, MetadataError> {
        let raw = self
            .date
            .as_deref()
            .ok_or(MetadataError::MissingField("date"))?;
        parse_date_string(raw, tz)
    }

    /// Serialize this front-matter, canonically as YAML, followed by
    /// the body. Input format is not remembered: TOML documents
    /// round-trip to YAML with every field intact.
    pub fn to_document(&self, body: &str) -> Result<String, MetadataError> {
        let yaml = serde_yaml::to_string(self)?;
        let mut doc = format!("{}\n{}{}\n", YAML_FENCE, yaml, YAML_FENCE);
        if !body.is_empty() {
            doc.push('\n');
            doc.push_str(body);
        }
        Ok(doc)
    }
}

/// Strip an opening fence line, tolerating a CRLF ending.
///
/// The fence must fill its whole line: `----` or `--- title` do not
/// open a block.
fn strip_opening_fence<'a>(text: &'a str, fence: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(fence)?;
    if rest.is_empty() {
        // Opened on the last line; the closing-fence scan reports it
        return Some(rest);
    }
    if let Some(rest) = rest.strip_prefix("\r\n") {
        return Some(rest);
    }
    rest.strip_prefix('\n')
}

/// Find the closing fence line, returning (block, body).
///
/// The body starts after the closing line, with leading blank lines
/// stripped. An empty body is permitted.
fn split_at_closing_fence<'a>(
    rest: &'a str,
    fence: &'static str,
) -> Result<(&'a str, &'a str), MetadataError> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == fence {
            let body = &rest[offset + line.len()..];
            return Ok((&rest[..offset], body.trim_start_matches(['\n', '\r'])));
        }
        offset += line.len();
    }
    Err(MetadataError::MissingDelimiter(fence))
}

/// Parse a date string in the formats posts are actually written with.
fn parse_date_string(s: &str, tz: Tz) -> Result<DateTime<FixedOffset>, MetadataError> {
    let trimmed = s.trim();

    // RFC 3339 first: the offset the author wrote is kept as-is
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }

    // Offset without the T separator, or without the colon
    for fmt in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%d %H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return resolve_in_zone(dt, tz, s);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            let dt = d
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| MetadataError::InvalidDate(s.to_string()))?;
            return resolve_in_zone(dt, tz, s);
        }
    }

    Err(MetadataError::InvalidDate(s.to_string()))
}

/// Resolve an offset-less local time in `tz` to a fixed-offset
/// timestamp. Times that do not exist in the zone (DST gaps) are
/// unparseable.
fn resolve_in_zone(
    dt: NaiveDateTime,
    tz: Tz,
    raw: &str,
) -> Result<DateTime<FixedOffset>, MetadataError> {
    tz.from_local_datetime(&dt)
        .earliest()
        .map(|resolved| resolved.fixed_offset())
        .ok_or_else(|| MetadataError::InvalidDate(raw.to_string()))
}

fn toml_value_to_yaml(value: toml::Value) -> serde_yaml::Value {
    match value {
        toml::Value::String(s) => serde_yaml::Value::String(s),
        toml::Value::Integer(i) => serde_yaml::Value::Number(i.into()),
        toml::Value::Float(f) => serde_yaml::Value::Number(serde_yaml::Number::from(f)),
        toml::Value::Boolean(b) => serde_yaml::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_yaml::Value::String(dt.to_string()),
        toml::Value::Array(items) => {
            serde_yaml::Value::Sequence(items.into_iter().map(toml_value_to_yaml).collect())
        }
        toml::Value::Table(table) => {
            let mut map = serde_yaml::Mapping::new();
            for (key, value) in table {
                map.insert(serde_yaml::Value::String(key), toml_value_to_yaml(value));
            }
            serde_yaml::Value::Mapping(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
draft: true
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.date, Some("2024-01-15 10:30:00".to_string()));
        assert_eq!(fm.draft, Some(true));
        assert!(body.contains("This is the content."));
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = r#"+++
title = "Hello TOML"
date = 2024-01-15T10:30:00+09:00
tags = ["rust", "toml"]
+++

Body here.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Hello TOML".to_string()));
        assert_eq!(fm.date, Some("2024-01-15T10:30:00+09:00".to_string()));
        assert_eq!(fm.draft, None);
        assert_eq!(
            fm.extra.get("tags"),
            Some(&serde_yaml::Value::Sequence(vec![
                serde_yaml::Value::String("rust".into()),
                serde_yaml::Value::String("toml".into()),
            ]))
        );
        assert!(body.contains("Body here."));
    }

    #[test]
    fn test_missing_block() {
        let err = FrontMatter::parse("Just some prose, no metadata.").unwrap_err();
        assert!(matches!(err, MetadataError::MissingBlock));
    }

    #[test]
    fn test_missing_closing_delimiter() {
        let content = "---\ntitle: Unclosed\ndate: 2024-01-15\n\nThe body swallowed the fence.";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, MetadataError::MissingDelimiter("---")));
    }

    #[test]
    fn test_fence_must_fill_its_line() {
        assert!(matches!(
            FrontMatter::parse("----\ntitle: X\n----\n").unwrap_err(),
            MetadataError::MissingBlock
        ));
        // A longer dash run inside the block is body text, not a fence
        let content = "---\ntitle: X\n---\n\n----\n";
        let (_, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(body, "----\n");
    }

    #[test]
    fn test_empty_block_parses_to_default() {
        let (fm, body) = FrontMatter::parse("---\n---\n\nhello").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "hello");
    }

    #[test]
    fn test_empty_body_permitted() {
        let (fm, body) = FrontMatter::parse("---\ntitle: X\n---\n").unwrap();
        assert_eq!(fm.title, Some("X".to_string()));
        assert_eq!(body, "");
    }

    #[test]
    fn test_crlf_document() {
        let content = "---\r\ntitle: Windows\r\ndate: 2024-01-15\r\n---\r\n\r\nbody\r\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Windows".to_string()));
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn test_bom_is_stripped() {
        let content = "\u{feff}---\ntitle: X\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("X".to_string()));
    }

    #[test]
    fn test_parse_date_rfc3339_keeps_offset() {
        let fm = FrontMatter {
            date: Some("2023-01-01T09:00:00+09:00".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date(chrono_tz::UTC).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(dt.to_rfc3339(), "2023-01-01T09:00:00+09:00");
    }

    #[test]
    fn test_parse_date_offset_less_resolved_in_zone() {
        let fm = FrontMatter {
            date: Some("2024-01-15 10:30:00".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date(chrono_tz::Asia::Tokyo).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(dt.to_rfc3339(), "2024-01-15T10:30:00+09:00");
    }

    #[test]
    fn test_parse_date_only() {
        let fm = FrontMatter {
            date: Some("2024-01-15".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date(chrono_tz::UTC).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_parse_date_missing() {
        let err = FrontMatter::default().parse_date(chrono_tz::UTC).unwrap_err();
        assert!(matches!(err, MetadataError::MissingField("date")));
    }

    #[test]
    fn test_parse_date_invalid() {
        let fm = FrontMatter {
            date: Some("next Tuesday".to_string()),
            ..Default::default()
        };
        let err = fm.parse_date(chrono_tz::UTC).unwrap_err();
        assert!(matches!(err, MetadataError::InvalidDate(_)));
    }

    #[test]
    fn test_toml_field_type_errors() {
        let err = FrontMatter::parse("+++\ntitle = 42\n+++\n").unwrap_err();
        assert!(matches!(
            err,
            MetadataError::InvalidField { field: "title", .. }
        ));

        let err = FrontMatter::parse("+++\ndraft = \"yes\"\n+++\n").unwrap_err();
        assert!(matches!(
            err,
            MetadataError::InvalidField { field: "draft", .. }
        ));
    }

    #[test]
    fn test_to_document_round_trip() {
        let fm = FrontMatter {
            title: Some("Round Trip".to_string()),
            date: Some("2023-01-01T00:00:00+00:00".to_string()),
            draft: Some(true),
            ..Default::default()
        };
        let doc = fm.to_document("body text").unwrap();
        let (reparsed, body) = FrontMatter::parse(&doc).unwrap();
        assert_eq!(reparsed, fm);
        assert_eq!(body, "body text");
    }

    #[test]
    fn test_absent_keys_not_serialized() {
        let fm = FrontMatter {
            title: Some("X".to_string()),
            ..Default::default()
        };
        let doc = fm.to_document("").unwrap();
        assert!(!doc.contains("date"));
        assert!(!doc.contains("draft"));
    }

    #[test]
    fn test_extra_fields_preserved_in_order() {
        let content = "---\ntitle: X\nzeta: 1\nalpha: 2\nmiddle: 3\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        let keys: Vec<&String> = fm.extra.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "middle"]);

        let doc = fm.to_document("").unwrap();
        let (reparsed, _) = FrontMatter::parse(&doc).unwrap();
        assert_eq!(reparsed, fm);
    }
}
