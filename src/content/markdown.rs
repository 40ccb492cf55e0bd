//! Markdown body scanning.
//!
//! Bodies stay raw Markdown end to end; rendering them to HTML is the
//! downstream generator's job. What lives here is structural scanning
//! of the inert text, feeding listings and the export manifest.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

fn scan_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Distinct fenced-code language hints, in order of first appearance.
///
/// The hints are passthrough data for an external highlighter;
/// untagged fences and indented code blocks contribute nothing.
pub fn code_languages(markdown: &str) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();

    for event in Parser::new_ext(markdown, scan_options()) {
        if let Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) = event {
            // The info string may carry attributes after the language
            let lang = info.split_whitespace().next().unwrap_or("");
            if !lang.is_empty() && !languages.iter().any(|l| l == lang) {
                languages.push(lang.to_string());
            }
        }
    }

    languages
}

/// Plain text of the leading paragraph (or heading), truncated to
/// `max_chars` characters, for one-line listings.
pub fn plain_summary(markdown: &str, max_chars: usize) -> String {
    let mut text = String::new();
    let mut in_code = false;

    for event in Parser::new_ext(markdown, scan_options()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code = true,
            Event::End(TagEnd::CodeBlock) => in_code = false,
            Event::Text(t) | Event::Code(t) if !in_code => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_)) if !text.is_empty() => break,
            _ => {}
        }
    }

    truncate_chars(text.trim(), max_chars)
}

/// Truncate to a character budget, appending `…` when text was cut
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}
