//! Front-matter parsing for post files.
//!
//! A post starts with a metadata block followed by the markdown body:
//!
//! ```text
//! ---
//! title: "First Light"
//! date: "2025-01-01"
//! excerpt: "Notes from the first night out"
//! tags: ["astronomy", "notes"]
//! author: Lucent
//! ---
//!
//! # First Light
//! ...
//! ```
//!
//! Two block styles are accepted:
//!
//! - `---` delimited: the YAML subset the scaffold writes and editors
//!   produce — `key: value` pairs with quoted or bare scalars, inline
//!   `[a, "b"]` lists, block `- item` lists and `#` comments.
//! - `+++` delimited: TOML, parsed with the `toml` crate.
//!
//! Unknown keys are ignored. Required keys are enforced by the store, not
//! here, so this module stays a pure text → struct transformation.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front-matter opened with {0} but never closed")]
    Unterminated(&'static str),
    #[error("front-matter line {line}: expected `key: value`, got {text:?}")]
    InvalidLine { line: usize, text: String },
    #[error("front-matter TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Metadata recognized in a post's front-matter block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    /// Raw date text; see [`parse_date`].
    pub date: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub featured: bool,
}

/// A post split into metadata and markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    pub front_matter: FrontMatter,
    pub body: &'a str,
}

/// Parse a post file's content.
///
/// Content without a leading `---`/`+++` line has empty front-matter and the
/// whole text as body.
pub fn parse(content: &str) -> Result<Document<'_>, FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some((delim, header, body)) = split(content)? else {
        return Ok(Document {
            front_matter: FrontMatter::default(),
            body: content,
        });
    };
    let front_matter = match delim {
        "---" => parse_yaml_subset(header)?,
        _ => parse_toml(header)?,
    };
    Ok(Document { front_matter, body })
}

/// Parse the date formats found in front-matter.
///
/// Accepts `YYYY-MM-DD` and anything that starts with it (ISO timestamps
/// such as `2025-01-01T08:00:00Z`).
pub fn parse_date(raw: &str) -> Result<NaiveDate, FrontMatterError> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| FrontMatterError::InvalidDate(raw.to_string()))
}

/// Split `content` into (delimiter, header, body).
fn split(content: &str) -> Result<Option<(&'static str, &str, &str)>, FrontMatterError> {
    let delim = match content.lines().next().map(str::trim_end) {
        Some("---") => "---",
        Some("+++") => "+++",
        _ => return Ok(None),
    };
    let after_open = match content.find('\n') {
        Some(pos) => &content[pos + 1..],
        None => return Err(FrontMatterError::Unterminated(delim)),
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == delim {
            let header = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok(Some((delim, header, body.trim_start_matches(['\r', '\n']))));
        }
        offset += line.len();
    }
    Err(FrontMatterError::Unterminated(delim))
}

enum Scalar {
    Text(String),
    List(Vec<String>),
}

impl Scalar {
    /// A `key:` line with nothing after it, waiting for block list items.
    fn is_empty_text(&self) -> bool {
        matches!(self, Scalar::Text(t) if t.is_empty())
    }
}

fn list_item(line: &str) -> Option<&str> {
    if line == "-" {
        Some("")
    } else {
        line.strip_prefix("- ")
    }
}

fn parse_yaml_subset(header: &str) -> Result<FrontMatter, FrontMatterError> {
    let mut fields: Vec<(String, Scalar)> = Vec::new();

    for (idx, raw_line) in header.lines().enumerate() {
        let line = raw_line.trim_end();
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Block list item belonging to the previous key
        if let Some(item) = list_item(trimmed) {
            let item = unquote(item.trim());
            match fields.last_mut() {
                Some((_, Scalar::List(items))) => items.push(item),
                Some((_, slot)) if slot.is_empty_text() => *slot = Scalar::List(vec![item]),
                _ => {
                    return Err(FrontMatterError::InvalidLine {
                        line: idx + 2,
                        text: line.to_string(),
                    });
                }
            }
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            return Err(FrontMatterError::InvalidLine {
                line: idx + 2,
                text: line.to_string(),
            });
        };
        let value = strip_comment(value.trim());
        let scalar = if value.starts_with('[') && value.ends_with(']') {
            Scalar::List(parse_inline_list(value))
        } else {
            Scalar::Text(unquote(value))
        };
        fields.push((key.trim().to_string(), scalar));
    }

    let mut fm = FrontMatter::default();
    for (key, value) in fields {
        match (key.as_str(), value) {
            ("title", Scalar::Text(t)) => fm.title = non_empty(t),
            ("date", Scalar::Text(t)) => fm.date = non_empty(t),
            ("excerpt" | "description", Scalar::Text(t)) => {
                fm.excerpt = fm.excerpt.or(non_empty(t));
            }
            ("author", Scalar::Text(t)) => fm.author = non_empty(t),
            ("tags", Scalar::List(items)) => fm.tags = clean_tags(items),
            ("tags", Scalar::Text(t)) => {
                fm.tags = clean_tags(t.split(',').map(str::to_string).collect());
            }
            ("featured", Scalar::Text(t)) => fm.featured = t.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }
    Ok(fm)
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlFrontMatter {
    title: Option<String>,
    date: Option<toml::Value>,
    excerpt: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    author: Option<String>,
    featured: bool,
}

fn parse_toml(header: &str) -> Result<FrontMatter, FrontMatterError> {
    let raw: TomlFrontMatter = toml::from_str(header)?;
    let date = raw.date.map(toml_date_text);
    Ok(FrontMatter {
        title: raw.title.and_then(non_empty),
        date: date.and_then(non_empty),
        excerpt: raw.excerpt.or(raw.description).and_then(non_empty),
        tags: clean_tags(raw.tags),
        author: raw.author.and_then(non_empty),
        featured: raw.featured,
    })
}

/// Text of a TOML date value, quoted (`"2025-01-01"`) or a date literal.
pub(crate) fn toml_date_text(value: toml::Value) -> String {
    match value {
        toml::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Drop a trailing ` # comment` from an unquoted value.
fn strip_comment(value: &str) -> &str {
    if value.starts_with('"') || value.starts_with('\'') {
        return value;
    }
    match value.find(" #") {
        Some(pos) => value[..pos].trim_end(),
        None => value,
    }
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        // Double-quoted scalars share JSON's escape rules
        return serde_json::from_str::<String>(value)
            .unwrap_or_else(|_| value[1..value.len() - 1].to_string());
    }
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].replace("''", "'");
    }
    value.to_string()
}

fn parse_inline_list(value: &str) -> Vec<String> {
    if let Ok(items) = serde_json::from_str::<Vec<String>>(value) {
        return items;
    }
    value[1..value.len() - 1]
        .split(',')
        .map(|item| unquote(item.trim()))
        .collect()
}

fn clean_tags(items: Vec<String>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(items.len());
    for tag in items {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scaffolded_post() {
        let content = r#"---
title: "First Light"
date: "2025-01-01"
excerpt: ""
tags: ["astronomy", "notes"]
author: ""
---

# First Light

Body text.
"#;
        let doc = parse(content).unwrap();
        let fm = &doc.front_matter;
        assert_eq!(fm.title.as_deref(), Some("First Light"));
        assert_eq!(fm.date.as_deref(), Some("2025-01-01"));
        assert_eq!(fm.excerpt, None);
        assert_eq!(fm.author, None);
        assert_eq!(fm.tags, vec!["astronomy", "notes"]);
        assert!(doc.body.starts_with("# First Light"));
    }

    #[test]
    fn parses_block_list_and_bare_scalars() {
        let content = "---\ntitle: Orbits\ndate: 2024-06-30\ntags:\n  - math\n  - 'physics'\nfeatured: true\n---\nbody";
        let doc = parse(content).unwrap();
        assert_eq!(doc.front_matter.title.as_deref(), Some("Orbits"));
        assert_eq!(doc.front_matter.tags, vec!["math", "physics"]);
        assert!(doc.front_matter.featured);
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn parses_unquoted_inline_list() {
        let content = "---\ntitle: T\ntags: [rust, wasm , rust]\n---\n";
        let doc = parse(content).unwrap();
        assert_eq!(doc.front_matter.tags, vec!["rust", "wasm"]);
    }

    #[test]
    fn comma_separated_tags_string() {
        let content = "---\ntags: a, b,, c\n---\n";
        let doc = parse(content).unwrap();
        assert_eq!(doc.front_matter.tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn escaped_quotes_in_title() {
        let content = "---\ntitle: \"Say \\\"hi\\\"\"\n---\n";
        let doc = parse(content).unwrap();
        assert_eq!(doc.front_matter.title.as_deref(), Some("Say \"hi\""));
    }

    #[test]
    fn comments_and_unknown_keys_ignored() {
        let content = "---\n# draft\ntitle: Hi # inline\nlayout: wide\n---\n";
        let doc = parse(content).unwrap();
        assert_eq!(doc.front_matter.title.as_deref(), Some("Hi"));
    }

    #[test]
    fn toml_front_matter() {
        let content = "+++\ntitle = \"Toml Post\"\ndate = 2024-05-04\ntags = [\"x\"]\nfeatured = true\n+++\nBody";
        let doc = parse(content).unwrap();
        assert_eq!(doc.front_matter.title.as_deref(), Some("Toml Post"));
        assert_eq!(doc.front_matter.date.as_deref(), Some("2024-05-04"));
        assert_eq!(doc.front_matter.tags, vec!["x"]);
        assert!(doc.front_matter.featured);
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn no_front_matter_returns_whole_body() {
        let doc = parse("# Just markdown\n").unwrap();
        assert_eq!(doc.front_matter, FrontMatter::default());
        assert_eq!(doc.body, "# Just markdown\n");
    }

    #[test]
    fn unterminated_block_is_error() {
        let result = parse("---\ntitle: Oops\n");
        assert!(matches!(result, Err(FrontMatterError::Unterminated("---"))));
    }

    #[test]
    fn line_without_colon_is_error() {
        let result = parse("---\ntitle: ok\nnot a pair\n---\n");
        assert!(matches!(
            result,
            Err(FrontMatterError::InvalidLine { line: 3, .. })
        ));
    }

    #[test]
    fn crlf_line_endings() {
        let doc = parse("---\r\ntitle: Win\r\n---\r\nbody\r\n").unwrap();
        assert_eq!(doc.front_matter.title.as_deref(), Some("Win"));
        assert_eq!(doc.body, "body\r\n");
    }

    #[test]
    fn parse_date_accepts_iso_timestamp() {
        let d = parse_date("2025-01-01T08:30:00.000Z").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(matches!(
            parse_date("yesterday"),
            Err(FrontMatterError::InvalidDate(_))
        ));
    }
}
