//! Centralized filename and slug handling.
//!
//! Posts live in files named `YYYY-MM-DD-slug.mdx`. The date prefix is
//! optional; when present it doubles as a fallback for a missing `date`
//! front-matter key. The whole file stem (date included) is the post's URL
//! slug, so renaming a file is the only way to move a post.
//!
//! ## Slugs
//!
//! [`slugify`] turns a title into a URL-safe slug: lowercase, punctuation
//! dropped, whitespace runs collapsed to a single dash. Letters and digits of
//! any script are kept, so `"宇宙 笔记"` becomes `"宇宙-笔记"` rather than an
//! empty string.

use chrono::NaiveDate;

/// Result of parsing a post file stem like `2025-01-01-hello-world`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStem {
    /// Date prefix if present and valid.
    pub date: Option<NaiveDate>,
    /// Remainder after the date prefix, dashes preserved. The full stem
    /// when there is no date prefix.
    pub name: String,
    /// `name` with dashes converted to spaces.
    pub display_title: String,
}

/// Parse a post file stem following the optional `YYYY-MM-DD-name` convention.
///
/// - `"2025-01-01-hello-world"` → date=2025-01-01, name="hello-world"
/// - `"2025-01-01"` → date=2025-01-01, name=""
/// - `"hello-world"` → date=None, name="hello-world"
/// - `"2025-13-01-typo"` → date=None (invalid date), name="2025-13-01-typo"
pub fn parse_post_stem(stem: &str) -> ParsedStem {
    if stem.len() >= 10
        && stem.is_char_boundary(10)
        && let Ok(date) = NaiveDate::parse_from_str(&stem[..10], "%Y-%m-%d")
    {
        let rest = &stem[10..];
        if rest.is_empty() || rest.starts_with('-') {
            let name = rest.trim_start_matches('-');
            return ParsedStem {
                date: Some(date),
                name: name.to_string(),
                display_title: name.replace('-', " "),
            };
        }
    }
    ParsedStem {
        date: None,
        name: stem.to_string(),
        display_title: stem.replace('-', " "),
    }
}

/// Convert a title into a URL slug.
///
/// Returns an empty string when the title has no letters or digits.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
        // Anything else is punctuation and is dropped without splitting words
    }
    slug
}

/// Whether `id` can be used as one URL path segment and directory name.
pub fn is_path_segment(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.chars().any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_control())
}

/// File name for a new post: `YYYY-MM-DD-slug.mdx`.
///
/// Returns `None` if the title produces an empty slug.
pub fn post_file_name(date: NaiveDate, title: &str) -> Option<String> {
    let slug = slugify(title);
    if slug.is_empty() {
        return None;
    }
    Some(format!("{}-{}.mdx", date.format("%Y-%m-%d"), slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn path_segments() {
        assert!(is_path_segment("cosmic-ui"));
        assert!(is_path_segment("宇宙"));
        assert!(!is_path_segment(""));
        assert!(!is_path_segment(".."));
        assert!(!is_path_segment("a/b"));
        assert!(!is_path_segment("a?b"));
        assert!(!is_path_segment("2025-01-01-c#-tips"));
        assert!(!is_path_segment("100%"));
    }

    #[test]
    fn dated_stem_with_name() {
        let p = parse_post_stem("2025-01-01-hello-world");
        assert_eq!(p.date, Some(date(2025, 1, 1)));
        assert_eq!(p.name, "hello-world");
        assert_eq!(p.display_title, "hello world");
    }

    #[test]
    fn date_only_stem() {
        let p = parse_post_stem("2025-01-01");
        assert_eq!(p.date, Some(date(2025, 1, 1)));
        assert_eq!(p.name, "");
    }

    #[test]
    fn undated_stem() {
        let p = parse_post_stem("hello-world");
        assert_eq!(p.date, None);
        assert_eq!(p.name, "hello-world");
        assert_eq!(p.display_title, "hello world");
    }

    #[test]
    fn invalid_date_prefix_is_part_of_name() {
        let p = parse_post_stem("2025-13-01-typo");
        assert_eq!(p.date, None);
        assert_eq!(p.name, "2025-13-01-typo");
    }

    #[test]
    fn date_glued_to_name_is_not_a_prefix() {
        let p = parse_post_stem("2025-01-01x");
        assert_eq!(p.date, None);
    }

    #[test]
    fn multibyte_stem_does_not_panic() {
        let p = parse_post_stem("宇宙笔记与星辰");
        assert_eq!(p.date, None);
        assert_eq!(p.name, "宇宙笔记与星辰");
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn slugify_drops_punctuation() {
        assert_eq!(slugify("What's new in Rust 2024?"), "whats-new-in-rust-2024");
    }

    #[test]
    fn slugify_collapses_dashes_and_spaces() {
        assert_eq!(slugify("  a -- b   c  "), "a-b-c");
    }

    #[test]
    fn slugify_keeps_cjk() {
        assert_eq!(slugify("宇宙 笔记"), "宇宙-笔记");
    }

    #[test]
    fn slugify_empty_for_punctuation_only() {
        assert_eq!(slugify("?!..."), "");
    }

    #[test]
    fn post_file_name_uses_date_prefix() {
        assert_eq!(
            post_file_name(date(2025, 3, 9), "First Light").as_deref(),
            Some("2025-03-09-first-light.mdx")
        );
    }

    #[test]
    fn post_file_name_none_for_empty_slug() {
        assert_eq!(post_file_name(date(2025, 3, 9), "!!!"), None);
    }
}
