//! `new-post` scaffolding.
//!
//! Writes `posts/{YYYY-MM-DD}-{slug}.mdx` with a front-matter block the
//! store can load right away:
//!
//! ```text
//! ---
//! title: "First Light"
//! date: "2025-01-01"
//! excerpt: ""
//! tags: ["astronomy"]
//! author: ""
//! ---
//!
//! # First Light
//! ```
//!
//! Titles come from the command line or, when none is given, from
//! interactive prompts (title, excerpt, comma-separated tags, author).
//! Existing files are never overwritten.

use crate::naming;
use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title {0:?} has no letters or digits to build a file name from")]
    EmptySlug(String),
    #[error("file already exists: {}", .0.display())]
    Exists(PathBuf),
}

/// Fields of a post to scaffold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub author: String,
}

impl NewPost {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Split comma-separated tags, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// JSON string literal, which is also a valid double-quoted YAML scalar.
fn quoted(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Render the file content for `post` dated `date`.
pub fn render_post(post: &NewPost, date: NaiveDate) -> String {
    // The heading is a single markdown line
    let heading = post.title.split_whitespace().collect::<Vec<_>>().join(" ");
    let tags = serde_json::Value::from(post.tags.clone()).to_string();
    format!(
        "---\n\
         title: {title}\n\
         date: \"{date}\"\n\
         excerpt: {excerpt}\n\
         tags: {tags}\n\
         author: {author}\n\
         ---\n\
         \n\
         # {heading}\n\
         \n",
        title = quoted(&post.title),
        date = date.format("%Y-%m-%d"),
        excerpt = quoted(&post.excerpt),
        author = quoted(&post.author),
    )
}

/// Create the post file under `posts_dir`, creating the directory if needed.
///
/// Returns the path written.
pub fn create_post(posts_dir: &Path, post: &NewPost, date: NaiveDate) -> Result<PathBuf, ScaffoldError> {
    let title = post.title.trim();
    if title.is_empty() {
        return Err(ScaffoldError::EmptyTitle);
    }
    let file_name = naming::post_file_name(date, title)
        .ok_or_else(|| ScaffoldError::EmptySlug(title.to_string()))?;
    let path = posts_dir.join(file_name);
    if path.exists() {
        return Err(ScaffoldError::Exists(path));
    }

    fs::create_dir_all(posts_dir)?;
    let post = NewPost {
        title: title.to_string(),
        excerpt: post.excerpt.trim().to_string(),
        tags: post.tags.clone(),
        author: post.author.trim().to_string(),
    };
    // create_new closes the gap between the exists check and the write
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => ScaffoldError::Exists(path.clone()),
            _ => ScaffoldError::Io(e),
        })?;
    file.write_all(render_post(&post, date).as_bytes())?;
    tracing::info!(path = %path.display(), "created post");
    Ok(path)
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Ask for the post fields interactively.
///
/// Fails with [`ScaffoldError::EmptyTitle`] as soon as the title is blank,
/// without asking the remaining questions.
pub fn prompt_post<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<NewPost, ScaffoldError> {
    let title = ask(input, output, "Title: ")?;
    if title.is_empty() {
        return Err(ScaffoldError::EmptyTitle);
    }
    let excerpt = ask(input, output, "Excerpt (optional): ")?;
    let tags = parse_tags(&ask(input, output, "Tags, comma-separated (optional): ")?);
    let author = ask(input, output, "Author (optional): ")?;
    Ok(NewPost {
        title,
        excerpt,
        tags,
        author,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    #[test]
    fn rendered_post_parses_back() {
        let post = NewPost {
            title: "Say \"hi\" to Andromeda".into(),
            excerpt: "Short: sweet".into(),
            tags: vec!["space".into(), "notes".into()],
            author: "Vega".into(),
        };
        let content = render_post(&post, date());
        let doc = frontmatter::parse(&content).unwrap();
        let fm = doc.front_matter;
        assert_eq!(fm.title.as_deref(), Some("Say \"hi\" to Andromeda"));
        assert_eq!(fm.date.as_deref(), Some("2025-03-09"));
        assert_eq!(fm.excerpt.as_deref(), Some("Short: sweet"));
        assert_eq!(fm.tags, vec!["space", "notes"]);
        assert_eq!(fm.author.as_deref(), Some("Vega"));
        assert!(doc.body.starts_with("# Say \"hi\" to Andromeda"));
    }

    #[test]
    fn multiline_title_keeps_heading_on_one_line() {
        let content = render_post(&NewPost::titled("Two\nLines\t here"), date());
        let doc = frontmatter::parse(&content).unwrap();
        assert_eq!(doc.front_matter.title.as_deref(), Some("Two\nLines\t here"));
        assert!(doc.body.starts_with("# Two Lines here\n"));
    }

    #[test]
    fn empty_fields_render_as_empty_strings() {
        let content = render_post(&NewPost::titled("X"), date());
        assert!(content.contains("excerpt: \"\"\n"));
        assert!(content.contains("tags: []\n"));
        assert!(content.contains("author: \"\"\n"));
    }

    #[test]
    fn create_writes_dated_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("posts");
        let path = create_post(&dir, &NewPost::titled("First Light"), date()).unwrap();
        assert_eq!(path, dir.join("2025-03-09-first-light.mdx"));
        assert!(fs::read_to_string(&path).unwrap().contains("# First Light"));
    }

    #[test]
    fn create_refuses_empty_title() {
        let tmp = TempDir::new().unwrap();
        let result = create_post(tmp.path(), &NewPost::titled("   "), date());
        assert!(matches!(result, Err(ScaffoldError::EmptyTitle)));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn create_refuses_empty_slug() {
        let tmp = TempDir::new().unwrap();
        let result = create_post(tmp.path(), &NewPost::titled("?!"), date());
        assert!(matches!(result, Err(ScaffoldError::EmptySlug(_))));
    }

    #[test]
    fn create_refuses_existing_file() {
        let tmp = TempDir::new().unwrap();
        let first = create_post(tmp.path(), &NewPost::titled("Twice"), date()).unwrap();
        fs::write(&first, "edited").unwrap();

        let result = create_post(tmp.path(), &NewPost::titled("Twice"), date());
        assert!(matches!(result, Err(ScaffoldError::Exists(p)) if p == first));
        assert_eq!(fs::read_to_string(&first).unwrap(), "edited");
    }

    #[test]
    fn create_keeps_unicode_titles() {
        let tmp = TempDir::new().unwrap();
        let path = create_post(tmp.path(), &NewPost::titled("宇宙 笔记"), date()).unwrap();
        assert_eq!(path.file_name().unwrap(), "2025-03-09-宇宙-笔记.mdx");
    }

    #[test]
    fn parse_tags_drops_blanks() {
        assert_eq!(parse_tags(" a, b ,, c ,"), vec!["a", "b", "c"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn prompt_reads_all_fields() {
        let mut input = Cursor::new("Nebula Notes\nA short one\nspace, css\nVega\n");
        let mut output = Vec::new();
        let post = prompt_post(&mut input, &mut output).unwrap();
        assert_eq!(post.title, "Nebula Notes");
        assert_eq!(post.excerpt, "A short one");
        assert_eq!(post.tags, vec!["space", "css"]);
        assert_eq!(post.author, "Vega");
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.starts_with("Title: "));
    }

    #[test]
    fn prompt_stops_on_empty_title() {
        let mut input = Cursor::new("\nignored\n");
        let mut output = Vec::new();
        let result = prompt_post(&mut input, &mut output);
        assert!(matches!(result, Err(ScaffoldError::EmptyTitle)));
        assert_eq!(String::from_utf8(output).unwrap(), "Title: ");
    }

    #[test]
    fn prompt_at_eof_is_empty_title() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(matches!(
            prompt_post(&mut input, &mut output),
            Err(ScaffoldError::EmptyTitle)
        ));
    }
}
