//! Shared test utilities for the nebula-lucent test suite.
//!
//! Provides fixture setup, an in-memory item builder and lookup helpers that
//! panic with the available ids on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let store = ContentStore::load(tmp.path(), &PostsConfig::default());
//!
//! let post = find_item(store.list(), "2025-01-01-first-light");
//! assert_eq!(post.title, "First Light");
//!
//! let a = item("a", "2025-01-01", true);
//! assert_eq!(ids([&a]), vec!["a"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::content::{Category, ContentItem, ContentKind, Links, Status};
use chrono::NaiveDate;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Item builder
// =========================================================================

/// A published post with the given id, `YYYY-MM-DD` date and featured flag.
///
/// The title is the id upper-cased; everything else is empty. Tests tweak
/// the fields they care about.
pub fn item(id: &str, date: &str, featured: bool) -> ContentItem {
    ContentItem {
        kind: ContentKind::Post,
        id: id.to_string(),
        title: id.to_uppercase(),
        description: String::new(),
        tags: Vec::new(),
        technologies: Vec::new(),
        category: Category::Article,
        status: Status::Published,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        featured,
        author: None,
        difficulty: None,
        icon: None,
        links: Links::default(),
        body: None,
    }
}

// =========================================================================
// Lookups — panic with a clear message on miss
// =========================================================================

/// Find an item by id. Panics if not found.
pub fn find_item<'a>(items: &'a [ContentItem], id: &str) -> &'a ContentItem {
    items.iter().find(|i| i.id == id).unwrap_or_else(|| {
        let available: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        panic!("item '{id}' not found. Available: {available:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Ids of a sequence of items, in order.
pub fn ids<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> Vec<&'a str> {
    items.into_iter().map(|i| i.id.as_str()).collect()
}
