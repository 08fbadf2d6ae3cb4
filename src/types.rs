//! Shared types used by the generator and the CLI output.
//!
//! The generator returns a [`BuildReport`] describing every file it wrote;
//! `output` formats that report for the terminal, and `--json` callers get
//! it serialized as-is.

use serde::Serialize;

/// A top-level navigation entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    pub title: String,
    /// Site-relative path without slashes. Empty for the home page.
    pub path: String,
}

impl NavItem {
    fn new(title: &str, path: &str) -> Self {
        Self {
            title: title.to_string(),
            path: path.to_string(),
        }
    }

    pub fn href(&self) -> String {
        if self.path.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", self.path)
        }
    }

    /// Whether `current_path` is this entry or lives under it.
    pub fn is_current(&self, current_path: &str) -> bool {
        if self.path.is_empty() {
            return current_path.is_empty();
        }
        current_path == self.path || current_path.starts_with(&format!("{}/", self.path))
    }
}

/// The site's section navigation, in display order.
pub fn site_nav() -> Vec<NavItem> {
    vec![
        NavItem::new("Home", ""),
        NavItem::new("Posts", "posts"),
        NavItem::new("Lab", "lab"),
        NavItem::new("Program", "program"),
        NavItem::new("Knowledge", "knowledge"),
    ]
}

/// What a generated page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    Home,
    /// Section index (posts, lab, program, knowledge).
    Listing,
    /// Tag or category subset of a section.
    Filter,
    /// One item's page.
    Detail,
    NotFound,
}

/// One HTML file written by the generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPage {
    /// Output path relative to the output directory, `/`-separated.
    pub path: String,
    pub title: String,
    pub kind: PageKind,
}

impl GeneratedPage {
    /// First path component, or `""` for top-level files.
    pub fn section(&self) -> &str {
        match self.path.split_once('/') {
            Some((section, _)) => section,
            None => "",
        }
    }
}

/// Summary of one `build`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    pub pages: Vec<GeneratedPage>,
    /// File name of the fingerprinted stylesheet.
    pub stylesheet: String,
    pub assets_copied: usize,
    /// Load warnings carried over from the store.
    pub warnings: usize,
}

impl BuildReport {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_hrefs() {
        let nav = site_nav();
        assert_eq!(nav[0].href(), "/");
        assert_eq!(nav[1].href(), "/posts/");
    }

    #[test]
    fn nav_current_matches_section_and_children() {
        let posts = NavItem::new("Posts", "posts");
        assert!(posts.is_current("posts"));
        assert!(posts.is_current("posts/tag/rust"));
        assert!(!posts.is_current("postscript"));
        assert!(!posts.is_current(""));

        let home = NavItem::new("Home", "");
        assert!(home.is_current(""));
        assert!(!home.is_current("lab"));
    }

    #[test]
    fn page_section_is_first_component() {
        let page = |path: &str| GeneratedPage {
            path: path.to_string(),
            title: String::new(),
            kind: PageKind::Detail,
        };
        assert_eq!(page("posts/a/index.html").section(), "posts");
        assert_eq!(page("index.html").section(), "");
    }
}
