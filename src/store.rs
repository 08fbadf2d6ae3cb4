//! Content store: loading and querying every item on the site.
//!
//! ## Sources
//!
//! ```text
//! content/
//! ├── posts/                        # One file per post, front-matter + markdown
//! │   ├── 2025-01-01-first-light.mdx
//! │   └── notes/2024-11-02-orbits.md   # Subdirectories are walked
//! ├── projects.toml                 # [[project]] entries
//! ├── experiments.toml              # [[experiment]] entries
//! └── knowledge.toml                # [[category]] entries
//! ```
//!
//! ## Failing Soft
//!
//! The site must always build. A missing posts directory or catalog yields an
//! empty section; an unreadable or malformed source is skipped with a
//! warning and recorded in [`ContentStore::warnings`] so `check` can report
//! it. Only lookups fail hard: [`ContentStore::get`] returns
//! [`StoreError::NotFound`] for an unknown id.
//!
//! ## Ordering
//!
//! [`ContentStore::list`] is featured-first, then newest-first. The sort is
//! stable, so items with the same featured flag and date keep load order
//! (posts by path, catalog entries by position in the file).

use crate::config::PostsConfig;
use crate::content::{
    Category, ContentItem, ContentKind, Difficulty, KnowledgeCategory, Links, Status,
    listing_order,
};
use crate::frontmatter::{self, FrontMatterError};
use crate::naming;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
    #[error("{path}: missing required front-matter key `{key}`")]
    MissingField { path: PathBuf, key: &'static str },
    #[error("catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("catalog {path}: entry {id:?} has invalid date: {source}")]
    CatalogDate {
        path: PathBuf,
        id: String,
        #[source]
        source: FrontMatterError,
    },
    #[error("{path}: id {id:?} is not usable in a URL")]
    InvalidId { path: PathBuf, id: String },
    #[error("no content with id {0:?}")]
    NotFound(String),
}

/// Every loaded item, sorted for listing.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    items: Vec<ContentItem>,
    knowledge: Vec<KnowledgeCategory>,
    warnings: Vec<String>,
}

impl ContentStore {
    /// Build a store from in-memory items. Sorts them into listing order.
    pub fn new(mut items: Vec<ContentItem>, knowledge: Vec<KnowledgeCategory>) -> Self {
        items.sort_by(listing_order);
        Self {
            items,
            knowledge,
            warnings: Vec::new(),
        }
    }

    /// Load every source under `root`. Never fails; problems become warnings.
    pub fn load(root: &Path, posts: &PostsConfig) -> Self {
        let mut warnings = Vec::new();
        let mut items = Vec::new();

        let posts_dir = root.join(&posts.dir);
        let (post_items, post_errors) = load_posts(&posts_dir);
        items.extend(post_items);
        warnings.extend(post_errors.iter().map(ToString::to_string));

        for (file, kind) in [
            ("projects.toml", ContentKind::Project),
            ("experiments.toml", ContentKind::Experiment),
        ] {
            match load_catalog(&root.join(file), kind) {
                Ok(entries) => items.extend(entries),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping catalog");
                    warnings.push(e.to_string());
                }
            }
        }

        let knowledge = match load_knowledge(&root.join("knowledge.toml")) {
            Ok(k) => k,
            Err(e) => {
                tracing::warn!(error = %e, "skipping knowledge index");
                warnings.push(e.to_string());
                Vec::new()
            }
        };

        let items = dedupe(items, &mut warnings);
        let mut store = Self::new(items, knowledge);
        store.warnings = warnings;
        tracing::debug!(
            items = store.items.len(),
            warnings = store.warnings.len(),
            "content store loaded"
        );
        store
    }

    /// All items: featured first, then newest first.
    pub fn list(&self) -> &[ContentItem] {
        &self.items
    }

    /// Items of one kind, in listing order.
    pub fn filter_by_kind(&self, kind: ContentKind) -> Vec<&ContentItem> {
        self.items.iter().filter(|i| i.kind == kind).collect()
    }

    /// Look up an item by id across all kinds.
    pub fn get(&self, id: &str) -> Result<&ContentItem, StoreError> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Look up an item by id within one kind.
    pub fn get_kind(&self, kind: ContentKind, id: &str) -> Result<&ContentItem, StoreError> {
        self.items
            .iter()
            .find(|i| i.kind == kind && i.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn filter_by_category(&self, category: Category) -> Vec<&ContentItem> {
        self.items.iter().filter(|i| i.category == category).collect()
    }

    /// Items whose tags or technologies contain `tag`.
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&ContentItem> {
        self.items.iter().filter(|i| i.has_tag(tag)).collect()
    }

    /// Sorted unique tags (and technologies) of one kind, or of everything.
    pub fn tags(&self, kind: Option<ContentKind>) -> Vec<&str> {
        let mut tags: Vec<&str> = self
            .items
            .iter()
            .filter(|i| kind.is_none_or(|k| i.kind == k))
            .flat_map(|i| i.tags.iter().chain(&i.technologies))
            .map(String::as_str)
            .collect();
        tags.sort_unstable();
        tags.dedup();
        tags
    }

    /// Categories of one kind in first-seen listing order.
    pub fn categories(&self, kind: ContentKind) -> Vec<Category> {
        let mut seen = Vec::new();
        for item in self.items.iter().filter(|i| i.kind == kind) {
            if !seen.contains(&item.category) {
                seen.push(item.category);
            }
        }
        seen
    }

    pub fn knowledge(&self) -> &[KnowledgeCategory] {
        &self.knowledge
    }

    /// Problems found while loading; empty for a clean content tree.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Drop items whose (kind, id) repeats an earlier one.
fn dedupe(items: Vec<ContentItem>, warnings: &mut Vec<String>) -> Vec<ContentItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let fresh = seen.insert((item.kind, item.id.clone()));
            if !fresh {
                let msg = format!("duplicate {} id {:?} ignored", item.kind.label(), item.id);
                tracing::warn!("{msg}");
                warnings.push(msg);
            }
            fresh
        })
        .collect()
}

// ============================================================================
// Posts
// ============================================================================

fn is_post_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("mdx"))
            .unwrap_or(false)
}

/// Load every post under `dir`, in path order.
///
/// Returns the parsed posts and the per-file errors of the ones skipped. A
/// missing directory is not an error: the blog is simply empty.
pub fn load_posts(dir: &Path) -> (Vec<ContentItem>, Vec<StoreError>) {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "posts directory not found; blog will be empty");
        return (Vec::new(), Vec::new());
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            !e.file_name().to_string_lossy().starts_with('.') && is_post_file(e.path())
        })
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    let results: Vec<Result<ContentItem, StoreError>> = paths
        .par_iter()
        .map(|path| {
            let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            parse_post(path, &content)
        })
        .collect();

    let mut posts = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(post) => {
                tracing::debug!(slug = %post.id, "loaded post");
                posts.push(post);
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping post");
                errors.push(e);
            }
        }
    }
    (posts, errors)
}

/// Build a post from a file's path and content.
///
/// The slug is the file stem. `title` is required; `date` is required but
/// may come from a `YYYY-MM-DD-` file name prefix.
pub fn parse_post(path: &Path, content: &str) -> Result<ContentItem, StoreError> {
    let doc = frontmatter::parse(content).map_err(|source| StoreError::FrontMatter {
        path: path.to_path_buf(),
        source,
    })?;
    let fm = doc.front_matter;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    if !naming::is_path_segment(&stem) {
        return Err(StoreError::InvalidId {
            path: path.to_path_buf(),
            id: stem,
        });
    }
    let parsed = naming::parse_post_stem(&stem);

    let title = fm.title.ok_or_else(|| StoreError::MissingField {
        path: path.to_path_buf(),
        key: "title",
    })?;
    let date = match (&fm.date, parsed.date) {
        (Some(raw), _) => {
            frontmatter::parse_date(raw).map_err(|source| StoreError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })?
        }
        (None, Some(from_name)) => from_name,
        (None, None) => {
            return Err(StoreError::MissingField {
                path: path.to_path_buf(),
                key: "date",
            });
        }
    };

    Ok(ContentItem {
        kind: ContentKind::Post,
        id: stem,
        title,
        description: fm.excerpt.unwrap_or_default(),
        tags: fm.tags,
        technologies: Vec::new(),
        category: Category::Article,
        status: Status::Published,
        date,
        featured: fm.featured,
        author: fm.author,
        difficulty: None,
        icon: None,
        links: Links::default(),
        body: Some(doc.body.to_string()),
    })
}

// ============================================================================
// Catalogs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogEntry {
    id: String,
    title: String,
    description: String,
    #[serde(default)]
    long_description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    technologies: Vec<String>,
    category: Category,
    status: Status,
    date: toml::Value,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct Catalog {
    #[serde(default)]
    project: Vec<CatalogEntry>,
    #[serde(default)]
    experiment: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct KnowledgeFile {
    #[serde(default)]
    category: Vec<KnowledgeCategory>,
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "catalog not present");
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Load the `[[project]]` or `[[experiment]]` entries of a catalog file.
///
/// A missing file is an empty catalog.
pub fn load_catalog(path: &Path, kind: ContentKind) -> Result<Vec<ContentItem>, StoreError> {
    let Some(text) = read_optional(path)? else {
        return Ok(Vec::new());
    };
    let catalog: Catalog = toml::from_str(&text).map_err(|source| StoreError::Catalog {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = match kind {
        ContentKind::Project => catalog.project,
        ContentKind::Experiment => catalog.experiment,
        ContentKind::Post => Vec::new(),
    };
    entries
        .into_iter()
        .map(|entry| catalog_item(path, kind, entry))
        .collect()
}

fn catalog_item(
    path: &Path,
    kind: ContentKind,
    entry: CatalogEntry,
) -> Result<ContentItem, StoreError> {
    if !naming::is_path_segment(&entry.id) {
        return Err(StoreError::InvalidId {
            path: path.to_path_buf(),
            id: entry.id,
        });
    }
    let raw_date = frontmatter::toml_date_text(entry.date);
    let date: NaiveDate =
        frontmatter::parse_date(&raw_date).map_err(|source| StoreError::CatalogDate {
            path: path.to_path_buf(),
            id: entry.id.clone(),
            source,
        })?;
    Ok(ContentItem {
        kind,
        id: entry.id,
        title: entry.title,
        description: entry.description,
        tags: entry.tags,
        technologies: entry.technologies,
        category: entry.category,
        status: entry.status,
        date,
        featured: entry.featured,
        author: None,
        difficulty: entry.difficulty,
        icon: entry.icon,
        links: entry.links,
        body: entry.long_description,
    })
}

/// Load the knowledge-base categories. A missing file is an empty index.
pub fn load_knowledge(path: &Path) -> Result<Vec<KnowledgeCategory>, StoreError> {
    let Some(text) = read_optional(path)? else {
        return Ok(Vec::new());
    };
    let file: KnowledgeFile = toml::from_str(&text).map_err(|source| StoreError::Catalog {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(bad) = file.category.iter().find(|c| !naming::is_path_segment(&c.id)) {
        return Err(StoreError::InvalidId {
            path: path.to_path_buf(),
            id: bad.id.clone(),
        });
    }
    Ok(file.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    // =========================================================================
    // Ordering and queries
    // =========================================================================

    #[test]
    fn list_is_featured_first_then_newest() {
        let store = ContentStore::new(
            vec![
                item("old", "2023-01-01", false),
                item("star-old", "2022-05-05", true),
                item("new", "2025-02-02", false),
                item("star-new", "2024-05-05", true),
            ],
            vec![],
        );
        assert_eq!(ids(store.list()), vec!["star-new", "star-old", "new", "old"]);
    }

    #[test]
    fn list_keeps_load_order_for_ties() {
        let store = ContentStore::new(
            vec![
                item("first", "2024-01-01", false),
                item("second", "2024-01-01", false),
            ],
            vec![],
        );
        assert_eq!(ids(store.list()), vec!["first", "second"]);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let store = ContentStore::new(vec![item("a", "2024-01-01", false)], vec![]);
        assert!(store.get("a").is_ok());
        assert!(matches!(store.get("zzz"), Err(StoreError::NotFound(id)) if id == "zzz"));
    }

    #[test]
    fn get_kind_scopes_lookup() {
        let mut project = item("shared", "2024-01-01", false);
        project.kind = ContentKind::Project;
        let store = ContentStore::new(vec![project], vec![]);
        assert!(store.get_kind(ContentKind::Project, "shared").is_ok());
        assert!(store.get_kind(ContentKind::Post, "shared").is_err());
    }

    #[test]
    fn filters_by_category_and_tag() {
        let mut web = item("web", "2024-01-01", false);
        web.category = Category::Web;
        web.technologies = vec!["Rust".into()];
        let mut post = item("post", "2024-02-01", false);
        post.tags = vec!["Rust".into(), "notes".into()];
        let store = ContentStore::new(vec![web, post], vec![]);

        assert_eq!(ids(store.filter_by_category(Category::Web)), vec!["web"]);
        assert_eq!(ids(store.filter_by_tag("Rust")), vec!["post", "web"]);
        assert_eq!(ids(store.filter_by_tag("notes")), vec!["post"]);
        assert!(store.filter_by_tag("missing").is_empty());
    }

    #[test]
    fn tags_sorted_unique() {
        let mut a = item("a", "2024-01-01", false);
        a.tags = vec!["b".into(), "a".into()];
        let mut b = item("b", "2024-01-02", false);
        b.tags = vec!["a".into()];
        b.technologies = vec!["c".into()];
        let store = ContentStore::new(vec![a, b], vec![]);
        assert_eq!(store.tags(None), vec!["a", "b", "c"]);
    }

    #[test]
    fn categories_in_first_seen_order() {
        let mut a = item("a", "2025-01-01", false);
        a.kind = ContentKind::Project;
        a.category = Category::Library;
        let mut b = item("b", "2024-01-01", false);
        b.kind = ContentKind::Project;
        b.category = Category::Web;
        let mut c = item("c", "2023-01-01", false);
        c.kind = ContentKind::Project;
        c.category = Category::Library;
        let store = ContentStore::new(vec![c, b, a], vec![]);
        assert_eq!(
            store.categories(ContentKind::Project),
            vec![Category::Library, Category::Web]
        );
    }

    // =========================================================================
    // Post parsing
    // =========================================================================

    #[test]
    fn parse_post_uses_stem_as_slug() {
        let post = parse_post(
            Path::new("posts/2025-01-01-first-light.mdx"),
            "---\ntitle: First Light\ndate: 2025-01-02\ntags: [a]\n---\nHello",
        )
        .unwrap();
        assert_eq!(post.id, "2025-01-01-first-light");
        assert_eq!(post.title, "First Light");
        // Front-matter date wins over the file name
        assert_eq!(post.date.to_string(), "2025-01-02");
        assert_eq!(post.body.as_deref(), Some("Hello"));
        assert_eq!(post.category, Category::Article);
    }

    #[test]
    fn parse_post_date_falls_back_to_file_name() {
        let post = parse_post(
            Path::new("2024-07-04-fireworks.md"),
            "---\ntitle: Fireworks\n---\n",
        )
        .unwrap();
        assert_eq!(post.date.to_string(), "2024-07-04");
    }

    #[test]
    fn parse_post_missing_title_is_error() {
        let result = parse_post(Path::new("2024-07-04-x.md"), "---\ndate: 2024-07-04\n---\n");
        assert!(matches!(
            result,
            Err(StoreError::MissingField { key: "title", .. })
        ));
    }

    #[test]
    fn parse_post_missing_date_is_error() {
        let result = parse_post(Path::new("undated.md"), "---\ntitle: X\n---\n");
        assert!(matches!(
            result,
            Err(StoreError::MissingField { key: "date", .. })
        ));
    }

    #[test]
    fn parse_post_bad_date_is_error() {
        let result = parse_post(Path::new("x.md"), "---\ntitle: X\ndate: soon\n---\n");
        assert!(matches!(result, Err(StoreError::FrontMatter { .. })));
    }

    // =========================================================================
    // Loading from disk
    // =========================================================================

    #[test]
    fn load_posts_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let (posts, errors) = load_posts(&tmp.path().join("nope"));
        assert!(posts.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn load_posts_skips_bad_files_and_walks_subdirs() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("posts");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("2025-01-01-a.md"), "---\ntitle: A\n---\nbody").unwrap();
        fs::write(dir.join("nested/2025-01-02-b.mdx"), "---\ntitle: B\n---\n").unwrap();
        fs::write(dir.join("broken.md"), "---\ntitle: never closed\n").unwrap();
        fs::write(dir.join("notes.txt"), "not a post").unwrap();

        let (posts, errors) = load_posts(&dir);
        let mut slugs: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["2025-01-01-a", "2025-01-02-b"]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn load_catalog_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let items = load_catalog(&tmp.path().join("projects.toml"), ContentKind::Project).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn load_catalog_parses_entries() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("projects.toml");
        fs::write(
            &path,
            r#"
[[project]]
id = "cosmic-ui"
title = "Cosmic UI"
description = "Component library"
long_description = "Thirty components."
tags = ["ui"]
technologies = ["React"]
category = "library"
status = "completed"
date = "2024-12-15"
featured = true
icon = "🎨"

[project.links]
github = "https://github.com/example/cosmic-ui"
"#,
        )
        .unwrap();

        let items = load_catalog(&path, ContentKind::Project).unwrap();
        assert_eq!(items.len(), 1);
        let p = &items[0];
        assert_eq!(p.kind, ContentKind::Project);
        assert_eq!(p.category, Category::Library);
        assert_eq!(p.status, Status::Completed);
        assert!(p.featured);
        assert_eq!(p.body.as_deref(), Some("Thirty components."));
        assert_eq!(p.links.github.as_deref(), Some("https://github.com/example/cosmic-ui"));
    }

    #[test]
    fn load_catalog_accepts_toml_date_literal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("experiments.toml");
        fs::write(
            &path,
            r#"
[[experiment]]
id = "grid"
title = "Grid"
description = "CSS grid"
category = "web-feature"
status = "experimental"
date = 2025-01-03
difficulty = "beginner"
"#,
        )
        .unwrap();
        let items = load_catalog(&path, ContentKind::Experiment).unwrap();
        assert_eq!(items[0].date.to_string(), "2025-01-03");
        assert_eq!(items[0].difficulty, Some(Difficulty::Beginner));
    }

    #[test]
    fn load_catalog_rejects_unknown_category() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("projects.toml");
        fs::write(
            &path,
            r#"
[[project]]
id = "x"
title = "X"
description = "x"
category = "spaceship"
status = "completed"
date = "2024-01-01"
"#,
        )
        .unwrap();
        assert!(matches!(
            load_catalog(&path, ContentKind::Project),
            Err(StoreError::Catalog { .. })
        ));
    }

    #[test]
    fn load_catalog_rejects_path_like_id() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("projects.toml");
        fs::write(
            &path,
            r#"
[[project]]
id = "../escape"
title = "X"
description = "x"
category = "web"
status = "completed"
date = "2024-01-01"
"#,
        )
        .unwrap();
        assert!(matches!(
            load_catalog(&path, ContentKind::Project),
            Err(StoreError::InvalidId { .. })
        ));
    }

    #[test]
    fn parse_post_rejects_stem_unusable_in_url() {
        let result = parse_post(
            Path::new("posts/2025-01-01-c#-tips?.md"),
            "---\ntitle: T\n---\nbody",
        );
        assert!(matches!(
            result,
            Err(StoreError::InvalidId { id, .. }) if id == "2025-01-01-c#-tips?"
        ));
    }

    #[test]
    fn load_posts_skips_stem_unusable_in_url() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("posts");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("2025-01-01-ok.md"), "---\ntitle: Ok\n---\n").unwrap();
        fs::write(dir.join("2025-01-02-50%-off.md"), "---\ntitle: Sale\n---\n").unwrap();

        let (posts, errors) = load_posts(&dir);
        assert_eq!(ids(&posts), vec!["2025-01-01-ok"]);
        assert!(matches!(errors.as_slice(), [StoreError::InvalidId { .. }]));
    }

    #[test]
    fn load_knowledge_rejects_path_like_ids() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("knowledge.toml");
        for id in ["../../escaped", ""] {
            fs::write(
                &path,
                format!(
                    "[[category]]\nid = \"rust\"\ntitle = \"Rust\"\ndescription = \"r\"\n\n\
                     [[category]]\nid = {id:?}\ntitle = \"Bad\"\ndescription = \"b\"\n"
                ),
            )
            .unwrap();
            assert!(
                matches!(load_knowledge(&path), Err(StoreError::InvalidId { id: bad, .. }) if bad == id),
                "id {id:?} accepted"
            );
        }
    }

    #[test]
    fn load_warns_on_path_like_knowledge_id() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("knowledge.toml"),
            "[[category]]\nid = \"\"\ntitle = \"Empty\"\ndescription = \"e\"\n",
        )
        .unwrap();
        let store = ContentStore::load(tmp.path(), &PostsConfig::default());
        assert!(store.knowledge().is_empty());
        assert_eq!(store.warnings().len(), 1);
        assert!(store.warnings()[0].contains("not usable in a URL"));
    }

    #[test]
    fn load_fails_soft_on_broken_catalog() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("projects.toml"), "[[project]\nbroken").unwrap();
        let store = ContentStore::load(tmp.path(), &PostsConfig::default());
        assert!(store.is_empty());
        assert_eq!(store.warnings().len(), 1);
        assert!(store.warnings()[0].contains("projects.toml"));
    }

    #[test]
    fn load_empty_root_is_empty_store() {
        let tmp = TempDir::new().unwrap();
        let store = ContentStore::load(tmp.path(), &PostsConfig::default());
        assert!(store.is_empty());
        assert!(store.knowledge().is_empty());
        assert!(store.warnings().is_empty());
    }

    #[test]
    fn load_drops_duplicate_ids() {
        let tmp = TempDir::new().unwrap();
        let entry = r#"
[[experiment]]
id = "dup"
title = "Dup"
description = "d"
category = "other"
status = "completed"
date = "2024-01-01"
"#;
        fs::write(tmp.path().join("experiments.toml"), format!("{entry}{entry}")).unwrap();
        let store = ContentStore::load(tmp.path(), &PostsConfig::default());
        assert_eq!(store.list().len(), 1);
        assert!(store.warnings()[0].contains("duplicate"));
    }

    // =========================================================================
    // Fixture content
    // =========================================================================

    #[test]
    fn fixtures_load_all_sections() {
        let tmp = setup_fixtures();
        let store = ContentStore::load(tmp.path(), &PostsConfig::default());

        assert_eq!(store.filter_by_kind(ContentKind::Post).len(), 4);
        assert_eq!(store.filter_by_kind(ContentKind::Project).len(), 11);
        assert_eq!(store.filter_by_kind(ContentKind::Experiment).len(), 3);
        assert_eq!(store.knowledge().len(), 3);
        // The fixture tree contains one post without a title
        assert_eq!(store.warnings().len(), 1);
    }

    #[test]
    fn fixtures_featured_items_lead() {
        let tmp = setup_fixtures();
        let store = ContentStore::load(tmp.path(), &PostsConfig::default());
        let flags: Vec<bool> = store.list().iter().map(|i| i.featured).collect();
        let first_plain = flags.iter().position(|f| !f).unwrap();
        assert!(flags[first_plain..].iter().all(|f| !f));
    }

    #[test]
    fn fixture_post_lookup() {
        let tmp = setup_fixtures();
        let store = ContentStore::load(tmp.path(), &PostsConfig::default());
        let post = store
            .get_kind(ContentKind::Post, "2025-01-01-first-light")
            .unwrap();
        assert_eq!(post.title, "First Light");
        assert_eq!(post.tags, vec!["astronomy", "notes"]);

        let project = find_item(store.list(), "cosmic-ui");
        assert!(project.featured);
        assert_eq!(project.links.entries().len(), 2);
    }

    #[test]
    fn fixture_posts_from_subdirs_and_toml_front_matter() {
        let tmp = setup_fixtures();
        let store = ContentStore::load(tmp.path(), &PostsConfig::default());
        let nested = find_item(store.list(), "2024-11-02-orbits");
        assert_eq!(nested.tags, vec!["algorithms", "physics"]);
        let toml_post = find_item(store.list(), "2024-06-30-星际笔记");
        assert_eq!(toml_post.title, "星际笔记");
        assert!(store.warnings()[0].contains("title"));
    }
}
