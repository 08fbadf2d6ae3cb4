//! Content items shared by every section of the site.
//!
//! Posts, lab experiments and portfolio projects are all a [`ContentItem`]:
//! the store can sort, filter and look them up uniformly, and the renderer
//! can lay any of them out as a card. Fields that only make sense for one
//! kind (`difficulty` for experiments, `links` for projects) are optional.
//!
//! Items are immutable once loaded.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Which section of the site an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Post,
    Experiment,
    Project,
}

impl ContentKind {
    /// URL prefix of the section's detail pages.
    pub fn section(self) -> &'static str {
        match self {
            ContentKind::Post => "posts",
            ContentKind::Experiment => "lab",
            ContentKind::Project => "program",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Post => "Post",
            ContentKind::Experiment => "Experiment",
            ContentKind::Project => "Project",
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" | "posts" => Ok(ContentKind::Post),
            "experiment" | "experiments" | "lab" => Ok(ContentKind::Experiment),
            "project" | "projects" | "program" => Ok(ContentKind::Project),
            other => Err(format!(
                "unknown kind {other:?} (expected post, experiment or project)"
            )),
        }
    }
}

/// Category of an item. Posts are always `Article`; catalogs use the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Article,
    // Projects
    Web,
    Mobile,
    Desktop,
    Game,
    Library,
    Ai,
    // Experiments
    JsEffect,
    #[serde(rename = "3d")]
    ThreeD,
    WebFeature,
    Animation,
    Interaction,
    Other,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Article,
        Category::Web,
        Category::Mobile,
        Category::Desktop,
        Category::Game,
        Category::Library,
        Category::Ai,
        Category::JsEffect,
        Category::ThreeD,
        Category::WebFeature,
        Category::Animation,
        Category::Interaction,
        Category::Other,
    ];

    /// The kebab-case key used in catalogs and URLs.
    pub fn key(self) -> &'static str {
        match self {
            Category::Article => "article",
            Category::Web => "web",
            Category::Mobile => "mobile",
            Category::Desktop => "desktop",
            Category::Game => "game",
            Category::Library => "library",
            Category::Ai => "ai",
            Category::JsEffect => "js-effect",
            Category::ThreeD => "3d",
            Category::WebFeature => "web-feature",
            Category::Animation => "animation",
            Category::Interaction => "interaction",
            Category::Other => "other",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Article => "Article",
            Category::Web => "Web",
            Category::Mobile => "Mobile",
            Category::Desktop => "Desktop",
            Category::Game => "Game",
            Category::Library => "Library",
            Category::Ai => "AI",
            Category::JsEffect => "JS Effects",
            Category::ThreeD => "3D",
            Category::WebFeature => "Web Platform",
            Category::Animation => "Animation",
            Category::Interaction => "Interaction",
            Category::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("unknown category {s:?}"))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Lifecycle status of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Published,
    Completed,
    InProgress,
    Archived,
    Experimental,
}

impl Status {
    pub fn display_name(self) -> &'static str {
        match self {
            Status::Published => "Published",
            Status::Completed => "Completed",
            Status::InProgress => "In progress",
            Status::Archived => "Archived",
            Status::Experimental => "Experimental",
        }
    }

    /// CSS modifier class for the status badge.
    pub fn css_class(self) -> &'static str {
        match self {
            Status::Published | Status::Completed => "status-done",
            Status::InProgress => "status-active",
            Status::Archived => "status-archived",
            Status::Experimental => "status-experimental",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn display_name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

/// External links of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Links {
    pub demo: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub download: Option<String>,
}

impl Links {
    /// Present links as `(label, url)` in display order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Demo", &self.demo),
            ("GitHub", &self.github),
            ("Website", &self.website),
            ("Download", &self.download),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.as_deref().map(|u| (label, u)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// A post, experiment or project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    pub kind: ContentKind,
    /// Slug for posts, catalog id otherwise. Unique within a kind.
    pub id: String,
    pub title: String,
    /// Excerpt for posts, short description for catalog items.
    pub description: String,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub category: Category,
    pub status: Status,
    pub date: NaiveDate,
    pub featured: bool,
    pub author: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub icon: Option<String>,
    pub links: Links,
    /// Markdown body (posts) or long description (catalog items).
    pub body: Option<String>,
}

impl ContentItem {
    /// Site-relative URL of the item's detail page.
    pub fn url(&self) -> String {
        format!("/{}/{}/", self.kind.section(), self.id)
    }

    /// Whether `tag` matches one of the item's tags or technologies.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().chain(&self.technologies).any(|t| t == tag)
    }

    /// Estimated reading time in whole minutes, at least 1.
    ///
    /// Whitespace-separated words count once each; CJK ideographs have no
    /// separators, so every ideograph counts as a word.
    pub fn reading_minutes(&self, words_per_minute: u32) -> u32 {
        let body = self.body.as_deref().unwrap_or_default();
        let mut words = 0usize;
        for token in body.split_whitespace() {
            let ideographs = token.chars().filter(|c| is_wide(*c)).count();
            words += if ideographs > 0 { ideographs } else { 1 };
        }
        let wpm = words_per_minute.max(1) as usize;
        words.div_ceil(wpm).max(1) as u32
    }
}

/// Whether a glyph renders double width (CJK ideographs, kana, hangul,
/// full-width forms).
pub fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x2FFFD)
}

/// Listing order: featured first, then newest first.
///
/// Equal keys compare equal so a stable sort keeps load order.
pub fn listing_order(a: &ContentItem, b: &ContentItem) -> Ordering {
    b.featured
        .cmp(&a.featured)
        .then_with(|| b.date.cmp(&a.date))
}

/// A static knowledge-base category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    /// CSS color for the category's gradient accent.
    #[serde(default = "default_accent")]
    pub accent: String,
}

fn default_accent() -> String {
    "#7b2cbf".to_string()
}
