//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity (post,
//! experiment, project, knowledge category) is shown by its semantic
//! identity first (positional index and title) with ids, dates and paths as
//! indented context lines. The inventory reads like a table of contents of
//! the site while still letting users trace an entry back to its source.
//!
//! # Entity Display Contract
//!
//! 1. **Header line**: positional index + title (+ optional detail)
//! 2. **Context lines**: indented `Id:`, `Date:`, `Tags:`, ...
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Posts (4)
//! 001 First Light
//!     Id: 2025-01-01-first-light
//!     Date: 2025-01-01
//!     Tags: astronomy, notes
//!
//! Projects (11)
//! 001 Cosmic UI (featured)
//!     Id: cosmic-ui
//!     Library · Completed
//!
//! Galaxy
//!     Orbit 1: 3 projects at 160px
//!
//! Config
//!     config.toml
//!     assets/
//!
//! Warnings
//!     posts/untitled.md: missing required front-matter key `title`
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Posts → posts/index.html
//!     Tagged “astronomy” → posts/tag/astronomy/index.html
//!     001 First Light → posts/2025-01-01-first-light/index.html
//! Not found → 404.html
//! Stylesheet → style.3f9a1c0b2e.css
//!
//! Generated 32 pages (21 detail, 6 filter), copied 1 asset
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::SiteConfig;
use crate::content::{ContentItem, ContentKind};
use crate::orbit;
use crate::store::ContentStore;
use crate::types::{BuildReport, PageKind};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 Cosmic UI (featured)
/// 002 First Light
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// `1 page`, `2 pages`.
fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn section_title(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Post => "Posts",
        ContentKind::Experiment => "Experiments",
        ContentKind::Project => "Projects",
    }
}

/// Context lines shared by the inventory and `list`.
fn item_context(item: &ContentItem, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    let mut lines = vec![
        format!("{pad}Id: {}", item.id),
        format!("{pad}Date: {}", item.date),
    ];
    if item.kind != ContentKind::Post {
        lines.push(format!(
            "{pad}{} · {}",
            item.category.display_name(),
            item.status.display_name()
        ));
    }
    if !item.tags.is_empty() {
        lines.push(format!("{pad}Tags: {}", item.tags.join(", ")));
    }
    if !item.technologies.is_empty() {
        lines.push(format!("{pad}Technologies: {}", item.technologies.join(", ")));
    }
    lines
}

// ============================================================================
// Check output
// ============================================================================

/// Format the content inventory printed by `check`.
pub fn format_load_output(
    store: &ContentStore,
    config: &SiteConfig,
    source_root: &Path,
) -> Vec<String> {
    let mut lines = Vec::new();

    for kind in [ContentKind::Post, ContentKind::Experiment, ContentKind::Project] {
        let items = store.filter_by_kind(kind);
        lines.push(format!("{} ({})", section_title(kind), items.len()));
        if items.is_empty() {
            lines.push(format!("{}(none)", indent(1)));
        }
        for (i, item) in items.iter().enumerate() {
            let detail = item.featured.then_some("featured");
            lines.push(entity_header(i + 1, &item.title, detail));
            lines.extend(item_context(item, 1));
        }
        lines.push(String::new());
    }

    let projects = store.filter_by_kind(ContentKind::Project).len();
    let orbits = orbit::partition(projects, &config.galaxy.orbits);
    lines.push("Galaxy".to_string());
    if orbits.is_empty() {
        lines.push(format!("{}(no projects)", indent(1)));
    }
    for o in &orbits {
        lines.push(format!(
            "{}Orbit {}: {} at {}px",
            indent(1),
            o.index + 1,
            plural(o.len(), "project"),
            o.radius
        ));
    }
    lines.push(String::new());

    let knowledge = store.knowledge();
    lines.push(format!("Knowledge ({})", knowledge.len()));
    for (i, category) in knowledge.iter().enumerate() {
        let notes = store
            .filter_by_kind(ContentKind::Post)
            .iter()
            .filter(|p| p.has_tag(&category.id) || p.has_tag(&category.title))
            .count();
        lines.push(entity_header(i + 1, &category.title, None));
        lines.push(format!("{}Id: {}", indent(1), category.id));
        lines.push(format!("{}Posts: {}", indent(1), notes));
    }
    lines.push(String::new());

    let config_files: Vec<&str> = ["config.toml", "assets"]
        .into_iter()
        .filter(|name| source_root.join(name).exists())
        .collect();
    if !config_files.is_empty() {
        lines.push("Config".to_string());
        for name in config_files {
            let suffix = if source_root.join(name).is_dir() { "/" } else { "" };
            lines.push(format!("{}{name}{suffix}", indent(1)));
        }
        lines.push(String::new());
    }

    if !store.warnings().is_empty() {
        lines.push(format!("Warnings ({})", store.warnings().len()));
        for w in store.warnings() {
            lines.push(format!("{}{w}", indent(1)));
        }
        lines.push(String::new());
    }

    // Drop the trailing blank separator
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

pub fn print_load_output(store: &ContentStore, config: &SiteConfig, source_root: &Path) {
    for line in format_load_output(store, config, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// List / show output
// ============================================================================

/// Format the `list` command's output: one entry per item, listing order.
pub fn format_list_output(items: &[&ContentItem]) -> Vec<String> {
    if items.is_empty() {
        return vec!["No matching content.".to_string()];
    }
    let mut lines = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let detail = if item.featured {
            format!("{}, featured", item.kind.label())
        } else {
            item.kind.label().to_string()
        };
        lines.push(entity_header(i + 1, &item.title, Some(&detail)));
        lines.push(format!("{}{} · {}", indent(1), item.date, item.url()));
    }
    lines
}

pub fn print_list_output(items: &[&ContentItem]) {
    for line in format_list_output(items) {
        println!("{}", line);
    }
}

/// Format every field of one item for `show`.
pub fn format_item_detail(item: &ContentItem, words_per_minute: u32) -> Vec<String> {
    let mut lines = vec![
        item.title.clone(),
        format!("{}Kind: {}", indent(1), item.kind.label()),
        format!("{}URL: {}", indent(1), item.url()),
    ];
    lines.extend(item_context(item, 1));
    if let Some(author) = item.author.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("{}Author: {author}", indent(1)));
    }
    if let Some(difficulty) = item.difficulty {
        lines.push(format!("{}Difficulty: {}", indent(1), difficulty.display_name()));
    }
    if item.featured {
        lines.push(format!("{}Featured", indent(1)));
    }
    for (label, url) in item.links.entries() {
        lines.push(format!("{}{label}: {url}", indent(1)));
    }
    if !item.description.is_empty() {
        lines.push(format!(
            "{}Description: {}",
            indent(1),
            truncate_desc(&item.description, 80)
        ));
    }
    if item.kind == ContentKind::Post {
        lines.push(format!(
            "{}Reading time: {} min",
            indent(1),
            item.reading_minutes(words_per_minute)
        ));
    }
    lines
}

pub fn print_item_detail(item: &ContentItem, words_per_minute: u32) {
    for line in format_item_detail(item, words_per_minute) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the pages written by `build`, grouped under their section index.
pub fn format_generate_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut detail = 0;
    for page in &report.pages {
        match page.kind {
            PageKind::Home => lines.push(format!("Home \u{2192} {}", page.path)),
            PageKind::NotFound => lines.push(format!("Not found \u{2192} {}", page.path)),
            PageKind::Listing => {
                detail = 0;
                lines.push(format!("{} \u{2192} {}", page.title, page.path));
            }
            PageKind::Filter => {
                lines.push(format!("{}{} \u{2192} {}", indent(1), page.title, page.path));
            }
            PageKind::Detail => {
                detail += 1;
                lines.push(format!(
                    "{}{} {} \u{2192} {}",
                    indent(1),
                    format_index(detail),
                    page.title,
                    page.path
                ));
            }
        }
    }
    lines.push(format!("Stylesheet \u{2192} {}", report.stylesheet));
    lines.push(String::new());

    let mut summary = format!(
        "Generated {} ({} detail, {} filter)",
        plural(report.pages.len(), "page"),
        report.count(PageKind::Detail),
        report.count(PageKind::Filter)
    );
    if report.assets_copied > 0 {
        summary.push_str(&format!(", copied {}", plural(report.assets_copied, "asset")));
    }
    if report.warnings > 0 {
        summary.push_str(&format!(
            "; {} skipped (run `check`)",
            plural(report.warnings, "source")
        ));
    }
    lines.push(summary);
    lines
}

pub fn print_generate_output(report: &BuildReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
