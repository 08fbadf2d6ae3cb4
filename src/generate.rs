//! HTML site generation.
//!
//! Renders the loaded [`ContentStore`] into a static site. The output has no
//! script: masonry positions and the galaxy animation are computed here and
//! baked into CSS.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): hero with a denser star field, section links
//!   and a masonry grid of featured items
//! - **Posts** (`/posts/index.html`): every post, with tag filter chips
//! - **Tag pages** (`/posts/tag/{tag}/index.html`): posts carrying one tag
//! - **Lab** (`/lab/index.html`) and **category pages**
//!   (`/lab/category/{category}/index.html`)
//! - **Program** (`/program/index.html`): the orbital galaxy of projects
//!   above a project grid
//! - **Knowledge** (`/knowledge/index.html`) and one page per category
//!   listing the posts tagged with its id or title
//! - **Detail pages** (`/{section}/{id}/index.html`) for every item
//! - **Not found** (`/404.html`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── style.3f9a1c0b2e.css       # Fingerprinted stylesheet
//! ├── assets/                    # Copied from content/assets/
//! ├── posts/
//! │   ├── index.html
//! │   ├── tag/astronomy/index.html
//! │   └── 2025-01-01-first-light/index.html
//! ├── lab/
//! ├── program/
//! └── knowledge/
//! ```
//!
//! ## Baked Masonry
//!
//! Card heights are estimated per breakpoint tier and laid out with a
//! [`MasonryView`]. Each card carries its column, top and height for every
//! tier as custom properties (`--c0 --t0 --h0`, `--c1 ...`), and the
//! stylesheet selects the tier with one media query per breakpoint:
//!
//! ```text
//! tier 0   (base)              viewport = layout.mobile_width
//! tier k   @media (min-width)  viewport = breakpoint.min_width
//! ```
//!
//! Heights are estimated at the narrowest width a tier applies to, so text
//! only gets more room as the window grows.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::{self, LayoutConfig, SiteConfig};
use crate::content::{Category, ContentItem, ContentKind, KnowledgeCategory};
use crate::keyframes::{self, css_number};
use crate::masonry::{self, MasonryView};
use crate::naming::slugify;
use crate::starfield::{self, ORBS};
use crate::store::ContentStore;
use crate::types::{BuildReport, GeneratedPage, NavItem, PageKind, site_nav};
use chrono::NaiveDate;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to walk assets: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Planet fills, cycled by item index.
const PLANET_GRADIENTS: [(&str, &str); 8] = [
    ("#8b5cf6", "#9333ea"),
    ("#22d3ee", "#3b82f6"),
    ("#fb7185", "#ec4899"),
    ("#fbbf24", "#f97316"),
    ("#34d399", "#14b8a6"),
    ("#818cf8", "#3b82f6"),
    ("#e879f9", "#a855f7"),
    ("#38bdf8", "#06b6d4"),
];

/// Largest planet diameter in px; each orbit further out is 8px smaller.
const PLANET_SIZE: f64 = 80.0;
const MIN_PLANET_SIZE: f64 = 32.0;
/// Technologies listed on a planet's hover card.
const PREVIEW_TECHNOLOGIES: usize = 4;

/// Render the whole site into `output_dir`.
///
/// `source_root` is only read for `assets/`. Existing files in the output
/// directory are overwritten; stale ones are left alone.
pub fn generate(
    store: &ContentStore,
    config: &SiteConfig,
    source_root: &Path,
    output_dir: &Path,
) -> Result<BuildReport, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let css = build_stylesheet(config);
    let stylesheet = stylesheet_name(&css);
    fs::write(output_dir.join(&stylesheet), &css)?;
    tracing::debug!(file = %stylesheet, bytes = css.len(), "wrote stylesheet");

    let site = Site::new(config, store, &stylesheet);
    let mut report = BuildReport {
        stylesheet: stylesheet.clone(),
        warnings: store.warnings().len(),
        ..BuildReport::default()
    };

    for page in site.pages() {
        let path = output_dir.join(&page.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, page.markup.into_string())?;
        tracing::debug!(path = %page.path, "wrote page");
        report.pages.push(GeneratedPage {
            path: page.path,
            title: page.title,
            kind: page.kind,
        });
    }

    report.assets_copied = copy_assets(&source_root.join("assets"), &output_dir.join("assets"))?;
    tracing::info!(
        pages = report.pages.len(),
        assets = report.assets_copied,
        output = %output_dir.display(),
        "site generated"
    );
    Ok(report)
}

/// Copy `src` into `dst` recursively. A missing `src` copies nothing.
///
/// Returns the number of files copied. Dotfiles are skipped.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    let walker = WalkDir::new(src)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Stylesheet
// ============================================================================

/// The full stylesheet: config-driven custom properties, the static styles
/// and the masonry tier rules.
pub fn build_stylesheet(config: &SiteConfig) -> String {
    [
        config::generate_color_css(&config.colors),
        config::generate_layout_css(&config.layout),
        CSS_STATIC.to_string(),
        masonry_css(&config.layout),
    ]
    .join("\n\n")
}

/// `style.{first 10 hex digits of sha256}.css`.
pub fn stylesheet_name(css: &str) -> String {
    let hash = format!("{:x}", Sha256::digest(css.as_bytes()));
    format!("style.{}.css", &hash[..10])
}

/// One breakpoint tier of the baked masonry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    /// Media query threshold; `None` for the base tier.
    pub min_width: Option<u32>,
    /// Viewport width the tier is laid out at.
    pub viewport: u32,
    pub columns: usize,
}

/// Base tier plus one tier per distinct breakpoint wider than the mobile
/// reference, narrowest first. Breakpoints at or below the mobile width
/// only affect the base tier's column count.
pub fn tiers(layout: &LayoutConfig) -> Vec<Tier> {
    let mut widths: Vec<u32> = layout
        .breakpoints
        .iter()
        .map(|b| b.min_width)
        .filter(|&w| w > layout.mobile_width)
        .collect();
    widths.sort_unstable();
    widths.dedup();

    let base = Tier {
        min_width: None,
        viewport: layout.mobile_width,
        columns: masonry::column_count(layout.mobile_width, &layout.breakpoints),
    };
    std::iter::once(base)
        .chain(widths.into_iter().map(|w| Tier {
            min_width: Some(w),
            viewport: w,
            columns: masonry::column_count(w, &layout.breakpoints),
        }))
        .collect()
}

/// Masonry rules: each tier reads its own set of per-card properties.
pub fn masonry_css(layout: &LayoutConfig) -> String {
    let mut css = String::new();
    for (k, tier) in tiers(layout).iter().enumerate() {
        let c = tier.columns;
        let width = format!("((100% - {} * var(--grid-gap)) / {c})", c - 1);
        let rules = format!(
            ".masonry {{ height: var(--mh{k}); }}\n\
             .masonry > .card {{ width: calc{width}; \
             left: calc(var(--c{k}) * ({width} + var(--grid-gap))); \
             top: var(--t{k}); height: var(--h{k}); }}\n"
        );
        match tier.min_width {
            None => css.push_str(&rules),
            Some(w) => {
                let _ = write!(css, "@media (min-width: {w}px) {{\n{rules}}}\n");
            }
        }
    }
    css
}

/// Cards of one grid with their per-tier positions.
#[derive(Debug, Clone, PartialEq)]
pub struct BakedGrid {
    /// `(item index, inline style)` in placement order.
    pub cards: Vec<(usize, String)>,
    /// Inline style of the grid container.
    pub style: String,
}

/// Lay out `items` (or the `visible` subset) at every tier.
pub fn bake_grid(
    items: &[&ContentItem],
    visible: Option<Vec<usize>>,
    layout: &LayoutConfig,
) -> BakedGrid {
    let mut styles: BTreeMap<usize, String> = BTreeMap::new();
    let mut order = Vec::new();
    let mut style = String::new();

    for (k, tier) in tiers(layout).iter().enumerate() {
        let mut view = MasonryView::new(layout, tier.viewport);
        let column_width = view.layout().column_width;
        view.set_items(
            items
                .iter()
                .map(|item| masonry::estimate_card_height(item, column_width, &layout.card))
                .collect(),
        );
        view.set_filter(visible.clone());

        let grid = view.layout();
        if k == 0 {
            order = grid.boxes.iter().map(|b| b.index).collect();
        }
        for b in &grid.boxes {
            let s = styles.entry(b.index).or_default();
            let _ = write!(
                s,
                "--c{k}:{};--t{k}:{}px;--h{k}:{}px;",
                b.column,
                css_number(b.top),
                css_number(b.height)
            );
        }
        let _ = write!(
            style,
            "--mh{k}:{}px;",
            css_number(grid.container_height.unwrap_or(0.0))
        );
    }

    BakedGrid {
        cards: order
            .into_iter()
            .map(|i| (i, styles.remove(&i).unwrap_or_default()))
            .collect(),
        style,
    }
}

// ============================================================================
// Text helpers
// ============================================================================

/// `January 1, 2025`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Drop a leading `# {title}` heading so detail pages don't repeat it.
fn strip_title_heading<'a>(body: &'a str, title: &str) -> &'a str {
    let trimmed = body.trim_start();
    let (first, rest) = trimmed.split_once('\n').unwrap_or((trimmed, ""));
    match first.trim_end().strip_prefix("# ") {
        Some(heading) if heading.trim() == title.trim() => rest,
        _ => body,
    }
}

/// Render markdown with tables, footnotes, strikethrough and task lists.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

/// Tags of a section grouped by slug, first spelling wins the label.
///
/// Tags whose slug is empty (pure punctuation) get no page.
pub fn tag_groups(items: &[&ContentItem]) -> BTreeMap<String, (String, Vec<usize>)> {
    let mut groups: BTreeMap<String, (String, Vec<usize>)> = BTreeMap::new();
    for (index, item) in items.iter().enumerate() {
        for tag in item.tags.iter().chain(&item.technologies) {
            let slug = slugify(tag);
            if slug.is_empty() {
                continue;
            }
            let entry = groups
                .entry(slug)
                .or_insert_with(|| (tag.clone(), Vec::new()));
            if entry.1.last() != Some(&index) {
                entry.1.push(index);
            }
        }
    }
    groups
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    stylesheet: &str,
    body_class: Option<&str>,
    page_css: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href={ "/" (stylesheet) };
                @if let Some(css) = page_css {
                    style { (PreEscaped(css)) }
                }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Renders the site header with breadcrumb and navigation
fn site_header(breadcrumb: Markup, nav: Markup) -> Markup {
    html! {
        header.site-header {
            nav.breadcrumb {
                (breadcrumb)
            }
            nav.site-nav {
                (nav)
            }
        }
    }
}

/// Renders the navigation menu (hamburger style, slides from right)
pub fn render_nav(items: &[NavItem], current_path: &str) -> Markup {
    html! {
        input.nav-toggle type="checkbox" id="nav-toggle";
        label.nav-hamburger for="nav-toggle" {
            span.hamburger-line {}
            span.hamburger-line {}
            span.hamburger-line {}
        }
        div.nav-panel {
            label.nav-close for="nav-toggle" { "×" }
            ul {
                @for item in items {
                    li class=[item.is_current(current_path).then_some("current")] {
                        a href=(item.href()) { (item.title) }
                    }
                }
            }
        }
    }
}

/// Twinkling stars and drifting glows behind every page.
fn render_starfield(count: usize) -> Markup {
    html! {
        div.cosmic-bg aria-hidden="true" {
            @for orb in &ORBS {
                div.orb style=(format!(
                    "left:{}%;top:{}%;width:{}px;height:{}px;background:{};filter:blur({}px);\
                     animation-duration:{}s;animation-delay:{}s",
                    css_number(orb.x), css_number(orb.y), orb.size, orb.size,
                    orb.color, orb.blur, orb.duration, orb.delay
                )) {}
            }
            @for star in starfield::stars(count) {
                span class={ "star " (star.size.css_class()) } style=(format!(
                    "left:{}%;top:{}%;animation-delay:{}s;animation-duration:{}s",
                    css_number(star.x), css_number(star.y),
                    css_number(star.delay), css_number(star.duration)
                )) {}
            }
        }
    }
}

/// One masonry card. Chips are plain text: the whole card is a link.
fn render_card(item: &ContentItem, style: &str) -> Markup {
    let chips: Vec<&String> = item.tags.iter().chain(&item.technologies).collect();
    html! {
        article class={ "card card-" (item.kind.section()) } style=(style) {
            a.card-link href=(item.url()) {
                div.card-meta {
                    @if let Some(icon) = &item.icon {
                        span.card-icon { (icon) }
                    }
                    time datetime=(item.date.to_string()) { (format_date(item.date)) }
                    @if item.kind != ContentKind::Post {
                        span class={ "status " (item.status.css_class()) } {
                            (item.status.display_name())
                        }
                    }
                    @if item.featured {
                        span.featured title="Featured" { "★" }
                    }
                }
                h3.card-title { (item.title) }
                @if !item.description.is_empty() {
                    p.card-excerpt { (item.description) }
                }
                @if !chips.is_empty() {
                    ul.chips {
                        @for chip in chips {
                            li.chip { (chip) }
                        }
                    }
                }
            }
        }
    }
}

/// A masonry grid, or the empty-state message when there is nothing to show.
fn render_grid(
    items: &[&ContentItem],
    visible: Option<Vec<usize>>,
    layout: &LayoutConfig,
    empty: &str,
) -> Markup {
    let grid = bake_grid(items, visible, layout);
    html! {
        @if grid.cards.is_empty() {
            p.empty-state { (empty) }
        } @else {
            div.masonry style=(grid.style) {
                @for (index, style) in &grid.cards {
                    (render_card(items[*index], style))
                }
            }
        }
    }
}

/// Filter chips above a listing. `current` is the active chip's href.
fn render_filters(all_href: &str, chips: &[(String, String)], current: &str) -> Markup {
    html! {
        @if !chips.is_empty() {
            nav.filters {
                a.filter-chip.active[current == all_href] href=(all_href) { "All" }
                @for (label, href) in chips {
                    a.filter-chip.active[current == href] href=(href) { (label) }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// A rendered page waiting to be written.
struct RenderedPage {
    path: String,
    title: String,
    kind: PageKind,
    markup: Markup,
}

/// Shared render context of one build.
struct Site<'a> {
    config: &'a SiteConfig,
    store: &'a ContentStore,
    stylesheet: &'a str,
    nav: Vec<NavItem>,
}

impl<'a> Site<'a> {
    fn new(config: &'a SiteConfig, store: &'a ContentStore, stylesheet: &'a str) -> Self {
        Self {
            config,
            store,
            stylesheet,
            nav: site_nav(),
        }
    }

    fn pages(&self) -> Vec<RenderedPage> {
        let mut pages = vec![self.home()];
        pages.extend(self.posts_pages());
        pages.extend(self.lab_pages());
        pages.extend(self.program_pages());
        pages.extend(self.knowledge_pages());
        pages.push(self.not_found());
        pages
    }

    /// Title for `<title>`: `"{page} · {site}"`, or the site title alone.
    fn title(&self, page: &str) -> String {
        if page.is_empty() {
            self.config.site.title.clone()
        } else {
            format!("{page} · {}", self.config.site.title)
        }
    }

    /// Wrap page content in the shared chrome: star field, header, footer.
    #[allow(clippy::too_many_arguments)]
    fn page(
        &self,
        path: String,
        kind: PageKind,
        title: &str,
        current: &str,
        crumbs: &[(&str, String)],
        stars: usize,
        page_css: Option<&str>,
        main: Markup,
    ) -> RenderedPage {
        let breadcrumb = html! {
            a.brand href="/" { (self.config.site.title) }
            @for (label, href) in crumbs {
                " › "
                @if href.is_empty() {
                    span { (label) }
                } @else {
                    a href=(href) { (label) }
                }
            }
        };
        let content = html! {
            (render_starfield(stars))
            (site_header(breadcrumb, render_nav(&self.nav, current)))
            main { (main) }
            footer.site-footer {
                p {
                    (self.config.site.title)
                    @if !self.config.site.author.is_empty() {
                        " · " (self.config.site.author)
                    }
                }
            }
        };
        let body_class = match current.split('/').next() {
            Some(section) if !section.is_empty() => section.to_string(),
            _ => "home".to_string(),
        };
        let full_title = self.title(title);
        RenderedPage {
            path,
            title: title.to_string(),
            kind,
            markup: base_document(
                &full_title,
                self.stylesheet,
                Some(body_class.as_str()),
                page_css,
                content,
            ),
        }
    }

    fn stars(&self) -> usize {
        self.config.starfield.count
    }

    // ------------------------------------------------------------------ home

    fn home(&self) -> RenderedPage {
        let featured: Vec<&ContentItem> = self.store.list().iter().filter(|i| i.featured).collect();
        let sections = [
            (ContentKind::Post, "Posts", "Notes and essays"),
            (ContentKind::Experiment, "Lab", "Small experiments"),
            (ContentKind::Project, "Program", "Projects in orbit"),
        ];
        let main = html! {
            section.hero {
                h1.hero-title { (self.config.site.title) }
                @if !self.config.site.tagline.is_empty() {
                    p.hero-tagline { (self.config.site.tagline) }
                }
                ul.section-links {
                    @for (kind, label, blurb) in sections {
                        li {
                            a href={ "/" (kind.section()) "/" } {
                                span.section-name { (label) }
                                span.section-blurb { (blurb) }
                                span.section-count { (self.store.filter_by_kind(kind).len()) }
                            }
                        }
                    }
                    li {
                        a href="/knowledge/" {
                            span.section-name { "Knowledge" }
                            span.section-blurb { "Study notes by topic" }
                            span.section-count { (self.store.knowledge().len()) }
                        }
                    }
                }
            }
            section.featured {
                h2 { "Featured" }
                (render_grid(&featured, None, &self.config.layout, "Nothing featured yet."))
            }
        };
        self.page(
            "index.html".into(),
            PageKind::Home,
            "",
            "",
            &[],
            self.config.starfield.hero_count,
            None,
            main,
        )
    }

    // ----------------------------------------------------------------- posts

    fn posts_pages(&self) -> Vec<RenderedPage> {
        let posts = self.store.filter_by_kind(ContentKind::Post);
        let groups = tag_groups(&posts);
        let chips: Vec<(String, String)> = groups
            .iter()
            .map(|(slug, (label, _))| (label.clone(), format!("/posts/tag/{slug}/")))
            .collect();

        let listing = |visible: Option<Vec<usize>>, heading: &str, current: &str| {
            html! {
                section.listing {
                    h1 { (heading) }
                    (render_filters("/posts/", &chips, current))
                    (render_grid(&posts, visible, &self.config.layout, "No posts yet."))
                }
            }
        };

        let mut pages = vec![self.page(
            "posts/index.html".into(),
            PageKind::Listing,
            "Posts",
            "posts",
            &[("Posts", String::new())],
            self.config.starfield.hero_count,
            None,
            listing(None, "Posts", "/posts/"),
        )];

        for (slug, (label, indices)) in &groups {
            let href = format!("/posts/tag/{slug}/");
            let heading = format!("Tagged “{label}”");
            pages.push(self.page(
                format!("posts/tag/{slug}/index.html"),
                PageKind::Filter,
                &heading,
                &format!("posts/tag/{slug}"),
                &[("Posts", "/posts/".into()), (label.as_str(), String::new())],
                self.stars(),
                None,
                listing(Some(indices.clone()), &heading, &href),
            ));
        }

        for post in &posts {
            pages.push(self.post_page(post));
        }
        pages
    }

    fn post_page(&self, post: &ContentItem) -> RenderedPage {
        let body = post.body.as_deref().unwrap_or_default();
        let body_html = render_markdown(strip_title_heading(body, &post.title));
        let minutes = post.reading_minutes(self.config.posts.words_per_minute);
        let main = html! {
            article.post {
                header.post-header {
                    h1 { (post.title) }
                    div.post-meta {
                        time datetime=(post.date.to_string()) { (format_date(post.date)) }
                        @if let Some(author) = post.author.as_deref().filter(|a| !a.is_empty()) {
                            span.author { (author) }
                        }
                        span.reading-time { (minutes) " min read" }
                    }
                    @if !post.tags.is_empty() {
                        ul.chips {
                            @for tag in &post.tags {
                                @let slug = slugify(tag);
                                li {
                                    @if slug.is_empty() {
                                        span.chip { (tag) }
                                    } @else {
                                        a.chip href={ "/posts/tag/" (slug) "/" } { (tag) }
                                    }
                                }
                            }
                        }
                    }
                }
                div.post-body { (PreEscaped(body_html)) }
                footer.post-footer {
                    a href="/posts/" { "← All posts" }
                }
            }
        };
        self.page(
            format!("posts/{}/index.html", post.id),
            PageKind::Detail,
            &post.title,
            &format!("posts/{}", post.id),
            &[("Posts", "/posts/".into()), (post.title.as_str(), String::new())],
            self.stars(),
            None,
            main,
        )
    }

    // ------------------------------------------------------------------- lab

    fn lab_pages(&self) -> Vec<RenderedPage> {
        let experiments = self.store.filter_by_kind(ContentKind::Experiment);
        let categories = self.store.categories(ContentKind::Experiment);
        let chips: Vec<(String, String)> = categories
            .iter()
            .map(|c| (c.display_name().to_string(), category_href(*c)))
            .collect();

        let listing = |visible: Option<Vec<usize>>, heading: &str, current: &str| {
            html! {
                section.listing {
                    h1 { (heading) }
                    p.section-intro { "Small experiments with the web platform." }
                    (render_filters("/lab/", &chips, current))
                    (render_grid(&experiments, visible, &self.config.layout, "No experiments yet."))
                }
            }
        };

        let mut pages = vec![self.page(
            "lab/index.html".into(),
            PageKind::Listing,
            "Lab",
            "lab",
            &[("Lab", String::new())],
            self.stars(),
            None,
            listing(None, "Lab", "/lab/"),
        )];

        for category in categories {
            let visible: Vec<usize> = experiments
                .iter()
                .enumerate()
                .filter(|(_, e)| e.category == category)
                .map(|(i, _)| i)
                .collect();
            let name = category.display_name();
            pages.push(self.page(
                format!("lab/category/{}/index.html", category.key()),
                PageKind::Filter,
                name,
                &format!("lab/category/{}", category.key()),
                &[("Lab", "/lab/".into()), (name, String::new())],
                self.stars(),
                None,
                listing(Some(visible), name, &category_href(category)),
            ));
        }

        for experiment in &experiments {
            pages.push(self.catalog_page(experiment, "Lab"));
        }
        pages
    }

    /// Detail page of an experiment or project.
    fn catalog_page(&self, item: &ContentItem, section_label: &str) -> RenderedPage {
        let section = item.kind.section();
        let long = item.body.as_deref().map(render_markdown);
        let links = item.links.entries();
        let main = html! {
            article.entry {
                header.entry-header {
                    @if let Some(icon) = &item.icon {
                        span.entry-icon { (icon) }
                    }
                    h1 { (item.title) }
                    div.entry-meta {
                        span class={ "status " (item.status.css_class()) } {
                            (item.status.display_name())
                        }
                        @if item.kind == ContentKind::Experiment {
                            a.category href=(category_href(item.category)) {
                                (item.category.display_name())
                            }
                        } @else {
                            span.category { (item.category.display_name()) }
                        }
                        @if let Some(difficulty) = item.difficulty {
                            span.difficulty { (difficulty.display_name()) }
                        }
                        time datetime=(item.date.to_string()) { (format_date(item.date)) }
                    }
                    p.entry-description { (item.description) }
                }
                @if let Some(long) = long {
                    div.entry-body { (PreEscaped(long)) }
                }
                @if !item.technologies.is_empty() {
                    section.technologies {
                        h2 { "Built with" }
                        ul.chips {
                            @for tech in &item.technologies {
                                li.chip { (tech) }
                            }
                        }
                    }
                }
                @if !item.tags.is_empty() {
                    ul.chips.tags {
                        @for tag in &item.tags {
                            li.chip { (tag) }
                        }
                    }
                }
                @if !links.is_empty() {
                    ul.entry-links {
                        @for (label, url) in links {
                            li {
                                a href=(url) target="_blank" rel="noopener" { (label) }
                            }
                        }
                    }
                }
                footer.entry-footer {
                    a href={ "/" (section) "/" } { "← " (section_label) }
                }
            }
        };
        self.page(
            format!("{section}/{}/index.html", item.id),
            PageKind::Detail,
            &item.title,
            &format!("{section}/{}", item.id),
            &[
                (section_label, format!("/{section}/")),
                (item.title.as_str(), String::new()),
            ],
            self.stars(),
            None,
            main,
        )
    }

    // --------------------------------------------------------------- program

    fn program_pages(&self) -> Vec<RenderedPage> {
        let projects = self.store.filter_by_kind(ContentKind::Project);
        let (galaxy, galaxy_css) = if projects.is_empty() {
            (html! {}, None)
        } else {
            let (markup, css) = render_galaxy(&projects, &self.config.galaxy);
            (markup, Some(css))
        };

        let main = html! {
            section.listing {
                h1 { "Program" }
                p.section-intro { "Projects in orbit. Hover a planet to stop the sky." }
                @if projects.is_empty() {
                    p.empty-state { "No projects in orbit yet." }
                } @else {
                    (galaxy)
                    h2 { "All projects" }
                    (render_grid(&projects, None, &self.config.layout, "No projects yet."))
                }
            }
        };

        let mut pages = vec![self.page(
            "program/index.html".into(),
            PageKind::Listing,
            "Program",
            "program",
            &[("Program", String::new())],
            self.stars(),
            galaxy_css.as_deref(),
            main,
        )];
        for project in &projects {
            pages.push(self.catalog_page(project, "Program"));
        }
        pages
    }

    // ------------------------------------------------------------- knowledge

    fn knowledge_pages(&self) -> Vec<RenderedPage> {
        let posts = self.store.filter_by_kind(ContentKind::Post);
        let categories = self.store.knowledge();
        let counts: Vec<usize> = categories
            .iter()
            .map(|c| knowledge_posts(&posts, c).len())
            .collect();

        let main = html! {
            section.listing {
                h1 { "Knowledge" }
                p.section-intro { "Study notes, grouped by topic." }
                @if categories.is_empty() {
                    p.empty-state { "No knowledge categories yet." }
                } @else {
                    ul.knowledge-grid {
                        @for (category, count) in categories.iter().zip(&counts) {
                            li.knowledge-card style={ "--accent:" (category.accent) } {
                                a href={ "/knowledge/" (category.id) "/" } {
                                    h2 { (category.title) }
                                    p { (category.description) }
                                    span.count { (count) " notes" }
                                }
                            }
                        }
                    }
                }
            }
        };

        let mut pages = vec![self.page(
            "knowledge/index.html".into(),
            PageKind::Listing,
            "Knowledge",
            "knowledge",
            &[("Knowledge", String::new())],
            self.stars(),
            None,
            main,
        )];

        for category in categories {
            let visible = knowledge_posts(&posts, category);
            let main = html! {
                section.listing style={ "--accent:" (category.accent) } {
                    h1 { (category.title) }
                    p.section-intro { (category.description) }
                    (render_grid(&posts, Some(visible), &self.config.layout, "No notes in this category yet."))
                }
            };
            pages.push(self.page(
                format!("knowledge/{}/index.html", category.id),
                PageKind::Detail,
                &category.title,
                &format!("knowledge/{}", category.id),
                &[
                    ("Knowledge", "/knowledge/".into()),
                    (category.title.as_str(), String::new()),
                ],
                self.stars(),
                None,
                main,
            ));
        }
        pages
    }

    // ------------------------------------------------------------- not found

    fn not_found(&self) -> RenderedPage {
        let main = html! {
            section.not-found {
                h1 { "404" }
                p { "This page drifted out of orbit." }
                a href="/" { "Back to home" }
            }
        };
        self.page(
            "404.html".into(),
            PageKind::NotFound,
            "Not found",
            "404",
            &[],
            self.stars(),
            None,
            main,
        )
    }
}

fn category_href(category: Category) -> String {
    format!("/lab/category/{}/", category.key())
}

/// Indices of the posts tagged with the category id or title.
fn knowledge_posts(posts: &[&ContentItem], category: &KnowledgeCategory) -> Vec<usize> {
    posts
        .iter()
        .enumerate()
        .filter(|(_, p)| p.has_tag(&category.id) || p.has_tag(&category.title))
        .map(|(i, _)| i)
        .collect()
}

/// The orbital galaxy and its per-page animation stylesheet.
fn render_galaxy(projects: &[&ContentItem], galaxy: &config::GalaxyConfig) -> (Markup, String) {
    let frames = keyframes::sample(projects.len(), galaxy);
    let outer = frames.rings.iter().map(|r| r.radius).fold(0.0, f64::max);
    let size = 2.0 * outer + PLANET_SIZE;

    let markup = html! {
        div.galaxy-wrap style={ "--galaxy-size:" (css_number(size)) "px" } {
            div.galaxy {
                div.galaxy-core {}
                @for ring in &frames.rings {
                    div.ring id={ "ring-" (ring.orbit) } style=(format!(
                        "--radius:{}px;--ring-color:{}", css_number(ring.radius), ring.color
                    )) {
                        @for angle in &ring.particle_angles {
                            span.ring-particle style=(format!(
                                "transform:{}", keyframes::polar_transform(*angle, ring.radius)
                            )) {}
                        }
                    }
                }
                @for planet in &frames.planets {
                    @let project = projects[planet.item];
                    @let gradient = PLANET_GRADIENTS[planet.item % PLANET_GRADIENTS.len()];
                    @let diameter = (PLANET_SIZE - planet.orbit as f64 * 8.0).max(MIN_PLANET_SIZE);
                    a.planet id={ "planet-" (planet.item) } href=(project.url())
                        style={ "--size:" (css_number(diameter)) "px" } {
                        span.planet-body style=(format!(
                            "background:linear-gradient(135deg, {}, {})", gradient.0, gradient.1
                        )) {
                            @if let Some(icon) = &project.icon {
                                (icon)
                            }
                        }
                        span.planet-label { (project.title) }
                        (render_planet_preview(project))
                    }
                }
            }
            p.galaxy-status {
                span.galaxy-rotating { "Orbits rotating" }
                span.galaxy-paused { "Paused" }
            }
        }
    };
    (markup, frames.to_css())
}

/// Detail card revealed while a planet is hovered.
fn render_planet_preview(project: &ContentItem) -> Markup {
    html! {
        span.planet-preview {
            span.preview-title { (project.title) }
            span.preview-meta {
                span class={ "status " (project.status.css_class()) } {
                    (project.status.display_name())
                }
                @if project.featured {
                    span.preview-featured { "★ Featured" }
                }
            }
            @if !project.description.is_empty() {
                span.preview-description { (project.description) }
            }
            @if !project.technologies.is_empty() {
                span.chips {
                    @for tech in project.technologies.iter().take(PREVIEW_TECHNOLOGIES) {
                        span.chip { (tech) }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
