//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` in the content root overrides any subset of
//! them.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml          # Site config (optional)
//! ├── posts/
//! ├── projects.toml
//! ├── experiments.toml
//! └── knowledge.toml
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_root = "content"
//!
//! [site]
//! title = "Nebula Lucent"
//! tagline = "Notes, experiments and projects drifting through space"
//! author = ""
//!
//! [posts]
//! dir = "posts"              # Relative to the content root
//! words_per_minute = 300     # Reading time estimate
//!
//! [layout]
//! gap = 24.0                 # Masonry gap in px
//! debounce_ms = 150          # Resize settle time before relayout
//! mobile_width = 375         # Reference width for the single-column layout
//! container_padding = 16.0   # Horizontal padding of the page container
//!
//! [[layout.breakpoints]]
//! min_width = 1280
//! columns = 4
//!
//! [galaxy]
//! base_speed = 0.08          # Degrees per reference frame
//! frame_interval_ms = 16.67  # Reference frame duration
//! expand_duration_ms = 600.0 # Bloom-from-center entrance
//! hover_scale = 1.3
//!
//! [[galaxy.orbits]]
//! size = 3                   # Omit on the last orbit to take the remainder
//! radius = 160.0
//! speed = 1.5
//! color = "rgba(139, 92, 246, 0.4)"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Path to the content root directory.
    #[serde(default = "default_content_root")]
    pub content_root: String,
    /// Site identity shown in the header, footer and `<title>`.
    pub site: SiteInfo,
    /// Blog post loading settings.
    pub posts: PostsConfig,
    /// Masonry layout settings for card grids.
    pub layout: LayoutConfig,
    /// Orbital "galaxy" portfolio settings.
    pub galaxy: GalaxyConfig,
    /// Background star field settings.
    pub starfield: StarfieldConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

fn default_content_root() -> String {
    "content".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            site: SiteInfo::default(),
            posts: PostsConfig::default(),
            layout: LayoutConfig::default(),
            galaxy: GalaxyConfig::default(),
            starfield: StarfieldConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.posts.dir.trim().is_empty() {
            return Err(ConfigError::Validation("posts.dir must not be empty".into()));
        }
        if self.posts.words_per_minute == 0 {
            return Err(ConfigError::Validation(
                "posts.words_per_minute must be non-zero".into(),
            ));
        }
        if !(self.layout.gap >= 0.0) {
            return Err(ConfigError::Validation(
                "layout.gap must be zero or positive".into(),
            ));
        }
        if self.layout.breakpoints.iter().any(|b| b.columns == 0) {
            return Err(ConfigError::Validation(
                "layout.breakpoints columns must be non-zero".into(),
            ));
        }
        if self.layout.mobile_width == 0 {
            return Err(ConfigError::Validation(
                "layout.mobile_width must be non-zero".into(),
            ));
        }
        self.galaxy.validate()
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    pub tagline: String,
    pub author: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Nebula Lucent".to_string(),
            tagline: "Notes, experiments and projects drifting through space".to_string(),
            author: String::new(),
        }
    }
}

/// Blog post loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostsConfig {
    /// Directory holding `.md`/`.mdx` posts, relative to the content root.
    pub dir: String,
    /// Reading speed used for the "N min read" estimate.
    pub words_per_minute: u32,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            dir: "posts".to_string(),
            words_per_minute: 300,
        }
    }
}

/// A viewport width threshold and the column count used at or above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Breakpoint {
    pub min_width: u32,
    pub columns: usize,
}

/// Text metrics used to estimate card heights without a DOM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardMetrics {
    /// Vertical padding inside a card (top + bottom).
    pub padding: f64,
    /// Average advance of a narrow glyph in px. Wide (CJK) glyphs count double.
    pub char_width: f64,
    pub title_line_height: f64,
    pub body_line_height: f64,
    /// Height of the date/author row.
    pub meta_height: f64,
    /// Height of one row of tag chips.
    pub tag_row_height: f64,
    /// Excerpts are clamped to this many lines.
    pub max_excerpt_lines: usize,
}

impl Default for CardMetrics {
    fn default() -> Self {
        Self {
            padding: 48.0,
            char_width: 8.5,
            title_line_height: 30.0,
            body_line_height: 24.0,
            meta_height: 28.0,
            tag_row_height: 32.0,
            max_excerpt_lines: 4,
        }
    }
}

/// Masonry grid settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Gap between cards, both horizontal and vertical, in px.
    pub gap: f64,
    /// Column breakpoints. Widths below every breakpoint get one column.
    pub breakpoints: Vec<Breakpoint>,
    /// Quiet period after the last resize before relayout.
    pub debounce_ms: u64,
    /// Reference viewport width for the single-column layout.
    pub mobile_width: u32,
    /// Horizontal padding on each side of the page container.
    pub container_padding: f64,
    pub card: CardMetrics,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: 24.0,
            breakpoints: vec![
                Breakpoint {
                    min_width: 1280,
                    columns: 4,
                },
                Breakpoint {
                    min_width: 1024,
                    columns: 3,
                },
                Breakpoint {
                    min_width: 640,
                    columns: 2,
                },
            ],
            debounce_ms: 150,
            mobile_width: 375,
            container_padding: 16.0,
            card: CardMetrics::default(),
        }
    }
}

/// One orbit bucket of the galaxy view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrbitSpec {
    /// Number of items on this orbit. `None` takes every remaining item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    pub radius: f64,
    /// Multiplier applied to the shared rotation.
    pub speed: f64,
    pub color: String,
}

/// Galaxy (orbital portfolio) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalaxyConfig {
    pub orbits: Vec<OrbitSpec>,
    /// Rotation in degrees added per reference frame.
    pub base_speed: f64,
    /// Duration of the reference frame the speed is expressed in.
    pub frame_interval_ms: f64,
    pub expand_duration_ms: f64,
    pub hover_scale: f64,
    /// Decorative particles riding each orbit ring.
    pub ring_particles: usize,
    /// Keyframe stops sampled per revolution in the generated CSS.
    pub keyframe_samples: usize,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        let orbit = |size, radius, speed, color: &str| OrbitSpec {
            size,
            radius,
            speed,
            color: color.to_string(),
        };
        Self {
            orbits: vec![
                orbit(Some(3), 160.0, 1.5, "rgba(139, 92, 246, 0.4)"),
                orbit(Some(3), 260.0, 0.9, "rgba(6, 182, 212, 0.35)"),
                orbit(Some(3), 360.0, 0.5, "rgba(236, 72, 153, 0.3)"),
                orbit(None, 460.0, 0.25, "rgba(245, 158, 11, 0.25)"),
            ],
            base_speed: 0.08,
            frame_interval_ms: 16.67,
            expand_duration_ms: 600.0,
            hover_scale: 1.3,
            ring_particles: 20,
            keyframe_samples: 72,
        }
    }
}

/// Upper bounds that keep the sampled galaxy CSS small.
const MAX_KEYFRAME_SAMPLES: usize = 720;
const MAX_RING_PARTICLES: usize = 360;
const MAX_EXPAND_FRAMES: f64 = 2000.0;

impl GalaxyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.orbits.is_empty() {
            return Err(ConfigError::Validation(
                "galaxy.orbits must not be empty".into(),
            ));
        }
        let last = self.orbits.len() - 1;
        if self.orbits[..last].iter().any(|o| o.size.is_none()) {
            return Err(ConfigError::Validation(
                "galaxy.orbits: only the last orbit may omit size".into(),
            ));
        }
        if self.orbits.iter().any(|o| !(o.radius > 0.0)) {
            return Err(ConfigError::Validation(
                "galaxy.orbits radius must be positive".into(),
            ));
        }
        if !(self.frame_interval_ms > 0.0) {
            return Err(ConfigError::Validation(
                "galaxy.frame_interval_ms must be positive".into(),
            ));
        }
        if !(self.base_speed > 0.0) {
            return Err(ConfigError::Validation(
                "galaxy.base_speed must be positive".into(),
            ));
        }
        if !(self.expand_duration_ms >= 0.0) {
            return Err(ConfigError::Validation(
                "galaxy.expand_duration_ms must not be negative".into(),
            ));
        }
        if !(self.hover_scale > 0.0) {
            return Err(ConfigError::Validation(
                "galaxy.hover_scale must be positive".into(),
            ));
        }
        if self.keyframe_samples < 2 || self.keyframe_samples > MAX_KEYFRAME_SAMPLES {
            return Err(ConfigError::Validation(format!(
                "galaxy.keyframe_samples must be between 2 and {MAX_KEYFRAME_SAMPLES}"
            )));
        }
        if self.ring_particles > MAX_RING_PARTICLES {
            return Err(ConfigError::Validation(format!(
                "galaxy.ring_particles must be at most {MAX_RING_PARTICLES}"
            )));
        }
        // The entrance is sampled once per frame into the generated CSS
        if self.expand_duration_ms / self.frame_interval_ms > MAX_EXPAND_FRAMES {
            return Err(ConfigError::Validation(format!(
                "galaxy.expand_duration_ms spans more than {MAX_EXPAND_FRAMES} frames of \
                 galaxy.frame_interval_ms"
            )));
        }
        Ok(())
    }
}

/// Background star field settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StarfieldConfig {
    /// Stars on regular pages.
    pub count: usize,
    /// Stars on hero pages (home, blog index).
    pub hero_count: usize,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 50,
            hero_count: 60,
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    /// Card and panel fill.
    pub surface: String,
    pub text: String,
    /// Dates, captions, breadcrumbs.
    pub text_muted: String,
    pub border: String,
    /// Primary accent (links, active filters).
    pub accent: String,
    /// Secondary accent (hover glow, gradients).
    pub accent_alt: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f7f5ff".to_string(),
            surface: "rgba(255, 255, 255, 0.75)".to_string(),
            text: "#1a1433".to_string(),
            text_muted: "#5c5678".to_string(),
            border: "rgba(123, 44, 191, 0.2)".to_string(),
            accent: "#7b2cbf".to_string(),
            accent_alt: "#e94560".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a1a".to_string(),
            surface: "rgba(255, 255, 255, 0.05)".to_string(),
            text: "#e8e6f5".to_string(),
            text_muted: "#9a96b8".to_string(),
            border: "rgba(255, 255, 255, 0.1)".to_string(),
            accent: "#00d9ff".to_string(),
            accent_alt: "#e94560".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so arrays such
///   as `layout.breakpoints` and `galaxy.orbits` are replaced, not appended.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Nebula Lucent Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Path to content directory
content_root = "content"

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
title = "Nebula Lucent"
tagline = "Notes, experiments and projects drifting through space"
author = ""

# ---------------------------------------------------------------------------
# Blog posts
# ---------------------------------------------------------------------------
[posts]
# Directory of .md/.mdx files with front-matter, relative to content_root.
dir = "posts"

# Reading speed for the "N min read" estimate.
words_per_minute = 300

# ---------------------------------------------------------------------------
# Masonry card grid
# ---------------------------------------------------------------------------
[layout]
# Gap between cards in px (horizontal and vertical).
gap = 24.0

# Quiet period after the last resize before the grid is laid out again.
debounce_ms = 150

# Reference viewport width used for the single-column layout.
mobile_width = 375

# Horizontal padding on each side of the page container, in px.
container_padding = 16.0

# Viewport widths at or above min_width use `columns` columns.
# Narrower viewports use a single column.
[[layout.breakpoints]]
min_width = 1280
columns = 4

[[layout.breakpoints]]
min_width = 1024
columns = 3

[[layout.breakpoints]]
min_width = 640
columns = 2

# Text metrics for estimating card heights (px).
[layout.card]
padding = 48.0
char_width = 8.5
title_line_height = 30.0
body_line_height = 24.0
meta_height = 28.0
tag_row_height = 32.0
max_excerpt_lines = 4

# ---------------------------------------------------------------------------
# Galaxy portfolio
# ---------------------------------------------------------------------------
[galaxy]
# Rotation in degrees per reference frame, and that frame's duration.
base_speed = 0.08
frame_interval_ms = 16.67

# Bloom-from-center entrance duration, at most 2000 reference frames.
expand_duration_ms = 600.0

# Scale of a hovered planet. Hovering pauses every orbit.
hover_scale = 1.3

# Decorative particles per orbit ring (at most 360).
ring_particles = 20

# Keyframe stops per revolution in the generated CSS (2 to 720).
keyframe_samples = 72

# Projects fill orbits in order. Omit `size` on the last orbit to take
# every remaining project. Empty orbits are not drawn.
[[galaxy.orbits]]
size = 3
radius = 160.0
speed = 1.5
color = "rgba(139, 92, 246, 0.4)"

[[galaxy.orbits]]
size = 3
radius = 260.0
speed = 0.9
color = "rgba(6, 182, 212, 0.35)"

[[galaxy.orbits]]
size = 3
radius = 360.0
speed = 0.5
color = "rgba(236, 72, 153, 0.3)"

[[galaxy.orbits]]
radius = 460.0
speed = 0.25
color = "rgba(245, 158, 11, 0.25)"

# ---------------------------------------------------------------------------
# Background star field
# ---------------------------------------------------------------------------
[starfield]
count = 50
hero_count = 60

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#f7f5ff"
surface = "rgba(255, 255, 255, 0.75)"
text = "#1a1433"
text_muted = "#5c5678"
border = "rgba(123, 44, 191, 0.2)"
accent = "#7b2cbf"
accent_alt = "#e94560"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a1a"
surface = "rgba(255, 255, 255, 0.05)"
text = "#e8e6f5"
text_muted = "#9a96b8"
border = "rgba(255, 255, 255, 0.1)"
accent = "#00d9ff"
accent_alt = "#e94560"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-surface: {light_surface};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-accent: {light_accent};
    --color-accent-alt: {light_accent_alt};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-surface: {dark_surface};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-accent: {dark_accent};
        --color-accent-alt: {dark_accent_alt};
    }}
}}"#,
        light_bg = colors.light.background,
        light_surface = colors.light.surface,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_accent = colors.light.accent,
        light_accent_alt = colors.light.accent_alt,
        dark_bg = colors.dark.background,
        dark_surface = colors.dark.surface,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_accent = colors.dark.accent,
        dark_accent_alt = colors.dark.accent_alt,
    )
}

/// Generate CSS custom properties from layout config.
pub fn generate_layout_css(layout: &LayoutConfig) -> String {
    format!(
        r#":root {{
    --grid-gap: {gap}px;
    --container-padding: {padding}px;
    --card-padding: {card_padding}px;
    --card-title-line: {title_line}px;
    --card-body-line: {body_line}px;
    --card-excerpt-lines: {excerpt_lines};
}}"#,
        gap = layout.gap,
        padding = layout.container_padding,
        card_padding = layout.card.padding / 2.0,
        title_line = layout.card.title_line_height,
        body_line = layout.card.body_line_height,
        excerpt_lines = layout.card.max_excerpt_lines,
    )
}
