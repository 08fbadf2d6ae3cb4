//! # Nebula Lucent
//!
//! A static site generator for a cosmic-themed personal site: a blog, a lab
//! of experiments, an orbital "galaxy" portfolio and a knowledge index, all
//! laid out as masonry card grids over an animated star field.
//!
//! # Architecture: Load, Lay Out, Render
//!
//! ```text
//! 1. Load     content/  →  ContentStore      (posts, catalogs, knowledge index)
//! 2. Lay out  items     →  positions, frames (masonry tiers, orbital keyframes)
//! 3. Render   store     →  dist/             (HTML pages + fingerprinted CSS)
//! ```
//!
//! The layout engines are plain state machines with no I/O: [`masonry`]
//! places cards for a container width, [`orbit`] and [`animation`] advance
//! the galaxy frame by frame. The generator runs them ahead of time and bakes
//! the results into CSS, so the output site needs no JavaScript.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | `ContentItem` and its enums, shared by every section |
//! | [`frontmatter`] | `---`/`+++` front-matter blocks in post files |
//! | [`naming`] | `YYYY-MM-DD-slug` file names, slugs, URL-safe ids |
//! | [`store`] | Loads posts and catalogs into a queryable, fail-soft store |
//! | [`masonry`] | Column-based card placement, filtering and resize debouncing |
//! | [`orbit`] | Galaxy geometry: orbit assignment and planet positions |
//! | [`animation`] | Galaxy clock: rotation, expansion easing, hover pause |
//! | [`keyframes`] | Samples the galaxy clock into CSS `@keyframes` |
//! | [`starfield`] | Deterministic background star placement |
//! | [`generate`] | Renders the HTML site with Maud |
//! | [`scaffold`] | `new-post`: writes a front-matter template for a new post |
//! | [`config`] | `config.toml` loading, validation, merging and CSS generation |
//! | [`types`] | Navigation and build report types |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fail Soft, Always Build
//!
//! A malformed post or catalog is skipped with a warning rather than failing
//! the build. `check` surfaces the warnings and exits non-zero so CI can
//! still gate on a clean content tree.
//!
//! ## Baked Layout
//!
//! Card heights are estimated from text metrics in [`config::CardMetrics`],
//! positions are computed once per breakpoint tier and written as CSS custom
//! properties. The orbital animation is sampled into keyframes. Visitors with
//! `prefers-reduced-motion` get a still galaxy.

pub mod animation;
pub mod config;
pub mod content;
pub mod frontmatter;
pub mod generate;
pub mod keyframes;
pub mod masonry;
pub mod naming;
pub mod orbit;
pub mod output;
pub mod scaffold;
pub mod starfield;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
