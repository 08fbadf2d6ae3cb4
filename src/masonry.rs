//! Masonry layout engine.
//!
//! Packs variable-height cards into a fixed number of columns by always
//! extending the currently shortest column. The engine is pure: positions are
//! a function of (heights, column count, gap, container width) and are
//! recomputed wholesale on every pass.
//!
//! ```text
//! columns = 3, gap = g
//!
//! ┌──0──┐ g ┌──1──┐ g ┌──2──┐      item 3 goes under the shortest
//! │     │   │     │   └─────┘      column (2), item 4 under the
//! │     │   └─────┘   ┌──3──┐      next shortest (1), ...
//! └─────┘   ┌──4──┐   └─────┘
//! ```
//!
//! The static generator has no DOM to measure, so card heights come from
//! [`estimate_card_height`] and cards are rendered at exactly that height.
//! [`MasonryView`] is the per-view context that decides *when* to relayout:
//! on item or filter changes immediately, on resize after a quiet period.

use crate::config::{Breakpoint, CardMetrics, LayoutConfig};
use crate::content::{ContentItem, is_wide};

/// Position of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    /// Index of the item in the laid-out sequence.
    pub index: usize,
    pub column: usize,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MasonryLayout {
    /// Same length and order as the input heights.
    pub boxes: Vec<LayoutBox>,
    pub columns: usize,
    pub column_width: f64,
    /// Tallest running column height. `None` when there is nothing to lay out.
    pub container_height: Option<f64>,
}

/// Width of one column. Never negative.
pub fn column_width(container_width: f64, columns: usize, gap: f64) -> f64 {
    let columns = columns.max(1);
    ((container_width - gap * (columns - 1) as f64) / columns as f64).max(0.0)
}

/// Lay out `heights` into `columns` columns.
///
/// A column count of zero is treated as one.
pub fn layout(heights: &[f64], columns: usize, gap: f64, container_width: f64) -> MasonryLayout {
    let columns = columns.max(1);
    let width = column_width(container_width, columns, gap);
    if heights.is_empty() {
        return MasonryLayout {
            boxes: Vec::new(),
            columns,
            column_width: width,
            container_height: None,
        };
    }

    let mut running = vec![0.0_f64; columns];
    let boxes = heights
        .iter()
        .enumerate()
        .map(|(index, &height)| {
            let column = shortest(&running);
            let top = running[column];
            running[column] += height + gap;
            LayoutBox {
                index,
                column,
                top,
                left: column as f64 * (width + gap),
                width,
                height,
            }
        })
        .collect();

    MasonryLayout {
        boxes,
        columns,
        column_width: width,
        container_height: Some(running.iter().copied().fold(0.0, f64::max)),
    }
}

/// First column with the smallest running height.
fn shortest(running: &[f64]) -> usize {
    let mut best = 0;
    for (i, &h) in running.iter().enumerate().skip(1) {
        if h < running[best] {
            best = i;
        }
    }
    best
}

/// Column count for a viewport width.
///
/// Uses the breakpoint with the largest `min_width` not exceeding the
/// viewport; narrower viewports get a single column. Breakpoint order does
/// not matter.
pub fn column_count(viewport_width: u32, breakpoints: &[Breakpoint]) -> usize {
    breakpoints
        .iter()
        .filter(|b| b.min_width <= viewport_width)
        .max_by_key(|b| b.min_width)
        .map(|b| b.columns.max(1))
        .unwrap_or(1)
}

// ============================================================================
// Height estimation
// ============================================================================

/// Titles are set larger than body text.
const TITLE_GLYPH_SCALE: f64 = 1.25;
/// Extra glyph cells a tag chip takes beyond its text (padding + gap).
const CHIP_EXTRA_CELLS: usize = 3;

/// Display cells of a string: wide glyphs count double.
fn cells(text: &str) -> usize {
    text.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

/// Lines needed to set `text` greedily at `per_line` cells per line.
///
/// Words break at whitespace; a word longer than a line spills over as many
/// lines as it needs. Wide glyphs may break anywhere.
fn wrapped_lines(text: &str, per_line: usize) -> usize {
    let per_line = per_line.max(1);
    let mut lines = 0;
    let mut used = 0;
    for word in text.split_whitespace() {
        let w = cells(word);
        if lines > 0 && used + 1 + w <= per_line {
            used += 1 + w;
            continue;
        }
        let mut rest = w;
        if lines > 0 && word.chars().any(is_wide) && used + 1 < per_line {
            // Ideographs fill the tail of the current line first
            rest -= (per_line - used - 1).min(rest);
        }
        let opened = rest.div_ceil(per_line);
        lines += opened;
        if opened > 0 {
            used = rest - (opened - 1) * per_line;
        }
    }
    lines
}

/// Rows of tag chips needed at `per_line` cells per row.
fn chip_rows(tags: &[&str], per_line: usize) -> usize {
    if tags.is_empty() {
        return 0;
    }
    let per_line = per_line.max(1);
    let mut rows = 1;
    let mut used = 0;
    for tag in tags {
        let w = (cells(tag) + CHIP_EXTRA_CELLS).min(per_line);
        if used + w > per_line {
            rows += 1;
            used = 0;
        }
        used += w;
    }
    rows
}

/// Deterministic card height for `item` in a column `column_width` px wide.
///
/// Sums padding, the meta row, wrapped title lines, the excerpt clamped to
/// `max_excerpt_lines` and the tag chip rows. Rounded up to a whole pixel.
pub fn estimate_card_height(item: &ContentItem, column_width: f64, metrics: &CardMetrics) -> f64 {
    let inner = (column_width - metrics.padding).max(metrics.char_width);
    let body_cells = (inner / metrics.char_width).floor().max(1.0) as usize;
    let title_cells = (inner / (metrics.char_width * TITLE_GLYPH_SCALE))
        .floor()
        .max(1.0) as usize;

    let title_lines = wrapped_lines(&item.title, title_cells).max(1);
    let excerpt_lines = wrapped_lines(&item.description, body_cells).min(metrics.max_excerpt_lines);
    let tags: Vec<&str> = item
        .tags
        .iter()
        .chain(&item.technologies)
        .map(String::as_str)
        .collect();
    let tag_rows = chip_rows(&tags, body_cells);

    let height = metrics.padding
        + metrics.meta_height
        + title_lines as f64 * metrics.title_line_height
        + excerpt_lines as f64 * metrics.body_line_height
        + tag_rows as f64 * metrics.tag_row_height;
    height.ceil()
}

// ============================================================================
// Per-view context
// ============================================================================

/// Layout state of one mounted grid.
///
/// Holds the item heights, the active filter and the viewport width, and
/// recomputes the layout wholesale when any of them changes. Resizes are
/// debounced: [`on_resize`](Self::on_resize) only arms a deadline and
/// [`poll`](Self::poll) applies the last width once the window has been
/// quiet for `debounce_ms`. Times are milliseconds on a monotonic clock.
#[derive(Debug, Clone)]
pub struct MasonryView {
    gap: f64,
    breakpoints: Vec<Breakpoint>,
    container_padding: f64,
    debounce_ms: f64,
    heights: Vec<f64>,
    /// Visible item indices, in order. `None` shows everything.
    filter: Option<Vec<usize>>,
    viewport_width: u32,
    pending: Option<PendingResize>,
    layout: MasonryLayout,
    passes: usize,
}

#[derive(Debug, Clone, Copy)]
struct PendingResize {
    width: u32,
    deadline: f64,
}

impl MasonryView {
    pub fn new(config: &LayoutConfig, viewport_width: u32) -> Self {
        let mut view = Self {
            gap: config.gap,
            breakpoints: config.breakpoints.clone(),
            container_padding: config.container_padding,
            debounce_ms: config.debounce_ms as f64,
            heights: Vec::new(),
            filter: None,
            viewport_width,
            pending: None,
            layout: MasonryLayout::default(),
            passes: 0,
        };
        view.relayout();
        view
    }

    /// Replace the item heights and relayout.
    pub fn set_items(&mut self, heights: Vec<f64>) {
        self.heights = heights;
        if let Some(filter) = &mut self.filter {
            let len = self.heights.len();
            filter.retain(|&i| i < len);
        }
        self.relayout();
    }

    /// Show only the given item indices (or everything) and relayout.
    ///
    /// Out-of-range indices are ignored.
    pub fn set_filter(&mut self, visible: Option<Vec<usize>>) {
        let len = self.heights.len();
        self.filter = visible.map(|mut v| {
            v.retain(|&i| i < len);
            v
        });
        self.relayout();
    }

    /// Record a viewport resize. Restarts the debounce window.
    pub fn on_resize(&mut self, now: f64, viewport_width: u32) {
        self.pending = Some(PendingResize {
            width: viewport_width,
            deadline: now + self.debounce_ms,
        });
    }

    /// Apply a settled resize. Returns whether a relayout happened.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                self.viewport_width = p.width;
                self.relayout();
                true
            }
            _ => false,
        }
    }

    pub fn has_pending_resize(&self) -> bool {
        self.pending.is_some()
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn container_width(&self) -> f64 {
        (self.viewport_width as f64 - 2.0 * self.container_padding).max(0.0)
    }

    /// Current layout. Box indices refer to positions in the full item list.
    pub fn layout(&self) -> &MasonryLayout {
        &self.layout
    }

    /// Number of layout passes run so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    fn relayout(&mut self) {
        let visible: Vec<usize> = match &self.filter {
            Some(v) => v.clone(),
            None => (0..self.heights.len()).collect(),
        };
        let heights: Vec<f64> = visible.iter().map(|&i| self.heights[i]).collect();
        let columns = column_count(self.viewport_width, &self.breakpoints);
        let mut next = layout(&heights, columns, self.gap, self.container_width());
        for b in &mut next.boxes {
            b.index = visible[b.index];
        }
        self.layout = next;
        self.passes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::item;
    use proptest::prelude::*;

    fn columns_of(l: &MasonryLayout) -> Vec<usize> {
        l.boxes.iter().map(|b| b.column).collect()
    }

    // =========================================================================
    // layout
    // =========================================================================

    #[test]
    fn seven_items_three_columns() {
        let heights = [100.0, 80.0, 120.0, 50.0, 60.0, 70.0, 40.0];
        let l = layout(&heights, 3, 10.0, 320.0);

        // First three seed the columns in order
        assert_eq!(&columns_of(&l)[..3], &[0, 1, 2]);
        // Running heights are now 110, 90, 130: item 3 goes to column 1
        assert_eq!(l.boxes[3].column, 1);
        assert_eq!(l.boxes[3].top, 90.0);
        // 110, 150, 130 -> column 0
        assert_eq!(l.boxes[4].column, 0);
        // 180, 150, 130 -> column 2
        assert_eq!(l.boxes[5].column, 2);
        // 180, 150, 210 -> column 1
        assert_eq!(l.boxes[6].column, 1);
        assert_eq!(l.container_height, Some(210.0));
    }

    #[test]
    fn left_and_width_follow_column_width() {
        let l = layout(&[10.0, 10.0, 10.0], 3, 20.0, 340.0);
        assert_eq!(l.column_width, 100.0);
        let lefts: Vec<f64> = l.boxes.iter().map(|b| b.left).collect();
        assert_eq!(lefts, vec![0.0, 120.0, 240.0]);
        assert!(l.boxes.iter().all(|b| b.width == 100.0));
    }

    #[test]
    fn ties_go_to_lowest_column() {
        let l = layout(&[50.0, 50.0, 50.0], 2, 0.0, 200.0);
        assert_eq!(columns_of(&l), vec![0, 1, 0]);
    }

    #[test]
    fn zero_items_is_empty_layout() {
        let l = layout(&[], 3, 24.0, 900.0);
        assert!(l.boxes.is_empty());
        assert_eq!(l.container_height, None);
    }

    #[test]
    fn zero_columns_clamped_to_one() {
        let l = layout(&[10.0, 20.0], 0, 5.0, 100.0);
        assert_eq!(l.columns, 1);
        assert_eq!(columns_of(&l), vec![0, 0]);
        assert_eq!(l.boxes[1].top, 15.0);
        assert_eq!(l.column_width, 100.0);
    }

    #[test]
    fn narrow_container_never_negative_width() {
        let l = layout(&[10.0], 4, 24.0, 10.0);
        assert_eq!(l.column_width, 0.0);
    }

    #[test]
    fn relayout_is_idempotent() {
        let heights = [30.0, 70.0, 10.0, 90.0, 20.0];
        assert_eq!(layout(&heights, 2, 8.0, 500.0), layout(&heights, 2, 8.0, 500.0));
    }

    proptest! {
        #[test]
        fn prop_each_item_goes_to_shortest_column(
            heights in prop::collection::vec(0.0f64..500.0, 0..40),
            columns in 1usize..6,
            gap in 0.0f64..40.0,
        ) {
            let l = layout(&heights, columns, gap, 1200.0);
            prop_assert_eq!(l.boxes.len(), heights.len());

            let mut running = vec![0.0f64; columns];
            for (b, &h) in l.boxes.iter().zip(&heights) {
                let min = running.iter().copied().fold(f64::INFINITY, f64::min);
                let argmin = running.iter().position(|&r| r == min).unwrap();
                prop_assert_eq!(b.column, argmin);
                prop_assert_eq!(b.top, running[argmin]);
                running[argmin] += h + gap;
            }

            let max = running.iter().copied().fold(0.0f64, f64::max);
            if heights.is_empty() {
                prop_assert_eq!(l.container_height, None);
            } else {
                prop_assert_eq!(l.container_height, Some(max));
            }
        }
    }

    // =========================================================================
    // column_count
    // =========================================================================

    #[test]
    fn default_breakpoints() {
        let bps = LayoutConfig::default().breakpoints;
        assert_eq!(column_count(1440, &bps), 4);
        assert_eq!(column_count(1280, &bps), 4);
        assert_eq!(column_count(1279, &bps), 3);
        assert_eq!(column_count(1024, &bps), 3);
        assert_eq!(column_count(800, &bps), 2);
        assert_eq!(column_count(640, &bps), 2);
        assert_eq!(column_count(639, &bps), 1);
        assert_eq!(column_count(0, &bps), 1);
    }

    #[test]
    fn unordered_breakpoints() {
        let bps = vec![
            Breakpoint {
                min_width: 500,
                columns: 2,
            },
            Breakpoint {
                min_width: 900,
                columns: 5,
            },
        ];
        assert_eq!(column_count(1000, &bps), 5);
        assert_eq!(column_count(600, &bps), 2);
        assert_eq!(column_count(0, &[]), 1);
    }

    // =========================================================================
    // Height estimation
    // =========================================================================

    #[test]
    fn wrapped_lines_greedy() {
        assert_eq!(wrapped_lines("", 10), 0);
        assert_eq!(wrapped_lines("aaa bbb", 10), 1);
        assert_eq!(wrapped_lines("aaa bbb ccc", 10), 2);
        // A word longer than a line spills over
        assert_eq!(wrapped_lines("abcdefghijklmnopqrstuvwxy", 10), 3);
    }

    #[test]
    fn wide_glyphs_take_two_cells() {
        assert_eq!(cells("ab"), 2);
        assert_eq!(cells("宇宙"), 4);
        // 10 ideographs = 20 cells = 2 lines of 10
        assert_eq!(wrapped_lines(&"宇".repeat(10), 10), 2);
    }

    #[test]
    fn estimate_grows_with_excerpt_until_clamped() {
        let metrics = CardMetrics::default();
        let mut short = item("a", "2024-01-01", false);
        short.description = "One line.".into();
        let mut long = short.clone();
        long.description = "word ".repeat(200);

        let h_short = estimate_card_height(&short, 300.0, &metrics);
        let h_long = estimate_card_height(&long, 300.0, &metrics);
        assert!(h_long > h_short);
        let max_excerpt = metrics.max_excerpt_lines as f64 * metrics.body_line_height;
        assert!(h_long - h_short <= max_excerpt);
    }

    #[test]
    fn estimate_is_whole_pixels_and_deterministic() {
        let metrics = CardMetrics::default();
        let mut it = item("a", "2024-01-01", false);
        it.tags = vec!["rust".into(), "layout".into()];
        let h = estimate_card_height(&it, 287.5, &metrics);
        assert_eq!(h, h.ceil());
        assert_eq!(h, estimate_card_height(&it, 287.5, &metrics));
    }

    #[test]
    fn narrower_columns_are_never_shorter() {
        let metrics = CardMetrics::default();
        let mut it = item("a", "2024-01-01", false);
        it.title = "A fairly long title about orbital mechanics".into();
        it.description = "Some words that will wrap differently at each width.".into();
        it.tags = vec!["orbits".into(), "physics".into(), "css".into()];
        let wide = estimate_card_height(&it, 600.0, &metrics);
        let narrow = estimate_card_height(&it, 200.0, &metrics);
        assert!(narrow >= wide);
    }

    // =========================================================================
    // MasonryView
    // =========================================================================

    fn view(width: u32) -> MasonryView {
        MasonryView::new(&LayoutConfig::default(), width)
    }

    #[test]
    fn view_lays_out_on_item_change() {
        let mut v = view(1100);
        assert_eq!(v.layout().container_height, None);
        v.set_items(vec![100.0, 100.0, 100.0, 50.0]);
        assert_eq!(v.layout().columns, 3);
        assert_eq!(v.layout().boxes.len(), 4);
    }

    #[test]
    fn view_filter_maps_back_to_item_indices() {
        let mut v = view(700);
        v.set_items(vec![10.0, 20.0, 30.0, 40.0]);
        v.set_filter(Some(vec![1, 3, 99]));
        let indices: Vec<usize> = v.layout().boxes.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(columns_of(v.layout()), vec![0, 1]);

        v.set_filter(None);
        assert_eq!(v.layout().boxes.len(), 4);
    }

    #[test]
    fn shrinking_items_trims_filter() {
        let mut v = view(700);
        v.set_items(vec![10.0, 20.0, 30.0]);
        v.set_filter(Some(vec![0, 2]));
        v.set_items(vec![10.0]);
        let indices: Vec<usize> = v.layout().boxes.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![0]);
    }

    #[test]
    fn resize_waits_for_quiet_period() {
        let mut v = view(1400);
        v.set_items(vec![10.0; 8]);
        let passes = v.passes();

        v.on_resize(0.0, 700);
        assert!(!v.poll(100.0));
        assert_eq!(v.layout().columns, 4);

        // Another resize inside the window restarts it
        v.on_resize(120.0, 500);
        assert!(!v.poll(200.0));
        assert!(!v.poll(269.0));
        assert!(v.poll(270.0));
        assert_eq!(v.viewport_width(), 500);
        assert_eq!(v.layout().columns, 1);
        assert_eq!(v.passes(), passes + 1);

        // Nothing pending afterwards
        assert!(!v.has_pending_resize());
        assert!(!v.poll(1000.0));
    }

    #[test]
    fn container_width_subtracts_padding() {
        let v = view(1000);
        assert_eq!(v.container_width(), 968.0);
        assert_eq!(view(10).container_width(), 0.0);
    }

    #[test]
    fn repeated_relayout_same_result() {
        let mut v = view(1300);
        v.set_items(vec![40.0, 10.0, 70.0, 30.0, 90.0]);
        let first = v.layout().clone();
        v.set_filter(None);
        assert_eq!(v.layout(), &first);
    }
}
