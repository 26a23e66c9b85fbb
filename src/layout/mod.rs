//! # Two-Column Page Flow
//!
//! This is the heart of the engine: the block-placement algorithm that
//! decides where the next fixed-height block goes.
//!
//! The flow never lays content on an infinite canvas. Every placement is
//! made with the page boundary as a hard constraint:
//!
//! 1. Ask: does the block fit in the current column of the current row?
//! 2. If it fits, place it and advance the row state.
//! 3. If it doesn't, fall through to the other column, and from there to
//!    a fresh page.
//!
//! The flow is deliberately pure — it knows nothing about drawing. It
//! hands back [`Placement`] values and the renderers turn those into
//! surface calls. That keeps the overflow algorithm testable on its own.
//!
//! Row semantics: blocks alternate column 0 → column 1 at the same row
//! top. Completing a row (placing column 1) advances the row top past the
//! column-0 stack *and* the row's tallest block. A row left open with only
//! column 0 filled must be closed with [`PageFlow::finish_row`] before the
//! next section, otherwise the next block would overlap it.

use crate::model::PageLayoutConfig;
use serde::Serialize;

/// Where the flow currently is: page index, column, vertical offset, and
/// the top of the current row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    /// 1-based page index.
    pub page: usize,
    /// 0 or 1.
    pub column: u32,
    /// Bottom of the most recent placement in the current row.
    pub y: f64,
    /// Top of the current row. Blocks in the same row share this y.
    pub column_start_y: f64,
}

/// Where a reserved block landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// 1-based page index. The caller creates surface pages up to this.
    pub page: usize,
    pub column: u32,
    pub x: f64,
    pub y: f64,
    /// Usable width at this placement: one column, or the full content
    /// width for full-width blocks.
    pub width: f64,
}

/// Owns the cursor for the lifetime of one report and implements the
/// two-column flow with page-break fallback.
#[derive(Debug, Clone)]
pub struct PageFlow {
    config: PageLayoutConfig,
    cursor: Cursor,
    /// Tallest block of the currently open row (0 when no row is open).
    row_height: f64,
}

impl PageFlow {
    pub fn new(config: &PageLayoutConfig) -> Self {
        let margin = config.margin;
        Self {
            config: config.clone(),
            cursor: Cursor {
                page: 1,
                column: 0,
                y: margin,
                column_start_y: margin,
            },
            row_height: 0.0,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn config(&self) -> &PageLayoutConfig {
        &self.config
    }

    /// Reserve room for one column-width block of the given height.
    ///
    /// Column 0 first, then column 1 at the same row top; a block that
    /// fits in neither starts a fresh page in column 0. Never fails: a
    /// block taller than a whole page still gets a page to itself (and
    /// the surface clips it).
    pub fn reserve(&mut self, block_height: f64) -> Placement {
        let bottom = self.config.content_bottom();

        if self.cursor.column == 0 {
            if self.cursor.column_start_y + block_height > bottom {
                self.break_page();
            }
            let placement = self.placement_at(0, self.cursor.column_start_y);
            self.row_height = block_height;
            self.cursor.column = 1;
            self.cursor.y = (self.cursor.column_start_y + block_height).min(bottom);
            return placement;
        }

        // Column 1 of an open row.
        if self.cursor.column_start_y + block_height > bottom {
            // Doesn't fit beside its row sibling: restart on a new page.
            self.break_page();
            let placement = self.placement_at(0, self.cursor.column_start_y);
            self.row_height = block_height;
            self.cursor.column = 1;
            self.cursor.y = (self.cursor.column_start_y + block_height).min(bottom);
            return placement;
        }

        let placement = self.placement_at(1, self.cursor.column_start_y);
        // Row complete: the next row starts below the column-0 stack plus
        // the row's tallest block.
        let row_max = self.row_height.max(block_height);
        self.cursor.column_start_y = (self.cursor.y + row_max).min(bottom);
        self.cursor.y = self.cursor.column_start_y;
        self.cursor.column = 0;
        self.row_height = 0.0;
        placement
    }

    /// Reserve a full-content-width block (tables, section headers).
    ///
    /// Closes any open row first; the block always starts in column 0 of
    /// a fresh row and is page-broken as a whole — never split.
    pub fn reserve_full_width(&mut self, block_height: f64) -> Placement {
        self.finish_row();
        let bottom = self.config.content_bottom();
        if self.cursor.column_start_y + block_height > bottom {
            self.break_page();
        }
        let placement = Placement {
            page: self.cursor.page,
            column: 0,
            x: self.config.margin,
            y: self.cursor.column_start_y,
            width: self.config.content_width(),
        };
        self.cursor.column_start_y = (self.cursor.column_start_y + block_height).min(bottom);
        self.cursor.y = self.cursor.column_start_y;
        placement
    }

    /// Close a row that ended with only column 0 filled, advancing the
    /// row top by that block's height so the next section cannot overlap.
    pub fn finish_row(&mut self) {
        if self.cursor.column == 1 {
            let bottom = self.config.content_bottom();
            self.cursor.column_start_y = self.cursor.y.min(bottom);
            self.cursor.y = self.cursor.column_start_y;
            self.cursor.column = 0;
            self.row_height = 0.0;
        }
    }

    /// Extra vertical space before the next row. No-op when it would
    /// push past the bottom (the next reserve breaks the page anyway).
    pub fn advance(&mut self, height: f64) {
        debug_assert_eq!(self.cursor.column, 0, "advance inside an open row");
        let bottom = self.config.content_bottom();
        self.cursor.column_start_y = (self.cursor.column_start_y + height).min(bottom);
        self.cursor.y = self.cursor.column_start_y;
    }

    fn break_page(&mut self) {
        self.cursor.page += 1;
        self.cursor.column = 0;
        self.cursor.y = self.config.margin;
        self.cursor.column_start_y = self.config.margin;
        self.row_height = 0.0;
    }

    fn placement_at(&self, column: u32, y: f64) -> Placement {
        Placement {
            page: self.cursor.page,
            column,
            x: self.config.column_x(column),
            y,
            width: self.config.column_width(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Content height of exactly `h` between margin and footer reserve.
    fn config(content_height: f64) -> PageLayoutConfig {
        PageLayoutConfig {
            page_width: 400.0,
            page_height: content_height + 40.0 + 40.0 + 30.0,
            margin: 40.0,
            column_count: 2,
            column_gap: 10.0,
            footer_reserve: 30.0,
        }
    }

    #[test]
    fn five_blocks_of_75_on_220() {
        // The canonical sequence: one row per page because a completed
        // row advances by the column-0 stack plus the row max.
        let cfg = config(220.0);
        let mut flow = PageFlow::new(&cfg);
        let seq: Vec<(usize, u32)> = (0..5)
            .map(|_| {
                let p = flow.reserve(75.0);
                (p.page, p.column)
            })
            .collect();
        assert_eq!(seq, [(1, 0), (1, 1), (2, 0), (2, 1), (3, 0)]);
    }

    #[test]
    fn blocks_alternate_columns_within_a_row() {
        let cfg = config(500.0);
        let mut flow = PageFlow::new(&cfg);
        let a = flow.reserve(60.0);
        let b = flow.reserve(60.0);
        assert_eq!((a.column, b.column), (0, 1));
        assert_eq!(a.y, b.y, "row siblings share the row top");
        assert!(b.x > a.x + cfg.column_width() - 1e-9);
        let c = flow.reserve(60.0);
        assert_eq!(c.column, 0);
        assert!(c.y > a.y);
    }

    #[test]
    fn no_placement_ever_overflows_the_content_bottom() {
        let cfg = config(300.0);
        let bottom = cfg.content_bottom();
        let mut flow = PageFlow::new(&cfg);
        let heights = [80.0, 80.0, 120.0, 40.0, 40.0, 95.0, 95.0, 60.0, 130.0, 20.0];
        for &h in &heights {
            let p = flow.reserve(h);
            assert!(p.y + h <= bottom + 1e-9, "block of {h} placed at {}", p.y);
            let c = flow.cursor();
            assert!(c.y <= bottom + 1e-9 && c.y >= cfg.margin);
        }
    }

    #[test]
    fn page_count_lower_bound() {
        let cfg = config(220.0);
        let mut flow = PageFlow::new(&cfg);
        let blocks = 9;
        let mut last_page = 1;
        for _ in 0..blocks {
            last_page = flow.reserve(75.0).page;
        }
        assert!(last_page >= (blocks + 1) / 2);
    }

    #[test]
    fn full_width_block_closes_open_row() {
        let cfg = config(500.0);
        let mut flow = PageFlow::new(&cfg);
        let a = flow.reserve(50.0);
        // Row open (column 0 only); the table must start below it.
        let t = flow.reserve_full_width(90.0);
        assert_eq!(t.column, 0);
        assert_eq!(t.x, cfg.margin);
        assert_eq!(t.width, cfg.content_width());
        assert!(t.y >= a.y + 50.0 - 1e-9);
    }

    #[test]
    fn full_width_block_breaks_page_on_its_own_height() {
        let cfg = config(200.0);
        let mut flow = PageFlow::new(&cfg);
        flow.reserve_full_width(150.0);
        let second = flow.reserve_full_width(150.0);
        assert_eq!(second.page, 2);
        assert_eq!(second.y, cfg.margin);
    }

    #[test]
    fn finish_row_advances_by_the_block_height() {
        let cfg = config(500.0);
        let mut flow = PageFlow::new(&cfg);
        let a = flow.reserve(70.0);
        flow.finish_row();
        let c = flow.cursor();
        assert_eq!(c.column, 0);
        assert!((c.column_start_y - (a.y + 70.0)).abs() < 1e-9);
        // Closing an already-closed row changes nothing.
        flow.finish_row();
        assert_eq!(flow.cursor(), c);
    }

    #[test]
    fn column_one_overflow_restarts_the_row_on_a_new_page() {
        let cfg = config(220.0);
        let mut flow = PageFlow::new(&cfg);
        flow.reserve_full_width(100.0);
        let a = flow.reserve(100.0); // fits: 100 + 100 <= 220
        assert_eq!((a.page, a.column), (1, 0));
        let b = flow.reserve(130.0); // too tall beside it
        assert_eq!((b.page, b.column), (2, 0));
        assert_eq!(b.y, cfg.margin);
    }

    #[test]
    fn oversized_block_still_gets_a_page() {
        let cfg = config(100.0);
        let mut flow = PageFlow::new(&cfg);
        flow.reserve(40.0);
        let huge = flow.reserve(400.0);
        assert_eq!((huge.page, huge.column), (2, 0));
        // Its row sibling still alternates to column 1 at the same top.
        let sibling = flow.reserve(40.0);
        assert_eq!((sibling.page, sibling.column), (2, 1));
        // The completed row clamps at the bottom, so the next row breaks.
        let after = flow.reserve(40.0);
        assert_eq!((after.page, after.column), (3, 0));
    }

    #[test]
    fn advance_adds_space_and_clamps_at_the_bottom() {
        let cfg = config(100.0);
        let mut flow = PageFlow::new(&cfg);
        flow.advance(30.0);
        let p = flow.reserve(40.0);
        assert_eq!((p.page, p.y), (1, cfg.margin + 30.0));
        flow.finish_row();
        flow.advance(1000.0);
        assert_eq!(flow.cursor().y, cfg.content_bottom());
    }

    #[test]
    fn identical_sequences_give_identical_traces() {
        let cfg = config(260.0);
        let heights = [75.0, 75.0, 30.0, 75.0, 75.0, 75.0];
        let run = || {
            let mut flow = PageFlow::new(&cfg);
            heights.iter().map(|&h| flow.reserve(h)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
