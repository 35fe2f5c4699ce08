//! Page geometry: where each cell, axes box and title goes
//!
//! PDF user space has its origin at the bottom-left of the page, so figure
//! row 0 is the top band of cells. Fixed gutters inside every cell leave
//! room for the panel title and tick labels, so neighbouring panels never
//! overlap.

use crate::figure::FigureLayout;

/// Space around the whole figure
pub const PAGE_MARGIN: f64 = 6.0;

/// Figure title font size and the band reserved for it
pub const SUPTITLE_SIZE: f64 = 12.0;
pub const SUPTITLE_BAND: f64 = 22.0;

/// Panel title font size and the band reserved above each axes box
pub const PANEL_TITLE_SIZE: f64 = 9.0;
pub const PANEL_TITLE_BAND: f64 = 15.0;

/// Tick mark length and tick label font size
pub const TICK_LENGTH: f64 = 3.0;
pub const TICK_LABEL_SIZE: f64 = 6.5;

/// Gutters between the cell border and the axes box
pub const LEFT_GUTTER: f64 = 34.0;
pub const BOTTOM_GUTTER: f64 = 16.0;
pub const RIGHT_GUTTER: f64 = 12.0;

/// An axis-aligned box in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    /// True if the interiors of both boxes intersect
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }

    pub fn contains(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.top() <= self.top()
    }
}

/// Geometry of one page
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    layout: FigureLayout,
    cell_w: f64,
    cell_h: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64, layout: FigureLayout) -> Self {
        let cols = layout.cols.max(1) as f64;
        let rows = layout.rows.max(1) as f64;
        let cell_w = (width - 2.0 * PAGE_MARGIN) / cols;
        let cell_h = (height - 2.0 * PAGE_MARGIN - SUPTITLE_BAND) / rows;
        PageGeometry {
            width,
            height,
            layout,
            cell_w,
            cell_h,
        }
    }

    /// Baseline center of the figure title
    pub fn suptitle_anchor(&self) -> (f64, f64) {
        (
            self.width / 2.0,
            self.height - PAGE_MARGIN - SUPTITLE_SIZE,
        )
    }

    /// Cell box of (row, col); row 0 is at the top of the page
    pub fn cell(&self, row: usize, col: usize) -> Bounds {
        let flipped = self.layout.rows.saturating_sub(1 + row) as f64;
        Bounds {
            x: PAGE_MARGIN + col as f64 * self.cell_w,
            y: PAGE_MARGIN + flipped * self.cell_h,
            w: self.cell_w,
            h: self.cell_h,
        }
    }

    /// Axes box inside a cell
    pub fn axes(&self, cell: &Bounds) -> Bounds {
        Bounds {
            x: cell.x + LEFT_GUTTER,
            y: cell.y + BOTTOM_GUTTER,
            w: (cell.w - LEFT_GUTTER - RIGHT_GUTTER).max(1.0),
            h: (cell.h - BOTTOM_GUTTER - PANEL_TITLE_BAND).max(1.0),
        }
    }

    /// Baseline center of a panel title
    pub fn title_anchor(&self, axes: &Bounds) -> (f64, f64) {
        (axes.center_x(), axes.top() + 4.0)
    }

    /// Widest panel title that, centred over the axes, stays inside the cell
    pub fn title_width(&self, cell: &Bounds, axes: &Bounds) -> f64 {
        let cx = axes.center_x();
        2.0 * (cx - cell.x).min(cell.right() - cx).max(0.0)
    }
}
