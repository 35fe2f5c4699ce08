//! Plot configuration
//!
//! The layout, page size and color scale are fixed. Only the input root and
//! the output directory vary, and both default to what the working directory
//! implies: grid folders live next to the working directory (in its parent),
//! documents are written into it.

use crate::error::{GridPlotError, Result};
use std::path::{Path, PathBuf};

/// Grid folders processed on every run, in order
pub const GROUPS: [&str; 2] = ["grids_unmasked", "grids_masked"];

/// Panels per figure row
pub const COLUMNS: usize = 3;

/// Figure width in inches
pub const FIGURE_WIDTH_IN: f64 = 7.0;

/// Figure height per panel row in inches
pub const ROW_HEIGHT_IN: f64 = 3.0;

/// PDF user space units per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Largest page side most PDF readers accept (200 in)
pub const MAX_PAGE_POINTS: f64 = 14_400.0;

#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Directory holding the grid folders
    pub root: PathBuf,

    /// Directory receiving `{group}.pdf`
    pub output_dir: PathBuf,

    /// Grid folder names under `root`
    pub groups: Vec<String>,

    /// Panels per row
    pub columns: usize,

    /// Figure width in inches
    pub figure_width_in: f64,

    /// Height of one panel row in inches
    pub row_height_in: f64,
}

impl PlotConfig {
    /// Create config with explicit input root and output directory
    pub fn new(root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_dir: output_dir.into(),
            groups: GROUPS.iter().map(|g| g.to_string()).collect(),
            columns: COLUMNS,
            figure_width_in: FIGURE_WIDTH_IN,
            row_height_in: ROW_HEIGHT_IN,
        }
    }

    /// Derive root and output directory from the process working directory
    ///
    /// Either can be overridden; `None` keeps the working-directory default.
    pub fn from_working_dir(root: Option<PathBuf>, output_dir: Option<PathBuf>) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(GridPlotError::WorkingDir)?;
        let root = root.unwrap_or_else(|| default_root(&cwd));
        let output_dir = output_dir.unwrap_or(cwd);
        Ok(Self::new(root, output_dir))
    }

    /// Full path of a grid folder
    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.root.join(group)
    }

    /// Full path of the document written for a grid folder
    pub fn output_path(&self, group: &str) -> PathBuf {
        self.output_dir.join(format!("{}.pdf", group))
    }

    /// Resolve the page size for a number of panel rows
    ///
    /// Returns (width, height) in points: fixed width, height proportional
    /// to the row count.
    pub fn resolve_dimensions(&self, rows: usize) -> (f64, f64) {
        let width = self.figure_width_in * POINTS_PER_INCH;
        let height = self.row_height_in * rows as f64 * POINTS_PER_INCH;
        (width, height)
    }

    /// True when the page for `rows` panel rows is taller than readers accept
    pub fn exceeds_page_limit(&self, rows: usize) -> bool {
        let (width, height) = self.resolve_dimensions(rows);
        width > MAX_PAGE_POINTS || height > MAX_PAGE_POINTS
    }
}

/// Parent of the working directory, or the directory itself at the filesystem root
fn default_root(cwd: &Path) -> PathBuf {
    cwd.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf())
}
