//! Figure composition: one panel per grid on a fixed-width panel grid
//!
//! Row count is `file_count / columns` (floor). Panels fill cells row-major
//! in file order; files beyond `rows * columns` get no cell.

use crate::grids::{Extent, Grid};
use std::path::{Path, PathBuf};

/// Rows x columns of panel cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureLayout {
    pub rows: usize,
    pub cols: usize,
}

impl FigureLayout {
    pub fn for_file_count(n_files: usize, cols: usize) -> Self {
        let rows = if cols == 0 { 0 } else { n_files / cols };
        FigureLayout { rows, cols }
    }

    /// Number of cells, i.e. the number of files that get a panel
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// A layout without rows has nothing to draw
    pub fn is_empty(&self) -> bool {
        self.capacity() == 0
    }

    /// (row, col) of the n-th cell, row-major
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Split listed files into those that get a cell and those that do not
    ///
    /// Order is kept: the first `capacity()` files are plotted, the rest dropped.
    pub fn split_files(&self, mut files: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let dropped = files.split_off(self.capacity().min(files.len()));
        (files, dropped)
    }
}

/// One populated cell
#[derive(Debug, Clone)]
pub struct Panel {
    /// File base name
    pub title: String,
    pub source: PathBuf,
    pub row: usize,
    pub col: usize,
    pub grid: Grid,
}

impl Panel {
    pub fn extent(&self) -> Extent {
        self.grid.extent()
    }
}

/// A composed figure, ready for export
#[derive(Debug, Clone)]
pub struct Figure {
    pub title: String,
    pub layout: FigureLayout,
    pub panels: Vec<Panel>,
    /// Page width in points
    pub width: f64,
    /// Page height in points
    pub height: f64,
}

/// Base name of a path, as shown in a panel title
pub fn panel_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Figure title for a grid folder
pub fn figure_title(group: &str) -> String {
    format!("Folder: {}", group)
}

/// Lay out loaded grids on the figure
///
/// Pairs cells with grids in order and stops at whichever runs out first,
/// so grids beyond the layout capacity are not drawn.
///
/// # Arguments
/// * `group` - Grid folder name, used in the figure title
/// * `layout` - Cell grid
/// * `size` - Page (width, height) in points
/// * `grids` - Source path and grid, in file order
pub fn compose_figure(
    group: &str,
    layout: FigureLayout,
    size: (f64, f64),
    grids: Vec<(PathBuf, Grid)>,
) -> Figure {
    let panels = (0..layout.capacity())
        .zip(grids)
        .map(|(index, (source, grid))| {
            let (row, col) = layout.cell(index);
            Panel {
                title: panel_title(&source),
                source,
                row,
                col,
                grid,
            }
        })
        .collect();

    Figure {
        title: figure_title(group),
        layout,
        panels,
        width: size.0,
        height: size.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grids::{CoordinateAxis, LAT, LON};
    use ndarray::Array2;

    fn grid() -> Grid {
        Grid {
            name: "z".into(),
            values: Array2::zeros((10, 10)),
            lon: CoordinateAxis {
                name: LON.into(),
                values: vec![-125.0, -122.0],
            },
            lat: CoordinateAxis {
                name: LAT.into(),
                values: vec![40.0, 45.0],
            },
        }
    }

    fn grids(names: &[&str]) -> Vec<(PathBuf, Grid)> {
        names
            .iter()
            .map(|n| (PathBuf::from("/data/grids_masked").join(n), grid()))
            .collect()
    }

    #[test]
    fn test_layout_rows_floor() {
        assert_eq!(FigureLayout::for_file_count(6, 3).rows, 2);
        assert_eq!(FigureLayout::for_file_count(7, 3).rows, 2);
        assert_eq!(FigureLayout::for_file_count(8, 3).capacity(), 6);
        assert!(FigureLayout::for_file_count(2, 3).is_empty());
        assert!(FigureLayout::for_file_count(0, 3).is_empty());
    }

    #[test]
    fn test_layout_cells_row_major() {
        let layout = FigureLayout::for_file_count(6, 3);
        assert_eq!(layout.cell(0), (0, 0));
        assert_eq!(layout.cell(2), (0, 2));
        assert_eq!(layout.cell(3), (1, 0));
        assert_eq!(layout.cell(5), (1, 2));
    }

    #[test]
    fn test_split_files_keeps_listing_order() {
        let files: Vec<PathBuf> = ["e", "a", "d", "b", "c"]
            .iter()
            .map(|n| PathBuf::from(format!("/g/{n}.grd")))
            .collect();

        let layout = FigureLayout::for_file_count(files.len(), 3);
        let (kept, dropped) = layout.split_files(files.clone());
        assert_eq!(kept, files[..3]);
        assert_eq!(dropped, files[3..]);

        let (kept, dropped) = FigureLayout::for_file_count(2, 3).split_files(files[..2].to_vec());
        assert!(kept.is_empty());
        assert_eq!(dropped, files[..2]);

        let (kept, dropped) = FigureLayout::for_file_count(0, 3).split_files(Vec::new());
        assert!(kept.is_empty() && dropped.is_empty());
    }

    #[test]
    fn test_compose_six_panels() {
        let layout = FigureLayout::for_file_count(6, 3);
        let figure = compose_figure(
            "grids_masked",
            layout,
            (504.0, 432.0),
            grids(&["a.grd", "b.grd", "c.grd", "d.grd", "e.grd", "f.grd"]),
        );

        assert_eq!(figure.title, "Folder: grids_masked");
        assert_eq!(figure.panels.len(), 6);
        let titles: Vec<&str> = figure.panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["a.grd", "b.grd", "c.grd", "d.grd", "e.grd", "f.grd"]);
        assert_eq!((figure.panels[4].row, figure.panels[4].col), (1, 1));
        for panel in &figure.panels {
            assert_eq!(panel.extent().as_tuple(), (-125.0, -122.0, 40.0, 45.0));
        }
    }

    #[test]
    fn test_compose_drops_excess_grids() {
        let layout = FigureLayout { rows: 1, cols: 3 };
        let figure = compose_figure(
            "grids_unmasked",
            layout,
            (504.0, 216.0),
            grids(&["a.grd", "b.grd", "c.grd", "d.grd"]),
        );
        assert_eq!(figure.panels.len(), 3);
        assert_eq!(figure.panels[2].title, "c.grd");
    }

    #[test]
    fn test_compose_leaves_cells_empty() {
        let layout = FigureLayout { rows: 2, cols: 3 };
        let figure = compose_figure("g", layout, (504.0, 432.0), grids(&["a.grd"]));
        assert_eq!(figure.panels.len(), 1);
    }

    #[test]
    fn test_panel_title_is_base_name() {
        assert_eq!(
            panel_title(Path::new("/data/grids_masked/slab_depth.grd")),
            "slab_depth.grd"
        );
    }
}
