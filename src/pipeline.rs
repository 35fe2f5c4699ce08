//! Grid folder to PDF pipeline
//!
//! For every grid folder, in order:
//! 1. Lists the folder
//! 2. Sizes the panel grid from the file count
//! 3. Loads the grids that get a cell
//! 4. Composes the figure and writes `{group}.pdf`
//!
//! The first failure aborts the run; documents already written stay on disk.

use crate::config::{PlotConfig, MAX_PAGE_POINTS};
use crate::error::Result;
use crate::figure::{compose_figure, FigureLayout};
use crate::grids::{list_grid_files, load_grid, Extent};
use crate::memprof;
use crate::render::{write_figure, VIRIDIS};
use std::path::PathBuf;
use tracing::{info, warn};

/// Title and extent of one rendered panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSummary {
    pub title: String,
    pub extent: Extent,
}

/// Outcome of one grid folder
#[derive(Debug, Clone)]
pub struct GroupReport {
    pub group: String,
    pub layout: FigureLayout,
    /// Written document, None when the layout had no rows
    pub output: Option<PathBuf>,
    pub bytes_written: u64,
    pub panels: Vec<PanelSummary>,
    /// Files that did not fit in the layout and were never opened
    pub dropped: Vec<PathBuf>,
}

/// Process every configured grid folder in order
pub fn run(config: &PlotConfig) -> Result<Vec<GroupReport>> {
    let m0 = memprof::checkpoint("run START");
    let t0 = memprof::time_start("run");

    let mut reports = Vec::with_capacity(config.groups.len());
    for (i, group) in config.groups.iter().enumerate() {
        println!("\n[{}/{}] Folder: {}", i + 1, config.groups.len(), group);
        reports.push(process_group(config, group)?);
    }

    memprof::delta("run END", m0);
    memprof::time_elapsed("run", t0);
    Ok(reports)
}

/// List, load, compose and export one grid folder
pub fn process_group(config: &PlotConfig, group: &str) -> Result<GroupReport> {
    let dir = config.group_dir(group);
    let files = list_grid_files(&dir)?;
    println!("  Files: {} in {}", files.len(), dir.display());

    let layout = FigureLayout::for_file_count(files.len(), config.columns);
    let (files, dropped) = layout.split_files(files);
    for path in &dropped {
        warn!(
            "{} does not fill a row of {} panels, skipping",
            path.display(),
            config.columns
        );
    }

    if layout.is_empty() {
        warn!(
            "{}: {} file(s) is fewer than one row of {}, no document written",
            group,
            dropped.len(),
            config.columns
        );
        println!("  ✗ Nothing to plot, skipped");
        return Ok(GroupReport {
            group: group.to_string(),
            layout,
            output: None,
            bytes_written: 0,
            panels: Vec::new(),
            dropped,
        });
    }

    println!(
        "  Layout: {} rows × {} columns = {} panels",
        layout.rows,
        layout.cols,
        layout.capacity()
    );

    if config.exceeds_page_limit(layout.rows) {
        warn!(
            "{}: {} rows make a {:.0}pt page, beyond the {:.0}pt PDF page limit; readers may clip it",
            group,
            layout.rows,
            config.resolve_dimensions(layout.rows).1,
            MAX_PAGE_POINTS
        );
    }

    let t_load = memprof::time_start("load grids");
    let mut grids = Vec::with_capacity(files.len());
    for path in files {
        let grid = load_grid(&path)?;
        grids.push((path, grid));
    }
    memprof::time_elapsed("load grids", t_load);

    let figure = compose_figure(
        group,
        layout,
        config.resolve_dimensions(layout.rows),
        grids,
    );
    let panels = figure
        .panels
        .iter()
        .map(|p| PanelSummary {
            title: p.title.clone(),
            extent: p.extent(),
        })
        .collect();

    let output = config.output_path(group);
    let bytes_written = write_figure(&figure, &VIRIDIS, &output)?;
    info!(
        "Wrote {} ({} panels, {} bytes)",
        output.display(),
        figure.panels.len(),
        bytes_written
    );
    println!("  ✓ Saved {} ({} bytes)", output.display(), bytes_written);

    Ok(GroupReport {
        group: group.to_string(),
        layout,
        output: Some(output),
        bytes_written,
        panels,
        dropped,
    })
}
