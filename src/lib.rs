//! Slab grid plotter library
//!
//! Loads the lon/lat raster grids of the `grids_unmasked` and `grids_masked`
//! folders and writes one multi-panel PDF per folder.
//!
//! Module organization:
//! - `config`: Paths, layout and page size
//! - `grids`: Folder listing and netCDF grid loading
//! - `figure`: Panel layout and figure composition
//! - `render`: Palettes, page geometry and PDF export
//! - `pipeline`: Per-folder driver

pub mod config;
pub mod error;
pub mod figure;
pub mod grids;
pub mod memprof;
pub mod pipeline;
pub mod render;

pub use error::{GridPlotError, Result};
