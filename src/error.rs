use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading grids and exporting figures
#[derive(Debug, Error)]
pub enum GridPlotError {
    /// The current working directory could not be determined
    #[error("Cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    /// A grid folder is missing or cannot be listed
    #[error("Cannot list directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file cannot be opened or read as netCDF
    #[error("Invalid netCDF file {}: {source}", path.display())]
    Netcdf {
        path: PathBuf,
        #[source]
        source: netcdf::Error,
    },

    /// The container is valid but does not hold a lon/lat grid
    #[error("Unsupported grid in {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// The rendered document cannot be written
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PDF encoding failed (image compression)
    #[error("PDF encoding error: {0}")]
    Encode(#[source] std::io::Error),
}

/// Type alias for Results using GridPlotError
pub type Result<T> = std::result::Result<T, GridPlotError>;
