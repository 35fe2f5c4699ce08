//! Figure rendering
//!
//! Structure:
//! - `palettes.rs`: Viridis colormap and value-to-color scale
//! - `layout.rs`: page geometry (cells, axes boxes, title anchors)
//! - `ticks.rs`: axis tick selection and labels
//! - `text.rs`: Helvetica metrics and text encoding
//! - `pdf.rs`: PDF document writer

pub mod layout;
pub mod palettes;
pub mod pdf;
pub mod text;
pub mod ticks;

pub use palettes::{PaletteDefinition, VIRIDIS};
pub use pdf::{render_figure, write_figure};
