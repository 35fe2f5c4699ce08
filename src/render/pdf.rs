//! PDF export of a composed figure
//!
//! One page per figure. Each panel is an RGB image XObject stretched over its
//! axes box (non-uniform scaling), framed, with lon ticks below and lat ticks
//! to the left. Grid row 0 is painted at the bottom of the axes box.

use super::layout::{
    Bounds, PageGeometry, PANEL_TITLE_SIZE, SUPTITLE_SIZE, TICK_LABEL_SIZE, TICK_LENGTH,
};
use super::palettes::{ColorScale, PaletteDefinition};
use super::text;
use super::ticks::nice_ticks;
use crate::error::{GridPlotError, Result};
use crate::figure::{Figure, Panel};
use crate::grids::Grid;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};
use std::io::Write;
use std::path::Path;
use tracing::debug;

const FONT: Name<'static> = Name(b"F1");

/// Approximate number of intervals per axis
const TICK_TARGET: usize = 4;

/// Gap between a tick mark and its label
const LABEL_GAP: f64 = 2.0;

const FRAME_WIDTH: f32 = 0.8;

/// Render a figure to PDF bytes
pub fn render_figure(figure: &Figure, palette: &PaletteDefinition) -> Result<Vec<u8>> {
    let geometry = PageGeometry::new(figure.width, figure.height, figure.layout);

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let content_id = Ref::new(4);
    let font_id = Ref::new(5);
    let mut next_id = 6;

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut content = Content::new();
    let mut images: Vec<(String, Ref)> = Vec::new();

    let (sx, sy) = geometry.suptitle_anchor();
    let suptitle_size = text::fit_size(&figure.title, SUPTITLE_SIZE, figure.width);
    show_centered(&mut content, &figure.title, suptitle_size, sx, sy);

    for (index, panel) in figure.panels.iter().enumerate() {
        let cell = geometry.cell(panel.row, panel.col);
        let axes = geometry.axes(&cell);

        if let Some(encoded) = encode_panel_image(&panel.grid, palette)? {
            let image_id = Ref::new(next_id);
            next_id += 1;

            let mut image = pdf.image_xobject(image_id, &encoded.data);
            image.filter(Filter::FlateDecode);
            image.width(encoded.width as i32);
            image.height(encoded.height as i32);
            image.color_space().device_rgb();
            image.bits_per_component(8);
            image.finish();

            let name = format!("Im{}", index);
            content.save_state();
            content.transform([
                axes.w as f32,
                0.0,
                0.0,
                axes.h as f32,
                axes.x as f32,
                axes.y as f32,
            ]);
            content.x_object(Name(name.as_bytes()));
            content.restore_state();
            images.push((name, image_id));
        }

        draw_axes(&mut content, panel, &axes);

        let (tx, ty) = geometry.title_anchor(&axes);
        let title_room = geometry.title_width(&cell, &axes);
        let title_size = text::fit_size(&panel.title, PANEL_TITLE_SIZE, title_room);
        show_centered(&mut content, &panel.title, title_size, tx, ty);
    }

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, figure.width as f32, figure.height as f32));
    page.parent(page_tree_id);
    page.contents(content_id);
    let mut resources = page.resources();
    resources.fonts().pair(FONT, font_id);
    let mut x_objects = resources.x_objects();
    for (name, id) in &images {
        x_objects.pair(Name(name.as_bytes()), *id);
    }
    x_objects.finish();
    resources.finish();
    page.finish();

    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.stream(content_id, &content.finish());

    debug!(
        "Rendered '{}': {} panels, {} images",
        figure.title,
        figure.panels.len(),
        images.len()
    );

    Ok(pdf.finish())
}

/// Render a figure and write it to `path`
pub fn write_figure(figure: &Figure, palette: &PaletteDefinition, path: &Path) -> Result<u64> {
    let bytes = render_figure(figure, palette)?;
    std::fs::write(path, &bytes).map_err(|source| GridPlotError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes.len() as u64)
}

/// Compressed image payload of one panel
pub struct EncodedImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

/// Color-map and compress a grid; None for an empty grid
fn encode_panel_image(grid: &Grid, palette: &PaletteDefinition) -> Result<Option<EncodedImage>> {
    if grid.nrows() == 0 || grid.ncols() == 0 {
        return Ok(None);
    }

    let rgb = panel_rgb(grid, palette);
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&rgb).map_err(GridPlotError::Encode)?;
    let data = encoder.finish().map_err(GridPlotError::Encode)?;

    Ok(Some(EncodedImage {
        width: grid.ncols(),
        height: grid.nrows(),
        data,
    }))
}

/// Raw RGB samples in PDF image order (top scanline first)
///
/// The last grid row comes first so that grid row 0 lands at the bottom.
pub fn panel_rgb(grid: &Grid, palette: &PaletteDefinition) -> Vec<u8> {
    let (min, max) = grid.value_range().unwrap_or((0.0, 0.0));
    let scale = ColorScale::new(palette, min, max);

    let mut rgb = Vec::with_capacity(grid.nrows() * grid.ncols() * 3);
    for row in grid.values.rows().into_iter().rev() {
        for &value in row.iter() {
            rgb.extend_from_slice(&scale.color(value));
        }
    }
    rgb
}

/// Frame, ticks and tick labels of one panel
fn draw_axes(content: &mut Content, panel: &Panel, axes: &Bounds) {
    let extent = panel.extent();

    content.set_stroke_gray(0.0);
    content.set_line_width(FRAME_WIDTH);
    content.rect(axes.x as f32, axes.y as f32, axes.w as f32, axes.h as f32);
    content.stroke();

    let lon_ticks = nice_ticks(extent.lon_min, extent.lon_max, TICK_TARGET);
    for (value, label) in lon_ticks.values.iter().zip(lon_ticks.labels()) {
        let x = axes.x + fraction(*value, extent.lon_min, extent.lon_max) * axes.w;
        content.move_to(x as f32, axes.y as f32);
        content.line_to(x as f32, (axes.y - TICK_LENGTH) as f32);
        content.stroke();
        let baseline = axes.y - TICK_LENGTH - LABEL_GAP - TICK_LABEL_SIZE;
        show_centered(content, &label, TICK_LABEL_SIZE, x, baseline);
    }

    let lat_ticks = nice_ticks(extent.lat_min, extent.lat_max, TICK_TARGET);
    for (value, label) in lat_ticks.values.iter().zip(lat_ticks.labels()) {
        let y = axes.y + fraction(*value, extent.lat_min, extent.lat_max) * axes.h;
        content.move_to(axes.x as f32, y as f32);
        content.line_to((axes.x - TICK_LENGTH) as f32, y as f32);
        content.stroke();
        let right = axes.x - TICK_LENGTH - LABEL_GAP;
        let x = right - text::text_width(&label, TICK_LABEL_SIZE);
        show(content, &label, TICK_LABEL_SIZE, x, y - TICK_LABEL_SIZE * 0.35);
    }
}

/// Position of `value` within [min, max] as a fraction; 0 for an empty range
fn fraction(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span > 0.0 {
        (value - min) / span
    } else {
        0.0
    }
}

fn show(content: &mut Content, label: &str, size: f64, x: f64, y: f64) {
    let bytes = text::encode(label);
    content.begin_text();
    content.set_font(FONT, size as f32);
    content.next_line(x as f32, y as f32);
    content.show(Str(&bytes));
    content.end_text();
}

fn show_centered(content: &mut Content, label: &str, size: f64, center_x: f64, y: f64) {
    let x = center_x - text::text_width(label, size) / 2.0;
    show(content, label, size, x, y);
}
