//! Raster colormap and value-to-color mapping
//!
//! The Viridis stops live in palettes.json (embedded at compile time), the
//! same default colormap `imshow` uses.

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::{error, warn};

/// Embedded palettes.json content
const PALETTES_JSON: &str = include_str!("../../palettes.json");

/// Palette name used for every raster panel
pub const VIRIDIS_NAME: &str = "Viridis";

/// Viridis, loaded lazily on first access
pub static VIRIDIS: Lazy<PaletteDefinition> = Lazy::new(|| {
    PaletteDefinition::from_json(PALETTES_JSON, VIRIDIS_NAME).unwrap_or_else(|e| {
        error!("Failed to load palettes.json: {}", e);
        PaletteDefinition {
            name: VIRIDIS_NAME.to_string(),
            colors: Vec::new(),
        }
    })
});

/// Color used for NaN cells (blank panel background)
pub const NAN_COLOR: [u8; 3] = [255, 255, 255];

const FALLBACK_GRAY: [u8; 3] = [128, 128, 128];

/// A single palette definition from palettes.json
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteDefinition {
    pub name: String,
    pub colors: Vec<String>,
}

impl PaletteDefinition {
    /// Find a palette by name (case-insensitive) in a palettes.json document
    pub fn from_json(json: &str, name: &str) -> Result<Self, String> {
        let definitions: Vec<PaletteDefinition> = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse palettes JSON: {}", e))?;
        definitions
            .into_iter()
            .find(|def| def.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("Palette '{}' not found", name))
    }

    /// Get a color by index (clamped to the last color)
    pub fn get_color(&self, index: usize) -> [u8; 3] {
        if self.colors.is_empty() {
            return FALLBACK_GRAY;
        }
        let idx = index.min(self.colors.len() - 1);
        parse_hex_color(&self.colors[idx]).unwrap_or(FALLBACK_GRAY)
    }

    /// Interpolate a color from the palette at position t ∈ [0, 1]
    ///
    /// t=0 returns the first color, t=1 returns the last color.
    /// Values in between are linearly interpolated.
    pub fn interpolate(&self, t: f64) -> [u8; 3] {
        if self.colors.is_empty() {
            return FALLBACK_GRAY;
        }

        let t = t.clamp(0.0, 1.0);
        let n = self.colors.len();

        if n == 1 {
            return self.get_color(0);
        }

        let pos = t * (n - 1) as f64;
        let idx_low = pos.floor() as usize;
        let idx_high = (idx_low + 1).min(n - 1);
        let frac = pos - idx_low as f64;

        let low = self.get_color(idx_low);
        let high = self.get_color(idx_high);

        [
            lerp(low[0], high[0], frac),
            lerp(low[1], high[1], frac),
            lerp(low[2], high[2], frac),
        ]
    }
}

fn lerp(a: u8, b: u8, frac: f64) -> u8 {
    (a as f64 * (1.0 - frac) + b as f64 * frac).round() as u8
}

/// Parse a hex color string to RGB array
///
/// Supports `#RRGGBB` and `#RRGGBBAA` (alpha ignored), with or without `#`.
fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim_start_matches('#');

    if hex.len() != 6 && hex.len() != 8 {
        warn!("Invalid hex color length '{}': {}", hex, hex.len());
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some([r, g, b])
}

/// Maps raster values linearly onto a palette
///
/// `[min, max]` is normalised to `[0, 1]`; a zero-width range maps every
/// value to the first color. NaN maps to [`NAN_COLOR`].
#[derive(Debug, Clone)]
pub struct ColorScale<'a> {
    palette: &'a PaletteDefinition,
    min: f64,
    max: f64,
}

impl<'a> ColorScale<'a> {
    pub fn new(palette: &'a PaletteDefinition, min: f64, max: f64) -> Self {
        ColorScale { palette, min, max }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            (value - self.min) / span
        } else {
            0.0
        }
    }

    pub fn color(&self, value: f64) -> [u8; 3] {
        if value.is_nan() {
            return NAN_COLOR;
        }
        self.palette.interpolate(self.normalize(value))
    }
}
