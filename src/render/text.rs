//! Helvetica metrics for placing text without embedding a font
//!
//! PDF viewers ship the 14 standard Type 1 fonts, so panels use Helvetica
//! by name with WinAnsiEncoding. Printable ASCII and the Latin-1 range
//! (U+00A0..U+00FF) map to their own byte in that encoding; anything else is
//! written as `?`. Widths are the Helvetica AFM advance widths (1/1000 em).

/// Advance widths for code points 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Advance widths for code points 0xA0..=0xFF
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp..macron
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // degree..questiondown
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 'À'..'Ï'
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 'Ð'..'ß'
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 'à'..'ï'
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 'ð'..'ÿ'
];

const REPLACEMENT: u8 = b'?';

/// WinAnsi bytes to show for a string
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => c as u8,
            _ => REPLACEMENT,
        })
        .collect()
}

fn advance(byte: u8) -> u16 {
    match byte {
        b' '..=b'~' => HELVETICA_WIDTHS[(byte - b' ') as usize],
        0xA0..=0xFF => HELVETICA_LATIN1_WIDTHS[(byte - 0xA0) as usize],
        _ => HELVETICA_WIDTHS[(REPLACEMENT - b' ') as usize],
    }
}

/// Width of `text` in points at `size`
pub fn text_width(text: &str, size: f64) -> f64 {
    let units: u32 = encode(text)
        .iter()
        .map(|&b| advance(b) as u32)
        .sum();
    units as f64 / 1000.0 * size
}

/// Largest font size not above `size` at which `text` fits in `max_width`
pub fn fit_size(text: &str, size: f64, max_width: f64) -> f64 {
    let width = text_width(text, size);
    if width <= max_width || width == 0.0 {
        size
    } else {
        size * max_width / width
    }
}
