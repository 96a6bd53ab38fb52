//! Rendered text mask for the visible-on-reveal watermark.
//!
//! The text is drawn with an 8x8 bitmap font, scaled so its height is about
//! one twentieth of the image width, repeated on a square grid whose pitch
//! is 1.5x the text width, and rotated 45 degrees counter-clockwise about
//! the image centre. Every destination pixel is mapped back into the
//! unrotated text plane and looked up in the periodic tiling, so the whole
//! image is covered regardless of aspect ratio.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

use crate::error::{Result, StegoError};

const GLYPH: usize = 8;
/// Text height as a fraction of image width.
const HEIGHT_DIVISOR: u32 = 20;
/// Grid pitch as a multiple of the text width.
const GAP_FACTOR: f64 = 1.5;

fn glyph(ch: char) -> [u8; GLYPH] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; GLYPH])
}

#[derive(Debug, Clone)]
pub struct TextMask {
    glyphs: Vec<[u8; GLYPH]>,
    scale: usize,
    text_width: f64,
    text_height: f64,
    gap: f64,
    cx: f64,
    cy: f64,
}

impl TextMask {
    /// Lay out `text` for an image of the given size.
    pub fn new(text: &str, width: u32, height: u32) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(StegoError::InvalidInput("Watermark text is empty".into()));
        }

        let glyphs: Vec<_> = text.chars().map(glyph).collect();
        let scale = ((width / HEIGHT_DIVISOR) as usize / GLYPH).max(1);
        let text_width = (glyphs.len() * GLYPH * scale) as f64;

        Ok(Self {
            text_height: (GLYPH * scale) as f64,
            gap: text_width * GAP_FACTOR,
            glyphs,
            scale,
            text_width,
            cx: width as f64 / 2.0,
            cy: height as f64 / 2.0,
        })
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Distance between neighbouring copies of the text.
    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Whether the glyph ink covers pixel `(x, y)`.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        let dx = x as f64 + 0.5 - self.cx;
        let dy = y as f64 + 0.5 - self.cy;
        let (sin, cos) = std::f64::consts::FRAC_PI_4.sin_cos();
        let u = dx * cos - dy * sin;
        let v = dx * sin + dy * cos;

        let local_x = u.rem_euclid(self.gap);
        let local_y = v.rem_euclid(self.gap);
        if local_x >= self.text_width || local_y >= self.text_height {
            return false;
        }
        self.ink(local_x as usize / self.scale, local_y as usize / self.scale)
    }

    /// Glyph lookup in unscaled text coordinates.
    fn ink(&self, col: usize, row: usize) -> bool {
        let Some(bitmap) = self.glyphs.get(col / GLYPH) else {
            return false;
        };
        let row = row.min(GLYPH - 1);
        bitmap[row] >> (col % GLYPH) & 1 == 1
    }
}
