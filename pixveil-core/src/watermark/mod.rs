//! Faint text watermark that becomes visible on reveal.
//!
//! Embedding adds a small constant to the Blue channel under a tiled,
//! rotated text mask ([`mask::TextMask`]). The change is invisible at normal
//! viewing but stands out in the Blue-minus-(Red+Green)/2 difference, which
//! [`reveal`] amplifies into a grey-scale image.
//!
//! # Usage
//!
//! ```
//! use pixveil_core::config::WatermarkConfig;
//! use pixveil_core::pixels::{PixelBuffer, Rgba};
//! use pixveil_core::watermark;
//!
//! let image = PixelBuffer::new(160, 160, Rgba::gray(128));
//! let config = WatermarkConfig::default();
//! let marked = watermark::embed(&image, "(c) pixveil", &config).unwrap();
//! let revealed = watermark::reveal(&marked, &config);
//! assert_eq!(revealed.width(), 160);
//! ```

pub mod mask;

use tracing::debug;

use crate::config::WatermarkConfig;
use crate::error::Result;
use crate::pixels::{PixelBuffer, Rgba};
use crate::progress::{NoProgress, Progress};

pub use mask::TextMask;

/// Neutral level of the revealed image.
const REVEAL_MID: f64 = 128.0;

pub fn embed(pixels: &PixelBuffer, text: &str, config: &WatermarkConfig) -> Result<PixelBuffer> {
    embed_with_progress(pixels, text, config, &mut NoProgress)
}

pub fn embed_with_progress(
    pixels: &PixelBuffer,
    text: &str,
    config: &WatermarkConfig,
    progress: &mut dyn Progress,
) -> Result<PixelBuffer> {
    let mask = TextMask::new(text, pixels.width(), pixels.height())?;
    let mut out = pixels.clone();
    let rows = out.height() as usize;
    let mut marked = 0usize;

    for y in 0..out.height() {
        for (x, px) in out.row_mut(y).iter_mut().enumerate() {
            if mask.contains(x as u32, y) {
                px.b = px.b.saturating_add(config.delta);
                marked += 1;
            }
        }
        progress.advance(y as usize + 1, rows);
    }

    debug!(marked, scale = mask.scale(), "Watermark embedded");
    Ok(out)
}

pub fn reveal(pixels: &PixelBuffer, config: &WatermarkConfig) -> PixelBuffer {
    reveal_with_progress(pixels, config, &mut NoProgress)
}

/// Amplify `B - (R + G) / 2` around mid-grey. Alpha is kept.
pub fn reveal_with_progress(
    pixels: &PixelBuffer,
    config: &WatermarkConfig,
    progress: &mut dyn Progress,
) -> PixelBuffer {
    let mut out = pixels.clone();
    let rows = out.height() as usize;
    for y in 0..out.height() {
        for px in out.row_mut(y) {
            let diff = px.b as f64 - (px.r as f64 + px.g as f64) / 2.0;
            let v = (REVEAL_MID + diff * config.gain).round().clamp(0.0, 255.0) as u8;
            *px = Rgba::new(v, v, v, px.a);
        }
        progress.advance(y as usize + 1, rows);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StegoError;

    #[test]
    fn test_embed_touches_only_blue() {
        let image = PixelBuffer::new(120, 80, Rgba::new(60, 90, 120, 200));
        let marked = embed(&image, "TEST", &WatermarkConfig::default()).unwrap();
        let mut changed = 0;
        for (a, b) in image.pixels().iter().zip(marked.pixels()) {
            assert_eq!((a.r, a.g, a.a), (b.r, b.g, b.a));
            if a.b != b.b {
                assert_eq!(b.b, a.b + 5);
                changed += 1;
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_blue_saturates() {
        let image = PixelBuffer::new(64, 64, Rgba::opaque(0, 0, 253));
        let marked = embed(&image, "W", &WatermarkConfig::default()).unwrap();
        assert!(marked.pixels().iter().all(|p| p.b == 253 || p.b == 255));
    }

    #[test]
    fn test_reveal_is_bimodal_on_grey() {
        let config = WatermarkConfig::default();
        let image = PixelBuffer::new(100, 100, Rgba::gray(128));
        let revealed = reveal(&embed(&image, "HI", &config).unwrap(), &config);

        let mut levels: Vec<u8> = revealed.pixels().iter().map(|p| p.r).collect();
        levels.sort_unstable();
        levels.dedup();
        assert_eq!(levels, vec![128, 228]);
    }

    #[test]
    fn test_reveal_clean_image_is_flat() {
        let image = PixelBuffer::new(16, 16, Rgba::new(100, 100, 100, 50));
        let revealed = reveal(&image, &WatermarkConfig::default());
        assert!(revealed.pixels().iter().all(|&p| p == Rgba::new(128, 128, 128, 50)));
    }

    #[test]
    fn test_reveal_clamps() {
        let image = PixelBuffer::new(1, 2, Rgba::opaque(0, 0, 255));
        let revealed = reveal(&image, &WatermarkConfig::default());
        assert_eq!(revealed.get(0, 0), Rgba::gray(255));

        let image = PixelBuffer::new(1, 1, Rgba::opaque(255, 255, 0));
        assert_eq!(reveal(&image, &WatermarkConfig::default()).get(0, 0), Rgba::gray(0));
    }

    #[test]
    fn test_empty_text() {
        let image = PixelBuffer::new(8, 8, Rgba::BLACK);
        assert!(matches!(
            embed(&image, "", &WatermarkConfig::default()),
            Err(StegoError::InvalidInput(_))
        ));
    }
}
