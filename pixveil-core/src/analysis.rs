//! LSB-plane steganalysis.
//!
//! Natural images tend to have a biased Blue LSB plane; a payload written
//! by an LSB embedder pushes it toward a fair coin. The detector reports the
//! two-symbol Shannon entropy of that plane and a black/white rendering of it.

use serde::Serialize;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::pixels::{PixelBuffer, Rgba};
use crate::progress::{NoProgress, Progress};

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Shannon entropy of the Blue LSB plane, in bits (0.0 to 1.0).
    pub entropy: f64,
    pub suspicious: bool,
    pub ones: u64,
    pub zeros: u64,
    /// Cutoff the `suspicious` flag was computed against.
    pub threshold: f64,
    /// White where the Blue LSB is 1, black elsewhere. Not serialized.
    #[serde(skip)]
    pub noise_map: PixelBuffer,
}

impl AnalysisResult {
    /// Share of pixels whose Blue LSB is set.
    pub fn ones_ratio(&self) -> f64 {
        let total = self.ones + self.zeros;
        if total == 0 {
            0.0
        } else {
            self.ones as f64 / total as f64
        }
    }
}

/// Shannon entropy of a two-symbol distribution.
pub fn binary_entropy(ones: u64, zeros: u64) -> f64 {
    let total = (ones + zeros) as f64;
    if total == 0.0 {
        return 0.0;
    }
    [ones, zeros]
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

pub fn analyze(pixels: &PixelBuffer, config: &AnalysisConfig) -> AnalysisResult {
    analyze_with_progress(pixels, config, &mut NoProgress)
}

pub fn analyze_with_progress(
    pixels: &PixelBuffer,
    config: &AnalysisConfig,
    progress: &mut dyn Progress,
) -> AnalysisResult {
    let mut noise_map = PixelBuffer::new(pixels.width(), pixels.height(), Rgba::BLACK);
    let mut ones = 0u64;
    let rows = pixels.height() as usize;

    for y in 0..pixels.height() {
        for (src, dst) in pixels.row(y).iter().zip(noise_map.row_mut(y)) {
            if src.b & 1 == 1 {
                ones += 1;
                *dst = Rgba::WHITE;
            }
        }
        progress.advance(y as usize + 1, rows);
    }

    let zeros = pixels.len() as u64 - ones;
    let entropy = binary_entropy(ones, zeros);
    let suspicious = entropy > config.entropy_threshold;
    debug!(entropy, ones, zeros, suspicious, "LSB plane analyzed");

    AnalysisResult {
        entropy,
        suspicious,
        ones,
        zeros,
        threshold: config.entropy_threshold,
        noise_map,
    }
}
