//! Wavelet + SVD embedding in the Blue channel.
//!
//! Per 8x8 block: one-level Haar transform, SVD of the 4x4 LL band, then
//! quantization index modulation on the largest singular value. The parity
//! of `floor(s0 / step)` is the bit, and `s0` is moved to the centre of the
//! nearest cell with the right parity so rounding back to 8-bit pixels cannot
//! push it across a cell boundary. Bright or dark blocks can clip on the way
//! back to pixels, so every written block is read back and the next closest
//! cell is tried when the bit did not survive. One bit per complete block.

use tracing::{debug, warn};

use super::Codec;
use crate::bits::{ScanState, TerminatorScanner};
use crate::config::DwtSvdConfig;
use crate::error::{Result, StegoError};
use crate::pixels::{Channel, PixelBuffer};
use crate::progress::Progress;
use crate::transform::{self, haar, svd};

pub const TERMINATOR: &[u8] = b"$!@#END";

/// Carrier channel.
pub const CHANNEL: Channel = Channel::Blue;

/// Cells searched on each side of the current one.
const SEARCH_CELLS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwtSvdCodec {
    step: f64,
}

impl DwtSvdCodec {
    pub fn new(config: &DwtSvdConfig) -> Self {
        Self { step: config.step }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Centres of the cells around `s0` that encode `bit`, nearest first.
    /// Cells below zero are skipped.
    fn candidates(&self, s0: f64, bit: bool) -> Vec<f64> {
        let q = (s0 / self.step).floor() as i64;
        let mut centres: Vec<f64> = (q - SEARCH_CELLS..=q + SEARCH_CELLS)
            .filter(|&cell| cell >= 0 && (cell.rem_euclid(2) == 1) == bit)
            .map(|cell| (cell as f64 + 0.5) * self.step)
            .collect();
        centres.sort_by(|a, b| (a - s0).abs().total_cmp(&(b - s0).abs()));
        centres
    }

    fn read_bit(&self, s0: f64) -> bool {
        ((s0 / self.step).floor() as i64).rem_euclid(2) == 1
    }

    fn block_bit(&self, pixels: &PixelBuffer, x0: u32, y0: u32) -> bool {
        let bands = haar::forward(&transform::read_block(pixels, x0, y0, CHANNEL));
        self.read_bit(svd::decompose(&bands.ll).s[0])
    }

    /// Write `bit` into the block at `(x0, y0)`, trying cells from nearest to
    /// farthest until the bit reads back from the stored pixels. On failure
    /// the block is restored and `false` returned.
    fn embed_block(&self, pixels: &mut PixelBuffer, x0: u32, y0: u32, bit: bool) -> bool {
        let original = transform::read_block(pixels, x0, y0, CHANNEL);
        let bands = haar::forward(&original);
        let decomposition = svd::decompose(&bands.ll);

        for target in self.candidates(decomposition.s[0], bit) {
            let mut modified = decomposition;
            modified.s[0] = target;
            let mut out = bands;
            out.ll = modified.reconstruct();
            transform::write_block(pixels, x0, y0, CHANNEL, &haar::inverse(&out));
            if self.block_bit(pixels, x0, y0) == bit {
                return true;
            }
        }
        transform::write_block(pixels, x0, y0, CHANNEL, &original);
        false
    }
}

impl Default for DwtSvdCodec {
    fn default() -> Self {
        Self::new(&DwtSvdConfig::default())
    }
}

impl Codec for DwtSvdCodec {
    fn terminator(&self) -> &'static [u8] {
        TERMINATOR
    }

    fn capacity_bits(&self, width: u32, height: u32) -> usize {
        transform::block_count(width, height)
    }

    fn embed_bits(
        &self,
        pixels: &mut PixelBuffer,
        bits: &[bool],
        progress: &mut dyn Progress,
    ) -> Result<()> {
        let available_bits = self.capacity_bits(pixels.width(), pixels.height());
        if bits.len() > available_bits {
            return Err(StegoError::CapacityExceeded {
                needed_bits: bits.len(),
                available_bits,
            });
        }

        let origins: Vec<_> = transform::block_origins(pixels.width(), pixels.height())
            .take(bits.len())
            .collect();
        for (index, ((x0, y0), &bit)) in origins.into_iter().zip(bits).enumerate() {
            if !self.embed_block(pixels, x0, y0, bit) {
                warn!(x0, y0, "Block cannot hold a DWT-SVD bit");
                return Err(StegoError::InvalidInput(format!(
                    "Block at ({x0}, {y0}) is too saturated to carry a DWT-SVD bit"
                )));
            }
            progress.advance(index + 1, bits.len());
        }

        debug!(bits = bits.len(), step = self.step, "DWT-SVD payload embedded");
        Ok(())
    }

    fn extract_bytes(
        &self,
        pixels: &PixelBuffer,
        max_scan_bytes: Option<usize>,
        progress: &mut dyn Progress,
    ) -> Option<Vec<u8>> {
        let mut scanner = TerminatorScanner::new(TERMINATOR, max_scan_bytes);
        let total = self.capacity_bits(pixels.width(), pixels.height());

        for (index, (x0, y0)) in transform::block_origins(pixels.width(), pixels.height()).enumerate()
        {
            let bit = self.block_bit(pixels, x0, y0);
            progress.advance(index + 1, total);
            match scanner.push(bit) {
                ScanState::Pending => {}
                ScanState::Found => {
                    debug!(bytes = scanner.bytes_read(), "DWT-SVD terminator found");
                    return Some(scanner.into_message());
                }
                ScanState::Exhausted => return None,
            }
        }
        None
    }
}
