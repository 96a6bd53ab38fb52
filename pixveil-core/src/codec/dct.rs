//! Frequency-domain embedding in the Green channel.
//!
//! Each payload bit sets the ordering of two mid-frequency DCT coefficients
//! of an 8x8 block: `(2,1) > (1,2)` for a one, the reverse for a zero, with a
//! margin of `alpha` so the ordering survives rounding and mild noise. Every
//! bit is written into `repetition` consecutive blocks and read back by
//! majority vote.

use tracing::debug;

use super::Codec;
use crate::bits::{ScanState, TerminatorScanner};
use crate::config::DctConfig;
use crate::error::{Result, StegoError};
use crate::pixels::{Channel, PixelBuffer};
use crate::progress::Progress;
use crate::transform::{self, dct::Block};

/// End-of-message marker for DCT payloads.
pub const TERMINATOR: &[u8] = b"$!#";

/// Carrier channel.
pub const CHANNEL: Channel = Channel::Green;

/// Coefficient that is larger for a one bit.
const P1: (usize, usize) = (2, 1);
/// Coefficient that is larger for a zero bit.
const P2: (usize, usize) = (1, 2);
/// Bytes decoded without a terminator before a DCT scan gives up.
pub const MAX_SCAN_BYTES: usize = 5000;

/// Extra push beyond `alpha / 2` applied when a pair has to be rewritten.
const NUDGE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DctCodec {
    alpha: f64,
    repetition: usize,
}

impl DctCodec {
    pub fn new(config: &DctConfig) -> Self {
        Self {
            alpha: config.alpha,
            repetition: config.repetition.max(1),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn repetition(&self) -> usize {
        self.repetition
    }

    /// Enforce the coefficient ordering for `bit`. Returns whether the block
    /// had to be changed.
    fn embed_bit(&self, coeffs: &mut Block, bit: bool) -> bool {
        let (hi, lo) = if bit { (P1, P2) } else { (P2, P1) };
        let v_hi = coeffs[hi.0][hi.1];
        let v_lo = coeffs[lo.0][lo.1];
        if v_hi > v_lo + self.alpha {
            return false;
        }

        let avg = (v_hi + v_lo) / 2.0;
        coeffs[hi.0][hi.1] = avg + self.alpha / 2.0 + NUDGE;
        coeffs[lo.0][lo.1] = avg - self.alpha / 2.0 - NUDGE;
        true
    }

    fn read_vote(coeffs: &Block) -> bool {
        coeffs[P1.0][P1.1] > coeffs[P2.0][P2.1]
    }
}

impl Default for DctCodec {
    fn default() -> Self {
        Self::new(&DctConfig::default())
    }
}

impl Codec for DctCodec {
    fn terminator(&self) -> &'static [u8] {
        TERMINATOR
    }

    fn capacity_bits(&self, width: u32, height: u32) -> usize {
        transform::block_count(width, height) / self.repetition
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

        let total = bits.len() * self.repetition;
        let origins: Vec<_> = transform::block_origins(pixels.width(), pixels.height())
            .take(total)
            .collect();
        let mut rewritten = 0usize;

        for (index, (x0, y0)) in origins.into_iter().enumerate() {
            let bit = bits[index / self.repetition];
            let block = transform::read_block(pixels, x0, y0, CHANNEL);
            let mut coeffs = transform::dct::forward(&block);
            if self.embed_bit(&mut coeffs, bit) {
                let restored = transform::dct::inverse(&coeffs);
                transform::write_block(pixels, x0, y0, CHANNEL, &restored);
                rewritten += 1;
            }
            progress.advance(index + 1, total);
        }

        debug!(
            bits = bits.len(),
            blocks = total,
            rewritten,
            "DCT payload embedded"
        );
        Ok(())
    }

    fn default_scan_limit(&self) -> Option<usize> {
        Some(MAX_SCAN_BYTES)
    }

    fn extract_bytes(
        &self,
        pixels: &PixelBuffer,
        max_scan_bytes: Option<usize>,
        progress: &mut dyn Progress,
    ) -> Option<Vec<u8>> {
        let mut scanner = TerminatorScanner::new(TERMINATOR, max_scan_bytes);
        // Partial trailing groups never carry a bit.
        let usable = self.capacity_bits(pixels.width(), pixels.height()) * self.repetition;
        let mut votes = 0usize;

        for (index, (x0, y0)) in transform::block_origins(pixels.width(), pixels.height())
            .take(usable)
            .enumerate()
        {
            let block = transform::read_block(pixels, x0, y0, CHANNEL);
            if Self::read_vote(&transform::dct::forward(&block)) {
                votes += 1;
            }
            progress.advance(index + 1, usable);

            if (index + 1) % self.repetition != 0 {
                continue;
            }
            let bit = votes > self.repetition / 2;
            votes = 0;
            match scanner.push(bit) {
                ScanState::Pending => {}
                ScanState::Found => {
                    debug!(bytes = scanner.bytes_read(), "DCT terminator found");
                    return Some(scanner.into_message());
                }
                ScanState::Exhausted => return None,
            }
        }
        None
    }
}
