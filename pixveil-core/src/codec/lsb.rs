//! Least-significant-bit embedding.
//!
//! Pixels are visited in raster order and each pixel carries three payload
//! bits, one in the LSB of R, G and B (in that order). Alpha is never
//! touched. Bits are written MSB first per byte.

use tracing::{debug, trace};

use super::Codec;
use crate::bits::{ScanState, TerminatorScanner};
use crate::error::{Result, StegoError};
use crate::pixels::{Channel, PixelBuffer};
use crate::progress::Progress;

/// End-of-message marker for LSB payloads.
pub const TERMINATOR: &[u8] = b"$!@#END";

/// Bits carried by each pixel.
pub const BITS_PER_PIXEL: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct LsbCodec;

impl Codec for LsbCodec {
    fn terminator(&self) -> &'static [u8] {
        TERMINATOR
    }

    fn capacity_bits(&self, width: u32, height: u32) -> usize {
        width as usize * height as usize * BITS_PER_PIXEL
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

        let rows = pixels.height() as usize;
        let mut remaining = bits.iter().copied();
        'rows: for y in 0..pixels.height() {
            for px in pixels.row_mut(y) {
                for channel in Channel::RGB {
                    let Some(bit) = remaining.next() else {
                        break 'rows;
                    };
                    let value = px.channel_mut(channel);
                    *value = (*value & 0xFE) | bit as u8;
                }
            }
            progress.advance(y as usize + 1, rows);
        }
        progress.advance(rows, rows);

        debug!(bits = bits.len(), "LSB payload embedded");
        Ok(())
    }

    fn extract_bytes(
        &self,
        pixels: &PixelBuffer,
        max_scan_bytes: Option<usize>,
        progress: &mut dyn Progress,
    ) -> Option<Vec<u8>> {
        let mut scanner = TerminatorScanner::new(TERMINATOR, max_scan_bytes);
        let rows = pixels.height() as usize;

        for y in 0..pixels.height() {
            for px in pixels.row(y) {
                for channel in Channel::RGB {
                    match scanner.push(px.channel(channel) & 1 == 1) {
                        ScanState::Pending => {}
                        ScanState::Found => {
                            progress.advance(rows, rows);
                            debug!(bytes = scanner.bytes_read(), "LSB terminator found");
                            return Some(scanner.into_message());
                        }
                        ScanState::Exhausted => {
                            trace!(bytes = scanner.bytes_read(), "LSB scan limit reached");
                            progress.advance(rows, rows);
                            return None;
                        }
                    }
                }
            }
            progress.advance(y as usize + 1, rows);
        }

        trace!(bytes = scanner.bytes_read(), "LSB scan found no terminator");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::Rgba;
    use crate::progress::NoProgress;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            Rgba::new((x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8, 200)
        })
    }

    #[test]
    fn test_roundtrip() {
        let cover = gradient(32, 32);
        let stego = LsbCodec.encode(&cover, "HELLO", &mut NoProgress).unwrap();
        assert_eq!(LsbCodec.decode(&stego, None, &mut NoProgress).unwrap(), "HELLO");
    }

    #[test]
    fn test_first_pixel_carries_msb_first() {
        let cover = PixelBuffer::new(40, 1, Rgba::new(0, 0, 0, 255));
        let stego = LsbCodec.encode(&cover, "A", &mut NoProgress).unwrap();
        // 'A' = 0b0100_0001 -> R=0 G=1 B=0 | R=0 G=0 B=0 | R=0 G=1
        assert_eq!(stego.get(0, 0), Rgba::new(0, 1, 0, 255));
        assert_eq!(stego.get(1, 0), Rgba::new(0, 0, 0, 255));
        assert_eq!((stego.get(2, 0).r, stego.get(2, 0).g), (0, 1));
    }

    #[test]
    fn test_only_lsbs_change_and_alpha_is_preserved() {
        let cover = gradient(16, 16);
        let stego = LsbCodec.encode(&cover, "payload", &mut NoProgress).unwrap();
        for (a, b) in cover.pixels().iter().zip(stego.pixels()) {
            assert_eq!(a.r >> 1, b.r >> 1);
            assert_eq!(a.g >> 1, b.g >> 1);
            assert_eq!(a.b >> 1, b.b >> 1);
            assert_eq!(a.a, b.a);
        }
    }

    #[test]
    fn test_capacity_boundary() {
        // 10x10 -> 300 bits -> 37 bytes -> 30 chars
        let cover = gradient(10, 10);
        let capacity = LsbCodec.capacity(10, 10);
        assert_eq!(capacity, 30);

        let exact = "x".repeat(capacity);
        let stego = LsbCodec.encode(&cover, &exact, &mut NoProgress).unwrap();
        assert_eq!(LsbCodec.decode(&stego, None, &mut NoProgress).unwrap(), exact);

        let too_long = "x".repeat(capacity + 1);
        let err = LsbCodec.encode(&cover, &too_long, &mut NoProgress).unwrap_err();
        assert!(matches!(err, StegoError::CapacityExceeded { .. }));
    }

    #[test]
    fn test_capacity_error_leaves_input_untouched() {
        let mut cover = gradient(4, 4);
        let before = cover.clone();
        let bits = vec![true; 49];
        assert!(LsbCodec.embed_bits(&mut cover, &bits, &mut NoProgress).is_err());
        assert_eq!(cover, before);
    }

    #[test]
    fn test_clean_image_has_no_message() {
        let cover = PixelBuffer::new(64, 64, Rgba::opaque(200, 100, 50));
        assert_eq!(
            LsbCodec.decode(&cover, None, &mut NoProgress),
            Err(StegoError::NotFound)
        );
    }

    #[test]
    fn test_scan_limit() {
        let cover = gradient(64, 64);
        let message = "m".repeat(200);
        let stego = LsbCodec.encode(&cover, &message, &mut NoProgress).unwrap();
        assert_eq!(
            LsbCodec.decode(&stego, Some(100), &mut NoProgress),
            Err(StegoError::NotFound)
        );
        assert_eq!(LsbCodec.decode(&stego, Some(500), &mut NoProgress).unwrap(), message);
    }

    #[test]
    fn test_unicode_message() {
        let cover = gradient(32, 32);
        let message = "ステガノ 🔒 ok";
        let stego = LsbCodec.encode(&cover, message, &mut NoProgress).unwrap();
        assert_eq!(LsbCodec.decode(&stego, None, &mut NoProgress).unwrap(), message);
    }

    #[test]
    fn test_progress_reaches_total() {
        let cover = gradient(8, 8);
        let mut last = (0, 0);
        let mut observer = |done: usize, total: usize| last = (done, total);
        LsbCodec.encode(&cover, "hi", &mut observer).unwrap();
        assert_eq!(last, (8, 8));
    }
}
