//! Block transforms used by the frequency-domain codecs.
//!
//! - **dct**: 8x8 DCT-II/III in matrix form, shared basis computed once.
//! - **haar**: one-level 2D Haar DWT of an 8x8 block into four 4x4 bands.
//! - **svd**: one-sided Jacobi SVD for 4x4 bands.

pub mod dct;
pub mod haar;
pub mod svd;

use crate::pixels::{Channel, PixelBuffer};
use dct::{Block, N};

/// Top-left corners of every complete 8x8 block, in raster order.
///
/// Partial blocks along the right and bottom edges are skipped.
pub fn block_origins(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let n = N as u32;
    let cols = width / n;
    let rows = height / n;
    (0..rows).flat_map(move |by| (0..cols).map(move |bx| (bx * n, by * n)))
}

/// Number of complete 8x8 blocks.
pub fn block_count(width: u32, height: u32) -> usize {
    (width as usize / N) * (height as usize / N)
}

/// Copy one channel of the block at `(x0, y0)` into a float matrix.
pub fn read_block(pixels: &PixelBuffer, x0: u32, y0: u32, channel: Channel) -> Block {
    let mut block = [[0.0; N]; N];
    for (i, row) in block.iter_mut().enumerate() {
        let src = &pixels.row(y0 + i as u32)[x0 as usize..x0 as usize + N];
        for (value, px) in row.iter_mut().zip(src) {
            *value = px.channel(channel) as f64;
        }
    }
    block
}

/// Round, clamp to `[0, 255]` and store one channel of the block at
/// `(x0, y0)`. Other channels and alpha are untouched.
pub fn write_block(pixels: &mut PixelBuffer, x0: u32, y0: u32, channel: Channel, block: &Block) {
    for (i, row) in block.iter().enumerate() {
        let dst = &mut pixels.row_mut(y0 + i as u32)[x0 as usize..x0 as usize + N];
        for (px, &value) in dst.iter_mut().zip(row) {
            *px.channel_mut(channel) = value.round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::Rgba;

    #[test]
    fn test_block_origins_skip_partial_blocks() {
        let origins: Vec<_> = block_origins(20, 17).collect();
        assert_eq!(origins, vec![(0, 0), (8, 0), (0, 8), (8, 8)]);
        assert_eq!(block_count(20, 17), 4);
        assert_eq!(block_count(7, 100), 0);
    }

    #[test]
    fn test_write_block_clamps_and_preserves_other_channels() {
        let mut pixels = PixelBuffer::new(8, 8, Rgba::new(10, 20, 30, 40));
        let mut block = [[300.0; N]; N];
        block[0][0] = -4.0;
        block[1][1] = 99.6;
        write_block(&mut pixels, 0, 0, Channel::Green, &block);

        assert_eq!(pixels.get(0, 0), Rgba::new(10, 0, 30, 40));
        assert_eq!(pixels.get(1, 1).g, 100);
        assert_eq!(pixels.get(7, 7), Rgba::new(10, 255, 30, 40));
        assert_eq!(read_block(&pixels, 0, 0, Channel::Red), [[10.0; N]; N]);
    }
}
