//! One-level 2D Haar wavelet transform on 8x8 blocks.
//!
//! Averaging convention: `low = (a + b) / 2`, `high = (a - b) / 2`, so the LL
//! band stays in pixel units and `a = low + high`, `b = low - high` inverts
//! exactly.

use super::dct::{Block, N};

/// Sub-band edge length.
pub const HALF: usize = N / 2;

/// One 4x4 sub-band.
pub type Band = [[f64; HALF]; HALF];

/// The four sub-bands of a one-level decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Subbands {
    /// Low-pass in both directions.
    pub ll: Band,
    /// High-pass horizontally, low-pass vertically.
    pub lh: Band,
    /// Low-pass horizontally, high-pass vertically.
    pub hl: Band,
    pub hh: Band,
}

pub fn forward(block: &Block) -> Subbands {
    // Horizontal pass: left half averages, right half differences.
    let mut rows = [[0.0; N]; N];
    for r in 0..N {
        for c in 0..HALF {
            let a = block[r][2 * c];
            let b = block[r][2 * c + 1];
            rows[r][c] = (a + b) / 2.0;
            rows[r][c + HALF] = (a - b) / 2.0;
        }
    }

    let mut bands = Subbands {
        ll: [[0.0; HALF]; HALF],
        lh: [[0.0; HALF]; HALF],
        hl: [[0.0; HALF]; HALF],
        hh: [[0.0; HALF]; HALF],
    };
    for c in 0..N {
        for r in 0..HALF {
            let a = rows[2 * r][c];
            let b = rows[2 * r + 1][c];
            let avg = (a + b) / 2.0;
            let diff = (a - b) / 2.0;
            if c < HALF {
                bands.ll[r][c] = avg;
                bands.hl[r][c] = diff;
            } else {
                bands.lh[r][c - HALF] = avg;
                bands.hh[r][c - HALF] = diff;
            }
        }
    }
    bands
}

pub fn inverse(bands: &Subbands) -> Block {
    let mut rows = [[0.0; N]; N];
    for c in 0..N {
        for r in 0..HALF {
            let (low, high) = if c < HALF {
                (bands.ll[r][c], bands.hl[r][c])
            } else {
                (bands.lh[r][c - HALF], bands.hh[r][c - HALF])
            };
            rows[2 * r][c] = low + high;
            rows[2 * r + 1][c] = low - high;
        }
    }

    let mut block = [[0.0; N]; N];
    for r in 0..N {
        for c in 0..HALF {
            block[r][2 * c] = rows[r][c] + rows[r][c + HALF];
            block[r][2 * c + 1] = rows[r][c] - rows[r][c + HALF];
        }
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_is_exact() {
        let mut block = [[0.0; N]; N];
        for (i, row) in block.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = ((i * 13 + j * 7) % 200) as f64;
            }
        }
        let restored = inverse(&forward(&block));
        for i in 0..N {
            for j in 0..N {
                assert!((restored[i][j] - block[i][j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_ll_is_local_mean() {
        let block = [[100.0; N]; N];
        let bands = forward(&block);
        assert_eq!(bands.ll, [[100.0; HALF]; HALF]);
        assert_eq!(bands.hh, [[0.0; HALF]; HALF]);
    }
}
