//! 8x8 DCT-II / DCT-III in matrix form.
//!
//! With the orthonormal cosine basis `T`, the 2D transform of a block `B` is
//! `T · B · Tᵗ` and the inverse is `Tᵗ · C · T`. Two 8x8 matrix products
//! replace the O(N⁴) direct summation.

use std::f64::consts::PI;
use std::sync::LazyLock;

/// Block edge length.
pub const N: usize = 8;

/// One 8x8 block of samples or coefficients, indexed `[row][col]`.
pub type Block = [[f64; N]; N];

/// `T[i][j] = c(i) · cos((2j + 1) · i · π / 16)`.
static BASIS: LazyLock<Block> = LazyLock::new(|| {
    let mut t = [[0.0; N]; N];
    for (i, row) in t.iter_mut().enumerate() {
        let c = scale(i);
        for (j, value) in row.iter_mut().enumerate() {
            *value = c * (((2 * j + 1) * i) as f64 * PI / (2 * N) as f64).cos();
        }
    }
    t
});

static BASIS_T: LazyLock<Block> = LazyLock::new(|| transpose(&BASIS));

#[inline]
fn scale(i: usize) -> f64 {
    if i == 0 {
        (1.0 / N as f64).sqrt()
    } else {
        (2.0 / N as f64).sqrt()
    }
}

/// The cosine basis matrix `T`.
pub fn basis() -> &'static Block {
    &BASIS
}

/// `a · b`
#[inline]
pub fn multiply(a: &Block, b: &Block) -> Block {
    let mut c = [[0.0; N]; N];
    for i in 0..N {
        for j in 0..N {
            let mut sum = 0.0;
            for k in 0..N {
                sum += a[i][k] * b[k][j];
            }
            c[i][j] = sum;
        }
    }
    c
}

pub fn transpose(m: &Block) -> Block {
    let mut t = [[0.0; N]; N];
    for i in 0..N {
        for j in 0..N {
            t[j][i] = m[i][j];
        }
    }
    t
}

/// Forward 2D DCT: `T · block · Tᵗ`.
pub fn forward(block: &Block) -> Block {
    multiply(&multiply(&BASIS, block), &BASIS_T)
}

/// Inverse 2D DCT: `Tᵗ · coeffs · T`.
pub fn inverse(coeffs: &Block) -> Block {
    multiply(&multiply(&BASIS_T, coeffs), &BASIS)
}

/// Reference 2D DCT-II by direct summation.
///
/// `F(u,v) = c(u) c(v) Σx Σy f(x,y) cos((2x+1)uπ/16) cos((2y+1)vπ/16)`.
/// Slow; kept as the definition the matrix form is checked against.
pub fn forward_direct(block: &Block) -> Block {
    let mut out = [[0.0; N]; N];
    for u in 0..N {
        for v in 0..N {
            let mut sum = 0.0;
            for x in 0..N {
                for y in 0..N {
                    sum += block[x][y]
                        * (((2 * x + 1) * u) as f64 * PI / 16.0).cos()
                        * (((2 * y + 1) * v) as f64 * PI / 16.0).cos();
                }
            }
            out[u][v] = scale(u) * scale(v) * sum;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sample_block() -> Block {
        let mut b = [[0.0; N]; N];
        for (i, row) in b.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = ((i * 31 + j * 17) % 256) as f64;
            }
        }
        b
    }

    fn max_abs_diff(a: &Block, b: &Block) -> f64 {
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_basis_is_orthogonal() {
        let identity = multiply(basis(), &transpose(basis()));
        for (i, row) in identity.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((v - expected).abs() < EPS, "T·Tᵗ[{i}][{j}] = {v}");
            }
        }
    }

    #[test]
    fn test_basis_entries() {
        let t = basis();
        assert!((t[0][0] - 1.0 / 8f64.sqrt()).abs() < EPS);
        assert!((t[1][0] - 0.5 * (PI / 16.0).cos()).abs() < EPS);
    }

    #[test]
    fn test_matrix_form_matches_direct_summation() {
        let block = sample_block();
        let fast = forward(&block);
        let slow = forward_direct(&block);
        assert!(max_abs_diff(&fast, &slow) < 1e-8);
    }

    #[test]
    fn test_inverse_recovers_block() {
        let block = sample_block();
        let restored = inverse(&forward(&block));
        assert!(max_abs_diff(&block, &restored) < 1e-9);
    }

    #[test]
    fn test_flat_block_has_only_dc() {
        let block = [[128.0; N]; N];
        let coeffs = forward(&block);
        assert!((coeffs[0][0] - 1024.0).abs() < 1e-9);
        for (u, row) in coeffs.iter().enumerate() {
            for (v, &c) in row.iter().enumerate() {
                if (u, v) != (0, 0) {
                    assert!(c.abs() < 1e-9);
                }
            }
        }
    }
}
