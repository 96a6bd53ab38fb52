//! Singular value decomposition of 4x4 sub-bands.
//!
//! One-sided Jacobi: columns of a working copy of `A` are rotated pairwise
//! until mutually orthogonal, accumulating the rotations into `V`. The column
//! norms are then the singular values and the normalized columns form `U`,
//! so `A = U · diag(S) · Vᵗ`.

use super::haar::{Band, HALF};

const MAX_SWEEPS: usize = 30;
/// Relative orthogonality at which a column pair counts as converged.
const EPS: f64 = 1e-12;
/// Singular values below this are treated as zero when normalizing `U`.
const TINY: f64 = 1e-12;

/// `A = U · diag(s) · Vᵗ` with `s` sorted in descending order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Svd {
    /// Left singular vectors, one per column.
    pub u: Band,
    pub s: [f64; HALF],
    /// Right singular vectors, one per column.
    pub v: Band,
}

fn identity() -> Band {
    let mut m = [[0.0; HALF]; HALF];
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    m
}

fn column_dot(m: &Band, p: usize, q: usize) -> f64 {
    (0..HALF).map(|i| m[i][p] * m[i][q]).sum()
}

fn rotate_columns(m: &mut Band, p: usize, q: usize, c: f64, s: f64) {
    for row in m.iter_mut() {
        let mp = row[p];
        let mq = row[q];
        row[p] = c * mp - s * mq;
        row[q] = s * mp + c * mq;
    }
}

pub fn decompose(a: &Band) -> Svd {
    let mut w = *a;
    let mut v = identity();

    for _ in 0..MAX_SWEEPS {
        let mut rotated = false;
        for p in 0..HALF - 1 {
            for q in p + 1..HALF {
                let alpha = column_dot(&w, p, p);
                let beta = column_dot(&w, q, q);
                let gamma = column_dot(&w, p, q);
                if gamma.abs() <= EPS * (alpha * beta).sqrt() || gamma == 0.0 {
                    continue;
                }
                rotated = true;

                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = c * t;
                rotate_columns(&mut w, p, q, c, s);
                rotate_columns(&mut v, p, q, c, s);
            }
        }
        if !rotated {
            break;
        }
    }

    let norms: [f64; HALF] = std::array::from_fn(|j| column_dot(&w, j, j).sqrt());
    let mut order: [usize; HALF] = std::array::from_fn(|j| j);
    order.sort_by(|&x, &y| norms[y].total_cmp(&norms[x]));

    let mut svd = Svd {
        u: [[0.0; HALF]; HALF],
        s: [0.0; HALF],
        v: [[0.0; HALF]; HALF],
    };
    let mut degenerate = Vec::new();
    for (k, &j) in order.iter().enumerate() {
        svd.s[k] = norms[j];
        for i in 0..HALF {
            svd.v[i][k] = v[i][j];
        }
        if norms[j] > TINY {
            for i in 0..HALF {
                svd.u[i][k] = w[i][j] / norms[j];
            }
        } else {
            degenerate.push(k);
        }
    }
    complete_basis(&mut svd.u, &degenerate);
    svd
}

/// Fill the listed columns of `u` with unit vectors orthogonal to all other
/// columns (Gram-Schmidt over the standard basis).
fn complete_basis(u: &mut Band, columns: &[usize]) {
    for &k in columns {
        for e in 0..HALF {
            let mut candidate = [0.0; HALF];
            candidate[e] = 1.0;
            for other in 0..HALF {
                if other == k {
                    continue;
                }
                let dot: f64 = (0..HALF).map(|i| candidate[i] * u[i][other]).sum();
                for (i, c) in candidate.iter_mut().enumerate() {
                    *c -= dot * u[i][other];
                }
            }
            let norm = candidate.iter().map(|c| c * c).sum::<f64>().sqrt();
            if norm > 0.5 {
                for (i, c) in candidate.iter().enumerate() {
                    u[i][k] = c / norm;
                }
                break;
            }
        }
    }
}

impl Svd {
    /// `U · diag(s) · Vᵗ`
    pub fn reconstruct(&self) -> Band {
        let mut out = [[0.0; HALF]; HALF];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (0..HALF)
                    .map(|k| self.u[i][k] * self.s[k] * self.v[j][k])
                    .sum();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Band, b: &Band, tol: f64) {
        for i in 0..HALF {
            for j in 0..HALF {
                assert!(
                    (a[i][j] - b[i][j]).abs() < tol,
                    "[{i}][{j}]: {} vs {}",
                    a[i][j],
                    b[i][j]
                );
            }
        }
    }

    fn assert_orthonormal_columns(m: &Band) {
        for p in 0..HALF {
            for q in 0..HALF {
                let expected = if p == q { 1.0 } else { 0.0 };
                assert!((column_dot(m, p, q) - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_reconstructs_general_matrix() {
        let a = [
            [120.0, 130.5, 90.0, 60.0],
            [110.0, 140.0, 95.5, 70.0],
            [80.0, 100.0, 150.0, 30.0],
            [20.0, 45.0, 60.0, 200.0],
        ];
        let svd = decompose(&a);
        assert_close(&svd.reconstruct(), &a, 1e-9);
        assert_orthonormal_columns(&svd.u);
        assert_orthonormal_columns(&svd.v);
        assert!(svd.s.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_diagonal_matrix() {
        let a = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 4.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 0.0],
            [0.0, 0.0, 0.0, 3.0],
        ];
        let svd = decompose(&a);
        assert_eq!(svd.s, [4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_flat_band_is_rank_one() {
        let a = [[128.0; HALF]; HALF];
        let svd = decompose(&a);
        assert!((svd.s[0] - 512.0).abs() < 1e-9);
        assert!(svd.s[1..].iter().all(|&s| s.abs() < 1e-9));
        assert_orthonormal_columns(&svd.u);
        assert_close(&svd.reconstruct(), &a, 1e-9);
    }

    #[test]
    fn test_modifying_largest_singular_value() {
        let a = [[100.0; HALF]; HALF];
        let mut svd = decompose(&a);
        svd.s[0] = 410.0;
        let again = decompose(&svd.reconstruct());
        assert!((again.s[0] - 410.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_matrix() {
        let svd = decompose(&[[0.0; HALF]; HALF]);
        assert_eq!(svd.s, [0.0; HALF]);
        assert_orthonormal_columns(&svd.u);
    }
}
