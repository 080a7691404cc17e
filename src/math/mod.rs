//! Dense matrix utilities for the lumped-mass equations of motion
//!
//! Storage and arithmetic (add, sub, scale, dot, matrix-vector products) go
//! through nalgebra's dynamic types. What lives here is the small amount of
//! numerics nalgebra does not give us in the exact form the engine needs:
//! a Gauss-Jordan inverse with a fixed pivot tolerance, and a few structural
//! checks used by the assembly tests.

pub mod fft;

use nalgebra::{DMatrix, DVector};

use crate::error::{DynamicsError, DynamicsResult};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// Pivots smaller than this abort the inversion
pub const PIVOT_TOLERANCE: f64 = 1e-20;

/// Row factors below this are skipped during elimination
const ELIMINATION_SKIP: f64 = 1e-30;

/// Zero vector of length `n`
pub fn zeros_vec(n: usize) -> Vec {
    Vec::zeros(n)
}

/// Zero square matrix of order `n`
pub fn zeros_mat(n: usize) -> Mat {
    Mat::zeros(n, n)
}

/// Influence vector: 1.0 at every DOF
pub fn unit_vec(n: usize) -> Vec {
    Vec::from_element(n, 1.0)
}

/// Invert a square matrix by Gauss-Jordan elimination with partial pivoting
///
/// Works on an augmented `[A | I]` copy; the input is never modified.
///
/// # Errors
/// * `InvalidInput` if the matrix is not square
/// * `SingularMatrix` if the largest pivot candidate in a column is below
///   [`PIVOT_TOLERANCE`]
pub fn inverse(a: &Mat) -> DynamicsResult<Mat> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(DynamicsError::InvalidInput(format!(
            "cannot invert a {}x{} matrix",
            a.nrows(),
            a.ncols()
        )));
    }

    let mut aug = Mat::zeros(n, 2 * n);
    aug.view_mut((0, 0), (n, n)).copy_from(a);
    for i in 0..n {
        aug[(i, n + i)] = 1.0;
    }

    for col in 0..n {
        // Partial pivoting: pick the largest magnitude at or below the diagonal
        let mut pivot = col;
        let mut max_abs = aug[(col, col)].abs();
        for row in (col + 1)..n {
            let value = aug[(row, col)].abs();
            if value > max_abs {
                max_abs = value;
                pivot = row;
            }
        }

        if max_abs < PIVOT_TOLERANCE {
            return Err(DynamicsError::SingularMatrix);
        }

        if pivot != col {
            aug.swap_rows(col, pivot);
        }

        let pivot_value = aug[(col, col)];
        for j in 0..2 * n {
            aug[(col, j)] /= pivot_value;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = aug[(row, col)];
            if factor.abs() < ELIMINATION_SKIP {
                continue;
            }
            for j in 0..2 * n {
                let delta = factor * aug[(col, j)];
                aug[(row, j)] -= delta;
            }
        }
    }

    Ok(aug.columns(n, n).into_owned())
}

/// Check symmetry to a relative tolerance
pub fn is_symmetric(m: &Mat, tol: f64) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }
    let scale = max_abs(m).max(1.0);
    for i in 0..m.nrows() {
        for j in (i + 1)..m.ncols() {
            if (m[(i, j)] - m[(j, i)]).abs() > tol * scale {
                return false;
            }
        }
    }
    true
}

/// True when every off-diagonal entry is exactly zero
pub fn is_diagonal(m: &Mat) -> bool {
    m.nrows() == m.ncols()
        && (0..m.nrows()).all(|i| (0..m.ncols()).all(|j| i == j || m[(i, j)] == 0.0))
}

/// Largest absolute entry
pub fn max_abs(m: &Mat) -> f64 {
    m.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inverse_identity() {
        let eye = Mat::identity(4, 4);
        let inv = inverse(&eye).unwrap();
        assert_relative_eq!(inv, eye, epsilon = 1e-14);
    }

    #[test]
    fn test_inverse_needs_pivoting() {
        // Zero on the leading diagonal forces a row swap
        let a = Mat::from_row_slice(3, 3, &[
            0.0, 2.0, 1.0,
            1.0, 1.0, 0.0,
            3.0, 0.0, 1.0,
        ]);
        let inv = inverse(&a).unwrap();
        let product = &a * &inv;
        assert_relative_eq!(product, Mat::identity(3, 3), epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_tridiagonal_stiffness() {
        let k = Mat::from_row_slice(3, 3, &[
            2300.0, -1100.0, 0.0,
            -1100.0, 2000.0, -900.0,
            0.0, -900.0, 900.0,
        ]);
        let inv = inverse(&k).unwrap();
        assert_relative_eq!(&k * &inv, Mat::identity(3, 3), epsilon = 1e-10);
        assert!(is_symmetric(&inv, 1e-12));
    }

    #[test]
    fn test_inverse_does_not_modify_input() {
        let a = Mat::from_row_slice(2, 2, &[4.0, 1.0, 2.0, 3.0]);
        let copy = a.clone();
        let _ = inverse(&a).unwrap();
        assert_eq!(a, copy);
    }

    #[test]
    fn test_inverse_singular() {
        let a = Mat::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert!(matches!(inverse(&a), Err(DynamicsError::SingularMatrix)));

        let zero = zeros_mat(3);
        assert!(matches!(inverse(&zero), Err(DynamicsError::SingularMatrix)));
    }

    #[test]
    fn test_inverse_rejects_non_square() {
        let a = Mat::zeros(2, 3);
        assert!(matches!(inverse(&a), Err(DynamicsError::InvalidInput(_))));
    }

    #[test]
    fn test_structure_checks() {
        let d = Mat::from_diagonal(&Vec::from_vec(vec![1.0, 2.0]));
        assert!(is_diagonal(&d));
        assert!(is_symmetric(&d, 1e-12));

        let s = Mat::from_row_slice(2, 2, &[1.0, -3.0, -3.0, 5.0]);
        assert!(!is_diagonal(&s));
        assert!(is_symmetric(&s, 1e-12));
        assert_eq!(max_abs(&s), 5.0);

        let u = Mat::from_row_slice(2, 2, &[1.0, 2.0, 0.0, 1.0]);
        assert!(!is_symmetric(&u, 1e-12));
        assert_eq!(unit_vec(3).sum(), 3.0);
        assert_eq!(zeros_vec(4).len(), 4);
    }
}
