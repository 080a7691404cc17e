//! Eigen analysis of a lumped-mass shear chain
//!
//! The standard problem is `A u = λ u` with `A = M⁻¹K`, which is not
//! symmetric. Because `M` is diagonal and positive, it is solved through the
//! similar symmetric matrix `M^{-1/2} K M^{-1/2}` and the eigenvectors are
//! mapped back with `u = M^{-1/2} y`.

use std::f64::consts::PI;

use nalgebra::SymmetricEigen;

use crate::error::{DynamicsError, DynamicsResult};
use crate::math::{Mat, Vec as DynVec};
use crate::results::{ModalResult, Mode};

/// Components below this are treated as zero when normalising eigenvectors
const NORMALIZE_TOLERANCE: f64 = 1e-10;
/// Generalized masses / reference components below this are treated as zero
const ZERO_TOLERANCE: f64 = 1e-20;

/// Per-call eigen analysis context
#[derive(Debug, Clone)]
pub struct ModalSolver {
    mass: DynVec,
    stiffness: Mat,
}

impl ModalSolver {
    /// Set up the problem for masses `mi` and story stiffnesses `ki`
    ///
    /// `ki[i]` connects story `i` to the story below (or the ground).
    ///
    /// # Errors
    /// `InvalidInput` when the arrays are empty, of different length, contain
    /// non-finite values, or a mass is not strictly positive.
    pub fn new(mi: &[f64], ki: &[f64]) -> DynamicsResult<Self> {
        if mi.is_empty() || mi.len() != ki.len() {
            return Err(DynamicsError::InvalidInput(format!(
                "modal input needs equal non-empty mass/stiffness arrays, got {} and {}",
                mi.len(),
                ki.len()
            )));
        }
        if let Some(i) = mi.iter().position(|m| !m.is_finite() || *m <= 0.0) {
            return Err(DynamicsError::InvalidInput(format!(
                "mass {} must be finite and positive, got {}",
                i + 1,
                mi[i]
            )));
        }
        if let Some(i) = ki.iter().position(|k| !k.is_finite()) {
            return Err(DynamicsError::InvalidInput(format!(
                "stiffness {} is not finite",
                i + 1
            )));
        }

        Ok(Self {
            mass: DynVec::from_column_slice(mi),
            stiffness: chain_stiffness(ki),
        })
    }

    /// Tridiagonal chain stiffness matrix
    pub fn stiffness_matrix(&self) -> &Mat {
        &self.stiffness
    }

    /// Lumped masses
    pub fn mass(&self) -> &DynVec {
        &self.mass
    }

    /// The non-symmetric system matrix `M⁻¹K`
    pub fn system_matrix(&self) -> Mat {
        let mut a = self.stiffness.clone();
        for (i, mut row) in a.row_iter_mut().enumerate() {
            row /= self.mass[i];
        }
        a
    }

    /// Solve for all modes, fundamental first
    pub fn solve(&self) -> ModalResult {
        let n = self.mass.len();
        let inv_sqrt_m: DynVec = self.mass.map(|m| 1.0 / m.sqrt());

        let mut s = self.stiffness.clone();
        for i in 0..n {
            for j in 0..n {
                s[(i, j)] *= inv_sqrt_m[i] * inv_sqrt_m[j];
            }
        }
        let eig = SymmetricEigen::new(s);

        let periods: Vec<f64> = eig
            .eigenvalues
            .iter()
            .map(|&lambda| {
                if lambda > 0.0 {
                    2.0 * PI / lambda.sqrt()
                } else {
                    f64::INFINITY
                }
            })
            .collect();

        // Longest period first
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| periods[b].total_cmp(&periods[a]));

        let total_mass = self.mass.sum();

        let modes = order
            .into_iter()
            .map(|k| {
                let raw: Vec<f64> = (0..n)
                    .map(|i| eig.eigenvectors[(i, k)] * inv_sqrt_m[i])
                    .collect();
                let eigenvector = normalize_by_largest(&raw);

                let mut participation = 0.0;
                let mut generalized_mass = 0.0;
                for (m, u) in self.mass.iter().zip(eigenvector.iter()) {
                    participation += m * u;
                    generalized_mass += m * u * u;
                }
                let coeff = if generalized_mass.abs() < ZERO_TOLERANCE {
                    0.0
                } else {
                    participation / generalized_mass
                };
                let mode_shape: Vec<f64> = eigenvector.iter().map(|u| coeff * u).collect();

                let participation_factor = if eigenvector[0].abs() < ZERO_TOLERANCE {
                    0.0
                } else {
                    mode_shape[0] / eigenvector[0]
                };
                let effective_mass_ratio =
                    generalized_mass * participation_factor.powi(2) / total_mass;

                let period = periods[k];
                let frequency = if period.is_finite() && period > 0.0 {
                    1.0 / period
                } else {
                    0.0
                };

                Mode {
                    eigenvalue: eig.eigenvalues[k],
                    period,
                    frequency,
                    participation_factor,
                    effective_mass_ratio,
                    eigenvector,
                    mode_shape,
                }
            })
            .collect();

        ModalResult { modes }
    }
}

/// `K[i][i] = k[i] + k[i+1]` (top row `k[i]`), `K[i][i+1] = K[i+1][i] = -k[i+1]`
pub fn chain_stiffness(ki: &[f64]) -> Mat {
    let n = ki.len();
    let mut k = Mat::zeros(n, n);
    for i in 0..n {
        if i + 1 < n {
            k[(i, i)] = ki[i] + ki[i + 1];
            k[(i, i + 1)] = -ki[i + 1];
            k[(i + 1, i)] = -ki[i + 1];
        } else {
            k[(i, i)] = ki[i];
        }
    }
    k
}

/// Divide by the signed component of largest magnitude
fn normalize_by_largest(v: &[f64]) -> Vec<f64> {
    let mut max_value = 1.0;
    let mut max_abs = 0.0;
    for &value in v {
        if value.abs() > max_abs {
            max_abs = value.abs();
            max_value = value;
        }
    }
    if max_value.abs() < NORMALIZE_TOLERANCE {
        max_value = 1.0;
    }
    v.iter().map(|x| x / max_value).collect()
}
