//! Deterministic principal-axis projection.
//!
//! Rows are observations. The fit mean-centers the matrix, takes a thin SVD,
//! orders singular values descending and keeps the leading right-singular
//! directions as axes. Each axis is then flipped so that its
//! largest-magnitude coordinate is positive (the first such coordinate wins
//! ties). With that convention identical input always yields identical
//! axes, and the projection never depends on solver sign choices.
//!
//! When fewer directions exist than requested (`min(n, d) < k`) the missing
//! axes are zero and project every row to `0.0`.

use hilbert_core::linalg::{center_rows, ensure_finite_matrix};
use hilbert_core::types::centroid_of;
use hilbert_core::CoreError;
use nalgebra::{DMatrix, DVector, SVD};
use serde::Serialize;
use tracing::trace;

use crate::error::MetricsResult;

/// A fitted principal-axis model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrincipalAxes {
    /// Column means of the fitted data (length `d`).
    pub mean: DVector<f64>,
    /// Axes as rows (`k × d`).
    pub components: DMatrix<f64>,
    /// Singular value of each axis, descending.
    pub singular_values: DVector<f64>,
    /// Variance captured per axis: `s² / max(n - 1, 1)`.
    pub explained_variance: DVector<f64>,
    /// Share of total variance per axis; zeros when the data has no variance.
    pub explained_variance_ratio: DVector<f64>,
}

impl PrincipalAxes {
    /// Fit `n_components` axes to the rows of `matrix`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidParameter`] if `n_components == 0`
    /// - [`CoreError::EmptyInput`] / [`CoreError::NonFiniteValue`] for bad input
    /// - [`CoreError::NumericalFailure`] if the SVD does not converge
    pub fn fit(matrix: &DMatrix<f64>, n_components: usize) -> MetricsResult<Self> {
        Ok(Self::fit_centered(matrix, n_components)?.0)
    }

    /// Fit and return the projection of the fitted rows (`n × k`).
    pub fn fit_transform(
        matrix: &DMatrix<f64>,
        n_components: usize,
    ) -> MetricsResult<(Self, DMatrix<f64>)> {
        let (axes, centered) = Self::fit_centered(matrix, n_components)?;
        let projected = centered * axes.components.transpose();
        Ok((axes, projected))
    }

    /// Project rows of `matrix` onto the fitted axes.
    ///
    /// # Errors
    ///
    /// [`CoreError::DimensionMismatch`] if `matrix` does not have exactly the
    /// fitted number of columns. Truncating wider inputs is the caller's job.
    pub fn transform(&self, matrix: &DMatrix<f64>) -> MetricsResult<DMatrix<f64>> {
        ensure_finite_matrix(matrix, "projection input")?;
        if matrix.ncols() != self.input_dim() {
            return Err(CoreError::DimensionMismatch {
                expected: self.input_dim(),
                actual: matrix.ncols(),
            }
            .into());
        }
        let mut centered = matrix.clone();
        let mean_row = self.mean.transpose();
        for mut row in centered.row_iter_mut() {
            row -= &mean_row;
        }
        Ok(centered * self.components.transpose())
    }

    /// Number of fitted axes.
    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }

    /// Dimension of the fitted input space.
    pub fn input_dim(&self) -> usize {
        self.components.ncols()
    }

    fn fit_centered(
        matrix: &DMatrix<f64>,
        n_components: usize,
    ) -> MetricsResult<(Self, DMatrix<f64>)> {
        if n_components == 0 {
            return Err(CoreError::invalid_param("n_components", 0, "must be >= 1").into());
        }
        ensure_finite_matrix(matrix, "projection input")?;

        let (n, d) = matrix.shape();
        let mean = centroid_of(matrix);
        let centered = center_rows(matrix);

        let svd = SVD::try_new(centered.clone(), false, true, f64::EPSILON, 0)
            .ok_or_else(|| CoreError::numerical("principal axes", "SVD did not converge"))?;
        let v_t = svd
            .v_t
            .ok_or_else(|| CoreError::numerical("principal axes", "right singular vectors missing"))?;

        let available = svd.singular_values.len();
        let mut order: Vec<usize> = (0..available).collect();
        order.sort_by(|&a, &b| svd.singular_values[b].total_cmp(&svd.singular_values[a]));

        let mut components = DMatrix::zeros(n_components, d);
        let mut singular_values = DVector::zeros(n_components);
        for (k, &src) in order.iter().take(n_components).enumerate() {
            let mut axis = v_t.row(src).into_owned();
            if needs_flip(axis.iter()) {
                axis.neg_mut();
            }
            components.set_row(k, &axis);
            singular_values[k] = svd.singular_values[src];
        }
        if available < n_components {
            trace!(
                requested = n_components,
                available,
                "Projection padded with zero axes"
            );
        }

        let dof = n.saturating_sub(1).max(1) as f64;
        let explained_variance = singular_values.map(|s| s * s / dof);
        let total_variance: f64 = svd.singular_values.iter().map(|s| s * s / dof).sum();
        let explained_variance_ratio = if total_variance > 0.0 {
            &explained_variance / total_variance
        } else {
            DVector::zeros(n_components)
        };

        Ok((
            Self {
                mean,
                components,
                singular_values,
                explained_variance,
                explained_variance_ratio,
            },
            centered,
        ))
    }
}

/// Deterministic `k`-component projection of the rows of `matrix` (`n × k`).
pub fn principal_projection(
    matrix: &DMatrix<f64>,
    n_components: usize,
) -> MetricsResult<DMatrix<f64>> {
    Ok(PrincipalAxes::fit_transform(matrix, n_components)?.1)
}

/// True when the first largest-magnitude coordinate is negative.
fn needs_flip<'a>(coords: impl Iterator<Item = &'a f64>) -> bool {
    let mut best = 0.0_f64;
    let mut sign_negative = false;
    for &x in coords {
        if x.abs() > best {
            best = x.abs();
            sign_negative = x < 0.0;
        }
    }
    sign_negative
}
