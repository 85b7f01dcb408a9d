//! Field coherence: mean cosine similarity of rows to their centroid.

use hilbert_core::config::DEFAULT_NORM_FLOOR;
use hilbert_core::linalg::ensure_finite_matrix;
use hilbert_core::types::centroid_of;
use hilbert_core::CoreError;
use nalgebra::DMatrix;

use crate::error::MetricsResult;

/// Coherence with the default norm floor of `1e-12`.
pub fn field_coherence(matrix: &DMatrix<f64>) -> MetricsResult<f64> {
    field_coherence_with_floor(matrix, DEFAULT_NORM_FLOOR)
}

/// Mean over rows of `dot(row, c) / (max(|row|, floor) · max(|c|, floor))`
/// where `c` is the centroid.
///
/// Zero rows and a zero centroid are handled by the clamp and contribute a
/// cosine of zero. The result lies in `[-1, 1]`.
///
/// # Errors
///
/// - [`CoreError::EmptyInput`] for a matrix without rows or columns
/// - [`CoreError::NonFiniteValue`] for NaN or infinite entries
/// - [`CoreError::InvalidParameter`] if `floor` is not finite and positive
pub fn field_coherence_with_floor(matrix: &DMatrix<f64>, floor: f64) -> MetricsResult<f64> {
    if !(floor.is_finite() && floor > 0.0) {
        return Err(CoreError::invalid_param("norm_floor", floor, "must be finite and > 0").into());
    }
    ensure_finite_matrix(matrix, "coherence input")?;

    let n = matrix.nrows();
    let centroid = centroid_of(matrix);
    let c_norm = centroid.norm().max(floor);

    let sum: f64 = matrix
        .row_iter()
        .map(|row| {
            let r_norm = row.norm().max(floor);
            (row.transpose().dot(&centroid) / (r_norm * c_norm)).clamp(-1.0, 1.0)
        })
        .sum();
    Ok((sum / n as f64).clamp(-1.0, 1.0))
}
