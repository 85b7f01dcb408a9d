//! Linear and spectral operators.
//!
//! Low-level, interpretation-free linear algebra shared by the structure
//! builder and the metrics crate. Every function is pure and returns a new
//! value; inputs are never mutated.

use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::error::{CoreError, CoreResult};

/// Reject matrices with no rows, no columns, or any non-finite entry.
///
/// Positions in [`CoreError::NonFiniteValue`] are row-major flat offsets so
/// they read the same way the rows were supplied.
pub fn ensure_finite_matrix(matrix: &DMatrix<f64>, context: &str) -> CoreResult<()> {
    if matrix.nrows() == 0 {
        return Err(CoreError::empty(format!("{context} rows")));
    }
    if matrix.ncols() == 0 {
        return Err(CoreError::empty(format!("{context} columns")));
    }
    let ncols = matrix.ncols();
    for (i, row) in matrix.row_iter().enumerate() {
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(CoreError::non_finite(context, i * ncols + j));
        }
    }
    Ok(())
}

/// Euclidean norm of a vector.
#[inline]
pub fn l2_norm(v: &DVector<f64>) -> f64 {
    v.norm()
}

/// L2-normalize a vector.
///
/// # Errors
///
/// [`CoreError::InvalidParameter`] for a zero vector, which has no direction.
pub fn normalize(v: &DVector<f64>) -> CoreResult<DVector<f64>> {
    let n = v.norm();
    if n <= 0.0 {
        return Err(CoreError::invalid_param(
            "v",
            "zero vector",
            "cannot normalize a vector with zero norm",
        ));
    }
    Ok(v / n)
}

/// Cosine similarity between two vectors of equal length.
///
/// # Errors
///
/// - [`CoreError::DimensionMismatch`] if lengths differ
/// - [`CoreError::InvalidParameter`] if either vector has zero norm
pub fn cosine_similarity(a: &DVector<f64>, b: &DVector<f64>) -> CoreResult<f64> {
    if a.len() != b.len() {
        return Err(CoreError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let (na, nb) = (a.norm(), b.norm());
    if na <= 0.0 || nb <= 0.0 {
        return Err(CoreError::invalid_param(
            "a, b",
            format!("norms ({na}, {nb})"),
            "vectors must have non-zero norm",
        ));
    }
    Ok(a.dot(b) / (na * nb))
}

/// Gram matrix `X Xᵀ` of pairwise row inner products.
pub fn gram_matrix(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    matrix * matrix.transpose()
}

/// Population covariance of the rows (observations) of `matrix`.
///
/// Divides by `n`, not `n - 1`.
pub fn covariance_matrix(matrix: &DMatrix<f64>) -> CoreResult<DMatrix<f64>> {
    let n = matrix.nrows();
    if n == 0 {
        return Err(CoreError::empty("covariance rows"));
    }
    let centered = center_rows(matrix);
    Ok(centered.transpose() * &centered / n as f64)
}

/// Subtract the column means from every row.
pub fn center_rows(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    let n = matrix.nrows().max(1) as f64;
    let mean = matrix.row_sum() / n;
    let mut centered = matrix.clone();
    for mut row in centered.row_iter_mut() {
        row -= &mean;
    }
    centered
}

/// Eigen-decomposition of a symmetric matrix.
///
/// Returns `(eigenvalues, eigenvectors)` sorted by descending eigenvalue;
/// column `k` of the eigenvector matrix pairs with eigenvalue `k`. Ties keep
/// the solver's order.
pub fn spectrum(matrix: &DMatrix<f64>) -> CoreResult<(DVector<f64>, DMatrix<f64>)> {
    if matrix.nrows() != matrix.ncols() {
        return Err(CoreError::ShapeMismatch(format!(
            "spectrum requires a square matrix, got {}x{}",
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    ensure_finite_matrix(matrix, "spectrum input")?;

    let eigen = SymmetricEigen::try_new(matrix.clone(), f64::EPSILON, 0)
        .ok_or_else(|| CoreError::numerical("spectrum", "symmetric eigensolver did not converge"))?;

    let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let values = DVector::from_iterator(order.len(), order.iter().map(|&k| eigen.eigenvalues[k]));
    let vectors = DMatrix::from_fn(matrix.nrows(), order.len(), |i, k| {
        eigen.eigenvectors[(i, order[k])]
    });
    Ok((values, vectors))
}

/// Total spectral energy: sum of absolute eigenvalues.
pub fn spectral_energy(eigenvalues: &DVector<f64>) -> f64 {
    eigenvalues.iter().map(|v| v.abs()).sum()
}
