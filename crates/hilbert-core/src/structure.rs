//! Structure builder: Field → Graph.
//!
//! The construction rule is fixed: every row is normalized to unit length
//! (a zero-norm row is divided by 1 and stays zero), and for every ordered
//! pair `i < j` one edge `i → j` is emitted with weight `(cos_ij + 1) / 2`.
//! The result is the complete upper-triangular graph with `n(n-1)/2` edges.
//! Nothing is pruned or thresholded.
//!
//! Edge order is row-major over `(i, j)`, so identical input yields an
//! identical graph.

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::linalg::ensure_finite_matrix;
use crate::types::{Field, Graph};

/// Build the similarity graph of a field.
pub fn build_structure(field: &Field) -> CoreResult<Graph> {
    build_structure_from_matrix(&field.matrix())
}

/// Build the similarity graph of an `n × d` matrix.
///
/// # Errors
///
/// - [`CoreError::EmptyInput`] if the matrix has no rows or columns
/// - [`CoreError::NonFiniteValue`] if any entry is NaN or infinite
/// - [`CoreError::InvalidParameter`] if `n` exceeds the `u32` node range
pub fn build_structure_from_matrix(matrix: &DMatrix<f64>) -> CoreResult<Graph> {
    ensure_finite_matrix(matrix, "structure input")?;
    let n = matrix.nrows();
    if u32::try_from(n).is_err() {
        return Err(CoreError::invalid_param(
            "num_nodes",
            n,
            "node indices must fit in u32",
        ));
    }

    let unit = unit_rows(matrix);
    let num_edges = n * n.saturating_sub(1) / 2;
    let mut src = Vec::with_capacity(num_edges);
    let mut dst = Vec::with_capacity(num_edges);
    let mut weight = Vec::with_capacity(num_edges);

    for i in 0..n {
        let row_i = unit.row(i);
        for j in (i + 1)..n {
            // Antipodal unit rows can round to a cosine just below -1.
            let cos = row_i.dot(&unit.row(j)).clamp(-1.0, 1.0);
            // Indices are < n, which was checked to fit in u32.
            src.push(i as u32);
            dst.push(j as u32);
            weight.push((cos + 1.0) / 2.0);
        }
    }

    debug!(num_nodes = n, num_edges = src.len(), "Built structure graph");
    Graph::new(src, dst, weight, n)
}

/// Rows scaled to unit length; zero rows are left as zero.
fn unit_rows(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    let mut unit = matrix.clone();
    for mut row in unit.row_iter_mut() {
        let norm = row.norm();
        let divisor = if norm == 0.0 { 1.0 } else { norm };
        row /= divisor;
    }
    unit
}
