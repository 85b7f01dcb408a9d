//! Helper Functions: Deterministic Data Generation (NO MOCKS)

use hilbert_core::{Element, Field};
use nalgebra::DMatrix;
use tracing_subscriber::EnvFilter;

/// Route library logs to the test writer. Filter via `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic `rows × dim` matrix from sin-based generation.
pub fn generate_matrix(rows: usize, dim: usize, seed: u64) -> DMatrix<f64> {
    DMatrix::from_fn(rows, dim, |i, j| {
        let x = (i * dim + j) as f64 * 0.37 + seed as f64 * 0.11;
        x.sin() + 0.25 * (2.0 * x + i as f64).cos()
    })
}

/// Field over [`generate_matrix`] with ids `doc-<row>`.
pub fn generate_field(rows: usize, dim: usize, seed: u64) -> Field {
    field_from(&generate_matrix(rows, dim, seed))
}

/// Field with ids `doc-<row>`.
pub fn field_from(matrix: &DMatrix<f64>) -> Field {
    let elements = matrix
        .row_iter()
        .enumerate()
        .map(|(i, row)| Element::new(format!("doc-{i}"), row.iter().copied().collect()).unwrap())
        .collect();
    Field::new(elements, None).unwrap()
}

/// The three-point scenario `(1,0), (0.5,0.5), (0,1)`.
pub fn three_point_matrix() -> DMatrix<f64> {
    DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.5, 0.5, 0.0, 1.0])
}

/// Four elements; 0 and 1 identical, 2 and 3 clearly distinct.
pub fn duplicate_pair_matrix() -> DMatrix<f64> {
    DMatrix::from_row_slice(
        4,
        4,
        &[
            1.0, 0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.5,
        ],
    )
}

/// Orthogonal `dim × dim` matrix built from Givens rotations.
pub fn rotation(dim: usize, angle: f64) -> DMatrix<f64> {
    let mut r = DMatrix::identity(dim, dim);
    for p in 0..dim.saturating_sub(1) {
        let theta = angle * (p + 1) as f64;
        let (s, c) = theta.sin_cos();
        let mut g = DMatrix::identity(dim, dim);
        g[(p, p)] = c;
        g[(p, p + 1)] = -s;
        g[(p + 1, p)] = s;
        g[(p + 1, p + 1)] = c;
        r = g * r;
    }
    r
}

/// Add `offset` to every row.
pub fn translate(matrix: &DMatrix<f64>, offset: &[f64]) -> DMatrix<f64> {
    DMatrix::from_fn(matrix.nrows(), matrix.ncols(), |i, j| matrix[(i, j)] + offset[j])
}
