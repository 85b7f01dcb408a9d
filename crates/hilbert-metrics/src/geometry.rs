//! Geometry delta: how much a projected configuration changes when one
//! element is removed.
//!
//! Both configurations are reduced to two principal axes, the removed point
//! is dropped from the full projection, both point sets are centered and
//! scaled to unit Frobenius norm, and the residual after optimal orthogonal
//! alignment is reported. The value is invariant under translation,
//! rotation, reflection and uniform positive scaling of either point set.

use hilbert_core::config::STABILITY_PROJECTION_COMPONENTS;
use hilbert_core::linalg::center_rows;
use hilbert_core::CoreError;
use nalgebra::{DMatrix, SVD};

use crate::error::{ensure_non_negative, MetricsResult};
use crate::projection::principal_projection;

/// Residual `‖A − B·R‖_F` after the optimal orthogonal `R`.
///
/// `R = U Vᵀ` where `Bᵀ A = U Σ Vᵀ`. Inputs are used as given; callers
/// center and scale beforehand when shape comparison is intended.
///
/// # Errors
///
/// [`CoreError::ShapeMismatch`] if `a` and `b` differ in shape.
pub fn procrustes_distance(a: &DMatrix<f64>, b: &DMatrix<f64>) -> MetricsResult<f64> {
    if a.shape() != b.shape() {
        return Err(CoreError::ShapeMismatch(format!(
            "procrustes operands {:?} and {:?}",
            a.shape(),
            b.shape()
        ))
        .into());
    }
    let m = b.transpose() * a;
    let svd = SVD::try_new(m, true, true, f64::EPSILON, 0)
        .ok_or_else(|| CoreError::numerical("procrustes", "SVD did not converge"))?;
    let (u, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => return Err(CoreError::numerical("procrustes", "singular vectors missing").into()),
    };
    let rotation = u * v_t;
    let residual = a - b * rotation;
    ensure_non_negative("procrustes distance", residual.norm(), || {
        format!("operands of shape {:?}", a.shape())
    })
}

/// Procrustes distance between two point sets after centering each and
/// scaling it to unit Frobenius norm.
///
/// Returns `0.0` when either set has zero spread, since there is no shape to
/// compare.
pub fn shape_distance(a: &DMatrix<f64>, b: &DMatrix<f64>) -> MetricsResult<f64> {
    if a.shape() != b.shape() {
        return Err(CoreError::ShapeMismatch(format!(
            "point sets {:?} and {:?}",
            a.shape(),
            b.shape()
        ))
        .into());
    }
    let a = center_rows(a);
    let b = center_rows(b);
    let (na, nb) = (a.norm(), b.norm());
    if na == 0.0 || nb == 0.0 {
        return Ok(0.0);
    }
    procrustes_distance(&(a / na), &(b / nb))
}

/// Geometry delta from precomputed projections of the full and reduced
/// matrices.
///
/// # Errors
///
/// - [`CoreError::ShapeMismatch`] unless `full` has one more row than
///   `reduced` and the same number of columns
/// - [`CoreError::InvalidParameter`] if `removed_index` is out of range
pub fn geometry_delta_from_projections(
    full: &DMatrix<f64>,
    reduced: &DMatrix<f64>,
    removed_index: usize,
) -> MetricsResult<f64> {
    check_leave_one_out_shapes(full, reduced, removed_index)?;
    let full_without = full.clone().remove_row(removed_index);
    shape_distance(&full_without, reduced)
}

/// Geometry delta of a leave-one-out perturbation.
///
/// `full` is the `n × d` field matrix, `reduced` the same matrix without row
/// `removed_index`.
pub fn geometry_delta(
    full: &DMatrix<f64>,
    reduced: &DMatrix<f64>,
    removed_index: usize,
) -> MetricsResult<f64> {
    check_leave_one_out_shapes(full, reduced, removed_index)?;
    let y_full = principal_projection(full, STABILITY_PROJECTION_COMPONENTS)?;
    let y_reduced = principal_projection(reduced, STABILITY_PROJECTION_COMPONENTS)?;
    geometry_delta_from_projections(&y_full, &y_reduced, removed_index)
}

fn check_leave_one_out_shapes(
    full: &DMatrix<f64>,
    reduced: &DMatrix<f64>,
    removed_index: usize,
) -> MetricsResult<()> {
    if full.nrows() != reduced.nrows() + 1 || full.ncols() != reduced.ncols() {
        return Err(CoreError::ShapeMismatch(format!(
            "leave-one-out expects {}x{} and {}x{}, got {:?} and {:?}",
            reduced.nrows() + 1,
            reduced.ncols(),
            reduced.nrows(),
            reduced.ncols(),
            full.shape(),
            reduced.shape()
        ))
        .into());
    }
    if removed_index >= full.nrows() {
        return Err(CoreError::invalid_param(
            "removed_index",
            removed_index,
            format!("must be < {}", full.nrows()),
        )
        .into());
    }
    Ok(())
}
