//! Overlay operator: place independently built fields in one shared frame.
//!
//! Fields are truncated to their largest common dimensionality, stacked in
//! input order, and a single [`PrincipalAxes`] model is fitted over the
//! stack. Per-field projections are split back out with their original row
//! order and counts. The operator never fuses corpora or recomputes metrics.

use std::collections::{BTreeMap, HashSet};

use hilbert_core::linalg::ensure_finite_matrix;
use hilbert_core::OverlayConfig;
use nalgebra::DMatrix;
use serde::Serialize;
use tracing::debug;

use crate::error::{MetricsError, MetricsResult};
use crate::projection::PrincipalAxes;

/// Result of [`compute_shared_projection`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedProjection {
    /// Model fitted over all truncated fields.
    pub projector: PrincipalAxes,
    /// Number of leading columns kept from every field.
    pub common_dim: usize,
    /// Field names in the order they were stacked.
    pub field_order: Vec<String>,
    /// `rows × n_components` projection per field.
    pub projections: BTreeMap<String, DMatrix<f64>>,
}

/// Fit one shared projection over named fields.
///
/// # Errors
///
/// [`MetricsError::Overlay`] when fewer than two fields are given, names
/// repeat, `n_components` is not 2 or 3, or the common dimension is smaller
/// than `n_components`. Empty or non-finite fields are reported as
/// [`MetricsError::Core`].
pub fn compute_shared_projection(
    fields: &[(String, DMatrix<f64>)],
    n_components: usize,
) -> MetricsResult<SharedProjection> {
    if fields.len() < 2 {
        return Err(MetricsError::Overlay(format!(
            "need at least two fields to overlay, got {}",
            fields.len()
        )));
    }
    if !(2..=3).contains(&n_components) {
        return Err(MetricsError::Overlay(format!(
            "n_components must be 2 or 3, got {n_components}"
        )));
    }

    let mut names = HashSet::with_capacity(fields.len());
    for (name, matrix) in fields {
        if !names.insert(name.as_str()) {
            return Err(MetricsError::Overlay(format!("duplicate field name {name:?}")));
        }
        ensure_finite_matrix(matrix, &format!("field {name:?}"))?;
    }

    let common_dim = fields.iter().map(|(_, m)| m.ncols()).min().unwrap_or(0);
    if common_dim < n_components {
        return Err(MetricsError::Overlay(format!(
            "common dimensionality {common_dim} too small for {n_components} components"
        )));
    }

    let total_rows: usize = fields.iter().map(|(_, m)| m.nrows()).sum();
    let mut stacked = DMatrix::zeros(total_rows, common_dim);
    let mut offset = 0;
    for (_, matrix) in fields {
        let rows = matrix.nrows();
        stacked
            .rows_mut(offset, rows)
            .copy_from(&matrix.columns(0, common_dim));
        offset += rows;
    }

    let (projector, joint) = PrincipalAxes::fit_transform(&stacked, n_components)?;

    let mut projections = BTreeMap::new();
    let mut offset = 0;
    for (name, matrix) in fields {
        let rows = matrix.nrows();
        projections.insert(name.clone(), joint.rows(offset, rows).into_owned());
        offset += rows;
    }

    debug!(
        num_fields = fields.len(),
        common_dim,
        total_rows,
        n_components,
        "Computed shared projection"
    );

    Ok(SharedProjection {
        projector,
        common_dim,
        field_order: fields.iter().map(|(name, _)| name.clone()).collect(),
        projections,
    })
}

/// [`compute_shared_projection`] with the component count taken from `config`.
pub fn compute_shared_projection_with(
    fields: &[(String, DMatrix<f64>)],
    config: &OverlayConfig,
) -> MetricsResult<SharedProjection> {
    config.validate().map_err(MetricsError::Overlay)?;
    compute_shared_projection(fields, config.n_components)
}

/// Check that `fields` may be compared jointly.
///
/// Fields of differing dimensionality are only comparable when the caller
/// declares that an alignment operator has already been applied.
pub fn assert_shared_basis(fields: &[(String, DMatrix<f64>)], aligned: bool) -> MetricsResult<()> {
    if fields.len() < 2 {
        return Err(MetricsError::Contract("at least two fields required".into()));
    }
    let mut dims: Vec<usize> = fields.iter().map(|(_, m)| m.ncols()).collect();
    dims.sort_unstable();
    dims.dedup();
    if dims.len() != 1 && !aligned {
        return Err(MetricsError::Contract(format!(
            "fields with differing dimensionality {dims:?} require explicit alignment"
        )));
    }
    Ok(())
}
