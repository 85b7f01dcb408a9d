//! Field potential: dispersion of elements around their centroid.
//!
//! `V = (1/n) Σ ‖x_i − c‖²`. `V ≥ 0`, and `V = 0` exactly when every element
//! coincides. The value grows with dispersion and carries no notion of
//! desirability.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{first_non_finite, CoreError, CoreResult};
use crate::types::Field;

/// Squared distance of every element to the field centroid, in field order.
///
/// # Errors
///
/// [`CoreError::NumericalFailure`] if a squared distance overflows.
pub fn element_potential(field: &Field) -> CoreResult<Vec<f64>> {
    let matrix = field.matrix();
    let centroid = field.centroid();
    let first = matrix.row(0);

    // Coincident elements can leave a centroid one ulp off the shared row.
    let coincide = matrix.row_iter().all(|row| row == first);
    let potentials: Vec<f64> = if coincide {
        vec![0.0; field.size()]
    } else {
        matrix
            .row_iter()
            .map(|row| {
                let diff: DVector<f64> = row.transpose() - &centroid;
                diff.norm_squared()
            })
            .collect()
    };

    if let Some(position) = first_non_finite(&potentials) {
        return Err(CoreError::numerical(
            "element_potential",
            format!("squared distance of element {position} is not finite"),
        ));
    }
    Ok(potentials)
}

/// Mean squared distance of the elements to their centroid.
pub fn field_potential(field: &Field) -> CoreResult<f64> {
    let potentials = element_potential(field)?;
    Ok(mean(&potentials))
}

/// Field potential with the extremes of the per-element contributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PotentialSummary {
    /// Mean of the per-element potentials.
    pub field_potential: f64,
    /// Largest per-element potential.
    pub max_element_potential: f64,
    /// Smallest per-element potential.
    pub min_element_potential: f64,
}

/// Summarize the potential of `field`.
pub fn potential_summary(field: &Field) -> CoreResult<PotentialSummary> {
    let potentials = element_potential(field)?;
    let (min, max) = potentials
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
            (lo.min(p), hi.max(p))
        });
    Ok(PotentialSummary {
        field_potential: mean(&potentials),
        max_element_potential: max,
        min_element_potential: min,
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
