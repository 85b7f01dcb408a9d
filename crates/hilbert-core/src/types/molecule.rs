//! Molecule: a structural grouping of elements.
//!
//! Membership implies aggregation only. Element order is preserved for
//! determinism and carries no other meaning.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::element::{elements_to_matrix, Annotations, Element};
use super::field::centroid_of;
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Molecule {
    molecule_id: String,
    elements: Vec<Element>,
    annotations: Annotations,
}

impl Molecule {
    /// # Errors
    ///
    /// - [`CoreError::InvalidIdentifier`] for a blank id
    /// - [`CoreError::EmptyInput`] for no elements
    /// - [`CoreError::DimensionMismatch`] if element dimensions differ
    pub fn new(
        molecule_id: impl Into<String>,
        elements: Vec<Element>,
        annotations: Annotations,
    ) -> CoreResult<Self> {
        let molecule_id = molecule_id.into();
        if molecule_id.trim().is_empty() {
            return Err(CoreError::InvalidIdentifier(molecule_id));
        }
        // Validates non-empty and equal dimensions.
        elements_to_matrix(&elements)?;
        Ok(Self {
            molecule_id,
            elements,
            annotations,
        })
    }

    pub fn id(&self) -> &str {
        &self.molecule_id
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    pub fn dim(&self) -> usize {
        self.elements[0].dim()
    }

    pub fn matrix(&self) -> DMatrix<f64> {
        let (n, d) = (self.size(), self.dim());
        DMatrix::from_fn(n, d, |i, j| self.elements[i].vector()[j])
    }

    pub fn centroid(&self) -> DVector<f64> {
        centroid_of(&self.matrix())
    }

    pub fn summary(&self) -> MoleculeSummary {
        MoleculeSummary {
            molecule_id: self.molecule_id.clone(),
            num_elements: self.size(),
            dim: self.dim(),
            centroid_norm: self.centroid().norm(),
        }
    }
}

/// Artifact view of a [`Molecule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeSummary {
    /// Molecule identifier.
    pub molecule_id: String,
    /// Number of member elements.
    pub num_elements: usize,
    /// Shared embedding dimension.
    pub dim: usize,
    /// Euclidean norm of the member centroid.
    pub centroid_norm: f64,
}

/// Stack molecule centroids into an `m × d` matrix.
///
/// # Errors
///
/// - [`CoreError::EmptyInput`] if `molecules` is empty
/// - [`CoreError::DimensionMismatch`] if molecule dimensions differ
pub fn molecules_to_matrix(molecules: &[Molecule]) -> CoreResult<DMatrix<f64>> {
    let first = molecules
        .first()
        .ok_or_else(|| CoreError::empty("molecules"))?;
    let dim = first.dim();
    if let Some(m) = molecules.iter().find(|m| m.dim() != dim) {
        return Err(CoreError::DimensionMismatch {
            expected: dim,
            actual: m.dim(),
        });
    }

    let mut out = DMatrix::zeros(molecules.len(), dim);
    for (i, molecule) in molecules.iter().enumerate() {
        out.set_row(i, &molecule.centroid().transpose());
    }
    Ok(out)
}
