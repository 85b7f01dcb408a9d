//! Field: an ordered configuration of same-dimension elements.
//!
//! A field defines what the geometry *is*; it does not know how it is built
//! or analysed. Derived views (matrix, centroid) are recomputed on every
//! call and never cached.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::element::{Annotations, Element};
use crate::error::{CoreError, CoreResult};
use crate::linalg::ensure_finite_matrix;

/// Ordered, non-empty sequence of elements sharing one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    elements: Vec<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<Annotations>,
}

impl Field {
    /// Build a field from elements.
    ///
    /// # Errors
    ///
    /// - [`CoreError::EmptyInput`] if `elements` is empty
    /// - [`CoreError::DimensionMismatch`] if any element differs in dimension
    ///   from the first
    /// - [`CoreError::DuplicateIdentifier`] if two elements share an id
    pub fn new(elements: Vec<Element>, annotations: Option<Annotations>) -> CoreResult<Self> {
        let first = elements
            .first()
            .ok_or_else(|| CoreError::empty("field elements"))?;
        let dim = first.dim();

        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(elements.len());
        for (position, element) in elements.iter().enumerate() {
            if element.dim() != dim {
                return Err(CoreError::DimensionMismatch {
                    expected: dim,
                    actual: element.dim(),
                });
            }
            if let Some(&first_seen) = seen.get(element.id()) {
                return Err(CoreError::DuplicateIdentifier {
                    id: element.id().to_string(),
                    first: first_seen,
                    second: position,
                });
            }
            seen.insert(element.id(), position);
        }

        Ok(Self {
            elements,
            annotations,
        })
    }

    /// Wrap a dense `n × d` matrix produced by any embedding source.
    ///
    /// Element ids are the row indices rendered as decimal strings.
    pub fn from_matrix(matrix: &DMatrix<f64>) -> CoreResult<Self> {
        ensure_finite_matrix(matrix, "field matrix")?;
        let elements = matrix
            .row_iter()
            .enumerate()
            .map(|(i, row)| Element::new(i.to_string(), row.iter().copied().collect()))
            .collect::<CoreResult<Vec<_>>>()?;
        Self::new(elements, None)
    }

    /// Elements in field order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Annotations, if any.
    pub fn annotations(&self) -> Option<&Annotations> {
        self.annotations.as_ref()
    }

    /// Number of elements.
    pub fn size(&self) -> usize {
        self.elements.len()
    }

    /// Embedding dimension shared by all elements.
    pub fn dim(&self) -> usize {
        self.elements[0].dim()
    }

    /// Stacked `n × d` matrix view.
    pub fn matrix(&self) -> DMatrix<f64> {
        // Invariants were checked in `new`, so stacking cannot fail.
        let (n, d) = (self.size(), self.dim());
        DMatrix::from_fn(n, d, |i, j| self.elements[i].vector()[j])
    }

    /// Mean row of the field matrix.
    pub fn centroid(&self) -> DVector<f64> {
        centroid_of(&self.matrix())
    }

    /// Euclidean norm of the centroid.
    pub fn centroid_norm(&self) -> f64 {
        self.centroid().norm()
    }

    /// JSON-safe summary for artifacts.
    pub fn summary(&self) -> FieldSummary {
        let mean_vector_norm =
            self.elements.iter().map(Element::norm).sum::<f64>() / self.size() as f64;
        FieldSummary {
            num_elements: self.size(),
            dim: self.dim(),
            centroid_norm: self.centroid_norm(),
            mean_vector_norm,
        }
    }
}

/// Artifact view of a [`Field`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    /// Number of elements.
    pub num_elements: usize,
    /// Shared embedding dimension.
    pub dim: usize,
    /// Euclidean norm of the centroid.
    pub centroid_norm: f64,
    /// Mean Euclidean norm of the element vectors.
    pub mean_vector_norm: f64,
}

/// Mean row of a matrix (sum of rows scaled by `1/n`).
pub fn centroid_of(matrix: &DMatrix<f64>) -> DVector<f64> {
    let n = matrix.nrows().max(1) as f64;
    matrix.row_sum().transpose() / n
}

/// Build a field from any iterable of elements.
pub fn build_field_from_elements(
    elements: impl IntoIterator<Item = Element>,
    annotations: Option<Annotations>,
) -> CoreResult<Field> {
    Field::new(elements.into_iter().collect(), annotations)
}
