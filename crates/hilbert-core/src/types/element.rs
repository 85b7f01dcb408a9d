//! Element: the minimal identified vector unit.
//!
//! An element is an identifier, a finite embedding vector, and optional
//! non-authoritative annotations. Annotations travel with the element for
//! provenance only and are never read by any computation.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{first_non_finite, CoreError, CoreResult};

/// Non-authoritative annotations attached to elements, molecules and fields.
///
/// A `BTreeMap` keeps serialized key order stable.
pub type Annotations = std::collections::BTreeMap<String, serde_json::Value>;

/// Minimal informational element.
///
/// Fields are private: an element is validated once at construction and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    element_id: String,
    vector: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<Annotations>,
}

impl Element {
    /// Create an element with no annotations.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidIdentifier`] if `element_id` is empty or whitespace
    /// - [`CoreError::EmptyInput`] if `vector` is empty
    /// - [`CoreError::NonFiniteValue`] if `vector` contains NaN or infinity
    pub fn new(element_id: impl Into<String>, vector: Vec<f64>) -> CoreResult<Self> {
        Self::with_annotations(element_id, vector, None)
    }

    /// Create an element carrying annotations.
    pub fn with_annotations(
        element_id: impl Into<String>,
        vector: Vec<f64>,
        annotations: Option<Annotations>,
    ) -> CoreResult<Self> {
        let element_id = element_id.into();
        if element_id.trim().is_empty() {
            return Err(CoreError::InvalidIdentifier(element_id));
        }
        if vector.is_empty() {
            return Err(CoreError::empty(format!("vector of element {element_id:?}")));
        }
        if let Some(position) = first_non_finite(&vector) {
            return Err(CoreError::non_finite(
                format!("vector of element {element_id:?}"),
                position,
            ));
        }
        Ok(Self {
            element_id,
            vector,
            annotations,
        })
    }

    /// Stable identifier within the caller's scope.
    pub fn id(&self) -> &str {
        &self.element_id
    }

    /// Embedding vector.
    pub fn vector(&self) -> &[f64] {
        &self.vector
    }

    /// Annotations, if any.
    pub fn annotations(&self) -> Option<&Annotations> {
        self.annotations.as_ref()
    }

    /// Embedding dimension.
    pub fn dim(&self) -> usize {
        self.vector.len()
    }

    /// Euclidean norm of the vector.
    pub fn norm(&self) -> f64 {
        self.vector.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// JSON-safe summary. Excludes the raw vector.
    pub fn summary(&self) -> ElementSummary {
        ElementSummary {
            element_id: self.element_id.clone(),
            dim: self.dim(),
            norm: self.norm(),
        }
    }
}

/// Artifact view of an [`Element`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSummary {
    /// Element identifier.
    pub element_id: String,
    /// Vector dimension.
    pub dim: usize,
    /// Euclidean norm of the vector.
    pub norm: f64,
}

/// Stack element vectors into an `n × d` matrix.
///
/// # Errors
///
/// - [`CoreError::EmptyInput`] if `elements` is empty
/// - [`CoreError::DimensionMismatch`] if dimensions disagree
pub fn elements_to_matrix(elements: &[Element]) -> CoreResult<DMatrix<f64>> {
    let first = elements
        .first()
        .ok_or_else(|| CoreError::empty("elements"))?;
    let dim = first.dim();
    for element in elements {
        if element.dim() != dim {
            return Err(CoreError::DimensionMismatch {
                expected: dim,
                actual: element.dim(),
            });
        }
    }
    Ok(DMatrix::from_fn(elements.len(), dim, |i, j| {
        elements[i].vector[j]
    }))
}
