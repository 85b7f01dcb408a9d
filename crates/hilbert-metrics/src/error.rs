//! Metrics error types.
//!
//! Input errors from the data model arrive wrapped as [`MetricsError::Core`].
//! [`MetricsError::InvariantViolation`] marks a defect: a computed quantity
//! left its documented domain. It is reported, never repaired.

use hilbert_core::CoreError;
use thiserror::Error;

/// Result type alias for metrics operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Errors produced by metrics, stability and overlay computations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Malformed input detected by the data model or linear operators.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Field and graph disagree on the number of nodes.
    #[error("Node count mismatch: field has {field_size} elements, graph has {num_nodes} nodes")]
    NodeCountMismatch {
        /// Elements in the field.
        field_size: usize,
        /// Nodes in the graph.
        num_nodes: usize,
    },

    /// A computed quantity left its documented domain (NaN, infinite or negative).
    #[error("Invariant violated in {quantity}: {value} ({context})")]
    InvariantViolation {
        /// Name of the quantity.
        quantity: &'static str,
        /// Offending value.
        value: f64,
        /// Where it was produced.
        context: String,
    },

    /// An entropy backend failed. Only seen by callers of the backend itself;
    /// the engine falls back instead of surfacing it.
    #[error("Entropy backend '{backend}' failed: {reason}")]
    Backend {
        /// Backend name.
        backend: String,
        /// Failure description.
        reason: String,
    },

    /// An operation needs more elements than were supplied.
    #[error("Insufficient elements for {operation}: need at least {required}, got {actual}")]
    InsufficientElements {
        /// Operation name.
        operation: &'static str,
        /// Minimum element count.
        required: usize,
        /// Supplied element count.
        actual: usize,
    },

    /// Overlay precondition failed.
    #[error("Overlay error: {0}")]
    Overlay(String),

    /// Field alignment contract violated.
    #[error("Field alignment contract violated: {0}")]
    Contract(String),
}

impl MetricsError {
    /// Create an [`MetricsError::InvariantViolation`] error.
    pub fn invariant(quantity: &'static str, value: f64, context: impl Into<String>) -> Self {
        MetricsError::InvariantViolation {
            quantity,
            value,
            context: context.into(),
        }
    }

    /// True when the error signals a defect in this crate rather than bad input.
    pub fn is_defect(&self) -> bool {
        matches!(self, MetricsError::InvariantViolation { .. })
    }
}

/// Check that `value` is finite and non-negative.
pub(crate) fn ensure_non_negative(
    quantity: &'static str,
    value: f64,
    context: impl FnOnce() -> String,
) -> MetricsResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MetricsError::invariant(quantity, value, context()))
    }
}
