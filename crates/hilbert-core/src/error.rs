//! Error types for hilbert-core.
//!
//! Every error in this crate is a programmer-facing contract violation:
//! malformed shapes, non-finite values, out-of-range indices, empty
//! collections. Degenerate-but-valid inputs (zero vectors, single-element
//! fields) never produce an error; they are handled by explicit formulas in
//! the component that meets them.
//!
//! # Examples
//!
//! ```rust
//! use hilbert_core::CoreError;
//!
//! let error = CoreError::DimensionMismatch {
//!     expected: 300,
//!     actual: 64,
//! };
//! assert!(error.to_string().contains("300"));
//! assert!(error.is_input_error());
//! ```

use thiserror::Error;

/// Result type alias for hilbert-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Top-level error type for hilbert-core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required collection (elements, rows, columns, vector) was empty.
    #[error("Empty input: {context}")]
    EmptyInput {
        /// What was empty.
        context: String,
    },

    /// Two vectors or matrices that must agree in dimension do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Observed dimension.
        actual: usize,
    },

    /// A NaN or infinite value was found where finite values are required.
    #[error("Non-finite value in {context} at position {position}")]
    NonFiniteValue {
        /// Which input carried the value.
        context: String,
        /// Flat position of the offending value.
        position: usize,
    },

    /// A node index referenced by an edge lies outside `[0, num_nodes)`.
    #[error("{endpoint} index {index} out of range for graph with {num_nodes} nodes")]
    IndexOutOfRange {
        /// Which edge endpoint (`src` or `dst`).
        endpoint: &'static str,
        /// Offending index.
        index: usize,
        /// Number of nodes in the graph.
        num_nodes: usize,
    },

    /// Parallel sequences that must share a length do not.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// An element or molecule identifier is empty or whitespace only.
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Two elements in the same field share an identifier.
    #[error("Duplicate identifier {id:?} at positions {first} and {second}")]
    DuplicateIdentifier {
        /// The repeated identifier.
        id: String,
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeat.
        second: usize,
    },

    /// A parameter is outside its valid domain.
    #[error("Invalid parameter '{name}': {value}. {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Parameter value rendered as a string.
        value: String,
        /// Why the value is rejected.
        reason: String,
    },

    /// A linear-algebra routine failed to produce a result.
    #[error("Numerical failure in {operation}: {details}")]
    NumericalFailure {
        /// Routine that failed.
        operation: String,
        /// Additional context.
        details: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl CoreError {
    /// Create an [`CoreError::EmptyInput`] error.
    pub fn empty(context: impl Into<String>) -> Self {
        CoreError::EmptyInput {
            context: context.into(),
        }
    }

    /// Create a [`CoreError::NonFiniteValue`] error.
    pub fn non_finite(context: impl Into<String>, position: usize) -> Self {
        CoreError::NonFiniteValue {
            context: context.into(),
            position,
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_param(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        CoreError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a numerical failure error.
    pub fn numerical(operation: impl Into<String>, details: impl Into<String>) -> Self {
        CoreError::NumericalFailure {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// True when the error describes malformed caller input rather than an
    /// internal numerical or serialization failure.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CoreError::EmptyInput { .. }
                | CoreError::DimensionMismatch { .. }
                | CoreError::NonFiniteValue { .. }
                | CoreError::IndexOutOfRange { .. }
                | CoreError::ShapeMismatch(_)
                | CoreError::InvalidIdentifier(_)
                | CoreError::DuplicateIdentifier { .. }
                | CoreError::InvalidParameter { .. }
        )
    }
}

/// Return the position of the first non-finite value in `values`, if any.
pub(crate) fn first_non_finite(values: &[f64]) -> Option<usize> {
    values.iter().position(|v| !v.is_finite())
}
