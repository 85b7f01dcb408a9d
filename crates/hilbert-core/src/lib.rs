//! Core data model and structure builder for Hilbert field diagnostics.
//!
//! This crate turns a set of embedded items into a deterministic geometric
//! structure. It never labels, classifies or recommends: every output is a
//! number or an immutable value describing geometry.
//!
//! # Modules
//!
//! - [`config`]: Explicit numeric constants and run configuration
//! - [`error`]: Error types and result aliases
//! - [`types`]: Element, Field, Molecule and Graph
//! - [`linalg`]: Vector, matrix and spectral operators
//! - [`structure`]: The Field → Graph construction rule
//! - [`potential`]: Dispersion of a field around its centroid
//!
//! # Example
//!
//! ```
//! use hilbert_core::{build_structure, Element, Field};
//!
//! let field = Field::new(
//!     vec![
//!         Element::new("a", vec![1.0, 0.0]).unwrap(),
//!         Element::new("b", vec![0.5, 0.5]).unwrap(),
//!         Element::new("c", vec![0.0, 1.0]).unwrap(),
//!     ],
//!     None,
//! )
//! .unwrap();
//!
//! let graph = build_structure(&field).unwrap();
//! assert_eq!(graph.num_edges(), 3);
//! assert_eq!(graph.num_nodes(), field.size());
//! ```

pub mod config;
pub mod error;
pub mod linalg;
pub mod potential;
pub mod structure;
pub mod types;

pub use config::{DiagnosticsConfig, OverlayConfig, StabilityConfig};
pub use error::{CoreError, CoreResult};
pub use potential::{element_potential, field_potential, potential_summary, PotentialSummary};
pub use structure::{build_structure, build_structure_from_matrix};
pub use types::{
    build_field_from_elements, elements_to_matrix, molecules_to_matrix, Annotations, Element,
    ElementSummary, Field, FieldSummary, Graph, GraphSummary, Molecule, MoleculeSummary,
};
