//! Structural diagnostics over Hilbert fields.
//!
//! Every function here is pure: it reads an immutable field or graph and
//! returns numbers. Nothing is thresholded, labelled or persisted.
//!
//! # Modules
//!
//! - [`entropy`]: Structural entropy and the pluggable backend capability
//! - [`coherence`]: Mean cosine similarity to the centroid
//! - [`projection`]: Deterministic principal-axis projection
//! - [`geometry`]: Procrustes-based geometry delta
//! - [`stability`]: Leave-one-out stability engine
//! - [`overlay`]: Shared projection across fields
//! - [`compare`]: Deltas between two runs
//! - [`diagnostics`]: One-call diagnostics report
//!
//! # Example
//!
//! ```
//! use hilbert_core::{build_structure, DiagnosticsConfig, Field};
//! use hilbert_metrics::{field_coherence, structural_entropy, StabilityEngine};
//! use nalgebra::DMatrix;
//!
//! let matrix = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.5, 0.5, 0.0, 1.0]);
//! let field = Field::from_matrix(&matrix).unwrap();
//! let graph = build_structure(&field).unwrap();
//!
//! let entropy = structural_entropy(&graph).unwrap();
//! let coherence = field_coherence(&matrix).unwrap();
//! assert!((entropy - 0.6673).abs() < 1e-4);
//! assert!((coherence - 0.8047).abs() < 1e-4);
//!
//! let engine = StabilityEngine::new(DiagnosticsConfig::default()).unwrap();
//! let report = engine.compute(&field, &graph).unwrap();
//! assert!(report.scores.values().all(|s| s.is_finite() && *s >= 0.0));
//! ```

pub mod coherence;
pub mod compare;
pub mod diagnostics;
pub mod entropy;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod projection;
pub mod stability;

pub use coherence::{field_coherence, field_coherence_with_floor};
pub use compare::{compare_runs, DistributionSummary, RunComparison, RunSummary, StabilityComparison};
pub use diagnostics::{compute_diagnostics, run_diagnostics, Diagnostics, DiagnosticsReport};
pub use entropy::{
    structural_entropy, EntropyBackend, EntropyEngine, ParallelEntropy, ReferenceEntropy,
};
pub use error::{MetricsError, MetricsResult};
pub use geometry::{geometry_delta, geometry_delta_from_projections, procrustes_distance, shape_distance};
pub use overlay::{
    assert_shared_basis, compute_shared_projection, compute_shared_projection_with,
    SharedProjection,
};
pub use projection::{principal_projection, PrincipalAxes};
pub use stability::{
    compute_stability, stability_proxy, ElementSensitivity, StabilityEngine, StabilityReport,
};
