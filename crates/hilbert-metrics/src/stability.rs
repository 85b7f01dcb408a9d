//! Leave-one-out stability.
//!
//! For each element `i` the field is rebuilt without row `i` and three
//! deltas are measured against the full field:
//!
//! - geometry: shape distance between the 2-D principal projections
//! - entropy: `|H(full) − H(reduced)|` over freshly built graphs
//! - coherence: `|C(full) − C(reduced)|`
//!
//! `stability[i] = 1 / (geometry + entropy + coherence + ε)`.
//!
//! Iterations are independent and keyed by index, so the sweep runs as a
//! parallel map on the rayon pool and produces the same bits as a
//! sequential sweep. An interrupt flag is polled once per iteration.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hilbert_core::config::STABILITY_PROJECTION_COMPONENTS;
use hilbert_core::{build_structure_from_matrix, CoreError, DiagnosticsConfig, Field, Graph};
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::coherence::field_coherence_with_floor;
use crate::entropy::EntropyEngine;
use crate::error::{ensure_non_negative, MetricsError, MetricsResult};
use crate::geometry::geometry_delta_from_projections;
use crate::projection::principal_projection;

/// Per-element breakdown of a leave-one-out iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementSensitivity {
    /// Procrustes residual between the full and reduced projections.
    pub geometry_delta: f64,
    /// Absolute change in structural entropy.
    pub entropy_delta: f64,
    /// Absolute change in field coherence.
    pub coherence_delta: f64,
    /// Sum of the three deltas.
    pub total_delta: f64,
    /// `1 / (total_delta + epsilon)`.
    pub stability: f64,
}

/// Result of a stability sweep.
///
/// `completed` is false when the sweep was interrupted; `scores` then holds
/// only the indices that finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityReport {
    /// Stability score per element index.
    pub scores: BTreeMap<usize, f64>,
    /// Full breakdown per element index.
    pub details: BTreeMap<usize, ElementSensitivity>,
    /// False when the sweep was interrupted.
    pub completed: bool,
}

/// Baseline quantities of the full field, computed once per sweep.
struct Baseline<'m> {
    matrix: &'m DMatrix<f64>,
    projection: DMatrix<f64>,
    entropy: f64,
    coherence: f64,
}

/// Leave-one-out stability engine.
#[derive(Debug)]
pub struct StabilityEngine {
    config: DiagnosticsConfig,
    entropy: EntropyEngine,
}

impl StabilityEngine {
    /// Engine using the reference entropy computation.
    ///
    /// # Errors
    ///
    /// [`CoreError::Config`] if `config` fails validation.
    pub fn new(config: DiagnosticsConfig) -> MetricsResult<Self> {
        Self::with_entropy_engine(config, EntropyEngine::reference())
    }

    /// Engine using the given entropy engine for every graph it measures.
    pub fn with_entropy_engine(
        config: DiagnosticsConfig,
        entropy: EntropyEngine,
    ) -> MetricsResult<Self> {
        config.validate().map_err(CoreError::Config)?;
        Ok(Self { config, entropy })
    }

    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    pub fn entropy_engine(&self) -> &EntropyEngine {
        &self.entropy
    }

    /// Run the full sweep.
    pub fn compute(&self, field: &Field, graph: &Graph) -> MetricsResult<StabilityReport> {
        self.compute_with_interrupt(field, graph, &Arc::new(AtomicBool::new(false)))
    }

    /// Run the sweep, abandoning remaining iterations once `interrupt_flag`
    /// is set. Entries already computed are returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`MetricsError::NodeCountMismatch`] if `graph` does not belong to `field`
    /// - [`MetricsError::InsufficientElements`] if the field has fewer than 2 elements
    /// - [`MetricsError::InvariantViolation`] if any delta leaves its domain
    pub fn compute_with_interrupt(
        &self,
        field: &Field,
        graph: &Graph,
        interrupt_flag: &Arc<AtomicBool>,
    ) -> MetricsResult<StabilityReport> {
        if graph.num_nodes() != field.size() {
            return Err(MetricsError::NodeCountMismatch {
                field_size: field.size(),
                num_nodes: graph.num_nodes(),
            });
        }
        let n = field.size();
        if n < 2 {
            return Err(MetricsError::InsufficientElements {
                operation: "leave-one-out stability",
                required: 2,
                actual: n,
            });
        }

        let matrix = field.matrix();
        let baseline = Baseline {
            matrix: &matrix,
            projection: principal_projection(&matrix, STABILITY_PROJECTION_COMPONENTS)?,
            entropy: self.entropy.entropy(graph)?,
            coherence: field_coherence_with_floor(&matrix, self.config.norm_floor)?,
        };

        info!(
            num_elements = n,
            dim = field.dim(),
            parallel = self.config.stability.parallel,
            backend = self.entropy.backend_name(),
            "Starting leave-one-out stability sweep"
        );

        let run = |i: usize| -> Option<MetricsResult<ElementSensitivity>> {
            if interrupt_flag.load(Ordering::Relaxed) {
                return None;
            }
            Some(self.element_sensitivity(&baseline, i))
        };

        let slots: Vec<Option<MetricsResult<ElementSensitivity>>> = if self.config.stability.parallel {
            (0..n).into_par_iter().map(run).collect()
        } else {
            let mut slots = Vec::with_capacity(n);
            for i in 0..n {
                let slot = run(i);
                if slot.is_none() {
                    break;
                }
                slots.push(slot);
            }
            slots
        };

        let mut scores = BTreeMap::new();
        let mut details = BTreeMap::new();
        for (i, slot) in slots.into_iter().enumerate() {
            if let Some(result) = slot {
                let sensitivity = result?;
                scores.insert(i, sensitivity.stability);
                details.insert(i, sensitivity);
            }
        }

        let completed = scores.len() == n;
        if completed {
            info!(num_elements = n, "Stability sweep complete");
        } else {
            debug!(
                computed = scores.len(),
                num_elements = n,
                "Stability sweep interrupted"
            );
        }

        Ok(StabilityReport {
            scores,
            details,
            completed,
        })
    }

    fn element_sensitivity(
        &self,
        baseline: &Baseline<'_>,
        index: usize,
    ) -> MetricsResult<ElementSensitivity> {
        let reduced = baseline.matrix.clone().remove_row(index);
        let reduced_projection = principal_projection(&reduced, STABILITY_PROJECTION_COMPONENTS)?;
        let at = || format!("leave-one-out index {index}");

        let geometry_delta = ensure_non_negative(
            "geometry_delta",
            geometry_delta_from_projections(&baseline.projection, &reduced_projection, index)?,
            at,
        )?;

        let reduced_graph = build_structure_from_matrix(&reduced)?;
        let entropy_delta = ensure_non_negative(
            "entropy_delta",
            (baseline.entropy - self.entropy.entropy(&reduced_graph)?).abs(),
            at,
        )?;

        let reduced_coherence = field_coherence_with_floor(&reduced, self.config.norm_floor)?;
        let coherence_delta = ensure_non_negative(
            "coherence_delta",
            (baseline.coherence - reduced_coherence).abs(),
            at,
        )?;

        let total_delta = geometry_delta + entropy_delta + coherence_delta;
        let stability = ensure_non_negative(
            "stability",
            1.0 / (total_delta + self.config.stability.epsilon),
            at,
        )?;

        trace!(
            index,
            geometry_delta,
            entropy_delta,
            coherence_delta,
            stability,
            "Leave-one-out iteration"
        );

        Ok(ElementSensitivity {
            geometry_delta,
            entropy_delta,
            coherence_delta,
            total_delta,
            stability,
        })
    }
}

/// Stability scores with the default configuration and reference entropy.
pub fn compute_stability(field: &Field, graph: &Graph) -> MetricsResult<BTreeMap<usize, f64>> {
    Ok(StabilityEngine::new(DiagnosticsConfig::default())?
        .compute(field, graph)?
        .scores)
}

/// Scalar stability proxy `coherence / (1 + entropy)`.
///
/// # Errors
///
/// [`CoreError::InvalidParameter`] if either input is negative or not finite.
pub fn stability_proxy(entropy: f64, coherence: f64) -> MetricsResult<f64> {
    if !(entropy.is_finite() && entropy >= 0.0) {
        return Err(CoreError::invalid_param("entropy", entropy, "must be finite and >= 0").into());
    }
    if !(coherence.is_finite() && coherence >= 0.0) {
        return Err(
            CoreError::invalid_param("coherence", coherence, "must be finite and >= 0").into(),
        );
    }
    ensure_non_negative("stability proxy", coherence / (1.0 + entropy), || {
        format!("entropy={entropy}, coherence={coherence}")
    })
}
