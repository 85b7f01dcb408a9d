//! Entropy backend capability and the engine that selects between backends.
//!
//! An accelerated backend is optional and chosen explicitly at construction.
//! It never changes results: on any error, or on a non-finite or negative
//! value, the engine logs at debug level and answers with the reference
//! computation instead.

use std::fmt;

use hilbert_core::config::BACKEND_PARITY_TOLERANCE;
use hilbert_core::Graph;
use rayon::prelude::*;
use tracing::debug;

use super::{entropy_from_out_strengths, structural_entropy, validate_entropy_input};
use crate::error::MetricsResult;

/// Edges per rayon task in [`ParallelEntropy`].
const PARALLEL_CHUNK_EDGES: usize = 4096;

/// Capability to compute structural entropy of a validated graph.
pub trait EntropyBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Structural entropy in nats. Must agree with [`structural_entropy`].
    fn entropy_of(&self, graph: &Graph) -> MetricsResult<f64>;
}

/// The reference computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEntropy;

impl EntropyBackend for ReferenceEntropy {
    fn name(&self) -> &str {
        "reference"
    }

    fn entropy_of(&self, graph: &Graph) -> MetricsResult<f64> {
        structural_entropy(graph)
    }
}

/// Out-strength accumulation split across the rayon pool.
///
/// Worth it only for large edge lists; chunk partials are merged element-wise,
/// so results can differ from the reference in the last bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelEntropy;

impl EntropyBackend for ParallelEntropy {
    fn name(&self) -> &str {
        "parallel"
    }

    fn entropy_of(&self, graph: &Graph) -> MetricsResult<f64> {
        if !graph.has_edges() {
            return Ok(0.0);
        }
        let n = graph.num_nodes();
        let mass = graph
            .src()
            .par_chunks(PARALLEL_CHUNK_EDGES)
            .zip(graph.weight().par_chunks(PARALLEL_CHUNK_EDGES))
            .fold(
                || vec![0.0; n],
                |mut acc, (src, weight)| {
                    for (&s, &w) in src.iter().zip(weight) {
                        acc[s as usize] += w;
                    }
                    acc
                },
            )
            .reduce(
                || vec![0.0; n],
                |mut a, b| {
                    a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                    a
                },
            );
        Ok(entropy_from_out_strengths(&mass))
    }
}

/// Entropy front end holding an optional accelerated backend.
pub struct EntropyEngine {
    accelerated: Option<Box<dyn EntropyBackend>>,
}

impl EntropyEngine {
    /// Engine that always uses the reference computation.
    pub fn reference() -> Self {
        Self { accelerated: None }
    }

    /// Engine that tries `backend` first and falls back to the reference.
    pub fn with_backend(backend: impl EntropyBackend + 'static) -> Self {
        Self {
            accelerated: Some(Box::new(backend)),
        }
    }

    /// Inject `backend` only if it matches the reference on every probe
    /// graph within [`BACKEND_PARITY_TOLERANCE`]. Otherwise the engine is
    /// reference-only.
    ///
    /// # Errors
    ///
    /// Returns the reference error if a probe graph is itself invalid.
    pub fn verified(
        backend: impl EntropyBackend + 'static,
        probes: &[Graph],
    ) -> MetricsResult<Self> {
        for (k, probe) in probes.iter().enumerate() {
            let expected = structural_entropy(probe)?;
            let agrees = match backend.entropy_of(probe) {
                Ok(h) => (h - expected).abs() <= BACKEND_PARITY_TOLERANCE,
                Err(_) => false,
            };
            if !agrees {
                debug!(
                    backend = backend.name(),
                    probe = k,
                    "Entropy backend disagrees with reference, not injecting"
                );
                return Ok(Self::reference());
            }
        }
        debug!(
            backend = backend.name(),
            probes = probes.len(),
            "Entropy backend verified"
        );
        Ok(Self::with_backend(backend))
    }

    /// Name of the backend tried first.
    pub fn backend_name(&self) -> &str {
        self.accelerated
            .as_ref()
            .map_or("reference", |b| b.name())
    }

    /// True when an accelerated backend is injected.
    pub fn is_accelerated(&self) -> bool {
        self.accelerated.is_some()
    }

    /// Structural entropy of `graph`.
    ///
    /// Input errors are reported before any backend is consulted, so a
    /// fallback never masks malformed input.
    pub fn entropy(&self, graph: &Graph) -> MetricsResult<f64> {
        validate_entropy_input(graph)?;
        if let Some(backend) = &self.accelerated {
            match backend.entropy_of(graph) {
                Ok(h) if h.is_finite() && h >= 0.0 => return Ok(h),
                Ok(h) => debug!(
                    backend = backend.name(),
                    value = h,
                    "Entropy backend returned out-of-domain value, using reference"
                ),
                Err(e) => debug!(
                    backend = backend.name(),
                    error = %e,
                    "Entropy backend failed, using reference"
                ),
            }
        }
        structural_entropy(graph)
    }
}

impl Default for EntropyEngine {
    fn default() -> Self {
        Self::reference()
    }
}

impl fmt::Debug for EntropyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntropyEngine")
            .field("backend", &self.backend_name())
            .finish()
    }
}
