//! Structural entropy of a weighted graph.
//!
//! Each node's out-strength is the sum of weights on edges leaving it. The
//! out-strengths are normalized into a distribution `p` and the Shannon
//! entropy `H = -Σ p_i ln p_i` is returned in nats. Nodes with zero mass
//! contribute nothing.
//!
//! Graphs from [`hilbert_core::build_structure`] only carry edges `i → j`
//! with `i < j`, so the highest-indexed node never has out-strength. That
//! asymmetry is part of the definition and is kept as-is.

mod backend;

pub use backend::{EntropyBackend, EntropyEngine, ParallelEntropy, ReferenceEntropy};

use hilbert_core::{CoreError, Graph};

use crate::error::{MetricsError, MetricsResult};

/// Reference structural entropy.
///
/// Returns `0.0` for a graph with no edges or zero total mass.
///
/// # Errors
///
/// - [`MetricsError::InsufficientElements`] if the graph has no nodes
/// - [`CoreError::InvalidParameter`] if any weight is negative
pub fn structural_entropy(graph: &Graph) -> MetricsResult<f64> {
    validate_entropy_input(graph)?;
    if !graph.has_edges() {
        return Ok(0.0);
    }
    Ok(entropy_from_out_strengths(&out_strengths(graph)))
}

/// Preconditions shared by every entropy backend.
pub(crate) fn validate_entropy_input(graph: &Graph) -> MetricsResult<()> {
    if graph.num_nodes() == 0 {
        return Err(MetricsError::InsufficientElements {
            operation: "structural entropy",
            required: 1,
            actual: 0,
        });
    }
    // Index range and finiteness are guaranteed by `Graph::new`.
    if let Some((k, w)) = graph.weight().iter().enumerate().find(|(_, w)| **w < 0.0) {
        return Err(CoreError::invalid_param(
            format!("weight[{k}]"),
            w,
            "edge weights must be non-negative",
        )
        .into());
    }
    Ok(())
}

/// Sum of outgoing edge weight per node.
pub(crate) fn out_strengths(graph: &Graph) -> Vec<f64> {
    let mut out = vec![0.0; graph.num_nodes()];
    for (s, _, w) in graph.edges() {
        out[s] += w;
    }
    out
}

/// Shannon entropy (nats) of the distribution proportional to `mass`.
pub(crate) fn entropy_from_out_strengths(mass: &[f64]) -> f64 {
    let total: f64 = mass.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    -mass
        .iter()
        .map(|m| m / total)
        .filter(|p| *p > 0.0)
        .map(|p| p * p.ln())
        .sum::<f64>()
}
