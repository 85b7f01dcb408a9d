//! End-to-end diagnostics for one field.
//!
//! [`run_diagnostics`] builds the graph, measures entropy and coherence,
//! summarizes the field potential, runs the leave-one-out sweep and bundles
//! everything with JSON-safe summaries. No file is written; [`DiagnosticsReport::to_json`] renders the
//! report with sorted keys for a caller that wants to persist it.

use hilbert_core::{
    build_structure, potential_summary, CoreError, DiagnosticsConfig, Field, FieldSummary, Graph,
    GraphSummary, PotentialSummary,
};
use serde::Serialize;
use tracing::info;

use crate::coherence::field_coherence_with_floor;
use crate::entropy::EntropyEngine;
use crate::error::{MetricsError, MetricsResult};
use crate::stability::{stability_proxy, StabilityEngine, StabilityReport};

/// Scalar diagnostics of a field and its graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Structural entropy of the graph.
    pub entropy: f64,
    /// Field coherence.
    pub coherence: f64,
    /// `coherence / (1 + entropy)`; `None` when coherence is negative.
    pub stability: Option<f64>,
}

/// Entropy, coherence and the stability proxy of a field/graph pair.
///
/// # Errors
///
/// [`MetricsError::NodeCountMismatch`] if `graph` was not built from `field`.
pub fn compute_diagnostics(
    field: &Field,
    graph: &Graph,
    engine: &EntropyEngine,
    config: &DiagnosticsConfig,
) -> MetricsResult<Diagnostics> {
    if graph.num_nodes() != field.size() {
        return Err(MetricsError::NodeCountMismatch {
            field_size: field.size(),
            num_nodes: graph.num_nodes(),
        });
    }
    let entropy = engine.entropy(graph)?;
    let coherence = field_coherence_with_floor(&field.matrix(), config.norm_floor)?;
    let stability = if coherence >= 0.0 {
        Some(stability_proxy(entropy, coherence)?)
    } else {
        None
    };
    Ok(Diagnostics {
        entropy,
        coherence,
        stability,
    })
}

/// Everything one diagnostics run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticsReport {
    /// Summary of the input field.
    pub field: FieldSummary,
    /// Summary of the similarity graph.
    pub graph: GraphSummary,
    /// Scalar diagnostics.
    pub metrics: Diagnostics,
    /// Dispersion around the centroid.
    pub potential: PotentialSummary,
    /// Leave-one-out sweep; `None` for single-element fields.
    pub stability: Option<StabilityReport>,
}

impl DiagnosticsReport {
    /// Pretty JSON with object keys in sorted order.
    pub fn to_json(&self) -> MetricsResult<String> {
        // serde_json::Value maps are BTreeMap-backed, which sorts struct keys.
        let value = serde_json::to_value(self).map_err(CoreError::from)?;
        let json = serde_json::to_string_pretty(&value).map_err(CoreError::from)?;
        Ok(json)
    }
}

/// Build the graph of `field` and compute every diagnostic with `engine`'s
/// configuration and entropy backend.
pub fn run_diagnostics(
    field: &Field,
    engine: &StabilityEngine,
) -> MetricsResult<DiagnosticsReport> {
    let graph = build_structure(field)?;
    let metrics = compute_diagnostics(field, &graph, engine.entropy_engine(), engine.config())?;
    let potential = potential_summary(field)?;
    let stability = if field.size() >= 2 {
        Some(engine.compute(field, &graph)?)
    } else {
        None
    };

    info!(
        num_elements = field.size(),
        entropy = metrics.entropy,
        coherence = metrics.coherence,
        potential = potential.field_potential,
        "Diagnostics run complete"
    );

    Ok(DiagnosticsReport {
        field: field.summary(),
        graph: graph.summary(),
        metrics,
        potential,
        stability,
    })
}
