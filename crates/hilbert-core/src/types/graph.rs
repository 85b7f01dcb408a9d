//! Directed weighted edge-list graph over node indices.
//!
//! A graph is a container, not a policy object: builders live in
//! [`crate::structure`]. Edge `k` runs `src[k] → dst[k]` with `weight[k]`.

use serde::{Deserialize, Serialize};

use crate::error::{first_non_finite, CoreError, CoreResult};

/// Minimal directed weighted graph with nodes in `[0, num_nodes)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    src: Vec<u32>,
    dst: Vec<u32>,
    weight: Vec<f64>,
    num_nodes: usize,
}

impl Graph {
    /// Build a graph from parallel edge arrays.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ShapeMismatch`] if `src`, `dst` and `weight` lengths differ
    /// - [`CoreError::IndexOutOfRange`] if an endpoint is `>= num_nodes`
    /// - [`CoreError::NonFiniteValue`] if a weight is NaN or infinite
    pub fn new(
        src: Vec<u32>,
        dst: Vec<u32>,
        weight: Vec<f64>,
        num_nodes: usize,
    ) -> CoreResult<Self> {
        if src.len() != dst.len() || src.len() != weight.len() {
            return Err(CoreError::ShapeMismatch(format!(
                "src ({}), dst ({}) and weight ({}) must have the same length",
                src.len(),
                dst.len(),
                weight.len()
            )));
        }
        check_endpoints("src", &src, num_nodes)?;
        check_endpoints("dst", &dst, num_nodes)?;
        if let Some(position) = first_non_finite(&weight) {
            return Err(CoreError::non_finite("edge weights", position));
        }
        Ok(Self {
            src,
            dst,
            weight,
            num_nodes,
        })
    }

    /// Graph with `num_nodes` nodes and no edges.
    pub fn without_edges(num_nodes: usize) -> Self {
        Self {
            src: Vec::new(),
            dst: Vec::new(),
            weight: Vec::new(),
            num_nodes,
        }
    }

    /// Source node of every edge.
    pub fn src(&self) -> &[u32] {
        &self.src
    }

    /// Destination node of every edge.
    pub fn dst(&self) -> &[u32] {
        &self.dst
    }

    /// Weight of every edge, aligned with [`Graph::src`].
    pub fn weight(&self) -> &[f64] {
        &self.weight
    }

    /// Number of nodes, including isolated ones.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of stored edges.
    pub fn num_edges(&self) -> usize {
        self.src.len()
    }

    /// True when at least one edge is stored.
    pub fn has_edges(&self) -> bool {
        !self.src.is_empty()
    }

    /// Sum of all edge weights; `0.0` for an edgeless graph.
    pub fn total_weight(&self) -> f64 {
        self.weight.iter().sum()
    }

    /// Iterate edges as `(src, dst, weight)` triples in storage order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.src
            .iter()
            .zip(&self.dst)
            .zip(&self.weight)
            .map(|((&s, &d), &w)| (s as usize, d as usize, w))
    }

    /// JSON-safe summary for artifacts.
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            num_nodes: self.num_nodes,
            num_edges: self.num_edges(),
            total_weight: self.total_weight(),
        }
    }
}

/// Artifact view of a [`Graph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Number of nodes.
    pub num_nodes: usize,
    /// Number of edges.
    pub num_edges: usize,
    /// Sum of all edge weights.
    pub total_weight: f64,
}

fn check_endpoints(endpoint: &'static str, indices: &[u32], num_nodes: usize) -> CoreResult<()> {
    match indices.iter().find(|&&i| i as usize >= num_nodes) {
        Some(&index) => Err(CoreError::IndexOutOfRange {
            endpoint,
            index: index as usize,
            num_nodes,
        }),
        None => Ok(()),
    }
}
