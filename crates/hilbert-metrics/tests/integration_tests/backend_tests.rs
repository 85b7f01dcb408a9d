//! Entropy backend selection tests.

use hilbert_core::{build_structure, Graph};
use hilbert_metrics::{
    structural_entropy, EntropyBackend, EntropyEngine, MetricsError, MetricsResult,
    ParallelEntropy,
};

use super::helpers::{generate_field, init_tracing};

/// Plausible, finite output that is nonetheless wrong.
struct Skewed;

impl EntropyBackend for Skewed {
    fn name(&self) -> &str {
        "skewed"
    }

    fn entropy_of(&self, graph: &Graph) -> MetricsResult<f64> {
        Ok(structural_entropy(graph)? * 0.9)
    }
}

/// A backend whose native library is missing.
struct Unavailable;

impl EntropyBackend for Unavailable {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn entropy_of(&self, _graph: &Graph) -> MetricsResult<f64> {
        Err(MetricsError::Backend {
            backend: "unavailable".into(),
            reason: "shared library not loaded".into(),
        })
    }
}

fn probes() -> Vec<Graph> {
    [2, 5, 13, 40]
        .iter()
        .map(|&n| build_structure(&generate_field(n, 6, n as u64)).unwrap())
        .collect()
}

#[test]
fn test_verified_parallel_backend_is_injected() {
    let engine = EntropyEngine::verified(ParallelEntropy, &probes()).unwrap();
    assert!(engine.is_accelerated());
    for g in probes() {
        let h = engine.entropy(&g).unwrap();
        assert!((h - structural_entropy(&g).unwrap()).abs() < 1e-12);
    }
}

#[test]
fn test_disagreeing_backend_is_rejected() {
    let engine = EntropyEngine::verified(Skewed, &probes()).unwrap();
    assert!(!engine.is_accelerated());
    assert_eq!(engine.backend_name(), "reference");
}

#[test]
fn test_unavailable_backend_falls_back_silently() {
    init_tracing();
    let engine = EntropyEngine::with_backend(Unavailable);
    for g in probes() {
        assert_eq!(
            engine.entropy(&g).unwrap().to_bits(),
            structural_entropy(&g).unwrap().to_bits()
        );
    }
}
