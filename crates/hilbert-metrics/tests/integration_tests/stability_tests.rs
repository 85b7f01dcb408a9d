//! Leave-one-out stability tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hilbert_core::{build_structure, DiagnosticsConfig};
use hilbert_metrics::{EntropyEngine, ParallelEntropy, StabilityEngine};

use super::helpers::{duplicate_pair_matrix, field_from, generate_field, init_tracing};

fn engine(parallel: bool) -> StabilityEngine {
    let mut config = DiagnosticsConfig::default();
    config.stability.parallel = parallel;
    StabilityEngine::new(config).unwrap()
}

#[test]
fn test_duplicate_element_is_most_stable() {
    let field = field_from(&duplicate_pair_matrix());
    let graph = build_structure(&field).unwrap();
    let report = engine(true).compute(&field, &graph).unwrap();
    let s = &report.scores;
    let d = &report.details;

    assert!(report.completed);
    assert!(s[&0] > s[&2], "stability {s:?}");
    assert!(s[&0] > s[&3], "stability {s:?}");
    for k in [2, 3] {
        assert!(d[&0].geometry_delta <= d[&k].geometry_delta + 1e-6);
        assert!(d[&0].total_delta < d[&k].total_delta);
    }
    // Removing either copy of the duplicate changes the field identically.
    assert!((s[&0] - s[&1]).abs() < 1e-9);
}

#[test]
fn test_scores_finite_and_non_negative() {
    for (n, d) in [(2, 1), (2, 5), (3, 2), (8, 3), (15, 6)] {
        let field = generate_field(n, d, (n * d) as u64);
        let graph = build_structure(&field).unwrap();
        let report = engine(true).compute(&field, &graph).unwrap();
        assert_eq!(report.scores.len(), n);
        for detail in report.details.values() {
            for v in [
                detail.geometry_delta,
                detail.entropy_delta,
                detail.coherence_delta,
                detail.stability,
            ] {
                assert!(v.is_finite() && v >= 0.0, "n={n} d={d}: {detail:?}");
            }
        }
    }
}

#[test]
fn test_parallel_and_sequential_are_bit_identical() {
    let field = generate_field(20, 7, 11);
    let graph = build_structure(&field).unwrap();
    let parallel = engine(true).compute(&field, &graph).unwrap();
    let sequential = engine(false).compute(&field, &graph).unwrap();
    for (i, s) in &parallel.scores {
        assert_eq!(s.to_bits(), sequential.scores[i].to_bits(), "index {i}");
    }
}

#[test]
fn test_accelerated_backend_gives_same_scores() {
    let field = generate_field(10, 4, 21);
    let graph = build_structure(&field).unwrap();
    let reference = engine(false).compute(&field, &graph).unwrap();

    let mut config = DiagnosticsConfig::default();
    config.stability.parallel = false;
    let accelerated =
        StabilityEngine::with_entropy_engine(config, EntropyEngine::with_backend(ParallelEntropy))
            .unwrap();
    let report = accelerated.compute(&field, &graph).unwrap();
    for (i, s) in &reference.scores {
        assert!((s - report.scores[i]).abs() / s < 1e-9, "index {i}");
    }
}

#[test]
fn test_interrupt_mid_sweep_keeps_computed_entries() {
    init_tracing();
    let field = generate_field(60, 8, 4);
    let graph = build_structure(&field).unwrap();
    let full = engine(false).compute(&field, &graph).unwrap();

    let flag = Arc::new(AtomicBool::new(false));
    let setter = {
        let flag = Arc::clone(&flag);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            flag.store(true, Ordering::Relaxed);
        })
    };
    let partial = engine(false)
        .compute_with_interrupt(&field, &graph, &flag)
        .unwrap();
    setter.join().unwrap();

    // Whatever finished must match the uninterrupted sweep exactly.
    for (i, s) in &partial.scores {
        assert_eq!(s.to_bits(), full.scores[i].to_bits());
    }
    assert_eq!(partial.completed, partial.scores.len() == 60);
    // Sequential sweeps stop at a prefix.
    let keys: Vec<usize> = partial.scores.keys().copied().collect();
    assert_eq!(keys, (0..keys.len()).collect::<Vec<_>>());
}

#[test]
fn test_preset_interrupt_returns_empty_report() {
    let field = generate_field(5, 3, 1);
    let graph = build_structure(&field).unwrap();
    let flag = Arc::new(AtomicBool::new(true));
    let report = engine(true)
        .compute_with_interrupt(&field, &graph, &flag)
        .unwrap();
    assert!(!report.completed);
    assert!(report.scores.is_empty());
    assert!(report.details.is_empty());
}

#[test]
fn test_identical_rows_only_move_entropy() {
    // Identical rows: no spread to project and coherence stays 1, so only
    // the entropy delta contributes.
    let m = nalgebra::DMatrix::from_element(4, 3, 0.7);
    let field = field_from(&m);
    let graph = build_structure(&field).unwrap();

    let mut config = DiagnosticsConfig::default();
    config.stability.epsilon = 1e-3;
    config.stability.parallel = false;
    let report = StabilityEngine::new(config)
        .unwrap()
        .compute(&field, &graph)
        .unwrap();
    for detail in report.details.values() {
        assert_eq!(detail.geometry_delta, 0.0);
        assert!(detail.coherence_delta < 1e-12);
        assert!((detail.stability - 1.0 / (detail.total_delta + 1e-3)).abs() < 1e-9);
    }
}
