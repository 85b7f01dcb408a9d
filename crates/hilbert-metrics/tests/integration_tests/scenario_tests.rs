//! Fixed-scenario tests for the structure builder and scalar metrics.

use hilbert_core::{build_structure, build_structure_from_matrix, DiagnosticsConfig, Field, Graph};
use hilbert_metrics::{
    field_coherence, run_diagnostics, structural_entropy, StabilityEngine,
};

use super::helpers::{generate_field, generate_matrix, three_point_matrix};

// =============================================================================
// THREE-POINT SCENARIO
// =============================================================================

#[test]
fn test_three_point_weights() {
    let graph = build_structure_from_matrix(&three_point_matrix()).unwrap();
    let w = graph.weight();
    assert_eq!(w.len(), 3);
    assert!((w[0] - 0.8536).abs() < 1e-4, "w(0,1) = {}", w[0]);
    assert!((w[1] - 0.5).abs() < 1e-12, "w(0,2) = {}", w[1]);
    assert!((w[2] - 0.8536).abs() < 1e-4, "w(1,2) = {}", w[2]);
}

#[test]
fn test_three_point_entropy_and_coherence() {
    let m = three_point_matrix();
    let graph = build_structure_from_matrix(&m).unwrap();
    let h = structural_entropy(&graph).unwrap();
    let c = field_coherence(&m).unwrap();
    assert!((h - 0.6672).abs() < 1e-4, "entropy = {h}");
    assert!((c - 0.8047).abs() < 1e-4, "coherence = {c}");
}

// =============================================================================
// EDGE CASES
// =============================================================================

#[test]
fn test_edgeless_graphs_have_zero_entropy() {
    for n in 1..6 {
        assert_eq!(structural_entropy(&Graph::without_edges(n)).unwrap(), 0.0);
    }
    let single = Field::from_matrix(&generate_matrix(1, 8, 3)).unwrap();
    let graph = build_structure(&single).unwrap();
    assert_eq!(graph.num_nodes(), 1);
    assert_eq!(structural_entropy(&graph).unwrap(), 0.0);
}

#[test]
fn test_entropy_bounded_by_log_of_sources() {
    for n in 2..12 {
        let graph = build_structure(&generate_field(n, 5, n as u64)).unwrap();
        let h = structural_entropy(&graph).unwrap();
        // At most n - 1 nodes carry out-strength.
        assert!(h >= 0.0);
        assert!(h <= ((n - 1) as f64).ln() + 1e-12, "n={n}: {h}");
    }
}

#[test]
fn test_all_zero_field() {
    let m = nalgebra::DMatrix::zeros(4, 3);
    let graph = build_structure_from_matrix(&m).unwrap();
    assert!(graph.weight().iter().all(|w| (*w - 0.5).abs() < 1e-15));
    assert_eq!(field_coherence(&m).unwrap(), 0.0);
}

#[test]
fn test_antipodal_pairs_pass_every_metric() {
    let engine = StabilityEngine::new(DiagnosticsConfig::default()).unwrap();
    for xi in 0..=20 {
        for yi in 0..=20 {
            let (x, y) = (xi as f64 * 0.05, yi as f64 * 0.035);
            let m = nalgebra::DMatrix::from_row_slice(
                3,
                3,
                &[x, y, 1.3, -x, -y, -1.3, 0.2, 0.5, 0.1],
            );
            let field = Field::from_matrix(&m).unwrap();
            let graph = build_structure(&field).unwrap();
            assert!(graph.weight().iter().all(|w| (0.0..=1.0).contains(w)));
            assert!(structural_entropy(&graph).is_ok(), "x={x} y={y}");
            assert!(engine.compute(&field, &graph).is_ok(), "x={x} y={y}");
            assert!(run_diagnostics(&field, &engine).is_ok(), "x={x} y={y}");
        }
    }
}

// =============================================================================
// DETERMINISM
// =============================================================================

#[test]
fn test_pipeline_is_deterministic() {
    let field = generate_field(12, 6, 99);
    let a = build_structure(&field).unwrap();
    let b = build_structure(&field).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        structural_entropy(&a).unwrap().to_bits(),
        structural_entropy(&b).unwrap().to_bits()
    );
    let m = field.matrix();
    assert_eq!(
        field_coherence(&m).unwrap().to_bits(),
        field_coherence(&m).unwrap().to_bits()
    );
}

#[test]
fn test_report_json_is_reproducible() {
    let field = generate_field(7, 4, 5);
    let engine = StabilityEngine::new(DiagnosticsConfig::default()).unwrap();
    let first = run_diagnostics(&field, &engine).unwrap().to_json().unwrap();
    let second = run_diagnostics(&field, &engine).unwrap().to_json().unwrap();
    assert_eq!(first, second);
}
