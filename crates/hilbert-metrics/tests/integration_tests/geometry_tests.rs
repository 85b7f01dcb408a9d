//! Geometry delta invariance tests.

use hilbert_metrics::{geometry_delta, geometry_delta_from_projections, shape_distance};
use nalgebra::DMatrix;

use super::helpers::{generate_matrix, rotation, translate};

const TOLERANCE: f64 = 1e-6;

fn planar_pair() -> (DMatrix<f64>, DMatrix<f64>) {
    let full = generate_matrix(7, 2, 3);
    let mut reduced = generate_matrix(6, 2, 8);
    reduced[(2, 1)] += 0.9;
    (full, reduced)
}

#[test]
fn test_projection_delta_invariant_under_rigid_motion_and_scale() {
    let (full, reduced) = planar_pair();
    let base = geometry_delta_from_projections(&full, &reduced, 4).unwrap();
    assert!(base > 1e-3, "fixture should have a visible delta: {base}");

    let r = rotation(2, 0.83);
    for scale in [0.01, 1.0, 250.0] {
        let offset = [3.5, -12.0];
        let full_t = translate(&(&full * &r * scale), &offset);
        let reduced_t = translate(&(&reduced * &r * scale), &offset);
        let moved = geometry_delta_from_projections(&full_t, &reduced_t, 4).unwrap();
        assert!((moved - base).abs() < TOLERANCE, "scale {scale}: {moved} vs {base}");
    }
}

#[test]
fn test_shape_distance_ignores_independent_motions() {
    let (full, reduced) = planar_pair();
    let a = full.clone().remove_row(0);
    let base = shape_distance(&a, &reduced).unwrap();

    let a_moved = translate(&(&a * rotation(2, -1.4) * 3.0), &[1.0, 1.0]);
    let b_moved = translate(&(&reduced * rotation(2, 0.2) * 0.5), &[-7.0, 2.0]);
    let moved = shape_distance(&a_moved, &b_moved).unwrap();
    assert!((moved - base).abs() < TOLERANCE);
}

#[test]
fn test_field_delta_invariant_under_embedding_rotation() {
    let full = generate_matrix(7, 4, 17);
    let reduced = full.clone().remove_row(3);
    let base = geometry_delta(&full, &reduced, 3).unwrap();

    let r = rotation(4, 0.61);
    let offset = [0.3, -1.0, 2.0, 5.0];
    let full_t = translate(&(&full * &r * 4.0), &offset);
    let reduced_t = translate(&(&reduced * &r * 4.0), &offset);
    let moved = geometry_delta(&full_t, &reduced_t, 3).unwrap();
    assert!((moved - base).abs() < TOLERANCE, "{moved} vs {base}");
}

#[test]
fn test_geometry_delta_bounded() {
    for seed in 0..10 {
        let full = generate_matrix(9, 5, seed);
        for i in [0, 4, 8] {
            let reduced = full.clone().remove_row(i);
            let d = geometry_delta(&full, &reduced, i).unwrap();
            // Both sets have unit norm after scaling.
            assert!((0.0..=2.0).contains(&d), "seed {seed} index {i}: {d}");
        }
    }
}
