//! Property tests over generated fields.

use hilbert_core::{build_structure_from_matrix, DiagnosticsConfig, Field};
use hilbert_metrics::{field_coherence, structural_entropy, StabilityEngine};
use nalgebra::DMatrix;
use proptest::prelude::*;

/// `(rows, cols, values)` with rows in `2..7` and cols in `1..5`.
fn matrix_strategy() -> impl Strategy<Value = DMatrix<f64>> {
    (2usize..7, 1usize..5).prop_flat_map(|(n, d)| {
        prop::collection::vec(
            prop_oneof![Just(0.0), -10.0f64..10.0],
            n * d,
        )
        .prop_map(move |values| DMatrix::from_row_slice(n, d, &values))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_coherence_in_unit_interval(m in matrix_strategy()) {
        let c = field_coherence(&m).unwrap();
        prop_assert!((-1.0..=1.0).contains(&c), "coherence {}", c);
    }

    #[test]
    fn prop_entropy_non_negative(m in matrix_strategy()) {
        let g = build_structure_from_matrix(&m).unwrap();
        let h = structural_entropy(&g).unwrap();
        prop_assert!(h.is_finite() && h >= 0.0);
        prop_assert!(g.weight().iter().all(|w| (0.0..=1.0).contains(w)));
    }

    #[test]
    fn prop_stability_finite_non_negative(m in matrix_strategy()) {
        let field = Field::from_matrix(&m).unwrap();
        let graph = build_structure_from_matrix(&m).unwrap();
        let report = StabilityEngine::new(DiagnosticsConfig::default())
            .unwrap()
            .compute(&field, &graph)
            .unwrap();
        prop_assert!(report.completed);
        prop_assert_eq!(report.scores.len(), m.nrows());
        for s in report.scores.values() {
            prop_assert!(s.is_finite() && *s >= 0.0);
        }
    }
}
