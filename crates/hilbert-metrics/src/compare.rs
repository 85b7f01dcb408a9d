//! Run comparison: deltas and descriptive summaries between two runs.
//!
//! Only differences are reported (`b − a`); nothing is ranked or judged.

use std::collections::BTreeMap;

use hilbert_core::CoreError;
use serde::{Deserialize, Serialize};

use crate::error::MetricsResult;

/// In-memory view of one run's outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Scalar metrics; `None` is a metric that was not computed.
    pub metrics: BTreeMap<String, Option<f64>>,
    /// Stability score per element index.
    pub stability: BTreeMap<usize, f64>,
    /// Number of documents in the run.
    pub num_documents: usize,
}

/// Mean, median, min and max of a set of scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Arithmetic mean.
    pub mean: f64,
    /// Middle value; mean of the two middle values for even counts.
    pub median: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl DistributionSummary {
    fn of(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };
        Self {
            mean: sorted.iter().sum::<f64>() / n as f64,
            median,
            min: sorted[0],
            max: sorted[n - 1],
        }
    }

    fn delta(&self, base: &Self) -> Self {
        Self {
            mean: self.mean - base.mean,
            median: self.median - base.median,
            min: self.min - base.min,
            max: self.max - base.max,
        }
    }
}

/// Stability summaries of both runs and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityComparison {
    /// Summary of run `a`.
    pub a: DistributionSummary,
    /// Summary of run `b`.
    pub b: DistributionSummary,
    /// Field-wise `b − a`.
    pub delta: DistributionSummary,
}

/// Output of [`compare_runs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunComparison {
    /// Document count of run `a`.
    pub num_documents_a: usize,
    /// Document count of run `b`.
    pub num_documents_b: usize,
    /// `b − a` for metrics present and finite in both runs.
    pub metric_deltas: BTreeMap<String, f64>,
    /// Stability distributions of both runs.
    pub stability_summary: StabilityComparison,
}

/// Compare run `b` against run `a`.
///
/// # Errors
///
/// [`CoreError::InvalidParameter`] if either run has no documents, no
/// stability entries, or a non-finite stability value.
pub fn compare_runs(a: &RunSummary, b: &RunSummary) -> MetricsResult<RunComparison> {
    let sa = stability_values("a", a)?;
    let sb = stability_values("b", b)?;

    let metric_deltas = a
        .metrics
        .iter()
        .filter_map(|(key, va)| {
            let va = (*va)?;
            let vb = (*b.metrics.get(key)?)?;
            (va.is_finite() && vb.is_finite()).then(|| (key.clone(), vb - va))
        })
        .collect();

    let summary_a = DistributionSummary::of(&sa);
    let summary_b = DistributionSummary::of(&sb);

    Ok(RunComparison {
        num_documents_a: a.num_documents,
        num_documents_b: b.num_documents,
        metric_deltas,
        stability_summary: StabilityComparison {
            a: summary_a,
            b: summary_b,
            delta: summary_b.delta(&summary_a),
        },
    })
}

fn stability_values(label: &str, run: &RunSummary) -> MetricsResult<Vec<f64>> {
    if run.num_documents == 0 {
        return Err(CoreError::invalid_param(
            format!("{label}.num_documents"),
            0,
            "must be > 0",
        )
        .into());
    }
    if run.stability.is_empty() {
        return Err(CoreError::empty(format!("{label}.stability")).into());
    }
    // BTreeMap iteration is already in index order.
    let values: Vec<f64> = run.stability.values().copied().collect();
    if let Some(position) = values.iter().position(|v| !v.is_finite()) {
        return Err(CoreError::non_finite(format!("{label}.stability"), position).into());
    }
    Ok(values)
}
