//! Ranking and display normalization over algorithm metrics.
//!
//! Everything here is pure. Normalization never fails: degenerate input maps
//! to a zero vector instead of dividing by zero.

pub mod rows;

use thiserror::Error;

use crate::catalog::{Algorithm, AlgorithmMetrics, MetricSet};

pub use rows::{
    LINE_METRICS, MetricRow, RADAR_METRICS, RADAR_PAIR, RadarComparison, RadarRow, format_metric,
    global_radar_rows, metric_rows, radar_pair_rows,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    /// Ranking was asked for over an empty metrics map.
    #[error("Cannot rank an empty set of algorithms")]
    InvalidInput,
}

/// Pick the algorithm with the strictly greatest composite score S.
///
/// Ties keep the earliest algorithm in insertion order. A missing score ranks
/// below every present score.
pub fn pick_best_by_score(metrics: &AlgorithmMetrics) -> Result<Algorithm, ScoringError> {
    let mut entries = metrics.iter();
    let (mut best, first) = entries.next().ok_or(ScoringError::InvalidInput)?;
    let mut best_score = rank_score(first);
    for (algorithm, set) in entries {
        let score = rank_score(set);
        if score > best_score {
            best = algorithm;
            best_score = score;
        }
    }
    Ok(best)
}

fn rank_score(set: &MetricSet) -> f64 {
    set.score
        .filter(|score| !score.is_nan())
        .unwrap_or(f64::NEG_INFINITY)
}

/// Divide every value by the series maximum.
///
/// Returns all zeros when the maximum is non-positive or not finite (this
/// includes any NaN in the input). Inputs are expected to be non-negative.
pub fn normalize_by_max(values: &[f64]) -> Vec<f64> {
    match series_max(values.iter().copied()) {
        Some(max) => values.iter().map(|value| value / max).collect(),
        None => vec![0.0; values.len()],
    }
}

/// [`normalize_by_max`] specialized to exactly two values.
pub fn normalize_pair(a: f64, b: f64) -> (f64, f64) {
    match series_max([a, b]) {
        Some(max) => (a / max, b / max),
        None => (0.0, 0.0),
    }
}

/// Usable divisor for a series, if any.
fn series_max(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut max = f64::NEG_INFINITY;
    for value in values {
        if value.is_nan() {
            return None;
        }
        max = max.max(value);
    }
    (max.is_finite() && max > 0.0).then_some(max)
}
