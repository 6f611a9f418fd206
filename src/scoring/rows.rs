//! Chart-ready rows. Renderers draw these as-is.

use serde::Serialize;

use super::{normalize_by_max, normalize_pair};
use crate::catalog::{Algorithm, AlgorithmMetrics, MetricKind, round_decimals};

/// Decimal places kept in chart rows.
const ROW_PRECISION: i32 = 3;

/// Metrics on the per-scenario line chart, in axis order.
pub const LINE_METRICS: [MetricKind; 5] = [
    MetricKind::F1,
    MetricKind::Fps,
    MetricKind::Accuracy,
    MetricKind::ScIou,
    MetricKind::Score,
];

/// Axes of both radar charts.
pub const RADAR_METRICS: [MetricKind; 4] = [
    MetricKind::F1,
    MetricKind::Fps,
    MetricKind::ScIou,
    MetricKind::Score,
];

/// The two algorithms compared on the single-scenario radar.
pub const RADAR_PAIR: (Algorithm, Algorithm) = (Algorithm::UfldV2Plus, Algorithm::SaLane);

/// One metric across every algorithm of a slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub metric: MetricKind,
    pub values: Vec<(Algorithm, f64)>,
}

impl MetricRow {
    pub fn value(&self, algorithm: Algorithm) -> Option<f64> {
        self.values
            .iter()
            .find(|(candidate, _)| *candidate == algorithm)
            .map(|(_, value)| *value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarRow {
    pub metric: MetricKind,
    pub first: f64,
    pub second: f64,
}

/// Pairwise-normalized radar data for two algorithms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarComparison {
    pub first: Algorithm,
    pub second: Algorithm,
    pub rows: Vec<RadarRow>,
}

/// Line-chart rows for a slice; missing values read as zero.
///
/// With `normalize`, each metric is max-normalized across algorithms.
pub fn metric_rows(slice: &AlgorithmMetrics, normalize: bool) -> Vec<MetricRow> {
    build_rows(slice, &LINE_METRICS, normalize)
}

/// Radar rows over the multi-scenario aggregate, always max-normalized.
pub fn global_radar_rows(global: &AlgorithmMetrics) -> Vec<MetricRow> {
    build_rows(global, &RADAR_METRICS, true)
}

/// Radar rows comparing two algorithms, or `None` if either is absent.
pub fn radar_pair_rows(
    slice: &AlgorithmMetrics,
    first: Algorithm,
    second: Algorithm,
) -> Option<RadarComparison> {
    let a = slice.get(first)?;
    let b = slice.get(second)?;
    let rows = RADAR_METRICS
        .into_iter()
        .map(|metric| {
            let (x, y) = normalize_pair(
                a.value(metric).unwrap_or(0.0),
                b.value(metric).unwrap_or(0.0),
            );
            RadarRow {
                metric,
                first: round_decimals(x, ROW_PRECISION),
                second: round_decimals(y, ROW_PRECISION),
            }
        })
        .collect();
    Some(RadarComparison {
        first,
        second,
        rows,
    })
}

fn build_rows(slice: &AlgorithmMetrics, metrics: &[MetricKind], normalize: bool) -> Vec<MetricRow> {
    let algorithms = slice.algorithms().collect::<Vec<_>>();
    metrics
        .iter()
        .map(|&metric| {
            let raw = slice
                .iter()
                .map(|(_, set)| set.value(metric).unwrap_or(0.0))
                .collect::<Vec<_>>();
            let values = if normalize { normalize_by_max(&raw) } else { raw };
            MetricRow {
                metric,
                values: algorithms
                    .iter()
                    .copied()
                    .zip(values.into_iter().map(|v| round_decimals(v, ROW_PRECISION)))
                    .collect(),
            }
        })
        .collect()
}

/// Display text for a metric value: FPS as an integer from 100 up, else one
/// decimal; every other metric with three decimals.
pub fn format_metric(metric: MetricKind, value: f64) -> String {
    match metric {
        MetricKind::Fps if value >= 100.0 => format!("{}", value.round() as i64),
        MetricKind::Fps => format!("{value:.1}"),
        _ => format!("{value:.3}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MetricSet, PerformanceCatalog, Scenario};

    #[test]
    fn normalized_rows_top_out_at_one() {
        let catalog = PerformanceCatalog::builtin().unwrap();
        let rows = metric_rows(catalog.lookup(Scenario::Standard), true);
        assert_eq!(rows.len(), LINE_METRICS.len());
        let fps = rows.iter().find(|row| row.metric == MetricKind::Fps).unwrap();
        assert_eq!(fps.value(Algorithm::Ufld), Some(1.0));
        assert_eq!(fps.value(Algorithm::PolarRcnn), Some(0.103));
        for row in &rows {
            assert_eq!(row.values.len(), 6);
            assert!(row.values.iter().all(|(_, v)| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn raw_rows_keep_values_rounded() {
        let catalog = PerformanceCatalog::builtin().unwrap();
        let rows = metric_rows(catalog.lookup(Scenario::Standard), false);
        let score = rows.iter().find(|row| row.metric == MetricKind::Score).unwrap();
        assert_eq!(score.value(Algorithm::SaLane), Some(0.924));
        let fps = rows.iter().find(|row| row.metric == MetricKind::Fps).unwrap();
        assert_eq!(fps.value(Algorithm::PiNet), Some(48.0));
    }

    #[test]
    fn missing_score_reads_as_zero() {
        let mut set = MetricSet::sample(0.9, 0.9, 50.0, 0.7, 0.0);
        set.score = None;
        let slice = [(Algorithm::PiNet, set)].into_iter().collect::<AlgorithmMetrics>();
        let rows = metric_rows(&slice, true);
        let score = rows.iter().find(|row| row.metric == MetricKind::Score).unwrap();
        assert_eq!(score.value(Algorithm::PiNet), Some(0.0));
    }

    #[test]
    fn radar_pair_requires_both_algorithms() {
        let catalog = PerformanceCatalog::builtin().unwrap();
        let slice = catalog.lookup(Scenario::Lighting);
        let (first, second) = RADAR_PAIR;
        let comparison = radar_pair_rows(slice, first, second).unwrap();
        assert_eq!(comparison.rows.len(), RADAR_METRICS.len());
        let fps = comparison.rows[1];
        assert_eq!(fps.metric, MetricKind::Fps);
        assert_eq!(fps.first, 1.0);
        assert_eq!(fps.second, 0.904);

        let partial = [(Algorithm::SaLane, *slice.get(Algorithm::SaLane).unwrap())]
            .into_iter()
            .collect::<AlgorithmMetrics>();
        assert!(radar_pair_rows(&partial, first, second).is_none());
    }

    #[test]
    fn global_radar_normalizes_each_axis() {
        let catalog = PerformanceCatalog::builtin().unwrap();
        let rows = global_radar_rows(catalog.global());
        assert_eq!(rows.len(), 4);
        let sc_iou = rows.iter().find(|row| row.metric == MetricKind::ScIou).unwrap();
        assert_eq!(sc_iou.value(Algorithm::SaLane), Some(1.0));
    }

    #[test]
    fn formats_fps_by_magnitude() {
        assert_eq!(format_metric(MetricKind::Fps, 161.4), "161");
        assert_eq!(format_metric(MetricKind::Fps, 48.0), "48.0");
        assert_eq!(format_metric(MetricKind::Score, 0.92354), "0.924");
    }
}
