use serde::{Deserialize, Serialize, Serializer};

use super::Algorithm;

/// Measurements for one (algorithm, scenario[, sample]) combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub accuracy: f64,
    pub f1: f64,
    /// Frames per second; no fixed upper bound.
    pub fps: f64,
    pub sc_iou: f64,
    #[serde(rename = "fp", default, skip_serializing_if = "Option::is_none")]
    pub false_positive_rate: Option<f64>,
    #[serde(rename = "fn", default, skip_serializing_if = "Option::is_none")]
    pub false_negative_rate: Option<f64>,
    /// Composite score S. Missing scores never win a ranking.
    #[serde(rename = "S", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl MetricSet {
    /// Full aggregate entry, as published for the global and scene tables.
    pub const fn aggregate(
        accuracy: f64,
        f1: f64,
        fps: f64,
        sc_iou: f64,
        false_positive_rate: f64,
        false_negative_rate: f64,
        score: f64,
    ) -> Self {
        Self {
            accuracy,
            f1,
            fps,
            sc_iou,
            false_positive_rate: Some(false_positive_rate),
            false_negative_rate: Some(false_negative_rate),
            score: Some(score),
        }
    }

    /// Per-image measurement; error rates are not recorded per sample.
    pub const fn sample(accuracy: f64, f1: f64, fps: f64, sc_iou: f64, score: f64) -> Self {
        Self {
            accuracy,
            f1,
            fps,
            sc_iou,
            false_positive_rate: None,
            false_negative_rate: None,
            score: Some(score),
        }
    }

    pub fn value(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Accuracy => Some(self.accuracy),
            MetricKind::F1 => Some(self.f1),
            MetricKind::Fps => Some(self.fps),
            MetricKind::ScIou => Some(self.sc_iou),
            MetricKind::FalsePositiveRate => self.false_positive_rate,
            MetricKind::FalseNegativeRate => self.false_negative_rate,
            MetricKind::Score => self.score,
        }
    }
}

/// Named field of a [`MetricSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Accuracy,
    F1,
    Fps,
    ScIou,
    FalsePositiveRate,
    FalseNegativeRate,
    Score,
}

impl MetricKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Accuracy => "Accuracy",
            Self::F1 => "F1",
            Self::Fps => "FPS",
            Self::ScIou => "SC-IoU",
            Self::FalsePositiveRate => "FP",
            Self::FalseNegativeRate => "FN",
            Self::Score => "Score S",
        }
    }
}

impl Serialize for MetricKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Metrics keyed by algorithm, kept in insertion order.
///
/// Insertion order is significant: ranking ties resolve to the earliest entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmMetrics {
    entries: Vec<(Algorithm, MetricSet)>,
}

impl AlgorithmMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace, keeping the original position on replace.
    pub fn insert(&mut self, algorithm: Algorithm, metrics: MetricSet) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == algorithm) {
            Some((_, slot)) => *slot = metrics,
            None => self.entries.push((algorithm, metrics)),
        }
    }

    pub fn get(&self, algorithm: Algorithm) -> Option<&MetricSet> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == algorithm)
            .map(|(_, metrics)| metrics)
    }

    pub fn contains(&self, algorithm: Algorithm) -> bool {
        self.get(algorithm).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, &MetricSet)> {
        self.entries.iter().map(|(algorithm, metrics)| (*algorithm, metrics))
    }

    pub fn algorithms(&self) -> impl Iterator<Item = Algorithm> + '_ {
        self.entries.iter().map(|(algorithm, _)| *algorithm)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Algorithm, MetricSet)> for AlgorithmMetrics {
    fn from_iter<I: IntoIterator<Item = (Algorithm, MetricSet)>>(iter: I) -> Self {
        let mut metrics = Self::new();
        for (algorithm, set) in iter {
            metrics.insert(algorithm, set);
        }
        metrics
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_decimals(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut metrics = AlgorithmMetrics::new();
        metrics.insert(Algorithm::PiNet, MetricSet::sample(0.9, 0.9, 40.0, 0.7, 0.8));
        metrics.insert(Algorithm::Ufld, MetricSet::sample(0.9, 0.8, 300.0, 0.6, 0.7));
        metrics.insert(Algorithm::PiNet, MetricSet::sample(0.9, 0.95, 40.0, 0.7, 0.85));
        let order = metrics.algorithms().collect::<Vec<_>>();
        assert_eq!(order, vec![Algorithm::PiNet, Algorithm::Ufld]);
        assert_eq!(metrics.get(Algorithm::PiNet).unwrap().score, Some(0.85));
    }

    #[test]
    fn sample_entries_leave_error_rates_empty() {
        let set = MetricSet::sample(0.965, 0.952, 310.0, 0.68, 0.884);
        assert_eq!(set.value(MetricKind::FalsePositiveRate), None);
        assert_eq!(set.value(MetricKind::Fps), Some(310.0));
    }

    #[test]
    fn serde_uses_short_field_names() {
        let set = MetricSet::aggregate(0.97, 0.954, 161.0, 0.808, 3.18, 2.56, 0.90365);
        let json = serde_json::to_value(set).unwrap();
        assert_eq!(json["S"], 0.90365);
        assert_eq!(json["fp"], 3.18);
        let parsed: MetricSet =
            serde_json::from_str(r#"{"accuracy":1,"f1":1,"fps":1,"sc_iou":1}"#).unwrap();
        assert_eq!(parsed.score, None);
    }

    #[test]
    fn rounding_matches_fixed_decimals() {
        assert_eq!(round_decimals(0.923_541_7, 5), 0.92354);
        assert_eq!(round_decimals(1.0004, 3), 1.0);
        assert_eq!(round_decimals(0.0, 5), 0.0);
    }
}
