//! Selector state for the dashboard and the pure derivations over it.

use serde::Serialize;

use crate::backend::InputMetadata;
use crate::catalog::{Algorithm, AlgorithmMetrics, Catalogs, Resolution, Scenario};
use crate::scoring::{self, ScoringError};

/// The three selectors that decide which catalog rows are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub scenario: Scenario,
    pub current_input: Option<String>,
    pub normalize: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scenario: Scenario::default(),
            current_input: None,
            normalize: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    SelectScenario(Scenario),
    SelectInput(String),
    ToggleNormalize,
    /// Backend metadata for the current input arrived.
    MetadataArrived(InputMetadata),
}

/// Where a [`MetricsSlice`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "sample", rename_all = "snake_case")]
pub enum SliceSource {
    Sample(String),
    Aggregate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSlice<'a> {
    pub metrics: &'a AlgorithmMetrics,
    pub is_sample: bool,
}

pub fn reduce(state: ViewState, event: ViewEvent) -> ViewState {
    match event {
        ViewEvent::SelectScenario(scenario) => ViewState { scenario, ..state },
        ViewEvent::SelectInput(input) => ViewState {
            current_input: Some(input),
            ..state
        },
        ViewEvent::ToggleNormalize => ViewState {
            normalize: !state.normalize,
            ..state
        },
        ViewEvent::MetadataArrived(metadata) => match metadata.scenario() {
            Some(scenario) => ViewState { scenario, ..state },
            None => {
                if let Some(scene) = &metadata.scene {
                    tracing::debug!("Keeping scenario {}: unrecognised scene {scene:?}", state.scenario);
                }
                state
            }
        },
    }
}

impl ViewState {
    pub fn with_normalize(normalize: bool) -> Self {
        Self {
            normalize,
            ..Self::default()
        }
    }

    /// Sample override for the current input when one exists, else the
    /// scenario aggregate.
    pub fn metrics_slice<'a>(&self, catalogs: &'a Catalogs) -> MetricsSlice<'a> {
        let sample = self
            .current_input
            .as_deref()
            .and_then(|input| catalogs.samples.lookup(self.scenario, input));
        match sample {
            Some(metrics) => MetricsSlice {
                metrics,
                is_sample: true,
            },
            None => MetricsSlice {
                metrics: catalogs.performance.lookup(self.scenario),
                is_sample: false,
            },
        }
    }

    pub fn slice_source(&self, catalogs: &Catalogs) -> SliceSource {
        match (self.metrics_slice(catalogs).is_sample, &self.current_input) {
            (true, Some(input)) => SliceSource::Sample(input.clone()),
            _ => SliceSource::Aggregate,
        }
    }

    pub fn best_algorithm(&self, catalogs: &Catalogs) -> Result<Algorithm, ScoringError> {
        scoring::pick_best_by_score(self.metrics_slice(catalogs).metrics)
    }

    pub fn decision(&self, catalogs: &Catalogs) -> Resolution {
        catalogs.decisions.resolve_best(self.scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogs() -> Catalogs {
        Catalogs::builtin().unwrap()
    }

    #[test]
    fn reducer_updates_one_selector_at_a_time() {
        let state = ViewState::default();
        let state = reduce(state, ViewEvent::SelectScenario(Scenario::Occlusion));
        let state = reduce(state, ViewEvent::SelectInput("input4.jpg".into()));
        let state = reduce(state, ViewEvent::ToggleNormalize);
        assert_eq!(
            state,
            ViewState {
                scenario: Scenario::Occlusion,
                current_input: Some("input4.jpg".into()),
                normalize: false,
            }
        );
    }

    #[test]
    fn metadata_switches_only_known_scenes() {
        let state = ViewState::default();
        let arrived = |scene: Option<&str>| {
            ViewEvent::MetadataArrived(InputMetadata {
                scene: scene.map(String::from),
                output: None,
            })
        };
        let switched = reduce(state.clone(), arrived(Some("光照变化")));
        assert_eq!(switched.scenario, Scenario::Lighting);

        let unknown = reduce(switched.clone(), arrived(Some("未配置场景")));
        assert_eq!(unknown, switched);
        let missing = reduce(switched.clone(), arrived(None));
        assert_eq!(missing, switched);
    }

    #[test]
    fn standard_scenario_without_override_picks_sa_lane() {
        let catalogs = catalogs();
        let state = ViewState::default();
        let slice = state.metrics_slice(&catalogs);
        assert!(!slice.is_sample);
        assert_eq!(state.slice_source(&catalogs), SliceSource::Aggregate);
        assert_eq!(state.best_algorithm(&catalogs).unwrap(), Algorithm::SaLane);
    }

    #[test]
    fn sample_override_supersedes_aggregate() {
        let catalogs = catalogs();
        let state = ViewState {
            scenario: Scenario::Lighting,
            current_input: Some("input3.jpg".into()),
            normalize: true,
        };
        let slice = state.metrics_slice(&catalogs);
        assert!(slice.is_sample);
        assert_eq!(
            Some(slice.metrics),
            catalogs.samples.lookup(Scenario::Lighting, "input3.jpg")
        );
        assert_eq!(
            state.slice_source(&catalogs),
            SliceSource::Sample("input3.jpg".into())
        );
    }

    #[test]
    fn unknown_sample_falls_back_to_aggregate() {
        let catalogs = catalogs();
        let state = ViewState {
            scenario: Scenario::Lighting,
            current_input: Some("input42.jpg".into()),
            normalize: true,
        };
        let slice = state.metrics_slice(&catalogs);
        assert!(!slice.is_sample);
        assert_eq!(slice.metrics, catalogs.performance.lookup(Scenario::Lighting));
    }

    #[test]
    fn decision_follows_scenario() {
        let catalogs = catalogs();
        let state = reduce(
            ViewState::default(),
            ViewEvent::SelectScenario(Scenario::ComplexRoad),
        );
        let entry = state.decision(&catalogs);
        assert_eq!(entry.entry().unwrap().scenario, Scenario::ComplexRoad);
    }
}
