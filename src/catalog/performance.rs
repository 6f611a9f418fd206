use std::collections::BTreeMap;

use super::{Algorithm, AlgorithmMetrics, CatalogError, MetricSet, Scenario, round_decimals, tables};

/// Decimal places kept when rescaling S.
const SCORE_PRECISION: i32 = 5;

/// Per-scenario F1 figures that replace the aggregate F1.
pub type SceneF1Table = BTreeMap<Scenario, BTreeMap<Algorithm, f64>>;

/// Scenario-level metrics derived from the global aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceCatalog {
    global: AlgorithmMetrics,
    by_scenario: BTreeMap<Scenario, AlgorithmMetrics>,
}

impl PerformanceCatalog {
    /// Derive one metric map per scenario.
    ///
    /// The scene F1 replaces the global F1 (falling back to it when absent),
    /// and S is the global S scaled by `f1_scene / f1_global`, rounded to five
    /// decimals. Every algorithm must have a global entry.
    pub fn build(
        global: &AlgorithmMetrics,
        scene_f1: &SceneF1Table,
        scenarios: &[Scenario],
        algorithms: &[Algorithm],
    ) -> Result<Self, CatalogError> {
        let mut by_scenario = BTreeMap::new();
        for &scenario in scenarios {
            let overrides = scene_f1.get(&scenario);
            let mut metrics = AlgorithmMetrics::new();
            for &algorithm in algorithms {
                let base = global
                    .get(algorithm)
                    .ok_or(CatalogError::MissingGlobalEntry { algorithm })?;
                let f1_scene = overrides
                    .and_then(|table| table.get(&algorithm).copied())
                    .unwrap_or(base.f1);
                metrics.insert(algorithm, rescale(base, f1_scene));
            }
            by_scenario.insert(scenario, metrics);
        }
        Ok(Self {
            global: global.clone(),
            by_scenario,
        })
    }

    /// Build from the bundled tables for all five scenarios and six algorithms.
    pub fn builtin() -> Result<Self, CatalogError> {
        let global = tables::GLOBAL_AGGREGATE.into_iter().collect::<AlgorithmMetrics>();
        let scene_f1 = tables::SCENE_F1
            .into_iter()
            .map(|(scenario, row)| (scenario, row.into_iter().collect()))
            .collect::<SceneF1Table>();
        Self::build(&global, &scene_f1, &Scenario::ALL, &Algorithm::ALL)
    }

    /// Full per-algorithm map for a scenario.
    ///
    /// Every scenario passed to [`PerformanceCatalog::build`] has an entry;
    /// others yield an empty map.
    pub fn lookup(&self, scenario: Scenario) -> &AlgorithmMetrics {
        static EMPTY: AlgorithmMetrics = AlgorithmMetrics::empty();
        self.by_scenario.get(&scenario).unwrap_or(&EMPTY)
    }

    /// The multi-scenario aggregate the catalog was built from.
    pub fn global(&self) -> &AlgorithmMetrics {
        &self.global
    }

    pub fn scenarios(&self) -> impl Iterator<Item = Scenario> + '_ {
        self.by_scenario.keys().copied()
    }
}

fn rescale(base: &MetricSet, f1_scene: f64) -> MetricSet {
    let score = match base.score {
        Some(score) if base.f1 > 0.0 && base.f1.is_finite() => {
            Some(round_decimals(score * (f1_scene / base.f1), SCORE_PRECISION))
        }
        other => other,
    };
    MetricSet {
        f1: f1_scene,
        score,
        ..*base
    }
}

/// Per-image metrics that replace the scenario aggregate for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleOverrides {
    by_scenario: BTreeMap<Scenario, BTreeMap<String, AlgorithmMetrics>>,
}

impl SampleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut overrides = Self::new();
        for (scenario, sample, rows) in tables::SAMPLE_OVERRIDES {
            overrides.insert(scenario, sample, rows.into_iter().collect());
        }
        overrides
    }

    pub fn insert(&mut self, scenario: Scenario, sample: impl Into<String>, metrics: AlgorithmMetrics) {
        self.by_scenario
            .entry(scenario)
            .or_default()
            .insert(sample.into(), metrics);
    }

    /// Metrics measured for `sample` under `scenario`, if any were recorded.
    pub fn lookup(&self, scenario: Scenario, sample: &str) -> Option<&AlgorithmMetrics> {
        self.by_scenario.get(&scenario)?.get(sample)
    }

    /// Sample identifiers recorded for a scenario, in sorted order.
    pub fn samples(&self, scenario: Scenario) -> impl Iterator<Item = &str> {
        self.by_scenario
            .get(&scenario)
            .into_iter()
            .flat_map(|samples| samples.keys().map(String::as_str))
    }
}
