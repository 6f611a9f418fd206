//! Benchmark tables: per-scenario performance, per-sample overrides and the
//! editorial decision table.
//!
//! All catalogs are built once at startup and never mutated afterwards. A
//! build failure is a configuration error and aborts startup.

mod algorithm;
mod decision;
mod metrics;
mod performance;
mod scenario;
pub mod tables;

use thiserror::Error;

pub use algorithm::Algorithm;
pub use decision::{DecisionCatalog, DecisionEntry, Resolution};
pub use metrics::{AlgorithmMetrics, MetricKind, MetricSet, round_decimals};
pub use performance::{PerformanceCatalog, SampleOverrides, SceneF1Table};
pub use scenario::Scenario;

/// Configuration errors detected while building or querying the catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A known algorithm has no entry in the global aggregate table.
    #[error("Global aggregate table has no entry for {algorithm}")]
    MissingGlobalEntry { algorithm: Algorithm },
    /// A label does not name any known algorithm.
    #[error("Unknown algorithm label {label:?}")]
    UnknownAlgorithm { label: String },
    /// A label does not name any known scenario.
    #[error("Unknown scenario {label:?}")]
    UnknownScenario { label: String },
}

/// The three immutable catalogs consulted by the view.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub performance: PerformanceCatalog,
    pub samples: SampleOverrides,
    pub decisions: DecisionCatalog,
}

impl Catalogs {
    /// Build every catalog from the bundled tables.
    pub fn builtin() -> Result<Self, CatalogError> {
        let catalogs = Self {
            performance: PerformanceCatalog::builtin()?,
            samples: SampleOverrides::builtin(),
            decisions: DecisionCatalog::builtin()?,
        };
        tracing::debug!(
            "Catalogs built: {} scenarios, {} algorithms",
            catalogs.performance.scenarios().count(),
            catalogs.performance.global().len()
        );
        Ok(catalogs)
    }
}
