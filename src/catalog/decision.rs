use std::collections::BTreeMap;

use serde::Serialize;

use super::{Algorithm, CatalogError, Scenario, tables};

/// Editorial recommendation for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionEntry {
    pub scenario: Scenario,
    /// Contribution of this scenario to the overall multi-scenario score.
    pub weight: f64,
    pub best: Algorithm,
    pub backup: Algorithm,
    pub rationale: String,
}

/// Outcome of [`DecisionCatalog::resolve_best`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Available(DecisionEntry),
    Unavailable,
}

impl Resolution {
    pub fn entry(&self) -> Option<&DecisionEntry> {
        match self {
            Self::Available(entry) => Some(entry),
            Self::Unavailable => None,
        }
    }
}

/// Static scenario → recommendation table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionCatalog {
    entries: BTreeMap<Scenario, DecisionEntry>,
}

impl DecisionCatalog {
    /// Build from raw `(scenario, weight, best, backup, rationale)` rows.
    ///
    /// Best and backup labels are normalized; an unknown label is a
    /// configuration error.
    pub fn from_rows<'a, I>(rows: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (Scenario, f64, &'a str, &'a str, &'a str)>,
    {
        let mut entries = BTreeMap::new();
        for (scenario, weight, best, backup, rationale) in rows {
            let entry = DecisionEntry {
                scenario,
                weight,
                best: Algorithm::normalize(best)?,
                backup: Algorithm::normalize(backup)?,
                rationale: rationale.to_string(),
            };
            entries.insert(scenario, entry);
        }
        Ok(Self { entries })
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_rows(tables::DECISIONS)
    }

    pub fn resolve_best(&self, scenario: Scenario) -> Resolution {
        match self.entries.get(&scenario) {
            Some(entry) => Resolution::Available(entry.clone()),
            None => Resolution::Unavailable,
        }
    }

    /// Sum of all scenario weights; the bundled table partitions 1.0.
    pub fn weight_total(&self) -> f64 {
        self.entries.values().map(|entry| entry.weight).sum()
    }
}
