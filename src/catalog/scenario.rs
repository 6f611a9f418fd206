use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CatalogError;

/// Driving-condition category used to partition benchmark data.
///
/// Variant order is display order only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scenario {
    /// Clear-weather highway.
    Standard,
    /// Rain and fog.
    AdverseWeather,
    /// Glare and backlight.
    Lighting,
    /// Vehicles or pedestrians hiding lane markings.
    Occlusion,
    /// Curves and roundabouts.
    ComplexRoad,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Standard,
        Scenario::AdverseWeather,
        Scenario::Lighting,
        Scenario::Occlusion,
        Scenario::ComplexRoad,
    ];

    /// Label used by the benchmark tables and the backend classifier.
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "标准场景",
            Self::AdverseWeather => "恶劣天气",
            Self::Lighting => "光照变化",
            Self::Occlusion => "遮挡路况",
            Self::ComplexRoad => "复杂路况",
        }
    }

    /// ASCII name accepted on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::AdverseWeather => "adverse-weather",
            Self::Lighting => "lighting",
            Self::Occlusion => "occlusion",
            Self::ComplexRoad => "complex-road",
        }
    }

    pub fn parse(raw: &str) -> Result<Scenario, CatalogError> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.label() == trimmed || scenario.slug().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CatalogError::UnknownScenario {
                label: trimmed.to_string(),
            })
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Scenario {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Scenario {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Scenario> for String {
    fn from(value: Scenario) -> Self {
        value.label().to_string()
    }
}
