use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CatalogError;

/// Lane-detection methods compared by the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    Ufld,
    UfldV2,
    PiNet,
    PolarRcnn,
    UfldV2Plus,
    /// The proposed scene-adaptive method.
    SaLane,
}

impl Algorithm {
    /// Every algorithm in catalog insertion order.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Ufld,
        Algorithm::UfldV2,
        Algorithm::PiNet,
        Algorithm::PolarRcnn,
        Algorithm::UfldV2Plus,
        Algorithm::SaLane,
    ];

    /// Canonical display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ufld => "UFLD",
            Self::UfldV2 => "UFLDv2",
            Self::PiNet => "PINet",
            Self::PolarRcnn => "Polar R-CNN",
            Self::UfldV2Plus => "UFLDv2+",
            Self::SaLane => "SA-Lane (Ours)",
        }
    }

    /// Map a raw label variant onto its canonical algorithm.
    ///
    /// `UFLDv2原始` and `UFLDv2-original` resolve to [`Algorithm::UfldV2`];
    /// `SA-Lane` and `自适应框架` resolve to [`Algorithm::SaLane`]. Anything
    /// else is a configuration error.
    pub fn normalize(raw: &str) -> Result<Algorithm, CatalogError> {
        match raw.trim() {
            "UFLD" => Ok(Self::Ufld),
            "UFLDv2" | "UFLDv2原始" | "UFLDv2-original" => Ok(Self::UfldV2),
            "PINet" => Ok(Self::PiNet),
            "Polar R-CNN" => Ok(Self::PolarRcnn),
            "UFLDv2+" => Ok(Self::UfldV2Plus),
            "SA-Lane (Ours)" | "SA-Lane" | "自适应框架" => Ok(Self::SaLane),
            other => Err(CatalogError::UnknownAlgorithm {
                label: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl TryFrom<String> for Algorithm {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value)
    }
}

impl From<Algorithm> for String {
    fn from(value: Algorithm) -> Self {
        value.label().to_string()
    }
}
