//! TuSimple-format lane annotations shown next to the comparison images.
//!
//! A record lists sample rows (`h_samples`) and, per lane, the x coordinate
//! at each row or `-2` where the lane is not visible.

use serde::{Deserialize, Serialize};

use crate::catalog::Scenario;

pub const DEMO_RAW_FILE: &str = "clips/demo/input1.jpg";
/// Marker for "no lane point on this row".
pub const NO_POINT: i32 = -2;

const H_SAMPLE_START: u32 = 240;
const H_SAMPLE_STEP: u32 = 10;
const H_SAMPLE_COUNT: usize = 48;

const STANDARD_LEFT_LANE: [i32; H_SAMPLE_COUNT] = [
    -2, -2, 580, 582, 585, 588, 592, 596, 600, 604, 608, 612, 616, 620, 624, 628, 632, 636, 640,
    644, 648, 652, 656, 660, 664, 668, 672, 676, 680, 684, 688, 692, 696, 700, 704, 708, 712, 716,
    720, 724, 728, 732, 736, 740, 744, 748, 752, 756,
];

const STANDARD_RIGHT_LANE: [i32; H_SAMPLE_COUNT] = [
    -2, -2, 760, 758, 756, 754, 752, 750, 748, 746, 744, 742, 740, 738, 736, 734, 732, 730, 728,
    726, 724, 722, 720, 718, 716, 714, 712, 710, 708, 706, 704, 702, 700, 698, 696, 694, 692, 690,
    688, 686, 684, 682, 680, 678, 676, 674, 672, 670,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuSimpleRecord {
    pub raw_file: String,
    pub h_samples: Vec<u32>,
    pub lanes: Vec<Vec<i32>>,
}

impl TuSimpleRecord {
    /// Rows with no lanes for the given source image.
    pub fn placeholder(raw_file: impl Into<String>) -> Self {
        Self {
            raw_file: raw_file.into(),
            h_samples: h_samples(),
            lanes: Vec::new(),
        }
    }

    /// Visible points of one lane as `(x, y)` pairs.
    pub fn lane_points(&self, lane: usize) -> Vec<(i32, u32)> {
        let Some(xs) = self.lanes.get(lane) else {
            return Vec::new();
        };
        xs.iter()
            .zip(&self.h_samples)
            .filter(|(x, _)| **x != NO_POINT)
            .map(|(x, y)| (*x, *y))
            .collect()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The standard 48 sample rows from y = 240 in steps of 10.
pub fn h_samples() -> Vec<u32> {
    (0..H_SAMPLE_COUNT as u32)
        .map(|index| H_SAMPLE_START + index * H_SAMPLE_STEP)
        .collect()
}

/// Bundled annotation for the scenario, or a lane-less placeholder naming the
/// current upload.
pub fn preview_for(scenario: Scenario, current_input: Option<&str>) -> TuSimpleRecord {
    match scenario {
        Scenario::Standard => TuSimpleRecord {
            raw_file: DEMO_RAW_FILE.to_string(),
            h_samples: h_samples(),
            lanes: vec![STANDARD_LEFT_LANE.to_vec(), STANDARD_RIGHT_LANE.to_vec()],
        },
        _ => match current_input {
            Some(input) => TuSimpleRecord::placeholder(format!("uploads/{input}")),
            None => TuSimpleRecord::placeholder(DEMO_RAW_FILE),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rows_span_240_to_710() {
        let rows = h_samples();
        assert_eq!(rows.len(), 48);
        assert_eq!(rows.first(), Some(&240));
        assert_eq!(rows.last(), Some(&710));
    }

    #[test]
    fn standard_record_has_two_full_lanes() {
        let record = preview_for(Scenario::Standard, Some("input1.jpg"));
        assert_eq!(record.raw_file, DEMO_RAW_FILE);
        assert_eq!(record.lanes.len(), 2);
        assert!(record.lanes.iter().all(|lane| lane.len() == record.h_samples.len()));
        let left = record.lane_points(0);
        assert_eq!(left.len(), 46);
        assert_eq!(left[0], (580, 260));
    }

    #[test]
    fn other_scenarios_fall_back_to_placeholder() {
        let record = preview_for(Scenario::Occlusion, Some("input4.jpg"));
        assert_eq!(record.raw_file, "uploads/input4.jpg");
        assert!(record.lanes.is_empty());
        assert!(record.lane_points(0).is_empty());
        assert_eq!(preview_for(Scenario::Lighting, None).raw_file, DEMO_RAW_FILE);
    }

    #[test]
    fn serializes_with_tusimple_field_names() {
        let json = preview_for(Scenario::AdverseWeather, None).to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("raw_file").is_some());
        assert_eq!(value["h_samples"].as_array().unwrap().len(), 48);
        assert_eq!(value["lanes"], serde_json::json!([]));
    }
}
