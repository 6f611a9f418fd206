//! Published benchmark figures bundled with the binary.
//!
//! Labels stay in their raw published form and go through
//! [`Algorithm::normalize`] when the catalogs are built.

use super::{Algorithm, MetricSet, Scenario};

/// Multi-scenario aggregate per algorithm (accuracy, f1, fps, sc_iou, fp, fn, S).
pub const GLOBAL_AGGREGATE: [(Algorithm, MetricSet); 6] = [
    (Algorithm::Ufld, MetricSet::aggregate(0.964, 0.905, 312.0, 0.67, 5.8, 4.9, 0.84)),
    (Algorithm::UfldV2, MetricSet::aggregate(0.97, 0.925, 185.0, 0.71, 4.5, 3.8, 0.86075)),
    (Algorithm::PiNet, MetricSet::aggregate(0.967, 0.94, 48.0, 0.75, 3.7, 2.8, 0.7915)),
    (Algorithm::PolarRcnn, MetricSet::aggregate(0.957, 0.945, 32.0, 0.78, 2.9, 2.5, 0.797)),
    (Algorithm::UfldV2Plus, MetricSet::aggregate(0.971, 0.948, 178.0, 0.755, 3.5, 3.4, 0.8976)),
    (Algorithm::SaLane, MetricSet::aggregate(0.97, 0.954, 161.0, 0.808, 3.18, 2.56, 0.90365)),
];

/// Per-scenario F1 in algorithm order; every other field comes from the aggregate.
pub const SCENE_F1: [(Scenario, [(Algorithm, f64); 6]); 5] = [
    (
        Scenario::Standard,
        [
            (Algorithm::Ufld, 0.952),
            (Algorithm::UfldV2, 0.958),
            (Algorithm::PiNet, 0.936),
            (Algorithm::PolarRcnn, 0.921),
            (Algorithm::UfldV2Plus, 0.967),
            (Algorithm::SaLane, 0.975),
        ],
    ),
    (
        Scenario::AdverseWeather,
        [
            (Algorithm::Ufld, 0.823),
            (Algorithm::UfldV2, 0.845),
            (Algorithm::PiNet, 0.910),
            (Algorithm::PolarRcnn, 0.892),
            (Algorithm::UfldV2Plus, 0.876),
            (Algorithm::SaLane, 0.900),
        ],
    ),
    (
        Scenario::Lighting,
        [
            (Algorithm::Ufld, 0.800),
            (Algorithm::UfldV2, 0.821),
            (Algorithm::PiNet, 0.903),
            (Algorithm::PolarRcnn, 0.886),
            (Algorithm::UfldV2Plus, 0.854),
            (Algorithm::SaLane, 0.918),
        ],
    ),
    (
        Scenario::Occlusion,
        [
            (Algorithm::Ufld, 0.817),
            (Algorithm::UfldV2, 0.839),
            (Algorithm::PiNet, 0.915),
            (Algorithm::PolarRcnn, 0.880),
            (Algorithm::UfldV2Plus, 0.894),
            (Algorithm::SaLane, 0.926),
        ],
    ),
    (
        Scenario::ComplexRoad,
        [
            (Algorithm::Ufld, 0.805),
            (Algorithm::UfldV2, 0.828),
            (Algorithm::PiNet, 0.874),
            (Algorithm::PolarRcnn, 0.930),
            (Algorithm::UfldV2Plus, 0.887),
            (Algorithm::SaLane, 0.921),
        ],
    ),
];

/// Measured metrics for the reference images, keyed by the uploaded file name.
pub const SAMPLE_OVERRIDES: [(Scenario, &str, [(Algorithm, MetricSet); 6]); 5] = [
    (
        Scenario::Standard,
        "input1.jpg",
        [
            (Algorithm::Ufld, MetricSet::sample(0.965, 0.952, 310.0, 0.680, 0.884)),
            (Algorithm::UfldV2, MetricSet::sample(0.972, 0.958, 185.0, 0.710, 0.892)),
            (Algorithm::PiNet, MetricSet::sample(0.968, 0.936, 50.0, 0.750, 0.830)),
            (Algorithm::PolarRcnn, MetricSet::sample(0.960, 0.921, 33.0, 0.780, 0.825)),
            (Algorithm::UfldV2Plus, MetricSet::sample(0.974, 0.967, 178.0, 0.755, 0.916)),
            (Algorithm::SaLane, MetricSet::sample(0.976, 0.975, 161.0, 0.820, 0.935)),
        ],
    ),
    (
        Scenario::AdverseWeather,
        "input2.jpg",
        [
            (Algorithm::Ufld, MetricSet::sample(0.940, 0.823, 300.0, 0.640, 0.760)),
            (Algorithm::UfldV2, MetricSet::sample(0.948, 0.845, 180.0, 0.690, 0.785)),
            (Algorithm::PiNet, MetricSet::sample(0.955, 0.910, 45.0, 0.740, 0.840)),
            (Algorithm::PolarRcnn, MetricSet::sample(0.952, 0.892, 30.0, 0.780, 0.835)),
            (Algorithm::UfldV2Plus, MetricSet::sample(0.956, 0.876, 170.0, 0.750, 0.820)),
            (Algorithm::SaLane, MetricSet::sample(0.960, 0.900, 155.0, 0.800, 0.870)),
        ],
    ),
    (
        Scenario::Lighting,
        "input3.jpg",
        [
            (Algorithm::Ufld, MetricSet::sample(0.938, 0.800, 305.0, 0.630, 0.745)),
            (Algorithm::UfldV2, MetricSet::sample(0.946, 0.821, 182.0, 0.680, 0.770)),
            (Algorithm::PiNet, MetricSet::sample(0.953, 0.903, 47.0, 0.740, 0.845)),
            (Algorithm::PolarRcnn, MetricSet::sample(0.950, 0.886, 31.0, 0.780, 0.835)),
            (Algorithm::UfldV2Plus, MetricSet::sample(0.955, 0.854, 175.0, 0.750, 0.810)),
            (Algorithm::SaLane, MetricSet::sample(0.962, 0.918, 158.0, 0.810, 0.890)),
        ],
    ),
    (
        Scenario::Occlusion,
        "input4.jpg",
        [
            (Algorithm::Ufld, MetricSet::sample(0.939, 0.817, 300.0, 0.640, 0.750)),
            (Algorithm::UfldV2, MetricSet::sample(0.947, 0.839, 183.0, 0.690, 0.780)),
            (Algorithm::PiNet, MetricSet::sample(0.956, 0.915, 46.0, 0.750, 0.855)),
            (Algorithm::PolarRcnn, MetricSet::sample(0.952, 0.880, 30.0, 0.790, 0.840)),
            (Algorithm::UfldV2Plus, MetricSet::sample(0.958, 0.894, 176.0, 0.760, 0.830)),
            (Algorithm::SaLane, MetricSet::sample(0.964, 0.926, 159.0, 0.820, 0.900)),
        ],
    ),
    (
        Scenario::ComplexRoad,
        "input5.jpg",
        [
            (Algorithm::Ufld, MetricSet::sample(0.937, 0.805, 298.0, 0.630, 0.740)),
            (Algorithm::UfldV2, MetricSet::sample(0.945, 0.828, 181.0, 0.685, 0.770)),
            (Algorithm::PiNet, MetricSet::sample(0.952, 0.874, 47.0, 0.745, 0.830)),
            (Algorithm::PolarRcnn, MetricSet::sample(0.955, 0.930, 31.0, 0.800, 0.880)),
            (Algorithm::UfldV2Plus, MetricSet::sample(0.957, 0.887, 177.0, 0.760, 0.840)),
            (Algorithm::SaLane, MetricSet::sample(0.963, 0.921, 160.0, 0.815, 0.895)),
        ],
    ),
];

/// Editorial recommendation per scenario: (scenario, weight, best, backup, rationale).
pub const DECISIONS: [(Scenario, f64, &str, &str, &str); 5] = [
    (
        Scenario::Standard,
        0.60,
        "UFLDv2+",
        "UFLDv2原始",
        "速度与精度最佳平衡，FPS=178满足实时性",
    ),
    (
        Scenario::AdverseWeather,
        0.08,
        "Polar R-CNN",
        "自适应框架",
        "SC-IoU最高(0.78)，结构建模抗干扰最强",
    ),
    (
        Scenario::Lighting,
        0.08,
        "PINet",
        "UFLDv2+",
        "关键点检测对光照变化最鲁棒",
    ),
    (
        Scenario::Occlusion,
        0.16,
        "PINet",
        "自适应框架",
        "实例分割最适合部分遮挡恢复",
    ),
    (
        Scenario::ComplexRoad,
        0.08,
        "Polar R-CNN",
        "自适应框架",
        "曲线拟合能力最强，SC-IoU最高",
    ),
];
