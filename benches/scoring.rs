use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lanescope::catalog::{Catalogs, Scenario};
use lanescope::scoring;
use lanescope::view::ViewState;

const SERIES_LEN: usize = 1_000;

fn series() -> Vec<f64> {
    (0..SERIES_LEN).map(|i| (i % 97) as f64 * 1.5).collect()
}

fn bench_pick_best(c: &mut Criterion) {
    let catalogs = Catalogs::builtin().expect("catalogs");
    c.bench_function("pick_best_all_scenarios", |b| {
        b.iter(|| {
            for scenario in Scenario::ALL {
                let slice = catalogs.performance.lookup(scenario);
                black_box(scoring::pick_best_by_score(black_box(slice)).ok());
            }
        });
    });
}

fn bench_normalize(c: &mut Criterion) {
    let values = series();
    c.bench_with_input(
        BenchmarkId::new("normalize_by_max", SERIES_LEN),
        &values,
        |b, values| {
            b.iter(|| black_box(scoring::normalize_by_max(black_box(values))));
        },
    );
}

fn bench_chart_rows(c: &mut Criterion) {
    let catalogs = Catalogs::builtin().expect("catalogs");
    let state = ViewState {
        scenario: Scenario::Lighting,
        current_input: Some("input3.jpg".to_string()),
        normalize: true,
    };
    c.bench_function("chart_rows_for_sample", |b| {
        b.iter(|| {
            let slice = state.metrics_slice(&catalogs);
            black_box(scoring::metric_rows(slice.metrics, state.normalize));
            black_box(scoring::radar_pair_rows(
                slice.metrics,
                scoring::RADAR_PAIR.0,
                scoring::RADAR_PAIR.1,
            ));
        });
    });
}

criterion_group!(benches, bench_pick_best, bench_normalize, bench_chart_rows);
criterion_main!(benches);
