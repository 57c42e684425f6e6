//! FILENAME: core/cube-engine/benches/cube_grouping.rs
//! Full-recompute cost of grouping and totals on a synthetic dataset.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cube_engine::{
    compute_filtered_data, compute_groups, create_dimension, create_measure, AggregationType,
    CubeConfig, CubeValue, DimensionSpec, MeasureSpec,
};

struct Row {
    project: u32,
    contractor: u32,
    hours: f64,
}

fn build_config(rows: usize) -> CubeConfig<Row> {
    let data = (0..rows)
        .map(|i| Row {
            project: (i % 50) as u32,
            contractor: (i % 7) as u32,
            hours: (i % 9) as f64 * 0.5,
        })
        .collect();
    let dims = vec![
        create_dimension(DimensionSpec::new("project", "Project").value(|r: &Row| CubeValue::from(r.project)))
            .unwrap(),
        create_dimension(
            DimensionSpec::new("contractor", "Contractor").value(|r: &Row| CubeValue::from(r.contractor)),
        )
        .unwrap(),
    ];
    let measures = vec![
        create_measure(
            MeasureSpec::new("hours", "Hours")
                .value(|r: &Row| Some(r.hours))
                .aggregation(AggregationType::Sum),
        )
        .unwrap(),
        create_measure(
            MeasureSpec::new("avg", "Average")
                .value(|r: &Row| Some(r.hours))
                .aggregation(AggregationType::Average),
        )
        .unwrap(),
    ];
    CubeConfig::new(data, dims, measures).unwrap()
}

fn bench_grouping(c: &mut Criterion) {
    let config = build_config(100_000);
    let items = compute_filtered_data(&config, &[]).unwrap();

    c.bench_function("group_100k_by_project", |b| {
        b.iter(|| compute_groups(black_box(&config), black_box(&items), Some("project")).unwrap())
    });
}

criterion_group!(benches, bench_grouping);
criterion_main!(benches);
