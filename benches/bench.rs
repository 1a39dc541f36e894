// Criterion benchmarks for Harmony Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use harmony_algo::core::ranking::{PredictionError, Predictor};
use harmony_algo::core::{aggregate_preferences, haversine_distance, Recommender};
use harmony_algo::models::{Destination, DestinationTable, FamilyMember, FilterCriteria};
use std::collections::HashMap;
use std::sync::Arc;

const FEATURE_COLUMNS: [&str; 4] = [
    "Calif promedio playas",
    "Calif promedio museos",
    "Calif promedio parques",
    "Calif promedio restaurantes",
];

/// Weighted-sum stand-in with the cost profile of a linear model
struct BenchModel {
    columns: Vec<String>,
}

impl Predictor for BenchModel {
    fn feature_columns(&self) -> &[String] {
        &self.columns
    }

    fn predict(&self, matrix: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError> {
        Ok(matrix
            .iter()
            .map(|row| row.iter().enumerate().map(|(i, v)| v * (i + 1) as f64).sum())
            .collect())
    }
}

fn create_destination(id: usize) -> Destination {
    let features: HashMap<String, f64> = FEATURE_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, col)| (col.to_string(), ((id + i) % 6) as f64))
        .collect();

    Destination {
        name: format!("Destino {}", id),
        province: if id % 2 == 0 { "Guayas" } else { "Pichincha" }.to_string(),
        canton: "Centro".to_string(),
        parish: "Centro".to_string(),
        lat: -2.0 - (id % 40) as f64 * 0.05,
        lon: -79.5 - (id % 40) as f64 * 0.05,
        score: Some(((id % 6) as f64) * 0.9),
        features,
    }
}

fn create_table(rows: usize) -> DestinationTable {
    DestinationTable {
        feature_columns: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        has_score: true,
        rows: (0..rows).map(create_destination).collect(),
    }
}

fn create_family(members: usize) -> Vec<FamilyMember> {
    (0..members)
        .map(|i| FamilyMember {
            name: format!("Miembro {}", i),
            role: "Otro".to_string(),
            preferences: [
                ("playas".to_string(), (i % 6) as f64),
                ("museos".to_string(), ((i + 2) % 6) as f64),
            ]
            .into(),
        })
        .collect()
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(-2.1894),
                black_box(-79.8891),
                black_box(-0.1807),
                black_box(-78.4678),
            )
        });
    });
}

fn bench_aggregate_preferences(c: &mut Criterion) {
    let columns: Vec<String> = FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect();
    let family = create_family(6);

    c.bench_function("aggregate_preferences_6_members", |b| {
        b.iter(|| aggregate_preferences(black_box(&family), black_box(&columns)));
    });
}

fn bench_recommend_pipeline(c: &mut Criterion) {
    let recommender = Recommender::new(Arc::new(BenchModel {
        columns: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
    }));
    let family = create_family(4);
    let criteria = FilterCriteria {
        interest_categories: Some(vec!["playas".to_string()]),
        origin: Some((-2.19, -79.88)),
        max_distance_km: Some(500.0),
        ..Default::default()
    };

    let mut group = c.benchmark_group("recommend_pipeline");
    for size in [100, 1_000, 10_000] {
        let table = create_table(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| {
                recommender
                    .recommend(black_box(table.clone()), &family, &criteria, 10)
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_aggregate_preferences,
    bench_recommend_pipeline
);
criterion_main!(benches);
