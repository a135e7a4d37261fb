//! Benchmarks for schema validation and the statistical helpers.

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use vigilance::constraints::{Contains, Range};
use vigilance::core::{MetaProperty, Schema, Table, Validator};
use vigilance::statistics::{outlier_constraint, outlier_distance, within_n_standard_deviations};

/// Creates a deterministic table with the specified number of rows.
fn create_test_table(rows: usize) -> Table {
    let ids: Vec<String> = (0..rows).map(|i| format!("row-{i}")).collect();
    let age: Vec<f64> = (0..rows).map(|i| 18.0 + ((i * 37) % 62) as f64).collect();
    let salary: Vec<f64> = (0..rows)
        .map(|i| 30_000.0 + ((i * 7919) % 170_000) as f64)
        .collect();
    let level: Vec<i64> = (0..rows).map(|i| (i % 5) as i64).collect();

    Table::try_from_columns(vec![
        ("id", Arc::new(StringArray::from(ids)) as ArrayRef),
        ("age", Arc::new(Float64Array::from(age)) as ArrayRef),
        ("salary", Arc::new(Float64Array::from(salary)) as ArrayRef),
        ("level", Arc::new(Int64Array::from(level)) as ArrayRef),
    ])
    .unwrap()
    .with_index("id")
    .unwrap()
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    for size in [1_000, 10_000, 100_000] {
        let table = create_test_table(size);
        let schema = Schema::new()
            .meta(MetaProperty::RowCount, Range::new().min(1))
            .meta(MetaProperty::Columns, Contains::new(["age", "salary", "level"]).only())
            .data("age", Range::between(18, 80))
            .data("level", Contains::new([0, 1, 2, 3, 4]).only());

        group.bench_with_input(BenchmarkId::new("meta_and_data", size), &table, |b, table| {
            let mut validator = Validator::with_schema(schema.clone());
            b.iter(|| black_box(validator.validate(table).unwrap()))
        });

        let constrained = Schema::new().constraint(outlier_constraint("outliers", 10.0));
        group.bench_with_input(BenchmarkId::new("outlier_constraint", size), &table, |b, table| {
            let mut validator = Validator::with_schema(constrained.clone());
            b.iter(|| black_box(validator.validate(table).unwrap()))
        });
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");
    let table = create_test_table(10_000);
    let ages: Vec<f64> = (0..10_000).map(|i| ((i * 37) % 62) as f64).collect();

    group.bench_function("outlier_distance_10k", |b| {
        b.iter(|| black_box(outlier_distance(&table).unwrap()))
    });
    group.bench_function("within_n_standard_deviations_10k", |b| {
        b.iter(|| black_box(within_n_standard_deviations(3.0, &ages)))
    });

    group.finish();
}

criterion_group!(benches, bench_validation, bench_statistics);
criterion_main!(benches);
