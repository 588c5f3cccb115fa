use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dq_transform::profiling::{ProfilingContextBuilder, ProfilingEngine, ProfilingJob};
use dq_transform::types::{record, DataSet, Value};

fn orders(n: usize) -> DataSet {
    let statuses = ["PAID", "OPEN", "VOID"];
    DataSet::new(
        (0..n)
            .map(|i| {
                let amount = if i % 11 == 0 {
                    Value::Null
                } else {
                    Value::Float64((i * 37 % 10_000) as f64 / 10.0)
                };
                record([
                    ("OrderId", Value::Int64(i as i64)),
                    ("Status", Value::from(statuses[i % statuses.len()])),
                    ("Amount", amount),
                    ("Express", Value::Bool(i % 4 == 0)),
                ])
            })
            .collect(),
    )
}

fn bench_profile(c: &mut Criterion) {
    let engine = ProfilingEngine::default();
    let job = ProfilingJob::new("bench", "tenant", "orders").cleansed_input();

    let mut group = c.benchmark_group("profile");
    for n in [1_000usize, 10_000, 100_000] {
        let ds = orders(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &ds, |b, ds| {
            b.iter(|| engine.profile(black_box(&job), black_box(ds)))
        });
    }
    group.finish();
}

fn bench_context_build(c: &mut Criterion) {
    let job = ProfilingJob::new("bench", "tenant", "orders");
    let snapshot = ProfilingEngine::default().profile(&job, &orders(10_000)).snapshot;
    let builder = ProfilingContextBuilder::new();

    c.bench_function("context_build", |b| {
        b.iter(|| builder.build(black_box(&snapshot), Some(&job)))
    });
}

criterion_group!(benches, bench_profile, bench_context_build);
criterion_main!(benches);
