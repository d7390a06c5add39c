use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::Value;
use std::hint::black_box;
use swb_store::{Dictionary, SuiteStore};
use tempfile::TempDir;

fn dictionary(entries: usize) -> Dictionary {
    (0..entries).map(|i| (format!("flag-{i}"), Value::Bool(i % 2 == 0))).collect()
}

// ============================================================================
// Benchmark: In-Memory Lookups
// ============================================================================

fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("reads");

    let store = SuiteStore::in_memory();
    store.write("bench", "feature-flags", dictionary(64)).unwrap();

    group.bench_function("read_dictionary", |b| {
        b.iter(|| {
            black_box(store.read("bench", "feature-flags"));
        });
    });

    group.bench_function("contains_hit", |b| {
        b.iter(|| {
            black_box(store.contains("bench", "feature-flags", "flag-32"));
        });
    });

    group.bench_function("contains_miss", |b| {
        b.iter(|| {
            black_box(store.contains("bench", "feature-flags", "unknown"));
        });
    });

    group.finish();
}

// ============================================================================
// Benchmark: Dictionary Replacement
// ============================================================================

fn bench_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("writes");

    let sizes = [("4", 4), ("64", 64), ("512", 512)];

    let ephemeral = SuiteStore::in_memory();
    for (name, size) in sizes {
        let entries = dictionary(size);
        group.throughput(Throughput::Elements(u64::try_from(size).unwrap_or(u64::MAX)));
        group.bench_with_input(BenchmarkId::new("in_memory", name), &entries, |b, entries| {
            b.iter(|| {
                ephemeral.write("bench", "feature-flags", entries.clone()).unwrap();
            });
        });
    }

    let temp = TempDir::new().unwrap();
    let persistent = SuiteStore::builder().root(temp.path()).open().unwrap();
    for (name, size) in sizes {
        let entries = dictionary(size);
        group.throughput(Throughput::Elements(u64::try_from(size).unwrap_or(u64::MAX)));
        group.bench_with_input(BenchmarkId::new("file_backed", name), &entries, |b, entries| {
            b.iter(|| {
                persistent.write("bench", "feature-flags", entries.clone()).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reads, bench_writes);
criterion_main!(benches);
