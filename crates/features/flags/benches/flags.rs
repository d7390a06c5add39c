use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use swb_domain::{BuildMode, DomainTag, FlagDefault, FlagDescriptor, LaunchArguments};
use swb_flags::Flags;
use swb_store::SuiteStore;

fn evaluator() -> Flags {
    Flags::builder()
        .store(SuiteStore::in_memory())
        .arguments(LaunchArguments::empty())
        .build_mode(BuildMode::Debug)
        .build()
}

// ============================================================================
// Benchmark: Cached Reads
// ============================================================================

fn bench_cached_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("value");

    let flags = evaluator();
    let flag = FlagDescriptor::fixed("hot", DomainTag::Feature, true);
    let _ = flags.value(&flag, "bench").unwrap();

    group.bench_function("cached_via_facade", |b| {
        b.iter(|| {
            black_box(flags.value(black_box(&flag), "bench").unwrap());
        });
    });

    // Holding the domain handle skips the registry lock on every read.
    let domain = flags.domain(DomainTag::Feature, "bench").unwrap();
    group.bench_function("cached_via_domain", |b| {
        b.iter(|| {
            black_box(domain.value(black_box(&flag)));
        });
    });

    group.finish();
}

// ============================================================================
// Benchmark: Cold Resolution
// ============================================================================

fn bench_cold_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    let flags = evaluator();
    let counter = AtomicU64::new(0);

    group.bench_function("first_read", |b| {
        b.iter_batched(
            || {
                let unique = counter.fetch_add(1, Ordering::Relaxed);
                FlagDescriptor::new(
                    format!("cold-{unique}"),
                    DomainTag::Feature,
                    FlagDefault::Fixed(true),
                )
            },
            |flag| black_box(flags.value(&flag, "bench").unwrap()),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// Benchmark: Registry & Discovery
// ============================================================================

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    let flags = evaluator();
    for index in 0..100 {
        let flag = FlagDescriptor::new(
            format!("flag-{index}"),
            DomainTag::Feature,
            FlagDefault::Fixed(index % 2 == 0),
        );
        let _ = flags.value(&flag, "bench").unwrap();
    }

    group.bench_function("domain_lookup", |b| {
        b.iter(|| {
            black_box(flags.domain(DomainTag::Feature, "bench").unwrap());
        });
    });

    group.bench_function("all_flags_100", |b| {
        b.iter(|| {
            black_box(flags.all_flags("bench"));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cached_reads, bench_cold_resolution, bench_registry);
criterion_main!(benches);
