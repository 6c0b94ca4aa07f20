//! Throughput Benchmark for lazykv
//!
//! Measures the expiring store under single-threaded and contended workloads.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lazykv::config::StoreConfig;
use lazykv::storage::ExpiringStore;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Benchmark SET with and without TTL
fn bench_set(c: &mut Criterion) {
    let store = ExpiringStore::new();

    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_persistent", |b| {
        let mut i = 0u64;
        b.iter(|| {
            store.set(format!("key:{}", i), "small_value");
            i += 1;
        });
    });

    group.bench_function("set_with_ttl", |b| {
        let mut i = 0u64;
        b.iter(|| {
            store.set_with_ttl(format!("ttl:{}", i), "small_value", Duration::from_secs(3600));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark GET hits, misses and lazy expiry
fn bench_get(c: &mut Criterion) {
    let store = ExpiringStore::new();

    for i in 0..100_000 {
        store.set(format!("key:{}", i), format!("value:{}", i));
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            black_box(store.get(&format!("key:{}", i % 100_000)));
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            black_box(store.get(&format!("missing:{}", i)));
            i += 1;
        });
    });

    group.bench_function("get_expired", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("expired:{}", i);
            store.set_with_ttl(key.clone(), "value", Duration::ZERO);
            black_box(store.get(&key));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark INCR operations
fn bench_incr(c: &mut Criterion) {
    let store = ExpiringStore::new();

    let mut group = c.benchmark_group("incr");
    group.throughput(Throughput::Elements(1));

    group.bench_function("single_counter", |b| {
        b.iter(|| {
            black_box(store.incr("counter").ok());
        });
    });

    group.bench_function("multiple_counters", |b| {
        let mut i = 0u64;
        b.iter(|| {
            black_box(store.incr(&format!("counter:{}", i % 1000)).ok());
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark 4 threads hammering one counter, across shard counts
fn bench_contended_incr(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_incr");
    group.measurement_time(Duration::from_secs(10));

    for shards in [1usize, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(shards), &shards, |b, &shards| {
            b.iter(|| {
                let store = Arc::new(ExpiringStore::with_config(
                    &StoreConfig::default().with_num_shards(shards),
                ));
                let handles: Vec<_> = (0..4)
                    .map(|t| {
                        let store = Arc::clone(&store);
                        thread::spawn(move || {
                            for i in 0..10_000 {
                                let _ = store.incr("shared");
                                store.set(format!("key:{}:{}", t, i), "value");
                            }
                        })
                    })
                    .collect();

                for handle in handles {
                    let _ = handle.join();
                }

                black_box(store.get("shared"));
            });
        });
    }

    group.finish();
}

/// Benchmark a full cleanup pass
fn bench_cleanup(c: &mut Criterion) {
    let mut group = c.benchmark_group("cleanup");

    group.bench_function("cleanup_half_expired", |b| {
        b.iter(|| {
            let store = ExpiringStore::new();
            for i in 0..10_000 {
                if i % 2 == 0 {
                    store.set_with_ttl(format!("key:{}", i), "value", Duration::ZERO);
                } else {
                    store.set(format!("key:{}", i), "value");
                }
            }
            black_box(store.cleanup_expired());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set,
    bench_get,
    bench_incr,
    bench_contended_incr,
    bench_cleanup,
);

criterion_main!(benches);
