use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use llrb_tree::{RBTreeMap, RBTreeSet};
use std::collections::{BTreeMap, BTreeSet};

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

#[allow(clippy::cast_possible_wrap)]
fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    let mut keys = ordered_keys(n);
    keys.reverse();
    keys
}

#[allow(clippy::cast_possible_wrap)]
fn random_keys(n: usize) -> Vec<i64> {
    // Deterministic LCG so every run sees the same sequence.
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn key_orders() -> [(&'static str, Vec<i64>); 3] {
    [
        ("ordered", ordered_keys(N)),
        ("reverse", reverse_ordered_keys(N)),
        ("random", random_keys(N)),
    ]
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert(c: &mut Criterion) {
    for (order, keys) in key_orders() {
        let mut group = c.benchmark_group(format!("map_insert_{order}"));

        group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
            b.iter(|| {
                let mut map = RBTreeMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
                map
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in &keys {
                    map.entry(k).or_insert(k);
                }
                map
            });
        });

        group.finish();
    }
}

fn bench_map_get(c: &mut Criterion) {
    for (order, keys) in key_orders() {
        let rb_map: RBTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

        let mut group = c.benchmark_group(format!("map_get_{order}"));

        group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
            b.iter(|| keys.iter().filter_map(|k| rb_map.get(k)).fold(0i64, |sum, &v| sum.wrapping_add(v)));
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| keys.iter().filter_map(|k| bt_map.get(k)).fold(0i64, |sum, &v| sum.wrapping_add(v)));
        });

        group.finish();
    }
}

fn bench_map_remove(c: &mut Criterion) {
    for (order, keys) in key_orders() {
        let rb_map: RBTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

        let mut group = c.benchmark_group(format!("map_remove_{order}"));

        group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
            b.iter_batched(
                || rb_map.clone(),
                |mut map| {
                    for k in &keys {
                        map.remove(k);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter_batched(
                || bt_map.clone(),
                |mut map| {
                    for k in &keys {
                        map.remove(k);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });

        group.finish();
    }
}

fn bench_map_erase_walk(c: &mut Criterion) {
    let rb_map: RBTreeMap<i64, i64> = random_keys(N).into_iter().map(|k| (k, k)).collect();

    c.bench_function("map_erase_by_position", |b| {
        b.iter_batched(
            || rb_map.clone(),
            |mut map| {
                let mut pos = map.begin();
                while !pos.is_end() {
                    pos = map.erase(pos).expect("position from the previous erase");
                }
                map
            },
            BatchSize::SmallInput,
        );
    });
}

// ─── Set Benchmarks ─────────────────────────────────────────────────────────

fn bench_set_insert(c: &mut Criterion) {
    for (order, keys) in key_orders() {
        let mut group = c.benchmark_group(format!("set_insert_{order}"));

        group.bench_function(BenchmarkId::new("RBTreeSet", N), |b| {
            b.iter(|| keys.iter().copied().collect::<RBTreeSet<i64>>());
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| keys.iter().copied().collect::<BTreeSet<i64>>());
        });

        group.finish();
    }
}

fn bench_set_contains(c: &mut Criterion) {
    for (order, keys) in key_orders() {
        let rb_set: RBTreeSet<i64> = keys.iter().copied().collect();
        let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

        let mut group = c.benchmark_group(format!("set_contains_{order}"));

        group.bench_function(BenchmarkId::new("RBTreeSet", N), |b| {
            b.iter(|| keys.iter().filter(|k| rb_set.contains(*k)).count());
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| keys.iter().filter(|k| bt_set.contains(*k)).count());
        });

        group.finish();
    }
}

#[allow(clippy::cast_possible_wrap)]
fn bench_set_merge(c: &mut Criterion) {
    let evens: RBTreeSet<i64> = (0..N as i64).map(|k| k * 2).collect();
    let thirds: RBTreeSet<i64> = (0..N as i64).map(|k| k * 3).collect();

    c.bench_function("set_merge", |b| {
        b.iter_batched(
            || (evens.clone(), thirds.clone()),
            |(mut target, mut source)| {
                target.merge(&mut source);
                (target, source)
            },
            BatchSize::SmallInput,
        );
    });
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(map_benches, bench_map_insert, bench_map_get, bench_map_remove, bench_map_erase_walk);

criterion_group!(set_benches, bench_set_insert, bench_set_contains, bench_set_merge);

criterion_main!(map_benches, set_benches);
