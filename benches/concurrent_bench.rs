use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use primmap::{ConcurrentHashMap, OpenHashMap, Synchronized};
use std::thread;
use std::time::Duration;

const THREADS: u64 = 4;
const PER_THREAD: u64 = 25_000;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn bench_parallel_insert(c: &mut Criterion) {
    c.bench_function("sharded::insert_4x25k", |b| {
        b.iter_batched(
            || ConcurrentHashMap::<u64, u64>::with_shards(64).expect("power of two"),
            |m| {
                thread::scope(|s| {
                    for t in 0..THREADS {
                        let m = &m;
                        s.spawn(move || {
                            for x in lcg(t + 1).take(PER_THREAD as usize) {
                                m.insert(x, t);
                            }
                        });
                    }
                });
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });

    // Baseline: one global lock around the same engine.
    c.bench_function("global_lock::insert_4x25k", |b| {
        b.iter_batched(
            || Synchronized::new(OpenHashMap::<u64, u64>::new()),
            |m| {
                thread::scope(|s| {
                    for t in 0..THREADS {
                        let m = &m;
                        s.spawn(move || {
                            for x in lcg(t + 1).take(PER_THREAD as usize) {
                                m.insert(x, t);
                            }
                        });
                    }
                });
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_parallel_merge(c: &mut Criterion) {
    c.bench_function("sharded::merge_hot_1k_keys_4x25k", |b| {
        b.iter_batched(
            ConcurrentHashMap::<u64, u64>::new,
            |m| {
                thread::scope(|s| {
                    for t in 0..THREADS {
                        let m = &m;
                        s.spawn(move || {
                            for x in lcg(t + 17).take(PER_THREAD as usize) {
                                m.merge(x % 1_000, 1, |a, b| a + b);
                            }
                        });
                    }
                });
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_read_mostly(c: &mut Criterion) {
    c.bench_function("sharded::get_4x25k_on_100k", |b| {
        let m: ConcurrentHashMap<u64, u64> = ConcurrentHashMap::new();
        let keys: Vec<u64> = lcg(7).take(100_000).collect();
        for &k in &keys {
            m.insert(k, k);
        }
        b.iter(|| {
            thread::scope(|s| {
                for t in 0..THREADS as usize {
                    let (m, keys) = (&m, &keys);
                    s.spawn(move || {
                        let mut hits = 0u64;
                        for k in keys.iter().skip(t).step_by(THREADS as usize) {
                            hits += u64::from(m.contains_key(k));
                        }
                        black_box(hits)
                    });
                }
            })
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_concurrent;
    config = bench_config();
    targets = bench_parallel_insert, bench_parallel_merge, bench_read_mostly
}
criterion_main!(benches_concurrent);
