use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use runtime_collections::{Direction, HashMap, LinkedHashMap};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (HashMap<String, u64>, Vec<String>) {
    let mut m = HashMap::new();
    let keys: Vec<_> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        m.insert(k.clone(), i as u64);
    }
    (m, keys)
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("hash::insert_fresh_100k", |b| {
        b.iter_batched(
            HashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("linked::insert_fresh_100k", |b| {
        b.iter_batched(
            LinkedHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_presized_100k(c: &mut Criterion) {
    c.bench_function("hash::insert_presized_100k", |b| {
        b.iter_batched(
            || HashMap::<String, u64>::with_capacity(140_000),
            |mut m| {
                for (i, x) in lcg(3).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("hash::remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let (m, keys) = filled(5, 110_000);
                let n = keys.len();
                let mut s = 0x9e3779b97f4a7c15u64;
                let to_remove: Vec<String> = (0..10_000)
                    .map(|_| {
                        s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                        keys[(s as usize) % n].clone()
                    })
                    .collect();
                (m, to_remove)
            },
            |(mut m, to_remove)| {
                for k in &to_remove {
                    black_box(m.remove(k));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("hash::get_hit_10k_on_100k", |b| {
        let (m, keys) = filled(7, 100_000);
        let n = keys.len();
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<String> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % n].clone()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(m.get(k));
            }
        })
    });
}

fn bench_get_miss_10k(c: &mut Criterion) {
    c.bench_function("hash::get_miss_10k_on_100k", |b| {
        let (m, _) = filled(11, 100_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for x in miss.by_ref().take(10_000) {
                black_box(m.get(&key(x)));
            }
        })
    });
}

fn bench_lru_touch_10k(c: &mut Criterion) {
    c.bench_function("linked::lru_touch_10k_of_50k", |b| {
        b.iter_batched(
            || {
                let mut m = LinkedHashMap::lru(50_000);
                let keys: Vec<_> = lcg(13).take(50_000).map(key).collect();
                for (i, k) in keys.iter().enumerate() {
                    m.insert(k.clone(), i as u64);
                }
                (m, keys)
            },
            |(mut m, keys)| {
                for k in keys.iter().step_by(5) {
                    black_box(m.get_touch(k));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iteration(c: &mut Criterion) {
    c.bench_function("hash::iter_all_100k", |b| {
        let (m, _) = filled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in m.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("hash::cursor_walk_100k", |b| {
        let (m, _) = filled(1001, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            let mut cursor = m.cursor();
            while cursor.has_next() {
                if let Ok((_, v)) = cursor.next(&m) {
                    sum = sum.wrapping_add(*v);
                }
            }
            black_box(sum)
        })
    });

    c.bench_function("linked::reverse_walk_100k", |b| {
        let mut m = LinkedHashMap::new();
        for (i, x) in lcg(1003).take(100_000).enumerate() {
            m.insert(key(x), i as u64);
        }
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in m.iter_in(Direction::Backward) {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
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
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_presized_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_get_hit_10k,
              bench_get_miss_10k,
              bench_lru_touch_10k,
              bench_iteration
}
criterion_main!(benches_insert, benches_ops);
