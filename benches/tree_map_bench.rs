use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use runtime_collections::{Natural, TreeMap};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn filled(seed: u64, n: usize) -> TreeMap<u64, u64> {
    lcg(seed).take(n).enumerate().map(|(i, x)| (x, i as u64)).collect()
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("tree::insert_random_100k", |b| {
        b.iter_batched(
            TreeMap::<u64, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(x, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("tree::insert_ascending_100k", |b| {
        b.iter_batched(
            TreeMap::<u64, u64>::new,
            |mut m| {
                for k in 0..100_000u64 {
                    m.insert(k, k);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("tree::from_sorted_100k", |b| {
        b.iter(|| black_box(TreeMap::from_sorted((0..100_000u64).map(|k| (k, k)), Natural)))
    });
}

fn bench_lookup(c: &mut Criterion) {
    c.bench_function("tree::get_hit_10k_on_100k", |b| {
        let m = filled(7, 100_000);
        let keys: Vec<u64> = m.keys().copied().step_by(10).collect();
        b.iter(|| {
            for k in &keys {
                black_box(m.get(k));
            }
        })
    });

    c.bench_function("tree::ceiling_10k_on_100k", |b| {
        let m = filled(9, 100_000);
        let mut probe = lcg(0xdead_beef);
        b.iter(|| {
            for x in probe.by_ref().take(10_000) {
                black_box(m.ceiling_entry(&x));
            }
        })
    });
}

fn bench_remove(c: &mut Criterion) {
    c.bench_function("tree::poll_first_all_50k", |b| {
        b.iter_batched(
            || filled(11, 50_000),
            |mut m| {
                while let Some(e) = m.poll_first_entry() {
                    black_box(e);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_range(c: &mut Criterion) {
    c.bench_function("tree::sub_map_walk_1k_windows", |b| {
        let m: TreeMap<u64, u64> = (0..100_000u64).map(|k| (k, k)).collect();
        b.iter(|| {
            let mut sum = 0u64;
            for lo in (0..100_000u64).step_by(100) {
                if let Ok(w) = m.sub_map(lo, true, lo + 10, false) {
                    sum = w.iter().fold(sum, |s, (_, v)| s.wrapping_add(*v));
                }
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
    name = benches_tree;
    config = bench_config();
    targets = bench_insert, bench_lookup, bench_remove, bench_range
}
criterion_main!(benches_tree);
