use astar_frontier::open_queue::OpenQueue;
use astar_frontier::{NodeArena, NodeHandle};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

// Handles must come from an arena; costs come from the LCG stream.
fn handles(n: usize) -> Vec<NodeHandle> {
    let mut arena: NodeArena<u64> = NodeArena::new();
    (0..n).map(|_| arena.allocate().unwrap()).collect()
}

fn bench_push_100k(c: &mut Criterion) {
    c.bench_function("queue::push_100k", |b| {
        let hs = handles(100_000);
        b.iter_batched(
            OpenQueue::<u64>::new,
            |mut q| {
                for (h, cost) in hs.iter().zip(lcg(1)) {
                    q.push(*h, cost);
                }
                black_box(q)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_push_pop_churn_100k(c: &mut Criterion) {
    c.bench_function("queue::push_pop_churn_100k", |b| {
        let hs = handles(100_000);
        b.iter_batched(
            || {
                let mut q = OpenQueue::with_capacity(100_000);
                for (h, cost) in hs.iter().zip(lcg(3)) {
                    q.push(*h, cost);
                }
                q
            },
            |mut q| {
                while let Some(h) = q.pop() {
                    black_box(h);
                }
                black_box(q)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("queue::remove_random_10k_of_110k", |b| {
        let hs = handles(110_000);
        b.iter_batched(
            || {
                let mut q = OpenQueue::with_capacity(110_000);
                for (h, cost) in hs.iter().zip(lcg(5)) {
                    q.push(*h, cost);
                }
                // Precompute 10k distinct victims via LCG
                let n = hs.len();
                let mut sel = std::collections::HashSet::with_capacity(10_000);
                let mut s = 0x9e3779b97f4a7c15u64;
                while sel.len() < 10_000 {
                    s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                    sel.insert((s as usize) % n);
                }
                let to_remove: Vec<NodeHandle> = sel.into_iter().map(|i| hs[i]).collect();
                (q, to_remove)
            },
            |(mut q, to_remove)| {
                for h in to_remove {
                    black_box(q.remove(h));
                }
                black_box(q)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_decrease_key_cycle_10k(c: &mut Criterion) {
    // The remove + re-push cycle the node list uses when a cheaper path
    // to an open key is found.
    c.bench_function("queue::remove_repush_10k_of_100k", |b| {
        let hs = handles(100_000);
        b.iter_batched(
            || {
                let mut q = OpenQueue::with_capacity(100_000);
                for (h, cost) in hs.iter().zip(lcg(7)) {
                    q.push(*h, cost | 1);
                }
                q
            },
            |mut q| {
                for h in hs.iter().take(10_000) {
                    q.remove(*h);
                    q.push(*h, 0);
                }
                black_box(q)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_push_100k,
              bench_push_pop_churn_100k,
              bench_remove_random_10k,
              bench_decrease_key_cycle_10k
}
criterion_main!(benches);
