// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_rtree::{RTree, Rect};

type Item = (Rect<i32>, u32);

fn gen_grid_rects(n: usize, cell: i32) -> Vec<Item> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as i32 * cell;
            let y0 = y as i32 * cell;
            out.push((Rect::new(x0, y0, x0 + cell, y0 + cell), out.len() as u32));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, bound: i32) -> i32 {
        (self.next_u64() % bound as u64) as i32
    }
}

fn gen_random_rects(count: usize, world: i32, max_size: i32) -> Vec<Item> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|i| {
            let x0 = rng.below(world);
            let y0 = rng.below(world);
            let w = rng.below(max_size) + 1;
            let h = rng.below(max_size) + 1;
            (Rect::new(x0, y0, x0 + w, y0 + h), i as u32)
        })
        .collect()
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: i32) -> Vec<Item> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let (cx, cy) = (rng.below(20_000), rng.below(20_000));
        for _ in 0..per_cluster {
            let x0 = cx + rng.below(spread) - spread / 2;
            let y0 = cy + rng.below(spread) - spread / 2;
            out.push((Rect::new(x0, y0, x0 + 12, y0 + 12), out.len() as u32));
        }
    }
    out
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_build_i32");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("insert_n{}", n), |b| {
            b.iter_batched(
                RTree::<Item>::default,
                |mut tree| {
                    for r in rects.iter().copied() {
                        tree.insert(r);
                    }
                    black_box(tree.height());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("bulk_load_n{}", n), |b| {
            b.iter_batched(
                || rects.clone(),
                |items| {
                    let mut tree = RTree::<Item>::default();
                    tree.bulk_load(items);
                    black_box(tree.height());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let rects = gen_clustered_rects(64, 128, 400);
    group.bench_function("bulk_load_clustered", |b| {
        b.iter_batched(
            || rects.clone(),
            |items| {
                let mut tree = RTree::<Item>::default();
                tree.bulk_load(items);
                black_box(tree.len());
            },
            BatchSize::SmallInput,
        )
    });
    let rects = gen_random_rects(20_000, 20_000, 50);
    let (first, second) = rects.split_at(10_000);
    group.bench_function("bulk_load_merge_two_batches", |b| {
        b.iter_batched(
            || (first.to_vec(), second.to_vec()),
            |(head, tail)| {
                let mut tree = RTree::<Item>::default();
                tree.bulk_load(head);
                tree.bulk_load(tail);
                black_box(tree.height());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_query_i32");
    for &max_entries in &[4usize, 9, 16] {
        let mut tree = RTree::new(max_entries);
        tree.bulk_load(gen_random_rects(50_000, 20_000, 50));
        let mut rng = Rng::new(0x1234_5678_9ABC_DEF0);
        let queries: Vec<Rect<i32>> = (0..256)
            .map(|_| {
                let (x, y) = (rng.below(20_000), rng.below(20_000));
                Rect::new(x, y, x + 400, y + 400)
            })
            .collect();
        group.throughput(Throughput::Elements(queries.len() as u64));

        group.bench_function(format!("search_m{}", max_entries), |b| {
            let mut out = Vec::new();
            b.iter(|| {
                let mut hits = 0;
                for q in &queries {
                    tree.search_into(q, &mut out);
                    hits += out.len();
                }
                black_box(hits)
            })
        });
        group.bench_function(format!("collides_m{}", max_entries), |b| {
            b.iter(|| black_box(queries.iter().filter(|q| tree.collides(q)).count()))
        });
        group.bench_function(format!("search_containing_m{}", max_entries), |b| {
            b.iter(|| {
                let hits: usize = queries
                    .iter()
                    .map(|q| tree.search_containing(&q.center_rect()).len())
                    .sum();
                black_box(hits)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
