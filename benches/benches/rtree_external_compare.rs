// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_rtree::Rect;

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_rects(n: usize, cell: i32) -> Vec<Rect<i32>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as i32 * cell;
            let y0 = y as i32 * cell;
            out.push(Rect::new(x0, y0, x0 + cell, y0 + cell));
        }
    }
    out
}

fn to_rstar_rects(v: &[Rect<i32>]) -> Vec<Rectangle<[i32; 2]>> {
    v.iter()
        .map(|r| Rectangle::from_corners([r.min_x, r.min_y], [r.max_x, r.max_y]))
        .collect()
}

fn bench_rtree_external_compare_i32(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare_i32");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10);
        let query = Rect::new(100, 100, 500, 500);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("understory_build_query_n{}", n), |b| {
            b.iter_batched(
                understory_rtree::RTree::<Rect<i32>>::default,
                |mut tree| {
                    for r in rects.iter().copied() {
                        tree.insert(r);
                    }
                    black_box(tree.search(&query).len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("understory_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || rects.clone(),
                |items| {
                    let mut tree = understory_rtree::RTree::default();
                    tree.bulk_load(items);
                    black_box(tree.search(&query).len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners(
                        [query.min_x, query.min_y],
                        [query.max_x, query.max_y],
                    );
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare_i32);
criterion_main!(benches);
