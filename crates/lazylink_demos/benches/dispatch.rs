#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Dispatch benchmarks for lazylink.
//!
//! Compares one small operation called directly, through a call site's
//! dynamic invoker, through a typed adapter, and with a lookup per call,
//! plus memoized against unmemoized Fibonacci sums.

use std::hint::black_box;
use std::rc::Rc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lazylink_demos::bench::{DispatchBench, DispatchStyle};
use lazylink_demos::fibonacci::{self, Linkage};
use lazylink_memo::CacheTableStore;

fn bench_dispatch_styles(c: &mut Criterion) {
    let bench = DispatchBench::new().expect("bind bench site");
    let mut group = c.benchmark_group("dispatch");

    for style in DispatchStyle::ALL {
        group.bench_with_input(BenchmarkId::new("style", style), &style, |b, style| {
            b.iter(|| black_box(bench.run(*style, black_box(100)).unwrap().total));
        });
    }

    group.finish();
}

fn bench_fibonacci(c: &mut Criterion) {
    let mut group = c.benchmark_group("fibonacci");

    for count in [10_u32, 20, 25] {
        group.bench_with_input(BenchmarkId::new("call_site", count), &count, |b, &n| {
            b.iter(|| fibonacci::sum_long(&Linkage::Constant, black_box(n)).unwrap().total);
        });
        group.bench_with_input(BenchmarkId::new("memoized_cold", count), &count, |b, &n| {
            b.iter(|| {
                let linkage = Linkage::Memoized(Rc::new(CacheTableStore::new()));
                fibonacci::sum_long(&linkage, black_box(n)).unwrap().total
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dispatch_styles, bench_fibonacci);
criterion_main!(benches);
