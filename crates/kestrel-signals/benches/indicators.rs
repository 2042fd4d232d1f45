//! Indicator kernel benchmarks.
//!
//! Run with: cargo bench -p kestrel-signals

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kestrel_signals::{ema, ema_batched, rsi, Ema};

fn prices(len: usize) -> Vec<f64> {
    (0..len).map(|i| 100.0 + (i as f64 * 0.05).sin() * 3.0).collect()
}

/// Scalar reference against the lane-blocked EMA.
fn bench_ema(c: &mut Criterion) {
    let mut group = c.benchmark_group("ema");

    for len in [64usize, 1024, 16_384] {
        let input = prices(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("scalar", len), &input, |b, input| {
            b.iter(|| black_box(ema(black_box(input), 0.1).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("batched", len), &input, |b, input| {
            b.iter(|| black_box(ema_batched(black_box(input), 0.1).unwrap()))
        });
    }

    group.finish();
}

/// Streaming EMA, one sample at a time.
fn bench_ema_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("ema_update");
    group.throughput(Throughput::Elements(1));

    group.bench_function("single", |b| {
        let mut state = Ema::new(0.1).unwrap();
        let mut price = 100.0;
        b.iter(|| {
            price += 0.01;
            black_box(state.update(price))
        })
    });

    group.finish();
}

fn bench_rsi(c: &mut Criterion) {
    let mut group = c.benchmark_group("rsi");

    for len in [64usize, 1024, 16_384] {
        let input = prices(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &input, |b, input| {
            b.iter(|| black_box(rsi(black_box(input), 14).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ema, bench_ema_update, bench_rsi);

criterion_main!(benches);
