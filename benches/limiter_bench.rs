use criterion::{criterion_group, criterion_main, Criterion};
use futures_util::FutureExt;
use std::hint::black_box;
use inflight_limiter::Limiter;

fn bench_uncontended(c: &mut Criterion) {
    let limiter = Limiter::new(10).unwrap();

    c.bench_function("acquire_release_uncontended", |b| b.iter(|| {
        black_box(limiter.acquire().now_or_never());
        limiter.release().unwrap();
    }));
}

fn bench_hand_off(c: &mut Criterion) {
    // Keep the single slot held so every acquire queues and every release hands off.
    let limiter = Limiter::new(1).unwrap();
    limiter.acquire().now_or_never().unwrap();

    c.bench_function("queued_hand_off", |b| b.iter(|| {
        let mut waiter = limiter.acquire();
        limiter.release().unwrap();
        black_box((&mut waiter).now_or_never().unwrap());
    }));
}

fn bench_run_scoped(c: &mut Criterion) {
    let limiter = Limiter::new(10).unwrap();

    c.bench_function("run_scoped_ready_task", |b| b.iter(|| {
        let value = limiter.run_scoped(|| async { black_box(1u64) }).now_or_never();
        black_box(value)
    }));
}

criterion_group!(benches, bench_uncontended, bench_hand_off, bench_run_scoped);
criterion_main!(benches);
