use conduit_ratelimit::RateLimiter;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

fn bench_acquire_release_cycle(c: &mut Criterion) {
    let limiter = RateLimiter::new(64, Duration::from_millis(1));
    c.bench_function("acquire_release_single_key", |b| {
        b.iter(|| {
            let permit = limiter.acquire(black_box("bench-key")).unwrap();
            permit.release();
        })
    });
}

fn bench_acquire_many_keys(c: &mut Criterion) {
    let limiter = RateLimiter::new(1, Duration::from_millis(1));
    let mut group = c.benchmark_group("acquire_distinct_keys");
    for n in [100, 1_000, 10_000] {
        group.bench_function(format!("{n}_keys"), |b| {
            b.iter(|| {
                for i in 0..n {
                    let permit = limiter.acquire(&format!("key-{i}")).unwrap();
                    permit.release();
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_acquire_release_cycle, bench_acquire_many_keys);
criterion_main!(benches);
