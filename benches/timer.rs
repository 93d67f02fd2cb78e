use criterion::{black_box, criterion_group, criterion_main, Criterion};
use timebandit::{noop, Timer};

fn bench_timer_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("timer");
    group.sample_size(20);

    group.bench_function("timeit_empty_1000", |b| {
        let mut timer = Timer::new(|| ());
        b.iter(|| black_box(timer.timeit(1_000)));
    });

    group.bench_function("timeit_fallible_1000", |b| {
        let mut timer = Timer::try_new(|| "42".parse::<u32>()).with_setup(noop);
        b.iter(|| black_box(timer.timeit(1_000)));
    });

    group.bench_function("repeat_5x100", |b| {
        let mut timer = Timer::new(|| black_box(3u64 + 4));
        b.iter(|| black_box(timer.repeat(5, 100)));
    });
    group.finish();
}

criterion_group!(benches, bench_timer_overhead);
criterion_main!(benches);
