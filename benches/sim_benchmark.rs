use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ta_office_sim::SharedState;

fn benchmark_waiting_area(c: &mut Criterion) {
    c.bench_function("try_enter_dequeue", |b| {
        b.iter_batched(
            || SharedState::new(3),
            |state| {
                for id in 0..3u32 {
                    let _ = state.try_enter(id, 5);
                }
                while state.dequeue_next().is_some() {}
            },
            BatchSize::SmallInput,
        )
    });
}

fn benchmark_backoff_sampling(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    c.bench_function("backoff_sample", |b| b.iter(|| rng.gen_range(10u64..=20)));
}

criterion_group!(benches, benchmark_waiting_area, benchmark_backoff_sampling);
criterion_main!(benches);
