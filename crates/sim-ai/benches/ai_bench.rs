use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_ai::{choose_strategy, process_rivals_turn};
use sim_core::Scenario;

fn bench_rivals(c: &mut Criterion) {
    let w0 = Scenario::standard()
        .build_world()
        .expect("standard scenario is valid");

    c.bench_function("rival decisions x 100 turns", |b| {
        b.iter(|| {
            let mut w = w0.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            for _ in 0..100 {
                process_rivals_turn(&mut w, &mut rng);
            }
            black_box(w)
        })
    });

    let rival = w0.rivals().next().expect("standard scenario has rivals").clone();
    c.bench_function("choose_strategy", |b| {
        b.iter(|| choose_strategy(black_box(&rival), black_box(0.55)))
    });
}

criterion_group!(benches, bench_rivals);
criterion_main!(benches);
