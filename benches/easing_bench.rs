use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use glass_motion::easing::{approach, approach_vec2};

fn approach_benchmark(c: &mut Criterion) {
    c.bench_function("approach_scalar", |b| {
        b.iter(|| black_box(approach(black_box(0.18), black_box(0.95), 0.08)))
    });

    c.bench_function("approach_vec2", |b| {
        let current = Vec2::new(0.5, 0.18);
        let target = Vec2::new(0.95, 0.05);
        b.iter(|| {
            black_box(approach_vec2(black_box(current), black_box(target), 0.08))
        })
    });
}

fn convergence_benchmark(c: &mut Criterion) {
    // A full one-second glide at 60 Hz: the per-frame cost consumers
    // actually pay after a step change.
    c.bench_function("sixty_frame_glide", |b| {
        b.iter(|| {
            let mut current = Vec2::new(0.5, 0.18);
            let target = Vec2::new(0.95, 0.95);
            for _ in 0..60 {
                current = approach_vec2(current, target, 0.08);
            }
            black_box(current)
        })
    });
}

criterion_group!(benches, approach_benchmark, convergence_benchmark);
criterion_main!(benches);
