//! ECS scenario benchmarks using Criterion.
//!
//! These benchmarks measure realistic workloads driven through `World::update`:
//! - Particle system (high entity count, simple components, constant churn)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sol_ecs_bench::{
    frame_timer::measure_world,
    scenarios::{ParticleConfig, ParticleScenario, Scenario},
};

// =============================================================================
// Particle System Benchmarks
// =============================================================================

fn bench_particles(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario/particles");

    for count in [10_000, 50_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));

        // Full frame update
        group.bench_with_input(BenchmarkId::new("frame", count), &count, |b, &n| {
            let mut scenario = ParticleScenario::with_config(ParticleConfig {
                particle_count: n,
                ..Default::default()
            });
            scenario.setup();

            b.iter(|| {
                scenario.update();
            });
        });
    }

    group.finish();
}

// =============================================================================
// Frame Time Benchmarks (longer running, statistical)
// =============================================================================

fn bench_frame_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_times");
    group.sample_size(20); // Fewer samples since each runs many frames

    // Particle scenario: 1000 frames
    group.bench_function("particles_1000_frames", |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;

            for _ in 0..iters {
                let mut scenario = ParticleScenario::with_config(ParticleConfig {
                    particle_count: 50_000,
                    ..Default::default()
                });
                scenario.setup();

                let stats = measure_world(scenario.world_mut(), 1000);
                total += stats.total();
            }

            total
        });
    });

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_particles, bench_frame_times);

criterion_main!(benches);
