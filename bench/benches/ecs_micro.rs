//! ECS microbenchmarks using Criterion.
//!
//! These benchmarks measure individual World operations in isolation:
//! - Entity creation and indexing
//! - Class instantiation
//! - Group materialization and cached group reads
//! - Deferred removal and the end-of-frame flush

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sol_ecs::ecs::{EntityClass, EntityId, World, WorldId};
use sol_ecs_bench::components::*;

fn populated(n: usize) -> (World, Vec<EntityId>) {
    let mut world = World::new(WorldId::new(0));
    let ids = (0..n)
        .map(|i| {
            let mut entity = world.create_entity("entity").with(Position {
                x: i as f32,
                y: 0.0,
                z: 0.0,
            });
            if i % 2 == 0 {
                entity.add_component(Velocity::default());
            }
            if i % 3 == 0 {
                entity.add_component(Health::default());
            }
            world.add_entity(entity).unwrap()
        })
        .collect();
    (world, ids)
}

// =============================================================================
// Add Benchmarks
// =============================================================================

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_entity");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("single_component", count), &count, |b, &n| {
            b.iter(|| {
                let mut world = World::new(WorldId::new(0));
                for _ in 0..n {
                    let entity = world.create_entity("e").with(Position::default());
                    black_box(world.add_entity(entity).unwrap());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("three_components", count), &count, |b, &n| {
            b.iter(|| {
                let mut world = World::new(WorldId::new(0));
                for _ in 0..n {
                    let entity = world
                        .create_entity("e")
                        .with(Position::default())
                        .with(Rotation::default())
                        .with(Velocity::default());
                    black_box(world.add_entity(entity).unwrap());
                }
            });
        });

        // Every add also updates the materialized groups
        group.bench_with_input(BenchmarkId::new("with_cached_groups", count), &count, |b, &n| {
            b.iter(|| {
                let mut world = World::new(WorldId::new(0));
                let pos_vel = world.group::<(Position, Velocity)>();
                let pos_rot = world.group::<(Position, Rotation)>();
                let health = world.group::<Health>();
                world.entity_group(&pos_vel);
                world.entity_group(&pos_rot);
                world.entity_group(&health);
                for _ in 0..n {
                    let entity = world
                        .create_entity("e")
                        .with(Position::default())
                        .with(Velocity::default());
                    black_box(world.add_entity(entity).unwrap());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("from_class", count), &count, |b, &n| {
            b.iter(|| {
                let mut world = World::new(WorldId::new(0));
                world.add_entity_class(
                    EntityClass::new("Projectile")
                        .with(Projectile)
                        .with(Position::default())
                        .with(Velocity::default())
                        .with(Team { id: 1 }),
                );
                for _ in 0..n {
                    black_box(world.instantiate_entity_class("Projectile", "p").unwrap());
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// Group Benchmarks
// =============================================================================

fn bench_entity_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_group");

    for count in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));

        // First request computes the intersection of the type sets
        group.bench_with_input(BenchmarkId::new("materialize", count), &count, |b, &n| {
            b.iter_batched(
                || populated(n).0,
                |mut world| {
                    let signature = world.group::<(Position, Velocity, Health)>();
                    black_box(world.entity_group(&signature).len());
                },
                criterion::BatchSize::LargeInput,
            );
        });

        // Later requests return the cached list
        group.bench_with_input(BenchmarkId::new("cached", count), &count, |b, &n| {
            let (mut world, _) = populated(n);
            let signature = world.group::<(Position, Velocity, Health)>();
            world.entity_group(&signature);
            b.iter(|| {
                black_box(world.entity_group(&signature).len());
            });
        });

        group.bench_with_input(BenchmarkId::new("iterate_pos_vel", count), &count, |b, &n| {
            let (mut world, _) = populated(n);
            let signature = world.group::<(Position, Velocity)>();
            b.iter(|| {
                let ids = world.entity_group(&signature).to_vec();
                for id in ids {
                    if let Some(mut entity) = world.entity_mut(id) {
                        let vel = entity.get::<Velocity>().copied().unwrap_or_default();
                        entity.modify::<Position>(|pos| {
                            pos.x += vel.x;
                            pos.y += vel.y;
                            pos.z += vel.z;
                        });
                    }
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// Removal Benchmarks
// =============================================================================

fn bench_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("flush");

    for count in [1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("remove_all", count), &count, |b, &n| {
            b.iter_batched(
                || {
                    let (mut world, ids) = populated(n);
                    let signature = world.group::<(Position, Velocity)>();
                    world.entity_group(&signature);
                    (world, ids)
                },
                |(mut world, ids)| {
                    for id in ids {
                        world.remove_entity(id);
                    }
                    black_box(world.remove_scheduled_entities());
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("remove_component", count), &count, |b, &n| {
            b.iter_batched(
                || populated(n),
                |(mut world, ids)| {
                    for id in ids {
                        world.remove_component::<Position>(id);
                    }
                    black_box(world.remove_scheduled_entities());
                },
                criterion::BatchSize::LargeInput,
            );
        });

        // Nothing scheduled
        group.bench_with_input(BenchmarkId::new("empty", count), &count, |b, &n| {
            let (mut world, _) = populated(n);
            b.iter(|| black_box(world.remove_scheduled_entities()));
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_add, bench_entity_group, bench_flush);

criterion_main!(benches);
