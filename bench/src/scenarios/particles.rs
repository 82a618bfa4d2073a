//! Particle system benchmark scenario.
//!
//! Simulates a high-volume particle system with:
//! - 100,000 particles
//! - Simple components: Position, Velocity, Lifetime, Color, Size
//! - Systems: movement, lifetime decay, fade, reap and respawn dead particles
//!
//! This scenario tests:
//! - Group iteration over a large population
//! - In-place component mutation through `EntityMut`
//! - Deferred removal throughput (particles dying and respawning every frame)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sol_ecs::ecs::{
    ComponentTypeGroup, Context, Entity, System, World, WorldId, component,
};

use crate::components::{Color, Lifetime, Particle, Position, Size, Velocity};
use crate::scenarios::Scenario;

/// Configuration for the particle benchmark.
pub struct ParticleConfig {
    /// Total number of particles to maintain.
    pub particle_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            delta_time: 1.0 / 60.0, // 60 FPS
            seed: 12345,
        }
    }
}

/// Builds randomized particles.
struct ParticleFactory(ChaCha8Rng);

impl ParticleFactory {
    fn create_particle(&mut self, world: &mut World) -> Entity {
        let rng = &mut self.0;
        world
            .create_entity("particle")
            .with(Particle)
            .with(Position {
                x: rng.gen_range(-100.0..100.0),
                y: rng.gen_range(-100.0..100.0),
                z: rng.gen_range(-100.0..100.0),
            })
            .with(Velocity {
                x: rng.gen_range(-10.0..10.0),
                y: rng.gen_range(-10.0..10.0),
                z: rng.gen_range(-10.0..10.0),
            })
            .with(Lifetime {
                remaining: rng.gen_range(1.0..5.0),
                total: 5.0,
            })
            .with(Color {
                r: rng.gen_range(0.0..1.0),
                g: rng.gen_range(0.0..1.0),
                b: rng.gen_range(0.0..1.0),
                a: 1.0,
            })
            .with(Size {
                width: rng.gen_range(0.1..2.0),
                height: rng.gen_range(0.1..2.0),
            })
    }
}

/// Update particle positions based on velocity.
struct Movement {
    dt: f32,
}

impl System for Movement {
    fn interest(&self, registry: &component::Registry) -> ComponentTypeGroup {
        ComponentTypeGroup::of::<(Position, Velocity)>(registry)
    }

    fn on_update(&mut self, ctx: &mut Context<'_>) {
        let dt = self.dt;
        ctx.for_each(|mut entity| {
            let Some(vel) = entity.get::<Velocity>().copied() else {
                return;
            };
            entity.modify::<Position>(|pos| {
                pos.x += vel.x * dt;
                pos.y += vel.y * dt;
                pos.z += vel.z * dt;
            });
        });
    }
}

/// Decay particle lifetimes.
struct LifetimeDecay {
    dt: f32,
}

impl System for LifetimeDecay {
    fn interest(&self, registry: &component::Registry) -> ComponentTypeGroup {
        ComponentTypeGroup::of::<Lifetime>(registry)
    }

    fn on_update(&mut self, ctx: &mut Context<'_>) {
        let dt = self.dt;
        ctx.for_each(|mut entity| {
            entity.modify::<Lifetime>(|lifetime| lifetime.remaining -= dt);
        });
    }
}

/// Fade particles based on remaining lifetime.
struct Fade;

impl System for Fade {
    fn interest(&self, registry: &component::Registry) -> ComponentTypeGroup {
        ComponentTypeGroup::of::<(Lifetime, Color)>(registry)
    }

    fn on_update(&mut self, ctx: &mut Context<'_>) {
        ctx.for_each(|mut entity| {
            let Some(lifetime) = entity.get::<Lifetime>().copied() else {
                return;
            };
            entity.modify::<Color>(|color| {
                color.a = (lifetime.remaining / lifetime.total).max(0.0);
            });
        });
    }
}

/// Remove dead particles (lifetime <= 0) and spawn a replacement for each.
struct Reaper {
    factory: ParticleFactory,
    reaped: usize,
}

impl System for Reaper {
    fn interest(&self, registry: &component::Registry) -> ComponentTypeGroup {
        ComponentTypeGroup::of::<(Particle, Lifetime)>(registry)
    }

    fn on_update(&mut self, ctx: &mut Context<'_>) {
        for id in ctx.entities() {
            let world = ctx.world();
            let dead = world
                .entity(id)
                .and_then(|entity| entity.get::<Lifetime>())
                .is_some_and(|life| life.remaining <= 0.0);
            if dead && world.remove_entity(id) {
                self.reaped += 1;
                let particle = self.factory.create_particle(world);
                let _ = world.add_entity(particle);
            }
        }
    }
}

/// Particle system benchmark scenario.
pub struct ParticleScenario {
    config: ParticleConfig,
    world: World,
}

impl ParticleScenario {
    /// Create a new particle scenario with default config.
    pub fn new() -> Self {
        Self::with_config(ParticleConfig::default())
    }

    /// Create a new particle scenario with custom config.
    pub fn with_config(config: ParticleConfig) -> Self {
        Self {
            world: World::new(WorldId::new(0)),
            config,
        }
    }

    /// Get current particle count.
    pub fn current_count(&self) -> usize {
        self.world.entity_count()
    }

    /// The world driven by the scenario.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The world driven by the scenario, for callers that run frames themselves.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for ParticleScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ParticleScenario {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn description(&self) -> &'static str {
        "High-volume particle system with movement, lifetime, and respawn"
    }

    fn entity_count(&self) -> usize {
        self.config.particle_count
    }

    fn setup(&mut self) {
        let mut factory = ParticleFactory(ChaCha8Rng::seed_from_u64(self.config.seed));

        for _ in 0..self.config.particle_count {
            let particle = factory.create_particle(&mut self.world);
            let _ = self.world.add_entity(particle);
        }

        let dt = self.config.delta_time;
        self.world.insert_system(Movement { dt });
        self.world.insert_system(Fade);
        self.world.insert_system(LifetimeDecay { dt });
        self.world.insert_system(Reaper { factory, reaped: 0 });
    }

    fn update(&mut self) {
        self.world.update();
    }

    fn teardown(&mut self) {
        let ids: Vec<_> = self.world.entities().map(Entity::id).collect();
        for id in ids {
            self.world.remove_entity(id);
        }
        self.world.remove_scheduled_entities();
        self.world.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_timer::measure_world;

    #[test]
    fn particle_scenario_setup() {
        let mut scenario = ParticleScenario::with_config(ParticleConfig {
            particle_count: 100,
            ..Default::default()
        });

        scenario.setup();
        assert_eq!(scenario.current_count(), 100);
        assert_eq!(scenario.world().systems().count(), 4);

        scenario.teardown();
        assert_eq!(scenario.current_count(), 0);
    }

    #[test]
    fn particle_scenario_update() {
        let mut scenario = ParticleScenario::with_config(ParticleConfig {
            particle_count: 100,
            delta_time: 1.0,
            ..Default::default()
        });

        scenario.setup();

        // Run enough frames that every initial particle dies at least once
        for _ in 0..10 {
            scenario.update();
        }

        // Dead particles are replaced one for one
        assert_eq!(scenario.current_count(), 100);

        scenario.teardown();
    }

    #[test]
    fn particle_scenario_measured_frames() {
        // Given
        let mut scenario = ParticleScenario::with_config(ParticleConfig {
            particle_count: 50,
            ..Default::default()
        });
        scenario.setup();

        // When
        let stats = measure_world(scenario.world_mut(), 5);

        // Then
        assert_eq!(stats.frame_count(), 5);
        assert_eq!(stats.entities, 50);
    }
}
