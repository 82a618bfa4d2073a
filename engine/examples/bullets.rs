use serde::{Deserialize, Serialize};
use sol_ecs::ecs::{
    ClassLoader, Component, ComponentTypeGroup, Context, System, World, WorldId, component,
};

const ARENA_WIDTH: f32 = 40.0;
const FIRE_EVERY: u32 = 3;
const FRAMES: u32 = 30;

const CLASSES: &str = r#"{
    "Bullet": {
        "Position": { "x": 0.0, "y": 0.0 },
        "Velocity": { "dx": 4.0, "dy": 0.5 },
        "Damage": 2
    },
    "Turret": {
        "Position": { "x": 0.0, "y": 0.0 },
        "Ammo": 6
    }
}"#;

#[derive(Component, Clone, Debug, Default, Serialize, Deserialize)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Clone, Debug, Default, Serialize, Deserialize)]
struct Velocity {
    dx: f32,
    dy: f32,
}

#[derive(Component, Clone, Debug, Serialize, Deserialize)]
struct Damage(u32);

#[derive(Component, Clone, Debug, Serialize, Deserialize)]
struct Ammo(u32);

/// Fires a bullet from every turret with ammo left.
#[derive(Default)]
struct Gunnery {
    frame: u32,
    fired: u32,
}

impl System for Gunnery {
    fn interest(&self, registry: &component::Registry) -> ComponentTypeGroup {
        ComponentTypeGroup::of::<(Position, Ammo)>(registry)
    }

    fn on_update(&mut self, ctx: &mut Context<'_>) {
        self.frame += 1;
        if self.frame % FIRE_EVERY != 0 {
            return;
        }

        for turret in ctx.entities() {
            let world = ctx.world();
            let Some(mut entity) = world.entity_mut(turret) else {
                continue;
            };
            let mut loaded = false;
            entity.modify::<Ammo>(|ammo| {
                if ammo.0 > 0 {
                    ammo.0 -= 1;
                    loaded = true;
                }
            });
            if !loaded {
                continue;
            }

            self.fired += 1;
            let name = format!("bullet-{}", self.fired);
            if let Ok(bullet) = world.instantiate_entity_class("Bullet", name) {
                log::info!("Turret {turret} fired {bullet}");
            }
        }
    }

    fn on_end(&mut self, _world: &mut World) {
        println!("Gunnery fired {} bullets", self.fired);
    }
}

/// Moves everything that has a velocity.
#[derive(Default)]
struct Movement;

impl System for Movement {
    fn interest(&self, registry: &component::Registry) -> ComponentTypeGroup {
        ComponentTypeGroup::of::<(Position, Velocity)>(registry)
    }

    fn on_update(&mut self, ctx: &mut Context<'_>) {
        ctx.for_each(|mut entity| {
            let vel = entity.get::<Velocity>().cloned().unwrap_or_default();
            entity.modify::<Position>(|pos| {
                pos.x += vel.dx;
                pos.y += vel.dy;
            });
        });
    }
}

/// Removes bullets that left the arena and stops the simulation after a fixed number of frames.
struct Reaper {
    frames_left: u32,
    reaped: u32,
}

impl System for Reaper {
    fn interest(&self, registry: &component::Registry) -> ComponentTypeGroup {
        ComponentTypeGroup::of::<(Position, Damage)>(registry)
    }

    fn on_update(&mut self, ctx: &mut Context<'_>) {
        for bullet in ctx.entities() {
            let world = ctx.world();
            let outside = world
                .entity(bullet)
                .and_then(|entity| entity.get::<Position>())
                .is_some_and(|pos| pos.x > ARENA_WIDTH);
            if outside && world.remove_entity(bullet) {
                self.reaped += 1;
            }
        }

        self.frames_left = self.frames_left.saturating_sub(1);
        if self.frames_left == 0 {
            ctx.request_termination();
        }
    }

    fn on_end(&mut self, _world: &mut World) {
        println!("Reaper removed {} bullets", self.reaped);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=============================================================");
    println!("Bullets!");
    println!("=============================================================");

    let mut world = World::new(WorldId::new(0));

    let mut loader = ClassLoader::new();
    loader
        .register::<Position>()
        .register::<Velocity>()
        .register::<Damage>()
        .register::<Ammo>();
    loader.load(&mut world, CLASSES)?;

    world.register_system::<Gunnery>();
    world.register_system::<Movement>();
    world.register_system_with(|| {
        Ok::<_, String>(Reaper {
            frames_left: FRAMES,
            reaped: 0,
        })
    });
    world.add_system::<Gunnery>()?;
    world.add_system_named("Movement")?;
    world.add_system::<Reaper>()?;

    world.instantiate_entity_class("Turret", "turret-low")?;
    let high = world.instantiate_entity_class("Turret", "turret-high")?;
    world.add_component(high, Position { x: 0.0, y: 10.0 });

    let mut frames = 0;
    while !world.is_termination_requested() {
        world.update();
        frames += 1;
    }
    world.end();

    println!("Ran {frames} frames, {} entities left", world.entity_count());
    println!("{world}");
    Ok(())
}
