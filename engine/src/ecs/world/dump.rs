use std::fmt;

use serde_json::Value;

use crate::ecs::world::World;

impl World {
    /// Describe the world for debugging: entity classes sorted by name, systems in registration
    /// order with the component names they are interested in, then active entities in slot
    /// order. Values are encoded as JSON. The format is for people, not machines.
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---Entity classes---")?;
        let mut classes: Vec<_> = self.entity_classes().collect();
        classes.sort_by(|a, b| a.name().cmp(b.name()));
        for class in classes {
            writeln!(f, "{}: {}", class.name(), class.components_json())?;
        }

        writeln!(f, "---Component systems---")?;
        for info in self.systems() {
            let interest: Vec<Value> = info
                .interest
                .iter()
                .map(|id| Value::String(self.registry().short_name(id)))
                .collect();
            writeln!(f, "{}: {}", info.name, Value::Array(interest))?;
        }

        writeln!(f, "---Entities---")?;
        for entity in self.entities() {
            writeln!(
                f,
                "{} ({}): {}",
                entity.name(),
                entity.id(),
                entity.components_json()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use crate::ecs::{
        Component, EntityClass, World,
        component::{self, ComponentTypeGroup},
        system::{Context, System},
        world,
    };

    #[derive(Component, Clone, Debug, Serialize)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Component, Clone, Debug, Serialize)]
    struct Health(u32);

    struct Healing;

    impl System for Healing {
        fn interest(&self, registry: &component::Registry) -> ComponentTypeGroup {
            ComponentTypeGroup::of::<Health>(registry)
        }

        fn on_update(&mut self, _ctx: &mut Context<'_>) {}
    }

    #[test]
    fn dump_lists_classes_systems_and_entities() {
        // Given
        let mut world = World::new(world::Id::new(0));
        world.add_entity_class(EntityClass::new("Zombie").with(Health(3)));
        world.add_entity_class(EntityClass::new("Crate").with(Position { x: 1.0, y: 2.0 }));
        world.insert_system(Healing);
        let ship = world.create_entity("ship").with(Position { x: 0.0, y: 0.0 });
        world.add_entity(ship).unwrap();

        // When
        let dump = world.dump();

        // Then
        let expected = [
            "---Entity classes---",
            r#"Crate: {"Position":{"x":1.0,"y":2.0}}"#,
            r#"Zombie: {"Health":3}"#,
            "---Component systems---",
            r#"Healing: ["Health"]"#,
            "---Entities---",
            r#"ship (0v0): {"Position":{"x":0.0,"y":0.0}}"#,
        ];
        assert_eq!(dump.lines().collect::<Vec<_>>(), expected);
        assert_eq!(world.to_string(), dump);
    }
}
