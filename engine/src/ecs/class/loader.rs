use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ecs::{
    class::EntityClass,
    component::{AnyComponent, Component},
    error::{Error, Result},
    util::short_type_name,
    world::World,
};

type Decoder = Box<dyn Fn(Value) -> serde_json::Result<Box<dyn AnyComponent>> + Send + Sync>;

/// Builds [`EntityClass`]es from JSON configuration.
///
/// Component types must be registered with the loader under the name used in the configuration.
/// The expected shape is an object of classes, each an object of component values:
///
/// ```json
/// {
///   "Bullet": {
///     "Position": { "x": 0.0, "y": 0.0 },
///     "Velocity": { "dx": 4.0, "dy": 0.0 }
///   }
/// }
/// ```
#[derive(Default)]
pub struct ClassLoader {
    decoders: HashMap<String, Decoder>,
}

impl ClassLoader {
    /// Create a loader with no known component types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `C` under its short type name.
    pub fn register<C: Component + DeserializeOwned>(&mut self) -> &mut Self {
        let name = short_type_name(std::any::type_name::<C>());
        self.register_as::<C>(name)
    }

    /// Register `C` under an explicit name.
    pub fn register_as<C: Component + DeserializeOwned>(
        &mut self,
        name: impl Into<String>,
    ) -> &mut Self {
        self.decoders.insert(
            name.into(),
            Box::new(|value: Value| {
                let component: C = serde_json::from_value(value)?;
                Ok(Box::new(component) as Box<dyn AnyComponent>)
            }),
        );
        self
    }

    /// Determine if a component name is known to the loader.
    pub fn knows(&self, name: &str) -> bool {
        self.decoders.contains_key(name)
    }

    /// Decode every class in `json`. Classes come back sorted by name.
    pub fn parse(&self, json: &str) -> Result<Vec<EntityClass>> {
        let raw: BTreeMap<String, BTreeMap<String, Value>> = serde_json::from_str(json)?;
        let mut classes = Vec::with_capacity(raw.len());
        for (class_name, components) in raw {
            let mut class = EntityClass::new(class_name.as_str());
            for (component_name, value) in components {
                let decode =
                    self.decoders
                        .get(&component_name)
                        .ok_or_else(|| Error::UnknownComponent {
                            class: class_name.clone(),
                            component: component_name.clone(),
                        })?;
                class.insert_boxed(decode(value)?);
            }
            classes.push(class);
        }
        Ok(classes)
    }

    /// Decode every class in `json` and register them all in `world`, overwriting classes of the
    /// same name. Nothing is registered if any class fails to decode.
    pub fn load(&self, world: &mut World, json: &str) -> Result<usize> {
        let classes = self.parse(json)?;
        let count = classes.len();
        for class in classes {
            world.add_entity_class(class);
        }
        debug!("Loaded {count} entity classes into world {:?}", world.id());
        Ok(count)
    }
}
