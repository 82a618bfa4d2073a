//! Errors reported by the ECS core.

use thiserror::Error;

use crate::ecs::world;

/// An error raised by a [`World`](crate::ecs::World) operation.
///
/// None of these are fatal: the world keeps running and the caller decides what to do.
#[derive(Debug, Error)]
pub enum Error {
    /// A system could not be built, either because no constructor was registered for it or
    /// because its constructor failed.
    #[error("system `{system}` could not be constructed: {reason}")]
    SystemConstruction {
        /// The type (or registered) name of the system.
        system: String,
        /// What went wrong.
        reason: String,
    },

    /// No entity class is registered under the requested name.
    #[error("unknown entity class `{0}`")]
    UnknownEntityClass(String),

    /// An entity created by one world was added to another, even one with the same id.
    #[error("entity was created by world {owner:?} and cannot be added to world {world:?}")]
    ForeignEntity {
        /// The world the entity was offered to.
        world: world::Id,
        /// The world that created the entity.
        owner: world::Id,
    },

    /// An entity class configuration names a component type the loader does not know.
    #[error("entity class `{class}` uses unregistered component `{component}`")]
    UnknownComponent {
        /// The class being loaded.
        class: String,
        /// The unknown component name.
        component: String,
    },

    /// An entity class configuration could not be decoded.
    #[error("invalid entity class configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias for ECS operations.
pub type Result<T> = std::result::Result<T, Error>;
