//! Contract-violation error types.

use crate::entity::Entity;

/// Every way client code can break the ECS contract.
///
/// None of these are environmental failures: each one is a logic bug in the
/// caller. The registries report them; the world facade treats them as fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// All entity ids are in use.
    #[error("too many entities: all {0} entity ids are live")]
    TooManyEntities(usize),

    /// The entity id is outside `[0, MAX_ENTITIES)`.
    #[error("{0} is out of range")]
    EntityOutOfRange(Entity),

    /// The entity id is in range but not currently live.
    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    /// The component type was registered twice.
    #[error("component type `{0}` is already registered")]
    ComponentAlreadyRegistered(&'static str),

    /// The component type was used before being registered.
    #[error("component type `{0}` is not registered")]
    ComponentNotRegistered(&'static str),

    /// Every signature bit is already assigned.
    #[error("cannot register `{name}`: all {limit} component type slots are taken")]
    TooManyComponentTypes {
        /// The type that did not fit.
        name: &'static str,
        /// The configured limit.
        limit: usize,
    },

    /// The entity already carries a component of this type.
    #[error("{entity} already has a `{component}` component")]
    DuplicateComponent {
        /// The entity.
        entity: Entity,
        /// The component type name.
        component: &'static str,
    },

    /// The entity carries no component of this type.
    #[error("{entity} has no `{component}` component")]
    MissingComponent {
        /// The entity.
        entity: Entity,
        /// The component type name.
        component: &'static str,
    },

    /// The dense store has no free slot left.
    #[error("component store for `{0}` is full")]
    StoreFull(&'static str),

    /// The system type was registered twice.
    #[error("system `{0}` is already registered")]
    SystemAlreadyRegistered(&'static str),

    /// The system type is not registered.
    #[error("system `{0}` is not registered")]
    SystemNotRegistered(&'static str),

    /// The system registry cannot be restructured while systems are ticking.
    #[error("cannot unregister system `{0}` while systems are ticking")]
    SystemsTicking(&'static str),

    /// A system tried to tick the world from inside its own tick.
    #[error("world tick called while a tick is already running")]
    NestedTick,
}
