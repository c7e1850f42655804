//! The [`World`] facade.
//!
//! The world owns the entity, component and system registries and is the only
//! thing client code talks to. It keeps them in lockstep: after every public
//! call returns, each live entity's signature names exactly the stores that
//! hold a value for it, and each system's interest set is exactly the live
//! entities whose signature covers the system's requirement.
//!
//! The registries report contract violations as [`EcsError`]. The world does
//! not: a violation is a bug in the caller, so it is logged and the call
//! panics at the caller's location.

use std::collections::BTreeSet;

use ecs_core::{
    Component, ComponentRegistry, ComponentSet, ComponentStore, ComponentType, EcsError, Entity,
    EntityRegistry, Signature,
};
use tracing::{debug, error, trace};

use crate::registry::SystemRegistry;
use crate::system::System;

/// Owner of all ECS state for one simulation.
pub struct World {
    entities: EntityRegistry,
    components: ComponentRegistry,
    systems: SystemRegistry,
    /// Set while [`World::tick`] is running.
    ticking: bool,
    /// Completed ticks.
    ticks: u64,
}

impl World {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: EntityRegistry::new(),
            components: ComponentRegistry::new(),
            systems: SystemRegistry::new(),
            ticking: false,
            ticks: 0,
        }
    }

    // ---- Entities ----

    /// Allocates an entity with an empty signature.
    ///
    /// # Panics
    ///
    /// If `MAX_ENTITIES` entities are already live.
    #[track_caller]
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.create().or_fatal();
        // Only systems with an empty requirement can match.
        self.systems.signature_changed(entity, Signature::EMPTY);
        entity
    }

    /// Destroys a live entity, dropping its components and system
    /// memberships before its id goes back into the free pool.
    ///
    /// # Panics
    ///
    /// If `entity` is not live.
    #[track_caller]
    pub fn destroy_entity(&mut self, entity: Entity) {
        self.entities.ensure_alive(entity).or_fatal();
        self.components.entity_destroyed(entity);
        self.systems.entity_destroyed(entity);
        self.entities.destroy(entity).or_fatal();
    }

    /// Returns `true` if `entity` is currently live.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn living_entity_count(&self) -> usize {
        self.entities.living_count()
    }

    /// Returns the signature of a live entity.
    ///
    /// # Panics
    ///
    /// If `entity` is not live.
    #[track_caller]
    #[must_use]
    pub fn signature(&self, entity: Entity) -> Signature {
        self.entities.ensure_alive(entity).or_fatal();
        self.entities.signature(entity).or_fatal()
    }

    // ---- Components ----

    /// Registers `T`, assigning it the next free signature bit.
    ///
    /// # Panics
    ///
    /// If `T` is already registered or every bit is taken.
    #[track_caller]
    pub fn register_component<T: Component>(&mut self) -> ComponentType {
        self.components.register::<T>().or_fatal()
    }

    /// Returns the signature bit of `T`.
    ///
    /// # Panics
    ///
    /// If `T` is not registered.
    #[track_caller]
    #[must_use]
    pub fn component_type<T: Component>(&self) -> ComponentType {
        self.components.component_type::<T>().or_fatal()
    }

    /// Attaches `value` to `entity` and re-evaluates system membership.
    ///
    /// # Panics
    ///
    /// If `entity` is not live, `T` is not registered, or the entity already
    /// has a `T`.
    #[track_caller]
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) {
        self.entities.ensure_alive(entity).or_fatal();
        let ty = self.components.add(entity, value).or_fatal();
        let signature = self.entities.signature(entity).or_fatal().with(ty);
        self.commit_signature(entity, signature);
    }

    /// Detaches the entity's `T`, re-evaluates system membership and returns
    /// the value.
    ///
    /// # Panics
    ///
    /// If `entity` is not live, `T` is not registered, or the entity has no
    /// `T`.
    #[track_caller]
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> T {
        self.entities.ensure_alive(entity).or_fatal();
        let (ty, value) = self.components.remove::<T>(entity).or_fatal();
        let signature = self.entities.signature(entity).or_fatal().without(ty);
        self.commit_signature(entity, signature);
        value
    }

    /// Returns the entity's `T`.
    ///
    /// # Panics
    ///
    /// If `T` is not registered or the entity has no `T`.
    #[track_caller]
    #[must_use]
    pub fn get_component<T: Component>(&self, entity: Entity) -> &T {
        self.components.get::<T>(entity).or_fatal()
    }

    /// Returns the entity's `T`, mutably. Changing a value never changes a
    /// signature.
    ///
    /// # Panics
    ///
    /// If `T` is not registered or the entity has no `T`.
    #[track_caller]
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.components.get_mut::<T>(entity).or_fatal()
    }

    /// Returns `true` if the entity has a `T`. Dead entities have nothing.
    ///
    /// # Panics
    ///
    /// If `T` is not registered.
    #[track_caller]
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components.has::<T>(entity).or_fatal()
    }

    /// Returns the packed store of `T`.
    ///
    /// # Panics
    ///
    /// If `T` is not registered.
    #[track_caller]
    #[must_use]
    pub fn components<T: Component>(&self) -> &ComponentStore<T> {
        self.components.store::<T>().or_fatal()
    }

    /// Returns the packed store of `T`, mutably. Values can be changed in
    /// place; entities cannot be added or removed through it.
    ///
    /// # Panics
    ///
    /// If `T` is not registered.
    #[track_caller]
    pub fn components_mut<T: Component>(&mut self) -> ComponentValuesMut<'_, T> {
        ComponentValuesMut {
            store: self.components.store_mut::<T>().or_fatal(),
        }
    }

    /// Names of the component types `entity` has, in bit order.
    pub fn component_names(&self, entity: Entity) -> impl Iterator<Item = &'static str> + '_ {
        self.components.component_names(entity)
    }

    /// Builds the signature of a tuple of registered component types.
    ///
    /// # Panics
    ///
    /// If any member of `R` is not registered.
    #[track_caller]
    #[must_use]
    pub fn make_signature<R: ComponentSet>(&self) -> Signature {
        R::signature(&self.components).or_fatal()
    }

    // ---- Systems ----

    /// Registers `system` with the component types of `R` as its requirement.
    ///
    /// Live entities that already match are added to its interest set
    /// straight away. A system registered from inside a tick first runs on
    /// the next tick.
    ///
    /// # Panics
    ///
    /// If any member of `R` is not registered or `S` is already registered.
    #[track_caller]
    pub fn register_system<R: ComponentSet, S: System>(&mut self, system: S) {
        let required = self.make_signature::<R>();
        self.register_system_with(system, required);
    }

    /// Registers `system` with an explicit required signature. An empty
    /// signature matches every live entity.
    ///
    /// # Panics
    ///
    /// If `S` is already registered.
    #[track_caller]
    pub fn register_system_with<S: System>(&mut self, system: S, required: Signature) {
        let index = self.systems.register(system, required).or_fatal();
        let added = self.systems.backfill(index, self.entities.iter_alive());
        if added > 0 {
            debug!(index, added, "backfilled interest set");
        }
    }

    /// Removes `S` and hands it back. Its interest set is dropped.
    ///
    /// # Panics
    ///
    /// If `S` is not registered or a tick is running.
    #[track_caller]
    pub fn unregister_system<S: System>(&mut self) -> S {
        if self.ticking {
            fatal(EcsError::SystemsTicking(std::any::type_name::<S>()));
        }
        self.systems.unregister::<S>().or_fatal()
    }

    /// Returns the registered `S`. `None` if it is not registered, or if it
    /// is the system currently running.
    #[must_use]
    pub fn system<S: System>(&self) -> Option<&S> {
        self.systems.get::<S>()
    }

    /// Mutable counterpart of [`World::system`].
    #[must_use]
    pub fn system_mut<S: System>(&mut self) -> Option<&mut S> {
        self.systems.get_mut::<S>()
    }

    /// Returns the interest set of `S`, in ascending id order.
    #[must_use]
    pub fn system_entities<S: System>(&self) -> Option<&BTreeSet<Entity>> {
        self.systems.entities::<S>()
    }

    /// Returns the system registry.
    #[must_use]
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    /// Runs every system once, in registration order.
    ///
    /// Each system receives its interest set as it stood right before the
    /// system started. `dt` is passed through unchanged.
    ///
    /// # Panics
    ///
    /// If called from inside a system's tick.
    #[track_caller]
    pub fn tick(&mut self, dt: f32) {
        if self.ticking {
            fatal(EcsError::NestedTick);
        }
        self.ticking = true;

        let count = self.systems.len();
        for index in 0..count {
            let Some((mut system, entities)) = self.systems.checkout(index) else {
                continue;
            };
            trace!(system = system.name(), entities = entities.len(), "running system");
            system.tick(self, &entities, dt);
            self.systems.restore(index, system);
        }

        self.ticking = false;
        self.ticks += 1;
    }

    /// Returns the number of completed ticks.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Steps 2 and 3 of every structural mutation: persist the signature,
    /// then re-evaluate every system against it.
    fn commit_signature(&mut self, entity: Entity, signature: Signature) {
        self.entities.set_signature(entity, signature).or_fatal();
        self.systems.signature_changed(entity, signature);
        trace!(%entity, ?signature, "signature changed");
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("living", &self.entities.living_count())
            .field("components", &self.components)
            .field("systems", &self.systems)
            .field("ticks", &self.ticks)
            .finish()
    }
}

/// Mutable view of one component store that allows editing values in place
/// but not inserting or removing entries.
pub struct ComponentValuesMut<'w, T: Component> {
    store: &'w mut ComponentStore<T>,
}

impl<T: Component> ComponentValuesMut<'_, T> {
    /// Packed values, in slot order.
    pub fn values_mut(&mut self) -> &mut [T] {
        self.store.values_mut()
    }

    /// Iterates `(entity, value)` pairs in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.store.iter_mut()
    }

    /// Returns the entity's value, if it has one.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.store.get_mut(entity).ok()
    }
}

impl<T: Component> std::ops::Deref for ComponentValuesMut<'_, T> {
    type Target = ComponentStore<T>;

    fn deref(&self) -> &Self::Target {
        self.store
    }
}

/// Logs a contract violation and panics at the caller's location.
#[track_caller]
fn fatal(err: EcsError) -> ! {
    error!(%err, "ECS contract violation");
    panic!("ECS contract violation: {err}");
}

trait OrFatal<T> {
    fn or_fatal(self) -> T;
}

impl<T> OrFatal<T> for Result<T, EcsError> {
    #[track_caller]
    fn or_fatal(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => fatal(err),
        }
    }
}
