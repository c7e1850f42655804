//! Component registry: maps component types to bit positions and stores.
//!
//! The registry owns one [`ComponentStore`] per registered type, held behind
//! the type-erased [`ComponentStorage`] handle. Callers name the expected type
//! at every call site; the registry recovers the typed store with a checked
//! `Any` downcast.

use std::any::TypeId;
use std::collections::HashMap;

use tracing::debug;

use crate::component::{Component, ComponentType};
use crate::config::MAX_COMPONENT_TYPES;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::storage::{ComponentStorage, ComponentStore};

/// A registered component type.
struct ComponentEntry {
    ty: ComponentType,
    store: Box<dyn ComponentStorage>,
}

/// Registry of every component type known to a world.
#[derive(Default)]
pub struct ComponentRegistry {
    /// Entries keyed by Rust type.
    entries: HashMap<TypeId, ComponentEntry>,
    /// Type ids in registration order; index == bit position.
    order: Vec<TypeId>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `T` the next free bit position and creates its store.
    pub fn register<T: Component>(&mut self) -> Result<ComponentType, EcsError> {
        let key = TypeId::of::<T>();
        if self.entries.contains_key(&key) {
            return Err(EcsError::ComponentAlreadyRegistered(T::type_name()));
        }
        if self.order.len() >= MAX_COMPONENT_TYPES {
            return Err(EcsError::TooManyComponentTypes {
                name: T::type_name(),
                limit: MAX_COMPONENT_TYPES,
            });
        }

        let ty = ComponentType::new(self.order.len() as u8);
        self.entries.insert(
            key,
            ComponentEntry {
                ty,
                store: Box::new(ComponentStore::<T>::new()),
            },
        );
        self.order.push(key);
        debug!(component = T::type_name(), %ty, "registered component type");
        Ok(ty)
    }

    /// Returns the bit position assigned to `T`.
    pub fn component_type<T: Component>(&self) -> Result<ComponentType, EcsError> {
        self.entry::<T>().map(|entry| entry.ty)
    }

    /// Returns `true` if `T` has been registered.
    #[must_use]
    pub fn is_registered<T: Component>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no component type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Stores `value` for `entity` and returns the bit position of `T`.
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> Result<ComponentType, EcsError> {
        let ty = self.component_type::<T>()?;
        self.store_mut::<T>()?.insert(entity, value)?;
        Ok(ty)
    }

    /// Removes the entity's `T` and returns it with the bit position of `T`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Result<(ComponentType, T), EcsError> {
        let ty = self.component_type::<T>()?;
        let value = self.store_mut::<T>()?.remove(entity)?;
        Ok((ty, value))
    }

    /// Returns the entity's `T`.
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.store::<T>()?.get(entity)
    }

    /// Returns the entity's `T`, mutably.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.store_mut::<T>()?.get_mut(entity)
    }

    /// Returns `true` if the entity has a `T`.
    pub fn has<T: Component>(&self, entity: Entity) -> Result<bool, EcsError> {
        Ok(self.store::<T>()?.has(entity))
    }

    /// Returns the typed store of `T`.
    pub fn store<T: Component>(&self) -> Result<&ComponentStore<T>, EcsError> {
        self.entry::<T>()?
            .store
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .ok_or(EcsError::ComponentNotRegistered(T::type_name()))
    }

    /// Returns the typed store of `T`, mutably.
    pub fn store_mut<T: Component>(&mut self) -> Result<&mut ComponentStore<T>, EcsError> {
        let entry = self
            .entries
            .get_mut(&TypeId::of::<T>())
            .ok_or(EcsError::ComponentNotRegistered(T::type_name()))?;
        entry
            .store
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .ok_or(EcsError::ComponentNotRegistered(T::type_name()))
    }

    /// Drops the entity's value from every store that holds one.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for entry in self.entries.values_mut() {
            entry.store.entity_destroyed(entity);
        }
    }

    /// Names of the component types `entity` currently has, in bit order.
    pub fn component_names(&self, entity: Entity) -> impl Iterator<Item = &'static str> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key))
            .filter(move |entry| entry.store.contains(entity))
            .map(|entry| entry.store.component_name())
    }

    fn entry<T: Component>(&self) -> Result<&ComponentEntry, EcsError> {
        self.entries
            .get(&TypeId::of::<T>())
            .ok_or(EcsError::ComponentNotRegistered(T::type_name()))
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for entry in self.order.iter().filter_map(|key| self.entries.get(key)) {
            map.entry(&entry.store.component_name(), &entry.store.len());
        }
        map.finish()
    }
}
