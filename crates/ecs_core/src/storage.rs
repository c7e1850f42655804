//! Dense per-type component storage.
//!
//! Each registered component type gets one [`ComponentStore`]. Values live in
//! a contiguous array whose occupied slots always form the prefix
//! `[0, len)`. Removal moves the last value into the freed slot (swap-and-pop),
//! so iteration touches only live data:
//!
//! ```text
//! values:   [ A  B  C  D ]        remove(B)        [ A  D  C ]
//! entities: [ e0 e4 e2 e9 ]   ───────────────►     [ e0 e9 e2 ]
//! slots:    e4 → 1, e9 → 3                         e9 → 1, e4 → vacant
//! ```
//!
//! The position of a value is therefore not stable across removals; only the
//! entity → value association is.

use std::any::Any;

use crate::component::Component;
use crate::config::MAX_ENTITIES;
use crate::entity::Entity;
use crate::error::EcsError;

/// Marks an entity with no slot in the store.
const VACANT: u32 = u32::MAX;

/// The type-erased face of a [`ComponentStore`].
///
/// The registry keeps every store behind this trait and only needs the
/// lifecycle hooks; typed access goes through an `Any` downcast.
pub trait ComponentStorage: Any {
    /// Removes the entity's value if it has one. Idempotent.
    fn entity_destroyed(&mut self, entity: Entity);

    /// Returns `true` if the entity has a value in this store.
    fn contains(&self, entity: Entity) -> bool;

    /// Returns the number of stored values.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The component type name, for diagnostics.
    fn component_name(&self) -> &'static str;

    /// Upcast for typed access.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed mutable access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense storage for every value of one component type.
#[derive(Debug)]
pub struct ComponentStore<T> {
    /// Packed values. `values[i]` belongs to `entities[i]`.
    values: Vec<T>,
    /// Slot → entity.
    entities: Vec<Entity>,
    /// Entity index → slot, or [`VACANT`].
    slots: Box<[u32]>,
}

impl<T: Component> ComponentStore<T> {
    /// Creates an empty store able to hold one value per possible entity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            entities: Vec::new(),
            slots: vec![VACANT; MAX_ENTITIES].into_boxed_slice(),
        }
    }

    /// Appends `value` for `entity` at the end of the packed array.
    pub fn insert(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        let index = self.index_of(entity)?;
        if self.slots[index] != VACANT {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: T::type_name(),
            });
        }
        if self.values.len() >= MAX_ENTITIES {
            return Err(EcsError::StoreFull(T::type_name()));
        }
        self.slots[index] = self.values.len() as u32;
        self.values.push(value);
        self.entities.push(entity);
        Ok(())
    }

    /// Removes and returns the entity's value.
    ///
    /// If the value was not in the last slot, the last value moves into its
    /// place and that entity's slot is updated.
    pub fn remove(&mut self, entity: Entity) -> Result<T, EcsError> {
        let slot = self.slot_of(entity)?;
        self.slots[entity.index()] = VACANT;

        let value = self.values.swap_remove(slot);
        self.entities.swap_remove(slot);
        if let Some(&moved) = self.entities.get(slot) {
            self.slots[moved.index()] = slot as u32;
        }
        Ok(value)
    }

    /// Returns a reference to the entity's value.
    pub fn get(&self, entity: Entity) -> Result<&T, EcsError> {
        let slot = self.slot_of(entity)?;
        Ok(&self.values[slot])
    }

    /// Returns a mutable reference to the entity's value.
    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        let slot = self.slot_of(entity)?;
        Ok(&mut self.values[slot])
    }

    /// Returns `true` if the entity has a value in this store.
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.slots
            .get(entity.index())
            .is_some_and(|&slot| slot != VACANT)
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The packed values, in slot order.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// The packed values, mutably, in slot order.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// The owning entity of each slot. Parallel to [`values`](Self::values).
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterates over `(entity, value)` pairs in slot order.
    ///
    /// Slot order is neither id order nor insertion order once anything has
    /// been removed.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.values.iter())
    }

    /// Iterates mutably over `(entity, value)` pairs in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }

    fn index_of(&self, entity: Entity) -> Result<usize, EcsError> {
        let index = entity.index();
        if index < self.slots.len() {
            Ok(index)
        } else {
            Err(EcsError::EntityOutOfRange(entity))
        }
    }

    fn slot_of(&self, entity: Entity) -> Result<usize, EcsError> {
        let slot = self.slots[self.index_of(entity)?];
        if slot == VACANT {
            return Err(EcsError::MissingComponent {
                entity,
                component: T::type_name(),
            });
        }
        Ok(slot as usize)
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage for ComponentStore<T> {
    fn entity_destroyed(&mut self, entity: Entity) {
        if self.has(entity) {
            // Cannot fail: presence was just checked.
            let _ = self.remove(entity);
        }
    }

    fn contains(&self, entity: Entity) -> bool {
        self.has(entity)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn component_name(&self) -> &'static str {
        T::type_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
