//! Entity type and the identity & signature registry.
//!
//! An [`Entity`] is a lightweight `u32` identifier with no inherent data.
//! Ids are recycled: destroying an entity returns its id to the back of a FIFO
//! pool, so a freed id is handed out again only after every other free id.

use std::collections::VecDeque;

use tracing::trace;

use crate::config::MAX_ENTITIES;
use crate::error::EcsError;
use crate::signature::Signature;

/// An entity identifier.
///
/// Entities are pure identifiers; they carry no data of their own. Components
/// are attached to entities to give them meaning.
///
/// Ids are unique among live entities only. A handle kept across a destroy
/// call may later alias a newly created entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u32);

impl Entity {
    /// The "no entity" sentinel. Never handed out by a registry.
    pub const INVALID: Entity = Entity(u32::MAX);

    /// Create an entity from a raw `u32` identifier.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` identifier.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the identifier as a table index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` if this is not [`Entity::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "Entity({})", self.0)
        } else {
            write!(f, "Entity(INVALID)")
        }
    }
}

/// Allocates and recycles entity ids and stores each entity's [`Signature`].
///
/// All tables are sized to [`MAX_ENTITIES`] up front; no operation after
/// construction allocates. This registry manages identity only: the caller is
/// responsible for clearing component storage and system membership.
#[derive(Debug)]
pub struct EntityRegistry {
    /// Free ids, oldest first.
    available: VecDeque<Entity>,
    /// One signature per possible id.
    signatures: Box<[Signature]>,
    /// Liveness per possible id.
    alive: Box<[bool]>,
    living: usize,
}

impl EntityRegistry {
    /// Creates a registry with every id in `[0, MAX_ENTITIES)` free, in
    /// ascending order.
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: (0..MAX_ENTITIES as u32).map(Entity).collect(),
            signatures: vec![Signature::EMPTY; MAX_ENTITIES].into_boxed_slice(),
            alive: vec![false; MAX_ENTITIES].into_boxed_slice(),
            living: 0,
        }
    }

    /// Takes the oldest free id. The new entity has an empty signature.
    pub fn create(&mut self) -> Result<Entity, EcsError> {
        let Some(entity) = self.available.pop_front() else {
            return Err(EcsError::TooManyEntities(MAX_ENTITIES));
        };
        self.alive[entity.index()] = true;
        self.living += 1;
        trace!(%entity, living = self.living, "entity created");
        Ok(entity)
    }

    /// Clears the entity's signature and pushes its id to the back of the
    /// free pool.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        let index = entity.index();
        self.signatures[index] = Signature::EMPTY;
        self.alive[index] = false;
        self.available.push_back(entity);
        self.living -= 1;
        trace!(%entity, living = self.living, "entity destroyed");
        Ok(())
    }

    /// Overwrites a live entity's signature.
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        self.signatures[entity.index()] = signature;
        Ok(())
    }

    /// Returns the entity's signature. Dead ids report the empty signature.
    pub fn signature(&self, entity: Entity) -> Result<Signature, EcsError> {
        self.check_range(entity)?;
        Ok(self.signatures[entity.index()])
    }

    /// Returns `true` if the id is in range and currently live.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn living_count(&self) -> usize {
        self.living
    }

    /// Iterates over live entities in ascending id order, with their
    /// signatures.
    pub fn iter_alive(&self) -> impl Iterator<Item = (Entity, Signature)> + '_ {
        self.alive
            .iter()
            .zip(self.signatures.iter())
            .enumerate()
            .filter(|(_, (alive, _))| **alive)
            .map(|(index, (_, signature))| (Entity(index as u32), *signature))
    }

    fn check_range(&self, entity: Entity) -> Result<(), EcsError> {
        if entity.index() < MAX_ENTITIES {
            Ok(())
        } else {
            Err(EcsError::EntityOutOfRange(entity))
        }
    }

    /// Fails unless the id is in range and currently live.
    pub fn ensure_alive(&self, entity: Entity) -> Result<(), EcsError> {
        self.check_range(entity)?;
        if self.alive[entity.index()] {
            Ok(())
        } else {
            Err(EcsError::EntityNotAlive(entity))
        }
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;

    #[test]
    fn test_entity_sentinel() {
        assert!(!Entity::INVALID.is_valid());
        assert!(Entity::from_raw(0).is_valid());
        assert_eq!(Entity::from_raw(7).id(), 7);
        assert_eq!(Entity::INVALID.to_string(), "Entity(INVALID)");
        assert_eq!(Entity::from_raw(3).to_string(), "Entity(3)");
    }

    #[test]
    fn test_create_hands_out_ascending_ids() {
        let mut registry = EntityRegistry::new();
        let e0 = registry.create().unwrap();
        let e1 = registry.create().unwrap();
        let e2 = registry.create().unwrap();
        assert_eq!((e0.id(), e1.id(), e2.id()), (0, 1, 2));
        assert_eq!(registry.living_count(), 3);
    }

    #[test]
    fn test_recycling_is_fifo() {
        let mut registry = EntityRegistry::new();
        let first = registry.create().unwrap();
        registry.destroy(first).unwrap();

        // Every never-used id comes out before the destroyed one.
        for expected in 1..MAX_ENTITIES as u32 {
            assert_eq!(registry.create().unwrap().id(), expected);
        }
        assert_eq!(registry.create().unwrap(), first);
    }

    #[test]
    fn test_capacity_exhausted() {
        let mut registry = EntityRegistry::new();
        for _ in 0..MAX_ENTITIES {
            registry.create().unwrap();
        }
        assert_eq!(
            registry.create(),
            Err(EcsError::TooManyEntities(MAX_ENTITIES))
        );
        assert_eq!(registry.living_count(), MAX_ENTITIES);
    }

    #[test]
    fn test_destroy_resets_signature() {
        let mut registry = EntityRegistry::new();
        let entity = registry.create().unwrap();
        let sig = Signature::EMPTY.with(ComponentType::new(3));
        registry.set_signature(entity, sig).unwrap();
        assert_eq!(registry.signature(entity).unwrap(), sig);

        registry.destroy(entity).unwrap();
        assert_eq!(registry.signature(entity).unwrap(), Signature::EMPTY);
        assert!(!registry.is_alive(entity));
    }

    #[test]
    fn test_destroy_dead_entity_is_rejected() {
        let mut registry = EntityRegistry::new();
        let entity = registry.create().unwrap();
        registry.destroy(entity).unwrap();
        assert_eq!(registry.destroy(entity), Err(EcsError::EntityNotAlive(entity)));
        assert_eq!(registry.living_count(), 0);
    }

    #[test]
    fn test_out_of_range_entity() {
        let mut registry = EntityRegistry::new();
        let bogus = Entity::from_raw(MAX_ENTITIES as u32);
        assert_eq!(registry.signature(bogus), Err(EcsError::EntityOutOfRange(bogus)));
        assert_eq!(
            registry.set_signature(bogus, Signature::EMPTY),
            Err(EcsError::EntityOutOfRange(bogus))
        );
        assert!(!registry.is_alive(Entity::INVALID));
    }

    #[test]
    fn test_iter_alive_skips_destroyed() {
        let mut registry = EntityRegistry::new();
        let a = registry.create().unwrap();
        let b = registry.create().unwrap();
        let c = registry.create().unwrap();
        registry.destroy(b).unwrap();

        let live: Vec<Entity> = registry.iter_alive().map(|(e, _)| e).collect();
        assert_eq!(live, vec![a, c]);
    }
}
