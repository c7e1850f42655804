//! System registry: owns systems and their interest sets.
//!
//! Each registered system has a required [`Signature`] and a set of entities
//! whose signatures match it. Membership is re-evaluated per system on every
//! signature change; there is no batching or deferral.
//!
//! The registry does not run systems itself: a system needs the whole
//! [`World`](crate::World) while it runs, so the world checks each system out
//! of its slot, runs it, and puts it back.

use std::any::TypeId;
use std::collections::BTreeSet;

use ecs_core::{EcsError, Entity, Signature};
use tracing::debug;

use crate::system::System;

/// One registered system.
struct SystemSlot {
    type_id: TypeId,
    name: &'static str,
    required: Signature,
    entities: BTreeSet<Entity>,
    /// `None` while the system is running.
    system: Option<Box<dyn System>>,
}

/// Registry of every system known to a world, in registration order.
#[derive(Default)]
pub struct SystemRegistry {
    slots: Vec<SystemSlot>,
}

impl SystemRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Stores `system` with its required signature and an empty interest set.
    ///
    /// Returns the system's position in run order. Entities that already
    /// exist are not evaluated; see [`backfill`](Self::backfill).
    pub fn register<S: System>(&mut self, system: S, required: Signature) -> Result<usize, EcsError> {
        let type_id = TypeId::of::<S>();
        if self.position(type_id).is_some() {
            return Err(EcsError::SystemAlreadyRegistered(system.name()));
        }

        let name = system.name();
        self.slots.push(SystemSlot {
            type_id,
            name,
            required,
            entities: BTreeSet::new(),
            system: Some(Box::new(system)),
        });
        debug!(system = name, ?required, "registered system");
        Ok(self.slots.len() - 1)
    }

    /// Removes `S` and returns it.
    ///
    /// Fails while `S` is checked out for its tick.
    pub fn unregister<S: System>(&mut self) -> Result<S, EcsError> {
        let index = self
            .position(TypeId::of::<S>())
            .ok_or(EcsError::SystemNotRegistered(std::any::type_name::<S>()))?;
        if self.slots[index].system.is_none() {
            return Err(EcsError::SystemsTicking(self.slots[index].name));
        }

        let slot = self.slots.remove(index);
        debug!(system = slot.name, "unregistered system");
        slot.system
            .and_then(|system| system.into_any().downcast::<S>().ok())
            .map(|system| *system)
            .ok_or(EcsError::SystemNotRegistered(std::any::type_name::<S>()))
    }

    /// Evaluates `entities` against the requirement of the system at `index`,
    /// inserting every match. Returns the number of entities added.
    pub fn backfill(
        &mut self,
        index: usize,
        entities: impl IntoIterator<Item = (Entity, Signature)>,
    ) -> usize {
        let Some(slot) = self.slots.get_mut(index) else {
            return 0;
        };
        let before = slot.entities.len();
        for (entity, signature) in entities {
            if signature.matches(slot.required) {
                slot.entities.insert(entity);
            }
        }
        slot.entities.len() - before
    }

    /// Re-evaluates every system's interest in `entity` after its signature
    /// changed.
    pub fn signature_changed(&mut self, entity: Entity, signature: Signature) {
        for slot in &mut self.slots {
            if signature.matches(slot.required) {
                slot.entities.insert(entity);
            } else {
                slot.entities.remove(&entity);
            }
        }
    }

    /// Drops `entity` from every interest set.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for slot in &mut self.slots {
            slot.entities.remove(&entity);
        }
    }

    /// Returns the registered `S`, unless it is currently running.
    #[must_use]
    pub fn get<S: System>(&self) -> Option<&S> {
        self.slot::<S>()?
            .system
            .as_ref()?
            .as_ref()
            .as_any()
            .downcast_ref::<S>()
    }

    /// Returns the registered `S` mutably, unless it is currently running.
    #[must_use]
    pub fn get_mut<S: System>(&mut self) -> Option<&mut S> {
        let index = self.position(TypeId::of::<S>())?;
        self.slots[index]
            .system
            .as_mut()?
            .as_mut()
            .as_any_mut()
            .downcast_mut::<S>()
    }

    /// Returns the interest set of `S`.
    #[must_use]
    pub fn entities<S: System>(&self) -> Option<&BTreeSet<Entity>> {
        self.slot::<S>().map(|slot| &slot.entities)
    }

    /// Returns the required signature of `S`.
    #[must_use]
    pub fn required<S: System>(&self) -> Option<Signature> {
        self.slot::<S>().map(|slot| slot.required)
    }

    /// Returns `true` if `S` is registered.
    #[must_use]
    pub fn contains<S: System>(&self) -> bool {
        self.position(TypeId::of::<S>()).is_some()
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// System names in run order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|slot| slot.name)
    }

    /// Takes the system at `index` out of its slot, together with a snapshot
    /// of its interest set. Returns `None` if there is no such slot or the
    /// system is already checked out.
    pub(crate) fn checkout(&mut self, index: usize) -> Option<(Box<dyn System>, Vec<Entity>)> {
        let slot = self.slots.get_mut(index)?;
        let system = slot.system.take()?;
        Some((system, slot.entities.iter().copied().collect()))
    }

    /// Puts a checked-out system back into its slot.
    pub(crate) fn restore(&mut self, index: usize, system: Box<dyn System>) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.system = Some(system);
        }
    }

    fn position(&self, type_id: TypeId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.type_id == type_id)
    }

    fn slot<S: System>(&self) -> Option<&SystemSlot> {
        self.slots
            .iter()
            .find(|slot| slot.type_id == TypeId::of::<S>())
    }
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for slot in &self.slots {
            map.entry(&slot.name, &slot.entities.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use ecs_core::ComponentType;

    use super::*;
    use crate::world::World;

    #[derive(Debug, Default, PartialEq)]
    struct Physics {
        runs: u32,
    }
    impl System for Physics {
        fn tick(&mut self, _world: &mut World, _entities: &[Entity], _dt: f32) {
            self.runs += 1;
        }

        fn name(&self) -> &'static str {
            "physics"
        }
    }

    #[derive(Debug, Default)]
    struct Ai;
    impl System for Ai {
        fn tick(&mut self, _world: &mut World, _entities: &[Entity], _dt: f32) {}

        fn name(&self) -> &'static str {
            "ai"
        }
    }

    fn sig(bits: &[u8]) -> Signature {
        bits.iter().map(|&b| ComponentType::new(b)).collect()
    }

    fn e(id: u32) -> Entity {
        Entity::from_raw(id)
    }

    #[test]
    fn test_register_in_order() {
        let mut registry = SystemRegistry::new();
        assert_eq!(registry.register(Physics::default(), sig(&[0, 1])), Ok(0));
        assert_eq!(registry.register(Ai, sig(&[0])), Ok(1));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["physics", "ai"]);
        assert_eq!(registry.required::<Physics>(), Some(sig(&[0, 1])));
        assert!(registry.entities::<Ai>().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_system_rejected() {
        let mut registry = SystemRegistry::new();
        registry.register(Ai, sig(&[0])).unwrap();
        assert_eq!(
            registry.register(Ai, sig(&[1])),
            Err(EcsError::SystemAlreadyRegistered("ai"))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_signature_changed_updates_each_system() {
        let mut registry = SystemRegistry::new();
        registry.register(Physics::default(), sig(&[0, 1])).unwrap();
        registry.register(Ai, sig(&[0])).unwrap();

        registry.signature_changed(e(1), sig(&[0]));
        assert!(!registry.entities::<Physics>().unwrap().contains(&e(1)));
        assert!(registry.entities::<Ai>().unwrap().contains(&e(1)));

        registry.signature_changed(e(1), sig(&[0, 1, 5]));
        assert!(registry.entities::<Physics>().unwrap().contains(&e(1)));
        assert!(registry.entities::<Ai>().unwrap().contains(&e(1)));

        registry.signature_changed(e(1), sig(&[1]));
        assert!(!registry.entities::<Physics>().unwrap().contains(&e(1)));
        assert!(!registry.entities::<Ai>().unwrap().contains(&e(1)));
    }

    #[test]
    fn test_entity_destroyed_clears_membership() {
        let mut registry = SystemRegistry::new();
        registry.register(Ai, sig(&[0])).unwrap();
        registry.signature_changed(e(2), sig(&[0]));
        registry.signature_changed(e(3), sig(&[0]));

        registry.entity_destroyed(e(2));
        let entities: Vec<_> = registry.entities::<Ai>().unwrap().iter().copied().collect();
        assert_eq!(entities, vec![e(3)]);
    }

    #[test]
    fn test_backfill_counts_matches() {
        let mut registry = SystemRegistry::new();
        let index = registry.register(Physics::default(), sig(&[0, 1])).unwrap();
        let added = registry.backfill(
            index,
            [(e(0), sig(&[0, 1])), (e(1), sig(&[0])), (e(2), sig(&[0, 1, 2]))],
        );
        assert_eq!(added, 2);
        assert_eq!(registry.backfill(7, [(e(0), sig(&[0, 1]))]), 0);
    }

    #[test]
    fn test_typed_access_and_unregister() {
        let mut registry = SystemRegistry::new();
        registry.register(Physics::default(), sig(&[0])).unwrap();
        registry.get_mut::<Physics>().unwrap().runs = 4;
        assert_eq!(registry.get::<Physics>(), Some(&Physics { runs: 4 }));
        assert!(registry.get::<Ai>().is_none());

        let physics = registry.unregister::<Physics>().unwrap();
        assert_eq!(physics.runs, 4);
        assert!(!registry.contains::<Physics>());
        assert!(matches!(
            registry.unregister::<Physics>(),
            Err(EcsError::SystemNotRegistered(_))
        ));
    }

    #[test]
    fn test_checked_out_system_is_busy() {
        let mut registry = SystemRegistry::new();
        registry.register(Ai, sig(&[0])).unwrap();
        registry.signature_changed(e(9), sig(&[0]));

        let (system, snapshot) = registry.checkout(0).unwrap();
        assert_eq!(snapshot, vec![e(9)]);
        assert!(registry.checkout(0).is_none());
        assert!(registry.get::<Ai>().is_none());
        assert!(matches!(
            registry.unregister::<Ai>(),
            Err(EcsError::SystemsTicking("ai"))
        ));

        // Membership keeps updating while the system is out.
        registry.signature_changed(e(10), sig(&[0]));
        registry.restore(0, system);
        assert!(registry.get::<Ai>().is_some());
        assert_eq!(registry.entities::<Ai>().unwrap().len(), 2);
    }
}
