//! The [`System`] trait.

use std::any::Any;

use ecs_core::Entity;

use crate::world::World;

/// Per-frame logic that runs over every entity matching a required signature.
///
/// The required signature is supplied at registration
/// ([`World::register_system`]); the world keeps the matching entity set
/// up to date and passes a snapshot of it to [`tick`](System::tick).
///
/// Systems read and write components through the world on every tick. Do not
/// cache references into component storage across ticks: slots move when
/// other entities lose the component.
pub trait System: AsAny {
    /// Runs the system once.
    ///
    /// `entities` is the system's interest set, in ascending id order, as it
    /// was just before this call. Mutations made during the tick (including
    /// by this system) update interest sets immediately but not the slice, so
    /// a system that destroys entities or removes components should check
    /// [`World::is_alive`] or [`World::has_component`] before touching later
    /// entries.
    fn tick(&mut self, world: &mut World, entities: &[Entity], dt: f32);

    /// A human-readable name, used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Upcasts for typed access to registered systems. Implemented for every
/// `'static` type.
pub trait AsAny: Any {
    /// Borrow as `dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Convert an owned box into `Box<dyn Any>`.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
