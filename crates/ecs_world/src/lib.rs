//! # ecs_world
//!
//! The "S" in ECS, and the facade that ties everything together.
//!
//! This crate provides:
//!
//! - [`System`] trait: per-frame logic over a maintained set of entities.
//! - [`SystemRegistry`]: owns systems in registration order and keeps each
//!   one's interest set equal to the live entities matching its signature.
//! - [`World`]: the single entry point for client code. Every structural
//!   mutation runs the same three steps: mutate storage, persist the new
//!   signature, re-evaluate system membership.
//!
//! ## Usage
//!
//! ```rust
//! use ecs_core::{Component, Entity};
//! use ecs_world::{System, World};
//!
//! struct Position(f32);
//! impl Component for Position {}
//!
//! struct Velocity(f32);
//! impl Component for Velocity {}
//!
//! struct Movement;
//!
//! impl System for Movement {
//!     fn tick(&mut self, world: &mut World, entities: &[Entity], dt: f32) {
//!         for &entity in entities {
//!             let v = world.get_component::<Velocity>(entity).0;
//!             world.get_component_mut::<Position>(entity).0 += v * dt;
//!         }
//!     }
//! }
//!
//! let mut world = World::new();
//! world.register_component::<Position>();
//! world.register_component::<Velocity>();
//! world.register_system::<(Position, Velocity), _>(Movement);
//!
//! let e = world.create_entity();
//! world.add_component(e, Position(0.0));
//! world.add_component(e, Velocity(2.0));
//! world.tick(0.5);
//! assert_eq!(world.get_component::<Position>(e).0, 1.0);
//! ```

pub mod registry;
pub mod system;
pub mod world;

pub use registry::SystemRegistry;
pub use system::{AsAny, System};
pub use world::{ComponentValuesMut, World};
