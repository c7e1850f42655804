//! # ecs_core
//!
//! The bookkeeping half of the ECS: who exists, what they carry, and where
//! it lives in memory.
//!
//! This crate provides:
//!
//! - [`Entity`]: a recyclable `u32` identifier with no inherent data.
//! - [`EntityRegistry`]: FIFO id recycling plus one [`Signature`] per entity.
//! - [`Signature`]: fixed-width bit vector over registered component types.
//! - [`Component`] trait: the contract all ECS data must satisfy.
//! - [`ComponentStore`]: dense swap-and-pop storage for one component type.
//! - [`ComponentRegistry`]: assigns bit positions and owns every store.
//! - [`ComponentSet`]: tuples of component types turned into signatures.
//!
//! Everything here reports contract violations as [`EcsError`]; deciding
//! whether a violation is fatal is left to the caller.

pub mod component;
pub mod config;
pub mod entity;
pub mod error;
pub mod registry;
pub mod set;
pub mod signature;
pub mod storage;

pub use component::{Component, ComponentType};
pub use config::{MAX_COMPONENT_TYPES, MAX_ENTITIES};
pub use entity::{Entity, EntityRegistry};
pub use error::EcsError;
pub use registry::ComponentRegistry;
pub use set::ComponentSet;
pub use signature::Signature;
pub use storage::{ComponentStorage, ComponentStore};
