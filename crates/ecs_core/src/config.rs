//! Compile-time capacity limits.
//!
//! These are deliberately not runtime-configurable: every per-entity table is
//! sized from [`MAX_ENTITIES`] and every signature is [`MAX_COMPONENT_TYPES`]
//! bits wide.

/// Maximum number of entities that can be live at the same time.
pub const MAX_ENTITIES: usize = 5000;

/// Maximum number of distinct component types a registry can hold.
pub const MAX_COMPONENT_TYPES: usize = 32;

// Signatures are backed by a single `u64`.
const _: () = assert!(MAX_COMPONENT_TYPES <= 64);
// Entity ids are `u32` and `u32::MAX` is the sentinel.
const _: () = assert!(MAX_ENTITIES < u32::MAX as usize);
const _: () = assert!(MAX_ENTITIES > 0);
