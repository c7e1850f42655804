//! Core [`Component`] trait and the [`ComponentType`] bit position.
//!
//! Component types are identified at runtime by their [`std::any::TypeId`].
//! The first time a type is registered it receives the next free
//! [`ComponentType`], which is the bit it occupies in every [`Signature`].
//!
//! [`Signature`]: crate::Signature

use crate::config::MAX_COMPONENT_TYPES;

/// The bit position assigned to a registered component type.
///
/// Always `< MAX_COMPONENT_TYPES`. Stable for the lifetime of the registry
/// that assigned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentType(u8);

impl ComponentType {
    /// Wrap a raw bit position.
    ///
    /// # Panics
    ///
    /// Panics if `bit >= MAX_COMPONENT_TYPES`.
    #[must_use]
    pub const fn new(bit: u8) -> Self {
        assert!((bit as usize) < MAX_COMPONENT_TYPES, "component bit out of range");
        Self(bit)
    }

    /// Returns the bit position.
    #[must_use]
    pub const fn bit(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bit {}", self.0)
    }
}

/// The core component trait.
///
/// All data stored in the ECS must implement this trait. Components are plain
/// values owned by the store of their type; no `Send`/`Sync` bound is needed
/// because the runtime is single-threaded.
///
/// # Examples
///
/// ```rust
/// use ecs_core::Component;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Health {
///     current: i32,
///     max: i32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: 'static {
    /// A human-readable name for this component type, used in diagnostics.
    ///
    /// Defaults to the fully qualified Rust type name.
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;
    impl Component for Marker {}

    struct Named;
    impl Component for Named {
        fn type_name() -> &'static str {
            "Named"
        }
    }

    #[test]
    fn test_component_type_bit() {
        let ty = ComponentType::new(5);
        assert_eq!(ty.bit(), 5);
        assert_eq!(ty.to_string(), "bit 5");
    }

    #[test]
    #[should_panic(expected = "component bit out of range")]
    fn test_component_type_out_of_range() {
        let _ = ComponentType::new(MAX_COMPONENT_TYPES as u8);
    }

    #[test]
    fn test_default_type_name() {
        assert!(Marker::type_name().ends_with("Marker"));
        assert_eq!(Named::type_name(), "Named");
    }
}
