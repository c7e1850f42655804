//! Tuples of component types as signature builders.
//!
//! A [`ComponentSet`] is how client code spells a requirement such as
//! "Position and Velocity" at the type level: `(Position, Velocity)`.

use crate::component::Component;
use crate::error::EcsError;
use crate::registry::ComponentRegistry;
use crate::signature::Signature;

/// A non-empty tuple of component types.
pub trait ComponentSet {
    /// Builds the signature with one bit per member type.
    ///
    /// Fails if any member is not registered.
    fn signature(registry: &ComponentRegistry) -> Result<Signature, EcsError>;

    /// Names of the member types, in tuple order.
    fn type_names() -> Vec<&'static str>;
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn signature(registry: &ComponentRegistry) -> Result<Signature, EcsError> {
                let mut signature = Signature::EMPTY;
                $( signature.set(registry.component_type::<$name>()?); )+
                Ok(signature)
            }

            fn type_names() -> Vec<&'static str> {
                vec![$($name::type_name()),+]
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);
