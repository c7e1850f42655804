//! Component signatures.
//!
//! A [`Signature`] records which component types an entity carries, or which
//! component types a system requires. Matching is a single mask test:
//!
//! ```text
//! (entity & required) == required
//! ```

use std::ops::{BitAnd, BitOr};

use crate::component::ComponentType;

/// A fixed-width bit vector with one bit per registered component type.
///
/// Bits at or above [`MAX_COMPONENT_TYPES`](crate::MAX_COMPONENT_TYPES) are
/// never set because [`ComponentType`] cannot name them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature(u64);

impl Signature {
    /// No component types.
    pub const EMPTY: Signature = Signature(0);

    /// Sets the bit for `ty`.
    pub fn set(&mut self, ty: ComponentType) {
        self.0 |= 1 << ty.bit();
    }

    /// Clears the bit for `ty`.
    pub fn clear(&mut self, ty: ComponentType) {
        self.0 &= !(1 << ty.bit());
    }

    /// Returns a copy with the bit for `ty` set.
    #[must_use]
    pub fn with(mut self, ty: ComponentType) -> Self {
        self.set(ty);
        self
    }

    /// Returns a copy with the bit for `ty` cleared.
    #[must_use]
    pub fn without(mut self, ty: ComponentType) -> Self {
        self.clear(ty);
        self
    }

    /// Returns `true` if the bit for `ty` is set.
    #[must_use]
    pub fn contains(self, ty: ComponentType) -> bool {
        self.0 & (1 << ty.bit()) != 0
    }

    /// Returns `true` if every bit of `required` is also set in `self`.
    #[must_use]
    pub fn matches(self, required: Signature) -> bool {
        self & required == required
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of set bits.
    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over the set bits in ascending order.
    pub fn iter(self) -> impl Iterator<Item = ComponentType> {
        let mut remaining = self.0;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let bit = remaining.trailing_zeros() as u8;
            remaining &= remaining - 1;
            Some(ComponentType::new(bit))
        })
    }
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(self, rhs: Signature) -> Signature {
        Signature(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(self, rhs: Signature) -> Signature {
        Signature(self.0 | rhs.0)
    }
}

impl FromIterator<ComponentType> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentType>>(iter: I) -> Self {
        iter.into_iter().fold(Signature::EMPTY, Signature::with)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter().map(ComponentType::bit)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(bit: u8) -> ComponentType {
        ComponentType::new(bit)
    }

    #[test]
    fn test_set_and_clear() {
        let mut sig = Signature::EMPTY;
        assert!(sig.is_empty());
        sig.set(ty(4));
        assert!(sig.contains(ty(4)));
        assert!(!sig.contains(ty(3)));
        sig.clear(ty(4));
        assert!(sig.is_empty());
    }

    #[test]
    fn test_superset_matches() {
        let position = ty(0);
        let velocity = ty(1);
        let sprite = ty(2);

        let required = Signature::EMPTY.with(position).with(velocity);
        let mover = required.with(sprite);
        let statue = Signature::EMPTY.with(position).with(sprite);

        assert!(mover.matches(required));
        assert!(required.matches(required));
        assert!(!statue.matches(required));
        // Everything matches the empty requirement.
        assert!(Signature::EMPTY.matches(Signature::EMPTY));
    }

    #[test]
    fn test_iter_ascending() {
        let sig: Signature = [ty(9), ty(0), ty(31)].into_iter().collect();
        let bits: Vec<u8> = sig.iter().map(ComponentType::bit).collect();
        assert_eq!(bits, vec![0, 9, 31]);
        assert_eq!(sig.len(), 3);
    }

    #[test]
    fn test_with_without_are_copies() {
        let base = Signature::EMPTY.with(ty(1));
        let more = base.with(ty(2));
        assert_eq!(base.len(), 1);
        assert_eq!(more.without(ty(2)), base);
        assert_eq!(base | Signature::EMPTY.with(ty(2)), more);
        assert_eq!(more & base, base);
    }

    #[test]
    fn test_debug_lists_bits() {
        let sig = Signature::EMPTY.with(ty(2)).with(ty(7));
        assert_eq!(format!("{sig:?}"), "{2, 7}");
    }
}
