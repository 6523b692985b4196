//! Fixed-width component signatures.
//!
//! A [`Signature`] is a 32-bit set where bit *i* means "has component type
//! *i*". Entities carry one describing their current components; systems carry
//! one describing the components they require.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use serde::{Deserialize, Serialize};

use crate::component::ComponentTypeId;

/// Maximum number of distinct component types. Equal to the bit width of
/// [`Signature`].
pub const MAX_COMPONENTS: usize = 32;

/// A set of component types, one bit per [`ComponentTypeId`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(u32);

impl Signature {
    /// The empty signature.
    pub const EMPTY: Self = Self(0);

    /// Create an empty signature.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Create a signature from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Set the bit for `id`.
    pub fn set(&mut self, id: ComponentTypeId) {
        self.0 |= 1u32 << id.index();
    }

    /// Clear the bit for `id`.
    pub fn clear(&mut self, id: ComponentTypeId) {
        self.0 &= !(1u32 << id.index());
    }

    /// Clear every bit.
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Returns `true` if the bit for `id` is set.
    #[must_use]
    pub const fn test(self, id: ComponentTypeId) -> bool {
        self.0 & (1u32 << id.index()) != 0
    }

    /// Returns `true` if every bit set in `required` is also set in `self`.
    ///
    /// This is the interest test between an entity signature (`self`) and a
    /// system signature (`required`):
    ///
    /// ```text
    /// (entity & system) == system
    /// ```
    #[must_use]
    pub const fn contains_all(self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of bits set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate over the component type ids set in this signature, lowest first.
    pub fn iter(self) -> impl Iterator<Item = ComponentTypeId> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let tz = bits.trailing_zeros();
            bits &= bits - 1;
            Some(ComponentTypeId::from_index(tz as u8))
        })
    }
}

impl BitAnd for Signature {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl FromIterator<ComponentTypeId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentTypeId>>(iter: I) -> Self {
        let mut signature = Self::new();
        for id in iter {
            signature.set(id);
        }
        signature
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#034b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> ComponentTypeId {
        ComponentTypeId::from_index(n)
    }

    #[test]
    fn test_set_and_clear() {
        let mut s = Signature::new();
        s.set(id(3));
        assert!(s.test(id(3)));
        assert!(!s.test(id(2)));
        s.clear(id(3));
        assert!(s.is_empty());
    }

    #[test]
    fn test_set_twice_is_single_bit() {
        let mut s = Signature::new();
        s.set(id(5));
        s.set(id(5));
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn test_highest_bit() {
        let mut s = Signature::new();
        s.set(id(31));
        assert_eq!(s.bits(), 1u32 << 31);
    }

    #[test]
    fn test_contains_all() {
        let entity: Signature = [id(0), id(1), id(4)].into_iter().collect();
        let movement: Signature = [id(0), id(1)].into_iter().collect();
        let render: Signature = [id(0), id(2)].into_iter().collect();

        assert!(entity.contains_all(movement));
        assert!(!entity.contains_all(render));
        assert!(entity.contains_all(Signature::EMPTY));
        assert_eq!(entity & movement, movement);
    }

    #[test]
    fn test_iter_ascending() {
        let s: Signature = [id(7), id(0), id(12)].into_iter().collect();
        let ids: Vec<u8> = s.iter().map(ComponentTypeId::index).collect();
        assert_eq!(ids, vec![0, 7, 12]);
    }
}
