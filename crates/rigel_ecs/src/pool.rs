//! Dense per-type component storage.
//!
//! A [`Pool<T>`] holds every value of one component type, indexed directly by
//! entity slot. Slots are `Option<T>`: an empty slot is the tombstone left by
//! a removed component or a killed entity. Pools only ever grow.
//!
//! The [`Registry`](crate::Registry) keeps one pool per component type behind
//! the object-safe [`AnyPool`] trait and recovers the concrete `Pool<T>` with
//! a downcast at the generic call site.

use std::any::Any;

use crate::component::Component;
use crate::error::EcsError;

/// Entity-indexed storage for one component type.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    data: Vec<Option<T>>,
}

impl<T> Pool<T> {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a pool with `len` empty slots.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        let mut pool = Self::new();
        pool.resize(len);
        pool
    }

    /// Number of slots (filled or empty).
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the pool has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of filled slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.data.iter().filter(|slot| slot.is_some()).count()
    }

    /// Grow to at least `len` slots. New slots are empty. Never shrinks.
    pub fn resize(&mut self, len: usize) {
        if len > self.data.len() {
            self.data.resize_with(len, || None);
        }
    }

    /// Overwrite slot `index` with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::PoolIndexOutOfRange`] if `index` is past the end;
    /// callers grow the pool with [`Pool::resize`] first.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), EcsError> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(EcsError::PoolIndexOutOfRange { index, len })?;
        *slot = Some(value);
        Ok(())
    }

    /// Returns the value in slot `index`, if filled.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index).and_then(Option::as_ref)
    }

    /// Returns a mutable reference to the value in slot `index`, if filled.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index).and_then(Option::as_mut)
    }

    /// Empty slot `index`, returning the previous value.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.data.get_mut(index).and_then(Option::take)
    }

    /// Drop every value and slot.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Iterate over filled slots as `(index, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Object-safe view of a [`Pool<T>`] with the component type erased.
pub trait AnyPool: Any {
    /// Name of the component type stored in this pool.
    fn component_name(&self) -> &'static str;

    /// Number of slots.
    fn len(&self) -> usize;

    /// Returns `true` if the pool has no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty slot `index`, dropping its value. Returns `true` if it was
    /// filled.
    fn remove_slot(&mut self, index: usize) -> bool;

    /// Upcast for downcasting to the concrete pool.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete pool.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyPool for Pool<T> {
    fn component_name(&self) -> &'static str {
        T::type_name()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn remove_slot(&mut self, index: usize) -> bool {
        self.remove(index).is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Health(f32);
    impl Component for Health {}

    #[test]
    fn test_resize_grows_with_empty_slots() {
        let mut pool: Pool<Health> = Pool::new();
        pool.resize(4);
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.occupied(), 0);
        assert!(pool.get(3).is_none());
    }

    #[test]
    fn test_resize_never_shrinks() {
        let mut pool: Pool<Health> = Pool::with_len(8);
        pool.resize(2);
        assert_eq!(pool.len(), 8);
    }

    #[test]
    fn test_set_and_get() {
        let mut pool = Pool::with_len(2);
        pool.set(1, Health(50.0)).unwrap();
        assert_eq!(pool.get(1), Some(&Health(50.0)));
        pool.get_mut(1).unwrap().0 = 10.0;
        assert_eq!(pool.get(1), Some(&Health(10.0)));
    }

    #[test]
    fn test_set_out_of_range() {
        let mut pool = Pool::with_len(2);
        let err = pool.set(2, Health(1.0)).unwrap_err();
        assert_eq!(err, EcsError::PoolIndexOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn test_remove_leaves_tombstone() {
        let mut pool = Pool::with_len(3);
        pool.set(0, Health(1.0)).unwrap();
        assert_eq!(pool.remove(0), Some(Health(1.0)));
        assert_eq!(pool.remove(0), None);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_iter_skips_empty() {
        let mut pool = Pool::with_len(4);
        pool.set(1, Health(1.0)).unwrap();
        pool.set(3, Health(3.0)).unwrap();
        let indices: Vec<usize> = pool.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_type_erased_downcast() {
        let mut boxed: Box<dyn AnyPool> = Box::new(Pool::<Health>::with_len(1));
        assert_eq!(boxed.len(), 1);
        boxed
            .as_any_mut()
            .downcast_mut::<Pool<Health>>()
            .unwrap()
            .set(0, Health(2.0))
            .unwrap();
        assert!(boxed.remove_slot(0));
        assert!(!boxed.remove_slot(0));
        assert!(boxed.as_any().downcast_ref::<Pool<u32>>().is_none());
    }
}
