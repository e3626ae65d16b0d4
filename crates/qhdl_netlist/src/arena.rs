//! Append-only storage addressed by typed IDs.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::Index;

/// A `u32` newtype usable as an [`Arena`] key.
pub trait ArenaId: Copy {
    /// Builds the ID for slot `index`.
    fn from_raw(index: u32) -> Self;

    /// Slot index of this ID.
    fn as_raw(self) -> u32;
}

/// Dense, append-only storage. IDs stay valid for the life of the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `item` and returns its ID.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_raw(self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// Looks up an ID that may come from elsewhere.
    pub fn try_get(&self, id: I) -> Option<&T> {
        self.items.get(id.as_raw() as usize)
    }

    /// Looks up an ID handed out by this arena.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not allocated here.
    pub fn get(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }

    /// Mutable lookup.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not allocated here.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.as_raw() as usize]
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when nothing has been allocated.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `(id, item)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }

    /// Items in allocation order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::LeafId;

    #[test]
    fn alloc_and_index() {
        let mut arena: Arena<LeafId, &str> = Arena::new();
        let b1 = arena.alloc("B1");
        let b2 = arena.alloc("B2");
        assert_eq!(arena[b1], "B1");
        assert_eq!(arena[b2], "B2");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn try_get_out_of_range() {
        let arena: Arena<LeafId, u8> = Arena::new();
        assert!(arena.is_empty());
        assert!(arena.try_get(LeafId::from_raw(3)).is_none());
    }

    #[test]
    fn iteration_follows_allocation_order() {
        let mut arena: Arena<LeafId, u32> = Arena::new();
        arena.alloc(7);
        arena.alloc(9);
        *arena.get_mut(LeafId::from_raw(0)) += 1;
        let pairs: Vec<_> = arena.iter().map(|(id, v)| (id.as_raw(), *v)).collect();
        assert_eq!(pairs, vec![(0, 8), (1, 9)]);
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut arena: Arena<LeafId, String> = Arena::new();
        arena.alloc("B1".to_string());
        let json = serde_json::to_string(&arena).unwrap();
        assert_eq!(json, r#"["B1"]"#);
        let back: Arena<LeafId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, arena);
    }
}
