//! Append-only, ID-indexed storage for fields and functions.
//!
//! IDs handed out by [`Arena::alloc`] are positions and never move, which is
//! what lets expressions address fields by index.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::Index;

/// Trait for opaque ID types used as arena keys.
pub trait ArenaId: Copy {
    /// Creates an ID from a raw `u32` index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw `u32` index.
    fn as_raw(self) -> u32;
}

/// A dense, ID-indexed container.
///
/// Serializes as a plain list so the JSON contract is just the ordered items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates a new, empty arena.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Allocates a new item in the arena and returns its ID.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_raw(self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// Returns the item with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds. Use [`try_get`](Self::try_get) for
    /// IDs that came from untrusted IR.
    pub fn get(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }

    /// Returns the item with the given ID, or `None` if it is out of bounds.
    pub fn try_get(&self, id: I) -> Option<&T> {
        self.items.get(id.as_raw() as usize)
    }

    /// Returns the number of items in the arena.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the arena contains no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over `(ID, &T)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }

    /// Iterates over references to items in allocation order.
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

impl<I: ArenaId, T> FromIterator<T> for Arena<I, T> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        Self {
            items: iter.into_iter().collect(),
            _marker: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::FieldId;

    #[test]
    fn alloc_and_get() {
        let mut arena: Arena<FieldId, &str> = Arena::new();
        let a = arena.alloc("clock");
        let b = arena.alloc("reset");
        assert_eq!(arena[a], "clock");
        assert_eq!(*arena.get(b), "reset");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn try_get_out_of_range() {
        let mut arena: Arena<FieldId, u32> = Arena::new();
        arena.alloc(7);
        assert_eq!(arena.try_get(FieldId::from_raw(0)), Some(&7));
        assert_eq!(arena.try_get(FieldId::from_raw(1)), None);
    }

    #[test]
    fn iter_ids_are_sequential() {
        let arena: Arena<FieldId, u32> = [10, 20, 30].into_iter().collect();
        let ids: Vec<u32> = arena.iter().map(|(id, _)| id.as_raw()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn serializes_as_list() {
        let arena: Arena<FieldId, String> =
            ["a".to_string(), "b".to_string()].into_iter().collect();
        let json = serde_json::to_string(&arena).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        let back: Arena<FieldId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[FieldId::from_raw(1)], "b");
    }

    #[test]
    fn default_is_empty() {
        let arena: Arena<FieldId, u32> = Arena::default();
        assert!(arena.is_empty());
    }
}
