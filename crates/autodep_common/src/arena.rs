//! Append-only arena for dense, ID-indexed storage of build-graph records.
//!
//! Tasks, targets and cache entries live in [`Arena`]s and refer to each other
//! through copyable ids, so back-references never form ownership cycles.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for opaque ID types used as arena keys.
///
/// Implementors must provide a bijection between `u32` indices and the ID type.
pub trait ArenaId: Copy {
    /// Creates an ID from a raw `u32` index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw `u32` index.
    fn as_raw(self) -> u32;
}

/// A dense, ID-indexed container.
///
/// Items are only ever appended, never removed or reordered, so an id stays
/// valid for the lifetime of the arena (one build run).
#[derive(Debug, Clone, Serialize, Deserialize)]
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

    /// Returns a reference to the item with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not allocated by this arena.
    pub fn get(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the item with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not allocated by this arena.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.as_raw() as usize]
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

    /// Iterates over all allocated IDs in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = I> {
        (0..self.items.len() as u32).map(I::from_raw)
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TaskId;

    #[test]
    fn alloc_and_index() {
        let mut arena: Arena<TaskId, String> = Arena::new();
        let a = arena.alloc("main.cpp".to_string());
        let b = arena.alloc("util.cpp".to_string());
        assert_eq!(arena[a], "main.cpp");
        assert_eq!(arena[b], "util.cpp");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn index_mut_modifies() {
        let mut arena: Arena<TaskId, Vec<u32>> = Arena::new();
        let id = arena.alloc(Vec::new());
        arena[id].push(7);
        assert_eq!(arena[id], vec![7]);
    }

    #[test]
    fn ids_are_sequential() {
        let mut arena: Arena<TaskId, ()> = Arena::new();
        arena.alloc(());
        arena.alloc(());
        arena.alloc(());
        let raw: Vec<u32> = arena.ids().map(|id| id.as_raw()).collect();
        assert_eq!(raw, vec![0, 1, 2]);
    }

    #[test]
    fn default_is_empty() {
        let arena: Arena<TaskId, u32> = Arena::default();
        assert!(arena.is_empty());
        assert_eq!(arena.iter().count(), 0);
    }
}
