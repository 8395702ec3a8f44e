//! Chunked slot allocator used to store tree nodes.

use log::trace;
use std::mem;
use std::ops::{Index, IndexMut};

/// A copyable reference to an object stored in a `TypedArena<T>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk: u32,
    slot: u32,
}

#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// An allocator for objects of a single type that hands out `Handle`s instead of pointers.
///
/// Storage grows one chunk at a time and existing chunks are never reallocated, so a full arena
/// does not move any of the objects it already holds. Freed slots are threaded onto a free list
/// and reused by later allocations. Since objects refer to each other through `Handle`s, linked
/// structures with back-references (such as parent links in a tree) need no shared ownership and
/// no unsafe code.
///
/// # Examples
///
/// ```
/// use ordered_rbtree::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert!(arena.is_empty());
/// ```
#[derive(Clone)]
pub struct TypedArena<T> {
    free_head: Option<Handle>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn slot(&self, handle: &Handle) -> Option<&Slot<T>> {
        self.chunks
            .get(handle.chunk as usize)
            .and_then(|chunk| chunk.get(handle.slot as usize))
    }

    fn slot_mut(&mut self, handle: &Handle) -> Option<&mut Slot<T>> {
        self.chunks
            .get_mut(handle.chunk as usize)
            .and_then(|chunk| chunk.get_mut(handle.slot as usize))
    }

    /// Constructs a new, empty `TypedArena<T>` that grows by `chunk_size` objects at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Error: chunk size must be positive.");
        TypedArena {
            free_head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
        }
    }

    /// Moves an object into the arena and returns the `Handle` that refers to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        if self.len == self.capacity {
            trace!(
                "growing arena to {} chunks of {} slots",
                self.chunks.len() + 1,
                self.chunk_size,
            );
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }
        self.len += 1;

        match self.free_head.take() {
            None => {
                let chunk_index = self.chunks.len() - 1;
                let chunk = &mut self.chunks[chunk_index];
                chunk.push(Slot::Occupied(value));
                Handle {
                    chunk: chunk_index as u32,
                    slot: (chunk.len() - 1) as u32,
                }
            },
            Some(handle) => {
                let chunk = &mut self.chunks[handle.chunk as usize];
                match mem::replace(&mut chunk[handle.slot as usize], Slot::Occupied(value)) {
                    Slot::Vacant(next) => {
                        self.free_head = next;
                        handle
                    },
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                }
            },
        }
    }

    /// Removes an object from the arena and returns it. The slot is reused by a later
    /// allocation, so `handle` must not be used afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an occupied slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(&x), 0);
    /// ```
    pub fn free(&mut self, handle: &Handle) -> T {
        let next = self.free_head;
        let slot = match self.slot_mut(handle) {
            Some(slot) => slot,
            None => panic!("Error: attempting to free invalid slot."),
        };
        if let Slot::Vacant(_) = slot {
            panic!("Error: attempting to free vacant slot.");
        }
        match mem::replace(slot, Slot::Vacant(next)) {
            Slot::Occupied(value) => {
                self.len -= 1;
                self.free_head = Some(*handle);
                value
            },
            Slot::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to an object in the arena, or `None` if `handle` does not
    /// refer to an occupied slot.
    pub fn get(&self, handle: &Handle) -> Option<&T> {
        match self.slot(handle) {
            Some(Slot::Occupied(ref value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena, or `None` if `handle` does not
    /// refer to an occupied slot.
    pub fn get_mut(&mut self, handle: &Handle) -> Option<&mut T> {
        match self.slot_mut(handle) {
            Some(Slot::Occupied(ref mut value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of objects currently stored in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena stores no objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every object in the arena and releases its chunks. All outstanding handles become
    /// invalid.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.free_head = None;
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(&handle).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(&handle).expect("Error: handle out of bounds.")
    }
}

#[cfg(test)]
mod tests {
    use super::{Handle, TypedArena};

    #[test]
    #[should_panic]
    fn test_zero_chunk_size() {
        let _: TypedArena<u32> = TypedArena::new(0);
    }

    #[test]
    #[should_panic]
    fn test_free_invalid_slot() {
        let mut arena: TypedArena<u32> = TypedArena::new(1024);
        arena.free(&Handle { chunk: 0, slot: 0 });
    }

    #[test]
    #[should_panic]
    fn test_free_vacant_slot() {
        let mut arena = TypedArena::new(1024);
        let x = arena.allocate(0);
        arena.free(&x);
        arena.free(&x);
    }

    #[test]
    fn test_allocate() {
        let mut arena = TypedArena::new(1024);
        assert_eq!(arena.allocate(0), Handle { chunk: 0, slot: 0 });
        assert_eq!(arena.allocate(0), Handle { chunk: 0, slot: 1 });
        assert_eq!(arena.allocate(0), Handle { chunk: 0, slot: 2 });
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_allocate_multiple_chunks() {
        let mut arena = TypedArena::new(2);
        assert_eq!(arena.allocate(0), Handle { chunk: 0, slot: 0 });
        assert_eq!(arena.allocate(0), Handle { chunk: 0, slot: 1 });
        assert_eq!(arena.allocate(0), Handle { chunk: 1, slot: 0 });
    }

    #[test]
    fn test_free_reuses_slot() {
        let mut arena = TypedArena::new(2);
        let a = arena.allocate(1);
        let b = arena.allocate(2);
        arena.allocate(3);
        assert_eq!(arena.free(&a), 1);
        assert_eq!(arena.free(&b), 2);

        // most recently freed slot comes back first
        assert_eq!(arena.allocate(4), b);
        assert_eq!(arena.allocate(5), a);
        assert_eq!(arena.allocate(6), Handle { chunk: 1, slot: 1 });
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn test_get() {
        let mut arena = TypedArena::new(1024);
        let x = arena.allocate(0);
        assert_eq!(arena.get(&x), Some(&0));
        assert_eq!(arena.get(&Handle { chunk: 0, slot: 1 }), None);
        assert_eq!(arena.get(&Handle { chunk: 1, slot: 0 }), None);
    }

    #[test]
    fn test_get_vacant_slot() {
        let mut arena = TypedArena::new(1024);
        let x = arena.allocate(0);
        arena.free(&x);
        assert_eq!(arena.get(&x), None);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = TypedArena::new(1024);
        let x = arena.allocate(0);
        *arena.get_mut(&x).unwrap() = 1;
        assert_eq!(arena[x], 1);
    }

    #[test]
    fn test_clear() {
        let mut arena = TypedArena::new(2);
        let x = arena.allocate(0);
        arena.allocate(1);
        arena.allocate(2);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(&x), None);
        assert_eq!(arena.allocate(3), Handle { chunk: 0, slot: 0 });
    }
}
