//! An ordered set and an ordered map backed by a red-black tree.
//!
//! Elements are ordered by a comparator supplied when a collection is constructed, or by their
//! `Ord` implementation by default. Nodes live in a typed arena, so parent links are plain
//! handles rather than shared pointers.

mod entry;
pub mod arena;
pub mod red_black_tree;
