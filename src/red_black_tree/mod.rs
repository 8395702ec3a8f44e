//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.
//!
//! Nodes are stored in a `TypedArena` and refer to their children and parent through arena
//! handles. Every absent child, and the parent of the root, is the sentinel leaf, which is always
//! black. The tree is never shared between threads while it is being mutated; `&mut self` on
//! `insert` and `remove` enforces this.

mod compare;
mod map;
mod node;
mod set;
mod tree;
mod verify;

pub use self::compare::{Comparator, Natural};
pub use self::map::{
    RedBlackMap, RedBlackMapIntoIter, RedBlackMapIter, RedBlackMapKeys, RedBlackMapValues,
};
pub use self::node::{Color, NodeRef};
pub use self::set::{RedBlackSet, RedBlackSetIntoIter, RedBlackSetIter};
pub use self::verify::InvariantViolation;
