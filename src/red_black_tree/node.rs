use crate::arena::{Handle, TypedArena};
use std::fmt;

/// Link to a child or parent node. `None` is the sentinel leaf.
pub type Link = Option<Handle>;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// One of the two child positions of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A struct representing an internal node of a red black tree.
#[derive(Clone)]
pub struct Node<T> {
    pub value: T,
    pub color: Color,
    pub left: Link,
    pub right: Link,
    pub parent: Link,
}

impl<T> Node<T> {
    pub fn new(value: T, parent: Link) -> Self {
        Node {
            value,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        }
    }

    pub fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Returns the color of a link, treating the sentinel as black.
pub fn color<T>(arena: &TypedArena<Node<T>>, link: Link) -> Color {
    match link {
        None => Color::Black,
        Some(handle) => arena[handle].color,
    }
}

/// A read-only view of a node inside a red black tree.
///
/// `NodeRef` exposes the raw structure of the tree (colors and links) so that the shape of a tree
/// can be inspected by property checks. Absent children and the root's absent parent are the
/// sentinel leaf and are returned as `None`.
pub struct NodeRef<'a, T> {
    arena: &'a TypedArena<Node<T>>,
    handle: Handle,
}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(arena: &'a TypedArena<Node<T>>, handle: Handle) -> Self {
        NodeRef { arena, handle }
    }

    fn node(&self) -> &'a Node<T> {
        let arena = self.arena;
        &arena[self.handle]
    }

    fn follow(&self, link: Link) -> Option<NodeRef<'a, T>> {
        link.map(|handle| NodeRef::new(self.arena, handle))
    }

    /// Returns the element stored in this node.
    pub fn value(&self) -> &'a T {
        &self.node().value
    }

    /// Returns the color of this node.
    pub fn color(&self) -> Color {
        self.node().color
    }

    /// Returns the left child, or `None` if the left child is the sentinel.
    pub fn left(&self) -> Option<NodeRef<'a, T>> {
        self.follow(self.node().left)
    }

    /// Returns the right child, or `None` if the right child is the sentinel.
    pub fn right(&self) -> Option<NodeRef<'a, T>> {
        self.follow(self.node().right)
    }

    /// Returns the parent, or `None` if this node is the root.
    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        self.follow(self.node().parent)
    }

    /// Returns `true` if both children of this node are the sentinel.
    pub fn is_leaf(&self) -> bool {
        let node = self.node();
        node.left.is_none() && node.right.is_none()
    }
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for NodeRef<'a, T> {}

impl<'a, T> PartialEq for NodeRef<'a, T> {
    fn eq(&self, other: &NodeRef<'a, T>) -> bool {
        self.handle == other.handle && std::ptr::eq(self.arena, other.arena)
    }
}

impl<'a, T> fmt::Debug for NodeRef<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", self.value())
            .field("color", &self.color())
            .finish()
    }
}
