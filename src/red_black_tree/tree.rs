use crate::arena::{Handle, TypedArena};
use crate::red_black_tree::compare::Comparator;
use crate::red_black_tree::node::{self, Color, Link, Node, NodeRef, Side};
use log::debug;
use std::cmp::{self, Ordering};
use std::mem;

const CHUNK_SIZE: usize = 256;

/// The red black tree engine shared by `RedBlackSet` and `RedBlackMap`.
///
/// Nodes live in a `TypedArena` and link to each other through handles. The sentinel leaf is the
/// absent link, whose color is always black.
#[derive(Clone)]
pub struct Tree<T, C> {
    arena: TypedArena<Node<T>>,
    root: Link,
    len: usize,
    comparator: C,
}

impl<T, C> Tree<T, C> {
    pub fn new(comparator: C) -> Self {
        Tree {
            arena: TypedArena::new(CHUNK_SIZE),
            root: None,
            len: 0,
            comparator,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.root.map(|handle| NodeRef::new(&self.arena, handle))
    }

    pub(crate) fn root_link(&self) -> Link {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        &self.arena[handle]
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        &mut self.arena[handle]
    }

    pub fn value(&self, handle: Handle) -> &T {
        &self.arena[handle].value
    }

    pub fn value_mut(&mut self, handle: Handle) -> &mut T {
        &mut self.arena[handle].value
    }

    pub fn clear(&mut self) {
        debug!("clearing red black tree of {} nodes", self.len);
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    fn color(&self, link: Link) -> Color {
        node::color(&self.arena, link)
    }

    fn side_of(&self, parent: Handle, child: Link) -> Side {
        if self.arena[parent].left == child {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.arena[handle].child(side) {
            handle = child;
        }
        handle
    }

    // Points whichever link referred to `old` (the parent's child link or the root) at `new`.
    fn replace_child(&mut self, parent: Link, old: Handle, new: Link) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(parent, Some(old));
                *self.arena[parent].child_mut(side) = new;
            },
        }
    }

    // Rotates `handle` down towards `side`; its child on the opposite side takes its place.
    fn rotate(&mut self, handle: Handle, side: Side) {
        let pivot = self.arena[handle]
            .child(side.opposite())
            .expect("Expected pivot child node to be `Some`.");
        let inner = self.arena[pivot].child(side);
        *self.arena[handle].child_mut(side.opposite()) = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(handle);
        }

        let parent = self.arena[handle].parent;
        self.arena[pivot].parent = parent;
        self.replace_child(parent, handle, Some(pivot));

        *self.arena[pivot].child_mut(side) = Some(handle);
        self.arena[handle].parent = Some(pivot);
    }

    fn insert_fixup(&mut self, mut curr: Handle) {
        loop {
            let parent = match self.arena[curr].parent {
                Some(parent) if self.arena[parent].color == Color::Red => parent,
                _ => break,
            };
            // a red node is never the root
            let grandparent = self.arena[parent]
                .parent
                .expect("Expected red node to have a parent.");
            let side = self.side_of(grandparent, Some(parent));
            let uncle = self.arena[grandparent].child(side.opposite());

            match uncle {
                Some(uncle) if self.arena[uncle].color == Color::Red => {
                    self.arena[parent].color = Color::Black;
                    self.arena[uncle].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    curr = grandparent;
                },
                _ => {
                    let mut parent = parent;
                    if self.arena[parent].child(side.opposite()) == Some(curr) {
                        self.rotate(parent, side);
                        mem::swap(&mut parent, &mut curr);
                    }
                    self.arena[parent].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    self.rotate(grandparent, side.opposite());
                },
            }
        }

        if let Some(root) = self.root {
            self.arena[root].color = Color::Black;
        }
    }

    // `curr` carries one black too few on its paths. It may be the sentinel, so its parent is
    // tracked alongside it.
    fn remove_fixup(&mut self, mut curr: Link, mut parent: Link) {
        while curr != self.root && self.color(curr) == Color::Black {
            let parent_handle = match parent {
                Some(parent_handle) => parent_handle,
                None => break,
            };
            let side = self.side_of(parent_handle, curr);
            let mut sibling = self.arena[parent_handle]
                .child(side.opposite())
                .expect("Expected sibling of a doubly black node to be `Some`.");

            if self.arena[sibling].color == Color::Red {
                self.arena[sibling].color = Color::Black;
                self.arena[parent_handle].color = Color::Red;
                self.rotate(parent_handle, side);
                sibling = self.arena[parent_handle]
                    .child(side.opposite())
                    .expect("Expected sibling of a doubly black node to be `Some`.");
            }

            let near = self.arena[sibling].child(side);
            let far = self.arena[sibling].child(side.opposite());
            if self.color(near) == Color::Black && self.color(far) == Color::Black {
                self.arena[sibling].color = Color::Red;
                curr = parent;
                parent = self.arena[parent_handle].parent;
                continue;
            }

            if self.color(far) == Color::Black {
                if let Some(near) = near {
                    self.arena[near].color = Color::Black;
                }
                self.arena[sibling].color = Color::Red;
                self.rotate(sibling, side.opposite());
                sibling = self.arena[parent_handle]
                    .child(side.opposite())
                    .expect("Expected sibling of a doubly black node to be `Some`.");
            }

            let parent_color = self.arena[parent_handle].color;
            self.arena[sibling].color = parent_color;
            self.arena[parent_handle].color = Color::Black;
            if let Some(far) = self.arena[sibling].child(side.opposite()) {
                self.arena[far].color = Color::Black;
            }
            self.rotate(parent_handle, side);
            curr = self.root;
            parent = None;
        }

        if let Some(curr) = curr {
            self.arena[curr].color = Color::Black;
        }
    }

    /// Descends from the root following `probe`, which orders the target relative to the value
    /// of the visited node.
    pub fn locate<F>(&self, mut probe: F) -> Option<Handle>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match probe(&node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Unlinks the node at `handle`, frees it, rebalances, and returns its value.
    pub fn remove_at(&mut self, handle: Handle) -> T {
        let node = &self.arena[handle];
        // a node with two children trades places with its in-order successor
        let splice = match (node.left, node.right) {
            (Some(_), Some(right)) => self.extreme(right, Side::Left),
            _ => handle,
        };

        let Node {
            left, right, parent, ..
        } = self.arena[splice];
        let child = left.or(right);
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        self.replace_child(parent, splice, child);

        let spliced = self.arena.free(&splice);
        self.len -= 1;
        let removed = if splice == handle {
            spliced.value
        } else {
            mem::replace(&mut self.arena[handle].value, spliced.value)
        };

        if spliced.color == Color::Black {
            self.remove_fixup(child, parent);
        }
        removed
    }

    pub fn first(&self) -> Option<&T> {
        self.root
            .map(|root| &self.arena[self.extreme(root, Side::Left)].value)
    }

    pub fn last(&self) -> Option<&T> {
        self.root
            .map(|root| &self.arena[self.extreme(root, Side::Right)].value)
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        fn subtree_height<T>(arena: &TypedArena<Node<T>>, link: Link) -> usize {
            match link {
                None => 0,
                Some(handle) => {
                    let node = &arena[handle];
                    1 + cmp::max(
                        subtree_height(arena, node.left),
                        subtree_height(arena, node.right),
                    )
                },
            }
        }
        subtree_height(&self.arena, self.root)
    }

    pub fn iter(&self) -> TreeIter<'_, T> {
        TreeIter {
            arena: &self.arena,
            current: self.root,
            stack: Vec::new(),
            remaining: self.len,
        }
    }

    pub fn for_each_while<F>(&self, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        for value in self.iter() {
            if !visit(value) {
                break;
            }
        }
    }
}

impl<T, C> Tree<T, C>
where
    C: Comparator<T>,
{
    /// Inserts `value` unless an equal element is already present. Returns `true` if a new node
    /// was created.
    pub fn insert(&mut self, value: T) -> bool {
        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            side = match self.comparator.compare(&value, &node.value) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    debug_assert!(
                        self.comparator.compare(&node.value, &value) == Ordering::Equal,
                        "comparator is not antisymmetric",
                    );
                    return false;
                },
            };
            parent = Some(handle);
            curr = node.child(side);
        }

        let handle = self.arena.allocate(Node::new(value, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) => *self.arena[parent].child_mut(side) = Some(handle),
        }
        self.len += 1;
        self.insert_fixup(handle);
        true
    }

    pub fn find(&self, value: &T) -> Option<Handle> {
        let comparator = &self.comparator;
        self.locate(|probe| comparator.compare(value, probe))
    }

    pub fn remove(&mut self, value: &T) -> Option<T> {
        self.find(value).map(|handle| self.remove_at(handle))
    }

    /// Compares the in-order sequences of two trees element by element using this tree's
    /// comparator.
    pub fn equals<D>(&self, other: &Tree<T, D>) -> bool {
        self.len == other.len
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| self.comparator.compare(a, b) == Ordering::Equal)
    }
}

impl<T, C> IntoIterator for Tree<T, C> {
    type IntoIter = TreeIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        TreeIntoIter {
            remaining: self.len,
            arena: self.arena,
            current: self.root,
            stack: Vec::new(),
        }
    }
}

/// In-order iterator over the values of a tree.
pub struct TreeIter<'a, T> {
    arena: &'a TypedArena<Node<T>>,
    current: Link,
    stack: Vec<Handle>,
    remaining: usize,
}

impl<'a, T> Iterator for TreeIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        while let Some(handle) = self.current {
            self.current = arena[handle].left;
            self.stack.push(handle);
        }
        self.stack.pop().map(|handle| {
            let node = &arena[handle];
            self.current = node.right;
            self.remaining -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for TreeIter<'a, T> where T: 'a {}

/// Owning in-order iterator over the values of a tree. Nodes are freed as they are yielded.
pub struct TreeIntoIter<T> {
    arena: TypedArena<Node<T>>,
    current: Link,
    stack: Vec<Handle>,
    remaining: usize,
}

impl<T> Iterator for TreeIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(handle) = self.current {
            self.current = self.arena[handle].left;
            self.stack.push(handle);
        }
        self.stack.pop().map(|handle| {
            let Node { value, right, .. } = self.arena.free(&handle);
            self.current = right;
            self.remaining -= 1;
            value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for TreeIntoIter<T> {}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::red_black_tree::compare::Natural;
    use crate::red_black_tree::node::Color;

    fn tree_of(values: &[u32]) -> Tree<u32, Natural> {
        let mut tree = Tree::new(Natural);
        for value in values {
            tree.insert(*value);
        }
        tree
    }

    fn colors(tree: &Tree<u32, Natural>) -> Vec<(u32, Color)> {
        let mut ret = Vec::new();
        let mut stack = Vec::new();
        let mut curr = tree.root();
        loop {
            while let Some(node) = curr {
                stack.push(node);
                curr = node.left();
            }
            match stack.pop() {
                Some(node) => {
                    ret.push((*node.value(), node.color()));
                    curr = node.right();
                },
                None => return ret,
            }
        }
    }

    #[test]
    fn test_insert_into_empty() {
        let tree = tree_of(&[1]);
        let root = tree.root().unwrap();
        assert_eq!(*root.value(), 1);
        assert_eq!(root.color(), Color::Black);
        assert!(root.is_leaf());
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_insert_red_uncle_recolors() {
        let mut tree = tree_of(&[2, 1, 3]);
        tree.insert(4);
        assert_eq!(
            colors(&tree),
            vec![
                (1, Color::Black),
                (2, Color::Black),
                (3, Color::Black),
                (4, Color::Red),
            ],
        );
        assert_eq!(tree.verify(), Ok(()));
    }

    #[test]
    fn test_insert_outer_child_rotates() {
        let tree = tree_of(&[1, 2, 3]);
        let root = tree.root().unwrap();
        assert_eq!(*root.value(), 2);
        assert_eq!(*root.left().unwrap().value(), 1);
        assert_eq!(*root.right().unwrap().value(), 3);
        assert_eq!(root.left().unwrap().color(), Color::Red);
        assert_eq!(root.right().unwrap().color(), Color::Red);
    }

    #[test]
    fn test_insert_inner_child_rotates_twice() {
        let tree = tree_of(&[3, 1, 2]);
        let root = tree.root().unwrap();
        assert_eq!(*root.value(), 2);
        assert_eq!(root.color(), Color::Black);
        assert_eq!(*root.left().unwrap().parent().unwrap().value(), 2);
        assert_eq!(*root.right().unwrap().parent().unwrap().value(), 2);
    }

    #[test]
    fn test_insert_duplicate() {
        let mut tree = tree_of(&[1, 2]);
        assert!(!tree.insert(2));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&1, &2]);
    }

    #[test]
    fn test_remove_absent() {
        let mut tree = tree_of(&[1, 2, 3]);
        assert_eq!(tree.remove(&4), None);
        assert_eq!(tree.len(), 3);

        let mut empty: Tree<u32, Natural> = Tree::new(Natural);
        assert_eq!(empty.remove(&4), None);
        assert_eq!(empty.len(), 0);
    }

    #[test]
    fn test_remove_node_with_two_children() {
        let mut tree = tree_of(&[5, 2, 8, 1, 3, 7, 9]);
        assert_eq!(tree.remove(&5), Some(5));
        assert_eq!(*tree.root().unwrap().value(), 7);
        assert_eq!(
            tree.iter().collect::<Vec<&u32>>(),
            vec![&1, &2, &3, &7, &8, &9],
        );
        assert_eq!(tree.verify(), Ok(()));
    }

    #[test]
    fn test_remove_black_leaf_with_red_sibling() {
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(tree.remove(&1), Some(1));
        assert_eq!(tree.verify(), Ok(()));
        assert_eq!(tree.remove(&3), Some(3));
        assert_eq!(tree.verify(), Ok(()));
        assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&2, &4, &5, &6]);
    }

    #[test]
    fn test_remove_all() {
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        for value in &[4, 1, 7, 2, 6, 3, 5] {
            assert_eq!(tree.remove(value), Some(*value));
            assert_eq!(tree.verify(), Ok(()));
        }
        assert!(tree.root().is_none());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn test_first_last() {
        let tree = tree_of(&[5, 10, 7, 0, 3]);
        assert_eq!(tree.first(), Some(&0));
        assert_eq!(tree.last(), Some(&10));

        let empty: Tree<u32, Natural> = Tree::new(Natural);
        assert_eq!(empty.first(), None);
        assert_eq!(empty.last(), None);
    }

    #[test]
    fn test_height() {
        let tree = tree_of(&(0..7).collect::<Vec<u32>>());
        assert!(tree.height() <= 4);
    }

    #[test]
    fn test_for_each_while_stops() {
        let tree = tree_of(&[1, 2, 3, 4]);
        let mut visited = Vec::new();
        tree.for_each_while(|value| {
            visited.push(*value);
            *value < 2
        });
        assert_eq!(visited, vec![1, 2]);
    }

    #[test]
    fn test_iter_size_hint() {
        let tree = tree_of(&[3, 1, 2]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }

    #[test]
    fn test_into_iter() {
        let tree = tree_of(&[3, 1, 2]);
        assert_eq!(tree.into_iter().collect::<Vec<u32>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_equals_ignores_shape() {
        let a = tree_of(&[1, 2, 3, 4, 5, 6, 7]);
        let b = tree_of(&[7, 6, 5, 4, 3, 2, 1]);
        assert!(a.equals(&b));

        let c = tree_of(&[1, 2, 3, 4, 5, 6]);
        assert!(!a.equals(&c));
        assert!(!c.equals(&a));
    }

    #[test]
    fn test_clear() {
        let mut tree = tree_of(&[1, 2, 3]);
        tree.clear();
        assert_eq!(tree.len(), 0);
        assert!(tree.root().is_none());
        assert!(tree.insert(1));
        assert_eq!(tree.verify(), Ok(()));
    }
}
