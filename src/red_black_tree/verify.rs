use crate::red_black_tree::compare::Comparator;
use crate::red_black_tree::node::{Color, Link};
use crate::red_black_tree::tree::Tree;
use log::warn;
use std::cmp::Ordering;
use std::error;
use std::fmt;
use std::result;

/// A broken structural property found by `verify`.
///
/// A correctly implemented tree never produces one of these; they point at a bug in the
/// rebalancing code or at a comparator that is not a total order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvariantViolation {
    /// The root node is red.
    RedRoot,
    /// A red node has a red child. Holds the depth of the parent, counting the root as zero.
    RedChildOfRed { depth: usize },
    /// Two paths from the same node reach the sentinel through a different number of black
    /// nodes.
    BlackHeightMismatch { depth: usize, left: usize, right: usize },
    /// A node's parent link does not point at the node that links to it.
    ParentMismatch { depth: usize },
    /// In-order traversal is not strictly ascending at this position.
    OutOfOrder { index: usize },
    /// The tracked length differs from the number of reachable nodes.
    LengthMismatch { expected: usize, actual: usize },
}

impl error::Error for InvariantViolation {}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvariantViolation::RedRoot => write!(f, "root is red"),
            InvariantViolation::RedChildOfRed { depth } => {
                write!(f, "red node at depth {} has a red child", depth)
            },
            InvariantViolation::BlackHeightMismatch { depth, left, right } => write!(
                f,
                "node at depth {} has black height {} on the left and {} on the right",
                depth, left, right,
            ),
            InvariantViolation::ParentMismatch { depth } => {
                write!(f, "node at depth {} has a stale parent link", depth)
            },
            InvariantViolation::OutOfOrder { index } => {
                write!(f, "elements at positions {} and {} are not ascending", index - 1, index)
            },
            InvariantViolation::LengthMismatch { expected, actual } => {
                write!(f, "length is {} but {} nodes are reachable", expected, actual)
            },
        }
    }
}

pub type Result<T> = result::Result<T, InvariantViolation>;

impl<T, C> Tree<T, C> {
    // Returns the black height of the subtree and adds its node count to `count`.
    fn check_subtree(
        &self,
        link: Link,
        parent: Link,
        depth: usize,
        count: &mut usize,
    ) -> Result<usize> {
        let handle = match link {
            None => return Ok(1),
            Some(handle) => handle,
        };
        let node = self.node(handle);
        *count += 1;

        if node.parent != parent {
            return Err(InvariantViolation::ParentMismatch { depth });
        }
        if node.color == Color::Red {
            let has_red_child = [node.left, node.right]
                .iter()
                .filter_map(|child| *child)
                .any(|child| self.node(child).color == Color::Red);
            if has_red_child {
                return Err(InvariantViolation::RedChildOfRed { depth });
            }
        }

        let left = self.check_subtree(node.left, link, depth + 1, count)?;
        let right = self.check_subtree(node.right, link, depth + 1, count)?;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { depth, left, right });
        }
        Ok(left + if node.color == Color::Black { 1 } else { 0 })
    }
}

impl<T, C> Tree<T, C>
where
    C: Comparator<T>,
{
    /// Walks the whole tree and checks the red black properties, parent links, ordering, and
    /// length.
    pub fn verify(&self) -> Result<()> {
        let ret = self.check_all();
        if let Err(ref violation) = ret {
            warn!("red black tree failed verification: {}", violation);
        }
        ret
    }

    fn check_all(&self) -> Result<()> {
        let root = self.root_link();
        if let Some(root) = root {
            if self.node(root).color == Color::Red {
                return Err(InvariantViolation::RedRoot);
            }
        }

        let mut count = 0;
        self.check_subtree(root, None, 0, &mut count)?;
        if count != self.len() {
            return Err(InvariantViolation::LengthMismatch {
                expected: self.len(),
                actual: count,
            });
        }

        let mut prev = None;
        for (index, value) in self.iter().enumerate() {
            if let Some(prev) = prev {
                if self.comparator().compare(prev, value) != Ordering::Less {
                    return Err(InvariantViolation::OutOfOrder { index });
                }
            }
            prev = Some(value);
        }
        Ok(())
    }
}
