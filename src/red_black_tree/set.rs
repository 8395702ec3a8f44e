use crate::red_black_tree::compare::{Comparator, Natural};
use crate::red_black_tree::node::NodeRef;
use crate::red_black_tree::tree::{Tree, TreeIntoIter, TreeIter};
use crate::red_black_tree::verify::InvariantViolation;
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;

/// An ordered set implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors each node red or black.
/// The root is black, a red node never has a red child, and every path from a node down to a leaf
/// passes through the same number of black nodes, so the longest path is at most twice as long
/// as the shortest one.
///
/// Elements are ordered by a comparator chosen when the set is constructed. Inserting an element
/// that compares equal to one already in the set leaves the set unchanged.
///
/// # Examples
///
/// ```
/// use ordered_rbtree::red_black_tree::RedBlackSet;
///
/// let mut set = RedBlackSet::new();
/// for value in &[5, 10, 7, 0, 3, 20, 15, 2] {
///     set.insert(*value);
/// }
///
/// assert_eq!(set.len(), 8);
/// assert_eq!(set.first(), Some(&0));
/// assert_eq!(set.last(), Some(&20));
///
/// assert!(set.contains(&3));
/// assert_eq!(set.remove(&3), Some(3));
/// assert!(!set.contains(&3));
/// assert_eq!(set.len(), 7);
/// ```
#[derive(Clone)]
pub struct RedBlackSet<T, C = Natural> {
    tree: Tree<T, C>,
}

impl<T> RedBlackSet<T> {
    /// Constructs a new, empty `RedBlackSet<T>` ordered by `T`'s `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// ```
    pub fn new() -> Self {
        RedBlackSet {
            tree: Tree::new(Natural),
        }
    }
}

impl<T, C> RedBlackSet<T, C> {
    /// Constructs a new, empty `RedBlackSet<T, C>` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::with_comparator(|a: &u32, b: &u32| b.cmp(a));
    /// set.insert(1);
    /// set.insert(3);
    /// set.insert(2);
    /// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&3, &2, &1]);
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        RedBlackSet {
            tree: Tree::new(comparator),
        }
    }

    /// Returns the comparator that orders the set.
    pub fn comparator(&self) -> &C {
        self.tree.comparator()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the set, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the minimum element of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(3);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Returns the maximum element of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// assert_eq!(set.last(), None);
    /// set.insert(3);
    /// set.insert(1);
    /// assert_eq!(set.last(), Some(&3));
    /// ```
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Returns an iterator over the set. The iterator yields elements in ascending order and may
    /// be dropped before it is exhausted.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackSetIter<'_, T> {
        RedBlackSetIter {
            tree_iter: self.tree.iter(),
        }
    }

    /// Calls `visit` on every element in ascending order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        self.tree.for_each_while(|value| {
            visit(value);
            true
        });
    }

    /// Calls `visit` on elements in ascending order until it returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = (0..10).collect();
    /// let mut sum = 0;
    /// set.for_each_while(|value| {
    ///     sum += value;
    ///     *value < 3
    /// });
    /// assert_eq!(sum, 6);
    /// ```
    pub fn for_each_while<F>(&self, visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.tree.for_each_while(visit);
    }

    /// Returns the root node of the underlying tree, or `None` if the set is empty. Used to
    /// inspect the colors and links of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::{Color, RedBlackSet};
    ///
    /// let set: RedBlackSet<u32> = (1..4).collect();
    /// let root = set.root().unwrap();
    /// assert_eq!(root.value(), &2);
    /// assert_eq!(root.color(), Color::Black);
    /// assert!(root.left().unwrap().is_leaf());
    /// ```
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.tree.root()
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        self.tree.height()
    }
}

impl<T, C> RedBlackSet<T, C>
where
    C: Comparator<T>,
{
    /// Inserts an element into the set. Returns `false` and leaves the set unchanged if an equal
    /// element is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert!(set.contains(&1));
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.tree.insert(value)
    }

    /// Removes an element from the set. If an equal element exists in the set, it will be
    /// returned. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T> {
        self.tree.remove(value)
    }

    /// Checks if an element exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.tree.find(value).is_some()
    }

    /// Returns the stored element that compares equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.tree.find(value).map(|handle| self.tree.value(handle))
    }

    /// Returns `true` if both sets hold comparator-equal elements in the same order, regardless
    /// of the shape of their trees.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let a: RedBlackSet<u32> = vec![1, 2, 3].into_iter().collect();
    /// let mut b: RedBlackSet<u32> = vec![3, 2, 1].into_iter().collect();
    /// assert!(a.equals(&b));
    ///
    /// b.remove(&3);
    /// assert!(!a.equals(&b));
    /// ```
    pub fn equals<D>(&self, other: &RedBlackSet<T, D>) -> bool {
        self.tree.equals(&other.tree)
    }

    /// Checks the red black properties, parent links, ordering, and length of the underlying
    /// tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = (0..100).collect();
    /// assert_eq!(set.verify(), Ok(()));
    /// ```
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        self.tree.verify()
    }
}

impl<T, C> IntoIterator for RedBlackSet<T, C> {
    type IntoIter = RedBlackSetIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            tree_iter: self.tree.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RedBlackSet<T, C>
where
    T: 'a,
{
    type IntoIter = RedBlackSetIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackSet<T, C>`.
///
/// This iterator traverses the elements of the set in-order and yields owned elements.
pub struct RedBlackSetIntoIter<T> {
    tree_iter: TreeIntoIter<T>,
}

impl<T> Iterator for RedBlackSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

impl<T> ExactSizeIterator for RedBlackSetIntoIter<T> {}

/// An iterator for `RedBlackSet<T, C>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct RedBlackSetIter<'a, T> {
    tree_iter: TreeIter<'a, T>,
}

impl<'a, T> Iterator for RedBlackSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for RedBlackSetIter<'a, T> where T: 'a {}

impl<T, C> Default for RedBlackSet<T, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C> PartialEq for RedBlackSet<T, C>
where
    C: Comparator<T>,
{
    fn eq(&self, other: &RedBlackSet<T, C>) -> bool {
        self.equals(other)
    }
}

impl<T, C> Eq for RedBlackSet<T, C> where C: Comparator<T> {}

impl<T, C> fmt::Debug for RedBlackSet<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> Extend<T> for RedBlackSet<T, C>
where
    C: Comparator<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C> FromIterator<T> for RedBlackSet<T, C>
where
    C: Comparator<T> + Default,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, C> Serialize for RedBlackSet<T, C>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

struct RedBlackSetVisitor<T, C> {
    marker: PhantomData<fn() -> RedBlackSet<T, C>>,
}

impl<'de, T, C> Visitor<'de> for RedBlackSetVisitor<T, C>
where
    T: Deserialize<'de>,
    C: Comparator<T> + Default,
{
    type Value = RedBlackSet<T, C>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = RedBlackSet::default();
        while let Some(value) = seq.next_element()? {
            set.insert(value);
        }
        Ok(set)
    }
}

impl<'de, T, C> Deserialize<'de> for RedBlackSet<T, C>
where
    T: Deserialize<'de>,
    C: Comparator<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(RedBlackSetVisitor {
            marker: PhantomData,
        })
    }
}
