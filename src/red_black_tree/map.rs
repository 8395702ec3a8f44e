use crate::arena::Handle;
use crate::entry::{ByKey, Entry};
use crate::red_black_tree::compare::{Comparator, Natural};
use crate::red_black_tree::tree::{Tree, TreeIntoIter, TreeIter};
use crate::red_black_tree::verify::InvariantViolation;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Index, IndexMut};

/// An ordered map implemented using a red black tree.
///
/// Entries are ordered by their keys under a comparator chosen when the map is constructed.
/// Inserting a key that is already present keeps the stored key and its node, and only replaces
/// the value.
///
/// # Examples
///
/// ```
/// use ordered_rbtree::red_black_tree::RedBlackMap;
///
/// let mut map = RedBlackMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.first(), Some((&0, &1)));
///
/// map[&0] = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
#[derive(Clone)]
pub struct RedBlackMap<K, V, C = Natural> {
    tree: Tree<Entry<K, V>, ByKey<C>>,
}

impl<K, V> RedBlackMap<K, V> {
    /// Constructs a new, empty `RedBlackMap<K, V>` ordered by `K`'s `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::new();
    /// ```
    pub fn new() -> Self {
        RedBlackMap {
            tree: Tree::new(ByKey(Natural)),
        }
    }
}

impl<K, V, C> RedBlackMap<K, V, C> {
    /// Constructs a new, empty `RedBlackMap<K, V, C>` whose keys are ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::with_comparator(|a: &&str, b: &&str| b.cmp(a));
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// assert_eq!(map.first(), Some((&"b", &2)));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        RedBlackMap {
            tree: Tree::new(ByKey(comparator)),
        }
    }

    /// Returns the comparator that orders the keys of the map.
    pub fn comparator(&self) -> &C {
        &self.tree.comparator().0
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the map, removing all entries.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the entry with the minimum key. Returns `None` if the map is empty.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|entry| (&entry.key, &entry.value))
    }

    /// Returns the entry with the maximum key. Returns `None` if the map is empty.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|entry| (&entry.key, &entry.value))
    }

    /// Returns an iterator over the map. The iterator yields entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 2);
    /// map.insert(3, 4);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &2)));
    /// assert_eq!(iterator.next(), Some((&3, &4)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackMapIter<'_, K, V> {
        RedBlackMapIter {
            tree_iter: self.tree.iter(),
        }
    }

    /// Returns an iterator over the keys of the map in ascending order.
    pub fn keys(&self) -> RedBlackMapKeys<'_, K, V> {
        RedBlackMapKeys {
            tree_iter: self.tree.iter(),
        }
    }

    /// Returns an iterator over the values of the map in ascending key order.
    pub fn values(&self) -> RedBlackMapValues<'_, K, V> {
        RedBlackMapValues {
            tree_iter: self.tree.iter(),
        }
    }

    /// Calls `visit` on every entry in ascending key order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        self.tree.for_each_while(|entry| {
            visit(&entry.key, &entry.value);
            true
        });
    }

    /// Calls `visit` on entries in ascending key order until it returns `false`.
    pub fn for_each_while<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.tree
            .for_each_while(|entry| visit(&entry.key, &entry.value));
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        self.tree.height()
    }
}

impl<K, V, C> RedBlackMap<K, V, C>
where
    C: Comparator<K>,
{
    fn find(&self, key: &K) -> Option<Handle> {
        let comparator = self.comparator();
        self.tree
            .locate(|entry| comparator.compare(key, &entry.key))
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, the stored
    /// key is kept, the value is replaced, and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some(1));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.find(&key) {
            Some(handle) => Some(mem::replace(
                &mut self.tree.value_mut(handle).value,
                value,
            )),
            None => {
                self.tree.insert(Entry { key, value });
                None
            },
        }
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        self.find(key).map(|handle| {
            let Entry { key, value } = self.tree.remove_at(handle);
            (key, value)
        })
    }

    /// Checks if a key exists in the map.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key)
            .map(|handle| &self.tree.value(handle).value)
    }

    /// Returns a mutable reference to the value associated with a particular key. It will return
    /// `None` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_rbtree::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.find(key) {
            Some(handle) => Some(&mut self.tree.value_mut(handle).value),
            None => None,
        }
    }

    /// Checks the red black properties, parent links, key ordering, and length of the underlying
    /// tree.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        self.tree.verify()
    }
}

impl<K, V, C> IntoIterator for RedBlackMap<K, V, C> {
    type IntoIter = RedBlackMapIntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            tree_iter: self.tree.into_iter(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RedBlackMap<K, V, C>
where
    K: 'a,
    V: 'a,
{
    type IntoIter = RedBlackMapIter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackMap<K, V, C>`.
///
/// This iterator traverses the elements of the map in-order and yields owned entries.
pub struct RedBlackMapIntoIter<K, V> {
    tree_iter: TreeIntoIter<Entry<K, V>>,
}

impl<K, V> Iterator for RedBlackMapIntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter
            .next()
            .map(|Entry { key, value }| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for RedBlackMapIntoIter<K, V> {}

/// An iterator for `RedBlackMap<K, V, C>`.
///
/// This iterator traverses the elements of the map in-order and yields immutable references.
pub struct RedBlackMapIter<'a, K, V> {
    tree_iter: TreeIter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for RedBlackMapIter<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter
            .next()
            .map(|entry| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for RedBlackMapIter<'a, K, V>
where
    K: 'a,
    V: 'a,
{
}

/// An iterator over the keys of a `RedBlackMap<K, V, C>` in ascending order.
pub struct RedBlackMapKeys<'a, K, V> {
    tree_iter: TreeIter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for RedBlackMapKeys<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next().map(|entry| &entry.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

/// An iterator over the values of a `RedBlackMap<K, V, C>` in ascending key order.
pub struct RedBlackMapValues<'a, K, V> {
    tree_iter: TreeIter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for RedBlackMapValues<'a, K, V>
where
    K: 'a,
    V: 'a,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next().map(|entry| &entry.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

impl<K, V, C> Default for RedBlackMap<K, V, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C> PartialEq for RedBlackMap<K, V, C>
where
    C: Comparator<K>,
    V: PartialEq,
{
    fn eq(&self, other: &RedBlackMap<K, V, C>) -> bool {
        let comparator = self.comparator();
        self.len() == other.len()
            && self.iter().zip(other.iter()).all(|((k1, v1), (k2, v2))| {
                comparator.compare(k1, k2) == Ordering::Equal && v1 == v2
            })
    }
}

impl<K, V, C> Eq for RedBlackMap<K, V, C>
where
    C: Comparator<K>,
    V: Eq,
{
}

impl<K, V, C> fmt::Debug for RedBlackMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Extend<(K, V)> for RedBlackMap<K, V, C>
where
    C: Comparator<K>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C> FromIterator<(K, V)> for RedBlackMap<K, V, C>
where
    C: Comparator<K> + Default,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, C> Index<&'a K> for RedBlackMap<K, V, C>
where
    C: Comparator<K>,
{
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

impl<'a, K, V, C> IndexMut<&'a K> for RedBlackMap<K, V, C>
where
    C: Comparator<K>,
{
    fn index_mut(&mut self, key: &K) -> &mut Self::Output {
        self.get_mut(key).expect("Error: key does not exist.")
    }
}

impl<K, V, C> Serialize for RedBlackMap<K, V, C>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

struct RedBlackMapVisitor<K, V, C> {
    marker: PhantomData<fn() -> RedBlackMap<K, V, C>>,
}

impl<'de, K, V, C> Visitor<'de> for RedBlackMapVisitor<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    type Value = RedBlackMap<K, V, C>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = RedBlackMap::default();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V, C> Deserialize<'de> for RedBlackMap<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RedBlackMapVisitor {
            marker: PhantomData,
        })
    }
}
