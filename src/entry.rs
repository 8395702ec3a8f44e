use crate::red_black_tree::Comparator;
use std::cmp::Ordering;

/// A key-value pair stored in a map node.
#[derive(Clone, Debug)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

/// Orders entries by their keys with the key comparator `C`.
#[derive(Clone)]
pub struct ByKey<C>(pub C);

impl<K, V, C> Comparator<Entry<K, V>> for ByKey<C>
where
    C: Comparator<K>,
{
    fn compare(&self, a: &Entry<K, V>, b: &Entry<K, V>) -> Ordering {
        self.0.compare(&a.key, &b.key)
    }
}
