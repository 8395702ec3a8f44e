use std::cmp::Ordering;

/// A total order over elements of type `T`.
///
/// Every ordering, search, and duplicate-detection decision in a red black tree goes through its
/// comparator. The comparator must be consistent and transitive for every value inserted into one
/// tree; a comparator that violates this leaves the tree unsorted but never unsafe.
///
/// Any closure of the form `Fn(&T, &T) -> Ordering` is a comparator.
///
/// # Examples
///
/// ```
/// use ordered_rbtree::red_black_tree::{Comparator, Natural};
/// use std::cmp::Ordering;
///
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
/// assert_eq!(by_len.compare(&"ab", &"c"), Ordering::Greater);
/// assert_eq!(Natural.compare(&"ab", &"c"), Ordering::Less);
/// ```
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> Comparator<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// The comparator that orders elements by their `Ord` implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Natural;

impl<T> Comparator<T> for Natural
where
    T: Ord + ?Sized,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

#[cfg(test)]
mod tests {
    use super::{Comparator, Natural};
    use std::cmp::Ordering;

    #[test]
    fn test_natural() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare(&2, &2), Ordering::Equal);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
    }

    #[test]
    fn test_closure() {
        let reverse = |a: &i32, b: &i32| b.cmp(a);
        assert_eq!(reverse.compare(&1, &2), Ordering::Greater);
        assert_eq!(reverse.compare(&2, &1), Ordering::Less);
    }
}
