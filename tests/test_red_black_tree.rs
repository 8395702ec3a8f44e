use ordered_rbtree::red_black_tree::{Color, NodeRef, RedBlackSet};
use rand::{Rng, SeedableRng, XorShiftRng};
use std::cmp::Ordering;

const NUM_OF_VALUES: u32 = 1000;

fn seeded_rng() -> XorShiftRng {
    SeedableRng::from_seed([1, 1, 1, 1])
}

fn permutation(n: u32) -> Vec<u32> {
    let mut values: Vec<u32> = (0..n).collect();
    seeded_rng().shuffle(&mut values);
    values
}

fn collect_leaves<'a>(node: Option<NodeRef<'a, u32>>, leaves: &mut Vec<NodeRef<'a, u32>>) {
    if let Some(node) = node {
        collect_leaves(node.left(), leaves);
        if node.is_leaf() {
            leaves.push(node);
        }
        collect_leaves(node.right(), leaves);
    }
}

// Walks from every leaf up to the root through parent links, counting black nodes.
fn check_properties(set: &RedBlackSet<u32>) {
    let root = match set.root() {
        Some(root) => root,
        None => return,
    };
    assert_eq!(root.color(), Color::Black, "root is not black");
    assert!(root.parent().is_none());

    let mut leaves = Vec::new();
    collect_leaves(Some(root), &mut leaves);

    let mut black_count = None;
    for leaf in leaves {
        let mut blacks = 0;
        let mut curr = leaf;
        while curr != root {
            let parent = curr.parent().expect("non-root node has a parent");
            if curr.color() == Color::Black {
                blacks += 1;
            } else {
                assert_eq!(
                    parent.color(),
                    Color::Black,
                    "two consecutive red nodes {} {}",
                    curr.value(),
                    parent.value(),
                );
            }
            curr = parent;
        }
        match black_count {
            None => black_count = Some(blacks),
            Some(expected) => assert_eq!(expected, blacks, "number of blacks differ"),
        }
    }

    assert_eq!(set.verify(), Ok(()));
}

fn check_elements(set: &RedBlackSet<u32>, values: &[u32]) {
    let mut expected = values.to_vec();
    expected.sort();
    expected.dedup();
    assert_eq!(set.len(), expected.len());
    assert_eq!(set.iter().cloned().collect::<Vec<u32>>(), expected);
}

fn make_set() -> RedBlackSet<u32> {
    let mut set = RedBlackSet::new();
    for value in &[5, 10, 7, 0, 3, 20, 15, 2] {
        set.insert(*value);
    }
    set
}

#[test]
fn int_test_scenario() {
    let mut set = make_set();
    check_properties(&set);

    assert_eq!(
        set.iter().cloned().collect::<Vec<u32>>(),
        vec![0, 2, 3, 5, 7, 10, 15, 20],
    );
    assert_eq!(set.first(), Some(&0));
    assert_eq!(set.last(), Some(&20));
    assert_eq!(set.len(), 8);
    assert!(set.contains(&3));

    assert_eq!(set.remove(&3), Some(3));
    assert!(!set.contains(&3));
    assert_eq!(set.len(), 7);
    check_properties(&set);
}

#[test]
fn int_test_random_insert_remove() {
    let values = permutation(NUM_OF_VALUES);
    let mut set = RedBlackSet::new();

    for (i, value) in values.iter().enumerate() {
        assert!(set.insert(*value));
        check_properties(&set);
        assert_eq!(set.len(), i + 1);
        assert!(set.contains(value));

        assert!(!set.insert(*value));
        assert_eq!(set.len(), i + 1);
        check_elements(&set, &values[..=i]);
    }

    for (i, value) in values.iter().enumerate() {
        assert_eq!(set.remove(value), Some(*value));
        check_properties(&set);
        assert_eq!(set.len(), values.len() - (i + 1));
        assert!(!set.contains(value));

        assert_eq!(set.remove(value), None);
        check_elements(&set, &values[i + 1..]);
    }
    assert!(set.root().is_none());
}

#[test]
fn int_test_random_mixed_operations() {
    let mut rng = seeded_rng();
    let mut set = RedBlackSet::new();
    let mut expected = Vec::new();

    for _ in 0..10_000 {
        let value = rng.gen_range(0, 500u32);
        if rng.gen::<bool>() {
            let inserted = set.insert(value);
            assert_eq!(inserted, !expected.contains(&value));
            if inserted {
                expected.push(value);
            }
        } else {
            let removed = set.remove(&value);
            match expected.iter().position(|v| *v == value) {
                Some(index) => {
                    expected.swap_remove(index);
                    assert_eq!(removed, Some(value));
                },
                None => assert_eq!(removed, None),
            }
        }
        assert_eq!(set.len(), expected.len());
    }

    check_properties(&set);
    check_elements(&set, &expected);
}

#[test]
fn int_test_equals() {
    let values = permutation(NUM_OF_VALUES);
    let mut a = RedBlackSet::new();
    let mut b = RedBlackSet::new();
    for value in &values {
        a.insert(*value);
        b.insert(*value);
    }
    assert!(a.equals(&b));
    assert_eq!(a, b);

    let last = *b.last().unwrap();
    b.remove(&last);
    assert!(!a.equals(&b));
    assert_ne!(a, b);
}

#[test]
fn int_test_equals_different_insertion_order() {
    let values = permutation(NUM_OF_VALUES);
    let a: RedBlackSet<u32> = values.iter().cloned().collect();
    let b: RedBlackSet<u32> = (0..NUM_OF_VALUES).collect();
    assert_eq!(a, b);
}

#[test]
fn int_test_ascending_insert_stays_balanced() {
    for &n in &[1u32, 2, 3, 10, 100, 1000, 10_000] {
        let set: RedBlackSet<u32> = (0..n).collect();
        let bound = 2.0 * f64::from(n + 1).log2();
        assert!(
            set.height() as f64 <= bound,
            "height {} exceeds {} for {} values",
            set.height(),
            bound,
            n,
        );
        assert_eq!(set.verify(), Ok(()));
    }
}

#[test]
fn int_test_descending_remove_stays_balanced() {
    let n = 4096u32;
    let mut set: RedBlackSet<u32> = (0..n).collect();
    for value in (n / 2..n).rev() {
        set.remove(&value);
    }
    let remaining = f64::from(n / 2 + 1);
    assert!(set.height() as f64 <= 2.0 * remaining.log2());
    check_properties(&set);
}

#[test]
fn int_test_custom_comparator() {
    let mut set = RedBlackSet::with_comparator(|a: &u32, b: &u32| b.cmp(a));
    for value in permutation(100) {
        set.insert(value);
    }
    assert_eq!(set.first(), Some(&99));
    assert_eq!(set.last(), Some(&0));
    assert_eq!(
        set.iter().cloned().collect::<Vec<u32>>(),
        (0..100).rev().collect::<Vec<u32>>(),
    );
    assert_eq!(set.verify(), Ok(()));
}

#[test]
fn int_test_opaque_elements() {
    #[derive(Debug)]
    struct Record {
        id: u32,
        name: String,
    }

    let by_id = |a: &Record, b: &Record| -> Ordering { a.id.cmp(&b.id) };
    let mut set = RedBlackSet::with_comparator(by_id);
    for id in permutation(50) {
        set.insert(Record {
            id,
            name: format!("record {}", id),
        });
    }
    let probe = Record {
        id: 7,
        name: String::new(),
    };
    assert_eq!(set.get(&probe).map(|r| r.name.as_str()), Some("record 7"));
    assert_eq!(set.remove(&probe).map(|r| r.id), Some(7));
    assert!(!set.contains(&probe));
    assert_eq!(set.len(), 49);
}

#[test]
fn int_test_for_each_while_early_stop() {
    let set: RedBlackSet<u32> = permutation(NUM_OF_VALUES).into_iter().collect();
    let mut visited = Vec::new();
    set.for_each_while(|value| {
        visited.push(*value);
        visited.len() < 10
    });
    assert_eq!(visited, (0..10).collect::<Vec<u32>>());

    let mut count = 0;
    set.for_each(|_| count += 1);
    assert_eq!(count, set.len());
}

#[test]
fn int_test_into_iter() {
    let values = permutation(NUM_OF_VALUES);
    let set: RedBlackSet<u32> = values.iter().cloned().collect();
    let owned = set.into_iter();
    assert_eq!(owned.len(), NUM_OF_VALUES as usize);
    assert_eq!(owned.collect::<Vec<u32>>(), (0..NUM_OF_VALUES).collect::<Vec<u32>>());
}
