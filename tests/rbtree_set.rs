use std::collections::BTreeSet;

use std::cmp::Ordering;

use llrb_tree::compare::{Compare, Natural, Rev};
use llrb_tree::{Error, RBTreeSet};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 5_000;

/// Generates values in a range that ensures collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -2_000i64..2_000i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Take(i64),
    EraseFound(i64),
    Contains(i64),
    First,
    Last,
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        2 => value_strategy().prop_map(SetOp::Remove),
        1 => value_strategy().prop_map(SetOp::Take),
        2 => value_strategy().prop_map(SetOp::EraseFound),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

// ─── Core operations against BTreeSet ────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Replays a random sequence of operations on both RBTreeSet and BTreeSet and asserts
    /// identical results at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut rb_set: RBTreeSet<i64> = RBTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    let (pos, inserted) = rb_set.insert(*v);
                    prop_assert_eq!(inserted, bt_set.insert(*v), "insert({})", v);
                    prop_assert_eq!(rb_set.get_at(pos), Ok(v));
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(rb_set.remove(v), bt_set.remove(v), "remove({})", v);
                }
                SetOp::Take(v) => {
                    prop_assert_eq!(rb_set.take(v), bt_set.take(v), "take({})", v);
                }
                SetOp::EraseFound(v) => {
                    let len = rb_set.len();
                    let next = rb_set.erase(rb_set.find(v)).expect("a fresh position is valid");
                    if bt_set.remove(v) {
                        let expected = bt_set.range(v..).next();
                        let actual = if next.is_end() { None } else { rb_set.get_at(next).ok() };
                        prop_assert_eq!(actual, expected, "erase(find({}))", v);
                    } else {
                        prop_assert_eq!(next, rb_set.end(), "erase(find({})) of a missing value", v);
                        prop_assert_eq!(rb_set.len(), len);
                    }
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(rb_set.contains(v), bt_set.contains(v), "contains({})", v);
                }
                SetOp::First => prop_assert_eq!(rb_set.first(), bt_set.first()),
                SetOp::Last => prop_assert_eq!(rb_set.last(), bt_set.last()),
                SetOp::PopFirst => prop_assert_eq!(rb_set.pop_first(), bt_set.pop_first()),
                SetOp::PopLast => prop_assert_eq!(rb_set.pop_last(), bt_set.pop_last()),
            }
            prop_assert_eq!(rb_set.len(), bt_set.len(), "len mismatch after {:?}", op);
        }

        prop_assert!(rb_set.iter().eq(bt_set.iter()));
        prop_assert!(rb_set.iter().rev().eq(bt_set.iter().rev()));
    }

    /// Merging two random sets splits them the way set algebra says it should.
    #[test]
    fn merge_matches_set_algebra(
        left in proptest::collection::btree_set(value_strategy(), 0..400),
        right in proptest::collection::btree_set(value_strategy(), 0..400),
    ) {
        let mut a: RBTreeSet<i64> = left.iter().copied().collect();
        let mut b: RBTreeSet<i64> = right.iter().copied().collect();
        a.merge(&mut b);

        let union: Vec<_> = left.union(&right).copied().collect();
        let common: Vec<_> = left.intersection(&right).copied().collect();
        prop_assert_eq!(a.into_iter().collect::<Vec<_>>(), union);
        prop_assert_eq!(b.into_iter().collect::<Vec<_>>(), common);
    }

    /// Erasing every element through returned positions visits the set in order and empties it.
    #[test]
    fn erase_chain_drains_in_order(values in proptest::collection::btree_set(value_strategy(), 0..400)) {
        let mut set: RBTreeSet<i64> = values.iter().copied().collect();
        let mut drained = Vec::new();

        let mut pos = set.begin();
        while !pos.is_end() {
            drained.push(*set.get_at(pos).unwrap());
            pos = set.erase(pos).unwrap();
        }

        prop_assert!(set.is_empty());
        prop_assert_eq!(drained, values.into_iter().collect::<Vec<_>>());
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn insert_then_erase_two_keys() {
    let mut set = RBTreeSet::new();
    for v in [5, 3, 8, 1, 4, 7, 9] {
        assert!(set.insert(v).1);
    }
    set.erase(set.find(&3)).unwrap();
    set.erase(set.find(&8)).unwrap();
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 4, 5, 7, 9]);
}

#[test]
fn merge_keeps_collisions_in_source() {
    let mut a = RBTreeSet::from([1, 2, 3]);
    let mut b = RBTreeSet::from([2, 3, 4]);
    a.merge(&mut b);
    assert_eq!(a, RBTreeSet::from([1, 2, 3, 4]));
    assert_eq!(b, RBTreeSet::from([2, 3]));
}

#[test]
fn duplicate_insert_returns_existing_position() {
    let mut set = RBTreeSet::from([10]);
    let existing = set.find(&10);
    let (pos, inserted) = set.insert(10);
    assert!(!inserted);
    assert_eq!(pos, existing);
    assert_eq!(set.len(), 1);
}

#[test]
fn walks_forward_and_backward() {
    let set: RBTreeSet<i32> = (1..=5).collect();

    let mut pos = set.begin();
    let mut forward = Vec::new();
    while pos != set.end() {
        forward.push(*set.get_at(pos).unwrap());
        pos = set.next(pos).unwrap();
    }
    assert_eq!(forward, vec![1, 2, 3, 4, 5]);

    let mut backward = Vec::new();
    let mut pos = set.end();
    loop {
        pos = set.prev(pos).unwrap();
        if pos.is_end() {
            break;
        }
        backward.push(*set.get_at(pos).unwrap());
    }
    assert_eq!(backward, vec![5, 4, 3, 2, 1]);
}

#[test]
fn empty_set_iterators() {
    let set: RBTreeSet<u8> = RBTreeSet::new();
    assert_eq!(set.begin(), set.end());
    assert_eq!(set.prev(set.end()), Ok(set.end()));
    assert_eq!(set.iter().next(), None);
    assert!(set.cursor_front().is_end());
    assert_eq!(set.cursor_back().get(), None);
}

#[test]
fn stale_and_foreign_positions() {
    let mut set = RBTreeSet::from([1, 2, 3]);
    let other = RBTreeSet::from([1, 2, 3]);
    let stale = set.find(&1);
    set.remove(&2);

    assert_eq!(set.get_at(stale), Err(Error::InvalidIterator));
    assert_eq!(set.get_at(other.find(&1)), Err(Error::InvalidIterator));
    assert_eq!(set.erase(stale), Err(Error::InvalidIterator));
    assert_eq!(set.len(), 2);
}

#[test]
fn clear_and_swap() {
    let mut a = RBTreeSet::from([1, 2]);
    let mut b = RBTreeSet::from([9]);
    let nine = b.begin();

    a.swap(&mut b);
    assert_eq!(a.get_at(nine), Ok(&9));
    assert_eq!(b.len(), 2);

    b.clear();
    assert!(b.is_empty());
    assert_eq!(b.first(), None);
    assert!(b.insert(4).1);
    assert_eq!(b.iter().collect::<Vec<_>>(), vec![&4]);
}

#[test]
fn retain_keeps_matching() {
    let mut set: RBTreeSet<i32> = (0..20).collect();
    set.retain(|v| v % 3 == 0);
    assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![0, 3, 6, 9, 12, 15, 18]);
}

#[test]
fn custom_comparator_with_borrowed_lookup() {
    #[derive(Default)]
    struct CaseInsensitive;

    fn fold(a: &str, b: &str) -> Ordering {
        a.bytes().map(|c| c.to_ascii_lowercase()).cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
    }

    impl Compare<String> for CaseInsensitive {
        fn compare(&self, a: &String, b: &String) -> Ordering {
            fold(a, b)
        }
    }

    impl Compare<str, String> for CaseInsensitive {
        fn compare(&self, a: &str, b: &String) -> Ordering {
            fold(a, b)
        }
    }

    let mut set = RBTreeSet::with_comparator(CaseInsensitive);
    assert!(set.insert(String::from("Apple")).1);
    assert!(!set.insert(String::from("APPLE")).1);
    assert!(set.insert(String::from("banana")).1);

    assert!(set.contains("apple"));
    assert_eq!(set.get("BANANA").map(String::as_str), Some("banana"));
    assert_eq!(set.iter().map(String::as_str).collect::<Vec<_>>(), vec!["Apple", "banana"]);
}

#[test]
fn descending_set() {
    let set: RBTreeSet<i32, Rev<Natural<i32>>> = [4, 1, 3].into_iter().collect();
    assert_eq!(set.first(), Some(&4));
    assert_eq!(set.last(), Some(&1));
    assert_eq!(format!("{set:?}"), "{4, 3, 1}");
}

#[test]
fn erasing_a_missing_value_leaves_the_set_alone() {
    let mut set = RBTreeSet::from([2, 4, 6]);
    let first = set.begin();

    let next = set.erase(set.find(&5)).unwrap();
    assert!(next.is_end());
    assert_eq!(set.len(), 3);
    assert_eq!(set.get_at(first), Ok(&2));
}

#[test]
fn cursor_from_position() {
    let set = RBTreeSet::from(['a', 'b', 'c']);
    let mut cursor = set.cursor_at(set.find(&'b')).unwrap();
    assert_eq!(cursor.get(), Some(&'b'));
    cursor.move_prev();
    assert_eq!(cursor.get(), Some(&'a'));
    cursor.move_prev();
    assert!(cursor.is_end());
    assert_eq!(cursor.position(), set.end());
}

#[test]
fn try_insert_and_capacity() {
    let mut set: RBTreeSet<u32> = RBTreeSet::with_capacity(8);
    assert!(set.capacity() >= 8);
    assert_eq!(set.try_insert(1).map(|(_, inserted)| inserted), Ok(true));
    assert_eq!(set.try_insert(1).map(|(_, inserted)| inserted), Ok(false));
    assert_eq!(RBTreeSet::<u32>::try_with_capacity(usize::MAX).err(), Some(Error::CapacityExceeded));
}
