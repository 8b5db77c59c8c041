use alloc::vec::Vec;
use core::cmp::Ordering;
use core::mem;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};
use super::stamp::Stamp;
use compare::Compare;

use crate::{Error, Position};

/// The left-leaning red-black tree backing `RBTreeMap` and `RBTreeSet`.
///
/// Invariants after every public operation:
/// - keys are in strictly ascending order under `comparator`;
/// - red nodes are left children and never have a red child;
/// - every root-to-sentinel path crosses the same number of black nodes;
/// - the root is black.
pub(crate) struct RawTree<K, V, C> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, or the sentinel if the tree is empty.
    root: Handle,
    /// Total number of entries in the tree.
    len: usize,
    /// Identity of this tree's sentinel. Replaced on `clear`.
    stamp: Stamp,
    /// Bumped on every physical removal; positions from older epochs are rejected.
    epoch: usize,
    comparator: C,
}

impl<K, V, C> RawTree<K, V, C> {
    /// Creates a new, empty tree.
    pub(crate) fn new(comparator: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: Handle::SENTINEL,
            len: 0,
            stamp: Stamp::fresh(),
            epoch: 0,
            comparator,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize, comparator: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            ..Self::new(comparator)
        }
    }

    /// Returns the number of entries in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no entries.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// The number of addressable nodes; no tree can ever hold more entries.
    pub(crate) const fn max_size() -> usize {
        Arena::<Node<K, V>>::MAX_LEN
    }

    pub(crate) fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Drops every node and installs a fresh sentinel.
    pub(crate) fn clear(&mut self) {
        log::trace!("clearing tree of {} entries", self.len);
        self.nodes.clear();
        self.root = Handle::SENTINEL;
        self.len = 0;
        self.stamp = Stamp::fresh();
        self.epoch = 0;
    }

    /// Moves every entry out of the tree in ascending order and leaves it empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        // Collect the order first: `next` climbs through parent links of nodes already visited.
        let mut order = Vec::with_capacity(self.len);
        let mut current = self.first();
        while !current.is_sentinel() {
            order.push(current);
            current = self.next(current);
        }

        let entries = order.into_iter().map(|handle| self.nodes.take(handle).into_entry()).collect();
        self.clear();
        entries
    }

    fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    pub(crate) fn key(&self, handle: Handle) -> &K {
        &self.node(handle).key
    }

    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        &mut self.node_mut(handle).value
    }

    pub(crate) fn entry(&self, handle: Handle) -> (&K, &V) {
        let node = self.node(handle);
        (&node.key, &node.value)
    }

    pub(crate) fn entry_mut(&mut self, handle: Handle) -> (&K, &mut V) {
        let node = self.node_mut(handle);
        (&node.key, &mut node.value)
    }

    fn left(&self, handle: Handle) -> Handle {
        self.node(handle).left
    }

    fn right(&self, handle: Handle) -> Handle {
        self.node(handle).right
    }

    fn parent(&self, handle: Handle) -> Handle {
        self.node(handle).parent
    }

    fn color(&self, handle: Handle) -> Color {
        if handle.is_sentinel() {
            Color::Black
        } else {
            self.node(handle).color
        }
    }

    fn is_red(&self, handle: Handle) -> bool {
        self.color(handle) == Color::Red
    }

    fn set_color(&mut self, handle: Handle, color: Color) {
        debug_assert!(!handle.is_sentinel(), "the sentinel is always black");
        self.node_mut(handle).color = color;
    }

    fn set_parent(&mut self, handle: Handle, parent: Handle) {
        if !handle.is_sentinel() {
            self.node_mut(handle).parent = parent;
        }
    }

    fn blacken_root(&mut self) {
        if !self.root.is_sentinel() {
            let root = self.root;
            self.set_color(root, Color::Black);
        }
    }

    /// Returns the smallest node, or the sentinel if the tree is empty.
    pub(crate) fn first(&self) -> Handle {
        self.leftmost(self.root)
    }

    /// Returns the largest node, or the sentinel if the tree is empty.
    pub(crate) fn last(&self) -> Handle {
        self.rightmost(self.root)
    }

    fn leftmost(&self, mut handle: Handle) -> Handle {
        if !handle.is_sentinel() {
            while !self.left(handle).is_sentinel() {
                handle = self.left(handle);
            }
        }
        handle
    }

    fn rightmost(&self, mut handle: Handle) -> Handle {
        if !handle.is_sentinel() {
            while !self.right(handle).is_sentinel() {
                handle = self.right(handle);
            }
        }
        handle
    }

    /// In-order successor of `handle`; the sentinel after the largest node.
    ///
    /// Stepping forward from the sentinel stays on the sentinel.
    pub(crate) fn next(&self, handle: Handle) -> Handle {
        if handle.is_sentinel() {
            return handle;
        }

        let right = self.right(handle);
        if !right.is_sentinel() {
            return self.leftmost(right);
        }

        let mut child = handle;
        let mut parent = self.parent(handle);
        while !parent.is_sentinel() && self.right(parent) == child {
            child = parent;
            parent = self.parent(parent);
        }
        parent
    }

    /// In-order predecessor of `handle`; the sentinel before the smallest node.
    ///
    /// Stepping back from the sentinel yields the largest node.
    pub(crate) fn prev(&self, handle: Handle) -> Handle {
        if handle.is_sentinel() {
            return self.last();
        }

        let left = self.left(handle);
        if !left.is_sentinel() {
            return self.rightmost(left);
        }

        let mut child = handle;
        let mut parent = self.parent(handle);
        while !parent.is_sentinel() && self.left(parent) == child {
            child = parent;
            parent = self.parent(parent);
        }
        parent
    }

    pub(crate) fn position(&self, node: Handle) -> Position {
        Position {
            stamp: self.stamp,
            epoch: self.epoch,
            node,
        }
    }

    pub(crate) fn end(&self) -> Position {
        self.position(Handle::SENTINEL)
    }

    /// Checks that `position` was issued by this tree since its last removal.
    ///
    /// The returned handle may be the sentinel.
    pub(crate) fn resolve(&self, position: Position) -> Result<Handle, Error> {
        if position.stamp == self.stamp && position.epoch == self.epoch {
            Ok(position.node)
        } else {
            log::debug!(
                "rejected position {:?}@{} (tree is {:?}@{})",
                position.stamp,
                position.epoch,
                self.stamp,
                self.epoch
            );
            Err(Error::InvalidIterator)
        }
    }

    /// Like [`resolve`](Self::resolve), but also rejects the end position.
    pub(crate) fn resolve_entry(&self, position: Position) -> Result<Handle, Error> {
        let node = self.resolve(position)?;
        if node.is_sentinel() {
            Err(Error::InvalidIterator)
        } else {
            Ok(node)
        }
    }

    pub(crate) fn next_position(&self, position: Position) -> Result<Position, Error> {
        let node = self.resolve(position)?;
        Ok(self.position(self.next(node)))
    }

    pub(crate) fn prev_position(&self, position: Position) -> Result<Position, Error> {
        let node = self.resolve(position)?;
        Ok(self.position(self.prev(node)))
    }

    /// Points `parent`'s link to `old` at `new` instead, or re-roots the tree when
    /// `parent` is the sentinel.
    fn replace_child(&mut self, parent: Handle, old: Handle, new: Handle) {
        if parent.is_sentinel() {
            self.root = new;
        } else {
            let node = self.node_mut(parent);
            if node.left == old {
                node.left = new;
            } else {
                debug_assert_eq!(node.right, old, "`old` is not a child of `parent`");
                node.right = new;
            }
        }
        self.set_parent(new, parent);
    }

    /// Rotates the red-or-black right child of `node` above it.
    ///
    /// The pivot inherits `node`'s color and `node` turns red. Returns the pivot.
    fn rotate_left(&mut self, node: Handle) -> Handle {
        let pivot = self.right(node);
        let inner = self.left(pivot);
        let parent = self.parent(node);

        self.node_mut(node).right = inner;
        self.set_parent(inner, node);
        self.node_mut(pivot).left = node;
        self.node_mut(node).parent = pivot;
        self.replace_child(parent, node, pivot);

        let color = self.color(node);
        self.set_color(pivot, color);
        self.set_color(node, Color::Red);
        pivot
    }

    /// Mirror of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, node: Handle) -> Handle {
        let pivot = self.left(node);
        let inner = self.right(pivot);
        let parent = self.parent(node);

        self.node_mut(node).left = inner;
        self.set_parent(inner, node);
        self.node_mut(pivot).right = node;
        self.node_mut(node).parent = pivot;
        self.replace_child(parent, node, pivot);

        let color = self.color(node);
        self.set_color(pivot, color);
        self.set_color(node, Color::Red);
        pivot
    }

    /// Pushes a red pair of children up into `node`.
    fn flip_colors(&mut self, node: Handle) {
        let color = if self.parent(node).is_sentinel() {
            Color::Black
        } else {
            Color::Red
        };
        let (left, right) = (self.left(node), self.right(node));
        self.set_color(node, color);
        self.set_color(left, Color::Black);
        self.set_color(right, Color::Black);
    }

    /// Walks up from `start` repairing right-leaning reds and red-red pairs.
    fn fix_upward(&mut self, start: Handle) {
        let mut node = start;
        while !node.is_sentinel() {
            let (left, right) = (self.left(node), self.right(node));
            if self.is_red(left) && self.is_red(right) {
                self.flip_colors(node);
                node = self.parent(node);
            } else if self.is_red(right) {
                node = self.rotate_left(node);
            } else if self.is_red(node) && self.is_red(left) {
                let parent = self.parent(node);
                node = self.rotate_right(parent);
            } else {
                break;
            }
        }
        self.blacken_root();
    }

    /// Exchanges the payloads of two nodes, keeping `tracked` on the node that holds the
    /// payload it named before the exchange.
    fn swap_payloads(&mut self, a: Handle, b: Handle, tracked: &mut Handle) {
        let (x, y) = self.nodes.get_pair_mut(a, b);
        mem::swap(&mut x.key, &mut y.key);
        mem::swap(&mut x.value, &mut y.value);

        if *tracked == a {
            *tracked = b;
        } else if *tracked == b {
            *tracked = a;
        }
    }

    /// Removes the node at `target`.
    ///
    /// Returns its entry and the node now holding the entry that followed it (the sentinel if
    /// it was the largest). Every outstanding position of the tree is invalidated.
    pub(crate) fn remove_node(&mut self, target: Handle) -> ((K, V), Handle) {
        debug_assert!(!target.is_sentinel(), "`RawTree::remove_node()` - cannot remove the sentinel!");
        let mut successor = self.next(target);
        let mut victim = target;

        // Reduce to a node with at most one child.
        let (left, right) = (self.left(victim), self.right(victim));
        if !left.is_sentinel() && !right.is_sentinel() {
            let greater = self.leftmost(right);
            let neighbor = if self.is_red(greater) {
                greater
            } else {
                self.rightmost(left)
            };
            self.swap_payloads(victim, neighbor, &mut successor);
            victim = neighbor;
        }

        // A red node with at most one child is a leaf and leaves the black-height alone.
        if self.color(victim) == Color::Black {
            let node = self.node(victim);
            let child = if node.left.is_sentinel() {
                node.right
            } else {
                node.left
            };
            if child.is_sentinel() {
                self.rebalance_before_unlink(victim);
            } else {
                debug_assert!(self.is_red(child), "a black node's only child must be red");
                self.swap_payloads(victim, child, &mut successor);
                victim = child;
            }
        }

        debug_assert!(self.node(victim).is_leaf(), "only leaves are unlinked");
        let parent = self.parent(victim);
        self.replace_child(parent, victim, Handle::SENTINEL);
        self.blacken_root();
        self.len -= 1;
        self.epoch = self.epoch.wrapping_add(1);

        let entry = self.nodes.take(victim).into_entry();
        debug_assert_eq!(self.nodes.len(), self.len, "`RawTree::remove_node()` - arena out of step");
        (entry, successor)
    }

    /// Restores the black-height around a black leaf that is about to be unlinked.
    ///
    /// The leaf stays attached (as the same-side child) throughout; only its ancestors and
    /// their siblings are rotated.
    fn rebalance_before_unlink(&mut self, leaf: Handle) {
        // `deficient` roots a subtree one black node short of its sibling's.
        let mut deficient = leaf;
        loop {
            let parent = self.parent(deficient);
            if parent.is_sentinel() {
                return;
            }

            if self.left(parent) == deficient {
                // Right siblings are black in a left-leaning tree.
                let sibling = self.right(parent);
                debug_assert!(!sibling.is_sentinel() && !self.is_red(sibling));

                if self.is_red(self.left(sibling)) {
                    // Borrow the sibling's red child through a double rotation.
                    self.rotate_right(sibling);
                    self.rotate_left(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(sibling, Color::Black);
                    return;
                }
                if self.is_red(parent) {
                    self.set_color(parent, Color::Black);
                    self.rotate_left(parent);
                    return;
                }
                // Merge with the sibling; the whole subtree is now short.
                deficient = self.rotate_left(parent);
            } else {
                let sibling = self.left(parent);
                debug_assert!(!sibling.is_sentinel());

                if self.is_red(sibling) {
                    self.rotate_right(parent);
                    let nephew = self.left(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(nephew, Color::Red);
                    if self.is_red(self.left(nephew)) {
                        self.fix_upward(nephew);
                    }
                    return;
                }
                if self.is_red(self.left(sibling)) {
                    let outer = self.left(sibling);
                    self.rotate_right(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(outer, Color::Black);
                    return;
                }
                self.set_color(sibling, Color::Red);
                if self.is_red(parent) {
                    self.set_color(parent, Color::Black);
                    return;
                }
                deficient = parent;
            }
        }
    }

    /// Removes the node at `position` and returns the position of the entry that followed it.
    ///
    /// Erasing the end position is a no-op.
    pub(crate) fn erase(&mut self, position: Position) -> Result<Position, Error> {
        let node = self.resolve(position)?;
        if node.is_sentinel() {
            return Ok(position);
        }
        let (_, next) = self.remove_node(node);
        Ok(self.position(next))
    }

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first();
        (!first.is_sentinel()).then(|| self.remove_node(first).0)
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last();
        (!last.is_sentinel()).then(|| self.remove_node(last).0)
    }

    /// Keeps only the entries for which `keep` returns true, visiting them in order.
    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut current = self.first();
        while !current.is_sentinel() {
            let node = self.node_mut(current);
            current = if keep(&node.key, &mut node.value) {
                self.next(current)
            } else {
                self.remove_node(current).1
            };
        }
    }
}

impl<K, V, C> RawTree<K, V, C> {
    /// Returns the node holding `key`, or the sentinel.
    pub(crate) fn search<Q>(&self, key: &Q) -> Handle
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        let mut current = self.root;
        while !current.is_sentinel() {
            let node = self.node(current);
            current = match self.comparator.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => break,
            };
        }
        current
    }

    /// Inserts `key` unless an equal key is present.
    ///
    /// Returns the node holding the key and whether it was inserted. A rejected `key` and
    /// `value` are dropped.
    pub(crate) fn try_insert(&mut self, key: K, value: V) -> Result<(Handle, bool), Error>
    where
        C: Compare<K>,
    {
        let mut parent = Handle::SENTINEL;
        let mut current = self.root;
        let mut ordering = Ordering::Equal;
        while !current.is_sentinel() {
            let node = self.node(current);
            ordering = self.comparator.compare(&key, &node.key);
            parent = current;
            current = match ordering {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Ok((current, false)),
            };
        }

        let handle = self.nodes.try_alloc(Node::new(key, value, parent))?;
        if parent.is_sentinel() {
            self.root = handle;
        } else if ordering == Ordering::Less {
            self.node_mut(parent).left = handle;
        } else {
            self.node_mut(parent).right = handle;
        }
        self.len += 1;
        self.fix_upward(parent);

        Ok((handle, true))
    }

    /// Like [`try_insert`](Self::try_insert), panicking when the arena is exhausted.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, bool)
    where
        C: Compare<K>,
    {
        match self.try_insert(key, value) {
            Ok(inserted) => inserted,
            Err(error) => panic!("`RawTree::insert()` - {error}"),
        }
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        let node = self.search(key);
        (!node.is_sentinel()).then(|| self.remove_node(node).0)
    }

    /// Moves every entry of `other` whose key is absent here into this tree.
    ///
    /// Colliding entries stay in `other`. Both trees are valid after each moved entry.
    pub(crate) fn merge(&mut self, other: &mut Self)
    where
        C: Compare<K>,
    {
        let mut moved = 0usize;
        let mut current = other.first();
        while !current.is_sentinel() {
            let (next, taken) = self.merge_one(other, current);
            moved += usize::from(taken);
            current = next;
        }
        log::trace!("merged {moved} entries, {} collisions left in source", other.len);
    }

    /// Moves the entry at `node` of `other` here unless its key collides.
    ///
    /// Returns the node of `other` to visit next and whether the entry moved.
    fn merge_one(&mut self, other: &mut Self, node: Handle) -> (Handle, bool)
    where
        C: Compare<K>,
    {
        if !self.search(other.key(node)).is_sentinel() {
            return (other.next(node), false);
        }
        assert!(!self.nodes.is_full(), "`RawTree::merge()` - {}", Error::CapacityExceeded);
        let ((key, value), next) = other.remove_node(node);
        self.insert(key, value);
        (next, true)
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RawTree<K, V, C> {
    fn clone(&self) -> Self {
        // Handles are arena indices, so cloning the arena clones the shape as-is.
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
            stamp: Stamp::fresh(),
            epoch: 0,
            comparator: self.comparator.clone(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;
    use compare::{Natural, natural};
    use alloc::vec;
    use proptest::prelude::*;

    type Tree = RawTree<i32, i32, Natural<i32>>;

    impl<K, V, C: Compare<K>> RawTree<K, V, C> {
        /// Validates every structural invariant. Panics with a descriptive message on violation.
        pub(crate) fn validate_invariants(&self) {
            assert_eq!(self.color(self.root), Color::Black, "root must be black");
            if !self.root.is_sentinel() {
                assert!(self.parent(self.root).is_sentinel(), "root must hang off the sentinel");
            }

            let mut count = 0;
            self.validate_subtree(self.root, &mut count);
            assert_eq!(count, self.len, "len must equal the number of reachable nodes");
            assert_eq!(self.nodes.len(), self.len, "arena must hold exactly the reachable nodes");

            let mut current = self.first();
            while !current.is_sentinel() {
                let next = self.next(current);
                if !next.is_sentinel() {
                    assert_eq!(
                        self.comparator.compare(self.key(current), self.key(next)),
                        Ordering::Less,
                        "in-order walk must be strictly ascending"
                    );
                }
                current = next;
            }
        }

        /// Returns the black-height of the subtree at `handle`.
        fn validate_subtree(&self, handle: Handle, count: &mut usize) -> usize {
            if handle.is_sentinel() {
                return 0;
            }
            *count += 1;

            let node = self.node(handle);
            assert!(!self.is_red(node.right), "red nodes must lean left");
            if node.color == Color::Red {
                assert!(!self.is_red(node.left), "a red node must not have a red child");
            }
            for child in [node.left, node.right] {
                if !child.is_sentinel() {
                    assert_eq!(self.parent(child), handle, "child must point back at its parent");
                }
            }
            if !node.left.is_sentinel() {
                assert_eq!(self.comparator.compare(self.key(node.left), &node.key), Ordering::Less);
            }
            if !node.right.is_sentinel() {
                assert_eq!(self.comparator.compare(self.key(node.right), &node.key), Ordering::Greater);
            }

            let left_height = self.validate_subtree(node.left, count);
            let right_height = self.validate_subtree(node.right, count);
            assert_eq!(left_height, right_height, "black-height must be uniform");
            left_height + usize::from(node.color == Color::Black)
        }

        fn keys(&self) -> Vec<&K> {
            let mut keys = Vec::new();
            let mut current = self.first();
            while !current.is_sentinel() {
                keys.push(self.key(current));
                current = self.next(current);
            }
            keys
        }
    }

    fn tree_of(keys: &[i32]) -> Tree {
        let mut tree = Tree::new(natural());
        for &key in keys {
            tree.insert(key, key * 10);
            tree.validate_invariants();
        }
        tree
    }

    /// Moves `source` into `tree` one entry at a time, validating both trees after each step.
    fn merge_stepwise(tree: &mut Tree, source: &mut Tree) {
        let mut current = source.first();
        while !current.is_sentinel() {
            let (next, _) = tree.merge_one(source, current);
            tree.validate_invariants();
            source.validate_invariants();
            current = next;
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        EraseFirst,
        EraseLast,
        EraseAt(prop::sample::Index),
        Retain(i32),
        MergeFrom(Vec<i32>),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            12 => (0i32..500).prop_map(Op::Insert),
            8 => (0i32..500).prop_map(Op::Remove),
            2 => Just(Op::EraseFirst),
            2 => Just(Op::EraseLast),
            4 => any::<prop::sample::Index>().prop_map(Op::EraseAt),
            1 => (2i32..7).prop_map(Op::Retain),
            1 => prop::collection::vec(0i32..500, 0..40).prop_map(Op::MergeFrom),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..600)) {
            let mut tree = Tree::new(natural());
            let mut model = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        let (handle, inserted) = tree.insert(key, key * 10);
                        prop_assert_eq!(inserted, model.insert(key));
                        prop_assert_eq!(*tree.key(handle), key);
                    }
                    Op::Remove(key) => {
                        let removed = tree.remove(&key).map(|(k, _)| k);
                        prop_assert_eq!(removed, model.take(&key));
                    }
                    Op::EraseFirst => {
                        prop_assert_eq!(tree.pop_first().map(|(k, _)| k), model.pop_first());
                    }
                    Op::EraseLast => {
                        prop_assert_eq!(tree.pop_last().map(|(k, _)| k), model.pop_last());
                    }
                    Op::EraseAt(pick) => {
                        if model.is_empty() {
                            continue;
                        }
                        let key = *model.iter().nth(pick.index(model.len())).unwrap();
                        let next = tree.erase(tree.position(tree.search(&key))).unwrap();
                        model.remove(&key);
                        let expected = model.range(key..).next();
                        let actual = tree.resolve_entry(next).ok().map(|h| tree.key(h));
                        prop_assert_eq!(actual, expected);
                    }
                    Op::Retain(modulus) => {
                        tree.retain(|key, value| {
                            *value += 1;
                            key % modulus != 0
                        });
                        model.retain(|key| key % modulus != 0);
                    }
                    Op::MergeFrom(keys) => {
                        let mut source = Tree::new(natural());
                        for &key in &keys {
                            source.insert(key, key * 10);
                        }
                        let collisions: Vec<i32> = source.keys().into_iter().copied().filter(|k| model.contains(k)).collect();
                        model.extend(keys);

                        merge_stepwise(&mut tree, &mut source);
                        prop_assert_eq!(source.keys().into_iter().copied().collect::<Vec<_>>(), collisions);
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            let keys: Vec<i32> = tree.keys().into_iter().copied().collect();
            let expected: Vec<i32> = model.into_iter().collect();
            prop_assert_eq!(keys, expected);
        }

        #[test]
        fn removal_reports_the_following_entry(keys in prop::collection::btree_set(0i32..1000, 1..200), pick in any::<prop::sample::Index>()) {
            let keys: Vec<i32> = keys.into_iter().collect();
            let mut tree = tree_of(&keys);
            let index = pick.index(keys.len());

            let target = tree.search(&keys[index]);
            let ((key, value), next) = tree.remove_node(target);
            tree.validate_invariants();

            prop_assert_eq!(key, keys[index]);
            prop_assert_eq!(value, keys[index] * 10);
            match keys.get(index + 1) {
                Some(following) => prop_assert_eq!(tree.entry(next), (following, &(following * 10))),
                None => prop_assert!(next.is_sentinel()),
            }
        }

        #[test]
        fn values_travel_with_their_keys(keys in prop::collection::vec(0i32..300, 0..300), removals in prop::collection::vec(0i32..300, 0..150)) {
            let mut tree = Tree::new(natural());
            for &key in &keys {
                tree.insert(key, key * 10);
            }
            for key in &removals {
                tree.remove(key);
            }
            tree.validate_invariants();

            let mut current = tree.first();
            while !current.is_sentinel() {
                let (key, value) = tree.entry(current);
                prop_assert_eq!(*value, *key * 10);
                current = tree.next(current);
            }
        }
    }

    #[test]
    fn ascending_and_descending_runs_stay_balanced() {
        let ascending: Vec<i32> = (0..1024).collect();
        let descending: Vec<i32> = (0..1024).rev().collect();
        for keys in [ascending, descending] {
            let mut tree = tree_of(&keys);
            for key in keys.iter().step_by(3) {
                assert!(tree.remove(key).is_some());
                tree.validate_invariants();
            }
            while tree.pop_first().is_some() {
                tree.validate_invariants();
            }
            assert!(tree.is_empty());
            assert!(tree.root.is_sentinel());
        }
    }

    #[test]
    fn erase_three_then_eight() {
        let mut tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        tree.remove(&3);
        tree.validate_invariants();
        tree.remove(&8);
        tree.validate_invariants();
        assert_eq!(tree.keys(), vec![&1, &4, &5, &7, &9]);
    }

    #[test]
    fn prev_of_sentinel_is_the_maximum() {
        let tree = tree_of(&[2, 9, 4]);
        assert_eq!(*tree.key(tree.prev(Handle::SENTINEL)), 9);
        assert!(tree.next(Handle::SENTINEL).is_sentinel());
        assert!(tree.prev(tree.first()).is_sentinel());

        let empty = Tree::new(natural());
        assert!(empty.prev(Handle::SENTINEL).is_sentinel());
        assert!(empty.first().is_sentinel());
    }

    #[test]
    fn positions_survive_inserts_but_not_removals() {
        let mut tree = tree_of(&[10, 20, 30]);
        let position = tree.position(tree.search(&20));

        tree.insert(25, 250);
        tree.insert(5, 50);
        assert_eq!(tree.resolve_entry(position).map(|h| *tree.key(h)), Ok(20));

        tree.remove(&5);
        assert_eq!(tree.resolve(position), Err(Error::InvalidIterator));
    }

    #[test]
    fn erase_end_is_a_no_op() {
        let mut tree = tree_of(&[1, 2]);
        let end = tree.end();
        assert_eq!(tree.erase(end), Ok(end));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.resolve(end), Ok(Handle::SENTINEL));
    }

    #[test]
    fn foreign_positions_are_rejected() {
        let mut a = tree_of(&[1, 2, 3]);
        let b = tree_of(&[1, 2, 3]);
        let foreign = b.position(b.search(&2));

        assert_eq!(a.erase(foreign), Err(Error::InvalidIterator));
        assert_eq!(a.resolve(b.end()), Err(Error::InvalidIterator));
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn clear_installs_a_fresh_sentinel() {
        let mut tree = tree_of(&[1, 2, 3]);
        let old_end = tree.end();
        tree.clear();
        tree.validate_invariants();
        assert_ne!(tree.end(), old_end);
        assert_eq!(tree.resolve(old_end), Err(Error::InvalidIterator));
        assert!(tree.is_empty());
    }

    #[test]
    fn stepwise_merge_keeps_both_trees_valid() {
        let mut tree = tree_of(&(0..64).step_by(2).collect::<Vec<_>>());
        let mut source = tree_of(&(0..64).step_by(3).collect::<Vec<_>>());
        merge_stepwise(&mut tree, &mut source);
        assert_eq!(tree.len(), 43);
        assert_eq!(source.keys().into_iter().copied().collect::<Vec<_>>(), (0..64).step_by(6).collect::<Vec<_>>());
    }

    #[test]
    fn merge_moves_only_absent_keys() {
        let mut a = tree_of(&[1, 2, 3]);
        let mut b = tree_of(&[2, 3, 4]);
        a.merge(&mut b);
        a.validate_invariants();
        b.validate_invariants();
        assert_eq!(a.keys(), vec![&1, &2, &3, &4]);
        assert_eq!(b.keys(), vec![&2, &3]);
    }

    #[test]
    fn clone_is_deep_and_independent() {
        let mut tree = tree_of(&[3, 1, 2]);
        let copy = tree.clone();
        tree.remove(&2);
        copy.validate_invariants();
        assert_eq!(copy.keys(), vec![&1, &2, &3]);
        assert_ne!(copy.end(), tree.end());
    }

    #[test]
    fn drain_yields_ascending_entries() {
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        let entries = tree.drain_to_vec();
        assert_eq!(entries, (1..=7).map(|k| (k, k * 10)).collect::<Vec<_>>());
        assert!(tree.is_empty());
        tree.validate_invariants();
    }

    #[test]
    fn try_insert_reports_exhaustion() {
        let mut tree: RawTree<u32, (), Natural<u32>> = RawTree::new(natural());
        let max = RawTree::<u32, (), Natural<u32>>::max_size();
        for key in 0..max as u32 {
            assert_eq!(tree.try_insert(key, ()).map(|(_, inserted)| inserted), Ok(true));
        }
        assert_eq!(tree.try_insert(u32::MAX, ()), Err(Error::CapacityExceeded));
        // Present keys are still found without allocating.
        assert!(matches!(tree.try_insert(0, ()), Ok((_, false))));
        assert_eq!(tree.len(), max);
    }
}
