use core::fmt;

use compare::Natural;

use crate::Position;
use crate::raw::{Handle, RawTree};

/// A cursor over an `RBTreeMap`.
///
/// A cursor points at an entry or at the end of the map and moves in key order. Unlike a
/// [`Position`] it borrows the map, so it never needs to be validated.
///
/// Moving forward from the end stays at the end; moving backward from the end wraps to the
/// last entry, and moving backward from the first entry reaches the end.
///
/// # Examples
///
/// ```
/// use llrb_tree::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let mut cursor = map.cursor_back();
/// assert_eq!(cursor.key_value(), Some((&3, &"c")));
/// cursor.move_prev();
/// assert_eq!(cursor.value(), Some(&"b"));
///
/// let pos = cursor.position();
/// assert_eq!(map.get_at(pos), Ok((&2, &"b")));
/// ```
pub struct Cursor<'a, K, V, C = Natural<K>> {
    tree: &'a RawTree<K, V, C>,
    node: Handle,
}

impl<'a, K, V, C> Cursor<'a, K, V, C> {
    pub(crate) fn new(tree: &'a RawTree<K, V, C>, node: Handle) -> Self {
        Cursor { tree, node }
    }

    /// Moves to the next entry in key order.
    pub fn move_next(&mut self) {
        self.node = self.tree.next(self.node);
    }

    /// Moves to the previous entry in key order.
    pub fn move_prev(&mut self) {
        self.node = self.tree.prev(self.node);
    }

    /// Returns true if the cursor is at the end of the map.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_sentinel()
    }

    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(key, _)| key)
    }

    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, value)| value)
    }

    /// Returns the entry under the cursor, or `None` at the end.
    #[must_use]
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        (!self.node.is_sentinel()).then(|| tree.entry(self.node))
    }

    /// Returns a detached position for the entry under the cursor.
    #[must_use]
    pub fn position(&self) -> Position {
        self.tree.position(self.node)
    }
}

impl<K, V, C> Clone for Cursor<'_, K, V, C> {
    fn clone(&self) -> Self {
        Cursor {
            tree: self.tree,
            node: self.node,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Cursor<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}
