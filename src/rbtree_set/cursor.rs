use core::fmt;

use compare::Natural;

use crate::{Position, rbtree_map};

/// A cursor over an `RBTreeSet`.
///
/// Moves the same way as the map's [`Cursor`](rbtree_map::Cursor).
///
/// # Examples
///
/// ```
/// use llrb_tree::RBTreeSet;
///
/// let set = RBTreeSet::from([10, 20, 30]);
/// let mut cursor = set.cursor_at(set.find(&20))?;
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&30));
/// cursor.move_next();
/// assert!(cursor.is_end());
/// cursor.move_prev();
/// assert_eq!(cursor.get(), Some(&30));
/// # Ok::<(), llrb_tree::Error>(())
/// ```
pub struct Cursor<'a, T, C = Natural<T>> {
    inner: rbtree_map::Cursor<'a, T, (), C>,
}

impl<'a, T, C> Cursor<'a, T, C> {
    pub(crate) fn new(inner: rbtree_map::Cursor<'a, T, (), C>) -> Self {
        Cursor { inner }
    }

    pub fn move_next(&mut self) {
        self.inner.move_next();
    }

    pub fn move_prev(&mut self) {
        self.inner.move_prev();
    }

    #[must_use]
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }

    /// Returns the element under the cursor, or `None` at the end.
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.inner.key()
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.inner.position()
    }
}

impl<T, C> Clone for Cursor<'_, T, C> {
    fn clone(&self) -> Self {
        Cursor {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Cursor<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}
