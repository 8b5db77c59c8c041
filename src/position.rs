use crate::raw::{Handle, Stamp};

/// A detached position inside an [`RBTreeMap`](crate::RBTreeMap) or
/// [`RBTreeSet`](crate::RBTreeSet).
///
/// Positions are returned by `insert`, `find`, `begin`, `end`, `next`, `prev` and `erase`.
/// They do not borrow the collection, so they can be held across mutations and handed back
/// to it later; the collection checks every position it is given.
///
/// A position stays valid while elements are only inserted. Any removal from the collection
/// (`erase`, `remove`, `pop_first`, `retain`, being drained by `merge`, ...) invalidates all of
/// its outstanding positions, because removal may relocate entries between nodes. `clear`
/// additionally replaces the end position. Using an invalidated position, or one that
/// belongs to another collection, yields [`Error::InvalidIterator`](crate::Error::InvalidIterator).
///
/// Two positions are equal when they name the same node of the same collection.
///
/// # Examples
///
/// ```
/// use llrb_tree::RBTreeSet;
///
/// let mut set = RBTreeSet::from([5, 3, 8]);
/// let (pos, inserted) = set.insert(4);
/// assert!(inserted);
/// assert_eq!(set.get_at(pos), Ok(&4));
///
/// let next = set.next(pos).unwrap();
/// assert_eq!(set.get_at(next), Ok(&5));
/// assert_eq!(set.find(&9), set.end());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    pub(crate) stamp: Stamp,
    pub(crate) epoch: usize,
    pub(crate) node: Handle,
}

impl Position {
    /// Returns true if this is the end position (one past the largest element).
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::new();
    /// assert!(set.begin().is_end());
    /// ```
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_sentinel()
    }
}
