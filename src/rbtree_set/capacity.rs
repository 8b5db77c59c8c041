use super::RBTreeSet;
use crate::{Error, RBTreeMap};

impl<T: Ord> RBTreeSet<T> {
    /// Creates an empty set with capacity for at least `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::with_capacity(16);
    /// assert!(set.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_capacity(capacity),
        }
    }

    /// Creates an empty set with capacity for at least `capacity` elements.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] if `capacity` is larger than
    /// [`max_size`](RBTreeSet::max_size).
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Ok(RBTreeSet {
            map: RBTreeMap::try_with_capacity(capacity)?,
        })
    }
}

impl<T, C> RBTreeSet<T, C> {
    /// Returns the number of elements the set can hold without reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::with_capacity(16);
    /// assert!(set.capacity() >= 16);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }
}
