use super::RBTreeMap;
use compare::{Natural, natural};

use crate::Error;
use crate::raw::RawTree;

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Creates an empty map with capacity for at least `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeMap {
            raw: RawTree::with_capacity(capacity, natural()),
        }
    }

    /// Creates an empty map with capacity for at least `capacity` elements, refusing
    /// capacities no map could ever use.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] if `capacity` is larger than
    /// [`max_size`](RBTreeMap::max_size).
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::{Error, RBTreeMap};
    ///
    /// assert!(RBTreeMap::<u8, u8>::try_with_capacity(8).is_ok());
    /// assert_eq!(
    ///     RBTreeMap::<u8, u8>::try_with_capacity(usize::MAX).err(),
    ///     Some(Error::CapacityExceeded),
    /// );
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        if capacity > RawTree::<K, V, Natural<K>>::max_size() {
            return Err(Error::CapacityExceeded);
        }
        Ok(Self::with_capacity(capacity))
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Returns the number of elements the map can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
