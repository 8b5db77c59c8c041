use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use compare::{Compare, Natural};

use crate::RBTreeMap;
use crate::rbtree_map::{IntoKeys, Keys};
use crate::{Error, Position};

mod capacity;
mod cursor;

pub use cursor::Cursor;

/// An ordered set based on a left-leaning red-black tree.
///
/// See [`RBTreeMap`]'s documentation for a discussion of positions, comparators and the
/// logic errors a caller must avoid. A set is a map whose values are `()`.
///
/// # Examples
///
/// ```
/// use llrb_tree::RBTreeSet;
///
/// let mut tags = RBTreeSet::new();
///
/// tags.insert("storage");
/// tags.insert("network");
/// tags.insert("compute");
/// tags.insert("network");
/// assert_eq!(tags.len(), 3);
///
/// assert!(!tags.contains(&"billing"));
/// assert!(tags.remove(&"network"));
///
/// let mut listed = Vec::new();
/// for tag in &tags {
///     listed.push(*tag);
/// }
/// assert_eq!(listed, ["compute", "storage"]);
/// ```
///
/// A `RBTreeSet` with a known list of items can be initialized from an array:
///
/// ```
/// use llrb_tree::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 2, 3]);
/// assert_eq!(set.len(), 3);
/// ```
pub struct RBTreeSet<T, C = Natural<T>> {
    map: RBTreeMap<T, (), C>,
}

/// An iterator over the items of a `RBTreeSet`.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeSet`].
///
/// # Examples
///
/// ```
/// use llrb_tree::RBTreeSet;
///
/// let set = RBTreeSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// ```
///
/// [`iter`]: RBTreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a, C = Natural<T>> {
    inner: Keys<'a, T, (), C>,
}

/// An owning iterator over the items of a `RBTreeSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: RBTreeSet#method.into_iter
pub struct IntoIter<T> {
    inner: IntoKeys<T, ()>,
}

impl<T: Ord> RBTreeSet<T> {
    /// Makes a new, empty `RBTreeSet` ordered by [`Natural`].
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let mut set: RBTreeSet<i32> = RBTreeSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        RBTreeSet { map: RBTreeMap::new() }
    }
}

impl<T, C> RBTreeSet<T, C> {
    /// Makes a new, empty `RBTreeSet` ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_comparator(comparator),
        }
    }

    /// Returns a reference to the comparator ordering this set.
    #[must_use]
    pub fn comparator(&self) -> &C {
        self.map.comparator()
    }

    /// Returns the number of elements in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the largest number of elements any set of this type can hold.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.map.max_size()
    }

    /// Clears the set, removing all elements and invalidating every position.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let mut v = RBTreeSet::new();
    /// v.insert(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns a reference to the first element in the set, if any.
    /// This element is always the minimum of all elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// set.insert(2);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(k, ())| k)
    }

    /// Returns a reference to the last element in the set, if any.
    /// This element is always the maximum of all elements in the set.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|(k, ())| k)
    }

    /// Removes the first element from the set and returns it, if any.
    /// The first element is always the minimum element in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    ///
    /// set.insert(1);
    /// while let Some(n) = set.pop_first() {
    ///     assert_eq!(n, 1);
    /// }
    /// assert!(set.is_empty());
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        self.map.pop_first().map(|kv| kv.0)
    }

    /// Removes the last element from the set and returns it, if any.
    /// The last element is always the maximum element in the set.
    pub fn pop_last(&mut self) -> Option<T> {
        self.map.pop_last().map(|kv| kv.0)
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all elements `e` for which `f(&e)` returns `false`.
    /// The elements are visited in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([1, 2, 3, 4, 5, 6]);
    /// // Keep only the even numbers.
    /// set.retain(|&k| k % 2 == 0);
    /// assert!(set.iter().eq([2, 4, 6].iter()));
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.map.retain(|k, ()| f(k));
    }

    /// Exchanges the contents of two sets. Positions follow their elements.
    pub fn swap(&mut self, other: &mut Self) {
        self.map.swap(&mut other.map);
    }

    /// Returns the position of the smallest element, or [`end`](Self::end) if the set is empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        self.map.begin()
    }

    /// Returns the position one past the largest element.
    #[must_use]
    pub fn end(&self) -> Position {
        self.map.end()
    }

    /// Returns the position of the element following `position`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if `position` does not belong to this set or was
    /// invalidated by a removal.
    pub fn next(&self, position: Position) -> Result<Position, Error> {
        self.map.next(position)
    }

    /// Returns the position of the element preceding `position`; the largest element
    /// precedes [`end`](Self::end).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if `position` does not belong to this set or was
    /// invalidated by a removal.
    pub fn prev(&self, position: Position) -> Result<Position, Error> {
        self.map.prev(position)
    }

    /// Returns the element at `position`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if `position` is the end position, does not belong to this
    /// set, or was invalidated by a removal.
    pub fn get_at(&self, position: Position) -> Result<&T, Error> {
        self.map.get_at(position).map(|(k, ())| k)
    }

    /// Removes the element at `position` and returns the position of the element that
    /// followed it. Erasing [`end`](Self::end) does nothing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if `position` does not belong to this set or was
    /// invalidated by an earlier removal.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([5, 3, 8, 1, 4, 7, 9]);
    /// set.erase(set.find(&3))?;
    /// set.erase(set.find(&8))?;
    /// assert!(set.iter().eq([1, 4, 5, 7, 9].iter()));
    /// # Ok::<(), llrb_tree::Error>(())
    /// ```
    pub fn erase(&mut self, position: Position) -> Result<Position, Error> {
        self.map.erase(position)
    }

    /// Returns a cursor at the smallest element.
    pub fn cursor_front(&self) -> Cursor<'_, T, C> {
        Cursor::new(self.map.cursor_front())
    }

    /// Returns a cursor at the largest element.
    pub fn cursor_back(&self) -> Cursor<'_, T, C> {
        Cursor::new(self.map.cursor_back())
    }

    /// Returns a cursor at `position`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if `position` does not belong to this set or was
    /// invalidated by a removal.
    pub fn cursor_at(&self, position: Position) -> Result<Cursor<'_, T, C>, Error> {
        self.map.cursor_at(position).map(Cursor::new)
    }

    /// Gets an iterator that visits the elements in the `RBTreeSet` in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([3, 1, 2]);
    /// let mut set_iter = set.iter();
    /// assert_eq!(set_iter.next(), Some(&1));
    /// assert_eq!(set_iter.next(), Some(&2));
    /// assert_eq!(set_iter.next(), Some(&3));
    /// assert_eq!(set_iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter { inner: self.map.keys() }
    }
}

impl<T, C: Compare<T>> RBTreeSet<T, C> {
    /// Adds a value to the set unless an equal value is present.
    ///
    /// Returns the position of the element equal to `value` and whether `value` was inserted.
    /// A rejected `value` is dropped.
    ///
    /// # Panics
    ///
    /// Panics if the set already holds [`max_size`](Self::max_size) elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    ///
    /// assert_eq!(set.insert(2).1, true);
    /// assert_eq!(set.insert(2).1, false);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> (Position, bool) {
        self.map.insert(value, ())
    }

    /// Like [`insert`](Self::insert), but reports a full set instead of panicking.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] if `value` is absent and the set is full.
    pub fn try_insert(&mut self, value: T) -> Result<(Position, bool), Error> {
        self.map.try_insert(value, ())
    }

    /// Moves every element of `other` that is absent from `self` into `self`. Elements
    /// already present stay in `other`.
    ///
    /// # Panics
    ///
    /// Panics if `self` fills up while elements are still waiting to move.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let mut a = RBTreeSet::from([1, 2, 3]);
    /// let mut b = RBTreeSet::from([2, 3, 4]);
    /// a.merge(&mut b);
    /// assert!(a.iter().eq([1, 2, 3, 4].iter()));
    /// assert!(b.iter().eq([2, 3].iter()));
    /// ```
    pub fn merge(&mut self, other: &mut Self) {
        self.map.merge(&mut other.map);
    }
}

impl<T, C> RBTreeSet<T, C> {
    /// Returns the position of the element equal to `value`, or [`end`](Self::end).
    pub fn find<Q>(&self, value: &Q) -> Position
    where
        Q: ?Sized,
        C: Compare<Q, T>,
    {
        self.map.find(value)
    }

    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        Q: ?Sized,
        C: Compare<Q, T>,
    {
        self.map.contains_key(value)
    }

    /// Returns a reference to the element in the set, if any, that is equal to the value.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        Q: ?Sized,
        C: Compare<Q, T>,
    {
        self.map.get_key_value(value).map(|(k, ())| k)
    }

    /// If the set contains an element equal to the value, removes it from the
    /// set and drops it. Returns whether such an element was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    ///
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        Q: ?Sized,
        C: Compare<Q, T>,
    {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        Q: ?Sized,
        C: Compare<Q, T>,
    {
        self.map.remove_entry(value).map(|(k, ())| k)
    }
}

impl<T: Hash, C> Hash for RBTreeSet<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<T: PartialEq, C> PartialEq for RBTreeSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.map.eq(&other.map)
    }
}

impl<T: Eq, C> Eq for RBTreeSet<T, C> {}

impl<T: PartialOrd, C> PartialOrd for RBTreeSet<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.map.partial_cmp(&other.map)
    }
}

impl<T: Ord, C> Ord for RBTreeSet<T, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.map.cmp(&other.map)
    }
}

impl<T: Clone, C: Clone> Clone for RBTreeSet<T, C> {
    fn clone(&self) -> Self {
        RBTreeSet { map: self.map.clone() }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RBTreeSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C: Default> Default for RBTreeSet<T, C> {
    fn default() -> Self {
        RBTreeSet { map: RBTreeMap::default() }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for RBTreeSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RBTreeSet::default();
        set.extend(iter);
        set
    }
}

impl<T, C: Compare<T>> Extend<T> for RBTreeSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.insert(elem);
        }
    }
}

impl<'a, T: 'a + Copy, C: Compare<T>> Extend<&'a T> for RBTreeSet<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RBTreeSet<T> {
    /// Converts a `[T; N]` into a `RBTreeSet<T>`. Duplicates after the first are dropped.
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T, C> IntoIterator for RBTreeSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `RBTreeSet`'s contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_keys(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RBTreeSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Iter<'a, T, C> {
        self.iter()
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, C> DoubleEndedIterator for Iter<'_, T, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T, C> ExactSizeIterator for Iter<'_, T, C> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T, C> FusedIterator for Iter<'_, T, C> {}

impl<T, C> Clone for Iter<'_, T, C> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Iter<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.inner).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}
