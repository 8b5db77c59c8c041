use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use compare::{Compare, Natural, natural};

use crate::raw::{Handle, RawTree};
use crate::{Error, Position};

mod capacity;
mod cursor;
mod entry;

pub use cursor::Cursor;
pub use entry::{Entry, OccupiedEntry, VacantEntry};

/// An ordered map based on a left-leaning [red-black tree].
///
/// Entries are kept in ascending key order as defined by the map's [`Compare`] comparator
/// ([`Natural`] unless another is given to [`with_comparator`](RBTreeMap::with_comparator)).
/// Lookups accept any key type `Q` the comparator can compare with `K`, that is whenever
/// `C: Compare<Q, K>`. With [`Natural`] that is `K` itself; a comparator built with
/// [`Compare::borrowing`] also accepts borrowed forms such as `str` for `String` keys.
/// Keys are unique: inserting a key that is already present keeps the stored entry.
///
/// Besides the usual lookup-by-key methods, the map hands out [`Position`]s. A position
/// names one entry (or the end of the map) without borrowing the map, so it can be kept
/// across insertions and used later to read, step or erase. See [`Position`] for the rules
/// on when a position stops being valid.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative
/// to any other key changes while it is in the map. The behavior resulting from such a logic
/// error is not specified, but will be encapsulated to the `RBTreeMap` that observed it and
/// not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use llrb_tree::RBTreeMap;
///
/// let mut routes = RBTreeMap::new();
///
/// routes.insert("/api/users", "users::list");
/// routes.insert("/api/orders", "orders::list");
/// routes.insert("/health", "health::check");
/// routes.insert("/api/legacy", "legacy::proxy");
///
/// assert!(!routes.contains_key(&"/metrics"));
///
/// // The legacy endpoint is retired.
/// assert_eq!(routes.remove(&"/api/legacy"), Some("legacy::proxy"));
///
/// assert_eq!(routes.get(&"/health"), Some(&"health::check"));
/// assert_eq!(routes[&"/api/users"], "users::list");
///
/// // Iteration follows key order, not insertion order.
/// let paths: Vec<_> = routes.keys().copied().collect();
/// assert_eq!(paths, ["/api/orders", "/api/users", "/health"]);
/// ```
///
/// An `RBTreeMap` with a known list of items can be initialized from an array:
///
/// ```
/// use llrb_tree::RBTreeMap;
///
/// let solar_distance = RBTreeMap::from([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// assert_eq!(solar_distance.first_key_value(), Some((&"Earth", &1.0)));
/// ```
///
/// Walking the map with positions:
///
/// ```
/// use llrb_tree::RBTreeMap;
///
/// let mut map = RBTreeMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
/// let mut pos = map.begin();
/// while !pos.is_end() {
///     let (key, value) = map.get_at_mut(pos)?;
///     if *key != 1 {
///         *value = value.to_ascii_uppercase();
///     }
///     pos = map.next(pos)?;
/// }
/// assert_eq!(map.values().collect::<String>(), "aBC");
/// # Ok::<(), llrb_tree::Error>(())
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Left-leaning_red%E2%80%93black_tree
pub struct RBTreeMap<K, V, C = Natural<K>> {
    raw: RawTree<K, V, C>,
}

/// An iterator over the entries of an `RBTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use llrb_tree::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RBTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V, C = Natural<K>> {
    tree: &'a RawTree<K, V, C>,
    front: Handle,
    back: Handle,
    remaining: usize,
}

/// An owning iterator over the entries of an `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of an `RBTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`RBTreeMap`].
///
/// [`keys`]: RBTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V, C = Natural<K>> {
    inner: Iter<'a, K, V, C>,
}

/// An iterator over the values of an `RBTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`RBTreeMap`].
///
/// [`values`]: RBTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V, C = Natural<K>> {
    inner: Iter<'a, K, V, C>,
}

/// An owning iterator over the keys of an `RBTreeMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`RBTreeMap`].
///
/// [`into_keys`]: RBTreeMap::into_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Makes a new, empty `RBTreeMap` ordered by [`Natural`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(natural())
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Makes a new, empty `RBTreeMap` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    /// use llrb_tree::compare::{Compare, natural};
    ///
    /// let mut map = RBTreeMap::with_comparator(natural::<i32>().rev());
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// assert_eq!(map.first_key_value(), Some((&2, &"b")));
    /// ```
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        RBTreeMap {
            raw: RawTree::new(comparator),
        }
    }

    /// Returns a reference to the comparator ordering this map.
    #[must_use]
    pub fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert!(a.is_empty());
    /// a.insert(1, "a");
    /// assert!(!a.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the largest number of elements any map of this type can hold.
    ///
    /// Inserting past this limit panics; [`try_insert`](Self::try_insert) reports
    /// [`Error::CapacityExceeded`] instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let map: RBTreeMap<u8, u8> = RBTreeMap::new();
    /// assert!(map.max_size() >= 1 << 16);
    /// ```
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn max_size(&self) -> usize {
        RawTree::<K, V, C>::max_size()
    }

    /// Clears the map, removing all elements.
    ///
    /// Every position previously obtained from the map, including [`end`](Self::end), is
    /// invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::{Error, RBTreeMap};
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(1, "a");
    /// let old_end = a.end();
    /// a.clear();
    /// assert!(a.is_empty());
    /// assert_eq!(a.next(old_end), Err(Error::InvalidIterator));
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let first = self.raw.first();
        (!first.is_sentinel()).then(|| self.raw.entry(first))
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let last = self.raw.last();
        (!last.is_sentinel()).then(|| self.raw.entry(last))
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Removes and returns the last element in the map.
    /// The key of this element is the maximum key that was in the map.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all pairs `(k, v)` for which `f(&k, &mut v)` returns `false`.
    /// The elements are visited in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// // Keep only the elements with even-numbered keys.
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert!(map.into_iter().eq(vec![(0, 0), (2, 20), (4, 40), (6, 60)]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n + m log n), where m is the number of removed elements.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.raw.retain(f);
    }

    /// Exchanges the contents of two maps, comparators included.
    ///
    /// Positions keep referring to the same entries, which now live in the other map.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::from([(1, "a")]);
    /// let mut b = RBTreeMap::from([(2, "b"), (3, "c")]);
    /// let pos = b.find(&3);
    ///
    /// a.swap(&mut b);
    /// assert_eq!(a.len(), 2);
    /// assert_eq!(b.len(), 1);
    /// assert_eq!(a.get_at(pos), Ok((&3, &"c")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn swap(&mut self, other: &mut Self) {
        log::trace!("swapping maps of {} and {} entries", self.len(), other.len());
        core::mem::swap(&mut self.raw, &mut other.raw);
    }

    /// Returns the position of the first entry, or [`end`](Self::end) if the map is empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        self.raw.position(self.raw.first())
    }

    /// Returns the position one past the last entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::new();
    /// assert_eq!(map.begin(), map.end());
    /// assert!(map.end().is_end());
    /// ```
    #[must_use]
    pub fn end(&self) -> Position {
        self.raw.end()
    }

    /// Returns the position of the entry following `position` in key order.
    ///
    /// The last entry is followed by [`end`](Self::end), and `end` is followed by itself.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if `position` does not belong to this map or was
    /// invalidated by a removal.
    ///
    /// # Complexity
    ///
    /// O(log n) worst case, amortized O(1) over a full walk.
    pub fn next(&self, position: Position) -> Result<Position, Error> {
        self.raw.next_position(position)
    }

    /// Returns the position of the entry preceding `position` in key order.
    ///
    /// Stepping back from [`end`](Self::end) yields the last entry; stepping back from the
    /// first entry yields `end`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if `position` does not belong to this map or was
    /// invalidated by a removal.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// let last = map.prev(map.end())?;
    /// assert_eq!(map.get_at(last), Ok((&2, &"b")));
    /// # Ok::<(), llrb_tree::Error>(())
    /// ```
    pub fn prev(&self, position: Position) -> Result<Position, Error> {
        self.raw.prev_position(position)
    }

    /// Returns the entry at `position`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if `position` is the end position, does not belong to this
    /// map, or was invalidated by a removal.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::{Error, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::new();
    /// let (pos, _) = map.insert(7, "seven");
    /// assert_eq!(map.get_at(pos), Ok((&7, &"seven")));
    /// assert_eq!(map.get_at(map.end()), Err(Error::InvalidIterator));
    /// ```
    pub fn get_at(&self, position: Position) -> Result<(&K, &V), Error> {
        let node = self.raw.resolve_entry(position)?;
        Ok(self.raw.entry(node))
    }

    /// Returns the entry at `position` with a mutable reference to its value.
    ///
    /// # Errors
    ///
    /// As [`get_at`](Self::get_at).
    pub fn get_at_mut(&mut self, position: Position) -> Result<(&K, &mut V), Error> {
        let node = self.raw.resolve_entry(position)?;
        Ok(self.raw.entry_mut(node))
    }

    /// Removes the entry at `position` and returns the position of the entry that followed it.
    ///
    /// Erasing [`end`](Self::end) does nothing and returns `end`. After a successful erase every
    /// other position obtained from this map is invalid; only the returned one may be used.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if `position` does not belong to this map or was
    /// invalidated by an earlier removal. The map is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let next = map.erase(map.find(&2))?;
    /// assert_eq!(map.get_at(next), Ok((&3, &"c")));
    /// assert_eq!(map.find(&2), map.end());
    /// # Ok::<(), llrb_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn erase(&mut self, position: Position) -> Result<Position, Error> {
        self.raw.erase(position)
    }

    /// Returns a cursor at the first entry, or at the end if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// let mut cursor = map.cursor_front();
    /// assert_eq!(cursor.key(), Some(&1));
    /// cursor.move_next();
    /// cursor.move_next();
    /// assert!(cursor.is_end());
    /// ```
    pub fn cursor_front(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.raw, self.raw.first())
    }

    /// Returns a cursor at the last entry, or at the end if the map is empty.
    pub fn cursor_back(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.raw, self.raw.last())
    }

    /// Returns a cursor at `position`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if `position` does not belong to this map or was
    /// invalidated by a removal. The end position is accepted.
    pub fn cursor_at(&self, position: Position) -> Result<Cursor<'_, K, V, C>, Error> {
        let node = self.raw.resolve(position)?;
        Ok(Cursor::new(&self.raw, node))
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(3, "c"), (1, "a"), (2, "b")]);
    ///
    /// let mut walked = Vec::new();
    /// for (key, value) in map.iter() {
    ///     walked.push(format!("{key}={value}"));
    /// }
    /// assert_eq!(walked, ["1=a", "2=b", "3=c"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            tree: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<&str> = map.values().copied().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V, C> {
        Values { inner: self.iter() }
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    pub fn into_keys(mut self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: IntoIter {
                inner: self.raw.drain_to_vec().into_iter(),
            },
        }
    }
}

impl<K, V, C: Compare<K>> RBTreeMap<K, V, C> {
    /// Inserts a key-value pair unless the key is already present.
    ///
    /// Returns the position of the entry holding `key` and whether the pair was inserted.
    /// When the key is already present the map is not modified and `key` and `value` are
    /// dropped; use [`insert_or_assign`](Self::insert_or_assign) to overwrite.
    ///
    /// Inserting never invalidates positions.
    ///
    /// # Panics
    ///
    /// Panics if the map already holds [`max_size`](Self::max_size) entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// let (first, inserted) = map.insert(37, "a");
    /// assert!(inserted);
    ///
    /// let (again, inserted) = map.insert(37, "b");
    /// assert!(!inserted);
    /// assert_eq!(again, first);
    /// assert_eq!(map[&37], "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        let (node, inserted) = self.raw.insert(key, value);
        (self.raw.position(node), inserted)
    }

    /// Like [`insert`](Self::insert), but reports a full map instead of panicking.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] if `key` is absent and the map already holds
    /// [`max_size`](Self::max_size) entries.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Position, bool), Error> {
        let (node, inserted) = self.raw.try_insert(key, value)?;
        Ok((self.raw.position(node), inserted))
    }

    /// Inserts a key-value pair, overwriting the value if the key is already present.
    ///
    /// Returns the position of the entry and whether a new entry was created. An existing
    /// entry keeps its original key.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert!(map.insert_or_assign("k", 1).1);
    /// assert!(!map.insert_or_assign("k", 2).1);
    /// assert_eq!(map[&"k"], 2);
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Position, bool) {
        let node = self.raw.search(&key);
        if node.is_sentinel() {
            self.insert(key, value)
        } else {
            *self.raw.value_mut(node) = value;
            (self.raw.position(node), false)
        }
    }

    /// Returns a mutable reference to the value for `key`, inserting `V::default()` first if
    /// the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut counts: RBTreeMap<char, usize> = RBTreeMap::new();
    /// for c in "hello".chars() {
    ///     *counts.get_or_insert_default(c) += 1;
    /// }
    /// assert_eq!(counts[&'l'], 2);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Gets the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut by_status: RBTreeMap<u16, usize> = RBTreeMap::new();
    /// for status in [200, 404, 200, 500, 200, 404] {
    ///     by_status.entry(status).and_modify(|n| *n += 1).or_insert(1);
    /// }
    ///
    /// assert_eq!(by_status[&200], 3);
    /// assert_eq!(by_status[&404], 2);
    /// assert_eq!(by_status[&500], 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C> {
        let node = self.raw.search(&key);
        if node.is_sentinel() {
            Entry::Vacant(VacantEntry { key, tree: &mut self.raw })
        } else {
            Entry::Occupied(OccupiedEntry { node, tree: &mut self.raw })
        }
    }

    /// Moves every entry of `other` whose key is absent from `self` into `self`.
    ///
    /// Entries whose keys are already present stay in `other`. Both maps are valid throughout;
    /// all positions of `other` are invalidated if anything moved.
    ///
    /// # Panics
    ///
    /// Panics if `self` fills up to [`max_size`](Self::max_size) while entries are still
    /// waiting to move. The entries moved so far stay moved.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let mut b = RBTreeMap::from([(2, "x"), (3, "y"), (4, "z")]);
    ///
    /// a.merge(&mut b);
    ///
    /// assert_eq!(a.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
    /// assert_eq!(a[&2], "b");
    /// assert_eq!(b.keys().copied().collect::<Vec<_>>(), [2, 3]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(m log(n + m)), where m is the size of `other` and n is the size of `self`.
    pub fn merge(&mut self, other: &mut Self) {
        self.raw.merge(&mut other.raw);
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Returns the position of the entry for `key`, or [`end`](Self::end) if there is none.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering on the
    /// borrowed form *must* match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "a")]);
    /// assert_eq!(map.get_at(map.find(&1)), Ok((&1, &"a")));
    /// assert!(map.find(&2).is_end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        self.raw.position(self.raw.search(key))
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.contains_key(&1), true);
    /// assert_eq!(map.contains_key(&2), false);
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        !self.raw.search(key).is_sentinel()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// The returned key is the one stored in the map, which may differ from `key` in ways
    /// the comparator ignores.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        let node = self.raw.search(key);
        (!node.is_sentinel()).then(|| self.raw.entry(node))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        let node = self.raw.search(key);
        if node.is_sentinel() {
            None
        } else {
            Some(self.raw.value_mut(node))
        }
    }

    /// Returns a reference to the value for `key`, reporting a missing key as an error.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if the map holds no entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::{Error, RBTreeMap};
    ///
    /// let map = RBTreeMap::from([("one", 1)]);
    /// assert_eq!(map.at(&"one"), Ok(&1));
    /// assert_eq!(map.at(&"two"), Err(Error::MissingKey));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        self.get(key).ok_or(Error::MissingKey)
    }

    /// Mutable counterpart of [`at`](Self::at).
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if the map holds no entry for `key`.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        self.get_mut(key).ok_or(Error::MissingKey)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the key
    /// was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: ?Sized,
        C: Compare<Q, K>,
    {
        self.raw.remove(key)
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RBTreeMap<K, V, C> {
    /// Returns a deep copy. Positions of the original are not valid for the copy.
    fn clone(&self) -> Self {
        RBTreeMap { raw: self.raw.clone() }
    }
}

impl<K: Hash, V: Hash, C> Hash for RBTreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RBTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for RBTreeMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for RBTreeMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, C> Ord for RBTreeMap<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RBTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RBTreeMap<K, V, C> {
    fn default() -> Self {
        RBTreeMap::with_comparator(C::default())
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for RBTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RBTreeMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Compare<K>> Extend<(&'a K, &'a V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Iter<'a, K, V, C> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for RBTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V, C> Index<&Q> for RBTreeMap<K, V, C>
where
    Q: ?Sized,
    C: Compare<Q, K>,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBTreeMap<K, V> {
    /// Converts a `[(K, V); N]` into an `RBTreeMap<K, V>`.
    ///
    /// If any entries in the array have equal keys, the first of them is kept.
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.front;
        self.front = self.tree.next(node);
        self.remaining -= 1;
        Some(self.tree.entry(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C> DoubleEndedIterator for Iter<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.back;
        self.back = self.tree.prev(node);
        self.remaining -= 1;
        Some(self.tree.entry(node))
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

impl<K, V, C> fmt::Debug for Iter<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

impl<K, V, C> Clone for Iter<'_, K, V, C> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Keys<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, C> ExactSizeIterator for Keys<'_, K, V, C> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, C> FusedIterator for Keys<'_, K, V, C> {}

impl<K, V, C> Clone for Keys<'_, K, V, C> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V, C> fmt::Debug for Keys<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Values<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, C> ExactSizeIterator for Values<'_, K, V, C> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, C> FusedIterator for Values<'_, K, V, C> {}

impl<K, V, C> Clone for Values<'_, K, V, C> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug, C> fmt::Debug for Values<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for IntoKeys<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(k, _)| k)).finish()
    }
}
