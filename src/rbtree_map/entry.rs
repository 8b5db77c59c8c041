use core::fmt;
use core::mem;

use crate::raw::{Handle, RawTree};
use compare::{Compare, Natural};

use crate::Position;

/// The slot for one key in an `RBTreeMap`, either holding a value or waiting for one.
///
/// Obtained from [`RBTreeMap::entry`](crate::RBTreeMap::entry). The key is searched for once;
/// everything done through the entry afterwards reuses that search.
///
/// # Examples
///
/// Counting words:
///
/// ```
/// use llrb_tree::RBTreeMap;
/// use llrb_tree::rbtree_map::Entry;
///
/// let mut counts: RBTreeMap<&str, u32> = RBTreeMap::new();
/// for word in "red black red".split(' ') {
///     match counts.entry(word) {
///         Entry::Vacant(slot) => {
///             slot.insert(1);
///         }
///         Entry::Occupied(mut slot) => *slot.get_mut() += 1,
///     }
/// }
/// assert_eq!(counts[&"red"], 2);
/// assert_eq!(counts[&"black"], 1);
/// ```
pub enum Entry<'a, K: 'a, V: 'a, C = Natural<K>> {
    /// No entry with this key exists yet.
    Vacant(VacantEntry<'a, K, V, C>),

    /// The map already holds this key.
    Occupied(OccupiedEntry<'a, K, V, C>),
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Entry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(slot) => f.debug_tuple("Entry").field(slot).finish(),
            Entry::Occupied(slot) => f.debug_tuple("Entry").field(slot).finish(),
        }
    }
}

/// An [`Entry`] for a key the map does not contain.
pub struct VacantEntry<'a, K, V, C = Natural<K>> {
    pub(crate) key: K,
    pub(crate) tree: &'a mut RawTree<K, V, C>,
}

impl<K: fmt::Debug, V, C> fmt::Debug for VacantEntry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VacantEntry").field("key", &self.key).finish()
    }
}

/// An [`Entry`] for a key the map already contains.
///
/// Holds the node the search ended at, so reads, updates and removal go straight to it.
pub struct OccupiedEntry<'a, K, V, C = Natural<K>> {
    pub(crate) node: Handle,
    pub(crate) tree: &'a mut RawTree<K, V, C>,
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OccupiedEntry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry")
            .field("key", self.key())
            .field("value", self.get())
            .finish()
    }
}

impl<'a, K, V, C: Compare<K>> Entry<'a, K, V, C> {
    /// Returns the stored value, first inserting `default` if the key was absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut stock = RBTreeMap::from([("bolts", 40)]);
    /// *stock.entry("nuts").or_insert(0) += 25;
    /// *stock.entry("bolts").or_insert(0) += 5;
    /// assert_eq!(stock[&"nuts"], 25);
    /// assert_eq!(stock[&"bolts"], 45);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) when inserting, O(1) otherwise.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => slot.insert(default),
        }
    }

    /// Like [`or_insert`](Entry::or_insert), but only builds the value when it is needed.
    pub fn or_insert_with<F: FnOnce() -> V>(self, make: F) -> &'a mut V {
        match self {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => slot.insert(make()),
        }
    }

    /// Like [`or_insert_with`](Entry::or_insert_with), with the key handed to `make`.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut lengths: RBTreeMap<&str, usize> = RBTreeMap::new();
    /// lengths.entry("sentinel").or_insert_with_key(|word| word.len());
    /// assert_eq!(lengths[&"sentinel"], 8);
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, make: F) -> &'a mut V {
        match self {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                let value = make(&slot.key);
                slot.insert(value)
            }
        }
    }

    /// The key this entry was created for, or the equivalent stored key if occupied.
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(slot) => slot.key(),
            Entry::Vacant(slot) => slot.key(),
        }
    }

    /// Runs `f` on the stored value if there is one, then hands the entry back.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut hits: RBTreeMap<u16, u32> = RBTreeMap::new();
    /// for port in [80, 443, 80] {
    ///     hits.entry(port).and_modify(|n| *n += 1).or_insert(1);
    /// }
    /// assert_eq!(hits[&80], 2);
    /// assert_eq!(hits[&443], 1);
    /// ```
    #[allow(clippy::return_self_not_must_use)]
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(slot) = &mut self {
            f(slot.get_mut());
        }
        self
    }

    /// Stores `value` under the key, overwriting any previous value.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, C> {
        match self {
            Entry::Occupied(mut slot) => {
                slot.insert(value);
                slot
            }
            Entry::Vacant(slot) => slot.insert_entry(value),
        }
    }
}

impl<'a, K, V: Default, C: Compare<K>> Entry<'a, K, V, C> {
    /// Returns the stored value, first inserting `V::default()` if the key was absent.
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    ///
    /// let mut groups: RBTreeMap<char, Vec<&str>> = RBTreeMap::new();
    /// for name in ["ada", "bob", "amy"] {
    ///     groups.entry(name.chars().next().unwrap()).or_default().push(name);
    /// }
    /// assert_eq!(groups[&'a'], ["ada", "amy"]);
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn or_default(self) -> &'a mut V {
        match self {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => slot.insert(V::default()),
        }
    }
}

impl<'a, K, V, C: Compare<K>> VacantEntry<'a, K, V, C> {
    /// The key that [`insert`](VacantEntry::insert) would store.
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Gives the key back without touching the map.
    #[allow(clippy::must_use_candidate)]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Stores `value` under this entry's key and returns a reference to it.
    ///
    /// # Panics
    ///
    /// Panics if the map is already at its maximum size.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    /// use llrb_tree::rbtree_map::Entry;
    ///
    /// let mut map: RBTreeMap<i32, &str> = RBTreeMap::new();
    /// if let Entry::Vacant(slot) = map.entry(7) {
    ///     *slot.insert("seven") = "SEVEN";
    /// }
    /// assert_eq!(map.get(&7), Some(&"SEVEN"));
    /// ```
    pub fn insert(self, value: V) -> &'a mut V {
        let (node, _) = self.tree.insert(self.key, value);
        self.tree.value_mut(node)
    }

    /// Stores `value` under this entry's key and returns the now occupied entry.
    ///
    /// # Panics
    ///
    /// Panics if the map is already at its maximum size.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, C> {
        let (node, _) = self.tree.insert(self.key, value);
        OccupiedEntry { node, tree: self.tree }
    }
}

impl<'a, K, V, C> OccupiedEntry<'a, K, V, C> {
    /// The stored key, which may differ from the key passed to `entry` under a custom comparator.
    #[must_use]
    pub fn key(&self) -> &K {
        self.tree.key(self.node)
    }

    /// Returns the position of this entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    /// use llrb_tree::rbtree_map::Entry;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// let pos = match map.entry(2) {
    ///     Entry::Occupied(o) => o.position(),
    ///     Entry::Vacant(_) => unreachable!(),
    /// };
    /// assert_eq!(pos, map.find(&2));
    /// ```
    #[must_use]
    pub fn position(&self) -> Position {
        self.tree.position(self.node)
    }

    /// Removes the entry from the map, returning the stored key and value.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    /// use llrb_tree::rbtree_map::Entry;
    ///
    /// let mut map = RBTreeMap::from([(String::from("tmp"), 3)]);
    /// if let Entry::Occupied(slot) = map.entry(String::from("tmp")) {
    ///     assert_eq!(slot.remove_entry(), (String::from("tmp"), 3));
    /// }
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[allow(clippy::must_use_candidate)]
    pub fn remove_entry(self) -> (K, V) {
        self.tree.remove_node(self.node).0
    }

    #[must_use]
    pub fn get(&self) -> &V {
        self.tree.entry(self.node).1
    }

    /// Borrows the stored value mutably for as long as the entry lives.
    ///
    /// Use [`into_mut`](OccupiedEntry::into_mut) for a reference tied to the map instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    /// use llrb_tree::rbtree_map::Entry;
    ///
    /// let mut balances = RBTreeMap::from([("acct-1", 100)]);
    /// if let Entry::Occupied(mut slot) = balances.entry("acct-1") {
    ///     *slot.get_mut() -= 30;
    ///     *slot.get_mut() -= 20;
    ///     assert_eq!(*slot.get(), 50);
    /// }
    /// assert_eq!(balances[&"acct-1"], 50);
    /// ```
    pub fn get_mut(&mut self) -> &mut V {
        self.tree.value_mut(self.node)
    }

    /// Consumes the entry, returning a reference to the value that borrows the map.
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_mut(self) -> &'a mut V {
        self.tree.value_mut(self.node)
    }

    /// Replaces the stored value, returning the old one. The stored key is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::RBTreeMap;
    /// use llrb_tree::rbtree_map::Entry;
    ///
    /// let mut map = RBTreeMap::from([('x', 1.5)]);
    /// if let Entry::Occupied(mut slot) = map.entry('x') {
    ///     assert_eq!(slot.insert(2.5), 1.5);
    /// }
    /// assert_eq!(map[&'x'], 2.5);
    /// ```
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the map, returning only the value.
    #[allow(clippy::must_use_candidate)]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}
