use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a node slot in the arena.
///
/// The top raw value is reserved for the sentinel, so every child and parent
/// link is always a valid `Handle` and "no node" is a comparison, not an `Option`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// The largest slot index a live node may occupy.
    pub(crate) const MAX: usize = (RawHandle::MAX - 2) as usize;

    /// The shared nil node: every absent child, the root's parent, and the end position.
    pub(crate) const SENTINEL: Self = Self(NonZero::new(RawHandle::MAX).unwrap());

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // `index + 1` is non-zero and stays below the sentinel value.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        debug_assert!(!self.is_sentinel(), "`Handle::to_index()` - the sentinel has no slot!");
        (self.0.get() - 1) as usize
    }

    #[inline]
    pub(crate) const fn is_sentinel(self) -> bool {
        self.0.get() == RawHandle::MAX
    }
}
