use core::fmt;

/// Errors reported by the fallible operations of [`RBTreeMap`](crate::RBTreeMap) and
/// [`RBTreeSet`](crate::RBTreeSet).
///
/// Lookups never fail: an absent key is reported through [`end()`](crate::RBTreeMap::end)
/// or `None`. Only the accessors that promise a value ([`at`](crate::RBTreeMap::at)) report
/// [`Error::MissingKey`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// A bounds-checked access named a key that is not in the map.
    MissingKey,
    /// A position that does not belong to the collection, was invalidated by a removal, or
    /// refers to the end of the collection where an element was required.
    InvalidIterator,
    /// The collection cannot hold any more elements.
    CapacityExceeded,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingKey => f.write_str("no element with the requested key"),
            Error::InvalidIterator => f.write_str("position is not valid for this collection"),
            Error::CapacityExceeded => f.write_str("collection is at maximum capacity"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_messages() {
        assert_eq!(Error::MissingKey.to_string(), "no element with the requested key");
        assert_eq!(Error::InvalidIterator.to_string(), "position is not valid for this collection");
        assert_eq!(Error::CapacityExceeded.to_string(), "collection is at maximum capacity");
    }
}
