use core::sync::atomic::{AtomicUsize, Ordering};

static NEXT_STAMP: AtomicUsize = AtomicUsize::new(1);

/// Identity of a tree's sentinel.
///
/// Every tree draws a new stamp when it is created, cloned or cleared, so a
/// position carrying an older stamp can be told apart from one of the current tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Stamp(usize);

impl Stamp {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_STAMP.fetch_add(1, Ordering::Relaxed))
    }
}
