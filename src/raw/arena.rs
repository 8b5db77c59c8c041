use alloc::vec::Vec;

use super::handle::Handle;
use crate::Error;

#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    /// Maximum number of live elements; one past the largest slot index.
    pub(crate) const MAX_LEN: usize = Handle::MAX + 1;

    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    /// Returns true if no further element can be allocated.
    pub(crate) fn is_full(&self) -> bool {
        self.free.is_empty() && self.slots.len() >= Self::MAX_LEN
    }

    /// Stores `element`, preferring the most recently vacated slot.
    pub(crate) fn try_alloc(&mut self, element: T) -> Result<Handle, Error> {
        match self.free.pop() {
            Some(recycled) => {
                self.slots[recycled.to_index()] = Some(element);
                Ok(recycled)
            }
            None if self.slots.len() < Self::MAX_LEN => {
                let fresh = Handle::from_index(self.slots.len());
                self.slots.push(Some(element));
                Ok(fresh)
            }
            None => Err(Error::CapacityExceeded),
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - vacant slot")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - vacant slot")
    }

    /// Returns mutable references to two distinct elements.
    pub(crate) fn get_pair_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        let (i, j) = (a.to_index(), b.to_index());
        assert_ne!(i, j, "`Arena::get_pair_mut()` - handles alias!");
        let (low, high) = (i.min(j), i.max(j));
        let (head, tail) = self.slots.split_at_mut(high);
        let low_ref = head[low].as_mut().expect("`Arena::get_pair_mut()` - vacant slot");
        let high_ref = tail[0].as_mut().expect("`Arena::get_pair_mut()` - vacant slot");
        if i < j { (low_ref, high_ref) } else { (high_ref, low_ref) }
    }

    /// Empties the slot and queues it for reuse.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let slot = &mut self.slots[handle.to_index()];
        let element = slot.take().expect("`Arena::take()` - vacant slot");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
