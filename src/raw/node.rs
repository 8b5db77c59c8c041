use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

// A tree node: the payload plus its links. Children own, the parent link does not.
// Absent relations point at `Handle::SENTINEL`.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Handle,
    pub(crate) left: Handle,
    pub(crate) right: Handle,
    pub(crate) color: Color,
}

impl<K, V> Node<K, V> {
    /// Creates a fresh red leaf hanging off `parent`.
    pub(crate) fn new(key: K, value: V, parent: Handle) -> Self {
        Self {
            key,
            value,
            parent,
            left: Handle::SENTINEL,
            right: Handle::SENTINEL,
            color: Color::Red,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_sentinel() && self.right.is_sentinel()
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}
