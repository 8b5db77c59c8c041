//! Ordered collections backed by a left-leaning red-black tree.
//!
//! This crate provides [`RBTreeMap`] and [`RBTreeSet`]. Both keep their elements sorted by a
//! pluggable comparator from the [`compare`] crate (re-exported here) and offer O(log n)
//! insertion, lookup and removal.
//!
//! Besides borrowing iterators, both collections hand out [`Position`]s: copyable tokens that
//! name an element (or the end of the collection) without holding a borrow. A position can be
//! stepped forward or backward, dereferenced and erased through the collection it came from,
//! which checks that it is still valid and reports [`Error::InvalidIterator`] otherwise.
//!
//! # Example
//!
//! ```
//! use llrb_tree::{Error, RBTreeMap};
//!
//! let mut scores = RBTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.at(&"Dave"), Err(Error::MissingKey));
//!
//! // Keys are unique; a second insert keeps the stored value.
//! let (pos, inserted) = scores.insert("Bob", 0);
//! assert!(!inserted);
//! assert_eq!(scores.get_at(pos), Ok((&"Bob", &85)));
//!
//! // Step from Bob to the following entry, then erase it.
//! let carol = scores.next(pos)?;
//! let after = scores.erase(carol)?;
//! assert!(after.is_end());
//! assert_eq!(scores.keys().copied().collect::<Vec<_>>(), ["Alice", "Bob"]);
//!
//! // The erase invalidated every older position.
//! assert_eq!(scores.get_at(pos), Err(Error::InvalidIterator));
//! # Ok::<(), Error>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Custom orderings** - Any [`Compare`](compare::Compare) implementation, closures included
//! - **Borrowed lookups** - Keys are found with any type the comparator can compare them to
//! - **Checked positions** - Stale or foreign positions are rejected, never dereferenced
//!
//! # Implementation
//!
//! Nodes live in a single arena and refer to each other by index. A reserved index stands for
//! the shared black sentinel that terminates every path and marks the end position. Red links
//! always lean left, so every 3-node has one shape and both insertion and deletion repair the
//! tree with a short, iterative walk toward the root.
//!
//! Tree identities are drawn from an `AtomicUsize`, so the crate needs a target with
//! pointer-sized atomics.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod error;
mod position;
mod raw;

pub mod rbtree_map;
pub mod rbtree_set;

pub use compare;
pub use error::Error;
pub use position::Position;
pub use rbtree_map::RBTreeMap;
pub use rbtree_set::RBTreeSet;
