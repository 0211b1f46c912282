//! Persistent collections: an RRB-Tree sequence and a CHAMP hash map.
//!
//! Both containers have value semantics: every structural operation returns
//! a new collection and leaves the receiver untouched, while the two share
//! all unmodified subtrees.
//!
//! # Key properties
//!
//! - **Structural sharing**: operations path-copy O(log N) nodes
//! - **Canonical CHAMP form**: same entries = same trie structure,
//!   O(1) equality fast path via an additive content hash
//! - **Relaxed radix balancing**: O(log N) insert-at, remove-at, concat
//!   and slice on the sequence
//! - **Transient bulk builders**: `from_iter`-style construction mutates
//!   owned nodes in place, then freezes the result
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # References
//!
//! - Steindorfer & Vinju, 2015 — "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015
//! - Bagwell & Rompf, 2011 — "RRB-Trees: Efficient Immutable Vectors"
//! - Bagwell, 2001 — "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod hash;
mod list;
mod map;
mod transient;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use list::{Iter as ListIter, RrbList};
pub use map::{ChampMap, Entries, Keys, Values};
