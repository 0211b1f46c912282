//! CHAMP trie operations, one module per structural primitive.

use std::hash::Hash;

use crate::hash::{entry_adhash, hash_one};
use crate::map::node::Entry;

pub(crate) mod get;
pub(crate) mod insert;
pub(crate) mod remove;
pub(crate) mod update;

/// Content-hash contribution of one entry, recomputed from the live key and
/// value (only the 32-bit trie hash is stored).
pub(crate) fn entry_contrib<K: Hash, V: Hash>(entry: &Entry<K, V>) -> u64 {
    entry_adhash(hash_one(&entry.key), hash_one(&entry.value))
}
