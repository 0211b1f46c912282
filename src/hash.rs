//! Hashing: trie navigation hashes and the additive map content hash.
//!
//! The content hash is `φ(S) = Σ f(k, v)` over all entries using wrapping
//! arithmetic, so it is insensitive to operation order. Two mixing seeds
//! prevent degeneration when `hash(v) = 0`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// First mixing seed (golden ratio constant).
const SEED_1: u64 = 0x9E37_79B9_7F4A_7C15;

/// Second mixing seed (large prime).
const SEED_2: u64 = 0x517C_C1B7_2722_0A95;

/// Computes the 64-bit hash of a value using the standard hasher.
///
/// `DefaultHasher::new()` uses fixed keys, so the result is stable within a
/// process — trie layout and iteration order are deterministic per run.
#[must_use]
pub(crate) fn hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Folds a 64-bit hash into the 32 bits steering CHAMP trie descent.
///
/// The high bits are mixed in rather than discarded.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn fold32(h: u64) -> u32 {
    (h ^ (h >> 32)) as u32
}

/// The 32-bit trie hash of a value.
#[must_use]
pub(crate) fn trie_hash<T: Hash>(value: &T) -> u32 {
    fold32(hash_one(value))
}

/// Content-hash contribution of a single map entry.
///
/// `f(k, v) = key_hash · SEED₁ ⊕ value_hash · SEED₂`
#[must_use]
pub(crate) const fn entry_adhash(key_hash: u64, value_hash: u64) -> u64 {
    key_hash.wrapping_mul(SEED_1) ^ value_hash.wrapping_mul(SEED_2)
}
