//! Persistent hash map backed by a CHAMP trie.

mod iter;
pub(crate) mod node;
pub(crate) mod ops;

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use std::sync::Arc;

pub use iter::{Entries, Keys, Values};

use crate::hash::{fold32, hash_one};
use crate::transient::Owner;
use node::{BitmapNode, Entry, Node};
use ops::entry_contrib;
use ops::remove::{RemoveOutcome, Shrink};

/// Persistent hash map based on a CHAMP trie.
///
/// The trie is canonical: the same set of key-value pairs always produces
/// the same structure, regardless of the operations that built it. An
/// additive content hash maintained per operation gives an O(1) equality
/// fast path. Every structural method returns a new map sharing untouched
/// subtrees with the receiver.
///
/// Write operations carry `V: Hash` to keep the content hash current.
pub struct ChampMap<K, V> {
    pub(crate) root: Option<Arc<Node<K, V>>>,
    size: usize,
    adhash: u64,
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> ChampMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None, size: 0, adhash: 0 }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the additive content hash.
    ///
    /// Two maps with the same content always have the same value; maps with
    /// different values are guaranteed unequal.
    #[must_use]
    pub const fn adhash(&self) -> u64 {
        self.adhash
    }

    /// Returns an iterator over `(&K, &V)` pairs.
    #[must_use]
    pub fn iter(&self) -> Entries<'_, K, V> {
        Entries::new(self.root.as_deref(), self.size)
    }

    /// Returns an iterator over the keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over the values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }
}

// ---------------------------------------------------------------------------
// Read operations — K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> ChampMap<K, V> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key-value pair for `key`.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let root = self.root.as_deref()?;
        let entry = ops::get::lookup(root, crate::hash::trie_hash(key), key, 0)?;
        Some((&entry.key, &entry.value))
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if some entry holds the given value. Linear scan.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }
}

// ---------------------------------------------------------------------------
// Write operations — K: Hash + Eq + Clone, V: Hash + Clone
// ---------------------------------------------------------------------------

impl<K: Hash + Eq + Clone, V: Hash + Clone> ChampMap<K, V> {
    /// Returns a new map with `key` bound to `value`, replacing any
    /// previous binding.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let owner = Owner::frozen();
        let mut root = self.root.clone();
        let mut size = self.size;
        let mut adhash = self.adhash;
        Self::insert_in(&owner, &mut root, &mut size, &mut adhash, key, value);
        Self { root, size, adhash }
    }

    /// Returns a new map with every pair of `entries` inserted, built in
    /// one transient session.
    #[must_use]
    pub fn extend_with<I: IntoIterator<Item = (K, V)>>(&self, entries: I) -> Self {
        let owner = Owner::new();
        let mut root = self.root.clone();
        let mut size = self.size;
        let mut adhash = self.adhash;
        for (key, value) in entries {
            Self::insert_in(&owner, &mut root, &mut size, &mut adhash, key, value);
        }
        if let Some(r) = &mut root {
            node::freeze(&owner, r);
        }
        Self { root, size, adhash }
    }

    /// Returns a new map without `key`; the map is returned unchanged when
    /// the key is absent.
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        let Some(r) = &self.root else {
            return self.clone();
        };
        let hash = fold32(hash_one(key));
        // Probe first so a miss stays allocation-free.
        if ops::get::lookup(r, hash, key, 0).is_none() {
            return self.clone();
        }
        let owner = Owner::frozen();
        let mut root = r.clone();
        match ops::remove::remove(&owner, &mut root, hash, key, 0) {
            RemoveOutcome::NotFound => self.clone(),
            RemoveOutcome::Removed { value: _, adhash_delta, shrink } => {
                let size = self.size - 1;
                let root = if size == 0 {
                    None
                } else {
                    match shrink {
                        Shrink::Kept => Some(root),
                        Shrink::Single(entry) => Some(Arc::new(Node::Bitmap(
                            BitmapNode::singleton(entry, 0, &owner),
                        ))),
                        Shrink::Emptied => None,
                    }
                };
                Self { root, size, adhash: self.adhash.wrapping_sub(adhash_delta) }
            }
        }
    }

    /// Returns a new map without the entries matching `pred`, rebuilt in
    /// one transient session.
    #[must_use]
    pub fn remove_where(&self, mut pred: impl FnMut(&K, &V) -> bool) -> Self {
        self.iter()
            .filter(|&(k, v)| !pred(k, v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns a new map with `f` applied to the value under `key`; the map
    /// is returned unchanged when the key is absent.
    #[must_use]
    pub fn update(&self, key: &K, f: impl FnOnce(&V) -> V) -> Self {
        match self.get(key) {
            Some(value) => self.insert(key.clone(), f(value)),
            None => self.clone(),
        }
    }

    /// Returns a new map with `f` applied to the value under `key`, or with
    /// `key` bound to `if_absent()` when it is missing.
    #[must_use]
    pub fn update_or_insert(
        &self,
        key: K,
        f: impl FnOnce(&V) -> V,
        if_absent: impl FnOnce() -> V,
    ) -> Self {
        match self.get(&key) {
            Some(value) => {
                let updated = f(value);
                self.insert(key, updated)
            }
            None => self.insert(key, if_absent()),
        }
    }

    /// Returns a new map binding `key` to `f()` only when the key is
    /// currently absent.
    #[must_use]
    pub fn put_if_absent(&self, key: K, f: impl FnOnce() -> V) -> Self {
        if self.contains_key(&key) {
            self.clone()
        } else {
            let value = f();
            self.insert(key, value)
        }
    }

    /// Returns a new map with `f` applied to every value. Keys and trie
    /// structure are unchanged; the rewrite runs as one transient session.
    #[must_use]
    pub fn update_all(&self, mut f: impl FnMut(&K, &V) -> V) -> Self {
        let Some(r) = &self.root else {
            return self.clone();
        };
        let owner = Owner::new();
        let mut root = r.clone();
        let delta = ops::update::update_all(&owner, &mut root, &mut f);
        node::freeze(&owner, &mut root);
        Self {
            root: Some(root),
            size: self.size,
            adhash: self.adhash.wrapping_add(delta),
        }
    }

    /// Rebuilds the map through `f`, which may change keys, values and
    /// types; later duplicates of a key win.
    #[must_use]
    pub fn map_entries<K2, V2>(
        &self,
        mut f: impl FnMut(&K, &V) -> (K2, V2),
    ) -> ChampMap<K2, V2>
    where
        K2: Hash + Eq + Clone,
        V2: Hash + Clone,
    {
        self.iter().map(|(k, v)| f(k, v)).collect()
    }

    /// Collects the entries into a std `HashMap`.
    #[must_use]
    pub fn to_hash_map(&self) -> HashMap<K, V> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Inserts one pair below `root`, updating size and content hash.
    fn insert_in(
        owner: &Owner,
        root: &mut Option<Arc<Node<K, V>>>,
        size: &mut usize,
        adhash: &mut u64,
        key: K,
        value: V,
    ) {
        let hash = fold32(hash_one(&key));
        let entry = Entry { hash, key, value };
        match root {
            None => {
                let contribution = entry_contrib(&entry);
                *root = Some(Arc::new(Node::Bitmap(BitmapNode::singleton(entry, 0, owner))));
                *size = 1;
                *adhash = contribution;
            }
            Some(r) => {
                let outcome = ops::insert::insert(owner, r, entry, 0);
                if outcome.old_value.is_none() {
                    *size += 1;
                }
                *adhash = adhash.wrapping_add(outcome.adhash_delta);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Structural equality
// ---------------------------------------------------------------------------

/// Node-by-node comparison. Canonical form makes this complete: equal maps
/// have identical structure, so any bitmap mismatch is an immediate miss.
/// Collision entries are position-independent and compare as sets.
fn node_eq<K: PartialEq, V: PartialEq>(a: &Arc<Node<K, V>>, b: &Arc<Node<K, V>>) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }
    match (&**a, &**b) {
        (Node::Bitmap(x), Node::Bitmap(y)) => {
            x.data_map == y.data_map
                && x.node_map == y.node_map
                && x.entries
                    .iter()
                    .zip(&y.entries)
                    .all(|(p, q)| p.key == q.key && p.value == q.value)
                && x.children.iter().zip(&y.children).all(|(p, q)| node_eq(p, q))
        }
        (Node::Collision(x), Node::Collision(y)) => {
            x.hash == y.hash
                && x.entries.len() == y.entries.len()
                && x.entries.iter().all(|p| {
                    y.entries.iter().any(|q| p.key == q.key && p.value == q.value)
                })
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

// Manual impls — the derives would demand `K: Clone, V: Clone` for a cheap
// handle copy.
impl<K, V> Clone for ChampMap<K, V> {
    fn clone(&self) -> Self {
        Self { root: self.root.clone(), size: self.size, adhash: self.adhash }
    }
}

impl<K, V> Default for ChampMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ChampMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for ChampMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size || self.adhash != other.adhash {
            return false;
        }
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => node_eq(a, b),
            _ => false,
        }
    }
}

impl<K: Eq, V: Eq> Eq for ChampMap<K, V> {}

impl<K, V> Hash for ChampMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.size);
        state.write_u64(self.adhash);
    }
}

impl<K: Hash + Eq, V> Index<&K> for ChampMap<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Clone> FromIterator<(K, V)> for ChampMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new().extend_with(iter)
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Clone> Extend<(K, V)> for ChampMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        *self = self.extend_with(iter);
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Clone> From<HashMap<K, V>> for ChampMap<K, V> {
    fn from(map: HashMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<'a, K, V> IntoIterator for &'a ChampMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Entries<'a, K, V>;

    fn into_iter(self) -> Entries<'a, K, V> {
        self.iter()
    }
}
