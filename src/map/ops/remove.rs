//! Removal — copy-on-write path rewrite with canonical inlining.
//!
//! A subtree that shrinks to a single entry hands that entry back to its
//! parent, which inlines it as a data slot. Chains of single-child nodes
//! dissolve the same way: a node left holding nothing but the returned
//! entry propagates it further up. Only the root keeps bitmap form for a
//! lone entry.

use std::hash::Hash;
use std::sync::Arc;

use crate::map::node::{self, BitmapNode, CollisionNode, Entry, Node, make_mut};
use crate::map::ops::entry_contrib;
use crate::transient::Owner;

/// Outcome of a recursive remove.
pub(crate) enum RemoveOutcome<K, V> {
    /// Key was not found — the tree is unchanged.
    NotFound,
    /// Key was removed.
    Removed {
        /// The removed value.
        value: V,
        /// Wrapping delta to subtract from the map's content hash.
        adhash_delta: u64,
        /// How the subtree in the caller's slot shrank.
        shrink: Shrink<K, V>,
    },
}

/// Post-removal state of a child slot.
pub(crate) enum Shrink<K, V> {
    /// The slot still holds a valid node.
    Kept,
    /// The subtree reduced to this one entry; the caller inlines it and
    /// discards the slot.
    Single(Entry<K, V>),
    /// The subtree is empty; the caller drops the slot.
    Emptied,
}

/// Removes `key` from the subtree in `slot`.
pub(crate) fn remove<K, V>(
    owner: &Owner,
    slot: &mut Arc<Node<K, V>>,
    hash: u32,
    key: &K,
    shift: u32,
) -> RemoveOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    match make_mut(owner, slot) {
        Node::Bitmap(n) => remove_from_bitmap(owner, n, hash, key, shift),
        Node::Collision(n) => remove_from_collision(n, hash, key),
    }
}

// ---------------------------------------------------------------------------
// Bitmap node remove
// ---------------------------------------------------------------------------

fn remove_from_bitmap<K, V>(
    owner: &Owner,
    n: &mut BitmapNode<K, V>,
    hash: u32,
    key: &K,
    shift: u32,
) -> RemoveOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    let bit = node::mask(node::fragment(hash, shift));

    if n.data_map & bit != 0 {
        let pos = node::index(n.data_map, bit);
        let entry = &n.entries[pos];
        if !(entry.hash == hash && entry.key == *key) {
            return RemoveOutcome::NotFound;
        }
        let removed = n.entries.remove(pos);
        n.data_map &= !bit;
        let adhash_delta = entry_contrib(&removed);
        RemoveOutcome::Removed {
            value: removed.value,
            adhash_delta,
            shrink: shrink_state(n, shift),
        }
    } else if n.node_map & bit != 0 {
        let pos = node::index(n.node_map, bit);
        match remove(owner, &mut n.children[pos], hash, key, shift + node::BITS_PER_LEVEL) {
            RemoveOutcome::NotFound => RemoveOutcome::NotFound,
            RemoveOutcome::Removed { value, adhash_delta, shrink } => {
                match shrink {
                    Shrink::Kept => {}
                    Shrink::Single(entry) => {
                        // Canonicalisation: inline the lone surviving entry
                        // in place of the sub-node.
                        n.children.remove(pos);
                        n.node_map &= !bit;
                        n.data_map |= bit;
                        n.entries.insert(node::index(n.data_map, bit), entry);
                    }
                    Shrink::Emptied => {
                        n.children.remove(pos);
                        n.node_map &= !bit;
                    }
                }
                RemoveOutcome::Removed {
                    value,
                    adhash_delta,
                    shrink: shrink_state(n, shift),
                }
            }
        }
    } else {
        RemoveOutcome::NotFound
    }
}

/// Canonical shrink classification for a just-edited bitmap node. The root
/// (`shift == 0`) always keeps its bitmap form.
fn shrink_state<K, V>(n: &mut BitmapNode<K, V>, shift: u32) -> Shrink<K, V> {
    if shift == 0 {
        return Shrink::Kept;
    }
    match (n.entries.len(), n.children.len()) {
        (0, 0) => Shrink::Emptied,
        (1, 0) => match n.entries.pop() {
            Some(entry) => Shrink::Single(entry),
            None => Shrink::Emptied,
        },
        _ => Shrink::Kept,
    }
}

// ---------------------------------------------------------------------------
// Collision node remove
// ---------------------------------------------------------------------------

fn remove_from_collision<K, V>(
    n: &mut CollisionNode<K, V>,
    hash: u32,
    key: &K,
) -> RemoveOutcome<K, V>
where
    K: Hash + Eq,
    V: Hash,
{
    if hash != n.hash {
        return RemoveOutcome::NotFound;
    }
    let Some(pos) = n.entries.iter().position(|e| e.key == *key) else {
        return RemoveOutcome::NotFound;
    };
    let removed = n.entries.remove(pos);
    let adhash_delta = entry_contrib(&removed);
    let shrink = if n.entries.len() == 1 {
        // One survivor: upgrade it to an inline entry in the parent.
        match n.entries.pop() {
            Some(entry) => Shrink::Single(entry),
            None => Shrink::Emptied,
        }
    } else {
        Shrink::Kept
    };
    RemoveOutcome::Removed { value: removed.value, adhash_delta, shrink }
}
