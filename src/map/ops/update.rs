//! Whole-map value rewrite.

use std::hash::Hash;
use std::sync::Arc;

use crate::map::node::{Node, make_mut};
use crate::map::ops::entry_contrib;
use crate::transient::Owner;

/// Applies `f` to every value in the subtree, in place where nodes are
/// owned by the session. Keys and trie structure are untouched; the
/// returned wrapping delta updates the map's content hash.
pub(crate) fn update_all<K, V, F>(
    owner: &Owner,
    slot: &mut Arc<Node<K, V>>,
    f: &mut F,
) -> u64
where
    K: Hash + Clone,
    V: Hash + Clone,
    F: FnMut(&K, &V) -> V,
{
    let mut delta: u64 = 0;
    match make_mut(owner, slot) {
        Node::Bitmap(n) => {
            for entry in &mut n.entries {
                let old_contrib = entry_contrib(entry);
                let new_value = f(&entry.key, &entry.value);
                entry.value = new_value;
                delta = delta.wrapping_add(entry_contrib(entry).wrapping_sub(old_contrib));
            }
            for child in &mut n.children {
                delta = delta.wrapping_add(update_all(owner, child, f));
            }
        }
        Node::Collision(n) => {
            for entry in &mut n.entries {
                let old_contrib = entry_contrib(entry);
                let new_value = f(&entry.key, &entry.value);
                entry.value = new_value;
                delta = delta.wrapping_add(entry_contrib(entry).wrapping_sub(old_contrib));
            }
        }
    }
    delta
}
