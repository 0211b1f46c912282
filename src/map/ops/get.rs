//! Lookup — traverses the trie to find a key.

use crate::map::node::{self, Entry, Node};

/// Searches for `key` in the subtree rooted at `node`.
///
/// Returns the full entry so callers can surface the stored key as well as
/// the value.
pub(crate) fn lookup<'a, K: Eq, V>(
    node: &'a Node<K, V>,
    hash: u32,
    key: &K,
    shift: u32,
) -> Option<&'a Entry<K, V>> {
    match node {
        Node::Bitmap(n) => {
            let bit = node::mask(node::fragment(hash, shift));
            if n.data_map & bit != 0 {
                // Position has an inline entry.
                let entry = &n.entries[node::index(n.data_map, bit)];
                (entry.hash == hash && entry.key == *key).then_some(entry)
            } else if n.node_map & bit != 0 {
                // Position has a child subtree — recurse.
                let child = &n.children[node::index(n.node_map, bit)];
                lookup(child, hash, key, shift + node::BITS_PER_LEVEL)
            } else {
                // Position is empty.
                None
            }
        }
        Node::Collision(n) => {
            if hash != n.hash {
                return None;
            }
            // Linear search through collision entries.
            n.entries.iter().find(|entry| entry.key == *key)
        }
    }
}
