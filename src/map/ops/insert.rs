//! Insertion — copy-on-write path rewrite with content-hash maintenance.

use std::hash::Hash;
use std::mem;
use std::sync::Arc;

use crate::map::node::{self, BitmapNode, CollisionNode, Entry, Node, make_mut};
use crate::map::ops::entry_contrib;
use crate::transient::Owner;

/// Outcome of a recursive insert.
pub(crate) struct InsertOutcome<V> {
    /// Replaced value when the key was already present.
    pub old_value: Option<V>,
    /// Wrapping delta to add to the map's content hash.
    pub adhash_delta: u64,
}

/// Inserts `entry` into the subtree in `slot`, forking foreign nodes along
/// the touched path.
pub(crate) fn insert<K, V>(
    owner: &Owner,
    slot: &mut Arc<Node<K, V>>,
    entry: Entry<K, V>,
    shift: u32,
) -> InsertOutcome<V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    match make_mut(owner, slot) {
        Node::Bitmap(n) => insert_into_bitmap(owner, n, entry, shift),
        Node::Collision(n) => insert_into_collision(n, entry),
    }
}

// ---------------------------------------------------------------------------
// Bitmap node insert
// ---------------------------------------------------------------------------

fn insert_into_bitmap<K, V>(
    owner: &Owner,
    n: &mut BitmapNode<K, V>,
    entry: Entry<K, V>,
    shift: u32,
) -> InsertOutcome<V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    let bit = node::mask(node::fragment(entry.hash, shift));

    if n.data_map & bit != 0 {
        let pos = node::index(n.data_map, bit);
        let existing = &mut n.entries[pos];
        if existing.hash == entry.hash && existing.key == entry.key {
            // Same key → replace the value.
            let old_contrib = entry_contrib(existing);
            let new_contrib = entry_contrib(&entry);
            let old = mem::replace(&mut existing.value, entry.value);
            return InsertOutcome {
                old_value: Some(old),
                adhash_delta: new_contrib.wrapping_sub(old_contrib),
            };
        }
        // Different key at the same position → push both one level deeper.
        let new_contrib = entry_contrib(&entry);
        let existing = n.entries.remove(pos);
        let subtree = merge_entries(owner, existing, entry, shift + node::BITS_PER_LEVEL);
        n.data_map &= !bit;
        n.node_map |= bit;
        n.children.insert(node::index(n.node_map, bit), subtree);
        InsertOutcome { old_value: None, adhash_delta: new_contrib }
    } else if n.node_map & bit != 0 {
        // Position has a child subtree — recurse.
        let pos = node::index(n.node_map, bit);
        insert(owner, &mut n.children[pos], entry, shift + node::BITS_PER_LEVEL)
    } else {
        // Position empty → add an inline entry.
        let new_contrib = entry_contrib(&entry);
        n.data_map |= bit;
        n.entries.insert(node::index(n.data_map, bit), entry);
        InsertOutcome { old_value: None, adhash_delta: new_contrib }
    }
}

// ---------------------------------------------------------------------------
// Collision node insert
// ---------------------------------------------------------------------------

fn insert_into_collision<K, V>(
    n: &mut CollisionNode<K, V>,
    entry: Entry<K, V>,
) -> InsertOutcome<V>
where
    K: Hash + Eq,
    V: Hash,
{
    // Collision nodes never sit at the root, so any key descending this far
    // shares the node's full hash.
    debug_assert_eq!(entry.hash, n.hash);
    let new_contrib = entry_contrib(&entry);

    if let Some(existing) = n.entries.iter_mut().find(|e| e.key == entry.key) {
        let old_contrib = entry_contrib(existing);
        let old = mem::replace(&mut existing.value, entry.value);
        return InsertOutcome {
            old_value: Some(old),
            adhash_delta: new_contrib.wrapping_sub(old_contrib),
        };
    }
    n.entries.push(entry);
    InsertOutcome { old_value: None, adhash_delta: new_contrib }
}

// ---------------------------------------------------------------------------
// Subtree creation
// ---------------------------------------------------------------------------

/// Builds the subtree holding two entries that collide at the previous
/// level: descends until their hash fragments differ, or forms a collision
/// node once the hash is exhausted.
fn merge_entries<K: Clone, V: Clone>(
    owner: &Owner,
    e1: Entry<K, V>,
    e2: Entry<K, V>,
    shift: u32,
) -> Arc<Node<K, V>> {
    if shift > node::MAX_SHIFT {
        debug_assert_eq!(e1.hash, e2.hash);
        return Arc::new(Node::Collision(CollisionNode {
            hash: e1.hash,
            entries: vec![e1, e2],
            owner: owner.clone(),
        }));
    }
    let f1 = node::fragment(e1.hash, shift);
    let f2 = node::fragment(e2.hash, shift);
    if f1 == f2 {
        let child = merge_entries(owner, e1, e2, shift + node::BITS_PER_LEVEL);
        Arc::new(Node::Bitmap(BitmapNode {
            data_map: 0,
            node_map: node::mask(f1),
            entries: Vec::new(),
            children: vec![child],
            owner: owner.clone(),
        }))
    } else {
        let entries = if f1 < f2 { vec![e1, e2] } else { vec![e2, e1] };
        Arc::new(Node::Bitmap(BitmapNode {
            data_map: node::mask(f1) | node::mask(f2),
            node_map: 0,
            entries,
            children: Vec::new(),
            owner: owner.clone(),
        }))
    }
}
