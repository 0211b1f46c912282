//! Shared test helpers: forced-hash keys and structural walkers.
//!
//! The walkers assert the internal invariants the public API cannot show:
//! size-table agreement and the Search-Step Invariant for the RRB tree,
//! bitmap consistency and canonical form for the CHAMP trie, and cleared
//! ownership on every reachable node of a returned collection.

use std::hash::{Hash, Hasher};

use crate::hash::trie_hash;
use crate::list::node::{E_MAX, M, Node as ListNode, full_child_size};
use crate::map::node::{BITS_PER_LEVEL, MAX_SHIFT, Node as MapNode, fragment};
use crate::{ChampMap, RrbList};

// ---------------------------------------------------------------------------
// Forced-hash keys
// ---------------------------------------------------------------------------

/// A key type with a controllable hash value for testing hash collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CollidingKey {
    pub id: u32,
    pub forced_hash: u64,
}

impl CollidingKey {
    pub(crate) const fn new(id: u32, hash: u64) -> Self {
        Self { id, forced_hash: hash }
    }
}

impl Hash for CollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.forced_hash.hash(state);
    }
}

/// Finds `want` keys whose 32-bit trie hashes agree on the low `bits` bits
/// without all being fully equal, forcing a shared path of `bits / 5`
/// levels before the entries diverge.
pub(crate) fn prefix_colliding_keys(bits: u32, want: usize) -> Vec<CollidingKey> {
    assert!(bits < 32);
    let mask = (1u32 << bits) - 1;
    let mut buckets: std::collections::HashMap<u32, Vec<u64>> =
        std::collections::HashMap::new();
    for seed in 0u64.. {
        let key = CollidingKey::new(0, seed);
        let hash = trie_hash(&key);
        let bucket = buckets.entry(hash & mask).or_default();
        bucket.push(seed);
        if bucket.len() == want {
            return bucket
                .iter()
                .enumerate()
                .map(|(i, &s)| CollidingKey::new(u32::try_from(i).unwrap(), s))
                .collect();
        }
    }
    unreachable!("search space exhausted")
}

// ---------------------------------------------------------------------------
// RRB walker
// ---------------------------------------------------------------------------

/// Asserts every structural invariant of a frozen list.
pub(crate) fn assert_list_invariants<T>(list: &RrbList<T>) {
    match &list.root {
        None => assert_eq!(list.len(), 0, "empty root but nonzero length"),
        Some(root) => {
            assert!(list.len() > 0, "nonempty root on a zero-length list");
            assert_eq!(root.len(), list.len(), "root count disagrees with length");
            walk_list(root);
        }
    }
}

fn walk_list<T>(node: &ListNode<T>) {
    assert!(node.owner().is_frozen(), "live owner on a frozen tree");
    match node {
        ListNode::Leaf(leaf) => {
            assert!(!leaf.elems.is_empty(), "empty leaf");
            assert!(leaf.elems.len() <= M, "overfull leaf");
        }
        ListNode::Branch(branch) => {
            assert!(branch.height >= 1);
            assert!(!branch.children.is_empty(), "childless branch");
            assert!(branch.children.len() <= M, "overfull branch");
            for child in &branch.children {
                assert_eq!(child.height(), branch.height - 1, "uneven child heights");
                walk_list(child);
            }

            // A size table is carried iff some non-last child is not full.
            let full = full_child_size(branch.height);
            let strict = branch.children[..branch.children.len() - 1]
                .iter()
                .all(|c| c.len() == full);
            match &branch.sizes {
                None => assert!(strict, "strict node missing its size table"),
                Some(sizes) => {
                    assert!(!strict, "size table on a strict node");
                    assert_eq!(sizes.len(), branch.children.len());
                    let mut total = 0;
                    for (cum, child) in sizes.iter().zip(&branch.children) {
                        total += child.len();
                        assert_eq!(*cum, total, "bad cumulative size");
                    }
                }
            }

            // Search-Step Invariant over the child group.
            let slots = branch.children.len();
            let payload: usize = branch.children.iter().map(|c| c.arity()).sum();
            assert!(
                slots <= payload.div_ceil(M) + E_MAX,
                "Search-Step Invariant violated: S={slots} P={payload}"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// CHAMP walker
// ---------------------------------------------------------------------------

/// Asserts bitmap consistency and canonical form of a frozen map, and that
/// the reachable entry count matches the recorded length.
pub(crate) fn assert_map_invariants<K: PartialEq, V>(map: &ChampMap<K, V>) {
    match &map.root {
        None => assert_eq!(map.len(), 0, "empty root but nonzero length"),
        Some(root) => {
            let count = walk_map(root, 0, 0, true);
            assert_eq!(count, map.len(), "reachable entries disagree with length");
        }
    }
}

fn walk_map<K: PartialEq, V>(
    node: &MapNode<K, V>,
    prefix: u32,
    shift: u32,
    is_root: bool,
) -> usize {
    assert!(node.owner().is_frozen(), "live owner on a frozen trie");
    let prefix_mask = if shift >= 32 { u32::MAX } else { (1u32 << shift) - 1 };
    match node {
        MapNode::Bitmap(n) => {
            assert_eq!(n.data_map & n.node_map, 0, "bitmaps overlap");
            assert_eq!(n.data_map.count_ones() as usize, n.entries.len());
            assert_eq!(n.node_map.count_ones() as usize, n.children.len());
            if !is_root {
                assert!(
                    n.entries.len() + n.children.len() > 1
                        || (n.entries.is_empty() && n.children.len() == 1),
                    "removable singleton entry below the root"
                );
            }

            // Entries sit at the slots their hash fragments select.
            let mut bits = n.data_map;
            let mut count = 0;
            for entry in &n.entries {
                let frag = bits.trailing_zeros();
                bits &= bits - 1;
                assert_eq!(fragment(entry.hash, shift), frag, "entry in wrong slot");
                assert_eq!(entry.hash & prefix_mask, prefix, "entry off its path");
                count += 1;
            }
            let mut nbits = n.node_map;
            for child in &n.children {
                let frag = nbits.trailing_zeros();
                nbits &= nbits - 1;
                let child_prefix = prefix | (frag << shift);
                let below = walk_map(child, child_prefix, shift + BITS_PER_LEVEL, false);
                assert!(below >= 2, "sub-node holding fewer than two entries");
                count += below;
            }
            count
        }
        MapNode::Collision(n) => {
            assert!(shift > MAX_SHIFT, "collision node above the bottom level");
            assert!(n.entries.len() >= 2, "undersized collision node");
            for (i, a) in n.entries.iter().enumerate() {
                assert_eq!(a.hash, n.hash, "mixed hashes in collision node");
                assert_eq!(a.hash & prefix_mask, prefix, "collision off its path");
                for b in &n.entries[i + 1..] {
                    assert!(a.key != b.key, "duplicate key in collision node");
                }
            }
            n.entries.len()
        }
    }
}
