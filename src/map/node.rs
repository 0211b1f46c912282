//! CHAMP trie node types and bitmap helpers.

use std::sync::Arc;

use crate::transient::Owner;

/// Bits per trie level (5 → 32-way branching).
pub(crate) const BITS_PER_LEVEL: u32 = 5;

/// Maximum bit-shift value. Six full 5-bit levels; the residual two bits
/// form one more narrow level, below which equal hashes become collision
/// nodes.
pub(crate) const MAX_SHIFT: u32 = 30;

/// Key-value pair with its precomputed 32-bit trie hash.
#[derive(Clone)]
pub(crate) struct Entry<K, V> {
    pub hash: u32,
    pub key: K,
    pub value: V,
}

/// CHAMP trie node.
///
/// Two variants maintain the canonical form invariant:
/// - [`Bitmap`](Node::Bitmap) — bitmap-compressed node
/// - [`Collision`](Node::Collision) — linear node for full hash collisions
#[derive(Clone)]
pub(crate) enum Node<K, V> {
    Bitmap(BitmapNode<K, V>),
    Collision(CollisionNode<K, V>),
}

/// Bitmap-compressed node: inline entries packed by `data_map`, child
/// subtrees packed by `node_map`.
///
/// Invariant: `data_map & node_map == 0` (disjoint positions).
#[derive(Clone)]
pub(crate) struct BitmapNode<K, V> {
    pub data_map: u32,
    pub node_map: u32,
    pub entries: Vec<Entry<K, V>>,
    pub children: Vec<Arc<Node<K, V>>>,
    pub owner: Owner,
}

/// Collision node for keys sharing the same 32-bit hash.
///
/// Invariant: `entries.len() >= 2`.
#[derive(Clone)]
pub(crate) struct CollisionNode<K, V> {
    pub hash: u32,
    pub entries: Vec<Entry<K, V>>,
    pub owner: Owner,
}

// ---------------------------------------------------------------------------
// Bitmap helpers
// ---------------------------------------------------------------------------

/// Extracts the 5-bit hash fragment at the given bit-shift depth.
#[inline]
#[must_use]
pub(crate) const fn fragment(hash: u32, shift: u32) -> u32 {
    (hash >> shift) & 0x1F
}

/// Returns the single-bit mask for the given fragment (0..31).
#[inline]
#[must_use]
pub(crate) const fn mask(frag: u32) -> u32 {
    1 << frag
}

/// Returns the compact index of `bit` within `bitmap`: the number of set
/// bits below it.
#[inline]
#[must_use]
pub(crate) const fn index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

// ---------------------------------------------------------------------------
// Node accessors
// ---------------------------------------------------------------------------

impl<K, V> Node<K, V> {
    pub(crate) const fn owner(&self) -> &Owner {
        match self {
            Self::Bitmap(n) => &n.owner,
            Self::Collision(n) => &n.owner,
        }
    }

    pub(crate) fn clear_owner(&mut self) {
        match self {
            Self::Bitmap(n) => n.owner.clear(),
            Self::Collision(n) => n.owner.clear(),
        }
    }
}

impl<K, V> BitmapNode<K, V> {
    /// A node holding the single given entry, positioned for `shift`.
    pub(crate) fn singleton(entry: Entry<K, V>, shift: u32, owner: &Owner) -> Self {
        let bit = mask(fragment(entry.hash, shift));
        Self {
            data_map: bit,
            node_map: 0,
            entries: vec![entry],
            children: Vec::new(),
            owner: owner.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Copy-on-write plumbing
// ---------------------------------------------------------------------------

impl<K: Clone, V: Clone> Node<K, V> {
    /// Ensure-mutable copy: same content, tagged with `owner`.
    fn fork(&self, owner: &Owner) -> Self {
        match self {
            Self::Bitmap(n) => Self::Bitmap(BitmapNode {
                data_map: n.data_map,
                node_map: n.node_map,
                entries: n.entries.clone(),
                children: n.children.clone(),
                owner: owner.clone(),
            }),
            Self::Collision(n) => Self::Collision(CollisionNode {
                hash: n.hash,
                entries: n.entries.clone(),
                owner: owner.clone(),
            }),
        }
    }
}

/// Returns a mutable reference to the node in `slot`, forking it first
/// unless it is owned by the current session.
pub(crate) fn make_mut<'a, K: Clone, V: Clone>(
    owner: &Owner,
    slot: &'a mut Arc<Node<K, V>>,
) -> &'a mut Node<K, V> {
    if !owner.owns(slot.owner()) {
        *slot = Arc::new(slot.fork(owner));
    }
    Arc::make_mut(slot)
}

/// Clears ownership over the subtree reachable through nodes owned by
/// `owner`; foreign nodes are untouched.
pub(crate) fn freeze<K: Clone, V: Clone>(owner: &Owner, slot: &mut Arc<Node<K, V>>) {
    if !owner.owns(slot.owner()) {
        return;
    }
    let node = Arc::make_mut(slot);
    node.clear_owner();
    if let Node::Bitmap(bitmap) = node {
        for child in &mut bitmap.children {
            freeze(owner, child);
        }
    }
}
