//! RRB tree node types and branching constants.

use std::sync::Arc;

use crate::transient::Owner;

/// Branching factor: maximum children per branch and elements per leaf.
pub(crate) const M: usize = 32;

/// Bits per tree level (5 → 32-way branching).
pub(crate) const LOG_M: u32 = 5;

/// Mask extracting one radix digit.
pub(crate) const MASK: usize = M - 1;

/// Search-Step Invariant tolerance: a sibling group of `S` slots holding
/// `P` items in total must satisfy `S ≤ ⌈P/M⌉ + E_MAX`.
pub(crate) const E_MAX: usize = 2;

/// Number of elements a maximally full child of a height-`height` branch
/// holds (`M^height`).
#[inline]
#[must_use]
pub(crate) const fn full_child_size(height: usize) -> usize {
    1 << (LOG_M as usize * height)
}

/// RRB tree node: a leaf of elements or a branch of child subtrees.
#[derive(Clone)]
pub(crate) enum Node<T> {
    /// Height 0: an ordered run of at most `M` elements.
    Leaf(Leaf<T>),
    /// Height ≥ 1: 1..=M children, all one level lower.
    Branch(Branch<T>),
}

#[derive(Clone)]
pub(crate) struct Leaf<T> {
    pub elems: Vec<T>,
    pub owner: Owner,
}

#[derive(Clone)]
pub(crate) struct Branch<T> {
    pub height: usize,
    pub children: Vec<Arc<Node<T>>>,
    /// Cumulative element counts, present iff the node is relaxed
    /// (some non-last child is not maximally full).
    pub sizes: Option<Vec<usize>>,
    pub owner: Owner,
}

// ---------------------------------------------------------------------------
// Node accessors
// ---------------------------------------------------------------------------

impl<T> Node<T> {
    /// Creates a leaf from the given elements.
    pub(crate) fn leaf(elems: Vec<T>, owner: &Owner) -> Self {
        Self::Leaf(Leaf { elems, owner: owner.clone() })
    }

    /// Height of this node; leaves are at height 0.
    #[must_use]
    pub(crate) const fn height(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Branch(b) => b.height,
        }
    }

    /// Total number of elements beneath this node.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Leaf(l) => l.elems.len(),
            Self::Branch(b) => b.count(),
        }
    }

    /// Number of direct slots: elements for a leaf, children for a branch.
    #[must_use]
    pub(crate) fn arity(&self) -> usize {
        match self {
            Self::Leaf(l) => l.elems.len(),
            Self::Branch(b) => b.children.len(),
        }
    }

    pub(crate) const fn owner(&self) -> &Owner {
        match self {
            Self::Leaf(l) => &l.owner,
            Self::Branch(b) => &b.owner,
        }
    }

    pub(crate) fn clear_owner(&mut self) {
        match self {
            Self::Leaf(l) => l.owner.clear(),
            Self::Branch(b) => b.owner.clear(),
        }
    }

    /// A single-element spine of the given height, used when the rightmost
    /// path of the tree is full and a fresh path must be grown.
    pub(crate) fn unit_spine(height: usize, value: T, owner: &Owner) -> Arc<Self> {
        let mut node = Arc::new(Self::leaf(vec![value], owner));
        for h in 1..=height {
            node = Arc::new(Self::Branch(Branch::from_children(h, vec![node], owner)));
        }
        node
    }
}

impl<T: Clone> Node<T> {
    /// Ensure-mutable copy: same content, tagged with `owner`, growable
    /// payload vectors.
    fn fork(&self, owner: &Owner) -> Self {
        match self {
            Self::Leaf(l) => Self::Leaf(Leaf { elems: l.elems.clone(), owner: owner.clone() }),
            Self::Branch(b) => Self::Branch(Branch {
                height: b.height,
                children: b.children.clone(),
                sizes: b.sizes.clone(),
                owner: owner.clone(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Branch arithmetic
// ---------------------------------------------------------------------------

impl<T> Branch<T> {
    /// Builds a branch over `children`, computing the size table and
    /// dropping it again when the node turns out strict.
    pub(crate) fn from_children(
        height: usize,
        children: Vec<Arc<Node<T>>>,
        owner: &Owner,
    ) -> Self {
        debug_assert!(height >= 1);
        debug_assert!(!children.is_empty() && children.len() <= M);
        debug_assert!(children.iter().all(|c| c.height() == height - 1));
        let sizes = compute_sizes(height, &children);
        Self { height, children, sizes, owner: owner.clone() }
    }

    /// Recomputes the size table after children were edited in place.
    pub(crate) fn refresh(&mut self) {
        self.sizes = compute_sizes(self.height, &self.children);
    }

    /// Total element count beneath this branch.
    #[must_use]
    pub(crate) fn count(&self) -> usize {
        match &self.sizes {
            Some(sizes) => sizes.last().copied().unwrap_or(0),
            None => {
                let full = full_child_size(self.height);
                (self.children.len() - 1) * full
                    + self.children.last().map_or(0, |c| c.len())
            }
        }
    }

    /// Maps an element index to `(child slot, index within child)`.
    ///
    /// Strict nodes use radix arithmetic, relaxed nodes binary-search the
    /// size table for the least slot whose cumulative count exceeds the
    /// index.
    #[must_use]
    pub(crate) fn find_slot(&self, index: usize) -> (usize, usize) {
        match &self.sizes {
            None => {
                let shift = LOG_M as usize * self.height;
                let slot = (index >> shift) & MASK;
                (slot, index - (slot << shift))
            }
            Some(sizes) => {
                let slot = sizes.partition_point(|&cum| cum <= index);
                let before = if slot == 0 { 0 } else { sizes[slot - 1] };
                (slot, index - before)
            }
        }
    }
}

/// Cumulative size table for `children`, or `None` when every non-last
/// child is maximally full for its height.
fn compute_sizes<T>(height: usize, children: &[Arc<Node<T>>]) -> Option<Vec<usize>> {
    let full = full_child_size(height);
    let strict = children
        .iter()
        .take(children.len().saturating_sub(1))
        .all(|c| c.len() == full);
    if strict {
        return None;
    }
    let mut total = 0;
    Some(
        children
            .iter()
            .map(|c| {
                total += c.len();
                total
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Copy-on-write plumbing
// ---------------------------------------------------------------------------

/// Returns a mutable reference to the node in `slot`, forking it first
/// unless it is owned by the current session.
pub(crate) fn make_mut<'a, T: Clone>(
    owner: &Owner,
    slot: &'a mut Arc<Node<T>>,
) -> &'a mut Node<T> {
    if !owner.owns(slot.owner()) {
        *slot = Arc::new(slot.fork(owner));
    }
    Arc::make_mut(slot)
}

/// Clears ownership over the subtree reachable through nodes owned by
/// `owner`. Foreign nodes (and everything below them) are untouched: a
/// session only ever links foreign nodes below owned ones, never the
/// reverse.
pub(crate) fn freeze<T: Clone>(owner: &Owner, slot: &mut Arc<Node<T>>) {
    if !owner.owns(slot.owner()) {
        return;
    }
    let node = Arc::make_mut(slot);
    node.clear_owner();
    if let Node::Branch(b) = node {
        for child in &mut b.children {
            freeze(owner, child);
        }
    }
}
