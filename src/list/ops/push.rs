//! Rightmost append.
//!
//! The descent follows the rightmost spine. A full spine signals the caller
//! to grow the root by one level instead; no tail buffer is kept.

use std::sync::Arc;

use crate::list::node::{Branch, M, Node, make_mut};
use crate::transient::Owner;

/// `true` if no slot on the rightmost spine can take one more element.
#[must_use]
pub(crate) fn is_full<T>(node: &Node<T>) -> bool {
    match node {
        Node::Leaf(leaf) => leaf.elems.len() == M,
        Node::Branch(branch) => {
            branch.children.len() == M
                && branch.children.last().is_some_and(|last| is_full(last))
        }
    }
}

/// Appends `value` along the rightmost spine.
///
/// Precondition: `!is_full(slot)`. Each level either pushes into its last
/// child or, when that child is full, grows a fresh single-element spine as
/// a new last child.
pub(crate) fn push<T: Clone>(owner: &Owner, slot: &mut Arc<Node<T>>, value: T) {
    match make_mut(owner, slot) {
        Node::Leaf(leaf) => {
            debug_assert!(leaf.elems.len() < M);
            leaf.elems.push(value);
        }
        Node::Branch(branch) => {
            let last_full = branch.children.last().is_some_and(|last| is_full(last));
            if last_full {
                debug_assert!(branch.children.len() < M);
                let spine = Node::unit_spine(branch.height - 1, value, owner);
                let total = branch.count();
                branch.children.push(spine);
                if let Some(sizes) = &mut branch.sizes {
                    sizes.push(total + 1);
                }
                // A strict node stays strict here: its previous last child
                // was full, and the spine is the new last child.
            } else if let Some(last) = branch.children.last_mut() {
                push(owner, last, value);
                if let Some(sizes) = &mut branch.sizes {
                    if let Some(total) = sizes.last_mut() {
                        *total += 1;
                    }
                }
            }
        }
    }
}

/// Wraps a full root and one more element into a taller root.
pub(crate) fn grow_root<T: Clone>(
    root: Arc<Node<T>>,
    value: T,
    owner: &Owner,
) -> Arc<Node<T>> {
    let height = root.height() + 1;
    let spine = Node::unit_spine(height - 1, value, owner);
    Arc::new(Node::Branch(Branch::from_children(height, vec![root, spine], owner)))
}
