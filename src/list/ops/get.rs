//! Indexing and single-element replacement.

use std::sync::Arc;

use crate::list::node::{Node, make_mut};
use crate::transient::Owner;

/// Returns the element at `index`.
///
/// The caller has already bounds-checked `index` against the tree's length;
/// descent therefore always lands on a valid slot.
pub(crate) fn get<T>(node: &Node<T>, index: usize) -> &T {
    let mut node = node;
    let mut index = index;
    loop {
        match node {
            Node::Leaf(leaf) => return &leaf.elems[index],
            Node::Branch(branch) => {
                let (slot, sub) = branch.find_slot(index);
                node = &branch.children[slot];
                index = sub;
            }
        }
    }
}

/// Replaces the element at `index`, path-copying foreign nodes.
///
/// Counts are unchanged, so no size table needs recomputing.
pub(crate) fn update<T: Clone>(
    owner: &Owner,
    slot: &mut Arc<Node<T>>,
    index: usize,
    value: T,
) {
    match make_mut(owner, slot) {
        Node::Leaf(leaf) => leaf.elems[index] = value,
        Node::Branch(branch) => {
            let (child_slot, sub) = branch.find_slot(index);
            update(owner, &mut branch.children[child_slot], sub, value);
        }
    }
}
