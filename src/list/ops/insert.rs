//! Positional insertion with node splitting.

use std::sync::Arc;

use crate::list::node::{Branch, M, Node, make_mut};
use crate::list::ops::concat;
use crate::transient::Owner;

/// Result of a recursive insert: either the slot absorbed the element, or
/// it split and the new right sibling must be placed just after it.
pub(crate) enum Inserted<T> {
    Done,
    Split(Arc<Node<T>>),
}

/// Inserts `value` at `index` within the subtree in `slot`.
///
/// `index` ranges over `0..=len`; `len` means "after the last element".
/// A full node splits into halves of `⌈(M+1)/2⌉` and `⌊(M+1)/2⌋` slots.
pub(crate) fn insert_at<T: Clone>(
    owner: &Owner,
    slot: &mut Arc<Node<T>>,
    index: usize,
    value: T,
) -> Inserted<T> {
    match make_mut(owner, slot) {
        Node::Leaf(leaf) => {
            if leaf.elems.len() < M {
                leaf.elems.insert(index, value);
                return Inserted::Done;
            }
            // Full leaf: distribute the M + 1 elements over two leaves.
            let left_target = (M + 1).div_ceil(2);
            let keep = if index < left_target { left_target - 1 } else { left_target };
            let mut right = leaf.elems.split_off(keep);
            if index < left_target {
                leaf.elems.insert(index, value);
            } else {
                right.insert(index - left_target, value);
            }
            Inserted::Split(Arc::new(Node::leaf(right, owner)))
        }
        Node::Branch(branch) => {
            let (child_slot, sub) = slot_for_insert(branch, index);
            match insert_at(owner, &mut branch.children[child_slot], sub, value) {
                Inserted::Done => {
                    branch.refresh();
                    Inserted::Done
                }
                Inserted::Split(sibling) => {
                    branch.children.insert(child_slot + 1, sibling);
                    // Splitting halves slot fill; keep the sibling group
                    // within the Search-Step Invariant.
                    branch.children =
                        concat::rebalance(owner, std::mem::take(&mut branch.children));
                    if branch.children.len() <= M {
                        branch.refresh();
                        return Inserted::Done;
                    }
                    let right_children = branch.children.split_off((M + 1).div_ceil(2));
                    let right =
                        Branch::from_children(branch.height, right_children, owner);
                    branch.refresh();
                    Inserted::Split(Arc::new(Node::Branch(right)))
                }
            }
        }
    }
}

/// Chooses the child receiving an insert at `index`.
///
/// An index equal to the total count appends into the last child; any other
/// index descends into the child containing it.
fn slot_for_insert<T>(branch: &Branch<T>, index: usize) -> (usize, usize) {
    if index == branch.count() {
        let last = branch.children.len() - 1;
        (last, branch.children[last].len())
    } else {
        branch.find_slot(index)
    }
}
