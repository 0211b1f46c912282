//! Range extraction.

use std::sync::Arc;

use crate::list::node::{Branch, Node};
use crate::list::ops::concat;
use crate::transient::Owner;

/// Clips the subtree to the element range `start..end` (non-empty, inside
/// the node). Children fully inside the range are kept by reference,
/// overlapping edge children are clipped recursively, the rest are dropped.
pub(crate) fn slice<T: Clone>(
    owner: &Owner,
    node: &Arc<Node<T>>,
    start: usize,
    end: usize,
) -> Arc<Node<T>> {
    debug_assert!(start < end && end <= node.len());
    if start == 0 && end == node.len() {
        return node.clone();
    }
    match &**node {
        Node::Leaf(leaf) => {
            Arc::new(Node::leaf(leaf.elems[start..end].to_vec(), owner))
        }
        Node::Branch(branch) => {
            let mut kept = Vec::new();
            let mut child_start = 0;
            for child in &branch.children {
                let child_end = child_start + child.len();
                if child_start < end && child_end > start {
                    let lo = start.max(child_start) - child_start;
                    let hi = end.min(child_end) - child_start;
                    kept.push(slice(owner, child, lo, hi));
                }
                child_start = child_end;
            }
            // Clipped edge children may over-spread the group.
            let kept = concat::rebalance(owner, kept);
            Arc::new(Node::Branch(Branch::from_children(branch.height, kept, owner)))
        }
    }
}

/// Drops single-child root chains so the returned root has the minimum
/// height for its size.
pub(crate) fn collapse_root<T>(mut root: Arc<Node<T>>) -> Arc<Node<T>> {
    loop {
        let child = match &*root {
            Node::Branch(b) if b.children.len() == 1 => b.children[0].clone(),
            _ => return root,
        };
        root = child;
    }
}
