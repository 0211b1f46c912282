//! Concatenation and the Search-Step rebalance plan.
//!
//! Two trees are joined by merging the right spine of the left tree with
//! the left spine of the right tree, level by level. Every rebuilt sibling
//! group is checked against the Search-Step Invariant
//! (`S ≤ ⌈P/M⌉ + E_MAX`) and redistributed when it fails.

use std::sync::Arc;

use crate::list::node::{Branch, E_MAX, M, Node};
use crate::transient::Owner;

/// Concatenates two non-empty trees into a single root.
pub(crate) fn concat<T: Clone>(
    owner: &Owner,
    left: &Arc<Node<T>>,
    right: &Arc<Node<T>>,
) -> Arc<Node<T>> {
    let height = left.height().max(right.height());
    let mut merged = concat_rec(owner, left, right);
    if merged.len() == 1 {
        merged.swap_remove(0)
    } else {
        Arc::new(Node::Branch(Branch::from_children(height + 1, merged, owner)))
    }
}

/// Joins `left` and `right` into one or two nodes at height
/// `max(left.height, right.height)`.
fn concat_rec<T: Clone>(
    owner: &Owner,
    left: &Arc<Node<T>>,
    right: &Arc<Node<T>>,
) -> Vec<Arc<Node<T>>> {
    let (hl, hr) = (left.height(), right.height());
    if hl == 0 && hr == 0 {
        let (Node::Leaf(l), Node::Leaf(r)) = (&**left, &**right) else {
            unreachable!("height 0 is a leaf")
        };
        return if l.elems.len() + r.elems.len() <= M {
            let mut elems = Vec::with_capacity(l.elems.len() + r.elems.len());
            elems.extend(l.elems.iter().cloned());
            elems.extend(r.elems.iter().cloned());
            vec![Arc::new(Node::leaf(elems, owner))]
        } else {
            vec![left.clone(), right.clone()]
        };
    }
    if hl == hr {
        let (Node::Branch(l), Node::Branch(r)) = (&**left, &**right) else {
            unreachable!("equal nonzero heights are branches")
        };
        let last = l.children.len() - 1;
        let mid = concat_rec(owner, &l.children[last], &r.children[0]);
        let mut children = Vec::with_capacity(last + mid.len() + r.children.len() - 1);
        children.extend(l.children[..last].iter().cloned());
        children.extend(mid);
        children.extend(r.children[1..].iter().cloned());
        pack(owner, hl, rebalance(owner, children))
    } else if hl > hr {
        let Node::Branch(l) = &**left else {
            unreachable!("taller side is a branch")
        };
        let last = l.children.len() - 1;
        let mid = concat_rec(owner, &l.children[last], right);
        let mut children = Vec::with_capacity(last + mid.len());
        children.extend(l.children[..last].iter().cloned());
        children.extend(mid);
        pack(owner, hl, rebalance(owner, children))
    } else {
        let Node::Branch(r) = &**right else {
            unreachable!("taller side is a branch")
        };
        let mid = concat_rec(owner, left, &r.children[0]);
        let mut children = Vec::with_capacity(mid.len() + r.children.len() - 1);
        children.extend(mid);
        children.extend(r.children[1..].iter().cloned());
        pack(owner, hr, rebalance(owner, children))
    }
}

/// Wraps a sibling group into one parent, or two when it overflows `M`.
fn pack<T: Clone>(
    owner: &Owner,
    height: usize,
    mut children: Vec<Arc<Node<T>>>,
) -> Vec<Arc<Node<T>>> {
    debug_assert!(children.len() <= 2 * M);
    if children.len() <= M {
        vec![Arc::new(Node::Branch(Branch::from_children(height, children, owner)))]
    } else {
        let right = children.split_off(children.len().div_ceil(2));
        vec![
            Arc::new(Node::Branch(Branch::from_children(height, children, owner))),
            Arc::new(Node::Branch(Branch::from_children(height, right, owner))),
        ]
    }
}

/// Restores the Search-Step Invariant over a sibling group, redistributing
/// slot contents when the group is spread over too many nodes. Groups that
/// already satisfy the invariant come back untouched.
///
/// Shared by concat, insert-at, remove-at and slice: every operation that
/// rebuilds a sibling group runs its result through this check.
pub(crate) fn rebalance<T: Clone>(
    owner: &Owner,
    children: Vec<Arc<Node<T>>>,
) -> Vec<Arc<Node<T>>> {
    let counts: Vec<usize> = children.iter().map(|c| c.arity()).collect();
    let total: usize = counts.iter().sum();
    if children.len() <= total.div_ceil(M) + E_MAX {
        return children;
    }
    let plan = plan_sizes(&counts);
    execute_plan(owner, &children, &plan)
}

/// Computes target slot sizes: starting from the leftmost underfull slot,
/// its contents are pushed into the successors until the group satisfies
/// `S ≤ ⌈P/M⌉ + E_MAX`.
fn plan_sizes(counts: &[usize]) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    let optimal = total.div_ceil(M);
    let mut plan = counts.to_vec();
    let mut i = 0;
    while plan.len() > optimal + E_MAX {
        while plan[i] >= M - E_MAX / 2 {
            i += 1;
        }
        // Drain slot i forward; the last slot it spills into goes stale.
        let mut carry = plan[i];
        let mut j = i;
        while carry > 0 {
            let merged = (carry + plan[j + 1]).min(M);
            carry = carry + plan[j + 1] - merged;
            plan[j] = merged;
            j += 1;
        }
        plan.remove(j);
    }
    debug_assert_eq!(plan.iter().sum::<usize>(), total);
    plan
}

/// Rebuilds the sibling group to the planned slot sizes, pulling elements
/// (for leaves) or grandchildren (for branches) from the inputs in order.
/// An input consumed whole at offset zero with a matching target is reused
/// by reference.
fn execute_plan<T: Clone>(
    owner: &Owner,
    children: &[Arc<Node<T>>],
    plan: &[usize],
) -> Vec<Arc<Node<T>>> {
    let mut out = Vec::with_capacity(plan.len());
    let mut src = 0;
    let mut offset = 0;
    for &target in plan {
        if offset == 0 && children[src].arity() == target {
            out.push(children[src].clone());
            src += 1;
            continue;
        }
        match &*children[src] {
            Node::Leaf(_) => {
                let mut elems = Vec::with_capacity(target);
                while elems.len() < target {
                    let Node::Leaf(leaf) = &*children[src] else {
                        unreachable!("mixed heights in sibling group")
                    };
                    let take = (target - elems.len()).min(leaf.elems.len() - offset);
                    elems.extend(leaf.elems[offset..offset + take].iter().cloned());
                    offset += take;
                    if offset == leaf.elems.len() {
                        src += 1;
                        offset = 0;
                    }
                }
                out.push(Arc::new(Node::leaf(elems, owner)));
            }
            Node::Branch(b) => {
                let height = b.height;
                let mut grand = Vec::with_capacity(target);
                while grand.len() < target {
                    let Node::Branch(branch) = &*children[src] else {
                        unreachable!("mixed heights in sibling group")
                    };
                    let take =
                        (target - grand.len()).min(branch.children.len() - offset);
                    grand.extend(branch.children[offset..offset + take].iter().cloned());
                    offset += take;
                    if offset == branch.children.len() {
                        src += 1;
                        offset = 0;
                    }
                }
                out.push(Arc::new(Node::Branch(Branch::from_children(
                    height, grand, owner,
                ))));
            }
        }
    }
    debug_assert_eq!(src, children.len());
    out
}
