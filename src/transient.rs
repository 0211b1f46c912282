//! Transient ownership tokens.
//!
//! A bulk builder opens a session by creating a fresh [`Owner`]. Nodes
//! created inside the session carry that owner and may be mutated in place;
//! any other node must be forked before mutation. Freezing clears the owner
//! along the owned subtree, after which no reference can observe mutation.

use std::sync::Arc;

/// Identity-compared ownership token.
///
/// `Owner::frozen()` owns nothing: with it, every touched node is forked,
/// which is exactly the persistent path-copy mode. A token from
/// [`Owner::new`] marks nodes created during one builder session.
#[derive(Clone, Default)]
pub(crate) struct Owner(Option<Arc<()>>);

impl Owner {
    /// Issues a fresh token for a transient session.
    pub(crate) fn new() -> Self {
        Self(Some(Arc::new(())))
    }

    /// The no-ownership token used by persistent single operations.
    pub(crate) const fn frozen() -> Self {
        Self(None)
    }

    /// `true` if `node_owner` was issued by this session.
    ///
    /// Frozen tokens never match, in either position: a frozen node is
    /// immutable to everyone, and a frozen session owns no node.
    pub(crate) fn owns(&self, node_owner: &Self) -> bool {
        match (&self.0, &node_owner.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Clears the token, marking the node immutable.
    pub(crate) fn clear(&mut self) {
        self.0 = None;
    }

    /// `true` once the token has been cleared (or never was live).
    #[cfg(test)]
    pub(crate) const fn is_frozen(&self) -> bool {
        self.0.is_none()
    }
}

impl std::fmt::Debug for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.0.is_some() { "Owner(live)" } else { "Owner(frozen)" })
    }
}
