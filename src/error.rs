//! Error taxonomy shared by both containers.

/// Crate-local result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure kinds surfaced by fallible collection operations.
///
/// Lookup misses are not errors; they are reported as `None` by the
/// respective accessors. Operations either succeed with a new collection or
/// fail with one of these variants, never leaving a partial state behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An index argument was outside the collection's bounds.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The collection length at call time.
        len: usize,
    },
    /// An element was required from an empty collection.
    #[error("operation requires a non-empty collection")]
    EmptyCollection,
    /// Exactly one element was required but several were present.
    #[error("expected exactly one element, found more")]
    TooManyElements,
}
