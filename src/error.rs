//! GraphError: structured findings of the consistency checker.
//!
//! The mutation API itself does not return `Result`s — violated
//! preconditions are fatal contract breaches caught by `debug_assert!`
//! (see the crate docs). `GraphError` exists so that the O(n+m)
//! consistency pass can name exactly which invariant broke, which is far
//! more useful in a failing test than a bare `false`.

use thiserror::Error;

use crate::topology::ids::{AdjId, EdgeId, NodeId};

/// First invariant violation found by [`Graph::validate_invariants`].
///
/// [`Graph::validate_invariants`]: crate::topology::graph::Graph::validate_invariants
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An adjacency ring refers to a slot that holds no record.
    #[error("adjacency ring of node {node} references dead entry {adj}")]
    DeadRingEntry { node: NodeId, adj: AdjId },
    /// A ring entry's back/forward links disagree with its neighbors.
    #[error("adjacency ring of node {node} has inconsistent links at {adj}")]
    CorruptRingLinks { node: NodeId, adj: AdjId },
    /// A ring entry claims a different owning node.
    #[error("entry {adj} sits in the ring of node {node} but records node {found}")]
    WrongRingOwner {
        node: NodeId,
        adj: AdjId,
        found: NodeId,
    },
    /// A ring entry is neither the source- nor the target-side entry of
    /// its owning edge.
    #[error("entry {adj} is orphaned: edge {edge} does not reference it")]
    OrphanedEntry { adj: AdjId, edge: EdgeId },
    /// Stored in/out degree differs from the ring census.
    #[error("node {node} records indeg {stored_in}/outdeg {stored_out}, ring has {found_in}/{found_out}")]
    DegreeMismatch {
        node: NodeId,
        stored_in: usize,
        stored_out: usize,
        found_in: usize,
        found_out: usize,
    },
    /// An edge endpoint is dead or its endpoint-side entry disagrees.
    #[error("edge {edge} has an inconsistent endpoint record")]
    BadEndpoint { edge: EdgeId },
    /// The two adjacency slots of an edge coincide.
    #[error("edge {edge} references a single adjacency slot twice")]
    DegenerateAdjPair { edge: EdgeId },
    /// An adjacency slot id does not belong to its edge's slot pair.
    #[error("entry {adj} lies outside the slot pair of edge {edge}")]
    SlotPairViolation { adj: AdjId, edge: EdgeId },
    /// A hidden edge still occupies a ring, or an active edge is on the
    /// hidden stack (the active/hidden partition must be disjoint).
    #[error("edge {edge} violates the active/hidden partition")]
    HiddenPartitionViolation { edge: EdgeId },
    /// Live-entity counters disagree with the arena census.
    #[error("{kind} counter records {stored}, arena census found {found}")]
    CountMismatch {
        kind: &'static str,
        stored: usize,
        found: usize,
    },
    /// A registered auxiliary array's capacity fell behind the id space.
    #[error("{kind} array capacity {capacity} is below the id space size {required}")]
    ArrayCapacity {
        kind: &'static str,
        capacity: usize,
        required: usize,
    },
}
