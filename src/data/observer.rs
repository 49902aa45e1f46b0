//! Lifecycle observers: externally-owned structures kept in sync with a graph.
//!
//! An observer registers with a [`Graph`] and from then on receives a
//! callback for every structural lifecycle event. The graph holds only a
//! [`Weak`](std::sync::Weak) back-reference; the observer stays owned by
//! external code and unregisters itself (or is simply dropped — a dead
//! weak reference is skipped and reaped on the next registry scan).
//!
//! Ordering guarantee: a notification fires only after the triggering
//! mutation has left the graph internally consistent. `del_node`'s
//! cascading edge deletions fire before the node's own deletion event.
//! Callbacks run synchronously inside the mutation; they cannot re-enter
//! the graph because the mutation holds the exclusive borrow.
//!
//! [`Graph`]: crate::topology::graph::Graph

use crate::topology::ids::{EdgeId, NodeId};

/// Lifecycle callbacks for structures tracking a graph.
///
/// All methods default to no-ops so implementors only write the events
/// they care about.
pub trait GraphObserver: Send + Sync {
    /// A node was created and fully linked.
    fn node_added(&self, _v: NodeId) {}
    /// A node was removed; its incident edges were already deleted.
    fn node_deleted(&self, _v: NodeId) {}
    /// An edge was created and fully linked into both endpoint rings.
    fn edge_added(&self, _e: EdgeId) {}
    /// An edge was fully unlinked and removed.
    fn edge_deleted(&self, _e: EdgeId) {}
    /// The graph discarded all entities at once.
    fn cleared(&self) {}
    /// The graph was rebuilt wholesale (copy or subset reconstruction);
    /// all previously held ids are stale.
    fn re_init(&self) {}
    /// The observed graph itself is being torn down. No deletion events
    /// follow; any held ids are dead.
    fn disconnected(&self) {}
}
