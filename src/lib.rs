#![cfg_attr(docsrs, feature(doc_cfg))]
//! # halfedge-graph
//!
//! halfedge-graph is a mutable graph topology engine built around a
//! half-edge (adjacency entry) representation. Every edge owns two twin
//! entries sitting in the circular adjacency rings of its endpoints, so
//! the graph always carries a rotation system, and embedding-aware
//! operations (face traversal, genus) come for free.
//!
//! ## Features
//! - Dense integer ids for nodes, edges, and adjacency entries; stable
//!   across unrelated mutations and usable directly as array indices
//! - Structural edits that preserve identity: endpoint moves, edge
//!   split/unsplit, contraction, node splitting, reversal
//! - Hide/restore for temporarily masking edges without losing ids or
//!   attribute data
//! - Attribute arrays ([`NodeArray`], [`EdgeArray`], [`AdjArray`]) that
//!   resize automatically with the graph they are registered on
//! - Observers notified of every structural event
//! - Connected-component snapshots, subgraph rebuilds with id remaps,
//!   and an O(n + m) consistency checker
//!
//! ## Invariant checking
//!
//! Compound edits re-validate the arena behind `debug_assertions`; the
//! `strict-invariants` and `check-invariants` features force those checks
//! on in release builds too.
//!
//! ## Usage
//! ```
//! use halfedge_graph::prelude::*;
//!
//! let mut g = Graph::new();
//! let v = g.new_node();
//! let w = g.new_node();
//! let e = g.new_edge(v, w);
//!
//! let weight: NodeArray<f64> = NodeArray::new(&g, 1.0);
//! weight.set(v, 2.5);
//!
//! let e2 = g.split(e);
//! assert_eq!(g.target(e2), w);
//! assert!(g.consistency_check());
//! ```
//!
//! [`NodeArray`]: crate::data::arrays::NodeArray
//! [`EdgeArray`]: crate::data::arrays::EdgeArray
//! [`AdjArray`]: crate::data::arrays::AdjArray

pub mod data;
pub mod debug_invariants;
pub mod error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::arrays::{AdjArray, EdgeArray, NodeArray};
    pub use crate::data::observer::GraphObserver;
    pub use crate::data::registry::{ArrayHandle, ArrayKind, ObserverHandle};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::error::GraphError;
    pub use crate::topology::components::CcsInfo;
    pub use crate::topology::graph::{AdjEntries, Direction, Graph};
    pub use crate::topology::ids::{AdjId, EdgeId, NodeId};
    pub use crate::topology::rebuild::{EdgeRemap, NodeRemap};
}
