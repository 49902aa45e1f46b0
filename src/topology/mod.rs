//! Graph topology: the storage arena, ids, and every structural
//! operation.
//!
//! The submodules split the `Graph` impl by concern:
//! - [`graph`] holds the arena, entity creation/deletion, and queries
//! - `edits` holds compound edits (split, contract, hide, ...)
//! - [`rebuild`] holds whole-graph copies and subgraph construction
//! - [`components`] and [`faces`] derive component and embedding data
//! - `consistency` validates the whole arena

pub mod components;
mod consistency;
mod edits;
pub mod faces;
pub mod graph;
pub mod ids;
pub mod rebuild;

pub use components::CcsInfo;
pub use graph::{AdjEntries, Direction, Graph};
pub use ids::{AdjId, EdgeId, NodeId};
pub use rebuild::{EdgeRemap, NodeRemap};
