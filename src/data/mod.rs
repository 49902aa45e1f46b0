//! Data layer: attribute arrays, their registry, and observers.
#![warn(missing_docs)]

pub mod arrays;
pub mod observer;
pub(crate) mod registry;

pub use arrays::{AdjArray, EdgeArray, NodeArray};
pub use observer::GraphObserver;
pub use registry::{ArrayHandle, ArrayKind, ObserverHandle};
