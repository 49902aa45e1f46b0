//! Auxiliary per-entity attribute arrays.
//!
//! A [`NodeArray`], [`EdgeArray`], or [`AdjArray`] associates one value of
//! type `T` with every id of the matching kind. The table is sized to the
//! graph's current capacity at construction and the graph keeps it sized
//! from then on: capacity doubling on id-space growth (`enlarge`), wholesale
//! reinitialization on `clear`/rebuild (`reinit`), and index relocation when
//! `split`/`unsplit` transfer a half-edge between slots (`reset_index`).
//!
//! Arrays are owned by external code; the graph's registry holds only a
//! `Weak` reference to the backing store. An array self-registers at
//! construction and self-unregisters on `Drop`. Dropping the graph first
//! merely detaches the array — its values remain readable.
//!
//! Access goes through a `parking_lot::RwLock` on the backing store
//! (`get`/`set` for single slots, `with`/`with_mut` for bulk access). The
//! lock exists because the graph resizes the store from its side of the
//! `Arc`; it is uncontended in the single-threaded mutation model.

use parking_lot::RwLock;
use std::sync::{Arc, Weak};

use crate::data::registry::{ArrayHandle, ArrayKind, RawArray, Registry};
use crate::topology::graph::Graph;
use crate::topology::ids::{AdjId, EdgeId, NodeId};

/// Shared backing store of one attribute array.
pub(crate) struct Store<T> {
    data: Vec<T>,
    default: T,
    attached: bool,
}

impl<T: Clone + Send + Sync> RawArray for RwLock<Store<T>> {
    fn enlarge(&self, new_cap: usize) {
        let mut store = self.write();
        let fill = store.default.clone();
        store.data.resize(new_cap, fill);
    }

    fn reinit(&self, new_cap: usize) {
        let mut store = self.write();
        let fill = store.default.clone();
        store.data.clear();
        store.data.resize(new_cap, fill);
    }

    fn reset_index(&self, new_id: usize, old_id: usize) {
        let mut store = self.write();
        let moved = store.data[old_id].clone();
        let fill = store.default.clone();
        store.data[new_id] = moved;
        store.data[old_id] = fill;
    }

    fn disconnect(&self) {
        self.write().attached = false;
    }
}

macro_rules! entity_array {
    ($(#[$doc:meta])* $name:ident, $id:ty, $kind:expr, $cap:ident) => {
        $(#[$doc])*
        pub struct $name<T> {
            store: Arc<RwLock<Store<T>>>,
            registry: Weak<Registry>,
            handle: ArrayHandle,
        }

        impl<T: Clone + Send + Sync + 'static> $name<T> {
            /// Creates an array over `graph`'s id space, every slot holding
            /// `default`, and registers it for capacity maintenance.
            pub fn new(graph: &Graph, default: T) -> Self {
                let cap = graph.$cap();
                let store = Arc::new(RwLock::new(Store {
                    data: vec![default.clone(); cap],
                    default,
                    attached: true,
                }));
                let weak: Weak<RwLock<Store<T>>> = Arc::downgrade(&store);
                let raw: Weak<dyn RawArray> = weak;
                let handle = graph.registry.register_array($kind, raw);
                Self {
                    store,
                    registry: Arc::downgrade(&graph.registry),
                    handle,
                }
            }

            /// Value at `id`. Panics if `id` lies outside the table.
            #[inline]
            pub fn get(&self, id: $id) -> T {
                self.store.read().data[id.index()].clone()
            }

            /// Overwrites the value at `id`.
            #[inline]
            pub fn set(&self, id: $id, value: T) {
                self.store.write().data[id.index()] = value;
            }

            /// Read access to the whole table.
            pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
                f(&self.store.read().data)
            }

            /// Write access to the whole table.
            pub fn with_mut<R>(&self, f: impl FnOnce(&mut [T]) -> R) -> R {
                f(&mut self.store.write().data)
            }

            /// Current table capacity (the graph keeps this at least the
            /// id-space size).
            pub fn capacity(&self) -> usize {
                self.store.read().data.len()
            }

            /// False once the observed graph has been dropped.
            pub fn is_attached(&self) -> bool {
                self.store.read().attached
            }

            /// Exchanges the contents of two arrays in O(1) by retargeting
            /// both registry handles to the swapped stores. Each array
            /// stays registered with its own graph.
            pub fn swap(&mut self, other: &mut Self) {
                std::mem::swap(&mut self.store, &mut other.store);
                if let Some(registry) = self.registry.upgrade() {
                    let weak: Weak<RwLock<Store<T>>> = Arc::downgrade(&self.store);
                    let raw: Weak<dyn RawArray> = weak;
                    registry.retarget_array(self.handle, raw);
                }
                if let Some(registry) = other.registry.upgrade() {
                    let weak: Weak<RwLock<Store<T>>> = Arc::downgrade(&other.store);
                    let raw: Weak<dyn RawArray> = weak;
                    registry.retarget_array(other.handle, raw);
                }
            }
        }

        impl<T> Drop for $name<T> {
            fn drop(&mut self) {
                if let Some(registry) = self.registry.upgrade() {
                    registry.unregister_array(self.handle);
                }
            }
        }

        impl<T: std::fmt::Debug> std::fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let store = self.store.read();
                f.debug_struct(stringify!($name))
                    .field("capacity", &store.data.len())
                    .field("attached", &store.attached)
                    .finish()
            }
        }
    };
}

entity_array!(
    /// Attribute table keyed by [`NodeId`].
    NodeArray,
    NodeId,
    ArrayKind::Node,
    node_table_size
);

entity_array!(
    /// Attribute table keyed by [`EdgeId`].
    EdgeArray,
    EdgeId,
    ArrayKind::Edge,
    edge_table_size
);

entity_array!(
    /// Attribute table keyed by [`AdjId`]. Twice the edge capacity, since
    /// every edge owns two adjacency slots.
    AdjArray,
    AdjId,
    ArrayKind::Adj,
    adj_table_size
);
