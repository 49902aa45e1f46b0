//! Subscription registry linking a graph to its auxiliary arrays and observers.
//!
//! The registry is the one place in the crate with internal locking: a
//! `parking_lot::Mutex` per subscriber list, so that (un)registration of
//! *different* arrays or observers may race safely with each other. It
//! deliberately does **not** serialize against structural edits — callers
//! confine a graph instance to one thread or serialize mutation
//! themselves.
//!
//! Subscribers are held as `Weak` capability references (the
//! weak-backreference pattern): the external object owns its storage, the
//! registry can only grow, reinitialize, or disconnect it. A subscriber
//! that was dropped without unregistering upgrades to `None` and is
//! skipped.

use parking_lot::Mutex;
use std::sync::Weak;

use crate::data::observer::GraphObserver;

/// Which id space an auxiliary array is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    /// Keyed by node id.
    Node,
    /// Keyed by edge id.
    Edge,
    /// Keyed by adjacency-entry id (twice the edge capacity).
    Adj,
}

/// Opaque handle identifying a registered auxiliary array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayHandle {
    pub(crate) kind: ArrayKind,
    pub(crate) slot: usize,
}

/// Opaque handle identifying a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverHandle(pub(crate) usize);

/// Type-erased capability surface of a registered auxiliary array.
///
/// Implemented on the array's shared backing store; the registry never
/// sees the element type.
pub(crate) trait RawArray: Send + Sync {
    /// Grow the table to `new_cap`, preserving values by index and
    /// default-filling new slots.
    fn enlarge(&self, new_cap: usize);
    /// Drop all values and reinitialize at `new_cap`.
    fn reinit(&self, new_cap: usize);
    /// Relocate the value at `old_id` to `new_id`, resetting `old_id` to
    /// the default. Fired when a structural edit transfers a half-edge
    /// between adjacency slots.
    fn reset_index(&self, new_id: usize, old_id: usize);
    /// The graph is being torn down; the store outlives it detached.
    fn disconnect(&self);
}

type ArrayList = Mutex<Vec<Option<Weak<dyn RawArray>>>>;

pub(crate) struct Registry {
    node_arrays: ArrayList,
    edge_arrays: ArrayList,
    adj_arrays: ArrayList,
    observers: Mutex<Vec<Option<Weak<dyn GraphObserver>>>>,
}

fn insert<T>(list: &mut Vec<Option<T>>, value: T) -> usize {
    match list.iter().position(Option::is_none) {
        Some(slot) => {
            list[slot] = Some(value);
            slot
        }
        None => {
            list.push(Some(value));
            list.len() - 1
        }
    }
}

impl Registry {
    pub(crate) fn new() -> Self {
        Registry {
            node_arrays: Mutex::new(Vec::new()),
            edge_arrays: Mutex::new(Vec::new()),
            adj_arrays: Mutex::new(Vec::new()),
            observers: Mutex::new(Vec::new()),
        }
    }

    fn list(&self, kind: ArrayKind) -> &ArrayList {
        match kind {
            ArrayKind::Node => &self.node_arrays,
            ArrayKind::Edge => &self.edge_arrays,
            ArrayKind::Adj => &self.adj_arrays,
        }
    }

    pub(crate) fn register_array(
        &self,
        kind: ArrayKind,
        array: Weak<dyn RawArray>,
    ) -> ArrayHandle {
        let slot = insert(&mut self.list(kind).lock(), array);
        ArrayHandle { kind, slot }
    }

    pub(crate) fn unregister_array(&self, handle: ArrayHandle) {
        self.list(handle.kind).lock()[handle.slot] = None;
    }

    /// Point an existing handle at a different backing store, in place.
    ///
    /// Used by the arrays' O(1) `swap`, which exchanges two stores while
    /// each handle keeps its registry slot.
    pub(crate) fn retarget_array(&self, handle: ArrayHandle, array: Weak<dyn RawArray>) {
        self.list(handle.kind).lock()[handle.slot] = Some(array);
    }

    pub(crate) fn register_observer(&self, observer: Weak<dyn GraphObserver>) -> ObserverHandle {
        ObserverHandle(insert(&mut self.observers.lock(), observer))
    }

    pub(crate) fn unregister_observer(&self, handle: ObserverHandle) {
        self.observers.lock()[handle.0] = None;
    }

    fn for_each_array(&self, kind: ArrayKind, f: impl Fn(&dyn RawArray)) {
        let mut list = self.list(kind).lock();
        for slot in list.iter_mut() {
            match slot.as_ref().map(Weak::upgrade) {
                Some(Some(array)) => f(&*array),
                Some(None) => *slot = None, // subscriber dropped without unregistering
                None => {}
            }
        }
    }

    pub(crate) fn enlarge_node_tables(&self, new_cap: usize) {
        self.for_each_array(ArrayKind::Node, |a| a.enlarge(new_cap));
    }

    pub(crate) fn enlarge_edge_tables(&self, new_cap: usize) {
        self.for_each_array(ArrayKind::Edge, |a| a.enlarge(new_cap));
        self.for_each_array(ArrayKind::Adj, |a| a.enlarge(new_cap << 1));
    }

    pub(crate) fn reinit_all(&self, node_cap: usize, edge_cap: usize) {
        self.for_each_array(ArrayKind::Node, |a| a.reinit(node_cap));
        self.for_each_array(ArrayKind::Edge, |a| a.reinit(edge_cap));
        self.for_each_array(ArrayKind::Adj, |a| a.reinit(edge_cap << 1));
    }

    pub(crate) fn reset_adj_index(&self, new_id: usize, old_id: usize) {
        self.for_each_array(ArrayKind::Adj, |a| a.reset_index(new_id, old_id));
    }

    /// Fire one lifecycle event to every live observer.
    ///
    /// The list is snapshotted before invoking callbacks so a callback can
    /// never contend on the registry lock.
    pub(crate) fn notify(&self, event: impl Fn(&dyn GraphObserver)) {
        let snapshot: Vec<Weak<dyn GraphObserver>> =
            self.observers.lock().iter().flatten().cloned().collect();
        for weak in snapshot {
            if let Some(observer) = weak.upgrade() {
                event(&*observer);
            }
        }
    }

    /// Graph teardown: arrays are detached, observers told `disconnected`.
    pub(crate) fn disconnect_all(&self) {
        for kind in [ArrayKind::Node, ArrayKind::Edge, ArrayKind::Adj] {
            self.for_each_array(kind, |a| a.disconnect());
        }
        self.notify(|o| o.disconnected());
        self.observers.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_reuse_vacated_slots() {
        let mut list: Vec<Option<u32>> = Vec::new();
        assert_eq!(insert(&mut list, 1), 0);
        assert_eq!(insert(&mut list, 2), 1);
        list[0] = None;
        assert_eq!(insert(&mut list, 3), 0);
        assert_eq!(insert(&mut list, 4), 2);
    }
}
