//! The storage arena and core mutation API.
//!
//! Nodes, edges, and adjacency entries live in three `Vec<Option<_>>`
//! slabs indexed by their dense ids; every cross-reference (owning node,
//! owning edge, twin, ring neighbors) is an id, never a pointer. Deleting
//! an entity tombstones its slot; ids are not reused until a bulk rebuild
//! (`clear`, `copy_from`, `construct_init_*`) renumbers densely from zero.
//!
//! Each node owns a doubly-linked *adjacency ring* of [`AdjId`]s — the
//! rotation system. Ring order is significant: it defines the embedding
//! consumed by face traversal and genus computation.
//!
//! # Contract
//!
//! Preconditions (live ids belonging to this graph, degree requirements
//! of `unsplit`, …) are the caller's responsibility: violations are caught
//! by `debug_assert!` in debug builds and are not checked in release
//! builds, where indexing a dead slot still aborts rather than corrupting
//! the arena. No operation leaves observable partial state.

use std::sync::Arc;

use crate::data::observer::GraphObserver;
use crate::data::registry::{ObserverHandle, Registry};
use crate::debug_invariants;
use crate::topology::ids::{AdjId, EdgeId, NodeId};

/// Smallest node-table capacity; attribute tables never shrink below it.
pub const MIN_NODE_TABLE_SIZE: usize = 1 << 4;
/// Smallest edge-table capacity. Adjacency tables are twice this.
pub const MIN_EDGE_TABLE_SIZE: usize = 1 << 4;

/// Ring insertion side relative to an anchor entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Insert before the anchor in ring order.
    Before,
    /// Insert after the anchor in ring order.
    After,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NodeRec {
    pub(crate) first_adj: Option<AdjId>,
    pub(crate) last_adj: Option<AdjId>,
    pub(crate) indeg: usize,
    pub(crate) outdeg: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct EdgeRec {
    pub(crate) src: NodeId,
    pub(crate) tgt: NodeId,
    /// Current source-side slot; swaps with `adj_tgt` under `reverse_edge`.
    pub(crate) adj_src: AdjId,
    pub(crate) adj_tgt: AdjId,
    pub(crate) hidden: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct AdjRec {
    /// Owning node (whose ring this entry sits in, unless hidden).
    pub(crate) node: NodeId,
    pub(crate) prev: Option<AdjId>,
    pub(crate) next: Option<AdjId>,
}

/// A mutable, embedded graph: the storage arena plus the mutation API.
pub struct Graph {
    pub(crate) nodes: Vec<Option<NodeRec>>,
    pub(crate) edges: Vec<Option<EdgeRec>>,
    pub(crate) adjs: Vec<Option<AdjRec>>,
    /// Live node count.
    pub(crate) num_nodes: usize,
    /// Live *active* edge count (hidden edges excluded).
    pub(crate) num_edges: usize,
    /// Hidden edges in hide order; `restore_all_edges` drains from the tail.
    pub(crate) hidden: Vec<EdgeId>,
    pub(crate) node_table_size: usize,
    pub(crate) edge_table_size: usize,
    pub(crate) registry: Arc<Registry>,
}

impl Graph {
    /// Creates an empty graph with minimum table capacities.
    pub fn new() -> Self {
        Graph {
            nodes: Vec::new(),
            edges: Vec::new(),
            adjs: Vec::new(),
            num_nodes: 0,
            num_edges: 0,
            hidden: Vec::new(),
            node_table_size: MIN_NODE_TABLE_SIZE,
            edge_table_size: MIN_EDGE_TABLE_SIZE,
            registry: Arc::new(Registry::new()),
        }
    }

    // ---------------------------------------------------------------------
    // Counts and id-space bounds
    // ---------------------------------------------------------------------

    /// Number of live nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of active (non-hidden) edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Number of currently hidden edges.
    #[inline]
    pub fn num_hidden_edges(&self) -> usize {
        self.hidden.len()
    }

    /// True if the graph has no live nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }

    /// Size of the node id space (one past the highest id ever assigned).
    #[inline]
    pub fn node_id_count(&self) -> usize {
        self.nodes.len()
    }

    /// Size of the edge id space.
    #[inline]
    pub fn edge_id_count(&self) -> usize {
        self.edges.len()
    }

    /// Size of the adjacency id space (always twice the edge id space).
    #[inline]
    pub fn adj_id_count(&self) -> usize {
        self.adjs.len()
    }

    /// Current node-table capacity of registered attribute arrays.
    #[inline]
    pub fn node_table_size(&self) -> usize {
        self.node_table_size
    }

    /// Current edge-table capacity of registered attribute arrays.
    #[inline]
    pub fn edge_table_size(&self) -> usize {
        self.edge_table_size
    }

    /// Current adjacency-table capacity of registered attribute arrays.
    #[inline]
    pub fn adj_table_size(&self) -> usize {
        self.edge_table_size << 1
    }

    // ---------------------------------------------------------------------
    // Record access (trust-the-caller: dead ids abort)
    // ---------------------------------------------------------------------

    #[inline]
    pub(crate) fn node_rec(&self, v: NodeId) -> &NodeRec {
        self.nodes[v.index()]
            .as_ref()
            .expect("NodeId is not live in this graph")
    }

    #[inline]
    pub(crate) fn node_rec_mut(&mut self, v: NodeId) -> &mut NodeRec {
        self.nodes[v.index()]
            .as_mut()
            .expect("NodeId is not live in this graph")
    }

    #[inline]
    pub(crate) fn edge_rec(&self, e: EdgeId) -> &EdgeRec {
        self.edges[e.index()]
            .as_ref()
            .expect("EdgeId is not live in this graph")
    }

    #[inline]
    pub(crate) fn edge_rec_mut(&mut self, e: EdgeId) -> &mut EdgeRec {
        self.edges[e.index()]
            .as_mut()
            .expect("EdgeId is not live in this graph")
    }

    #[inline]
    pub(crate) fn adj_rec(&self, a: AdjId) -> &AdjRec {
        self.adjs[a.index()]
            .as_ref()
            .expect("AdjId is not live in this graph")
    }

    #[inline]
    pub(crate) fn adj_rec_mut(&mut self, a: AdjId) -> &mut AdjRec {
        self.adjs[a.index()]
            .as_mut()
            .expect("AdjId is not live in this graph")
    }

    // ---------------------------------------------------------------------
    // Membership and entity queries
    // ---------------------------------------------------------------------

    /// True if `v` is a live node of this graph.
    #[inline]
    pub fn contains_node(&self, v: NodeId) -> bool {
        self.nodes.get(v.index()).is_some_and(Option::is_some)
    }

    /// True if `e` is a live, *active* edge (hidden edges excluded).
    #[inline]
    pub fn contains_edge(&self, e: EdgeId) -> bool {
        self.edges
            .get(e.index())
            .is_some_and(|slot| slot.as_ref().is_some_and(|rec| !rec.hidden))
    }

    /// True if `e` is currently hidden.
    #[inline]
    pub fn is_hidden(&self, e: EdgeId) -> bool {
        self.edges
            .get(e.index())
            .is_some_and(|slot| slot.as_ref().is_some_and(|rec| rec.hidden))
    }

    /// Source node of `e`.
    #[inline]
    pub fn source(&self, e: EdgeId) -> NodeId {
        self.edge_rec(e).src
    }

    /// Target node of `e`.
    #[inline]
    pub fn target(&self, e: EdgeId) -> NodeId {
        self.edge_rec(e).tgt
    }

    /// The endpoint of `e` other than `v` (equals `v` for a self-loop).
    #[inline]
    pub fn opposite(&self, e: EdgeId, v: NodeId) -> NodeId {
        let rec = self.edge_rec(e);
        debug_assert!(rec.src == v || rec.tgt == v, "node is not an endpoint");
        if rec.src == v { rec.tgt } else { rec.src }
    }

    /// True if both endpoints of `e` coincide.
    #[inline]
    pub fn is_self_loop(&self, e: EdgeId) -> bool {
        let rec = self.edge_rec(e);
        rec.src == rec.tgt
    }

    /// Source-side adjacency entry of `e`.
    #[inline]
    pub fn adj_source(&self, e: EdgeId) -> AdjId {
        self.edge_rec(e).adj_src
    }

    /// Target-side adjacency entry of `e`.
    #[inline]
    pub fn adj_target(&self, e: EdgeId) -> AdjId {
        self.edge_rec(e).adj_tgt
    }

    /// Node whose ring `a` belongs to.
    #[inline]
    pub fn adj_node(&self, a: AdjId) -> NodeId {
        self.adj_rec(a).node
    }

    /// Edge owning `a` (pure id arithmetic, validated in debug builds).
    #[inline]
    pub fn adj_edge(&self, a: AdjId) -> EdgeId {
        debug_assert!(
            self.adjs.get(a.index()).is_some_and(Option::is_some),
            "AdjId is not live in this graph"
        );
        a.edge()
    }

    /// Node at the far end of `a`'s edge.
    #[inline]
    pub fn twin_node(&self, a: AdjId) -> NodeId {
        self.adj_rec(a.twin()).node
    }

    /// In-degree of `v` (hidden incident edges do not count).
    #[inline]
    pub fn in_degree(&self, v: NodeId) -> usize {
        self.node_rec(v).indeg
    }

    /// Out-degree of `v`.
    #[inline]
    pub fn out_degree(&self, v: NodeId) -> usize {
        self.node_rec(v).outdeg
    }

    /// Total degree of `v`. A self-loop contributes 2.
    #[inline]
    pub fn degree(&self, v: NodeId) -> usize {
        let rec = self.node_rec(v);
        rec.indeg + rec.outdeg
    }

    // ---------------------------------------------------------------------
    // Iteration
    // ---------------------------------------------------------------------

    /// Live nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| NodeId::new(i)))
    }

    /// Active edges in id order (hidden edges excluded).
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref()
                .and_then(|rec| (!rec.hidden).then(|| EdgeId::new(i)))
        })
    }

    /// Hidden edges in hide order.
    pub fn hidden_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.hidden.iter().copied()
    }

    /// Adjacency entries of `v` in ring order.
    pub fn adj_entries(&self, v: NodeId) -> AdjEntries<'_> {
        AdjEntries {
            graph: self,
            next: self.node_rec(v).first_adj,
        }
    }

    /// First entry of `v`'s ring, if any.
    #[inline]
    pub fn first_adj(&self, v: NodeId) -> Option<AdjId> {
        self.node_rec(v).first_adj
    }

    /// Last entry of `v`'s ring, if any.
    #[inline]
    pub fn last_adj(&self, v: NodeId) -> Option<AdjId> {
        self.node_rec(v).last_adj
    }

    /// Ring successor of `a` within its node, non-wrapping.
    #[inline]
    pub fn adj_succ(&self, a: AdjId) -> Option<AdjId> {
        self.adj_rec(a).next
    }

    /// Ring predecessor of `a` within its node, non-wrapping.
    #[inline]
    pub fn adj_pred(&self, a: AdjId) -> Option<AdjId> {
        self.adj_rec(a).prev
    }

    /// Ring successor of `a`, wrapping to the ring head.
    #[inline]
    pub fn cyclic_succ(&self, a: AdjId) -> AdjId {
        let rec = self.adj_rec(a);
        rec.next
            .unwrap_or_else(|| self.node_rec(rec.node).first_adj.expect("ring is non-empty"))
    }

    /// Ring predecessor of `a`, wrapping to the ring tail.
    #[inline]
    pub fn cyclic_pred(&self, a: AdjId) -> AdjId {
        let rec = self.adj_rec(a);
        rec.prev
            .unwrap_or_else(|| self.node_rec(rec.node).last_adj.expect("ring is non-empty"))
    }

    /// Searches for any active edge between `v` and `w` (either
    /// orientation), scanning the smaller ring.
    pub fn search_edge(&self, v: NodeId, w: NodeId) -> Option<EdgeId> {
        let (scan, other) = if self.degree(w) < self.degree(v) {
            (w, v)
        } else {
            (v, w)
        };
        self.adj_entries(scan)
            .find(|&a| self.twin_node(a) == other)
            .map(AdjId::edge)
    }

    // ---------------------------------------------------------------------
    // Node creation and deletion
    // ---------------------------------------------------------------------

    /// Appends a node with the next dense id.
    pub fn new_node(&mut self) -> NodeId {
        let id = self.nodes.len();
        if id == self.node_table_size {
            self.node_table_size <<= 1;
            self.registry.enlarge_node_tables(self.node_table_size);
        }
        self.nodes.push(Some(NodeRec::default()));
        self.num_nodes += 1;
        let v = NodeId::new(id);
        self.registry.notify(|o| o.node_added(v));
        v
    }

    /// Creates a node with an explicit id, extending the id space (and
    /// growing attribute tables) as needed. The slot must not be live.
    pub fn new_node_with_id(&mut self, id: usize) -> NodeId {
        if id >= self.nodes.len() {
            self.nodes.resize_with(id + 1, || None);
            if id >= self.node_table_size {
                self.node_table_size = next_power2(self.node_table_size, id);
                self.registry.enlarge_node_tables(self.node_table_size);
            }
        }
        debug_assert!(self.nodes[id].is_none(), "node id {id} is already live");
        self.nodes[id] = Some(NodeRec::default());
        self.num_nodes += 1;
        let v = NodeId::new(id);
        self.registry.notify(|o| o.node_added(v));
        v
    }

    /// Deletes `v` and every incident edge. Edge deletion events fire
    /// before the node's own deletion event.
    ///
    /// Hidden edges incident to `v` must be restored first.
    pub fn del_node(&mut self, v: NodeId) {
        debug_assert!(self.contains_node(v), "delete of a dead node");
        debug_assert!(
            self.hidden.iter().all(|&h| {
                let rec = self.edge_rec(h);
                rec.src != v && rec.tgt != v
            }),
            "node still has hidden incident edges"
        );
        while let Some(a) = self.node_rec(v).first_adj {
            self.del_edge(a.edge());
        }
        self.nodes[v.index()] = None;
        self.num_nodes -= 1;
        self.registry.notify(|o| o.node_deleted(v));
    }

    // ---------------------------------------------------------------------
    // Edge creation and deletion
    // ---------------------------------------------------------------------

    /// Reserves the next edge id and its two adjacency slots, growing
    /// attribute tables when the capacity is reached.
    pub(crate) fn alloc_edge_id(&mut self) -> EdgeId {
        let id = self.edges.len();
        if id == self.edge_table_size {
            self.edge_table_size <<= 1;
            self.registry.enlarge_edge_tables(self.edge_table_size);
        }
        self.edges.push(None);
        self.adjs.push(None);
        self.adjs.push(None);
        EdgeId::new(id)
    }

    fn install_edge(&mut self, e: EdgeId, v: NodeId, w: NodeId) {
        let (s, t) = (e.adj_slot0(), e.adj_slot1());
        self.edges[e.index()] = Some(EdgeRec {
            src: v,
            tgt: w,
            adj_src: s,
            adj_tgt: t,
            hidden: false,
        });
        self.num_edges += 1;
        self.registry.notify(|o| o.edge_added(e));
    }

    /// Creates the edge `(v, w)`, appending both adjacency entries at
    /// their ring tails.
    pub fn new_edge(&mut self, v: NodeId, w: NodeId) -> EdgeId {
        debug_assert!(self.contains_node(v), "source is not a live node");
        debug_assert!(self.contains_node(w), "target is not a live node");
        let e = self.alloc_edge_id();
        let (s, t) = (e.adj_slot0(), e.adj_slot1());
        self.adjs[s.index()] = Some(AdjRec {
            node: v,
            prev: None,
            next: None,
        });
        self.adjs[t.index()] = Some(AdjRec {
            node: w,
            prev: None,
            next: None,
        });
        self.ring_push_back(v, s);
        self.node_rec_mut(v).outdeg += 1;
        self.ring_push_back(w, t);
        self.node_rec_mut(w).indeg += 1;
        self.install_edge(e, v, w);
        e
    }

    /// Creates the edge `(v, w)` with an explicit edge id, extending the
    /// id space as needed. The slot must not be live.
    pub fn new_edge_with_id(&mut self, v: NodeId, w: NodeId, id: usize) -> EdgeId {
        debug_assert!(self.contains_node(v), "source is not a live node");
        debug_assert!(self.contains_node(w), "target is not a live node");
        if id >= self.edges.len() {
            self.edges.resize_with(id + 1, || None);
            self.adjs.resize_with((id + 1) << 1, || None);
            if id >= self.edge_table_size {
                self.edge_table_size = next_power2(self.edge_table_size, id);
                self.registry.enlarge_edge_tables(self.edge_table_size);
            }
        }
        let e = EdgeId::new(id);
        let (s, t) = (e.adj_slot0(), e.adj_slot1());
        debug_assert!(self.edges[id].is_none(), "edge id {id} is already live");
        debug_assert!(self.adjs[s.index()].is_none() && self.adjs[t.index()].is_none());
        self.adjs[s.index()] = Some(AdjRec {
            node: v,
            prev: None,
            next: None,
        });
        self.adjs[t.index()] = Some(AdjRec {
            node: w,
            prev: None,
            next: None,
        });
        self.ring_push_back(v, s);
        self.node_rec_mut(v).outdeg += 1;
        self.ring_push_back(w, t);
        self.node_rec_mut(w).indeg += 1;
        self.install_edge(e, v, w);
        e
    }

    /// Creates an edge from `adj_start`'s node to `adj_end`'s node, with
    /// both adjacency entries inserted on the `dir` side of their anchors.
    pub fn new_edge_between(&mut self, adj_start: AdjId, adj_end: AdjId, dir: Direction) -> EdgeId {
        let v = self.adj_node(adj_start);
        let w = self.adj_node(adj_end);
        let e = self.alloc_edge_id();
        let (s, t) = (e.adj_slot0(), e.adj_slot1());
        self.adjs[s.index()] = Some(AdjRec {
            node: v,
            prev: None,
            next: None,
        });
        self.adjs[t.index()] = Some(AdjRec {
            node: w,
            prev: None,
            next: None,
        });
        match dir {
            Direction::After => {
                self.ring_insert_after(adj_end, t);
                self.ring_insert_after(adj_start, s);
            }
            Direction::Before => {
                self.ring_insert_before(adj_end, t);
                self.ring_insert_before(adj_start, s);
            }
        }
        self.node_rec_mut(w).indeg += 1;
        self.node_rec_mut(v).outdeg += 1;
        self.install_edge(e, v, w);
        e
    }

    /// Creates an edge from `v` (ring tail) to `adj_end`'s node, with the
    /// target entry inserted after `adj_end`.
    pub fn new_edge_to_anchor(&mut self, v: NodeId, adj_end: AdjId) -> EdgeId {
        debug_assert!(self.contains_node(v), "source is not a live node");
        let w = self.adj_node(adj_end);
        let e = self.alloc_edge_id();
        let (s, t) = (e.adj_slot0(), e.adj_slot1());
        self.adjs[s.index()] = Some(AdjRec {
            node: v,
            prev: None,
            next: None,
        });
        self.adjs[t.index()] = Some(AdjRec {
            node: w,
            prev: None,
            next: None,
        });
        self.ring_insert_after(adj_end, t);
        self.node_rec_mut(w).indeg += 1;
        self.ring_push_back(v, s);
        self.node_rec_mut(v).outdeg += 1;
        self.install_edge(e, v, w);
        e
    }

    /// Creates an edge from `adj_start`'s node to `v` (ring tail), with
    /// the source entry inserted after `adj_start`.
    pub fn new_edge_from_anchor(&mut self, adj_start: AdjId, v: NodeId) -> EdgeId {
        debug_assert!(self.contains_node(v), "target is not a live node");
        let w = self.adj_node(adj_start);
        let e = self.alloc_edge_id();
        let (s, t) = (e.adj_slot0(), e.adj_slot1());
        self.adjs[s.index()] = Some(AdjRec {
            node: w,
            prev: None,
            next: None,
        });
        self.adjs[t.index()] = Some(AdjRec {
            node: v,
            prev: None,
            next: None,
        });
        self.ring_insert_after(adj_start, s);
        self.node_rec_mut(w).outdeg += 1;
        self.ring_push_back(v, t);
        self.node_rec_mut(v).indeg += 1;
        self.install_edge(e, w, v);
        e
    }

    /// Deletes the active edge `e`, unlinking both adjacency entries.
    pub fn del_edge(&mut self, e: EdgeId) {
        debug_assert!(self.contains_edge(e), "delete of a dead or hidden edge");
        let rec = *self.edge_rec(e);
        self.ring_unlink(rec.adj_src);
        self.ring_unlink(rec.adj_tgt);
        self.node_rec_mut(rec.src).outdeg -= 1;
        self.node_rec_mut(rec.tgt).indeg -= 1;
        self.adjs[rec.adj_src.index()] = None;
        self.adjs[rec.adj_tgt.index()] = None;
        self.edges[e.index()] = None;
        self.num_edges -= 1;
        self.registry.notify(|o| o.edge_deleted(e));
    }

    // ---------------------------------------------------------------------
    // Bulk operations
    // ---------------------------------------------------------------------

    /// Discards all entities (hidden edges included), resets the id space
    /// and table capacities to the minimum, and reinitializes every
    /// registered attribute array. Observers are told `cleared` first.
    pub fn clear(&mut self) {
        self.registry.notify(|o| o.cleared());
        self.raw_clear();
        self.registry
            .reinit_all(self.node_table_size, self.edge_table_size);
        debug_invariants!(self.validate_invariants(), "clear");
    }

    /// Structure reset without any observer or array interaction; bulk
    /// rebuild operations follow up with their own reinit/notify.
    pub(crate) fn raw_clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.adjs.clear();
        self.hidden.clear();
        self.num_nodes = 0;
        self.num_edges = 0;
        self.node_table_size = MIN_NODE_TABLE_SIZE;
        self.edge_table_size = MIN_EDGE_TABLE_SIZE;
    }

    /// Shrinks the edge id space to `max_id + 1` after bulk edge removal.
    /// Every live or hidden edge id must already be `<= max_id`.
    pub fn reset_edge_id_count(&mut self, max_id: usize) {
        #[cfg(debug_assertions)]
        for (i, slot) in self.edges.iter().enumerate() {
            debug_assert!(
                slot.is_none() || i <= max_id,
                "live edge id {i} exceeds requested maximum {max_id}"
            );
        }
        self.edges.truncate(max_id + 1);
        self.adjs.truncate((max_id + 1) << 1);
    }

    // ---------------------------------------------------------------------
    // Observer registration
    // ---------------------------------------------------------------------

    /// Subscribes `observer` to lifecycle events. The graph keeps only a
    /// weak reference; dropping the observer is equivalent to (lazy)
    /// unregistration.
    pub fn register_observer<O: GraphObserver + 'static>(&self, observer: &Arc<O>) -> ObserverHandle {
        let weak: std::sync::Weak<O> = Arc::downgrade(observer);
        let weak: std::sync::Weak<dyn GraphObserver> = weak;
        self.registry.register_observer(weak)
    }

    /// Removes a previously registered observer.
    pub fn unregister_observer(&self, handle: ObserverHandle) {
        self.registry.unregister_observer(handle);
    }

    // ---------------------------------------------------------------------
    // Ring maintenance (crate-internal)
    // ---------------------------------------------------------------------

    /// Appends `a` at the tail of `v`'s ring. The record's `node` field
    /// must already be `v`.
    pub(crate) fn ring_push_back(&mut self, v: NodeId, a: AdjId) {
        debug_assert_eq!(self.adj_rec(a).node, v);
        let last = self.node_rec(v).last_adj;
        {
            let rec = self.adj_rec_mut(a);
            rec.prev = last;
            rec.next = None;
        }
        match last {
            Some(l) => self.adj_rec_mut(l).next = Some(a),
            None => self.node_rec_mut(v).first_adj = Some(a),
        }
        self.node_rec_mut(v).last_adj = Some(a);
    }

    /// Inserts `a` directly after `anchor` in `anchor`'s ring.
    pub(crate) fn ring_insert_after(&mut self, anchor: AdjId, a: AdjId) {
        let (v, next) = {
            let rec = self.adj_rec(anchor);
            (rec.node, rec.next)
        };
        {
            let rec = self.adj_rec_mut(a);
            rec.node = v;
            rec.prev = Some(anchor);
            rec.next = next;
        }
        self.adj_rec_mut(anchor).next = Some(a);
        match next {
            Some(n) => self.adj_rec_mut(n).prev = Some(a),
            None => self.node_rec_mut(v).last_adj = Some(a),
        }
    }

    /// Inserts `a` directly before `anchor` in `anchor`'s ring.
    pub(crate) fn ring_insert_before(&mut self, anchor: AdjId, a: AdjId) {
        let (v, prev) = {
            let rec = self.adj_rec(anchor);
            (rec.node, rec.prev)
        };
        {
            let rec = self.adj_rec_mut(a);
            rec.node = v;
            rec.prev = prev;
            rec.next = Some(anchor);
        }
        self.adj_rec_mut(anchor).prev = Some(a);
        match prev {
            Some(p) => self.adj_rec_mut(p).next = Some(a),
            None => self.node_rec_mut(v).first_adj = Some(a),
        }
    }

    /// Generic `dir`-relative insertion.
    pub(crate) fn ring_insert(&mut self, anchor: AdjId, a: AdjId, dir: Direction) {
        match dir {
            Direction::Before => self.ring_insert_before(anchor, a),
            Direction::After => self.ring_insert_after(anchor, a),
        }
    }

    /// Removes `a` from its ring without freeing the slot (the record
    /// survives for hide/restore and relocation).
    pub(crate) fn ring_unlink(&mut self, a: AdjId) {
        let (v, prev, next) = {
            let rec = self.adj_rec(a);
            (rec.node, rec.prev, rec.next)
        };
        match prev {
            Some(p) => self.adj_rec_mut(p).next = next,
            None => self.node_rec_mut(v).first_adj = next,
        }
        match next {
            Some(n) => self.adj_rec_mut(n).prev = prev,
            None => self.node_rec_mut(v).last_adj = prev,
        }
        let rec = self.adj_rec_mut(a);
        rec.prev = None;
        rec.next = None;
    }

    /// Moves an adjacency record between slots, preserving its ring
    /// position, and relocates registered adjacency-array values with it.
    /// The destination slot must be vacant.
    pub(crate) fn relocate_adj_slot(&mut self, old: AdjId, new: AdjId) {
        debug_assert!(self.adjs[new.index()].is_none(), "slot collision");
        let rec = self.adjs[old.index()]
            .take()
            .expect("relocating a dead adjacency slot");
        let (v, prev, next) = (rec.node, rec.prev, rec.next);
        self.adjs[new.index()] = Some(rec);
        match prev {
            Some(p) => self.adj_rec_mut(p).next = Some(new),
            None => self.node_rec_mut(v).first_adj = Some(new),
        }
        match next {
            Some(n) => self.adj_rec_mut(n).prev = Some(new),
            None => self.node_rec_mut(v).last_adj = Some(new),
        }
        self.registry.reset_adj_index(new.index(), old.index());
    }
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new()
    }
}

impl Drop for Graph {
    fn drop(&mut self) {
        // Hidden edges come back first so teardown sees one well-defined
        // state; observers then get `disconnected` instead of deletions.
        self.restore_all_edges();
        self.registry.disconnect_all();
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("num_nodes", &self.num_nodes)
            .field("num_edges", &self.num_edges)
            .field("num_hidden_edges", &self.hidden.len())
            .field("node_id_count", &self.nodes.len())
            .field("edge_id_count", &self.edges.len())
            .finish()
    }
}

/// Ring-order iterator over a node's adjacency entries.
pub struct AdjEntries<'a> {
    graph: &'a Graph,
    next: Option<AdjId>,
}

impl Iterator for AdjEntries<'_> {
    type Item = AdjId;

    fn next(&mut self) -> Option<AdjId> {
        let a = self.next?;
        self.next = self.graph.adj_rec(a).next;
        Some(a)
    }
}

/// Smallest power-of-two multiple of `start` strictly above `id_count`.
pub(crate) fn next_power2(mut start: usize, id_count: usize) -> usize {
    while start <= id_count {
        start <<= 1;
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_and_edge_basics() {
        let mut g = Graph::new();
        let v = g.new_node();
        let w = g.new_node();
        let e = g.new_edge(v, w);
        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.num_edges(), 1);
        assert_eq!(g.source(e), v);
        assert_eq!(g.target(e), w);
        assert_eq!(g.out_degree(v), 1);
        assert_eq!(g.in_degree(w), 1);
        assert_eq!(g.opposite(e, v), w);
        assert_eq!(g.search_edge(w, v), Some(e));
    }

    #[test]
    fn ring_order_is_insertion_order() {
        let mut g = Graph::new();
        let v = g.new_node();
        let others: Vec<_> = (0..3).map(|_| g.new_node()).collect();
        let edges: Vec<_> = others.iter().map(|&w| g.new_edge(v, w)).collect();
        let ring: Vec<_> = g.adj_entries(v).map(|a| a.edge()).collect();
        assert_eq!(ring, edges);
        // cyclic accessors wrap
        let first = g.first_adj(v).unwrap();
        let last = g.last_adj(v).unwrap();
        assert_eq!(g.cyclic_pred(first), last);
        assert_eq!(g.cyclic_succ(last), first);
    }

    #[test]
    fn self_loop_occupies_ring_twice() {
        let mut g = Graph::new();
        let v = g.new_node();
        let e = g.new_edge(v, v);
        assert!(g.is_self_loop(e));
        assert_eq!(g.degree(v), 2);
        assert_eq!(g.adj_entries(v).count(), 2);
        g.del_edge(e);
        assert_eq!(g.degree(v), 0);
        assert_eq!(g.adj_entries(v).count(), 0);
    }

    #[test]
    fn del_node_cascades() {
        let mut g = Graph::new();
        let v = g.new_node();
        let w = g.new_node();
        let x = g.new_node();
        g.new_edge(v, w);
        g.new_edge(w, x);
        g.new_edge(w, w);
        g.del_node(w);
        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.num_edges(), 0);
        assert_eq!(g.degree(v), 0);
        assert_eq!(g.degree(x), 0);
    }

    #[test]
    fn explicit_ids_extend_the_id_space() {
        let mut g = Graph::new();
        let v = g.new_node_with_id(40);
        assert_eq!(v.index(), 40);
        assert_eq!(g.node_id_count(), 41);
        assert!(g.node_table_size() >= 41);
        let w = g.new_node();
        assert_eq!(w.index(), 41);
        let e = g.new_edge_with_id(v, w, 20);
        assert_eq!(e.index(), 20);
        assert_eq!(g.edge_id_count(), 21);
        assert!(g.adj_id_count() >= 42);
    }

    #[test]
    fn anchored_edge_creation_places_entries() {
        let mut g = Graph::new();
        let v = g.new_node();
        let w = g.new_node();
        let e0 = g.new_edge(v, w);
        let anchor_v = g.adj_source(e0);
        let anchor_w = g.adj_target(e0);
        let e1 = g.new_edge_between(anchor_v, anchor_w, Direction::After);
        let ring_v: Vec<_> = g.adj_entries(v).map(|a| a.edge()).collect();
        assert_eq!(ring_v, vec![e0, e1]);
        let e2 = g.new_edge_between(anchor_v, anchor_w, Direction::Before);
        let ring_v: Vec<_> = g.adj_entries(v).map(|a| a.edge()).collect();
        assert_eq!(ring_v, vec![e2, e0, e1]);
    }

    #[test]
    fn next_power2_doubles_past_count() {
        assert_eq!(next_power2(16, 0), 16);
        assert_eq!(next_power2(16, 15), 16);
        assert_eq!(next_power2(16, 16), 32);
        assert_eq!(next_power2(16, 100), 128);
    }
}
