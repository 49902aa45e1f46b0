//! Structural edit operations: endpoint moves, split/unsplit, contract,
//! node splitting, reversal, and hide/restore.
//!
//! All of these preserve the slot pairing between edges and adjacency
//! entries. Where an operation must keep an id stable across a change of
//! slot (edge splitting and its inverse), the adjacency record is
//! physically relocated and registered adjacency arrays are told to carry
//! their value along.

use crate::debug_invariants;
use crate::topology::graph::{Direction, Graph};
use crate::topology::ids::{AdjId, EdgeId, NodeId};

impl Graph {
    // ---------------------------------------------------------------------
    // Endpoint moves
    // ---------------------------------------------------------------------

    /// Moves the adjacency entry `a` of `a`'s edge to the `dir` side of
    /// `anchor`, re-homing that endpoint onto `anchor`'s node. Degrees and
    /// the edge record are updated; the entry's id is unchanged.
    pub fn move_adj_entry(&mut self, a: AdjId, anchor: AdjId, dir: Direction) {
        debug_assert_ne!(a, anchor, "entry cannot anchor itself");
        let old = self.adj_node(a);
        let new = self.adj_node(anchor);
        self.ring_unlink(a);
        self.ring_insert(anchor, a, dir);
        if old != new {
            let e = a.edge();
            let is_src = self.edge_rec(e).adj_src == a;
            if is_src {
                self.node_rec_mut(old).outdeg -= 1;
                self.node_rec_mut(new).outdeg += 1;
                self.edge_rec_mut(e).src = new;
            } else {
                self.node_rec_mut(old).indeg -= 1;
                self.node_rec_mut(new).indeg += 1;
                self.edge_rec_mut(e).tgt = new;
            }
        }
    }

    /// Re-homes the source of `e` onto `new_src`, appending the source
    /// entry at `new_src`'s ring tail.
    pub fn move_source(&mut self, e: EdgeId, new_src: NodeId) {
        debug_assert!(self.contains_node(new_src));
        let a = self.adj_source(e);
        let old = self.adj_node(a);
        self.ring_unlink(a);
        self.adj_rec_mut(a).node = new_src;
        self.ring_push_back(new_src, a);
        self.node_rec_mut(old).outdeg -= 1;
        self.node_rec_mut(new_src).outdeg += 1;
        self.edge_rec_mut(e).src = new_src;
    }

    /// Re-homes the source of `e` onto `anchor`'s node, placing the entry
    /// on the `dir` side of `anchor`.
    pub fn move_source_at(&mut self, e: EdgeId, anchor: AdjId, dir: Direction) {
        let a = self.adj_source(e);
        debug_assert_ne!(a, anchor, "entry cannot anchor itself");
        let old = self.adj_node(a);
        let new = self.adj_node(anchor);
        self.ring_unlink(a);
        self.ring_insert(anchor, a, dir);
        self.node_rec_mut(old).outdeg -= 1;
        self.node_rec_mut(new).outdeg += 1;
        self.edge_rec_mut(e).src = new;
    }

    /// Re-homes the target of `e` onto `new_tgt`, appending at the tail.
    pub fn move_target(&mut self, e: EdgeId, new_tgt: NodeId) {
        debug_assert!(self.contains_node(new_tgt));
        let a = self.adj_target(e);
        let old = self.adj_node(a);
        self.ring_unlink(a);
        self.adj_rec_mut(a).node = new_tgt;
        self.ring_push_back(new_tgt, a);
        self.node_rec_mut(old).indeg -= 1;
        self.node_rec_mut(new_tgt).indeg += 1;
        self.edge_rec_mut(e).tgt = new_tgt;
    }

    /// Re-homes the target of `e` onto `anchor`'s node, placing the entry
    /// on the `dir` side of `anchor`.
    pub fn move_target_at(&mut self, e: EdgeId, anchor: AdjId, dir: Direction) {
        let a = self.adj_target(e);
        debug_assert_ne!(a, anchor, "entry cannot anchor itself");
        let old = self.adj_node(a);
        let new = self.adj_node(anchor);
        self.ring_unlink(a);
        self.ring_insert(anchor, a, dir);
        self.node_rec_mut(old).indeg -= 1;
        self.node_rec_mut(new).indeg += 1;
        self.edge_rec_mut(e).tgt = new;
    }

    /// Moves both endpoints of `e` in one call, each entry landing on the
    /// given side of its anchor. Anchors must not belong to `e` itself.
    pub fn move_edge(
        &mut self,
        e: EdgeId,
        adj_src: AdjId,
        dir_src: Direction,
        adj_tgt: AdjId,
        dir_tgt: Direction,
    ) {
        debug_assert!(
            adj_src.edge() != e && adj_tgt.edge() != e,
            "anchors must not belong to the moved edge"
        );
        self.move_source_at(e, adj_src, dir_src);
        self.move_target_at(e, adj_tgt, dir_tgt);
    }

    // ---------------------------------------------------------------------
    // Reversal
    // ---------------------------------------------------------------------

    /// Reverses the direction of `e`. Ring positions of both adjacency
    /// entries are untouched; only the source/target roles swap.
    pub fn reverse_edge(&mut self, e: EdgeId) {
        debug_assert!(self.contains_edge(e));
        let (src, tgt) = {
            let rec = self.edge_rec_mut(e);
            std::mem::swap(&mut rec.src, &mut rec.tgt);
            std::mem::swap(&mut rec.adj_src, &mut rec.adj_tgt);
            (rec.src, rec.tgt)
        };
        if src != tgt {
            let r = self.node_rec_mut(src);
            r.outdeg += 1;
            r.indeg -= 1;
            let r = self.node_rec_mut(tgt);
            r.indeg += 1;
            r.outdeg -= 1;
        }
    }

    /// Reverses all edges of the graph.
    pub fn reverse_all_edges(&mut self) {
        let all: Vec<EdgeId> = self.edges().collect();
        for e in all {
            self.reverse_edge(e);
        }
    }

    /// Reverses the cyclic order of `v`'s adjacency ring in place. This is
    /// the local mirror operation on the embedding.
    pub fn reverse_adj_edges(&mut self, v: NodeId) {
        let mut cur = self.node_rec(v).first_adj;
        while let Some(a) = cur {
            let rec = self.adj_rec_mut(a);
            std::mem::swap(&mut rec.prev, &mut rec.next);
            // after the swap the old successor sits in `prev`
            cur = rec.prev;
        }
        let rec = self.node_rec_mut(v);
        std::mem::swap(&mut rec.first_adj, &mut rec.last_adj);
    }

    /// Mirrors the whole embedding by reversing every node's ring.
    pub fn reverse_all_adj_edges(&mut self) {
        let all: Vec<NodeId> = self.nodes().collect();
        for v in all {
            self.reverse_adj_edges(v);
        }
    }

    // ---------------------------------------------------------------------
    // Edge splitting and its inverse
    // ---------------------------------------------------------------------

    /// Splits `e` at a fresh node `u`: afterwards `e` runs from its old
    /// source to `u` and the returned edge runs from `u` to the old
    /// target. The returned edge takes over `e`'s old target-side ring
    /// position, and its target entry keeps attribute values that were
    /// stored under `e`'s target entry.
    pub fn split(&mut self, e: EdgeId) -> EdgeId {
        debug_assert!(self.contains_edge(e));
        let u = self.new_node();
        let e2 = self.alloc_edge_id();
        let old_tgt_slot = self.adj_target(e);
        let w = self.adj_node(old_tgt_slot);

        // e2's target half takes over e's record at the old target,
        // keeping the ring position (and any adjacency-array value).
        self.relocate_adj_slot(old_tgt_slot, e2.adj_slot1());

        // e now targets u; its target entry reuses the vacated slot id.
        self.adjs[old_tgt_slot.index()] = Some(crate::topology::graph::AdjRec {
            node: u,
            prev: None,
            next: None,
        });
        self.ring_push_back(u, old_tgt_slot);

        // e2's source half also sits at u.
        self.adjs[e2.adj_slot0().index()] = Some(crate::topology::graph::AdjRec {
            node: u,
            prev: None,
            next: None,
        });
        self.ring_push_back(u, e2.adj_slot0());

        self.edge_rec_mut(e).tgt = u;
        // adj_tgt of e is unchanged as an id; only its record moved to u.
        {
            let rec = self.node_rec_mut(u);
            rec.indeg = 1;
            rec.outdeg = 1;
        }
        self.edges[e2.index()] = Some(crate::topology::graph::EdgeRec {
            src: u,
            tgt: w,
            adj_src: e2.adj_slot0(),
            adj_tgt: e2.adj_slot1(),
            hidden: false,
        });
        self.num_edges += 1;
        self.registry.notify(|o| o.edge_added(e2));
        debug_invariants!(self.validate_invariants(), "split");
        e2
    }

    /// Undoes a split at the degree-(1,1) node `u`, deriving the incoming
    /// and outgoing edge from `u`'s ring.
    pub fn unsplit(&mut self, u: NodeId) {
        let mut it = self.adj_entries(u);
        let a = it.next().expect("split node has two incident edges");
        let b = it.next().expect("split node has two incident edges");
        let (e_in, e_out) = if self.target(a.edge()) == u {
            (a.edge(), b.edge())
        } else {
            (b.edge(), a.edge())
        };
        self.unsplit_edges(e_in, e_out);
    }

    /// Undoes a split: `e_in` must end at a degree-(1,1) node `u` where
    /// `e_out` begins. `e_in` is extended to `e_out`'s target (taking over
    /// `e_out`'s target-side ring position and attribute values), then
    /// `e_out` and `u` are deleted.
    pub fn unsplit_edges(&mut self, e_in: EdgeId, e_out: EdgeId) {
        let u = self.target(e_in);
        debug_assert_eq!(self.source(e_out), u, "edges do not meet at the split node");
        debug_assert_eq!(self.in_degree(u), 1, "split node must have in-degree 1");
        debug_assert_eq!(self.out_degree(u), 1, "split node must have out-degree 1");
        debug_assert!(!self.is_self_loop(e_in) && !self.is_self_loop(e_out));

        let w = self.target(e_out);
        let in_tgt_slot = self.adj_target(e_in);
        let out_src_slot = self.adj_source(e_out);
        let out_tgt_slot = self.adj_target(e_out);

        // Tear u's two ring entries out of the arena.
        self.ring_unlink(in_tgt_slot);
        self.ring_unlink(out_src_slot);
        self.adjs[in_tgt_slot.index()] = None;
        self.adjs[out_src_slot.index()] = None;

        // e_out's target record becomes e_in's target, id included, so the
        // ring position at w and any adjacency-array value survive.
        self.relocate_adj_slot(out_tgt_slot, in_tgt_slot);

        self.edge_rec_mut(e_in).tgt = w;
        self.edges[e_out.index()] = None;
        self.num_edges -= 1;
        self.nodes[u.index()] = None;
        self.num_nodes -= 1;
        self.registry.notify(|o| o.edge_deleted(e_out));
        self.registry.notify(|o| o.node_deleted(u));
        debug_invariants!(self.validate_invariants(), "unsplit");
    }

    // ---------------------------------------------------------------------
    // Contraction and node splitting
    // ---------------------------------------------------------------------

    /// Contracts `e = (v, w)`: every other edge incident to `w` is rewired
    /// onto `v` (parallel `v`-`w` edges become self-loops at `v`), `w`'s
    /// ring is spliced into `v`'s at `e`'s source position, and `e` and
    /// `w` are deleted. Returns the surviving node `v`.
    pub fn contract(&mut self, e: EdgeId) -> NodeId {
        debug_assert!(self.contains_edge(e));
        debug_assert!(!self.is_self_loop(e), "cannot contract a self-loop");
        let rec = *self.edge_rec(e);
        let (v, w) = (rec.src, rec.tgt);
        let anchor = rec.adj_src;
        let w_entry = rec.adj_tgt;

        // Walk w's ring once starting just past e's own entry, so splice
        // order mirrors w's rotation.
        let mut to_move = Vec::with_capacity(self.degree(w).saturating_sub(1));
        let mut a = self.cyclic_succ(w_entry);
        while a != w_entry {
            to_move.push(a);
            a = self.cyclic_succ(a);
        }
        for a in to_move {
            let ea = a.edge();
            if self.adj_source(ea) == a {
                self.move_source_at(ea, anchor, Direction::Before);
            } else {
                self.move_target_at(ea, anchor, Direction::Before);
            }
        }
        self.del_node(w);
        v
    }

    /// Splits a node into two along its ring: the entries from
    /// `adj_right` up to (excluding) `adj_left` move to a fresh node `w`,
    /// and a new edge from `adj_left`'s node to `w` is inserted before
    /// both boundary positions. Returns `w`.
    ///
    /// Both entries must be distinct entries of the same ring.
    pub fn split_node(&mut self, adj_left: AdjId, adj_right: AdjId) -> NodeId {
        let v = self.adj_node(adj_left);
        debug_assert_eq!(self.adj_node(adj_right), v, "entries belong to different rings");
        debug_assert_ne!(adj_left, adj_right, "boundary entries must differ");
        let w = self.new_node();
        let mut a = adj_right;
        while a != adj_left {
            let next = self.cyclic_succ(a);
            self.move_adj_to(a, w);
            a = next;
        }
        self.new_edge_between(adj_left, adj_right, Direction::Before);
        w
    }

    /// Moves a single ring entry to the tail of `w`'s ring, updating the
    /// entry's endpoint role on its edge.
    fn move_adj_to(&mut self, a: AdjId, w: NodeId) {
        let old = self.adj_node(a);
        self.ring_unlink(a);
        self.adj_rec_mut(a).node = w;
        self.ring_push_back(w, a);
        let e = a.edge();
        if self.edge_rec(e).adj_src == a {
            self.node_rec_mut(old).outdeg -= 1;
            self.node_rec_mut(w).outdeg += 1;
            self.edge_rec_mut(e).src = w;
        } else {
            self.node_rec_mut(old).indeg -= 1;
            self.node_rec_mut(w).indeg += 1;
            self.edge_rec_mut(e).tgt = w;
        }
    }

    // ---------------------------------------------------------------------
    // Hide and restore
    // ---------------------------------------------------------------------

    /// Temporarily removes `e` from both rings and the active edge count.
    /// The id stays reserved, attribute values stay put, and no observer
    /// events fire. Hiding is not nestable per edge.
    pub fn hide_edge(&mut self, e: EdgeId) {
        debug_assert!(self.contains_edge(e), "edge is dead or already hidden");
        let rec = *self.edge_rec(e);
        self.ring_unlink(rec.adj_src);
        self.ring_unlink(rec.adj_tgt);
        self.node_rec_mut(rec.src).outdeg -= 1;
        self.node_rec_mut(rec.tgt).indeg -= 1;
        self.edge_rec_mut(e).hidden = true;
        self.num_edges -= 1;
        self.hidden.push(e);
    }

    /// Brings a hidden edge back, appending both entries at their ring
    /// tails. The original ring positions are not remembered.
    pub fn restore_edge(&mut self, e: EdgeId) {
        debug_assert!(self.is_hidden(e), "edge is not hidden");
        let rec = *self.edge_rec(e);
        self.ring_push_back(rec.src, rec.adj_src);
        self.ring_push_back(rec.tgt, rec.adj_tgt);
        self.node_rec_mut(rec.src).outdeg += 1;
        self.node_rec_mut(rec.tgt).indeg += 1;
        self.edge_rec_mut(e).hidden = false;
        self.num_edges += 1;
        let pos = self
            .hidden
            .iter()
            .rposition(|&h| h == e)
            .expect("hidden list out of sync");
        self.hidden.remove(pos);
    }

    /// Restores every hidden edge, most recently hidden first.
    pub fn restore_all_edges(&mut self) {
        while let Some(&e) = self.hidden.last() {
            self.restore_edge(e);
        }
    }
}
