//! Bulk structure rebuilds: whole-graph copies and induced-subgraph
//! construction. These are the only operations that renumber ids; every
//! rebuild produces a dense id space starting at zero and reinitializes
//! registered attribute arrays, then tells observers `re_init`.

use crate::debug_invariants;
use crate::topology::components::CcsInfo;
use crate::topology::graph::{
    next_power2, AdjRec, EdgeRec, Graph, NodeRec, MIN_EDGE_TABLE_SIZE, MIN_NODE_TABLE_SIZE,
};
use crate::topology::ids::{EdgeId, NodeId};

/// Maps source-graph node ids to rebuilt ids; unmapped slots stay `None`.
pub type NodeRemap = Vec<Option<NodeId>>;
/// Maps source-graph edge ids to rebuilt ids; unmapped slots stay `None`.
pub type EdgeRemap = Vec<Option<EdgeId>>;

impl Graph {
    /// Replaces this graph's structure with a copy of `src`, returning
    /// the id remaps. Ring order of every node is preserved. Observers see
    /// `cleared` before the teardown and `re_init` once the new structure
    /// stands; registered arrays are reinitialized to the new capacities.
    pub fn copy_from_with_maps(&mut self, src: &Graph) -> (NodeRemap, EdgeRemap) {
        self.registry.notify(|o| o.cleared());
        self.raw_clear();
        let maps = self.copy_structure(src);
        self.registry
            .reinit_all(self.node_table_size, self.edge_table_size);
        self.registry.notify(|o| o.re_init());
        log::trace!(
            "copy_from: {} nodes, {} edges",
            self.num_nodes,
            self.num_edges
        );
        debug_invariants!(self.validate_invariants(), "copy_from");
        maps
    }

    /// [`copy_from_with_maps`](Graph::copy_from_with_maps) without the
    /// remaps.
    pub fn copy_from(&mut self, src: &Graph) {
        let _ = self.copy_from_with_maps(src);
    }

    /// Rebuilds this graph as connected component `cc` of `src`, as
    /// enumerated by `info`. Ids are assigned densely in the component's
    /// enumeration order; ring order is preserved.
    pub fn construct_init_by_cc(
        &mut self,
        src: &Graph,
        info: &CcsInfo,
        cc: usize,
    ) -> (NodeRemap, EdgeRemap) {
        self.registry.notify(|o| o.cleared());
        self.raw_clear();
        let mut map_node: NodeRemap = vec![None; src.node_id_count()];
        let mut map_edge: EdgeRemap = vec![None; src.edge_id_count()];

        for i in info.start_node(cc)..info.stop_node(cc) {
            let v_src = info.v(i);
            let deg = src.node_rec(v_src);
            map_node[v_src.index()] = Some(self.pure_new_node(deg.indeg, deg.outdeg));
        }
        for i in info.start_edge(cc)..info.stop_edge(cc) {
            let e_src = info.e(i);
            self.pure_new_edge(src, e_src, &map_node, &mut map_edge);
        }

        // Rings are rebuilt entry by entry; side is decided by adjacency
        // identity, which handles self-loops without extra state.
        for i in info.start_node(cc)..info.stop_node(cc) {
            let v_src = info.v(i);
            let v = map_node[v_src.index()].expect("component node is mapped");
            for a_src in src.adj_entries(v_src) {
                let e_src = a_src.edge();
                let e = map_edge[e_src.index()].expect("component edge is mapped");
                let adj = if a_src == src.adj_source(e_src) {
                    self.adj_source(e)
                } else {
                    self.adj_target(e)
                };
                self.ring_push_back(v, adj);
            }
        }
        self.finish_rebuild();
        (map_node, map_edge)
    }

    /// Rebuilds this graph as the subgraph of `src` induced by
    /// `node_list`. The list must be closed under edges: both endpoints
    /// of every incident edge must appear in it. Ring order is preserved.
    pub fn construct_init_by_nodes(
        &mut self,
        src: &Graph,
        node_list: &[NodeId],
    ) -> (NodeRemap, EdgeRemap) {
        self.registry.notify(|o| o.cleared());
        self.raw_clear();
        let mut map_node: NodeRemap = vec![None; src.node_id_count()];
        let mut map_edge: EdgeRemap = vec![None; src.edge_id_count()];

        // Even-slot entries pick each edge up exactly once.
        let mut edge_list = Vec::new();
        for &v_src in node_list {
            let deg = src.node_rec(v_src);
            map_node[v_src.index()] = Some(self.pure_new_node(deg.indeg, deg.outdeg));
            for a_src in src.adj_entries(v_src) {
                if a_src.is_even_slot() {
                    edge_list.push(a_src.edge());
                }
            }
        }
        for e_src in edge_list {
            #[cfg(debug_assertions)]
            {
                let rec = src.edge_rec(e_src);
                debug_assert!(
                    map_node[rec.src.index()].is_some() && map_node[rec.tgt.index()].is_some(),
                    "node list is not closed under edges"
                );
            }
            self.pure_new_edge(src, e_src, &map_node, &mut map_edge);
        }

        self.rebuild_rings_marked(src, node_list, &map_node, &map_edge);
        self.finish_rebuild();
        (map_node, map_edge)
    }

    /// Rebuilds this graph as the subgraph of `src` induced by the nodes
    /// of `node_list` whose `active` flag is set, keeping only edges whose
    /// far endpoint is also active. Degrees are recomputed accordingly.
    ///
    /// Unlike the other rebuilds, ring order follows edge-creation order,
    /// not the source rings.
    pub fn construct_init_by_active_nodes(
        &mut self,
        src: &Graph,
        node_list: &[NodeId],
        active: &[bool],
    ) -> (NodeRemap, EdgeRemap) {
        self.registry.notify(|o| o.cleared());
        self.raw_clear();
        let mut map_node: NodeRemap = vec![None; src.node_id_count()];
        let mut map_edge: EdgeRemap = vec![None; src.edge_id_count()];

        let mut edge_list = Vec::new();
        for &v_src in node_list {
            debug_assert!(active[v_src.index()], "node list holds an inactive node");
            let mut indeg = 0;
            let mut outdeg = 0;
            for a_src in src.adj_entries(v_src) {
                let e_src = a_src.edge();
                if active[src.opposite(e_src, v_src).index()] {
                    if a_src.is_even_slot() {
                        edge_list.push(e_src);
                    }
                    if src.source(e_src) == v_src {
                        outdeg += 1;
                    } else {
                        indeg += 1;
                    }
                }
            }
            map_node[v_src.index()] = Some(self.pure_new_node(indeg, outdeg));
        }
        for e_src in edge_list {
            let e = self.pure_new_edge(src, e_src, &map_node, &mut map_edge);
            let rec = *self.edge_rec(e);
            self.ring_push_back(rec.src, rec.adj_src);
            self.ring_push_back(rec.tgt, rec.adj_tgt);
        }
        self.finish_rebuild();
        (map_node, map_edge)
    }

    /// Structure copy onto a raw-cleared graph; no array or observer
    /// interaction, but table sizes are set for the new id space.
    pub(crate) fn copy_structure(&mut self, src: &Graph) -> (NodeRemap, EdgeRemap) {
        let mut map_node: NodeRemap = vec![None; src.node_id_count()];
        let mut map_edge: EdgeRemap = vec![None; src.edge_id_count()];

        for v_src in src.nodes() {
            let deg = src.node_rec(v_src);
            map_node[v_src.index()] = Some(self.pure_new_node(deg.indeg, deg.outdeg));
        }
        for e_src in src.edges() {
            self.pure_new_edge(src, e_src, &map_node, &mut map_edge);
        }
        let all: Vec<NodeId> = src.nodes().collect();
        self.rebuild_rings_marked(src, &all, &map_node, &map_edge);

        self.node_table_size = next_power2(MIN_NODE_TABLE_SIZE, self.nodes.len());
        self.edge_table_size = next_power2(MIN_EDGE_TABLE_SIZE, self.edges.len());
        (map_node, map_edge)
    }

    /// Ring reconstruction in source ring order. A per-edge mark
    /// disambiguates the two entries of a self-loop; for all other edges
    /// the side follows from the endpoint.
    fn rebuild_rings_marked(
        &mut self,
        src: &Graph,
        node_list: &[NodeId],
        map_node: &NodeRemap,
        map_edge: &EdgeRemap,
    ) {
        let mut first_half_seen = vec![false; src.edge_id_count()];
        for &v_src in node_list {
            let v = map_node[v_src.index()].expect("listed node is mapped");
            for a_src in src.adj_entries(v_src) {
                let e_src = a_src.edge();
                let e = map_edge[e_src.index()].expect("incident edge is mapped");
                let rec = *self.edge_rec(e);
                let adj = if rec.src == rec.tgt {
                    if first_half_seen[e_src.index()] {
                        rec.adj_tgt
                    } else {
                        first_half_seen[e_src.index()] = true;
                        rec.adj_src
                    }
                } else if v == rec.src {
                    rec.adj_src
                } else {
                    rec.adj_tgt
                };
                self.ring_push_back(v, adj);
            }
        }
    }

    /// Node creation for rebuilds: next dense id, fixed degrees, no
    /// observer event and no incremental table growth.
    fn pure_new_node(&mut self, indeg: usize, outdeg: usize) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(NodeRec {
            first_adj: None,
            last_adj: None,
            indeg,
            outdeg,
        }));
        self.num_nodes += 1;
        NodeId::new(id)
    }

    /// Edge creation for rebuilds: records exist, rings stay untouched.
    fn pure_new_edge(
        &mut self,
        src: &Graph,
        e_src: EdgeId,
        map_node: &NodeRemap,
        map_edge: &mut EdgeRemap,
    ) -> EdgeId {
        let rec = src.edge_rec(e_src);
        let v = map_node[rec.src.index()].expect("edge source is mapped");
        let w = map_node[rec.tgt.index()].expect("edge target is mapped");
        let id = self.edges.len();
        let e = EdgeId::new(id);
        self.adjs.push(Some(AdjRec {
            node: v,
            prev: None,
            next: None,
        }));
        self.adjs.push(Some(AdjRec {
            node: w,
            prev: None,
            next: None,
        }));
        self.edges.push(Some(EdgeRec {
            src: v,
            tgt: w,
            adj_src: e.adj_slot0(),
            adj_tgt: e.adj_slot1(),
            hidden: false,
        }));
        self.num_edges += 1;
        map_edge[e_src.index()] = Some(e);
        e
    }

    fn finish_rebuild(&mut self) {
        self.node_table_size = next_power2(MIN_NODE_TABLE_SIZE, self.nodes.len());
        self.edge_table_size = next_power2(MIN_EDGE_TABLE_SIZE, self.edges.len());
        self.registry
            .reinit_all(self.node_table_size, self.edge_table_size);
        self.registry.notify(|o| o.re_init());
        log::trace!(
            "rebuild: {} nodes, {} edges, tables {}/{}",
            self.num_nodes,
            self.num_edges,
            self.node_table_size,
            self.edge_table_size
        );
        debug_invariants!(self.validate_invariants(), "construct_init");
    }
}

impl Clone for Graph {
    /// Structural copy with a fresh, empty registry: arrays and observers
    /// of the original are not carried over.
    fn clone(&self) -> Self {
        let mut g = Graph::new();
        let _ = g.copy_structure(self);
        g
    }
}
