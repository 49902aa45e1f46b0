//! Connected-component enumeration.
//!
//! [`CcsInfo`] is a snapshot: it records, for the graph state at
//! construction time, every node and every active edge grouped by
//! connected component, in a form the by-component rebuild can consume
//! directly. Later mutations of the graph do not update it.

use serde::{Deserialize, Serialize};

use crate::topology::graph::Graph;
use crate::topology::ids::{EdgeId, NodeId};

/// Connected components of a graph, as contiguous index ranges over two
/// flat arrays. Component `cc` owns the nodes
/// `start_node(cc)..stop_node(cc)` and the edges
/// `start_edge(cc)..stop_edge(cc)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CcsInfo {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    start_node: Vec<usize>,
    start_edge: Vec<usize>,
}

impl CcsInfo {
    /// Enumerates the connected components of `g`. Components are
    /// discovered in node-id order; hidden edges connect nothing.
    pub fn new(g: &Graph) -> Self {
        let mut info = CcsInfo {
            nodes: Vec::with_capacity(g.num_nodes()),
            edges: Vec::with_capacity(g.num_edges()),
            start_node: Vec::new(),
            start_edge: Vec::new(),
        };
        let mut component = vec![usize::MAX; g.node_id_count()];
        let mut stack = Vec::new();

        for root in g.nodes() {
            if component[root.index()] != usize::MAX {
                continue;
            }
            let cc = info.start_node.len();
            info.start_node.push(info.nodes.len());
            info.start_edge.push(info.edges.len());

            component[root.index()] = cc;
            stack.push(root);
            while let Some(v) = stack.pop() {
                info.nodes.push(v);
                for a in g.adj_entries(v) {
                    // even slots pick each edge up exactly once
                    if a.is_even_slot() {
                        info.edges.push(a.edge());
                    }
                    let w = g.twin_node(a);
                    if component[w.index()] == usize::MAX {
                        component[w.index()] = cc;
                        stack.push(w);
                    }
                }
            }
        }
        info.start_node.push(info.nodes.len());
        info.start_edge.push(info.edges.len());
        log::debug!(
            "component scan: {} nodes, {} edges, {} components",
            info.nodes.len(),
            info.edges.len(),
            info.num_ccs()
        );
        info
    }

    /// Number of connected components.
    #[inline]
    pub fn num_ccs(&self) -> usize {
        self.start_node.len() - 1
    }

    /// First node index of component `cc`.
    #[inline]
    pub fn start_node(&self, cc: usize) -> usize {
        self.start_node[cc]
    }

    /// One past the last node index of component `cc`.
    #[inline]
    pub fn stop_node(&self, cc: usize) -> usize {
        self.start_node[cc + 1]
    }

    /// First edge index of component `cc`.
    #[inline]
    pub fn start_edge(&self, cc: usize) -> usize {
        self.start_edge[cc]
    }

    /// One past the last edge index of component `cc`.
    #[inline]
    pub fn stop_edge(&self, cc: usize) -> usize {
        self.start_edge[cc + 1]
    }

    /// Node at flat index `i`.
    #[inline]
    pub fn v(&self, i: usize) -> NodeId {
        self.nodes[i]
    }

    /// Edge at flat index `i`.
    #[inline]
    pub fn e(&self, i: usize) -> EdgeId {
        self.edges[i]
    }

    /// Nodes of component `cc`.
    pub fn nodes_of(&self, cc: usize) -> &[NodeId] {
        &self.nodes[self.start_node(cc)..self.stop_node(cc)]
    }

    /// Edges of component `cc`.
    pub fn edges_of(&self, cc: usize) -> &[EdgeId] {
        &self.edges[self.start_edge(cc)..self.stop_edge(cc)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_has_no_components() {
        let g = Graph::new();
        let info = CcsInfo::new(&g);
        assert_eq!(info.num_ccs(), 0);
    }

    #[test]
    fn disjoint_paths_are_separate_components() {
        let mut g = Graph::new();
        let k = 3;
        for _ in 0..k {
            let a = g.new_node();
            let b = g.new_node();
            let c = g.new_node();
            g.new_edge(a, b);
            g.new_edge(b, c);
        }
        let info = CcsInfo::new(&g);
        assert_eq!(info.num_ccs(), k);
        for cc in 0..k {
            assert_eq!(info.nodes_of(cc).len(), 3);
            assert_eq!(info.edges_of(cc).len(), 2);
        }
        let total: usize = (0..k).map(|cc| info.nodes_of(cc).len()).sum();
        assert_eq!(total, g.num_nodes());
    }

    #[test]
    fn isolated_node_is_its_own_component() {
        let mut g = Graph::new();
        let v = g.new_node();
        let w = g.new_node();
        let x = g.new_node();
        g.new_edge(v, w);
        let info = CcsInfo::new(&g);
        assert_eq!(info.num_ccs(), 2);
        assert_eq!(info.nodes_of(1), &[x]);
        assert!(info.edges_of(1).is_empty());
    }

    #[test]
    fn hidden_edges_disconnect() {
        let mut g = Graph::new();
        let v = g.new_node();
        let w = g.new_node();
        let e = g.new_edge(v, w);
        g.hide_edge(e);
        let info = CcsInfo::new(&g);
        assert_eq!(info.num_ccs(), 2);
        g.restore_edge(e);
        assert_eq!(CcsInfo::new(&g).num_ccs(), 1);
    }

    #[test]
    fn self_loop_stays_in_component_edges() {
        let mut g = Graph::new();
        let v = g.new_node();
        let e = g.new_edge(v, v);
        let info = CcsInfo::new(&g);
        assert_eq!(info.num_ccs(), 1);
        assert_eq!(info.edges_of(0), &[e]);
    }
}
