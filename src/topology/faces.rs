//! Face traversal over the combinatorial embedding, and the genus of it.
//!
//! Ring order is read as counterclockwise rotation. A face cycle is then
//! traced by following each half-edge to its twin and turning to the
//! twin's ring predecessor; face count and Euler's formula give the genus
//! of the surface the embedding lives on.

use crate::topology::components::CcsInfo;
use crate::topology::graph::Graph;
use crate::topology::ids::AdjId;

impl Graph {
    /// Next half-edge on the face cycle through `a`.
    #[inline]
    pub fn face_cycle_succ(&self, a: AdjId) -> AdjId {
        self.cyclic_pred(a.twin())
    }

    /// Previous half-edge on the face cycle through `a`.
    #[inline]
    pub fn face_cycle_pred(&self, a: AdjId) -> AdjId {
        self.cyclic_succ(a).twin()
    }

    /// Visits every face cycle of the embedding once, passing the cycle's
    /// half-edges in traversal order starting from its entry of least
    /// discovery.
    pub fn for_each_face_cycle<F: FnMut(&[AdjId])>(&self, mut f: F) {
        let mut visited = vec![false; self.adj_id_count()];
        let mut cycle = Vec::new();
        for v in self.nodes() {
            for start in self.adj_entries(v) {
                if visited[start.index()] {
                    continue;
                }
                cycle.clear();
                let mut a = start;
                loop {
                    visited[a.index()] = true;
                    cycle.push(a);
                    a = self.face_cycle_succ(a);
                    if a == start {
                        break;
                    }
                }
                f(&cycle);
            }
        }
    }

    /// Number of face cycles of the embedding.
    pub fn count_face_cycles(&self) -> usize {
        let mut n = 0;
        self.for_each_face_cycle(|_| n += 1);
        n
    }

    /// Genus of the surface the current embedding is drawn on, via Euler's
    /// formula summed over connected components. Zero means the embedding
    /// is planar (isolated nodes do not disturb this).
    pub fn genus(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        let isolated = self.nodes().filter(|&v| self.degree(v) == 0).count();
        let ccs = CcsInfo::new(self).num_ccs();
        let faces = self.count_face_cycles();
        (self.num_edges() as i64 - self.num_nodes() as i64 - isolated as i64 - faces as i64
            + 2 * ccs as i64)
            / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::graph::Direction;

    #[test]
    fn empty_graph_is_planar() {
        let g = Graph::new();
        assert_eq!(g.count_face_cycles(), 0);
        assert_eq!(g.genus(), 0);
    }

    #[test]
    fn triangle_has_two_faces() {
        let mut g = Graph::new();
        let v: Vec<_> = (0..3).map(|_| g.new_node()).collect();
        g.new_edge(v[0], v[1]);
        g.new_edge(v[1], v[2]);
        g.new_edge(v[2], v[0]);
        assert_eq!(g.count_face_cycles(), 2);
        assert_eq!(g.genus(), 0);
    }

    #[test]
    fn self_loop_is_planar() {
        let mut g = Graph::new();
        let v = g.new_node();
        g.new_edge(v, v);
        assert_eq!(g.count_face_cycles(), 2);
        assert_eq!(g.genus(), 0);
    }

    #[test]
    fn nested_loops_are_planar_interleaved_are_not() {
        // two self-loops nested in the rotation: planar
        let mut g = Graph::new();
        let v = g.new_node();
        g.new_edge(v, v);
        g.new_edge(v, v);
        assert_eq!(g.count_face_cycles(), 3);
        assert_eq!(g.genus(), 0);

        // interleave the rotation (a0 b0 a1 b1): torus
        let mut g = Graph::new();
        let v = g.new_node();
        let a = g.new_edge(v, v);
        g.new_edge_between(g.adj_source(a), g.adj_target(a), Direction::After);
        assert_eq!(g.count_face_cycles(), 1);
        assert_eq!(g.genus(), 1);
    }

    #[test]
    fn planar_k4_rotation_has_four_faces() {
        use crate::topology::ids::{EdgeId, NodeId};

        let mut g = Graph::new();
        let v: Vec<_> = (0..4).map(|_| g.new_node()).collect();
        let e01 = g.new_edge(v[0], v[1]);
        let e02 = g.new_edge(v[0], v[2]);
        let e03 = g.new_edge(v[0], v[3]);
        let e12 = g.new_edge(v[1], v[2]);
        let e13 = g.new_edge(v[1], v[3]);
        let e23 = g.new_edge(v[2], v[3]);

        let entry_at = |g: &Graph, e: EdgeId, n: NodeId| {
            if g.source(e) == n { g.adj_source(e) } else { g.adj_target(e) }
        };
        // outer triangle v0 v1 v2 with v3 in the middle
        let rotations = [
            (v[0], [e01, e03, e02]),
            (v[1], [e12, e13, e01]),
            (v[2], [e02, e23, e12]),
            (v[3], [e03, e13, e23]),
        ];
        for &(n, ring) in &rotations {
            for pair in ring.windows(2) {
                g.move_adj_entry(
                    entry_at(&g, pair[1], n),
                    entry_at(&g, pair[0], n),
                    Direction::After,
                );
            }
            let got: Vec<_> = g.adj_entries(n).map(|a| a.edge()).collect();
            assert_eq!(got, ring);
        }

        assert_eq!(g.count_face_cycles(), 4);
        assert_eq!(g.genus(), 0);

        // mirroring the embedding keeps the genus
        g.reverse_all_adj_edges();
        assert_eq!(g.genus(), 0);
    }

    #[test]
    fn genus_sums_over_components() {
        let mut g = Graph::new();
        for _ in 0..2 {
            let v: Vec<_> = (0..3).map(|_| g.new_node()).collect();
            g.new_edge(v[0], v[1]);
            g.new_edge(v[1], v[2]);
            g.new_edge(v[2], v[0]);
        }
        g.new_node(); // isolated
        assert_eq!(g.genus(), 0);
    }

    #[test]
    fn face_cycle_pred_inverts_succ() {
        let mut g = Graph::new();
        let v = g.new_node();
        let w = g.new_node();
        let e = g.new_edge(v, w);
        g.new_edge(w, v);
        let a = g.adj_source(e);
        assert_eq!(g.face_cycle_pred(g.face_cycle_succ(a)), a);
        assert_eq!(g.face_cycle_succ(g.face_cycle_pred(a)), a);
    }
}
