//! Whole-graph structural validation.
//!
//! `validate_invariants` walks the arena once and reports the first
//! violated invariant as a [`GraphError`]; `consistency_check` is the
//! boolean convenience used in assertions. Both run in O(n + m) and are
//! wired into the `debug_invariants!` gate after every compound edit.

use hashbrown::HashSet;

use crate::debug_invariants::DebugInvariants;
use crate::error::GraphError;
use crate::topology::graph::Graph;
use crate::topology::ids::EdgeId;

impl Graph {
    /// Validates the full arena: ring linkage, slot pairing, degree
    /// census, counters, the active/hidden partition, and attribute-table
    /// capacities. Returns the first violation found.
    pub fn validate_invariants(&self) -> Result<(), GraphError> {
        let hidden_set: HashSet<EdgeId> = self.hidden.iter().copied().collect();
        if hidden_set.len() != self.hidden.len() {
            // duplicate on the hidden stack
            return Err(GraphError::HiddenPartitionViolation {
                edge: self.hidden[0],
            });
        }

        let mut ring_seen = vec![false; self.adjs.len()];
        let mut node_census = 0usize;

        for v in self.nodes() {
            node_census += 1;
            let rec = self.node_rec(v);

            let mut found_in = 0usize;
            let mut found_out = 0usize;
            let mut prev = None;
            let mut cur = rec.first_adj;
            while let Some(a) = cur {
                let Some(arec) = self.adjs.get(a.index()).and_then(Option::as_ref) else {
                    return Err(GraphError::DeadRingEntry { node: v, adj: a });
                };
                if arec.node != v {
                    return Err(GraphError::WrongRingOwner {
                        node: v,
                        adj: a,
                        found: arec.node,
                    });
                }
                if arec.prev != prev {
                    return Err(GraphError::CorruptRingLinks { node: v, adj: a });
                }
                if ring_seen[a.index()] {
                    return Err(GraphError::CorruptRingLinks { node: v, adj: a });
                }
                ring_seen[a.index()] = true;

                let e = a.edge();
                let Some(erec) = self.edges.get(e.index()).and_then(Option::as_ref) else {
                    return Err(GraphError::OrphanedEntry { adj: a, edge: e });
                };
                if erec.adj_src == a {
                    found_out += 1;
                } else if erec.adj_tgt == a {
                    found_in += 1;
                } else {
                    return Err(GraphError::OrphanedEntry { adj: a, edge: e });
                }

                prev = Some(a);
                cur = arec.next;
            }
            if rec.last_adj != prev {
                // tail pointer disagrees with the walk; mismatch implies
                // at least one side is set
                let adj = rec.last_adj.or(prev).expect("one side is set");
                return Err(GraphError::CorruptRingLinks { node: v, adj });
            }
            if found_in != rec.indeg || found_out != rec.outdeg {
                return Err(GraphError::DegreeMismatch {
                    node: v,
                    stored_in: rec.indeg,
                    stored_out: rec.outdeg,
                    found_in,
                    found_out,
                });
            }
        }
        if node_census != self.num_nodes {
            return Err(GraphError::CountMismatch {
                kind: "node",
                stored: self.num_nodes,
                found: node_census,
            });
        }

        let mut active_census = 0usize;
        for (i, slot) in self.edges.iter().enumerate() {
            let Some(erec) = slot.as_ref() else { continue };
            let e = EdgeId::new(i);

            if erec.adj_src == erec.adj_tgt {
                return Err(GraphError::DegenerateAdjPair { edge: e });
            }
            for a in [erec.adj_src, erec.adj_tgt] {
                if a.edge() != e {
                    return Err(GraphError::SlotPairViolation { adj: a, edge: e });
                }
            }

            let src_live = self
                .nodes
                .get(erec.src.index())
                .is_some_and(Option::is_some);
            let tgt_live = self
                .nodes
                .get(erec.tgt.index())
                .is_some_and(Option::is_some);
            let src_entry_ok = self
                .adjs
                .get(erec.adj_src.index())
                .and_then(Option::as_ref)
                .is_some_and(|r| r.node == erec.src);
            let tgt_entry_ok = self
                .adjs
                .get(erec.adj_tgt.index())
                .and_then(Option::as_ref)
                .is_some_and(|r| r.node == erec.tgt);
            if !(src_live && tgt_live && src_entry_ok && tgt_entry_ok) {
                return Err(GraphError::BadEndpoint { edge: e });
            }

            if erec.hidden {
                if !hidden_set.contains(&e) {
                    return Err(GraphError::HiddenPartitionViolation { edge: e });
                }
                // hidden entries must not sit in any ring
                if ring_seen[erec.adj_src.index()] || ring_seen[erec.adj_tgt.index()] {
                    return Err(GraphError::HiddenPartitionViolation { edge: e });
                }
            } else {
                active_census += 1;
                if hidden_set.contains(&e) {
                    return Err(GraphError::HiddenPartitionViolation { edge: e });
                }
                if !ring_seen[erec.adj_src.index()] || !ring_seen[erec.adj_tgt.index()] {
                    return Err(GraphError::OrphanedEntry {
                        adj: erec.adj_src,
                        edge: e,
                    });
                }
            }
        }
        if active_census != self.num_edges {
            return Err(GraphError::CountMismatch {
                kind: "edge",
                stored: self.num_edges,
                found: active_census,
            });
        }
        for &h in &self.hidden {
            let ok = self
                .edges
                .get(h.index())
                .and_then(Option::as_ref)
                .is_some_and(|r| r.hidden);
            if !ok {
                return Err(GraphError::HiddenPartitionViolation { edge: h });
            }
        }

        // every live adjacency record belongs to a live edge and, unless
        // that edge is hidden, appears in exactly one ring
        for (i, slot) in self.adjs.iter().enumerate() {
            if slot.is_some() {
                let a = crate::topology::ids::AdjId::new(i);
                let e = a.edge();
                if !self.edges.get(e.index()).is_some_and(Option::is_some) {
                    return Err(GraphError::OrphanedEntry { adj: a, edge: e });
                }
            }
        }

        if self.node_table_size < self.nodes.len() {
            return Err(GraphError::ArrayCapacity {
                kind: "node",
                capacity: self.node_table_size,
                required: self.nodes.len(),
            });
        }
        if self.edge_table_size < self.edges.len() {
            return Err(GraphError::ArrayCapacity {
                kind: "edge",
                capacity: self.edge_table_size,
                required: self.edges.len(),
            });
        }
        Ok(())
    }

    /// Boolean form of [`validate_invariants`](Graph::validate_invariants);
    /// logs the finding before returning `false`.
    pub fn consistency_check(&self) -> bool {
        match self.validate_invariants() {
            Ok(()) => true,
            Err(err) => {
                log::error!("graph consistency check failed: {err}");
                false
            }
        }
    }
}

impl DebugInvariants for Graph {
    fn debug_assert_invariants(&self) {
        debug_assert!(
            self.validate_invariants().is_ok(),
            "graph invariants violated: {:?}",
            self.validate_invariants()
        );
    }

    fn validate_invariants(&self) -> Result<(), GraphError> {
        Graph::validate_invariants(self)
    }
}
