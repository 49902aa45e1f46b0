//! Hide/restore semantics: masking without identity loss.

use halfedge_graph::prelude::*;

#[test]
fn hidden_edges_vanish_from_every_query() {
    let mut g = Graph::new();
    let v = g.new_node();
    let w = g.new_node();
    let e = g.new_edge(v, w);
    g.hide_edge(e);

    assert_eq!(g.num_edges(), 0);
    assert!(!g.contains_edge(e));
    assert!(g.is_hidden(e));
    assert!(g.edges().next().is_none());
    assert_eq!(g.degree(v), 0);
    assert_eq!(g.search_edge(v, w), None);
    assert_eq!(g.hidden_edges().collect::<Vec<_>>(), vec![e]);
    assert!(g.consistency_check());
}

#[test]
fn restored_edge_keeps_id_and_endpoints() {
    let mut g = Graph::new();
    let v = g.new_node();
    let w = g.new_node();
    let e = g.new_edge(v, w);
    let src_entry = g.adj_source(e);
    g.hide_edge(e);
    g.restore_edge(e);
    assert!(g.contains_edge(e));
    assert_eq!(g.source(e), v);
    assert_eq!(g.adj_source(e), src_entry);
    assert_eq!(g.num_hidden_edges(), 0);
    assert!(g.consistency_check());
}

#[test]
fn attribute_values_survive_hiding() {
    let mut g = Graph::new();
    let v = g.new_node();
    let w = g.new_node();
    let e = g.new_edge(v, w);
    let len: EdgeArray<f64> = EdgeArray::new(&g, 0.0);
    len.set(e, 4.5);
    g.hide_edge(e);
    assert_eq!(len.get(e), 4.5);
    g.restore_edge(e);
    assert_eq!(len.get(e), 4.5);
}

#[test]
fn ring_positions_are_not_remembered() {
    let mut g = Graph::new();
    let v = g.new_node();
    let ws: Vec<_> = (0..3).map(|_| g.new_node()).collect();
    let es: Vec<_> = ws.iter().map(|&w| g.new_edge(v, w)).collect();
    g.hide_edge(es[0]);
    g.restore_edge(es[0]);
    // restore appends at the ring tail
    let ring: Vec<_> = g.adj_entries(v).map(|a| g.adj_edge(a)).collect();
    assert_eq!(ring, vec![es[1], es[2], es[0]]);
}

#[test]
fn mutation_while_hidden_leaves_hidden_edges_alone() {
    let mut g = Graph::new();
    let v = g.new_node();
    let w = g.new_node();
    let x = g.new_node();
    let masked = g.new_edge(v, w);
    g.hide_edge(masked);

    // unrelated churn around the hidden edge
    let e2 = g.new_edge(v, x);
    let e3 = g.split(e2);
    g.reverse_edge(e3);
    g.reverse_edge(e3);
    g.unsplit_edges(e2, e3);
    let spare = g.new_node();
    let e4 = g.new_edge(x, spare);
    g.contract(e4);
    assert!(g.consistency_check());

    g.restore_all_edges();
    assert_eq!(g.source(masked), v);
    assert_eq!(g.target(masked), w);
    assert!(g.consistency_check());
}

#[test]
fn hidden_edges_split_components() {
    let mut g = Graph::new();
    let v = g.new_node();
    let w = g.new_node();
    let a = g.new_edge(v, w);
    let b = g.new_edge(v, w);
    assert_eq!(CcsInfo::new(&g).num_ccs(), 1);
    g.hide_edge(a);
    assert_eq!(CcsInfo::new(&g).num_ccs(), 1); // parallel edge still connects
    g.hide_edge(b);
    assert_eq!(CcsInfo::new(&g).num_ccs(), 2);
    g.restore_all_edges();
    assert_eq!(CcsInfo::new(&g).num_ccs(), 1);
}
