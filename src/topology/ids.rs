//! Dense integer handles for graph entities.
//!
//! Every node, edge, and adjacency entry (half-edge) carries a dense id
//! assigned at creation. Ids double as indices into the storage arena and
//! into registered attribute arrays, so attribute lookup is a plain O(1)
//! slice access.
//!
//! The adjacency id space is tied to the edge id space: the edge with id
//! `e` owns the two adjacency slots `2e` and `2e+1`. The ids of the two
//! half-edges of one edge therefore differ only in the lowest bit, and
//! [`AdjId::twin`] and [`AdjId::edge`] are pure bit operations. Structural
//! edits that transfer a half-edge between edges (`split`, `unsplit`)
//! relocate the record so this law is never violated.

use std::fmt;

/// Dense id of a node.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct NodeId(usize);

/// Dense id of an edge.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct EdgeId(usize);

/// Dense id of an adjacency entry (half-edge).
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct AdjId(usize);

impl NodeId {
    /// Wraps a raw index.
    #[inline]
    pub const fn new(raw: usize) -> Self {
        NodeId(raw)
    }

    /// Returns the raw index, usable directly as an array subscript.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl EdgeId {
    /// Wraps a raw index.
    #[inline]
    pub const fn new(raw: usize) -> Self {
        EdgeId(raw)
    }

    /// Returns the raw index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// The source-side adjacency slot assigned to this edge at creation.
    ///
    /// Note that after [`reverse_edge`] the *roles* of the two slots swap
    /// while the ids stay put; consult the edge record for the current
    /// source side.
    ///
    /// [`reverse_edge`]: crate::topology::graph::Graph::reverse_edge
    #[inline]
    pub const fn adj_slot0(self) -> AdjId {
        AdjId(self.0 << 1)
    }

    /// The second adjacency slot assigned to this edge at creation.
    #[inline]
    pub const fn adj_slot1(self) -> AdjId {
        AdjId(self.0 << 1 | 1)
    }
}

impl AdjId {
    /// Wraps a raw index.
    #[inline]
    pub const fn new(raw: usize) -> Self {
        AdjId(raw)
    }

    /// Returns the raw index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// The opposite half-edge of the same edge. Involution: `a.twin().twin() == a`.
    #[inline]
    pub const fn twin(self) -> AdjId {
        AdjId(self.0 ^ 1)
    }

    /// The edge owning this half-edge.
    #[inline]
    pub const fn edge(self) -> EdgeId {
        EdgeId(self.0 >> 1)
    }

    /// Whether this is the even (low-bit-zero) slot of its edge.
    ///
    /// Exactly one half-edge of every edge satisfies this, which makes it
    /// the standard "visit each edge once" filter when walking adjacency
    /// rings — including rings containing both halves of a self-loop.
    #[inline]
    pub const fn is_even_slot(self) -> bool {
        self.0 & 1 == 0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.0).finish()
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EdgeId").field(&self.0).finish()
    }
}

impl fmt::Debug for AdjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AdjId").field(&self.0).finish()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for AdjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod layout_tests {
    //! Compile-time assertion that the handles stay pointer-sized.
    use super::*;
    use static_assertions::assert_eq_size;

    // If these fail, the repr(transparent) guarantee is broken!
    assert_eq_size!(NodeId, usize);
    assert_eq_size!(EdgeId, usize);
    assert_eq_size!(AdjId, usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twin_is_an_involution() {
        let a = AdjId::new(6);
        assert_eq!(a.twin(), AdjId::new(7));
        assert_eq!(a.twin().twin(), a);
    }

    #[test]
    fn slot_pair_maps_back_to_edge() {
        let e = EdgeId::new(3);
        assert_eq!(e.adj_slot0(), AdjId::new(6));
        assert_eq!(e.adj_slot1(), AdjId::new(7));
        assert_eq!(e.adj_slot0().edge(), e);
        assert_eq!(e.adj_slot1().edge(), e);
        assert!(e.adj_slot0().is_even_slot());
        assert!(!e.adj_slot1().is_even_slot());
    }

    #[test]
    fn debug_and_display() {
        let v = NodeId::new(7);
        assert_eq!(format!("{v:?}"), "NodeId(7)");
        assert_eq!(format!("{v}"), "7");
    }

    #[test]
    fn ordering_and_hash() {
        use std::collections::HashSet;
        let a = NodeId::new(1);
        let b = NodeId::new(2);
        assert!(a < b);
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 2);
    }
}
