//! Edge type and identifiers.
//!
//! An edge joins a source and a target node. The direction is kept for
//! bookkeeping (outgoing/incoming lists) but adjacency and every energy term
//! treat edges as undirected.

use std::fmt;

use serde::Serialize;

use super::node::NodeId;

/// Edge identifier: the edge's slot in the graph's edge sequence.
///
/// The rendering side draws edges in this order, so the id doubles as the
/// line slot to redraw each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId(pub u32);

impl EdgeId {
    /// Create a new EdgeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({})", self.0)
    }
}

impl From<u32> for EdgeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<EdgeId> for u32 {
    #[inline]
    fn from(id: EdgeId) -> Self {
        id.0
    }
}

/// An immutable edge between two distinct nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    /// Whether the edge touches `node` at either end.
    #[inline]
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    /// Whether the two edges have an endpoint in common.
    #[inline]
    pub fn shares_endpoint(&self, other: &Edge) -> bool {
        other.touches(self.source) || other.touches(self.target)
    }

    /// Whether the edge joins `a` and `b`, in either direction.
    #[inline]
    pub fn joins(&self, a: NodeId, b: NodeId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}
