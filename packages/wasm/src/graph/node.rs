//! Node identifiers.
//!
//! Nodes are the vertices of the layout graph. The graph keeps, per node:
//! - A unique identifier chosen by the caller
//! - Insertion-ordered neighbor ids (undirected adjacency)
//! - Outgoing and incoming edges
//! - A position in layout space, mutated only by the annealing scheduler

use std::fmt;

use serde::Serialize;

/// Unique node identifier.
///
/// Wraps a u32 for compact storage and WebAssembly interop. The generator
/// numbers nodes `0..N`, matching their insertion slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
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

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}
