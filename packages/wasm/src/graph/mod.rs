//! Graph data structures and generation.
//!
//! This module provides the graph structure on top of petgraph's StableGraph
//! for stable node/edge indices, with a flat position array indexed by node
//! slot so the energy terms can iterate without hashing.

mod edge;
mod generator;
mod node;
mod topology;

pub use edge::{Edge, EdgeId};
pub use generator::{GeneratedGraph, MAX_PAIR_ATTEMPTS, generate_graph, scatter_positions};
pub use node::NodeId;
pub use topology::Graph;
