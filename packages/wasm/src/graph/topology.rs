//! Graph - topology plus node positions.
//!
//! The topology is stored in petgraph's StableGraph (edge weights carry the
//! [`Edge`] record, so the edge sequence is petgraph's edge index order).
//! Alongside it the graph keeps per-slot buffers: the insertion-ordered
//! neighbor list of each node and its position. Nodes are never removed, so
//! slot `i` is both the petgraph node index and the position buffer index.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Directed, Direction};
use std::collections::{HashMap, VecDeque};

use super::edge::{Edge, EdgeId};
use super::node::NodeId;
use crate::geometry::Position;

/// A simple graph with positioned nodes.
///
/// This struct manages:
/// - Graph topology via petgraph (directed bookkeeping)
/// - Undirected adjacency in insertion order, for O(degree) duplicate checks
/// - Node positions, indexed by slot
/// - Mapping from caller-chosen NodeId to slot
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Nodes store their NodeId, edges store the full edge record.
    graph: StableGraph<NodeId, Edge, Directed>,

    /// Map from NodeId to petgraph NodeIndex
    node_id_to_index: HashMap<NodeId, NodeIndex>,

    /// Neighbor ids per slot, in the order the edges were added
    neighbors: Vec<Vec<NodeId>>,

    /// Positions per slot
    positions: Vec<Position>,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with pre-allocated capacity.
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            graph: StableGraph::with_capacity(node_capacity, edge_capacity),
            node_id_to_index: HashMap::with_capacity(node_capacity),
            neighbors: Vec::with_capacity(node_capacity),
            positions: Vec::with_capacity(node_capacity),
        }
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node at the given position.
    ///
    /// Returns false, leaving the graph untouched, if the id already exists.
    pub fn add_node(&mut self, id: NodeId, position: Position) -> bool {
        if self.node_id_to_index.contains_key(&id) {
            return false;
        }

        let index = self.graph.add_node(id);
        self.node_id_to_index.insert(id, index);
        self.neighbors.push(Vec::new());
        self.positions.push(position);
        true
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices().map(|index| self.graph[index])
    }

    /// The node stored in `slot`.
    pub fn node_at(&self, slot: usize) -> Option<NodeId> {
        self.graph.node_weight(NodeIndex::new(slot)).copied()
    }

    /// Slot of a node, i.e. its index in the position buffer.
    pub fn slot(&self, id: NodeId) -> Option<usize> {
        self.node_id_to_index.get(&id).map(|index| index.index())
    }

    /// Neighbor ids of a node, in the order the connecting edges were added.
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.slot(id)
            .map(|slot| self.neighbors[slot].as_slice())
            .unwrap_or(&[])
    }

    /// Number of distinct neighbors (undirected degree).
    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    /// Degrees of all nodes, indexed by slot.
    pub fn degrees(&self) -> Vec<usize> {
        self.neighbors.iter().map(Vec::len).collect()
    }

    /// Check whether `a` and `b` are adjacent. O(degree of `a`).
    pub fn connected_to(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).contains(&b)
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Add an edge from `source` to `target`.
    ///
    /// Returns `None` and leaves the graph unchanged if either endpoint is
    /// missing, if `source == target`, or if the two nodes are already
    /// adjacent in either direction.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        if source == target {
            return None;
        }
        let source_index = *self.node_id_to_index.get(&source)?;
        let target_index = *self.node_id_to_index.get(&target)?;
        if self.connected_to(source, target) {
            return None;
        }

        let id = EdgeId(self.graph.edge_count() as u32);
        let edge = Edge { id, source, target };
        self.graph.add_edge(source_index, target_index, edge);

        self.neighbors[source_index.index()].push(target);
        self.neighbors[target_index.index()].push(source);
        Some(id)
    }

    /// Get the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.edge_references().map(|edge| edge.weight())
    }

    /// Edge endpoints as slot pairs, in insertion order.
    pub fn edge_slots(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
    }

    /// Edges leaving `id`, ordered by edge id.
    pub fn out_edges(&self, id: NodeId) -> Vec<EdgeId> {
        self.directed_edges(id, Direction::Outgoing)
    }

    /// Edges arriving at `id`, ordered by edge id.
    pub fn in_edges(&self, id: NodeId) -> Vec<EdgeId> {
        self.directed_edges(id, Direction::Incoming)
    }

    fn directed_edges(&self, id: NodeId, direction: Direction) -> Vec<EdgeId> {
        let Some(&index) = self.node_id_to_index.get(&id) else {
            return Vec::new();
        };
        let mut edges: Vec<EdgeId> = self
            .graph
            .edges_directed(index, direction)
            .map(|edge| edge.weight().id)
            .collect();
        edges.sort_unstable();
        edges
    }

    // =========================================================================
    // Positions
    // =========================================================================

    /// Get a node's position.
    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.slot(id).map(|slot| self.positions[slot])
    }

    /// Set a node's position. Returns false if the node does not exist.
    pub fn set_position(&mut self, id: NodeId, position: Position) -> bool {
        match self.slot(id) {
            Some(slot) => {
                self.positions[slot] = position;
                true
            }
            None => false,
        }
    }

    /// All positions, indexed by slot.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub(crate) fn position_at(&self, slot: usize) -> Position {
        self.positions[slot]
    }

    pub(crate) fn set_position_at(&mut self, slot: usize, position: Position) {
        self.positions[slot] = position;
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Nodes reachable from `start` by breadth-first search, in discovery
    /// order (starting with `start` itself).
    pub fn reachable_from(&self, start: NodeId) -> Vec<NodeId> {
        let Some(start_slot) = self.slot(start) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.neighbors.len()];
        let mut order = vec![start];
        let mut queue = VecDeque::new();
        visited[start_slot] = true;
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            for &neighbor in self.neighbors(node) {
                let Some(slot) = self.slot(neighbor) else {
                    continue;
                };
                if !visited[slot] {
                    visited[slot] = true;
                    order.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        order
    }

    /// Whether every node is reachable from the first one.
    pub fn is_connected(&self) -> bool {
        match self.node_at(0) {
            Some(first) => self.reachable_from(first).len() == self.node_count(),
            None => true,
        }
    }

    // =========================================================================
    // Buffer Export
    // =========================================================================

    /// Positions as `[x0, y0, z0, x1, y1, z1, ...]` for upload.
    pub fn positions_f32(&self) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(self.positions.len() * 3);
        for p in &self.positions {
            buffer.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        }
        buffer
    }

    /// One line per edge, in edge order: `[sx, sy, sz, tx, ty, tz, ...]`.
    pub fn edge_segments_f32(&self) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(self.edge_count() * 6);
        for (source, target) in self.edge_slots() {
            let s = self.positions[source];
            let t = self.positions[target];
            buffer.extend_from_slice(&[
                s.x as f32, s.y as f32, s.z as f32, t.x as f32, t.y as f32, t.z as f32,
            ]);
        }
        buffer
    }

    /// Edge endpoints as `[src0, tgt0, src1, tgt1, ...]` node ids.
    pub fn edge_pairs(&self) -> Vec<u32> {
        self.edges()
            .flat_map(|edge| [edge.source.0, edge.target.0])
            .collect()
    }
}
