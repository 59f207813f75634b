//! Random connected graph generation.
//!
//! Builds a simple graph of `num_nodes` nodes and at least `num_edges` edges:
//! 1. Add random edges between distinct, non-adjacent node pairs until the
//!    requested count is reached.
//! 2. Attach every isolated node to a random other node.
//! 3. Breadth-first search from node 0; attach every unreached node to a random
//!    node of the reachable set.
//!
//! Repair may add edges beyond the request, so the returned configuration
//! carries the actual edge count and re-derived weights.

use log::{info, warn};
use rand::Rng;

use super::node::NodeId;
use super::topology::Graph;
use crate::config::{GraphType, LayoutConfig};
use crate::error::{LayoutError, Result};
use crate::geometry::Position;

/// Draws allowed for a single edge before falling back to choosing among the
/// remaining free pairs directly.
pub const MAX_PAIR_ATTEMPTS: usize = 10_000;

/// A freshly generated graph together with its updated configuration.
#[derive(Debug, Clone)]
pub struct GeneratedGraph {
    pub graph: Graph,
    /// Input configuration with `num_edges` and the weights re-derived from
    /// the final topology.
    pub config: LayoutConfig,
}

/// Generate a random simple connected graph for `config`.
///
/// All nodes start at the origin; see [`scatter_positions`].
pub fn generate_graph<R: Rng + ?Sized>(config: &LayoutConfig, rng: &mut R) -> Result<GeneratedGraph> {
    let n = config.num_nodes;
    if n < 1 {
        return Err(LayoutError::NoNodes);
    }
    let max = LayoutConfig::max_edges(n);
    if config.num_edges as u64 > max {
        return Err(LayoutError::TooManyEdges {
            requested: config.num_edges,
            num_nodes: n,
            max,
        });
    }

    let mut graph = Graph::with_capacity(n as usize, config.num_edges as usize + n as usize);
    for i in 0..n {
        graph.add_node(NodeId(i), Position::ORIGIN);
    }

    add_random_edges(&mut graph, n, config.num_edges as usize, rng);
    attach_isolated_nodes(&mut graph, n, rng);
    connect_components(&mut graph, n, rng);

    let edge_count = graph.edge_count() as u32;
    info!(
        "Graph created with {} nodes and {} edges ({} requested)",
        graph.node_count(),
        edge_count,
        config.num_edges
    );

    Ok(GeneratedGraph {
        config: config.with_edge_count(edge_count),
        graph,
    })
}

/// Give every node a uniformly random starting position in
/// `[-grid_space, grid_space]` per axis (z stays 0 for planar layouts).
pub fn scatter_positions<R: Rng + ?Sized>(graph: &mut Graph, config: &LayoutConfig, rng: &mut R) {
    let g = config.grid_space;
    for slot in 0..graph.node_count() {
        let x = rng.random::<f64>() * (g * 2.0) - g;
        let y = rng.random::<f64>() * (g * 2.0) - g;
        let z = match config.graph_type {
            GraphType::Planar => 0.0,
            GraphType::Spatial => rng.random::<f64>() * (g * 2.0) - g,
        };
        graph.set_position_at(slot, Position::new(x, y, z));
    }
}

fn add_random_edges<R: Rng + ?Sized>(graph: &mut Graph, n: u32, wanted: usize, rng: &mut R) {
    while graph.edge_count() < wanted {
        let mut attempts = 0;
        loop {
            // An adjacent pair is thrown away entirely and both ends redrawn
            let (source, target) = random_distinct_pair(n, rng);
            if graph.add_edge(source, target).is_some() {
                break;
            }

            attempts += 1;
            if attempts >= MAX_PAIR_ATTEMPTS {
                warn!(
                    "No free node pair after {} draws with {} of {} edges placed, choosing among free pairs",
                    attempts,
                    graph.edge_count(),
                    wanted
                );
                add_free_pair(graph, n, rng);
                break;
            }
        }
    }
}

/// Two distinct node ids drawn uniformly. Requires `n >= 2`.
fn random_distinct_pair<R: Rng + ?Sized>(n: u32, rng: &mut R) -> (NodeId, NodeId) {
    let source = rng.random_range(0..n);
    let mut target = rng.random_range(0..n);
    while target == source {
        target = rng.random_range(0..n);
    }
    (NodeId(source), NodeId(target))
}

/// Add an edge between a uniformly chosen non-adjacent pair, if one exists.
fn add_free_pair<R: Rng + ?Sized>(graph: &mut Graph, n: u32, rng: &mut R) {
    let mut free = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            if !graph.connected_to(NodeId(a), NodeId(b)) {
                free.push((NodeId(a), NodeId(b)));
            }
        }
    }
    if free.is_empty() {
        return;
    }
    let (a, b) = free[rng.random_range(0..free.len())];
    graph.add_edge(a, b);
}

fn attach_isolated_nodes<R: Rng + ?Sized>(graph: &mut Graph, n: u32, rng: &mut R) {
    if n < 2 {
        return;
    }
    for i in 0..n {
        let node = NodeId(i);
        if graph.degree(node) > 0 {
            continue;
        }
        let mut target = rng.random_range(0..n);
        while target == i {
            target = rng.random_range(0..n);
        }
        graph.add_edge(node, NodeId(target));
    }
}

fn connect_components<R: Rng + ?Sized>(graph: &mut Graph, n: u32, rng: &mut R) {
    let mut reachable = graph.reachable_from(NodeId(0));
    let mut in_reachable = vec![false; n as usize];
    for node in &reachable {
        in_reachable[node.0 as usize] = true;
    }

    for i in 0..n {
        if in_reachable[i as usize] {
            continue;
        }
        // Already adjacent only if an earlier repair pulled in a neighbor of
        // this node; the node is attached either way.
        let anchor = reachable[rng.random_range(0..reachable.len())];
        graph.add_edge(NodeId(i), anchor);
        reachable.push(NodeId(i));
        in_reachable[i as usize] = true;
    }
}
