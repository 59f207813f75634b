//! Layout energy.
//!
//! The energy of a layout is a weighted sum of terms; lower is better:
//! - **Distribution**: `lambda1 / d^2` per node pair, pushing nodes apart.
//!   Planar layouts cap each pair at `lambda1` so coincident nodes stay finite.
//! - **Borderline**: `lambda2 / d^2` from each node to the boundary points at
//!   `+-grid_space` on every axis in use.
//! - **Edge length**: `lambda3 * length^2` per edge.
//! - **Crossing** (planar): `lambda4` per pair of intersecting edges that share
//!   no endpoint.
//! - **Gravitational** (spatial): `lambda5 * deg(a) * deg(b) / d^2` per node
//!   pair.
//!
//! Every evaluation recomputes all terms over the whole graph: O(N^2) for the
//! node-pair terms and O(E^2) for crossings. Graphs are small (tens of nodes),
//! and a full recount cannot drift from the layout it describes.

use serde::Serialize;

use crate::config::{EnergyWeights, GraphType, LayoutConfig};
use crate::geometry::{Position, segments_intersect};
use crate::graph::Graph;

/// The individual energy terms of one layout.
///
/// Exactly one of `crossing` and `gravitational` is in use, depending on the
/// graph type; the other stays zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyTerms {
    pub distribution: f64,
    pub borderline: f64,
    pub edge_length: f64,
    pub crossing: f64,
    pub gravitational: f64,
}

impl EnergyTerms {
    /// Sum of all terms.
    #[inline]
    pub fn total(&self) -> f64 {
        self.distribution + self.borderline + self.edge_length + self.crossing + self.gravitational
    }
}

/// Evaluates [`EnergyTerms`] for a graph under one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyModel {
    graph_type: GraphType,
    grid_space: f64,
    weights: EnergyWeights,
}

impl EnergyModel {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            graph_type: config.graph_type,
            grid_space: config.grid_space,
            weights: config.weights,
        }
    }

    /// Compute every term from the graph's current positions.
    pub fn evaluate(&self, graph: &Graph) -> EnergyTerms {
        let positions = graph.positions();
        let edges: Vec<(usize, usize)> = graph.edge_slots().collect();
        let w = &self.weights;
        let axes = self.graph_type.dimensions();
        let borderline = borderline_energy(positions, self.grid_space, w.borderline, axes);

        match self.graph_type {
            GraphType::Planar => EnergyTerms {
                distribution: distribution_energy(positions, w.distribution, true),
                borderline,
                edge_length: edge_length_energy(positions, &edges, w.edge_length),
                crossing: crossing_energy(positions, &edges, w.crossing),
                gravitational: 0.0,
            },
            GraphType::Spatial => EnergyTerms {
                distribution: distribution_energy(positions, w.distribution, false),
                borderline,
                edge_length: edge_length_energy(positions, &edges, w.edge_length),
                crossing: 0.0,
                gravitational: gravitational_energy(positions, &graph.degrees(), w.gravitation),
            },
        }
    }
}

/// Pairwise inverse-square repulsion, optionally capped at `weight` per pair.
pub fn distribution_energy(positions: &[Position], weight: f64, capped: bool) -> f64 {
    let mut total = 0.0;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let energy = weight / positions[i].distance_squared(positions[j]);
            total += if capped { energy.min(weight) } else { energy };
        }
    }
    total
}

/// Inverse-square repulsion from the points `+-grid_space` on the first
/// `axes` axes.
pub fn borderline_energy(positions: &[Position], grid_space: f64, weight: f64, axes: usize) -> f64 {
    // A node sitting on a boundary point would give 0 * inf
    if weight == 0.0 {
        return 0.0;
    }

    let g = grid_space;
    let boundary = [
        Position::new(g, 0.0, 0.0),
        Position::new(-g, 0.0, 0.0),
        Position::new(0.0, g, 0.0),
        Position::new(0.0, -g, 0.0),
        Position::new(0.0, 0.0, g),
        Position::new(0.0, 0.0, -g),
    ];
    let boundary = &boundary[..axes * 2];

    positions
        .iter()
        .map(|&p| {
            let inverse: f64 = boundary.iter().map(|&b| 1.0 / p.distance_squared(b)).sum();
            weight * inverse
        })
        .sum()
}

/// Squared edge lengths.
pub fn edge_length_energy(positions: &[Position], edges: &[(usize, usize)], weight: f64) -> f64 {
    edges
        .iter()
        .map(|&(s, t)| weight * positions[s].distance_squared(positions[t]))
        .sum()
}

/// Fixed penalty per crossing pair of edges with four distinct endpoints.
pub fn crossing_energy(positions: &[Position], edges: &[(usize, usize)], weight: f64) -> f64 {
    let mut total = 0.0;
    for i in 0..edges.len() {
        let (a1, a2) = edges[i];
        for &(b1, b2) in &edges[(i + 1)..] {
            if a1 == b1 || a1 == b2 || a2 == b1 || a2 == b2 {
                continue;
            }
            if segments_intersect(positions[a1], positions[a2], positions[b1], positions[b2]) {
                total += weight;
            }
        }
    }
    total
}

/// Degree-weighted inverse-square attraction between node pairs.
pub fn gravitational_energy(positions: &[Position], degrees: &[usize], weight: f64) -> f64 {
    let mut total = 0.0;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let mass = (degrees[i] * degrees[j]) as f64;
            total += weight * (mass / positions[i].distance_squared(positions[j]));
        }
    }
    total
}
