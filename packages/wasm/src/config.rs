//! Layout configuration.
//!
//! A [`LayoutConfig`] is an immutable value handed to the generator and the
//! scheduler. The energy weights are derived from the node and edge counts,
//! so any change to the topology goes through [`LayoutConfig::with_edge_count`]
//! which re-derives them.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Margin kept between annealed nodes and the bounding box border.
pub const BORDER_MARGIN: f64 = 0.1;

/// Whether the layout runs in the plane or in space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphType {
    /// Planar layout; the z coordinate stays at zero.
    #[serde(rename = "2d")]
    Planar,
    /// Spatial layout using all three axes.
    #[serde(rename = "3d")]
    Spatial,
}

impl GraphType {
    /// Number of axes a position uses.
    #[inline]
    pub fn dimensions(self) -> usize {
        match self {
            GraphType::Planar => 2,
            GraphType::Spatial => 3,
        }
    }
}

/// The five weights of the energy function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyWeights {
    /// lambda1: node distribution (pairwise repulsion).
    pub distribution: f64,
    /// lambda2: borderline (repulsion from the boundary points).
    pub borderline: f64,
    /// lambda3: squared edge length.
    pub edge_length: f64,
    /// lambda4: penalty per edge crossing (planar only).
    pub crossing: f64,
    /// lambda5: degree-weighted attraction (spatial only).
    pub gravitation: f64,
}

impl EnergyWeights {
    /// Derive the weights from the node and edge counts.
    ///
    /// `num_nodes` must be at least 1. A single node has no possible edges,
    /// so its edge density is taken as zero.
    pub fn derive(num_nodes: u32, num_edges: u32) -> Self {
        let n = num_nodes as f64;
        let ordered_pairs = n * (n - 1.0);
        let density = if ordered_pairs > 0.0 {
            num_edges as f64 / ordered_pairs
        } else {
            0.0
        };

        Self {
            distribution: 1.0 / n,
            borderline: 0.0,
            edge_length: density * 0.05,
            crossing: (1.0 - density.sqrt()) * 2.0,
            gravitation: 1.0,
        }
    }
}

/// Validated layout configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub graph_type: GraphType,
    pub num_nodes: u32,
    pub num_edges: u32,
    /// Half-extent of the initial scatter region.
    pub grid_space: f64,
    pub weights: EnergyWeights,
}

impl LayoutConfig {
    /// Build a configuration, rejecting inputs that would make the weights
    /// undefined or the generator unable to terminate.
    pub fn new(graph_type: GraphType, num_nodes: u32, num_edges: u32, grid_space: f64) -> Result<Self> {
        if num_nodes < 1 {
            return Err(LayoutError::NoNodes);
        }

        let max = Self::max_edges(num_nodes);
        if num_edges as u64 > max {
            return Err(LayoutError::TooManyEdges {
                requested: num_edges,
                num_nodes,
                max,
            });
        }

        if !grid_space.is_finite() || grid_space <= BORDER_MARGIN {
            return Err(LayoutError::InvalidGridSpace {
                value: grid_space,
                min: BORDER_MARGIN,
            });
        }

        Ok(Self {
            graph_type,
            num_nodes,
            num_edges,
            grid_space,
            weights: EnergyWeights::derive(num_nodes, num_edges),
        })
    }

    /// Maximum edge count of a simple undirected graph on `num_nodes` nodes.
    #[inline]
    pub fn max_edges(num_nodes: u32) -> u64 {
        let n = num_nodes as u64;
        n * n.saturating_sub(1) / 2
    }

    /// The same configuration with the edge count replaced and the weights
    /// re-derived. Used after generation, when repair may have added edges.
    pub fn with_edge_count(self, num_edges: u32) -> Self {
        Self {
            num_edges,
            weights: EnergyWeights::derive(self.num_nodes, num_edges),
            ..self
        }
    }

    /// Grows the planar layout region once the graph exceeds 20 nodes.
    #[inline]
    pub fn space_multiplier(&self) -> f64 {
        (self.num_nodes as f64 / 20.0).max(1.0)
    }
}

/// Layout options as sent by the JavaScript control surface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    pub graph_type: GraphType,
    pub num_nodes: u32,
    pub num_edges: u32,
    pub grid_space: f64,
    /// Seed for the generator and scheduler. Drawn at random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl LayoutOptions {
    /// Validate the options into a configuration.
    pub fn to_config(&self) -> Result<LayoutConfig> {
        LayoutConfig::new(self.graph_type, self.num_nodes, self.num_edges, self.grid_space)
    }
}
