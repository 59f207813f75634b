//! Error types for layout construction.
//!
//! Every failure is a configuration problem detected before the annealing
//! loop starts. Once a scheduler exists, `step()` cannot fail.

use thiserror::Error;

/// Unified error type for graph generation and layout construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The weights divide by the node count, so an empty graph is rejected.
    #[error("a layout needs at least one node")]
    NoNodes,

    /// More edges requested than a simple graph on `num_nodes` can hold.
    #[error("{requested} edges requested but a simple graph on {num_nodes} nodes holds at most {max}")]
    TooManyEdges {
        requested: u32,
        num_nodes: u32,
        max: u64,
    },

    /// Grid space must leave a non-empty bounding box after the border margin.
    #[error("grid space must be finite and greater than {min}, got {value}")]
    InvalidGridSpace { value: f64, min: f64 },

    /// The graph handed to the scheduler does not match the configuration.
    #[error("configuration expects {expected} nodes but the graph has {actual}")]
    NodeCount { expected: usize, actual: usize },

    /// Options object from JavaScript could not be decoded.
    #[error("invalid layout options: {0}")]
    Options(String),
}

impl LayoutError {
    /// Creates an options error.
    pub fn options(message: impl Into<String>) -> Self {
        LayoutError::Options(message.into())
    }
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, LayoutError>;
