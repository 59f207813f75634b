//! Annealed Layout - WASM Module
//!
//! Lays out random connected graphs in the plane or in space by simulated
//! annealing. It is compiled to WebAssembly and exposes a JavaScript-friendly
//! API via wasm-bindgen; a renderer calls `step()` once per frame and redraws
//! the edges from `getEdgeSegments()`.
//!
//! # Architecture
//!
//! - `config`: Layout configuration and derived energy weights
//! - `geometry`: Positions and the segment intersection predicate
//! - `graph`: Graph data structure using petgraph's StableGraph, plus the
//!   random connected graph generator
//! - `layout`: Energy model and the annealing scheduler

use js_sys::{Float32Array, Uint32Array};
use log::Level;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod layout;

use config::LayoutOptions;
use error::{LayoutError, Result};
use graph::{NodeId, generate_graph, scatter_positions};
use layout::AnnealingScheduler;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(Level::Debug);
    console_error_panic_hook::set_once();
}

/// Generate a graph, scatter it and hand it to a fresh scheduler.
///
/// The same `seed` drives generation, the initial positions and every
/// annealing step, so a run is fully reproducible.
pub fn build_scheduler(options: &LayoutOptions, seed: u64) -> Result<AnnealingScheduler> {
    let config = options.to_config()?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut generated = generate_graph(&config, &mut rng)?;
    scatter_positions(&mut generated.graph, &generated.config, &mut rng);

    AnnealingScheduler::new(generated.graph, generated.config, rng)
}

fn random_seed() -> u64 {
    let high = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let low = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (high << 32) | low
}

fn decode_options(options: JsValue) -> Result<LayoutOptions> {
    serde_wasm_bindgen::from_value(options).map_err(|err| LayoutError::options(err.to_string()))
}

/// Main entry point for the layout engine.
///
/// This struct wraps the annealing scheduler and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct AnnealedLayoutWasm {
    scheduler: AnnealingScheduler,
}

#[wasm_bindgen]
impl AnnealedLayoutWasm {
    /// Generate a graph and prepare it for annealing.
    ///
    /// `options` is `{ graphType: "2d" | "3d", numNodes, numEdges, gridSpace, seed? }`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> std::result::Result<AnnealedLayoutWasm, JsError> {
        let options = decode_options(options)?;
        let seed = options.seed.unwrap_or_else(random_seed);
        Ok(Self {
            scheduler: build_scheduler(&options, seed)?,
        })
    }

    /// Discard the current graph and build a new one from `options`.
    pub fn restart(&mut self, options: JsValue) -> std::result::Result<(), JsError> {
        let options = decode_options(options)?;
        let seed = options.seed.unwrap_or_else(random_seed);
        self.scheduler = build_scheduler(&options, seed)?;
        Ok(())
    }

    // =========================================================================
    // Annealing
    // =========================================================================

    /// Run one annealing iteration.
    ///
    /// Returns false if the run had already finished.
    pub fn step(&mut self) -> bool {
        self.scheduler.step() != layout::StepOutcome::Finished
    }

    /// Run up to `count` iterations. Returns how many actually ran.
    #[wasm_bindgen(js_name = stepMany)]
    pub fn step_many(&mut self, count: u32) -> u32 {
        let mut ran = 0;
        while ran < count && self.step() {
            ran += 1;
        }
        ran
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.scheduler.is_finished()
    }

    /// Current energy terms as `{ distribution, borderline, edgeLength, crossing, gravitational }`.
    pub fn energy(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.scheduler.energy())?)
    }

    /// Iteration, stage, temperature and energy as a plain object.
    pub fn state(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.scheduler.state())?)
    }

    // =========================================================================
    // Graph Access
    // =========================================================================

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.scheduler.graph().node_count() as u32
    }

    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.scheduler.graph().edge_count() as u32
    }

    /// Node positions as [x0, y0, z0, x1, y1, z1, ...], z is 0 for planar graphs.
    #[wasm_bindgen(js_name = getPositions)]
    pub fn get_positions(&self) -> Float32Array {
        Float32Array::from(&self.scheduler.graph().positions_f32()[..])
    }

    /// Edge endpoints as [sx, sy, sz, tx, ty, tz] per edge, in edge order.
    ///
    /// Re-read after every step; the order never changes for one graph.
    #[wasm_bindgen(js_name = getEdgeSegments)]
    pub fn get_edge_segments(&self) -> Float32Array {
        Float32Array::from(&self.scheduler.graph().edge_segments_f32()[..])
    }

    /// Edge endpoint ids as [src0, tgt0, src1, tgt1, ...].
    #[wasm_bindgen(js_name = getEdgePairs)]
    pub fn get_edge_pairs(&self) -> Uint32Array {
        Uint32Array::from(&self.scheduler.graph().edge_pairs()[..])
    }

    /// A node's position as [x, y, z], or undefined for an unknown id.
    #[wasm_bindgen(js_name = getNodePosition)]
    pub fn get_node_position(&self, node_id: u32) -> Option<Vec<f32>> {
        self.scheduler
            .graph()
            .position(NodeId(node_id))
            .map(|p| vec![p.x as f32, p.y as f32, p.z as f32])
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use config::GraphType;
    use layout::{EnergyModel, StepOutcome};

    fn options(graph_type: GraphType, num_nodes: u32, num_edges: u32) -> LayoutOptions {
        LayoutOptions {
            graph_type,
            num_nodes,
            num_edges,
            grid_space: 5.0,
            seed: None,
        }
    }

    /// Drives a scheduler the way the facade does and checks what a renderer
    /// would read each frame.
    #[test]
    fn test_frame_loop_pipeline() {
        let mut scheduler = build_scheduler(&options(GraphType::Planar, 20, 30), 42).unwrap();
        let edges = scheduler.graph().edge_pairs();
        assert_eq!(edges.len(), scheduler.graph().edge_count() * 2);

        for _ in 0..200 {
            scheduler.step();
            let segments = scheduler.graph().edge_segments_f32();
            assert_eq!(segments.len(), scheduler.graph().edge_count() * 6);
            // Planar layouts never leave z = 0
            assert!(segments.chunks(3).all(|p| p[2] == 0.0));
            // Edge order is stable across steps
            assert_eq!(scheduler.graph().edge_pairs(), edges);
        }
        assert_eq!(scheduler.state().iteration, 200);
    }

    #[test]
    fn test_seed_reproduces_run() {
        let opts = options(GraphType::Spatial, 12, 20);
        let mut a = build_scheduler(&opts, 7).unwrap();
        let mut b = build_scheduler(&opts, 7).unwrap();
        assert_eq!(a.graph().edge_pairs(), b.graph().edge_pairs());
        for _ in 0..300 {
            a.step();
            b.step();
        }
        assert_eq!(a.graph().positions_f32(), b.graph().positions_f32());
        assert_eq!(a.state(), b.state());
    }

    /// Restarting replaces the topology wholesale.
    #[test]
    fn test_rebuild_with_new_counts() {
        let mut scheduler = build_scheduler(&options(GraphType::Planar, 10, 12), 1).unwrap();
        for _ in 0..50 {
            scheduler.step();
        }

        scheduler = build_scheduler(&options(GraphType::Spatial, 25, 40), 2).unwrap();
        assert_eq!(scheduler.graph().node_count(), 25);
        assert!(scheduler.graph().edge_count() >= 40);
        assert_eq!(scheduler.state().iteration, 0);
        assert_eq!(
            scheduler.state().energy,
            EnergyModel::new(scheduler.config()).evaluate(scheduler.graph())
        );
    }

    #[test]
    fn test_invalid_options_fail_fast() {
        assert_eq!(
            build_scheduler(&options(GraphType::Planar, 0, 0), 0).unwrap_err(),
            LayoutError::NoNodes
        );
        assert!(matches!(
            build_scheduler(&options(GraphType::Planar, 4, 7), 0),
            Err(LayoutError::TooManyEdges { max: 6, .. })
        ));

        let mut tiny = options(GraphType::Planar, 4, 3);
        tiny.grid_space = 0.05;
        assert!(matches!(
            build_scheduler(&tiny, 0),
            Err(LayoutError::InvalidGridSpace { .. })
        ));
    }

    #[test]
    fn test_single_node_layout() {
        let mut scheduler = build_scheduler(&options(GraphType::Planar, 1, 0), 3).unwrap();
        assert_eq!(scheduler.energy().total(), 0.0);
        for _ in 0..10 {
            assert!(matches!(scheduler.step(), StepOutcome::Accepted { .. } | StepOutcome::Rejected { .. }));
        }
        assert_eq!(scheduler.energy().total(), 0.0);
    }
}
