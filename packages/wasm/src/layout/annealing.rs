//! Simulated annealing over node positions.
//!
//! Each [`AnnealingScheduler::step`] moves one random node by a random offset,
//! re-evaluates the full energy and keeps the move under the Metropolis rule.
//! The temperature drops by [`AnnealingSchedule::cooling_factor`] once a stage
//! has run `dwell_per_node * N` iterations. Offsets shrink as stages advance.

use std::f64::consts::TAU;

use log::{debug, info, warn};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use super::energy::{EnergyModel, EnergyTerms};
use crate::config::{BORDER_MARGIN, GraphType, LayoutConfig};
use crate::error::{LayoutError, Result};
use crate::geometry::Position;
use crate::graph::{Graph, NodeId};

/// Direction resamples allowed before the candidate is clamped into the box.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1_000;

/// Constants of the cooling schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingSchedule {
    pub max_iterations: u64,
    pub max_stages: u32,
    /// The run finishes once the temperature falls to this value.
    pub min_temperature: f64,
    pub cooling_factor: f64,
    /// Iterations per node spent in one stage before cooling.
    pub dwell_per_node: u64,
    /// Lower bound of the random step scalar.
    pub min_step_scalar: f64,
    /// The upper bound of the step scalar shrinks with the stage down to this.
    pub step_scalar_floor: f64,
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self {
            max_iterations: 100_000,
            max_stages: 25,
            min_temperature: 0.0001,
            cooling_factor: 0.8,
            dwell_per_node: 30,
            min_step_scalar: 0.03,
            step_scalar_floor: 0.5,
        }
    }
}

/// Snapshot of the scheduler's progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnealingState {
    pub iteration: u64,
    pub stage: u32,
    pub temperature: f64,
    pub iterations_since_cooling: u64,
    pub energy: EnergyTerms,
}

/// What a single step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The run was already over; nothing changed.
    Finished,
    /// `node` moved and the move was kept.
    Accepted { node: NodeId, delta_energy: f64 },
    /// `node` moved and was put back.
    Rejected { node: NodeId, delta_energy: f64 },
}

impl StepOutcome {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, StepOutcome::Accepted { .. })
    }
}

/// Metropolis acceptance rule.
///
/// `delta_energy` is `previous - candidate`, so positive means the candidate
/// is better. Improvements are accepted without touching `rng`; otherwise the
/// move is kept with probability `exp(delta_energy / temperature)`.
pub fn metropolis_accept<R: Rng + ?Sized>(delta_energy: f64, temperature: f64, rng: &mut R) -> bool {
    if delta_energy > 0.0 {
        return true;
    }
    rng.random::<f64>() < (delta_energy / temperature).exp()
}

/// Uniformly distributed unit vector on the sphere, or on the circle for
/// planar layouts.
pub fn random_direction<R: Rng + ?Sized>(graph_type: GraphType, rng: &mut R) -> Position {
    loop {
        let u = (rng.random::<f64>() - 0.5) * 2.0;
        let t = rng.random::<f64>() * TAU;
        let f = (1.0 - u * u).sqrt();
        let direction = Position::new(f * t.cos(), f * t.sin(), u);

        match graph_type {
            GraphType::Spatial => return direction,
            GraphType::Planar => {
                // A draw at a pole has no planar component
                if let Some(d) = Position::planar(direction.x, direction.y).normalized() {
                    return d;
                }
            }
        }
    }
}

/// Drives the annealing of one graph.
///
/// The scheduler owns the graph; read positions through [`Self::graph`]
/// between steps.
#[derive(Debug)]
pub struct AnnealingScheduler<R: Rng = StdRng> {
    graph: Graph,
    config: LayoutConfig,
    schedule: AnnealingSchedule,
    model: EnergyModel,
    rng: R,

    iteration: u64,
    stage: u32,
    temperature: f64,
    iterations_since_cooling: u64,
    energy: EnergyTerms,

    /// Full offset length at step scalar 1.
    range_radius: f64,
    /// Moved nodes stay within `[-half, half]` on every axis in use.
    box_half_extent: f64,
}

impl<R: Rng> AnnealingScheduler<R> {
    /// Create a scheduler with the default schedule.
    pub fn new(graph: Graph, config: LayoutConfig, rng: R) -> Result<Self> {
        Self::with_schedule(graph, config, AnnealingSchedule::default(), rng)
    }

    pub fn with_schedule(graph: Graph, config: LayoutConfig, schedule: AnnealingSchedule, rng: R) -> Result<Self> {
        if config.num_nodes < 1 {
            return Err(LayoutError::NoNodes);
        }
        if graph.node_count() != config.num_nodes as usize {
            return Err(LayoutError::NodeCount {
                expected: config.num_nodes as usize,
                actual: graph.node_count(),
            });
        }

        let n = config.num_nodes as f64;
        let multiplier = config.space_multiplier();
        let (temperature, box_half_extent) = match config.graph_type {
            GraphType::Planar => (0.02 * n.sqrt(), config.grid_space * multiplier - BORDER_MARGIN),
            GraphType::Spatial => (0.2, config.grid_space * 2.0 - BORDER_MARGIN),
        };

        let model = EnergyModel::new(&config);
        let energy = model.evaluate(&graph);
        info!(
            "Annealing {} nodes / {} edges, initial energy {:.6} at temperature {:.4}",
            graph.node_count(),
            graph.edge_count(),
            energy.total(),
            temperature
        );

        Ok(Self {
            range_radius: config.grid_space * multiplier,
            box_half_extent,
            graph,
            config,
            schedule,
            model,
            rng,
            iteration: 0,
            stage: 0,
            temperature,
            iterations_since_cooling: 0,
            energy,
        })
    }

    // =========================================================================
    // Progress
    // =========================================================================

    /// True once any of the iteration, stage or temperature limits is reached.
    pub fn is_finished(&self) -> bool {
        self.iteration >= self.schedule.max_iterations
            || self.stage >= self.schedule.max_stages
            || self.temperature <= self.schedule.min_temperature
    }

    pub fn state(&self) -> AnnealingState {
        AnnealingState {
            iteration: self.iteration,
            stage: self.stage,
            temperature: self.temperature,
            iterations_since_cooling: self.iterations_since_cooling,
            energy: self.energy,
        }
    }

    /// Energy terms of the current layout.
    pub fn energy(&self) -> &EnergyTerms {
        &self.energy
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn range_radius(&self) -> f64 {
        self.range_radius
    }

    pub fn box_half_extent(&self) -> f64 {
        self.box_half_extent
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Perform one annealing iteration. A no-op once finished.
    pub fn step(&mut self) -> StepOutcome {
        if self.is_finished() {
            return StepOutcome::Finished;
        }

        self.iteration += 1;
        self.iterations_since_cooling += 1;
        if self.iterations_since_cooling > self.schedule.dwell_per_node * self.config.num_nodes as u64 {
            self.temperature *= self.schedule.cooling_factor;
            self.iterations_since_cooling = 0;
            self.stage += 1;
            debug!(
                "Stage {} at iteration {}: temperature {:.6}, energy {:.6}",
                self.stage,
                self.iteration,
                self.temperature,
                self.energy.total()
            );
        }

        let slot = self.rng.random_range(0..self.graph.node_count());
        let previous_position = self.graph.position_at(slot);
        let candidate = self.propose(previous_position);
        self.graph.set_position_at(slot, candidate);

        let terms = self.model.evaluate(&self.graph);
        let delta_energy = self.energy.total() - terms.total();
        let node = self.graph.node_at(slot).unwrap_or(NodeId(slot as u32));

        if metropolis_accept(delta_energy, self.temperature, &mut self.rng) {
            self.energy = terms;
            StepOutcome::Accepted { node, delta_energy }
        } else {
            self.graph.set_position_at(slot, previous_position);
            StepOutcome::Rejected { node, delta_energy }
        }
    }

    /// Step until finished. Returns the number of steps taken.
    pub fn run_to_completion(&mut self) -> u64 {
        let mut steps = 0;
        while self.step() != StepOutcome::Finished {
            steps += 1;
        }
        info!(
            "Annealing finished after {} iterations at stage {}, energy {:.6}",
            self.iteration,
            self.stage,
            self.energy.total()
        );
        steps
    }

    /// Candidate position for a node at `from`, inside the bounding box.
    fn propose(&mut self, from: Position) -> Position {
        let upper = (1.0 - self.stage as f64 / self.schedule.max_stages as f64).max(self.schedule.step_scalar_floor);
        let scalar = self.rng.random_range(self.schedule.min_step_scalar..=upper);
        let length = self.range_radius * scalar;
        let half = self.box_half_extent;

        let mut candidate = from;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            candidate = from + random_direction(self.config.graph_type, &mut self.rng) * length;
            if candidate.within_box(half) {
                return candidate;
            }
        }

        warn!(
            "No in-box offset from {} after {} attempts, clamping",
            from, MAX_PLACEMENT_ATTEMPTS
        );
        candidate.clamp_to_box(half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{generate_graph, scatter_positions};
    use rand::SeedableRng;

    const TOLERANCE: f64 = 1e-9;

    fn scheduler(graph_type: GraphType, n: u32, e: u32, seed: u64) -> AnnealingScheduler {
        let config = LayoutConfig::new(graph_type, n, e, 5.0).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut generated = generate_graph(&config, &mut rng).unwrap();
        scatter_positions(&mut generated.graph, &generated.config, &mut rng);
        AnnealingScheduler::new(generated.graph, generated.config, rng).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let planar = scheduler(GraphType::Planar, 16, 20, 1);
        let state = planar.state();
        assert_eq!(state.iteration, 0);
        assert_eq!(state.stage, 0);
        assert!((state.temperature - 0.08).abs() < TOLERANCE);
        assert_eq!(planar.range_radius(), 5.0);
        assert!((planar.box_half_extent() - 4.9).abs() < TOLERANCE);
        assert_eq!(state.energy, EnergyModel::new(planar.config()).evaluate(planar.graph()));

        let spatial = scheduler(GraphType::Spatial, 40, 50, 1);
        assert!((spatial.state().temperature - 0.2).abs() < TOLERANCE);
        assert_eq!(spatial.range_radius(), 10.0);
        assert!((spatial.box_half_extent() - 9.9).abs() < TOLERANCE);
    }

    #[test]
    fn test_large_planar_graph_widens_box() {
        let planar = scheduler(GraphType::Planar, 40, 60, 2);
        assert_eq!(planar.range_radius(), 10.0);
        assert!((planar.box_half_extent() - 9.9).abs() < TOLERANCE);
    }

    #[test]
    fn test_rejects_mismatched_graph() {
        let config = LayoutConfig::new(GraphType::Planar, 5, 4, 5.0).unwrap();
        let mut graph = Graph::new();
        graph.add_node(NodeId(0), Position::ORIGIN);
        let err = AnnealingScheduler::new(graph, config, StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, LayoutError::NodeCount { expected: 5, actual: 1 });
    }

    #[test]
    fn test_cooling_boundary() {
        let mut annealer = scheduler(GraphType::Planar, 10, 12, 4);
        let initial = annealer.state().temperature;

        for _ in 0..300 {
            annealer.step();
        }
        assert_eq!(annealer.state().stage, 0);
        assert_eq!(annealer.state().iterations_since_cooling, 300);

        annealer.step();
        let state = annealer.state();
        assert_eq!(state.stage, 1);
        assert_eq!(state.iterations_since_cooling, 0);
        assert!((state.temperature - initial * 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn test_finished_step_is_noop() {
        let mut annealer = scheduler(GraphType::Planar, 6, 6, 5);
        annealer.temperature = 0.0001;
        assert!(annealer.is_finished());
        let before = annealer.state();
        let positions = annealer.graph().positions().to_vec();
        assert_eq!(annealer.step(), StepOutcome::Finished);
        assert_eq!(annealer.state(), before);
        assert_eq!(annealer.graph().positions(), positions.as_slice());

        let mut annealer = scheduler(GraphType::Planar, 6, 6, 5);
        annealer.stage = 25;
        assert_eq!(annealer.step(), StepOutcome::Finished);
        assert_eq!(annealer.state().iteration, 0);
    }

    #[test]
    fn test_iteration_limit() {
        let config = LayoutConfig::new(GraphType::Spatial, 8, 10, 3.0).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        let mut generated = generate_graph(&config, &mut rng).unwrap();
        scatter_positions(&mut generated.graph, &generated.config, &mut rng);
        let schedule = AnnealingSchedule {
            max_iterations: 5,
            ..AnnealingSchedule::default()
        };
        let mut annealer =
            AnnealingScheduler::with_schedule(generated.graph, generated.config, schedule, rng).unwrap();

        assert_eq!(annealer.run_to_completion(), 5);
        assert_eq!(annealer.state().iteration, 5);
        assert_eq!(annealer.step(), StepOutcome::Finished);
    }

    #[test]
    fn test_metropolis_improvement_skips_rng() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut twin = StdRng::seed_from_u64(7);
        assert!(metropolis_accept(0.5, 1e-6, &mut rng));
        assert_eq!(rng.random::<u64>(), twin.random::<u64>());
    }

    #[test]
    fn test_some_moves_accepted() {
        let mut annealer = scheduler(GraphType::Planar, 10, 14, 14);
        let accepted = (0..300).filter(|_| annealer.step().is_accepted()).count();
        assert!(accepted > 0);
        assert!(!StepOutcome::Finished.is_accepted());
    }

    #[test]
    fn test_metropolis_worsening_probability() {
        let mut rng = StdRng::seed_from_u64(8);
        // exp(-1000) is effectively zero
        assert!((0..100).all(|_| !metropolis_accept(-1.0, 0.001, &mut rng)));
        // A neutral move has probability exp(0) = 1
        assert!((0..100).all(|_| metropolis_accept(0.0, 0.5, &mut rng)));

        let accepted = (0..4000).filter(|_| metropolis_accept(-0.1, 0.1, &mut rng)).count();
        let rate = accepted as f64 / 4000.0;
        assert!((rate - (-1.0f64).exp()).abs() < 0.05, "rate {rate}");
    }

    #[test]
    fn test_random_direction_is_unit() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let d = random_direction(GraphType::Spatial, &mut rng);
            assert!((d.length() - 1.0).abs() < 1e-12);
            let p = random_direction(GraphType::Planar, &mut rng);
            assert!((p.length() - 1.0).abs() < 1e-12);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_baseline_tracks_layout() {
        let mut annealer = scheduler(GraphType::Planar, 12, 18, 10);
        for _ in 0..500 {
            let before = annealer.state().energy;
            let outcome = annealer.step();
            let evaluated = EnergyModel::new(annealer.config()).evaluate(annealer.graph());
            assert!((annealer.energy().total() - evaluated.total()).abs() < TOLERANCE);
            if let StepOutcome::Rejected { .. } = outcome {
                assert_eq!(annealer.state().energy, before);
            }
        }
    }

    #[test]
    fn test_moved_nodes_stay_in_box() {
        for graph_type in [GraphType::Planar, GraphType::Spatial] {
            let mut annealer = scheduler(graph_type, 10, 14, 11);
            let half = annealer.box_half_extent();
            for _ in 0..1000 {
                if let StepOutcome::Accepted { node, .. } = annealer.step() {
                    let p = annealer.graph().position(node).unwrap();
                    assert!(p.within_box(half), "{node} escaped to {p}");
                    if graph_type == GraphType::Planar {
                        assert_eq!(p.z, 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = scheduler(GraphType::Spatial, 9, 12, 12);
        let mut b = scheduler(GraphType::Spatial, 9, 12, 12);
        for _ in 0..400 {
            assert_eq!(a.step(), b.step());
        }
        assert_eq!(a.graph().positions(), b.graph().positions());
    }

    #[test]
    fn test_full_run_lowers_energy() {
        let mut annealer = scheduler(GraphType::Planar, 10, 15, 13);
        let initial = annealer.energy().total();
        annealer.run_to_completion();
        assert!(annealer.is_finished());
        assert!(annealer.state().stage == 25 || annealer.state().temperature <= 0.0001);
        assert!(annealer.energy().total() < initial);
    }
}
