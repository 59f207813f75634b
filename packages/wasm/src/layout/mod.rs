//! Energy-driven layout.
//!
//! [`EnergyModel`] scores a layout; [`AnnealingScheduler`] improves it one
//! random node move at a time.

pub mod annealing;
pub mod energy;

pub use annealing::{
    AnnealingSchedule, AnnealingScheduler, AnnealingState, MAX_PLACEMENT_ATTEMPTS, StepOutcome,
    metropolis_accept, random_direction,
};
pub use energy::{EnergyModel, EnergyTerms};
