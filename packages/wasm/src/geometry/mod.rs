//! Geometry helpers for the energy model.
//!
//! Positions are three-component vectors so the same code serves both the
//! planar and spatial layouts; planar positions keep `z == 0`.

mod segment;
mod vector;

pub use segment::segments_intersect;
pub use vector::Position;
