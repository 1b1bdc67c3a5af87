//! Simulation kernel: cube population, scale table, fixed-step physics, clock.
//!
//! # Invariants
//! - Population size never changes after startup; inserts past capacity are ignored.
//! - Physics and rendering walk every slot of the fixed capacity, not only populated ones.
//! - Simulation time advances by a constant `dt`, independent of wall-clock pacing.

pub mod physics;
pub mod population;
pub mod simulation;
pub mod spawn;

pub use population::{Cube, CubePopulation, ScaleTable};
pub use simulation::Simulation;
