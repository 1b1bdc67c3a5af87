//! Developer tooling: frame-rate statistics and diagnostics sinks.
//!
//! # Invariants
//! - Diagnostics are observational only; nothing here feeds back into the simulation.

mod diagnostics;
mod stats;

pub use diagnostics::{Diagnostics, NullDiagnostics, TracingDiagnostics};
pub use stats::FrameRateStats;
