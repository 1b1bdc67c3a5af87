//! Shared value types for the cubes workspace.
//!
//! # Invariants
//! - Types here carry no behavior beyond construction and validation.
//! - Render flags are only mutated by input actions, never by the simulation.

pub mod config;
pub mod types;

pub use config::{ConfigError, SimConfig, ViewConfig};
pub use types::{RenderFlags, Rgba8, SubmissionMode};
