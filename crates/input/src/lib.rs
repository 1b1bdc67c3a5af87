//! Controller input: polled button sets, press-edge detection, runtime actions.
//!
//! # Invariants
//! - Actions fire on press transitions only, never while a button is held.
//! - A missing device produces no actions and does not reset edge state.

pub mod action;
pub mod source;

pub use action::Action;
pub use source::{Button, ButtonSet, EdgeDetector, HeldButtons, InputSource, NoInput, ScriptedInput};
