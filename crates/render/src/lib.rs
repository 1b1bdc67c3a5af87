//! Render core: transform stack, unit-cube geometry, per-cube orchestration and
//! the per-tick frame controller.
//!
//! # Invariants
//! - Rendering reads simulation state; only the frame controller's tick mutates it.
//! - Every per-cube transform is isolated by a push/pop pair.
//! - Both submission modes bind identical vertex positions and colors.

pub mod backend;
pub mod camera;
pub mod frame;
pub mod frame_loop;
pub mod geometry;
pub mod orchestrator;
pub mod present;
pub mod recording;

pub use backend::{GraphicsBackend, MatrixMode, MatrixState, Primitive, strip_translation};
pub use camera::CameraRig;
pub use frame::FrameController;
pub use frame_loop::FrameLoop;
pub use geometry::CubeGeometry;
pub use orchestrator::render_cubes;
pub use present::{NoopPresenter, Presenter};
pub use recording::{DrawCall, FrameSummary, RecordingBackend};
