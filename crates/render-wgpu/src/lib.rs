//! wgpu render backend for the cubes demo.
//!
//! Implements the fixed-function style [`cubes_render::GraphicsBackend`] by
//! recording draws during a tick and replaying them in a single render pass
//! when the frame is presented.
//!
//! # Invariants
//! - Quads are split into two triangles; array-order draws stay non-indexed.
//! - Each draw carries its own clip-space transform as instance data.
//! - A clear drops every draw recorded before it.

mod error;
mod gpu;
mod shaders;
mod surface;

pub use error::BackendError;
pub use gpu::WgpuBackend;
pub use surface::{SurfacePresenter, init_surface};
