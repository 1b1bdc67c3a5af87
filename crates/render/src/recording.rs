use std::fmt;

use cubes_common::{Rgba8, SubmissionMode};
use glam::Mat4;

use crate::backend::{GraphicsBackend, MatrixState, Primitive};

/// One captured draw with the state it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub model_view: Mat4,
    pub projection: Mat4,
    pub submission: SubmissionMode,
    pub primitive: Primitive,
    /// Vertices consumed by the draw.
    pub vertex_count: u32,
    /// Vertices bound when the draw was issued.
    pub bound_vertices: u32,
    pub blending: bool,
}

/// Headless backend that records draws instead of rasterizing them.
///
/// `clear` starts a new frame: draws issued since the previous clear are
/// dropped, matching what a cleared framebuffer would show.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    matrices: MatrixState,
    viewport: Option<(u32, u32)>,
    clear_color: [f32; 4],
    blending: bool,
    bound_vertices: Option<u32>,
    draws: Vec<DrawCall>,
    clears: u64,
    total_draws: u64,
    max_depth: usize,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            matrices: MatrixState::new(),
            viewport: None,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            blending: false,
            bound_vertices: None,
            draws: Vec::new(),
            clears: 0,
            total_draws: 0,
            max_depth: 1,
        }
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws issued since the last clear.
    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn clears(&self) -> u64 {
        self.clears
    }

    pub fn total_draws(&self) -> u64 {
        self.total_draws
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn blending(&self) -> bool {
        self.blending
    }

    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.viewport
    }

    pub fn arrays_bound(&self) -> bool {
        self.bound_vertices.is_some()
    }

    /// Deepest model-view or projection stack seen so far.
    pub fn max_stack_depth(&self) -> usize {
        self.max_depth
    }

    pub fn summary(&self) -> FrameSummary {
        let indexed = self
            .draws
            .iter()
            .filter(|d| d.submission == SubmissionMode::Indexed)
            .count();
        FrameSummary {
            frames: self.clears,
            draws: self.draws.len(),
            indexed_draws: indexed,
            array_draws: self.draws.len() - indexed,
            vertices: self.draws.iter().map(|d| d.vertex_count as u64).sum(),
            blending: self.blending,
            clear_color: self.clear_color,
        }
    }

    fn record(&mut self, submission: SubmissionMode, primitive: Primitive, vertex_count: u32) {
        let Some(bound_vertices) = self.bound_vertices else {
            tracing::warn!(?submission, "draw issued with no arrays bound, skipped");
            return;
        };
        self.total_draws += 1;
        self.draws.push(DrawCall {
            model_view: self.matrices.model_view(),
            projection: self.matrices.projection(),
            submission,
            primitive,
            vertex_count,
            bound_vertices,
            blending: self.blending,
        });
    }
}

impl GraphicsBackend for RecordingBackend {
    fn matrices(&self) -> &MatrixState {
        &self.matrices
    }

    fn matrices_mut(&mut self) -> &mut MatrixState {
        &mut self.matrices
    }

    fn push_matrix(&mut self) {
        self.matrices.push();
        self.max_depth = self.max_depth.max(self.matrices.depth());
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.draws.clear();
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blending = enabled;
    }

    fn bind_arrays(&mut self, positions: &[[f32; 3]], colors: &[Rgba8]) {
        self.bound_vertices = Some(positions.len().min(colors.len()) as u32);
    }

    fn unbind_arrays(&mut self) {
        self.bound_vertices = None;
    }

    fn draw_arrays(&mut self, primitive: Primitive, _first: u32, count: u32) {
        self.record(SubmissionMode::Arrays, primitive, count);
    }

    fn draw_elements(&mut self, primitive: Primitive, indices: &[u32]) {
        self.record(SubmissionMode::Indexed, primitive, indices.len() as u32);
    }
}

/// Human-readable digest of the last recorded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub frames: u64,
    pub draws: usize,
    pub indexed_draws: usize,
    pub array_draws: usize,
    pub vertices: u64,
    pub blending: bool,
    pub clear_color: [f32; 4],
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame {}: draws={} (indexed={}, arrays={}) vertices={} blending={} clear=({:.1}, {:.1}, {:.1}, {:.1})",
            self.frames,
            self.draws,
            self.indexed_draws,
            self.array_draws,
            self.vertices,
            if self.blending { "on" } else { "off" },
            self.clear_color[0],
            self.clear_color[1],
            self.clear_color[2],
            self.clear_color[3],
        )
    }
}
