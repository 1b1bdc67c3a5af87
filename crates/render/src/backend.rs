use cubes_common::Rgba8;
use glam::{Mat4, Vec3};

/// Which matrix stack transform calls act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixMode {
    #[default]
    ModelView,
    Projection,
}

/// How consecutive vertices are assembled into faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Four vertices per face.
    Quads,
    Triangles,
}

impl Primitive {
    pub fn vertices_per_face(self) -> u32 {
        match self {
            Self::Quads => 4,
            Self::Triangles => 3,
        }
    }
}

/// Model-view and projection stacks with fixed-function semantics: every
/// transform post-multiplies the top of the current stack.
#[derive(Debug, Clone)]
pub struct MatrixState {
    mode: MatrixMode,
    model_view: Vec<Mat4>,
    projection: Vec<Mat4>,
}

impl Default for MatrixState {
    fn default() -> Self {
        Self {
            mode: MatrixMode::ModelView,
            model_view: vec![Mat4::IDENTITY],
            projection: vec![Mat4::IDENTITY],
        }
    }
}

impl MatrixState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> MatrixMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
    }

    fn stack(&self) -> &Vec<Mat4> {
        match self.mode {
            MatrixMode::ModelView => &self.model_view,
            MatrixMode::Projection => &self.projection,
        }
    }

    fn stack_mut(&mut self) -> &mut Vec<Mat4> {
        match self.mode {
            MatrixMode::ModelView => &mut self.model_view,
            MatrixMode::Projection => &mut self.projection,
        }
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        // Stacks are created non-empty and `pop` never removes the base entry.
        let stack = self.stack_mut();
        let last = stack.len() - 1;
        &mut stack[last]
    }

    /// Depth of the current stack; 1 when nothing is pushed.
    pub fn depth(&self) -> usize {
        self.stack().len()
    }

    pub fn model_view(&self) -> Mat4 {
        self.model_view[self.model_view.len() - 1]
    }

    pub fn projection(&self) -> Mat4 {
        self.projection[self.projection.len() - 1]
    }

    pub fn push(&mut self) {
        let top = *self.top_mut();
        self.stack_mut().push(top);
    }

    /// Restore the previously pushed matrix. Popping the base entry is ignored.
    pub fn pop(&mut self) {
        let mode = self.mode;
        let stack = self.stack_mut();
        if stack.len() > 1 {
            stack.pop();
        } else {
            tracing::warn!(?mode, "matrix stack underflow ignored");
        }
    }

    pub fn load(&mut self, m: Mat4) {
        *self.top_mut() = m;
    }

    pub fn load_identity(&mut self) {
        self.load(Mat4::IDENTITY);
    }

    pub fn multiply(&mut self, m: Mat4) {
        let top = self.top_mut();
        *top *= m;
    }

    pub fn translate(&mut self, v: Vec3) {
        self.multiply(Mat4::from_translation(v));
    }

    /// Rotate `angle_degrees` about `axis`. The axis is normalized; a zero
    /// axis leaves the matrix unchanged.
    pub fn rotate(&mut self, angle_degrees: f32, axis: Vec3) {
        if let Some(axis) = axis.try_normalize() {
            self.multiply(Mat4::from_axis_angle(axis, angle_degrees.to_radians()));
        }
    }

    pub fn scale(&mut self, s: Vec3) {
        self.multiply(Mat4::from_scale(s));
    }

    /// Right-handed perspective with OpenGL clip depth `[-1, 1]`.
    pub fn perspective(&mut self, fov_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.multiply(Mat4::perspective_rh_gl(
            fov_degrees.to_radians(),
            aspect,
            near,
            far,
        ));
    }

    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.multiply(Mat4::look_at_rh(eye, target, up));
    }
}

/// Zero the translation entries (column-major 12, 13, 14) and leave the rest
/// of the matrix untouched.
pub fn strip_translation(m: Mat4) -> Mat4 {
    let mut out = m;
    out.w_axis.x = 0.0;
    out.w_axis.y = 0.0;
    out.w_axis.z = 0.0;
    out
}

/// Fixed-function style graphics context.
///
/// Backends own a [`MatrixState`] and expose it through `matrices`; the
/// transform calls are provided on top of it. Blending, when enabled, is
/// source-alpha over one-minus-source-alpha with depth test `<=`.
pub trait GraphicsBackend {
    fn matrices(&self) -> &MatrixState;
    fn matrices_mut(&mut self) -> &mut MatrixState;

    fn set_viewport(&mut self, width: u32, height: u32);
    fn set_clear_color(&mut self, color: [f32; 4]);
    /// Clear color and depth buffers.
    fn clear(&mut self);
    fn set_blending(&mut self, enabled: bool);

    /// Bind per-vertex positions (3 floats) and colors (4 bytes).
    fn bind_arrays(&mut self, positions: &[[f32; 3]], colors: &[Rgba8]);
    fn unbind_arrays(&mut self);
    /// Draw `count` bound vertices in array order starting at `first`.
    fn draw_arrays(&mut self, primitive: Primitive, first: u32, count: u32);
    /// Draw bound vertices in the order given by `indices`.
    fn draw_elements(&mut self, primitive: Primitive, indices: &[u32]);

    fn matrix_mode(&mut self, mode: MatrixMode) {
        self.matrices_mut().set_mode(mode);
    }

    fn load_identity(&mut self) {
        self.matrices_mut().load_identity();
    }

    fn load_matrix(&mut self, m: Mat4) {
        self.matrices_mut().load(m);
    }

    fn push_matrix(&mut self) {
        self.matrices_mut().push();
    }

    fn pop_matrix(&mut self) {
        self.matrices_mut().pop();
    }

    fn translate(&mut self, v: Vec3) {
        self.matrices_mut().translate(v);
    }

    fn rotate(&mut self, angle_degrees: f32, axis: Vec3) {
        self.matrices_mut().rotate(angle_degrees, axis);
    }

    fn scale(&mut self, s: Vec3) {
        self.matrices_mut().scale(s);
    }

    fn perspective(&mut self, fov_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.matrices_mut().perspective(fov_degrees, aspect, near, far);
    }

    fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.matrices_mut().look_at(eye, target, up);
    }

    /// Read back the top of the model-view stack.
    fn model_view(&self) -> Mat4 {
        self.matrices().model_view()
    }

    fn projection(&self) -> Mat4 {
        self.matrices().projection()
    }
}
