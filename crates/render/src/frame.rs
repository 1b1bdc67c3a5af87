use cubes_common::{RenderFlags, SimConfig, SubmissionMode, ViewConfig};
use cubes_input::Action;
use cubes_kernel::Simulation;
use cubes_tools::Diagnostics;

use crate::backend::{GraphicsBackend, MatrixMode, strip_translation};
use crate::camera::CameraRig;
use crate::geometry::CubeGeometry;
use crate::orchestrator::render_cubes;

/// Per-tick entry point. Owns the simulation, the render flags and the camera,
/// and sequences clock, camera, physics, drawing and the model-view correction.
#[derive(Debug, Clone)]
pub struct FrameController {
    sim: Simulation,
    geometry: CubeGeometry,
    camera: CameraRig,
    view: ViewConfig,
    flags: RenderFlags,
    running: bool,
}

impl FrameController {
    /// Controller over a freshly seeded, full population.
    pub fn new(config: SimConfig, view: ViewConfig) -> Self {
        Self::with_simulation(Simulation::seeded(config), view)
    }

    pub fn with_simulation(sim: Simulation, view: ViewConfig) -> Self {
        let camera = CameraRig::new(sim.config(), &view);
        let flags = sim.config().flags;
        Self {
            sim,
            geometry: CubeGeometry::new(),
            camera,
            view,
            flags,
            running: true,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn flags(&self) -> RenderFlags {
        self.flags
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Clear color for the active submission mode.
    pub fn clear_color(&self) -> [f32; 4] {
        match self.flags.submission {
            SubmissionMode::Indexed => self.view.clear_indexed,
            SubmissionMode::Arrays => self.view.clear_arrays,
        }
    }

    /// One-time backend setup: viewport, blending, clear color, projection.
    pub fn initialize<B: GraphicsBackend + ?Sized>(&self, backend: &mut B) {
        backend.set_blending(self.flags.blending);
        backend.set_viewport(self.view.width, self.view.height);
        backend.set_clear_color(self.clear_color());
        self.camera.apply_projection(backend);

        tracing::info!(
            cubes = self.sim.population().len(),
            capacity = self.sim.population().capacity(),
            width = self.view.width,
            height = self.view.height,
            "frame controller initialized"
        );
    }

    /// Advance and draw one tick.
    pub fn tick<B, D>(&mut self, backend: &mut B, diagnostics: &mut D)
    where
        B: GraphicsBackend + ?Sized,
        D: Diagnostics + ?Sized,
    {
        let _span = tracing::trace_span!("tick", tick = self.sim.tick() + 1).entered();

        if self.sim.advance_clock() {
            diagnostics.periodic();
        }
        self.sim.advance_rotation();
        let zoom = self.sim.zoom_offset();

        backend.clear();
        backend.matrix_mode(MatrixMode::ModelView);
        backend.load_identity();
        self.camera.apply_view(backend, zoom);

        // The camera only lives in setup; cubes are placed from identity.
        backend.load_identity();

        self.sim.step_physics();
        render_cubes(
            backend,
            &self.geometry,
            self.sim.population(),
            self.sim.scales(),
            self.sim.angle_degrees(),
            self.flags.submission,
        );

        let model_view = backend.model_view();
        backend.matrix_mode(MatrixMode::ModelView);
        backend.load_matrix(strip_translation(model_view));
    }

    /// React to an input action.
    pub fn apply<B: GraphicsBackend + ?Sized>(&mut self, action: Action, backend: &mut B) {
        match action {
            Action::Quit => {
                self.running = false;
            }
            Action::ToggleSubmissionMode => {
                self.flags.submission = self.flags.submission.toggled();
                backend.set_clear_color(self.clear_color());
            }
            Action::ToggleBlending => {
                self.flags.blending = !self.flags.blending;
                backend.set_blending(self.flags.blending);
            }
        }
        tracing::info!(?action, flags = ?self.flags, running = self.running, "applied action");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingBackend;
    use cubes_tools::NullDiagnostics;
    use glam::{Mat3, Mat4, Vec3};

    #[derive(Default)]
    struct CountingDiagnostics {
        periodic: u32,
    }

    impl Diagnostics for CountingDiagnostics {
        fn periodic(&mut self) {
            self.periodic += 1;
        }
    }

    fn controller() -> (FrameController, RecordingBackend) {
        let c = FrameController::new(SimConfig::default(), ViewConfig::default());
        let mut b = RecordingBackend::new();
        c.initialize(&mut b);
        (c, b)
    }

    #[test]
    fn initialize_sets_up_backend() {
        let (c, b) = controller();
        assert_eq!(b.viewport(), Some((640, 480)));
        assert!(b.blending());
        assert_eq!(b.clear_color(), [0.0, 0.0, 0.3, 1.0]);
        assert!(b.projection().abs_diff_eq(c.camera().projection_matrix(), 1e-6));
        assert_eq!(c.simulation().population().len(), 350);
    }

    #[test]
    fn tick_draws_full_capacity_under_projection() {
        let (mut c, mut b) = controller();
        c.tick(&mut b, &mut NullDiagnostics);

        assert_eq!(b.clears(), 1);
        assert_eq!(b.draws().len(), 350);
        let projection = c.camera().projection_matrix();
        assert!(b.draws().iter().all(|d| d.projection.abs_diff_eq(projection, 1e-6)));
        assert_eq!(b.matrices().depth(), 1);
    }

    #[test]
    fn cubes_are_drawn_without_the_camera() {
        let (mut c, mut b) = controller();
        c.tick(&mut b, &mut NullDiagnostics);

        for (slot, draw) in b.draws().iter().enumerate() {
            let position = c.simulation().population().slots()[slot].position;
            assert!(draw.model_view.w_axis.truncate().abs_diff_eq(position, 1e-5));
        }
    }

    #[test]
    fn model_view_translation_is_zeroed_after_tick() {
        let (mut c, mut b) = controller();
        for _ in 0..3 {
            c.tick(&mut b, &mut NullDiagnostics);
            let m = b.model_view();
            assert_eq!(&m.to_cols_array()[12..15], &[0.0, 0.0, 0.0]);
            assert_eq!(Mat3::from_mat4(m), Mat3::IDENTITY);
        }
    }

    #[test]
    fn correction_keeps_rotation_block_of_prior_matrix() {
        let mut b = RecordingBackend::new();
        let prior = Mat4::from_scale_rotation_translation(
            Vec3::splat(0.5),
            glam::Quat::from_rotation_y(0.7),
            Vec3::new(1.0, 2.0, 3.0),
        );
        b.load_matrix(prior);
        let corrected = strip_translation(b.model_view());
        b.load_matrix(corrected);
        assert_eq!(Mat3::from_mat4(b.model_view()), Mat3::from_mat4(prior));
        assert_eq!(b.model_view().w_axis, glam::Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn single_cube_overshoots_then_reflects() {
        let mut sim = Simulation::new(SimConfig {
            capacity: 1,
            ..SimConfig::default()
        });
        sim.population_mut().add(0.3, 2.99, 0.0, 0.0, 1.0, 0.0, 0.0);
        let mut c = FrameController::with_simulation(sim, ViewConfig::default());
        let mut b = RecordingBackend::new();
        c.initialize(&mut b);

        c.tick(&mut b, &mut NullDiagnostics);
        let cube = c.simulation().population().cubes()[0];
        assert!((cube.position.x - 3.0067).abs() < 1e-3);
        assert_eq!(cube.velocity.x, -1.0);
        assert!(b.draws()[0].model_view.w_axis.x > 3.0);
    }

    #[test]
    fn statistics_fire_every_interval() {
        let (mut c, mut b) = controller();
        let mut d = CountingDiagnostics::default();
        for _ in 0..1300 {
            c.tick(&mut b, &mut d);
        }
        assert_eq!(d.periodic, 2);
    }

    #[test]
    fn angle_stays_wrapped_across_ticks() {
        let mut sim = Simulation::new(SimConfig {
            capacity: 1,
            ..SimConfig::default()
        });
        sim.population_mut().add(0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let mut c = FrameController::with_simulation(sim, ViewConfig::default());
        let mut b = RecordingBackend::new();
        for _ in 0..2000 {
            c.tick(&mut b, &mut NullDiagnostics);
            let a = c.simulation().angle_degrees();
            assert!((0.0..360.0).contains(&a));
        }
    }

    #[test]
    fn toggles_flip_flags_and_backend_state() {
        let (mut c, mut b) = controller();

        c.apply(Action::ToggleSubmissionMode, &mut b);
        assert_eq!(c.flags().submission, SubmissionMode::Arrays);
        assert_eq!(b.clear_color(), [0.3, 0.0, 0.3, 1.0]);

        c.tick(&mut b, &mut NullDiagnostics);
        assert!(b.draws().iter().all(|d| d.submission == SubmissionMode::Arrays));

        c.apply(Action::ToggleBlending, &mut b);
        assert!(!c.flags().blending);
        assert!(!b.blending());

        c.apply(Action::ToggleSubmissionMode, &mut b);
        assert_eq!(b.clear_color(), [0.0, 0.0, 0.3, 1.0]);

        assert!(c.is_running());
        c.apply(Action::Quit, &mut b);
        assert!(!c.is_running());
    }
}
