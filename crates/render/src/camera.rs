use cubes_common::{SimConfig, ViewConfig};
use glam::{Mat4, Vec3};

use crate::backend::{GraphicsBackend, MatrixMode};

/// Fixed camera on the +Z axis looking at the origin.
///
/// The zoom offset only moves the view during camera setup; the frame
/// controller resets the model-view before any cube is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub distance: f32,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(&SimConfig::default(), &ViewConfig::default())
    }
}

impl CameraRig {
    pub fn new(sim: &SimConfig, view: &ViewConfig) -> Self {
        Self {
            distance: sim.camera_distance,
            target: Vec3::ZERO,
            up: view.up,
            fov_degrees: view.fov_degrees,
            aspect: view.aspect(),
            near: view.near,
            far: view.far,
        }
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    /// Look-at followed by the zoom translation along the view axis.
    pub fn view_matrix(&self, zoom: f32) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, self.up)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance + zoom))
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Replace the projection stack top with this camera's perspective.
    pub fn apply_projection<B: GraphicsBackend + ?Sized>(&self, backend: &mut B) {
        backend.matrix_mode(MatrixMode::Projection);
        backend.load_identity();
        backend.perspective(self.fov_degrees, self.aspect, self.near, self.far);
        backend.matrix_mode(MatrixMode::ModelView);
    }

    /// Multiply the view onto the current model-view.
    pub fn apply_view<B: GraphicsBackend + ?Sized>(&self, backend: &mut B, zoom: f32) {
        backend.look_at(self.eye(), self.target, self.up);
        backend.translate(Vec3::new(0.0, 0.0, -self.distance + zoom));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingBackend;

    #[test]
    fn default_rig_matches_fixed_view() {
        let cam = CameraRig::default();
        assert_eq!(cam.eye(), Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cam.up, Vec3::Y);
        assert_eq!(cam.fov_degrees, 60.0);
        assert!((cam.aspect - 4.0 / 3.0).abs() < 1e-6);
        assert!(!cam.projection_matrix().col(0).x.is_nan());
    }

    #[test]
    fn zero_zoom_cancels_camera_translation() {
        // look_at from +3 on Z pushes the world by -3; the extra -3 moves it
        // further, so the origin lands at z = -6 in view space.
        let cam = CameraRig::default();
        let p = cam.view_matrix(0.0).transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 0.0, -6.0)).length() < 1e-5);

        let p = cam.view_matrix(5.0).transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn backend_path_matches_pure_matrices() {
        let cam = CameraRig::default();
        let mut b = RecordingBackend::new();
        cam.apply_projection(&mut b);
        cam.apply_view(&mut b, 1.25);
        assert!(b.projection().abs_diff_eq(cam.projection_matrix(), 1e-5));
        assert!(b.model_view().abs_diff_eq(cam.view_matrix(1.25), 1e-5));
        assert_eq!(b.matrices().mode(), MatrixMode::ModelView);
    }
}
