use cubes_common::SubmissionMode;
use cubes_kernel::{CubePopulation, ScaleTable};
use glam::Vec3;

use crate::backend::{GraphicsBackend, MatrixMode};
use crate::geometry::CubeGeometry;

/// Axis every cube spins about.
pub const SPIN_AXIS: Vec3 = Vec3::ONE;

/// Draw one cube per population slot, populated or not.
///
/// Each cube gets its own push/pop pair: translate to its position, spin by
/// the shared `angle_degrees`, scale by its slot's factor.
pub fn render_cubes<B: GraphicsBackend + ?Sized>(
    backend: &mut B,
    geometry: &CubeGeometry,
    population: &CubePopulation,
    scales: &ScaleTable,
    angle_degrees: f32,
    mode: SubmissionMode,
) {
    let _span = tracing::trace_span!("render_cubes", slots = population.capacity(), ?mode).entered();

    for (slot, cube) in population.slots().iter().enumerate() {
        let scale = scales.factor(slot);

        backend.push_matrix();
        backend.matrix_mode(MatrixMode::ModelView);

        backend.translate(cube.position);
        backend.rotate(angle_degrees, SPIN_AXIS);
        backend.scale(Vec3::splat(scale));

        geometry.draw(backend, mode);
        backend.pop_matrix();
    }
}
