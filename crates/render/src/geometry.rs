use cubes_common::{Rgba8, SubmissionMode};

use crate::backend::{GraphicsBackend, Primitive};

pub const FACE_COUNT: usize = 6;
pub const VERTICES_PER_FACE: usize = 4;
pub const VERTEX_COUNT: usize = FACE_COUNT * VERTICES_PER_FACE;

/// Unit cube spanning `[-1, 1]` on each axis. Faces do not share vertices so
/// each can carry its own flat color.
#[rustfmt::skip]
pub const CUBE_POSITIONS: [[f32; 3]; VERTEX_COUNT] = [
    // front
    [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
    // back
    [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],
    // top
    [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],
    // bottom
    [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0],
    // right
    [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    // left
    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0],
];

/// One quad per four indices, same order as [`CUBE_POSITIONS`].
#[rustfmt::skip]
pub const CUBE_INDICES: [u32; VERTEX_COUNT] = [
    0, 1, 2, 3,
    4, 5, 6, 7,
    8, 9, 10, 11,
    12, 13, 14, 15,
    16, 17, 18, 19,
    20, 21, 22, 23,
];

/// Half-transparent base color per face.
pub const FACE_COLORS: [Rgba8; FACE_COUNT] = [
    Rgba8::new(255, 0, 0, 128),
    Rgba8::new(0, 255, 0, 128),
    Rgba8::new(0, 0, 255, 128),
    Rgba8::new(255, 255, 0, 128),
    Rgba8::new(255, 0, 255, 128),
    Rgba8::new(0, 255, 255, 128),
];

/// Repeat each face color for the face's four vertices.
pub fn expand_face_colors(faces: &[Rgba8; FACE_COUNT]) -> [Rgba8; VERTEX_COUNT] {
    let mut out = [Rgba8::new(0, 0, 0, 0); VERTEX_COUNT];
    for (face, color) in faces.iter().enumerate() {
        let start = face * VERTICES_PER_FACE;
        out[start..start + VERTICES_PER_FACE].fill(*color);
    }
    out
}

/// Immutable unit-cube geometry with expanded per-vertex colors.
#[derive(Debug, Clone)]
pub struct CubeGeometry {
    vertex_colors: [Rgba8; VERTEX_COUNT],
}

impl Default for CubeGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeGeometry {
    pub fn new() -> Self {
        Self {
            vertex_colors: expand_face_colors(&FACE_COLORS),
        }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &CUBE_POSITIONS
    }

    pub fn indices(&self) -> &[u32] {
        &CUBE_INDICES
    }

    pub fn vertex_colors(&self) -> &[Rgba8] {
        &self.vertex_colors
    }

    /// Draw the cube under the backend's current transform.
    pub fn draw<B: GraphicsBackend + ?Sized>(&self, backend: &mut B, mode: SubmissionMode) {
        backend.bind_arrays(&CUBE_POSITIONS, &self.vertex_colors);
        match mode {
            SubmissionMode::Arrays => {
                backend.draw_arrays(Primitive::Quads, 0, VERTEX_COUNT as u32);
            }
            SubmissionMode::Indexed => {
                backend.draw_elements(Primitive::Quads, &CUBE_INDICES);
            }
        }
        backend.unbind_arrays();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingBackend;

    #[test]
    fn every_face_has_one_color() {
        let g = CubeGeometry::new();
        for (face, chunk) in g.vertex_colors().chunks(VERTICES_PER_FACE).enumerate() {
            assert!(chunk.iter().all(|c| *c == FACE_COLORS[face]));
        }
        assert!(g.vertex_colors().iter().all(|c| c.a == 128));
    }

    #[test]
    fn faces_are_planar_on_the_unit_cube() {
        for face in CUBE_POSITIONS.chunks(VERTICES_PER_FACE) {
            let constant_axis = (0..3).find(|&axis| {
                face.iter().all(|v| v[axis] == face[0][axis]) && face[0][axis].abs() == 1.0
            });
            assert!(constant_axis.is_some(), "face {face:?} is not on a cube side");
        }
    }

    #[test]
    fn indices_follow_array_order() {
        let g = CubeGeometry::new();
        let resolved: Vec<[f32; 3]> = g.indices().iter().map(|&i| CUBE_POSITIONS[i as usize]).collect();
        assert_eq!(resolved.as_slice(), g.positions());
    }

    #[test]
    fn both_modes_bind_the_same_arrays() {
        let g = CubeGeometry::new();
        let mut backend = RecordingBackend::new();
        g.draw(&mut backend, SubmissionMode::Indexed);
        g.draw(&mut backend, SubmissionMode::Arrays);

        let draws = backend.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].submission, SubmissionMode::Indexed);
        assert_eq!(draws[1].submission, SubmissionMode::Arrays);
        for d in draws {
            assert_eq!(d.primitive, Primitive::Quads);
            assert_eq!(d.vertex_count, 24);
            assert_eq!(d.bound_vertices, 24);
        }
        assert!(!backend.arrays_bound());
    }
}
