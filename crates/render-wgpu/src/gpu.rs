use crate::shaders;
use bytemuck::{Pod, Zeroable};
use cubes_common::Rgba8;
use cubes_render::{GraphicsBackend, MatrixState, Primitive};
use glam::Mat4;

/// Maps OpenGL clip depth `[-w, w]` onto wgpu's `[0, w]`.
#[rustfmt::skip]
const CLIP_DEPTH_REMAP: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [u8; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct InstanceData {
    clip_0: [f32; 4],
    clip_1: [f32; 4],
    clip_2: [f32; 4],
    clip_3: [f32; 4],
}

impl InstanceData {
    fn from_matrix(m: Mat4) -> Self {
        let cols = m.to_cols_array_2d();
        Self {
            clip_0: cols[0],
            clip_1: cols[1],
            clip_2: cols[2],
            clip_3: cols[3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DrawRange {
    /// Vertices `start..end` of the staging vertex buffer.
    Arrays { start: u32, end: u32 },
    /// Indices `start..end`, offset by `base_vertex`.
    Indexed {
        start: u32,
        end: u32,
        base_vertex: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingDraw {
    range: DrawRange,
    instance: u32,
    blending: bool,
}

/// Local vertex order for `count` vertices assembled as `primitive`, as a
/// triangle list. Trailing vertices that do not form a full face are dropped.
fn triangulate(primitive: Primitive, count: u32) -> Vec<u32> {
    match primitive {
        Primitive::Triangles => (0..count - count % 3).collect(),
        Primitive::Quads => (0..count / 4)
            .flat_map(|q| {
                let b = q * 4;
                [b, b + 1, b + 2, b, b + 2, b + 3]
            })
            .collect(),
    }
}

/// CPU staging for one frame of draws.
#[derive(Debug, Default)]
struct FrameRecorder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    instances: Vec<InstanceData>,
    draws: Vec<PendingDraw>,
    /// Base and length of the currently bound arrays inside `vertices`.
    bound: Option<(u32, u32)>,
}

impl FrameRecorder {
    fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.instances.clear();
        self.draws.clear();
        self.bound = None;
    }

    fn bind(&mut self, positions: &[[f32; 3]], colors: &[Rgba8]) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend(positions.iter().zip(colors).map(|(p, c)| Vertex {
                position: *p,
                color: [c.r, c.g, c.b, c.a],
            }));
        let len = self.vertices.len() as u32 - base;
        self.bound = Some((base, len));
    }

    fn unbind(&mut self) {
        self.bound = None;
    }

    fn push_instance(&mut self, clip: Mat4) -> u32 {
        self.instances.push(InstanceData::from_matrix(clip));
        self.instances.len() as u32 - 1
    }

    fn push_arrays(&mut self, primitive: Primitive, first: u32, count: u32, clip: Mat4, blending: bool) {
        let Some((base, len)) = self.bound else {
            tracing::warn!("draw_arrays with no arrays bound, skipped");
            return;
        };
        if first.saturating_add(count) > len {
            tracing::warn!(first, count, bound = len, "draw_arrays out of range, skipped");
            return;
        }

        // Array order has no index list, so expanded triangles are copied out.
        let start = self.vertices.len() as u32;
        for local in triangulate(primitive, count) {
            let v = self.vertices[(base + first + local) as usize];
            self.vertices.push(v);
        }
        let end = self.vertices.len() as u32;

        let instance = self.push_instance(clip);
        self.draws.push(PendingDraw {
            range: DrawRange::Arrays { start, end },
            instance,
            blending,
        });
    }

    fn push_elements(&mut self, primitive: Primitive, indices: &[u32], clip: Mat4, blending: bool) {
        let Some((base, len)) = self.bound else {
            tracing::warn!("draw_elements with no arrays bound, skipped");
            return;
        };
        if indices.iter().any(|&i| i >= len) {
            tracing::warn!(bound = len, "draw_elements index out of range, skipped");
            return;
        }

        let start = self.indices.len() as u32;
        for local in triangulate(primitive, indices.len() as u32) {
            self.indices.push(indices[local as usize]);
        }
        let end = self.indices.len() as u32;

        let instance = self.push_instance(clip);
        self.draws.push(PendingDraw {
            range: DrawRange::Indexed {
                start,
                end,
                base_vertex: base as i32,
            },
            instance,
            blending,
        });
    }
}

/// GPU buffer that is recreated with a larger size when a write outgrows it.
struct GrowableBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    usage: wgpu::BufferUsages,
    label: &'static str,
}

impl GrowableBuffer {
    fn new(device: &wgpu::Device, label: &'static str, usage: wgpu::BufferUsages, capacity: u64) -> Self {
        let usage = usage | wgpu::BufferUsages::COPY_DST;
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity,
            usage,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            capacity,
            usage,
            label,
        }
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let needed = bytes.len() as u64;
        if needed > self.capacity {
            let capacity = needed.next_power_of_two();
            tracing::debug!(label = self.label, capacity, "growing buffer");
            *self = Self::new(device, self.label, self.usage, capacity);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }
}

/// wgpu implementation of the fixed-function backend.
///
/// Draws are recorded with their clip transform during the tick and replayed
/// by [`WgpuBackend::submit`] in one pass against the presented texture.
pub struct WgpuBackend {
    matrices: MatrixState,
    recorder: FrameRecorder,
    clear_color: [f32; 4],
    blending: bool,
    viewport: (u32, u32),
    target_size: (u32, u32),
    blend_pipeline: wgpu::RenderPipeline,
    opaque_pipeline: wgpu::RenderPipeline,
    vertex_buffer: GrowableBuffer,
    index_buffer: GrowableBuffer,
    instance_buffer: GrowableBuffer,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuBackend {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube_pipeline_layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cube_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::CUBE_SHADER.into()),
        });

        let blend_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::BlendState::ALPHA_BLENDING,
            "cube_blend_pipeline",
        );
        let opaque_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::BlendState::REPLACE,
            "cube_opaque_pipeline",
        );

        // Sized for the stock population in array mode; grows on demand.
        let vertex_buffer = GrowableBuffer::new(
            device,
            "cube_vertex_buffer",
            wgpu::BufferUsages::VERTEX,
            (64 * 1024) * std::mem::size_of::<Vertex>() as u64,
        );
        let index_buffer = GrowableBuffer::new(
            device,
            "cube_index_buffer",
            wgpu::BufferUsages::INDEX,
            (16 * 1024) * std::mem::size_of::<u32>() as u64,
        );
        let instance_buffer = GrowableBuffer::new(
            device,
            "cube_instance_buffer",
            wgpu::BufferUsages::VERTEX,
            1024 * std::mem::size_of::<InstanceData>() as u64,
        );

        let depth_texture = create_depth_texture(device, width, height);

        Self {
            matrices: MatrixState::new(),
            recorder: FrameRecorder::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            blending: false,
            viewport: (width, height),
            target_size: (width.max(1), height.max(1)),
            blend_pipeline,
            opaque_pipeline,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            depth_texture,
            surface_format,
        }
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Number of draws waiting for the next submit.
    pub fn pending_draws(&self) -> usize {
        self.recorder.draws.len()
    }

    /// Drop everything recorded for the current frame.
    pub fn discard_frame(&mut self) {
        self.recorder.reset();
    }

    fn clip_transform(&self) -> Mat4 {
        CLIP_DEPTH_REMAP * self.matrices.projection() * self.matrices.model_view()
    }

    /// Replay the recorded frame into `target` and reset the recorder.
    pub fn submit(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, target: &wgpu::TextureView) {
        let _span = tracing::trace_span!("wgpu_submit", draws = self.recorder.draws.len()).entered();

        self.vertex_buffer
            .write(device, queue, bytemuck::cast_slice(&self.recorder.vertices));
        self.index_buffer
            .write(device, queue, bytemuck::cast_slice(&self.recorder.indices));
        self.instance_buffer
            .write(device, queue, bytemuck::cast_slice(&self.recorder.instances));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("cube_encoder"),
        });

        {
            let [r, g, b, a] = self.clear_color.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cube_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let width = self.viewport.0.clamp(1, self.target_size.0);
            let height = self.viewport.1.clamp(1, self.target_size.1);
            pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);

            if !self.recorder.draws.is_empty() {
                pass.set_vertex_buffer(0, self.vertex_buffer.buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.buffer.slice(..));
                if !self.recorder.indices.is_empty() {
                    pass.set_index_buffer(self.index_buffer.buffer.slice(..), wgpu::IndexFormat::Uint32);
                }
            }

            let mut current_blend = None;
            for draw in &self.recorder.draws {
                if current_blend != Some(draw.blending) {
                    let pipeline = if draw.blending {
                        &self.blend_pipeline
                    } else {
                        &self.opaque_pipeline
                    };
                    pass.set_pipeline(pipeline);
                    current_blend = Some(draw.blending);
                }
                let instances = draw.instance..draw.instance + 1;
                match draw.range {
                    DrawRange::Arrays { start, end } => pass.draw(start..end, instances),
                    DrawRange::Indexed {
                        start,
                        end,
                        base_vertex,
                    } => pass.draw_indexed(start..end, base_vertex, instances),
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        self.recorder.reset();
    }
}

impl GraphicsBackend for WgpuBackend {
    fn matrices(&self) -> &MatrixState {
        &self.matrices
    }

    fn matrices_mut(&mut self) -> &mut MatrixState {
        &mut self.matrices
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    fn clear(&mut self) {
        self.recorder.reset();
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blending = enabled;
    }

    fn bind_arrays(&mut self, positions: &[[f32; 3]], colors: &[Rgba8]) {
        self.recorder.bind(positions, colors);
    }

    fn unbind_arrays(&mut self) {
        self.recorder.unbind();
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: u32, count: u32) {
        let clip = self.clip_transform();
        self.recorder
            .push_arrays(primitive, first, count, clip, self.blending);
    }

    fn draw_elements(&mut self, primitive: Primitive, indices: &[u32]) {
        let clip = self.clip_transform();
        self.recorder
            .push_elements(primitive, indices, clip, self.blending);
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Unorm8x4,
                    ],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstanceData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        2 => Float32x4,
                        3 => Float32x4,
                        4 => Float32x4,
                        5 => Float32x4,
                    ],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubes_render::geometry::{CUBE_INDICES, CUBE_POSITIONS, FACE_COLORS, expand_face_colors};
    use glam::{Vec3, Vec4};

    fn bound_cube() -> FrameRecorder {
        let mut r = FrameRecorder::default();
        r.bind(&CUBE_POSITIONS, &expand_face_colors(&FACE_COLORS));
        r
    }

    #[test]
    fn vertex_layout_is_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 16);
        assert_eq!(std::mem::size_of::<InstanceData>(), 64);
    }

    #[test]
    fn quads_split_into_two_triangles() {
        assert_eq!(triangulate(Primitive::Quads, 8), vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert_eq!(triangulate(Primitive::Quads, 6), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(triangulate(Primitive::Triangles, 7), (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn array_draw_copies_expanded_vertices() {
        let mut r = bound_cube();
        r.push_arrays(Primitive::Quads, 0, 24, Mat4::IDENTITY, true);

        assert_eq!(r.draws.len(), 1);
        assert_eq!(r.draws[0].range, DrawRange::Arrays { start: 24, end: 60 });
        assert!(r.indices.is_empty());
        // Second triangle of the first quad starts again at vertex 0.
        assert_eq!(r.vertices[27], r.vertices[0]);
        assert_eq!(r.vertices[29], r.vertices[3]);
    }

    #[test]
    fn indexed_draw_reuses_bound_vertices() {
        let mut r = bound_cube();
        r.push_elements(Primitive::Quads, &CUBE_INDICES, Mat4::IDENTITY, false);
        r.unbind();
        r.bind(&CUBE_POSITIONS, &expand_face_colors(&FACE_COLORS));
        r.push_elements(Primitive::Quads, &CUBE_INDICES, Mat4::IDENTITY, false);

        assert_eq!(r.vertices.len(), 48);
        assert_eq!(r.indices.len(), 72);
        assert_eq!(
            r.draws[1].range,
            DrawRange::Indexed {
                start: 36,
                end: 72,
                base_vertex: 24
            }
        );
        assert_eq!(r.draws[1].instance, 1);
    }

    #[test]
    fn both_modes_resolve_to_the_same_triangles() {
        let mut r = bound_cube();
        r.push_arrays(Primitive::Quads, 0, 24, Mat4::IDENTITY, true);
        r.push_elements(Primitive::Quads, &CUBE_INDICES, Mat4::IDENTITY, true);

        let from_arrays = &r.vertices[24..60];
        let from_indices: Vec<Vertex> = r.indices.iter().map(|&i| r.vertices[i as usize]).collect();
        assert_eq!(from_arrays, from_indices.as_slice());
    }

    #[test]
    fn unbound_or_out_of_range_draws_are_skipped() {
        let mut r = FrameRecorder::default();
        r.push_arrays(Primitive::Quads, 0, 4, Mat4::IDENTITY, true);
        assert!(r.draws.is_empty());

        let mut r = bound_cube();
        r.push_arrays(Primitive::Quads, 20, 8, Mat4::IDENTITY, true);
        r.push_elements(Primitive::Quads, &[0, 1, 2, 99], Mat4::IDENTITY, true);
        assert!(r.draws.is_empty());
        assert!(r.instances.is_empty());
    }

    #[test]
    fn depth_remap_targets_unit_range() {
        let near = CLIP_DEPTH_REMAP * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = CLIP_DEPTH_REMAP * Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(near.z / near.w, 0.0);
        assert_eq!(far.z / far.w, 1.0);

        let p = Mat4::perspective_rh_gl(60f32.to_radians(), 4.0 / 3.0, 0.1, 1000.0);
        let remapped = CLIP_DEPTH_REMAP * p;
        let expected = Mat4::perspective_rh(60f32.to_radians(), 4.0 / 3.0, 0.1, 1000.0);
        let point = Vec3::new(0.3, -0.2, -5.0).extend(1.0);
        let a = remapped * point;
        let b = expected * point;
        assert!((a.z / a.w - b.z / b.w).abs() < 1e-4);
    }

    #[test]
    fn reset_clears_everything() {
        let mut r = bound_cube();
        r.push_elements(Primitive::Quads, &CUBE_INDICES, Mat4::IDENTITY, true);
        r.reset();
        assert!(r.vertices.is_empty());
        assert!(r.indices.is_empty());
        assert!(r.instances.is_empty());
        assert!(r.draws.is_empty());
        assert!(r.bound.is_none());
    }
}
