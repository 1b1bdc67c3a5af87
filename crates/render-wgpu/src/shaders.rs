/// WGSL shader for flat-colored geometry with a per-instance clip transform.
pub const CUBE_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct InstanceInput {
    @location(2) clip_0: vec4<f32>,
    @location(3) clip_1: vec4<f32>,
    @location(4) clip_2: vec4<f32>,
    @location(5) clip_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let clip = mat4x4<f32>(
        instance.clip_0,
        instance.clip_1,
        instance.clip_2,
        instance.clip_3,
    );

    var out: VertexOutput;
    out.clip_position = clip * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
