//! WGSL for the 2D renderer.
//!
//! One module holds both pipelines: instanced discs for bodies and a plain
//! colored triangle list for grid, trails, and vectors. Both map world
//! coordinates through the same y-down camera transform.

pub const SCENE_SHADER: &str = r#"
struct View {
    location: vec2<f32>,
    viewport: vec2<f32>,
    zoom: f32,
};

@group(0) @binding(0)
var<uniform> view: View;

fn world_to_clip(world: vec2<f32>) -> vec4<f32> {
    let screen = (world - view.location) * view.zoom;
    let ndc = vec2<f32>(
        screen.x / view.viewport.x * 2.0 - 1.0,
        1.0 - screen.y / view.viewport.y * 2.0,
    );
    return vec4<f32>(ndc, 0.0, 1.0);
}

struct CircleOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_circle(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
    @location(2) color: vec4<f32>,
) -> CircleOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
    );
    let uv = corners[vertex_index];

    var out: CircleOut;
    out.clip = world_to_clip(center + uv * radius);
    out.uv = uv;
    out.color = color;
    return out;
}

@fragment
fn fs_circle(in: CircleOut) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    let edge = fwidth(dist);
    let coverage = 1.0 - smoothstep(1.0 - edge, 1.0, dist);
    if coverage <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * coverage);
}

struct LineOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
) -> LineOut {
    var out: LineOut;
    out.clip = world_to_clip(position);
    out.color = color;
    return out;
}

@fragment
fn fs_line(in: LineOut) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
