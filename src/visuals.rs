//! Frame geometry for rendering.
//!
//! [`FrameGeometry::build`] turns a [`FrameState`] into flat, GPU-ready
//! vertex data: a grid and motion trails underneath, one filled circle per
//! body, dashed velocity/acceleration vectors on top, and the FPS readout in
//! the top-left corner. Everything is in world units; the GPU backend applies
//! the camera transform.
//!
//! # Usage
//!
//! ```ignore
//! let geometry = FrameGeometry::build(&frame, &RenderOptions::default());
//! queue.write_buffer(&circle_buffer, 0, bytemuck::cast_slice(&geometry.circles));
//! ```

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

use crate::body::{Body, Color};
use crate::driver::FrameState;

/// Rendering switches and styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub show_grid: bool,
    pub show_trails: bool,
    pub show_vectors: bool,

    /// Grid spacing in world units.
    pub grid_spacing: f64,
    pub grid_color: [f32; 4],
    /// Grid line width in screen pixels.
    pub grid_width_px: f64,

    /// Trail points per drawn chunk.
    pub trail_chunk: usize,
    /// Trail opacity divisor; the newest chunk is drawn at `1 / trail_fade`.
    pub trail_fade: f32,
    /// Trail width in world units.
    pub trail_width: f64,

    /// Acceleration is drawn this many times its magnitude.
    pub acceleration_scale: f64,
    /// Velocity is drawn this many times its magnitude.
    pub velocity_scale: f64,
    pub acceleration_color: [f32; 4],
    pub velocity_color: [f32; 4],
    /// Vector line width in world units.
    pub vector_width: f64,
    /// Dash pattern `(on, off)` in world units.
    pub dash: (f64, f64),

    /// Draw "N FPS" in the top-left corner once a rate is known.
    pub show_fps: bool,
    pub fps_color: [f32; 4],
    /// Top-left of the readout in screen pixels.
    pub fps_origin_px: DVec2,
    /// Glyph box in screen pixels.
    pub fps_glyph_px: DVec2,
    /// Distance between glyph origins in screen pixels.
    pub fps_advance_px: f64,
    pub fps_stroke_px: f64,

    pub background: [f64; 4],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_trails: true,
            show_vectors: true,
            grid_spacing: 100.0,
            grid_color: Color::from_rgb12(0x555).with_alpha(0.35),
            grid_width_px: 1.0,
            trail_chunk: 5,
            trail_fade: 5.0,
            trail_width: 3.0,
            acceleration_scale: 200.0,
            velocity_scale: 5.0,
            acceleration_color: [1.0, 0.0, 0.0, 0.5],
            velocity_color: [0.0, 1.0, 0.0, 0.5],
            vector_width: 0.3,
            dash: (3.0, 7.0),
            show_fps: true,
            fps_color: Color::from_rgb12(0x555).with_alpha(1.0),
            fps_origin_px: DVec2::new(5.0, 4.0),
            fps_glyph_px: DVec2::new(7.0, 12.0),
            fps_advance_px: 10.0,
            fps_stroke_px: 1.5,
            background: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// One filled disc, drawn as an instanced quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

/// A vertex of a triangle list used for every line-like shape.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// CPU-side geometry for one frame.
#[derive(Debug, Default, Clone)]
pub struct FrameGeometry {
    /// Grid and trails, drawn before the bodies.
    pub underlay: Vec<LineVertex>,
    pub circles: Vec<CircleInstance>,
    /// Vector overlays, drawn after the bodies.
    pub overlay: Vec<LineVertex>,
}

impl FrameGeometry {
    pub fn build(frame: &FrameState<'_>, options: &RenderOptions) -> Self {
        let mut geometry = Self::default();

        if options.show_grid {
            geometry.push_grid(frame, options);
        }

        if options.show_trails {
            for body in frame.bodies {
                geometry.push_trail(body, options);
            }
        }

        geometry.circles.extend(frame.bodies.iter().map(|body| CircleInstance {
            center: body.location.as_vec2().to_array(),
            radius: body.radius() as f32,
            _pad: 0.0,
            color: body.color().with_alpha(1.0),
        }));

        if options.show_vectors {
            for body in frame.bodies {
                let from = body.location;
                push_dashed(
                    &mut geometry.overlay,
                    from,
                    from + body.acceleration * options.acceleration_scale,
                    options.vector_width,
                    options.dash,
                    options.acceleration_color,
                );
                push_dashed(
                    &mut geometry.overlay,
                    from,
                    from + body.velocity * options.velocity_scale,
                    options.vector_width,
                    options.dash,
                    options.velocity_color,
                );
            }
        }

        if let (true, Some(fps)) = (options.show_fps, frame.fps) {
            geometry.push_fps(frame, fps, options);
        }

        geometry
    }

    /// Seven-segment "N FPS", fixed in screen space.
    fn push_fps(&mut self, frame: &FrameState<'_>, fps: u32, options: &RenderOptions) {
        let zoom = frame.camera.zoom;
        if !(zoom > 0.0) {
            return;
        }
        let to_world = |p: DVec2| p / zoom + frame.camera.location;
        let width = options.fps_stroke_px / zoom;
        let (w, h) = (options.fps_glyph_px.x, options.fps_glyph_px.y);

        let text = format!("{fps} FPS");
        for (n, ch) in text.chars().enumerate() {
            let origin = options.fps_origin_px + DVec2::new(n as f64 * options.fps_advance_px, 0.0);
            let mask = segment_mask(ch);
            for (bit, (a, b)) in SEGMENTS.iter().enumerate() {
                if mask & (1 << bit) == 0 {
                    continue;
                }
                let a = origin + DVec2::new(a.0 * w, a.1 * h);
                let b = origin + DVec2::new(b.0 * w, b.1 * h);
                push_segment(&mut self.overlay, to_world(a), to_world(b), width, options.fps_color);
            }
        }
    }

    /// Grid lines on world multiples of the spacing covering the view.
    fn push_grid(&mut self, frame: &FrameState<'_>, options: &RenderOptions) {
        let spacing = options.grid_spacing;
        let zoom = frame.camera.zoom;
        if spacing <= 0.0 || !(zoom > 0.0) {
            return;
        }

        let origin = frame.camera.location;
        let extent = frame.viewport / zoom;
        let far = origin + extent;
        let width = options.grid_width_px / zoom;

        let mut x = origin.x - origin.x % spacing;
        while x <= far.x {
            push_segment(
                &mut self.underlay,
                DVec2::new(x, origin.y),
                DVec2::new(x, far.y),
                width,
                options.grid_color,
            );
            x += spacing;
        }

        let mut y = origin.y - origin.y % spacing;
        while y <= far.y {
            push_segment(
                &mut self.underlay,
                DVec2::new(origin.x, y),
                DVec2::new(far.x, y),
                width,
                options.grid_color,
            );
            y += spacing;
        }
    }

    /// Trail chunks walked from the newest point back, fading with age.
    fn push_trail(&mut self, body: &Body, options: &RenderOptions) {
        let len = body.trail.len();
        let chunk = options.trail_chunk.max(1);
        let color = body.color();

        let mut start = len;
        while start > 0 {
            let i = start - 1;
            let opacity = i as f32 / len as f32 / options.trail_fade;
            let stop = i.saturating_sub(chunk);

            for j in (stop..i).rev() {
                let (Some(a), Some(b)) = (body.trail.get(j + 1), body.trail.get(j)) else {
                    continue;
                };
                push_segment(
                    &mut self.underlay,
                    a,
                    b,
                    options.trail_width,
                    color.with_alpha(opacity),
                );
            }

            start = start.saturating_sub(chunk);
        }
    }
}

/// Seven-segment strokes `a..g` as fractions of the glyph box.
const SEGMENTS: [((f64, f64), (f64, f64)); 7] = [
    ((0.0, 0.0), (1.0, 0.0)),
    ((1.0, 0.0), (1.0, 0.5)),
    ((1.0, 0.5), (1.0, 1.0)),
    ((0.0, 1.0), (1.0, 1.0)),
    ((0.0, 0.5), (0.0, 1.0)),
    ((0.0, 0.0), (0.0, 0.5)),
    ((0.0, 0.5), (1.0, 0.5)),
];

/// Lit segments for a character, bit 0 = `a`. Unknown characters are blank.
fn segment_mask(ch: char) -> u8 {
    match ch {
        '0' => 0x3F,
        '1' => 0x06,
        '2' => 0x5B,
        '3' => 0x4F,
        '4' => 0x66,
        '5' | 'S' => 0x6D,
        '6' => 0x7D,
        '7' => 0x07,
        '8' => 0x7F,
        '9' => 0x6F,
        'F' => 0x71,
        'P' => 0x73,
        _ => 0,
    }
}

/// Append a `width` wide segment as two triangles. Degenerate and
/// non-finite segments are dropped.
pub fn push_segment(out: &mut Vec<LineVertex>, a: DVec2, b: DVec2, width: f64, color: [f32; 4]) {
    let d = b - a;
    let len = d.length();
    if !(len > 0.0) || !len.is_finite() {
        return;
    }
    let half = DVec2::new(-d.y, d.x) / len * (width / 2.0);

    let corners = [a - half, a + half, b - half, a + half, b + half, b - half];
    out.extend(corners.iter().map(|p| LineVertex {
        position: p.as_vec2().to_array(),
        color,
    }));
}

/// Append a dashed segment, starting with a dash at `a`.
pub fn push_dashed(
    out: &mut Vec<LineVertex>,
    a: DVec2,
    b: DVec2,
    width: f64,
    (on, off): (f64, f64),
    color: [f32; 4],
) {
    let d = b - a;
    let len = d.length();
    if !(len > 0.0) || !len.is_finite() || on <= 0.0 {
        return;
    }
    let dir = d / len;
    let period = on + off.max(0.0);

    let mut t = 0.0;
    while t < len {
        let end = (t + on).min(len);
        push_segment(out, a + dir * t, a + dir * end, width, color);
        t += period;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    fn frame<'a>(bodies: &'a [Body], camera: &'a Camera) -> FrameState<'a> {
        FrameState {
            bodies,
            camera,
            viewport: DVec2::new(800.0, 600.0),
            fps: None,
        }
    }

    fn trail_body(points: usize) -> Body {
        let mut body = Body::with_color(DVec2::ZERO, DVec2::ZERO, 1.0, Color::BLACK);
        for i in 0..points {
            body.trail.push(DVec2::new(i as f64 * 10.0, 0.0));
        }
        body
    }

    #[test]
    fn test_segment_is_two_triangles() {
        let mut out = Vec::new();
        push_segment(&mut out, DVec2::ZERO, DVec2::new(10.0, 0.0), 2.0, [1.0; 4]);
        assert_eq!(out.len(), 6);
        assert_eq!(out[0].position, [0.0, -1.0]);
        assert_eq!(out[4].position, [10.0, 1.0]);

        push_segment(&mut out, DVec2::ONE, DVec2::ONE, 2.0, [1.0; 4]);
        push_segment(&mut out, DVec2::ZERO, DVec2::NAN, 2.0, [1.0; 4]);
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn test_dash_pattern() {
        let mut out = Vec::new();
        // 3 on / 7 off over 25 units: dashes at 0, 10, 20.
        push_dashed(&mut out, DVec2::ZERO, DVec2::new(25.0, 0.0), 0.3, (3.0, 7.0), [1.0; 4]);
        assert_eq!(out.len(), 3 * 6);
        assert_eq!(out[6].position[0], 10.0);
    }

    #[test]
    fn test_grid_lines_on_spacing_multiples() {
        let mut camera = Camera::new();
        camera.location = DVec2::new(-400.0, -300.0);
        let options = RenderOptions {
            show_trails: false,
            show_vectors: false,
            ..Default::default()
        };

        let geometry = FrameGeometry::build(&frame(&[], &camera), &options);
        // x: -400..=400 step 100 -> 9 lines, y: -300..=300 -> 7 lines.
        assert_eq!(geometry.underlay.len(), (9 + 7) * 6);
        // First corner of each vertical line sits half a pixel right of it.
        for v in geometry.underlay.iter().step_by(6).take(9) {
            assert!(((v.position[0] - 0.5) % 100.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_trail_chunks_fade_with_age() {
        let bodies = vec![trail_body(11)];
        let camera = Camera::new();
        let options = RenderOptions {
            show_grid: false,
            show_vectors: false,
            ..Default::default()
        };

        let geometry = FrameGeometry::build(&frame(&bodies, &camera), &options);
        // 11 points -> 10 segments; chunks start at 10, 5, 0.
        assert_eq!(geometry.underlay.len(), 10 * 6);
        let newest = geometry.underlay[0].color[3];
        let oldest = geometry.underlay.last().unwrap().color[3];
        assert!((newest - 10.0 / 11.0 / 5.0).abs() < 1e-6);
        assert!((oldest - 5.0 / 11.0 / 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_circle_per_body_and_vectors() {
        let mut body = Body::with_color(DVec2::new(5.0, 6.0), DVec2::new(2.0, 0.0), 4.0, Color::BLACK);
        body.acceleration = DVec2::new(0.0, 0.1);
        let bodies = vec![body];
        let camera = Camera::new();
        let options = RenderOptions {
            show_grid: false,
            ..Default::default()
        };

        let geometry = FrameGeometry::build(&frame(&bodies, &camera), &options);
        assert_eq!(geometry.circles.len(), 1);
        assert_eq!(geometry.circles[0].center, [5.0, 6.0]);
        assert_eq!(geometry.circles[0].radius, 4.0);
        // Acceleration 20 long -> 2 dashes, velocity 10 long -> 1 dash.
        assert_eq!(geometry.overlay.len(), 3 * 6);
    }

    fn text_only() -> RenderOptions {
        RenderOptions {
            show_grid: false,
            show_trails: false,
            show_vectors: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_fps_readout_segments() {
        let camera = Camera::new();
        let mut frame = FrameState {
            bodies: &[],
            camera: &camera,
            viewport: DVec2::new(800.0, 600.0),
            fps: None,
        };
        assert!(FrameGeometry::build(&frame, &text_only()).overlay.is_empty());

        frame.fps = Some(60);
        let geometry = FrameGeometry::build(&frame, &text_only());
        // "60 FPS": 6 + 6 + 0 + 4 + 5 + 5 segments.
        assert_eq!(geometry.overlay.len(), 26 * 6);
        assert!(geometry.overlay.iter().all(|v| v.color == text_only().fps_color));

        let hidden = RenderOptions {
            show_fps: false,
            ..text_only()
        };
        assert!(FrameGeometry::build(&frame, &hidden).overlay.is_empty());
    }

    #[test]
    fn test_fps_readout_follows_camera() {
        let mut camera = Camera::new();
        camera.location = DVec2::new(-1000.0, 250.0);
        camera.zoom = 2.0;
        let frame = FrameState {
            bodies: &[],
            camera: &camera,
            viewport: DVec2::new(800.0, 600.0),
            fps: Some(1),
        };
        let geometry = FrameGeometry::build(&frame, &text_only());
        // Screen (5, 4) top-left of the first glyph lands here in world units.
        let anchor = DVec2::new(5.0, 4.0) / 2.0 + camera.location;
        let near = geometry
            .overlay
            .iter()
            .map(|v| DVec2::new(v.position[0] as f64, v.position[1] as f64))
            .fold(f64::INFINITY, |m, p| m.min(p.distance(anchor)));
        assert!(near < 12.0 / 2.0);
        for v in &geometry.overlay {
            assert!(v.position[0] as f64 >= anchor.x - 1.0);
            assert!(v.position[1] as f64 >= anchor.y - 1.0);
        }
    }
}
