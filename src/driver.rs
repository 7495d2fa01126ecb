//! Frame driving.
//!
//! One frame is always: [`Scene::tick`], then [`Renderer::render`], then the
//! FPS counter. The windowed app and [`run_headless`] both go through
//! [`run_frame`] so they cannot drift apart.

use std::time::{Duration, Instant};

use glam::DVec2;

use crate::body::Body;
use crate::camera::Camera;
use crate::error::RenderError;
use crate::scene::Scene;
use crate::time::FpsCounter;

/// Interval used by [`FrameScheduler::fixed_60hz`].
pub const FRAME_INTERVAL_60HZ: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Everything a renderer needs for one frame.
///
/// Control flags are not part of it: they steer [`Scene::tick`] and nothing
/// on screen depends on them directly.
#[derive(Debug, Clone, Copy)]
pub struct FrameState<'a> {
    pub bodies: &'a [Body],
    pub camera: &'a Camera,
    /// Surface size in logical pixels.
    pub viewport: DVec2,
    /// Frames counted in the last full second, once one has elapsed.
    pub fps: Option<u32>,
}

impl<'a> FrameState<'a> {
    pub fn from_scene(scene: &'a Scene, fps: Option<u32>) -> Self {
        Self {
            bodies: &scene.bodies,
            camera: &scene.camera,
            viewport: scene.viewport(),
            fps,
        }
    }
}

/// Something that can draw a frame.
pub trait Renderer {
    fn render(&mut self, frame: &FrameState<'_>) -> Result<(), RenderError>;

    /// The output surface changed size.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// How frames are paced in the windowed app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameScheduler {
    /// Request a new redraw after every frame; presentation paces the loop.
    #[default]
    Redraw,
    /// Wake on a fixed timer.
    FixedInterval(Duration),
}

impl FrameScheduler {
    pub fn fixed_60hz() -> Self {
        FrameScheduler::FixedInterval(FRAME_INTERVAL_60HZ)
    }

    /// When the next frame is due after one rendered at `last`.
    ///
    /// `None` means "as soon as possible".
    pub fn next_frame_at(&self, last: Instant) -> Option<Instant> {
        match self {
            FrameScheduler::Redraw => None,
            FrameScheduler::FixedInterval(interval) => Some(last + *interval),
        }
    }
}

/// Tick the scene, render it and count the frame.
///
/// Returns the new FPS value when the counter's window rolls over.
pub fn run_frame<R: Renderer + ?Sized>(
    scene: &mut Scene,
    renderer: &mut R,
    fps: &mut FpsCounter,
    now: Instant,
) -> Result<Option<u32>, RenderError> {
    scene.tick();
    renderer.render(&FrameState::from_scene(scene, fps.fps()))?;

    let rolled = fps.frame(now);
    if let Some(rate) = rolled {
        log::debug!("{rate} fps, {} bodies", scene.bodies.len());
    }
    Ok(rolled)
}

/// Run `frames` frames back to back without a window.
pub fn run_headless<R: Renderer + ?Sized>(
    scene: &mut Scene,
    renderer: &mut R,
    frames: u64,
) -> Result<(), RenderError> {
    let mut fps = FpsCounter::new();
    for _ in 0..frames {
        run_frame(scene, renderer, &mut fps, Instant::now())?;
    }
    Ok(())
}
