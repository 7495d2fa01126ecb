//! The simulation context.
//!
//! A [`Scene`] owns everything one window simulates: the body collection, the
//! camera, the control flags and the tunables. Input events mutate it between
//! frames and [`Scene::tick`] advances it by one frame. Nothing here touches
//! the window or the GPU.

use glam::DVec2;

use crate::body::Body;
use crate::camera::{Camera, CameraSettings};
use crate::controls::{ControlFlag, Controls};
use crate::input::{InputEvent, KeyCode, PointerGesture, SpawnSettings};
use crate::physics::{self, Physics, SUBSTEPS_PER_FRAME};

/// Default number of frames between trail samples.
pub const FRAMES_PER_TRAIL_SAMPLE: u32 = 2;

/// Pushes body locations onto their trails every few frames.
#[derive(Debug, Clone, Copy)]
struct TrailSampler {
    every: u32,
    skipped: u32,
}

impl TrailSampler {
    fn new(every: u32) -> Self {
        Self { every, skipped: 0 }
    }

    fn should_sample(&mut self) -> bool {
        self.skipped += 1;
        if self.skipped < self.every {
            return false;
        }
        self.skipped = 0;
        true
    }
}

/// Shared simulation state for one window.
#[derive(Debug, Clone)]
pub struct Scene {
    pub bodies: Vec<Body>,
    pub camera: Camera,
    pub controls: Controls,
    pub physics: Physics,
    pub substeps: u32,
    pub spawn: SpawnSettings,
    viewport: DVec2,
    gesture: PointerGesture,
    trails: TrailSampler,
    frame: u64,
}

impl Scene {
    /// Create a scene for a surface of `viewport` pixels with the world
    /// origin at its center.
    pub fn new(bodies: Vec<Body>, viewport: DVec2) -> Self {
        let mut camera = Camera::new();
        camera.center_on_origin(viewport);

        Self {
            bodies,
            camera,
            controls: Controls::default(),
            physics: Physics::default(),
            substeps: SUBSTEPS_PER_FRAME,
            spawn: SpawnSettings::default(),
            viewport,
            gesture: PointerGesture::default(),
            trails: TrailSampler::new(FRAMES_PER_TRAIL_SAMPLE),
            frame: 0,
        }
    }

    pub fn with_physics(mut self, physics: Physics) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_substeps(mut self, substeps: u32) -> Self {
        self.substeps = substeps;
        self
    }

    pub fn with_spawn_settings(mut self, spawn: SpawnSettings) -> Self {
        self.spawn = spawn;
        self
    }

    pub fn with_camera_settings(mut self, settings: CameraSettings) -> Self {
        self.camera.settings = settings;
        self
    }

    /// Sample trails every `frames` ticks (at least one).
    pub fn with_trail_interval(mut self, frames: u32) -> Self {
        self.trails = TrailSampler::new(frames.max(1));
        self
    }

    /// Surface size in pixels.
    #[inline]
    pub fn viewport(&self) -> DVec2 {
        self.viewport
    }

    /// Track a resized surface. The camera is left where it is.
    pub fn set_viewport(&mut self, viewport: DVec2) {
        self.viewport = viewport;
    }

    /// Frames ticked so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Append a body and return its index.
    pub fn spawn_body(&mut self, location: DVec2, velocity: DVec2, radius: f64) -> usize {
        log::debug!(
            "spawning body at ({:.1}, {:.1}) v=({:.2}, {:.2}) r={:.1}",
            location.x,
            location.y,
            velocity.x,
            velocity.y,
            radius
        );
        self.bodies.push(Body::new(location, velocity, radius));
        self.bodies.len() - 1
    }

    /// Mark the body under `world` as selected and return its index.
    pub fn select_body_at(&mut self, world: DVec2) -> Option<usize> {
        let index = physics::hit_test(&self.bodies, world)?;
        self.bodies[index].selected = true;
        log::debug!("selected body {index}");
        Some(index)
    }

    pub fn set_control_flag(&mut self, flag: ControlFlag, value: bool) {
        self.controls.set(flag, value);
    }

    /// Flip a control flag and return its new value.
    pub fn toggle(&mut self, flag: ControlFlag) -> bool {
        let value = self.controls.toggle(flag);
        log::debug!("{flag:?} -> {value}");
        value
    }

    /// Drop every body.
    pub fn reset_scene(&mut self) {
        log::info!("scene reset, {} bodies removed", self.bodies.len());
        self.bodies = Vec::new();
    }

    /// Apply one input event.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyPressed(key) => {
                if let Some(flag) = pan_flag(key) {
                    self.set_control_flag(flag, true);
                    self.set_control_flag(ControlFlag::LockToCenter, false);
                }
            }
            InputEvent::KeyReleased(key) => match key {
                KeyCode::P => {
                    self.toggle(ControlFlag::Pause);
                }
                KeyCode::L => {
                    self.toggle(ControlFlag::LockToCenter);
                }
                KeyCode::R => self.set_control_flag(ControlFlag::Reset, true),
                other => {
                    if let Some(flag) = pan_flag(other) {
                        self.set_control_flag(flag, false);
                    }
                }
            },
            InputEvent::PointerPressed { position, at } => self.gesture.press(position, at),
            InputEvent::PointerReleased { position, at } => {
                let Some(drag) = self.gesture.release(position, at) else {
                    return;
                };
                let world = self.camera.screen_to_world(drag.end);
                if self.select_body_at(world).is_some() {
                    return;
                }
                let velocity = drag.spawn_velocity(&self.spawn);
                let radius = drag.spawn_radius(&self.spawn);
                self.spawn_body(world, velocity, radius);
            }
            InputEvent::Wheel { delta, position } => {
                if delta > 0.0 {
                    self.camera.zoom_in(position);
                } else {
                    self.camera.zoom_out(position);
                }
            }
        }
    }

    /// Advance one frame: consume a pending reset, run the physics substeps
    /// unless paused, move the camera and sample trails.
    pub fn tick(&mut self) {
        if self.controls.take_reset() {
            self.reset_scene();
        }

        if !self.controls.pause {
            self.physics.advance_frame(&mut self.bodies, self.substeps);
        }

        self.camera.update(&self.controls, &self.bodies, self.viewport);

        if self.trails.should_sample() {
            for body in &mut self.bodies {
                let location = body.location;
                body.trail.push(location);
            }
        }

        self.frame += 1;
    }
}

fn pan_flag(key: KeyCode) -> Option<ControlFlag> {
    match key {
        KeyCode::Left => Some(ControlFlag::Left),
        KeyCode::Up => Some(ControlFlag::Up),
        KeyCode::Right => Some(ControlFlag::Right),
        KeyCode::Down => Some(ControlFlag::Down),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;
    use std::time::{Duration, Instant};

    fn empty_scene() -> Scene {
        Scene::new(Vec::new(), DVec2::new(800.0, 600.0))
    }

    #[test]
    fn test_new_scene_centers_origin() {
        let scene = empty_scene();
        assert_eq!(scene.camera.location, DVec2::new(-400.0, -300.0));
        assert_eq!(scene.camera.screen_to_world(DVec2::new(400.0, 300.0)), DVec2::ZERO);
    }

    #[test]
    fn test_arrow_press_cancels_lock() {
        let mut scene = empty_scene();
        scene.set_control_flag(ControlFlag::LockToCenter, true);

        scene.handle_input(InputEvent::KeyPressed(KeyCode::Left));
        assert!(scene.controls.left);
        assert!(!scene.controls.lock_to_center);

        scene.handle_input(InputEvent::KeyReleased(KeyCode::Left));
        assert!(!scene.controls.left);
    }

    #[test]
    fn test_held_arrow_repeat_cancels_lock_again() {
        let mut scene = empty_scene();
        scene.handle_input(InputEvent::KeyPressed(KeyCode::Up));

        scene.handle_input(InputEvent::KeyReleased(KeyCode::L));
        assert!(scene.controls.lock_to_center);

        // Auto-repeat of the still-held arrow.
        scene.handle_input(InputEvent::KeyPressed(KeyCode::Up));
        assert!(!scene.controls.lock_to_center);
        assert!(scene.controls.up);
    }

    #[test]
    fn test_toggles_fire_on_release() {
        let mut scene = empty_scene();
        scene.handle_input(InputEvent::KeyPressed(KeyCode::P));
        assert!(!scene.controls.pause);
        scene.handle_input(InputEvent::KeyReleased(KeyCode::P));
        assert!(scene.controls.pause);

        scene.handle_input(InputEvent::KeyReleased(KeyCode::L));
        assert!(scene.controls.lock_to_center);
    }

    #[test]
    fn test_reset_is_consumed_by_next_tick() {
        let mut scene = Scene::new(Scenario::SolarSystem.bodies(), DVec2::new(800.0, 600.0));
        scene.handle_input(InputEvent::KeyReleased(KeyCode::R));
        assert!(scene.controls.reset);
        assert_eq!(scene.bodies.len(), 4);

        scene.tick();
        assert!(scene.bodies.is_empty());
        assert!(!scene.controls.reset);
    }

    #[test]
    fn test_pause_freezes_bodies() {
        let mut scene = Scene::new(Scenario::SolarSystem.bodies(), DVec2::new(800.0, 600.0));
        scene.set_control_flag(ControlFlag::Pause, true);
        let before: Vec<DVec2> = scene.bodies.iter().map(|b| b.location).collect();

        scene.tick();
        scene.tick();

        let after: Vec<DVec2> = scene.bodies.iter().map(|b| b.location).collect();
        assert_eq!(before, after);
        // Trails keep sampling while paused.
        assert_eq!(scene.bodies[0].trail.len(), 1);
    }

    #[test]
    fn test_trails_sampled_every_second_frame() {
        let mut scene = empty_scene();
        scene.spawn_body(DVec2::ZERO, DVec2::new(1.0, 0.0), 2.0);

        scene.tick();
        assert_eq!(scene.bodies[0].trail.len(), 0);
        scene.tick();
        assert_eq!(scene.bodies[0].trail.len(), 1);
        assert_eq!(scene.bodies[0].trail.get(0), Some(DVec2::new(2.0, 0.0)));
        scene.tick();
        scene.tick();
        assert_eq!(scene.bodies[0].trail.len(), 2);
        assert_eq!(scene.frame(), 4);
    }

    #[test]
    fn test_drag_spawns_body() {
        let mut scene = empty_scene();
        let t0 = Instant::now();

        scene.handle_input(InputEvent::PointerPressed {
            position: DVec2::new(500.0, 300.0),
            at: t0,
        });
        scene.handle_input(InputEvent::PointerReleased {
            position: DVec2::new(520.0, 250.0),
            at: t0 + Duration::from_millis(100),
        });

        assert_eq!(scene.bodies.len(), 1);
        let body = &scene.bodies[0];
        assert_eq!(body.location, DVec2::new(120.0, -50.0));
        assert_eq!(body.velocity, DVec2::new(2.0, -5.0));
        assert_eq!(body.radius(), 5.0);
    }

    #[test]
    fn test_release_on_body_selects_instead_of_spawning() {
        let mut scene = Scene::new(Scenario::SolarSystem.bodies(), DVec2::new(800.0, 600.0));
        let t0 = Instant::now();
        let sun_on_screen = scene.camera.world_to_screen(DVec2::ZERO);

        scene.handle_input(InputEvent::PointerPressed {
            position: sun_on_screen,
            at: t0,
        });
        scene.handle_input(InputEvent::PointerReleased {
            position: sun_on_screen,
            at: t0,
        });

        assert_eq!(scene.bodies.len(), 4);
        assert!(scene.bodies[0].selected);
    }

    #[test]
    fn test_wheel_zooms_about_cursor() {
        let mut scene = empty_scene();
        let cursor = DVec2::new(200.0, 100.0);
        let under_cursor = scene.camera.screen_to_world(cursor);

        scene.handle_input(InputEvent::Wheel {
            delta: 1.0,
            position: cursor,
        });
        assert!(scene.camera.zoom > 1.0);
        assert!((scene.camera.screen_to_world(cursor) - under_cursor).length() < 1e-9);

        scene.handle_input(InputEvent::Wheel {
            delta: 0.0,
            position: cursor,
        });
        assert!((scene.camera.zoom - 1.0).abs() < 1e-12);
    }
}
