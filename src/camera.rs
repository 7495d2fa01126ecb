//! 2D view transform: pan offset plus uniform zoom.
//!
//! Screen coordinates are surface pixels with the origin in the top-left
//! corner and `y` pointing down. World coordinates share that orientation;
//! the camera maps `location` to the screen origin and scales by `zoom`.

use glam::DVec2;

use crate::body::Body;
use crate::controls::Controls;
use crate::physics::center_of_gravity;

/// Tunables for camera motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Factor applied per zoom step.
    pub zoom_rate: f64,
    /// Zooming out is refused below this zoom.
    pub min_zoom: f64,
    /// Zooming in is refused above this zoom.
    pub max_zoom: f64,
    /// Arrow-key pan speed in pixels per second.
    pub pan_speed: f64,
    /// Frame interval the pan speed is scaled by, in seconds.
    pub assumed_frame_secs: f64,
    /// The follow camera covers `1 / follow_divisor` of the remaining
    /// distance each frame.
    pub follow_divisor: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            zoom_rate: 1.2,
            min_zoom: 0.1,
            max_zoom: 10.0,
            pan_speed: 400.0,
            assumed_frame_secs: 1.0 / 60.0,
            follow_divisor: 10.0,
        }
    }
}

/// Pan/zoom camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World point drawn at the screen origin.
    pub location: DVec2,
    pub zoom: f64,
    pub settings: CameraSettings,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            location: DVec2::ZERO,
            zoom: 1.0,
            settings: CameraSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: CameraSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Place the world origin at the center of a `viewport` sized surface.
    pub fn center_on_origin(&mut self, viewport: DVec2) {
        self.location = -viewport / 2.0;
    }

    #[inline]
    pub fn screen_to_world(&self, screen: DVec2) -> DVec2 {
        screen / self.zoom + self.location
    }

    #[inline]
    pub fn world_to_screen(&self, world: DVec2) -> DVec2 {
        (world - self.location) * self.zoom
    }

    /// Zoom in one step, keeping the world point under `pivot` fixed.
    ///
    /// Refused once the zoom is already above the maximum.
    pub fn zoom_in(&mut self, pivot: DVec2) {
        if self.zoom > self.settings.max_zoom {
            return;
        }
        self.zoom_about(pivot, self.zoom * self.settings.zoom_rate);
    }

    /// Zoom out one step, keeping the world point under `pivot` fixed.
    ///
    /// Refused once the zoom is already below the minimum.
    pub fn zoom_out(&mut self, pivot: DVec2) {
        if self.zoom < self.settings.min_zoom {
            return;
        }
        self.zoom_about(pivot, self.zoom / self.settings.zoom_rate);
    }

    fn zoom_about(&mut self, pivot: DVec2, new_zoom: f64) {
        let old_zoom = self.zoom;
        self.location += pivot / old_zoom - pivot / new_zoom;
        self.zoom = new_zoom;
    }

    /// Per-frame camera motion.
    ///
    /// In lock-to-center mode the camera eases toward the center of gravity;
    /// otherwise it pans by the held arrow flags at a fixed per-frame distance.
    pub fn update(&mut self, controls: &Controls, bodies: &[Body], viewport: DVec2) {
        if controls.lock_to_center {
            self.follow_center_of_gravity(bodies, viewport);
        } else {
            self.pan(controls);
        }
    }

    fn follow_center_of_gravity(&mut self, bodies: &[Body], viewport: DVec2) {
        // Nothing to follow in an empty scene; hold position.
        let Some(cog) = center_of_gravity(bodies) else {
            return;
        };
        let screen_center = viewport / 2.0 / self.zoom;
        let target = cog - screen_center;
        self.location += (target - self.location) / self.settings.follow_divisor;
    }

    fn pan(&mut self, controls: &Controls) {
        let step = self.settings.pan_speed * self.settings.assumed_frame_secs;

        if controls.left {
            self.location.x -= step;
        }
        if controls.up {
            self.location.y -= step;
        }
        if controls.right {
            self.location.x += step;
        }
        if controls.down {
            self.location.y += step;
        }
    }
}
