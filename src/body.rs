//! Bodies: the circular mass points the simulation moves around.
//!
//! A [`Body`] carries its kinematic state (location, velocity, acceleration),
//! a radius from which the mass is derived once, a display [`Color`] and a
//! bounded [`Trail`] of recent locations used by the renderer.

use std::collections::VecDeque;
use std::f64::consts::PI;

use glam::DVec2;
use rand::Rng;

/// Maximum number of locations a trail remembers.
pub const MAX_TRAIL_LEN: usize = 40;

/// RGB display color, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a 12-bit `0xRGB` value, one nibble per channel.
    ///
    /// `0xEE5` is a warm yellow, `0x66F` a light blue.
    pub fn from_rgb12(rgb: u16) -> Self {
        let nibble = |shift: u16| ((rgb >> shift) & 0xF) as f32 / 15.0;
        Self::rgb(nibble(8), nibble(4), nibble(0))
    }

    /// Pick a random 12-bit color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_rgb12(rng.gen_range(0..0xFFF))
    }

    /// Color with an alpha channel attached, as uploaded to the GPU.
    pub fn with_alpha(self, a: f32) -> [f32; 4] {
        [self.r, self.g, self.b, a]
    }
}

/// Bounded history of recent body locations, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<DVec2>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(MAX_TRAIL_LEN + 1),
        }
    }

    /// Append a location, evicting the oldest one past [`MAX_TRAIL_LEN`].
    pub fn push(&mut self, location: DVec2) {
        self.points.push_back(location);
        if self.points.len() > MAX_TRAIL_LEN {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Location at `index`, where `0` is the oldest entry.
    pub fn get(&self, index: usize) -> Option<DVec2> {
        self.points.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.points.iter().copied()
    }
}

/// A circular mass point.
#[derive(Debug, Clone)]
pub struct Body {
    /// World-space center.
    pub location: DVec2,
    pub velocity: DVec2,
    /// Recomputed every physics step.
    pub acceleration: DVec2,
    radius: f64,
    mass: f64,
    color: Color,
    /// Set when the user clicks the body. Never cleared.
    pub selected: bool,
    pub trail: Trail,
}

impl Body {
    /// Create a body with a random color.
    pub fn new(location: DVec2, velocity: DVec2, radius: f64) -> Self {
        Self::with_color(location, velocity, radius, Color::random(&mut rand::thread_rng()))
    }

    /// Create a body with a fixed color.
    ///
    /// Mass is the volume of a sphere of the given radius and never changes.
    pub fn with_color(location: DVec2, velocity: DVec2, radius: f64, color: Color) -> Self {
        Self {
            location,
            velocity,
            acceleration: DVec2::ZERO,
            radius,
            mass: 4.0 / 3.0 * PI * radius * radius * radius,
            color,
            selected: false,
            trail: Trail::new(),
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn momentum(&self) -> DVec2 {
        self.velocity * self.mass
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}
