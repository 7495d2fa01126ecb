//! Input handling for the sandbox.
//!
//! Raw `winit` window events are translated by [`Input`] into a small set of
//! [`InputEvent`]s that the [`Scene`](crate::scene::Scene) understands. Keeping
//! the scene free of `winit` types lets tests and the headless driver feed it
//! synthetic events.
//!
//! Pointer drags are tracked by [`PointerGesture`]: a press records the
//! screen anchor and a timestamp, and the matching release yields a [`Drag`]
//! whose length and duration decide the velocity and size of a spawned body.

use std::time::{Duration, Instant};

use glam::DVec2;
use winit::dpi::PhysicalPosition;
use winit::event::{
    ElementState, MouseButton, MouseScrollDelta, Touch, TouchPhase, WindowEvent,
};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the sandbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Left,
    Up,
    Right,
    Down,
    /// Toggle pause.
    P,
    /// Toggle lock-to-center.
    L,
    /// Reset the scene.
    R,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::ArrowLeft => KeyCode::Left,
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowRight => KeyCode::Right,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::KeyP => KeyCode::P,
            WinitKeyCode::KeyL => KeyCode::L,
            WinitKeyCode::KeyR => KeyCode::R,
            _ => KeyCode::Other,
        }
    }
}

/// A user action, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(KeyCode),
    KeyReleased(KeyCode),
    PointerPressed { position: DVec2, at: Instant },
    PointerReleased { position: DVec2, at: Instant },
    /// Positive `delta` scrolls away from the user.
    Wheel { delta: f64, position: DVec2 },
}

/// Translates window events into [`InputEvent`]s.
///
/// The left mouse button and a single touch point both drive the pointer.
/// Positions are reported in logical pixels, so drags and the view keep the
/// same size on high-DPI displays.
#[derive(Debug)]
pub struct Input {
    cursor: DVec2,
    active_touch: Option<u64>,
    scale_factor: f64,
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Input {
    pub fn new() -> Self {
        Self {
            cursor: DVec2::ZERO,
            active_touch: None,
            scale_factor: 1.0,
        }
    }

    /// Last known cursor position in logical pixels.
    pub fn cursor(&self) -> DVec2 {
        self.cursor
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Track the window's physical-to-logical pixel ratio.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    /// Convert a physical window position to logical pixels.
    pub fn to_logical(&self, position: PhysicalPosition<f64>) -> DVec2 {
        let logical = position.to_logical::<f64>(self.scale_factor);
        DVec2::new(logical.x, logical.y)
    }

    /// Translate one window event; events the sandbox ignores map to `None`.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            // Auto-repeated presses are kept: a held arrow keeps cancelling
            // lock-to-center.
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                translate_key(KeyCode::from(code), event.state)
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale_factor(*scale_factor);
                None
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = self.to_logical(*position);
                None
            }

            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                let position = self.cursor;
                let at = Instant::now();
                Some(match state {
                    ElementState::Pressed => InputEvent::PointerPressed { position, at },
                    ElementState::Released => InputEvent::PointerReleased { position, at },
                })
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y as f64,
                    MouseScrollDelta::PixelDelta(pos) => pos.y,
                };
                Some(InputEvent::Wheel {
                    delta,
                    position: self.cursor,
                })
            }

            WindowEvent::Touch(touch) => self.translate_touch(touch),

            _ => None,
        }
    }

    fn translate_touch(&mut self, touch: &Touch) -> Option<InputEvent> {
        let position = self.to_logical(touch.location);
        let at = Instant::now();

        match touch.phase {
            TouchPhase::Started if self.active_touch.is_none() => {
                self.active_touch = Some(touch.id);
                self.cursor = position;
                Some(InputEvent::PointerPressed { position, at })
            }
            TouchPhase::Moved if self.active_touch == Some(touch.id) => {
                self.cursor = position;
                None
            }
            TouchPhase::Ended if self.active_touch == Some(touch.id) => {
                self.active_touch = None;
                self.cursor = position;
                Some(InputEvent::PointerReleased { position, at })
            }
            TouchPhase::Cancelled if self.active_touch == Some(touch.id) => {
                self.active_touch = None;
                None
            }
            _ => None,
        }
    }
}

/// Key transition to an event; keys the sandbox ignores map to `None`.
pub fn translate_key(key: KeyCode, state: ElementState) -> Option<InputEvent> {
    if key == KeyCode::Other {
        return None;
    }
    Some(match state {
        ElementState::Pressed => InputEvent::KeyPressed(key),
        ElementState::Released => InputEvent::KeyReleased(key),
    })
}

/// How a completed drag turns into a new body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnSettings {
    /// Radius of a body spawned by an instant click.
    pub base_radius: f64,
    /// Milliseconds of holding per unit of extra radius.
    pub ms_per_radius: f64,
    /// Screen drag length is divided by this to get the velocity.
    pub velocity_divisor: f64,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            base_radius: 3.0,
            ms_per_radius: 50.0,
            velocity_divisor: 10.0,
        }
    }
}

/// A finished press/release pair in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub start: DVec2,
    pub end: DVec2,
    pub held: Duration,
}

impl Drag {
    pub fn spawn_velocity(&self, settings: &SpawnSettings) -> DVec2 {
        (self.end - self.start) / settings.velocity_divisor
    }

    pub fn spawn_radius(&self, settings: &SpawnSettings) -> f64 {
        let held_ms = self.held.as_secs_f64() * 1000.0;
        held_ms / settings.ms_per_radius + settings.base_radius
    }
}

/// Pointer press state between a press and its release.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerGesture {
    anchor: Option<(DVec2, Instant)>,
}

impl PointerGesture {
    pub fn press(&mut self, position: DVec2, at: Instant) {
        self.anchor = Some((position, at));
    }

    /// Complete the gesture. A release without a recorded press yields `None`.
    pub fn release(&mut self, position: DVec2, at: Instant) -> Option<Drag> {
        let (start, pressed_at) = self.anchor.take()?;
        Some(Drag {
            start,
            end: position,
            held: at.saturating_duration_since(pressed_at),
        })
    }

    pub fn is_pressed(&self) -> bool {
        self.anchor.is_some()
    }
}
