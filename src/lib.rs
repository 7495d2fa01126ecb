//! # gravsim - interactive 2D gravity sandbox
//!
//! Circular bodies attract each other with softened Newtonian gravity,
//! bounce off each other elastically, and leave fading trails. The user pans
//! and zooms the view, spawns new bodies by dragging, and can pause, reset
//! or lock the camera onto the center of gravity.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gravsim::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Simulation::new()
//!         .with_scenario(Scenario::SolarSystem)
//!         .with_collision_policy(CollisionPolicy::Touching)
//!         .run()
//! }
//! ```
//!
//! ## Headless
//!
//! Everything except the window and the GPU lives in [`Scene`], which can be
//! driven without a display:
//!
//! ```ignore
//! let mut scene = Scene::new(Scenario::SolarSystem.bodies(), DVec2::new(800.0, 600.0));
//! scene.spawn_body(DVec2::new(300.0, 0.0), DVec2::new(0.0, 7.0), 5.0);
//! for _ in 0..600 {
//!     scene.tick();
//! }
//! ```
//!
//! Implement [`Renderer`] to observe frames and use [`driver::run_headless`].
//!
//! ## Controls
//!
//! | Input | Action |
//! |-------|--------|
//! | Arrow keys | Pan (cancels lock-to-center) |
//! | `P` | Pause / resume |
//! | `L` | Lock the camera onto the center of gravity |
//! | `R` | Remove all bodies |
//! | Click on a body | Select it |
//! | Drag on empty space | Spawn a body; drag sets velocity, hold time sets size |
//! | Wheel | Zoom about the cursor |

pub mod body;
pub mod camera;
pub mod controls;
pub mod driver;
pub mod error;
mod gpu;
pub mod input;
pub mod physics;
pub mod scenario;
pub mod scene;
mod simulation;
pub mod time;
pub mod visuals;

pub use body::{Body, Color, Trail};
pub use camera::{Camera, CameraSettings};
pub use controls::{ControlFlag, Controls};
pub use driver::{FrameScheduler, FrameState, Renderer};
pub use error::{GpuError, RenderError, SimulationError};
pub use glam::DVec2;
pub use gpu::GpuRenderer;
pub use input::{InputEvent, KeyCode, SpawnSettings};
pub use physics::{CollisionPolicy, Physics};
pub use scenario::Scenario;
pub use scene::Scene;
pub use simulation::Simulation;
pub use visuals::{FrameGeometry, RenderOptions};

/// Common imports for driving a simulation.
pub mod prelude {
    pub use crate::body::{Body, Color};
    pub use crate::camera::CameraSettings;
    pub use crate::controls::ControlFlag;
    pub use crate::driver::{FrameScheduler, FrameState, Renderer};
    pub use crate::error::SimulationError;
    pub use crate::input::{InputEvent, KeyCode, SpawnSettings};
    pub use crate::physics::{CollisionPolicy, Physics};
    pub use crate::scenario::Scenario;
    pub use crate::scene::Scene;
    pub use crate::simulation::Simulation;
    pub use crate::visuals::RenderOptions;
    pub use glam::DVec2;
}
