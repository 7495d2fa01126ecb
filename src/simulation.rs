//! Simulation builder and runner

use std::sync::Arc;
use std::time::Instant;

use glam::DVec2;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::camera::CameraSettings;
use crate::driver::{self, FrameScheduler, Renderer};
use crate::error::{RenderError, SimulationError};
use crate::gpu::GpuRenderer;
use crate::input::{Input, SpawnSettings};
use crate::physics::{CollisionPolicy, Physics, SUBSTEPS_PER_FRAME};
use crate::scenario::Scenario;
use crate::scene::Scene;
use crate::time::FpsCounter;
use crate::visuals::RenderOptions;

/// A windowed gravity sandbox builder.
///
/// Use method chaining to configure, then call `.run()` to start.
#[derive(Debug, Clone)]
pub struct Simulation {
    scenario: Scenario,
    substeps: u32,
    collision: CollisionPolicy,
    scheduler: FrameScheduler,
    spawn: SpawnSettings,
    camera: CameraSettings,
    render: RenderOptions,
    title: String,
    window_size: (u32, u32),
}

impl Simulation {
    /// Create a new simulation with default settings.
    pub fn new() -> Self {
        Self {
            scenario: Scenario::default(),
            substeps: SUBSTEPS_PER_FRAME,
            collision: CollisionPolicy::default(),
            scheduler: FrameScheduler::default(),
            spawn: SpawnSettings::default(),
            camera: CameraSettings::default(),
            render: RenderOptions::default(),
            title: String::from("gravsim"),
            window_size: (1280, 720),
        }
    }

    /// Choose the starting bodies.
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    /// Physics substeps per frame. Each frame advances one time unit.
    pub fn with_substeps(mut self, substeps: u32) -> Self {
        self.substeps = substeps;
        self
    }

    pub fn with_collision_policy(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    /// Set how frames are paced.
    pub fn with_scheduler(mut self, scheduler: FrameScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_spawn_settings(mut self, spawn: SpawnSettings) -> Self {
        self.spawn = spawn;
        self
    }

    pub fn with_camera_settings(mut self, camera: CameraSettings) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Window title; the FPS readout is appended to it.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Build the scene for a surface of `viewport` pixels.
    pub fn build_scene(&self, viewport: DVec2) -> Scene {
        Scene::new(self.scenario.bodies(), viewport)
            .with_physics(Physics::default().with_collision_policy(self.collision))
            .with_substeps(self.substeps)
            .with_spawn_settings(self.spawn)
            .with_camera_settings(self.camera)
    }

    /// Run the simulation. This blocks until the window is closed.
    pub fn run(self) -> Result<(), SimulationError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        log::info!(
            "starting {:?} with {} substeps, {:?} collisions, {:?} scheduler",
            self.scenario,
            self.substeps,
            self.collision,
            self.scheduler
        );

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    config: Simulation,
    window: Option<Arc<Window>>,
    renderer: Option<GpuRenderer>,
    scene: Option<Scene>,
    input: Input,
    fps: FpsCounter,
    next_frame: Option<Instant>,
    error: Option<SimulationError>,
}

impl App {
    fn new(config: Simulation) -> Self {
        Self {
            config,
            window: None,
            renderer: None,
            scene: None,
            input: Input::new(),
            fps: FpsCounter::new(),
            next_frame: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: SimulationError) {
        self.error = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        let size = window.inner_size();
        let renderer = pollster::block_on(GpuRenderer::new(window.clone(), self.config.render))?;
        self.renderer = Some(renderer);

        self.input.set_scale_factor(window.scale_factor());
        let viewport = logical_viewport(size, self.input.scale_factor());
        match &mut self.scene {
            Some(scene) => scene.set_viewport(viewport),
            None => self.scene = Some(self.config.build_scene(viewport)),
        }

        window.request_redraw();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(scene), Some(renderer)) = (&mut self.scene, &mut self.renderer) else {
            return;
        };

        let now = Instant::now();
        match driver::run_frame(scene, renderer, &mut self.fps, now) {
            Ok(Some(rate)) => {
                if let Some(window) = &self.window {
                    window.set_title(&format!("{} - {} fps", self.config.title, rate));
                }
            }
            Ok(None) => {}
            Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                let (width, height) = (renderer.config.width, renderer.config.height);
                renderer.resize(width, height);
            }
            Err(e) if e.is_fatal() => {
                self.fail(event_loop, e.into());
                return;
            }
            Err(e) => log::warn!("skipping frame: {e}"),
        }

        match self.config.scheduler.next_frame_at(now) {
            None => {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            deadline => self.next_frame = deadline,
        }
    }
}

/// Surface size in logical pixels, the unit the scene and input work in.
fn logical_viewport(size: PhysicalSize<u32>, scale_factor: f64) -> DVec2 {
    let logical = size.to_logical::<f64>(scale_factor);
    DVec2::new(logical.width, logical.height)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size.width, physical_size.height);
                }
                if let Some(scene) = &mut self.scene {
                    scene.set_viewport(logical_viewport(physical_size, self.input.scale_factor()));
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => {
                if let (Some(input), Some(scene)) = (self.input.translate(&other), &mut self.scene) {
                    scene.handle_input(input);
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(deadline) = self.next_frame else {
            return;
        };
        if Instant::now() >= deadline {
            self.next_frame = None;
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_configures_scene() {
        let sim = Simulation::new()
            .with_scenario(Scenario::Empty)
            .with_substeps(4)
            .with_collision_policy(CollisionPolicy::Loose)
            .with_scheduler(FrameScheduler::fixed_60hz());

        let scene = sim.build_scene(DVec2::new(640.0, 480.0));
        assert!(scene.bodies.is_empty());
        assert_eq!(scene.substeps, 4);
        assert_eq!(scene.physics.collision, CollisionPolicy::Loose);
        assert_eq!(scene.camera.location, DVec2::new(-320.0, -240.0));
    }

    #[test]
    fn test_viewport_is_logical() {
        let size = PhysicalSize::new(2560, 1440);
        assert_eq!(logical_viewport(size, 1.0), DVec2::new(2560.0, 1440.0));
        assert_eq!(logical_viewport(size, 2.0), DVec2::new(1280.0, 720.0));

        // A 2x display sees the same world extent as a 1x one.
        let sim = Simulation::new();
        let hidpi = sim.build_scene(logical_viewport(size, 2.0));
        let lodpi = sim.build_scene(logical_viewport(PhysicalSize::new(1280, 720), 1.0));
        assert_eq!(hidpi.camera.location, lodpi.camera.location);
    }

    #[test]
    fn test_default_scene_is_solar_system() {
        let scene = Simulation::default().build_scene(DVec2::new(800.0, 600.0));
        assert_eq!(scene.bodies.len(), 4);
        assert_eq!(scene.substeps, SUBSTEPS_PER_FRAME);
    }
}
