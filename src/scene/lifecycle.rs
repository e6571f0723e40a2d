//! Owner of every graphics resource in the planet scene.
//!
//! `Uninitialized -> Mounted -> Disposed`. Planet switches, rover moves, wheel input and resizes
//! only run while mounted; anything else is refused with [`SceneError::ResourceLeakRisk`] before
//! the backend is touched.

use bevy::prelude::*;
use rand::Rng;
use std::fmt;

use crate::core::config::ViewerConfig;
use crate::core::coordinates::GridSpec;
use crate::core::error::SceneError;
use crate::core::planet::{GridCell, PlanetDescriptor};
use crate::core::zoom::{CameraZoomController, WheelZoom, ZoomSettings};
use crate::rover::navigation::{MoveOutcome, RoverCommand, RoverState};
use crate::scene::backend::{GridLineStyle, MarkerKind, MarkerSpec, SceneBackend, SurfaceSize};
use crate::visualization::grid::{build_grid, grid_line_width};
use crate::visualization::obstacles::sample_obstacles;
use crate::visualization::placement::place_on_sphere;

const GRID_LINE_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecyclePhase {
    #[default]
    Uninitialized,
    Mounted,
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifecycleSettings {
    pub segments: u32,
    pub obstacle_density: f32,
    pub grid_radius: f32,
    pub camera_distance: f32,
    pub zoom: ZoomSettings,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for LifecycleSettings {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            segments: config.grid_segments,
            obstacle_density: config.obstacle_density,
            grid_radius: config.grid_radius,
            camera_distance: config.camera_distance,
            zoom: config.zoom_settings(),
        }
    }
}

/// Result of mounting or switching planets, for the outbound notifications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetApplied {
    pub obstacle_count: usize,
    /// Set when the zoom changed (initial value on mount, re-clamp on a switch).
    pub zoom: Option<f32>,
}

#[derive(Debug)]
struct MountedResources<H> {
    renderer: H,
    camera: H,
    sphere: H,
    grid_material: H,
    grid_group: H,
    grid_lines: Vec<H>,
    obstacle_container: H,
    rover: Option<H>,
    obstacles: Vec<H>,
}

pub struct SceneLifecycle<H> {
    settings: LifecycleSettings,
    phase: LifecyclePhase,
    planet: Option<PlanetDescriptor>,
    surface: SurfaceSize,
    rover: RoverState,
    obstacles: Vec<GridCell>,
    zoom: CameraZoomController,
    resources: Option<MountedResources<H>>,
}

impl<H: Copy + Eq + fmt::Debug> SceneLifecycle<H> {
    pub fn new(settings: LifecycleSettings) -> Self {
        Self {
            settings,
            phase: LifecyclePhase::Uninitialized,
            planet: None,
            surface: SurfaceSize::default(),
            rover: RoverState::centered(settings.segments),
            obstacles: Vec::new(),
            zoom: CameraZoomController::new(settings.zoom, 1.0),
            resources: None,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn is_live(&self) -> bool {
        self.phase == LifecyclePhase::Mounted
    }

    pub fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    pub fn planet(&self) -> Option<&PlanetDescriptor> {
        self.planet.as_ref()
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn rover(&self) -> &RoverState {
        &self.rover
    }

    pub fn obstacles(&self) -> &[GridCell] {
        &self.obstacles
    }

    pub fn zoom(&self) -> &CameraZoomController {
        &self.zoom
    }

    pub fn camera(&self) -> Option<H> {
        self.resources.as_ref().map(|r| r.camera)
    }

    pub fn rover_marker(&self) -> Option<H> {
        self.resources.as_ref().and_then(|r| r.rover)
    }

    /// Handles that are currently allocated, children before parents.
    pub fn live_handles(&self) -> Vec<H> {
        let Some(res) = &self.resources else {
            return Vec::new();
        };
        let mut handles = res.obstacles.clone();
        handles.push(res.obstacle_container);
        handles.extend(res.rover);
        handles.extend(res.grid_lines.iter().copied());
        handles.extend([
            res.grid_group,
            res.grid_material,
            res.sphere,
            res.camera,
            res.renderer,
        ]);
        handles
    }

    fn require(&self, expected: LifecyclePhase, operation: &'static str) -> Result<(), SceneError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SceneError::ResourceLeakRisk {
                operation,
                phase: self.phase,
            })
        }
    }

    fn planet_spec(&self, planet: &PlanetDescriptor) -> Result<GridSpec, SceneError> {
        GridSpec::new(planet.radius, self.settings.segments)
    }

    fn line_style(radius: f32) -> GridLineStyle {
        GridLineStyle {
            color: GRID_LINE_COLOR,
            width: grid_line_width(radius),
        }
    }

    /// Allocate the whole scene for `planet` and place rover and obstacles.
    pub fn mount<B, R>(
        &mut self,
        backend: &mut B,
        surface: SurfaceSize,
        planet: &PlanetDescriptor,
        rng: &mut R,
    ) -> Result<PlanetApplied, SceneError>
    where
        B: SceneBackend<Handle = H>,
        R: Rng,
    {
        self.require(LifecyclePhase::Uninitialized, "mount")?;
        let spec = self.planet_spec(planet)?;
        let grid_spec = GridSpec::new(self.settings.grid_radius, self.settings.segments)?;

        let renderer = backend.create_renderer(surface);
        let camera = backend.create_camera(surface, self.settings.camera_distance);
        let sphere = backend.create_sphere(planet, self.settings.segments);

        let style = Self::line_style(planet.radius);
        let grid_material = backend.create_grid_material(style);
        let grid_group = backend.create_grid_group(planet.radius);
        let grid_lines = build_grid(grid_spec)
            .iter()
            .map(|line| backend.create_grid_line(grid_group, grid_material, style, line))
            .collect();
        let obstacle_container = backend.create_obstacle_container();

        self.resources = Some(MountedResources {
            renderer,
            camera,
            sphere,
            grid_material,
            grid_group,
            grid_lines,
            obstacle_container,
            rover: None,
            obstacles: Vec::new(),
        });
        self.phase = LifecyclePhase::Mounted;
        self.surface = surface;
        self.planet = Some(planet.clone());
        self.zoom = CameraZoomController::new(self.settings.zoom, planet.radius);

        let reference = Vec3::new(0.0, 0.0, self.settings.camera_distance);
        let obstacle_count = self.repopulate(backend, spec, reference, rng);
        Ok(PlanetApplied {
            obstacle_count,
            zoom: Some(self.zoom.zoom()),
        })
    }

    /// Switch planets. Returns `Ok(None)` when `planet` equals the current one.
    ///
    /// The sphere, grid scale and line width are updated in place; rover and obstacle markers
    /// are recreated for the new radius.
    pub fn set_planet<B, R>(
        &mut self,
        backend: &mut B,
        planet: &PlanetDescriptor,
        camera_position: Vec3,
        rng: &mut R,
    ) -> Result<Option<PlanetApplied>, SceneError>
    where
        B: SceneBackend<Handle = H>,
        R: Rng,
    {
        self.require(LifecyclePhase::Mounted, "set_planet")?;
        if self.planet.as_ref() == Some(planet) {
            return Ok(None);
        }
        let spec = self.planet_spec(planet)?;
        let Some(res) = &self.resources else {
            return Err(SceneError::ResourceLeakRisk {
                operation: "set_planet",
                phase: self.phase,
            });
        };

        backend.update_sphere(res.sphere, planet, self.settings.segments);
        backend.update_grid_scale(res.grid_group, planet.radius);
        backend.update_line_style(res.grid_material, Self::line_style(planet.radius));

        self.planet = Some(planet.clone());
        let zoom = self.zoom.rebound(planet.radius);
        let obstacle_count = self.repopulate(backend, spec, camera_position, rng);
        Ok(Some(PlanetApplied {
            obstacle_count,
            zoom,
        }))
    }

    /// Replace rover and obstacle markers for `spec`. The rover keeps its cell.
    fn repopulate<B, R>(&mut self, backend: &mut B, spec: GridSpec, reference: Vec3, rng: &mut R) -> usize
    where
        B: SceneBackend<Handle = H>,
        R: Rng,
    {
        let Some(res) = self.resources.as_mut() else {
            return 0;
        };

        for obstacle in res.obstacles.drain(..) {
            backend.dispose(obstacle);
        }
        if let Some(rover) = res.rover.take() {
            backend.dispose(rover);
        }

        self.obstacles = sample_obstacles(
            spec.segments(),
            self.settings.obstacle_density,
            self.rover.cell,
            rng,
        );

        let rover = MarkerSpec::new(
            MarkerKind::Rover,
            spec.radius(),
            place_on_sphere(self.rover.cell, spec, reference),
        );
        res.rover = Some(backend.create_marker(&rover, None));

        let container = res.obstacle_container;
        res.obstacles = self
            .obstacles
            .iter()
            .map(|cell| {
                let marker = MarkerSpec::new(
                    MarkerKind::Obstacle,
                    spec.radius(),
                    place_on_sphere(*cell, spec, reference),
                );
                backend.create_marker(&marker, Some(container))
            })
            .collect();

        self.obstacles.len()
    }

    /// Execute one rover command and re-place the marker in place.
    pub fn move_rover<B>(
        &mut self,
        backend: &mut B,
        command: RoverCommand,
        camera_position: Vec3,
    ) -> Result<MoveOutcome, SceneError>
    where
        B: SceneBackend<Handle = H>,
    {
        self.require(LifecyclePhase::Mounted, "move_rover")?;
        let (Some(planet), Some(marker)) = (&self.planet, self.rover_marker()) else {
            return Err(SceneError::ResourceLeakRisk {
                operation: "move_rover",
                phase: self.phase,
            });
        };
        let spec = self.planet_spec(planet)?;

        let outcome = self
            .rover
            .execute(command, self.settings.segments, &self.obstacles);
        if !matches!(outcome, MoveOutcome::Blocked(_)) {
            let placement = place_on_sphere(self.rover.cell, spec, camera_position);
            let marker_spec = MarkerSpec::new(MarkerKind::Rover, spec.radius(), placement);
            backend.update_marker(marker, &marker_spec);
        }
        Ok(outcome)
    }

    /// Host surface changed size. No-op when the size is unchanged.
    pub fn resize<B>(&mut self, backend: &mut B, surface: SurfaceSize) -> Result<(), SceneError>
    where
        B: SceneBackend<Handle = H>,
    {
        self.require(LifecyclePhase::Mounted, "resize")?;
        if surface == self.surface {
            return Ok(());
        }
        if let Some(res) = &self.resources {
            backend.configure_surface(res.renderer, res.camera, surface);
        }
        self.surface = surface;
        Ok(())
    }

    /// Feed one wheel event (positive `delta_y` zooms out).
    pub fn wheel(&mut self, delta_y: f32) -> Result<WheelZoom, SceneError> {
        self.require(LifecyclePhase::Mounted, "wheel")?;
        let radius = self.planet.as_ref().map_or(1.0, |p| p.radius);
        Ok(self.zoom.on_wheel_delta(delta_y, radius))
    }

    /// Per-frame step. Does nothing once the scene is no longer live.
    pub fn tick(&mut self, dt_secs: f32) -> Option<f32> {
        if !self.is_live() {
            return None;
        }
        self.zoom.advance(dt_secs)
    }

    /// Release every allocated resource, children first.
    pub fn dispose<B>(&mut self, backend: &mut B) -> Result<(), SceneError>
    where
        B: SceneBackend<Handle = H>,
    {
        self.require(LifecyclePhase::Mounted, "dispose")?;
        for handle in self.live_handles() {
            backend.dispose(handle);
        }
        self.resources = None;
        self.obstacles.clear();
        self.phase = LifecyclePhase::Disposed;
        Ok(())
    }
}
