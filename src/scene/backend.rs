//! The seam between the scene lifecycle and whatever owns graphics resources.
//!
//! Every `create_*` hands back a handle the lifecycle must later pass to `dispose` exactly once.
//! Children are always disposed before their parent.

use bevy::prelude::*;
use std::fmt;

use crate::core::planet::PlanetDescriptor;
use crate::visualization::placement::SurfacePlacement;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Rover,
    Obstacle,
}

impl MarkerKind {
    /// Marker extent as a fraction of the planet radius (x = width, y = height, z = length).
    pub fn relative_size(self) -> Vec3 {
        match self {
            MarkerKind::Rover => Vec3::new(0.12, 0.06, 0.16),
            MarkerKind::Obstacle => Vec3::new(0.09, 0.12, 0.09),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSpec {
    pub kind: MarkerKind,
    /// World-space extent of the mesh.
    pub size: Vec3,
    pub placement: SurfacePlacement,
}

impl MarkerSpec {
    pub fn new(kind: MarkerKind, radius: f32, placement: SurfacePlacement) -> Self {
        Self {
            kind,
            size: kind.relative_size() * radius,
            placement,
        }
    }

    /// Mesh origin is its center, so the marker is raised by half its height to rest on the surface.
    pub fn transform(&self) -> Transform {
        self.placement.transform(self.size.y * 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLineStyle {
    pub color: Color,
    pub width: f32,
}

pub trait SceneBackend {
    type Handle: Copy + Eq + fmt::Debug;

    /// Attach to the host surface: lighting and render settings.
    fn create_renderer(&mut self, surface: SurfaceSize) -> Self::Handle;
    fn create_camera(&mut self, surface: SurfaceSize, distance: f32) -> Self::Handle;
    /// Unit sphere scaled to the planet radius.
    fn create_sphere(&mut self, planet: &PlanetDescriptor, segments: u32) -> Self::Handle;
    fn create_grid_material(&mut self, style: GridLineStyle) -> Self::Handle;
    fn create_grid_group(&mut self, scale: f32) -> Self::Handle;
    fn create_grid_line(
        &mut self,
        group: Self::Handle,
        material: Self::Handle,
        style: GridLineStyle,
        points: &[Vec3],
    ) -> Self::Handle;
    fn create_obstacle_container(&mut self) -> Self::Handle;
    fn create_marker(&mut self, spec: &MarkerSpec, parent: Option<Self::Handle>) -> Self::Handle;

    fn update_sphere(&mut self, sphere: Self::Handle, planet: &PlanetDescriptor, segments: u32);
    fn update_grid_scale(&mut self, group: Self::Handle, scale: f32);
    fn update_line_style(&mut self, material: Self::Handle, style: GridLineStyle);
    fn update_marker(&mut self, marker: Self::Handle, spec: &MarkerSpec);
    fn configure_surface(&mut self, renderer: Self::Handle, camera: Self::Handle, surface: SurfaceSize);

    fn dispose(&mut self, handle: Self::Handle);
}
