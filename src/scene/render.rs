//! Bevy implementation of [`SceneBackend`]: every handle is an entity.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;
use std::f32::consts::PI;

use crate::core::coordinates::SphericalCoordinates;
use crate::core::planet::{PackedRgb, PlanetDescriptor};
use crate::scene::backend::{
    GridLineStyle, MarkerKind, MarkerSpec, SceneBackend, SurfaceSize,
};

/// Vertical field of view at zoom 1.0.
pub const BASE_FOV: f32 = 75.0 * PI / 180.0;

const CLEAR_COLOR: Color = Color::srgb_u8(0x1a, 0x1b, 0x1e);
const ROVER_COLOR: Color = Color::srgb_u8(0xE0, 0xE0, 0xE0);
const OBSTACLE_COLOR: Color = Color::srgb_u8(0x5C, 0x40, 0x33);

/// Light rig standing in for the renderer; carries the last known surface size.
#[derive(Component, Debug, Clone, Copy)]
pub struct SceneRenderer {
    pub surface: SurfaceSize,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct SceneCamera {
    pub base_fov: f32,
}

/// Source of truth for the sphere's look; the material follows it.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlanetSurface {
    pub name: String,
    pub color: PackedRgb,
    pub radius: f32,
    pub segments: u32,
}

impl PlanetSurface {
    fn new(planet: &PlanetDescriptor, segments: u32) -> Self {
        Self {
            name: planet.name.clone(),
            color: planet.color,
            radius: planet.radius,
            segments,
        }
    }
}

#[derive(Component)]
pub struct GridGroup;

/// Shared style for every [`GridLine`] pointing at this entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct GridLineMaterial(pub GridLineStyle);

#[derive(Component, Debug, Clone, Copy)]
pub struct GridLine {
    pub material: Entity,
}

#[derive(Component)]
pub struct ObstacleContainer;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceMarker(pub MarkerKind);

/// Everything a system needs to build a [`BevySceneBackend`].
#[derive(SystemParam)]
pub struct SceneAssets<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    gizmos: ResMut<'w, Assets<GizmoAsset>>,
}

impl<'w, 's> SceneAssets<'w, 's> {
    pub fn backend(&mut self) -> BevySceneBackend<'_, 'w, 's> {
        BevySceneBackend::new(
            &mut self.commands,
            &mut self.meshes,
            &mut self.materials,
            &mut self.gizmos,
        )
    }
}

pub struct BevySceneBackend<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
    gizmos: &'a mut Assets<GizmoAsset>,
}

impl<'a, 'w, 's> BevySceneBackend<'a, 'w, 's> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        meshes: &'a mut Assets<Mesh>,
        materials: &'a mut Assets<StandardMaterial>,
        gizmos: &'a mut Assets<GizmoAsset>,
    ) -> Self {
        Self {
            commands,
            meshes,
            materials,
            gizmos,
        }
    }

    fn sphere_transform(radius: f32) -> Transform {
        Transform::from_scale(Vec3::splat(radius))
    }
}

impl SceneBackend for BevySceneBackend<'_, '_, '_> {
    type Handle = Entity;

    fn create_renderer(&mut self, surface: SurfaceSize) -> Entity {
        self.commands
            .spawn((
                SceneRenderer { surface },
                Transform::default(),
                Visibility::default(),
                Name::new("Scene Renderer"),
            ))
            .with_children(|parent| {
                parent.spawn((
                    DirectionalLight {
                        illuminance: 8_000.0,
                        ..default()
                    },
                    Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
                ));
            })
            .id()
    }

    fn create_camera(&mut self, _surface: SurfaceSize, distance: f32) -> Entity {
        // Wheel input is owned by the zoom controller, so pan-orbit only handles drag
        let pan_orbit = PanOrbitCamera {
            focus: Vec3::ZERO,
            radius: Some(distance),
            yaw: Some(0.0),
            pitch: Some(0.0),
            zoom_sensitivity: 0.0,
            force_update: true,
            ..default()
        };

        self.commands
            .spawn((
                Camera3d::default(),
                Projection::Perspective(PerspectiveProjection {
                    fov: BASE_FOV,
                    near: 0.1,
                    far: 1000.0,
                    ..default()
                }),
                Camera {
                    clear_color: ClearColorConfig::Custom(CLEAR_COLOR),
                    ..default()
                },
                pan_orbit,
                SceneCamera { base_fov: BASE_FOV },
                Transform::from_xyz(0.0, 0.0, distance).looking_at(Vec3::ZERO, Vec3::Y),
                Name::new("Scene Camera"),
            ))
            .id()
    }

    fn create_sphere(&mut self, planet: &PlanetDescriptor, segments: u32) -> Entity {
        let mesh = self.meshes.add(Sphere::new(1.0).mesh().uv(32, 32));
        let material = self.materials.add(StandardMaterial {
            base_color: planet.color.to_color(),
            perceptual_roughness: 1.0,
            ..default()
        });

        self.commands
            .spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Self::sphere_transform(planet.radius),
                Visibility::Visible,
                PlanetSurface::new(planet, segments),
                Name::new(planet.name.clone()),
            ))
            .observe(log_surface_click)
            .id()
    }

    fn create_grid_material(&mut self, style: GridLineStyle) -> Entity {
        self.commands
            .spawn((GridLineMaterial(style), Name::new("Grid Material")))
            .id()
    }

    fn create_grid_group(&mut self, scale: f32) -> Entity {
        self.commands
            .spawn((
                GridGroup,
                Transform::from_scale(Vec3::splat(scale)),
                Visibility::default(),
                Name::new("Grid"),
            ))
            .id()
    }

    fn create_grid_line(
        &mut self,
        group: Entity,
        material: Entity,
        style: GridLineStyle,
        points: &[Vec3],
    ) -> Entity {
        let mut strip = GizmoAsset::new();
        strip.linestrip(points.iter().copied(), style.color);

        self.commands
            .spawn((
                Gizmo {
                    handle: self.gizmos.add(strip),
                    line_config: GizmoLineConfig {
                        width: style.width,
                        ..default()
                    },
                    ..default()
                },
                GridLine { material },
                Transform::default(),
                Visibility::default(),
                ChildOf(group),
            ))
            .id()
    }

    fn create_obstacle_container(&mut self) -> Entity {
        self.commands
            .spawn((
                ObstacleContainer,
                Transform::default(),
                Visibility::default(),
                Name::new("Obstacles"),
            ))
            .id()
    }

    fn create_marker(&mut self, spec: &MarkerSpec, parent: Option<Entity>) -> Entity {
        let size = spec.size;
        let (mesh, color, name) = match spec.kind {
            MarkerKind::Rover => (
                self.meshes.add(Cuboid::new(size.x, size.y, size.z)),
                ROVER_COLOR,
                "Rover",
            ),
            MarkerKind::Obstacle => (
                self.meshes.add(Cone::new(size.x * 0.5, size.y)),
                OBSTACLE_COLOR,
                "Obstacle",
            ),
        };
        let material = self.materials.add(StandardMaterial {
            base_color: color,
            ..default()
        });

        let mut marker = self.commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            spec.transform(),
            Visibility::Visible,
            SurfaceMarker(spec.kind),
            Name::new(name),
        ));
        if let Some(parent) = parent {
            marker.insert(ChildOf(parent));
        }
        marker.id()
    }

    fn update_sphere(&mut self, sphere: Entity, planet: &PlanetDescriptor, segments: u32) {
        self.commands.entity(sphere).insert((
            PlanetSurface::new(planet, segments),
            Self::sphere_transform(planet.radius),
            Name::new(planet.name.clone()),
        ));
    }

    fn update_grid_scale(&mut self, group: Entity, scale: f32) {
        self.commands
            .entity(group)
            .insert(Transform::from_scale(Vec3::splat(scale)));
    }

    fn update_line_style(&mut self, material: Entity, style: GridLineStyle) {
        self.commands
            .entity(material)
            .insert(GridLineMaterial(style));
    }

    fn update_marker(&mut self, marker: Entity, spec: &MarkerSpec) {
        self.commands.entity(marker).insert(spec.transform());
    }

    fn configure_surface(&mut self, renderer: Entity, _camera: Entity, surface: SurfaceSize) {
        // Camera aspect follows the window on its own; only the recorded size changes
        self.commands
            .entity(renderer)
            .insert(SceneRenderer { surface });
    }

    fn dispose(&mut self, handle: Entity) {
        // despawn() takes children with it
        self.commands.entity(handle).despawn();
    }
}

/// Write the [`PlanetSurface`] color into the sphere's existing material.
pub fn sync_planet_surface_material(
    surfaces: Query<(&PlanetSurface, &MeshMaterial3d<StandardMaterial>), Changed<PlanetSurface>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (surface, material) in &surfaces {
        if let Some(mut material) = materials.get_mut(&material.0) {
            material.base_color = surface.color.to_color();
        }
    }
}

/// Push a changed [`GridLineMaterial`] width into every line that uses it.
pub fn sync_grid_line_width(
    materials: Query<(Entity, &GridLineMaterial), Changed<GridLineMaterial>>,
    mut lines: Query<(&GridLine, &mut Gizmo)>,
) {
    for (material, style) in &materials {
        for (line, mut gizmo) in &mut lines {
            if line.material == material && gizmo.line_config.width != style.0.width {
                gizmo.line_config.width = style.0.width;
            }
        }
    }
}

fn log_surface_click(mut event: On<Pointer<Click>>, surfaces: Query<&PlanetSurface>) {
    let Some(pos) = event.hit.position else {
        return;
    };
    let Ok(surface) = surfaces.single() else {
        return;
    };
    let coords = SphericalCoordinates::from(pos);
    let (polar, azimuth) = coords.as_degrees();
    info!(
        "Clicked {} at cell {} (polar {:.1}, azimuth {:.1})",
        surface.name,
        coords.cell(surface.segments),
        polar,
        azimuth
    );
    event.propagate(false);
}
