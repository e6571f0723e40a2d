//! Planet scene systems: mount, dispose, planet switches, zoom and resize

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::core::config::ViewerConfig;
use crate::core::planet::SelectedPlanet;
use crate::core::zoom::zoomed_fov;
use crate::scene::backend::SurfaceSize;
use crate::scene::render::{SceneAssets, SceneCamera};
use crate::scene::{
    LifecyclePhase, ObstacleCountChanged, ObstacleRng, PlanetApplied, PlanetScene, SceneState,
    ZoomChanged,
};

/// Pixels per wheel "line" on platforms that report line deltas.
const LINE_HEIGHT_PX: f32 = 100.0;

pub fn request_initial_mount(mut next_state: ResMut<NextState<SceneState>>) {
    next_state.set(SceneState::Mounted);
}

/// Camera position used as the heading reference for surface placement.
pub fn camera_position(scene: &PlanetScene, cameras: &Query<&Transform, With<SceneCamera>>) -> Vec3 {
    scene
        .camera()
        .and_then(|camera| cameras.get(camera).ok())
        .map(|transform| transform.translation)
        .unwrap_or(Vec3::new(0.0, 0.0, scene.settings().camera_distance))
}

fn publish(
    applied: PlanetApplied,
    obstacle_events: &mut MessageWriter<ObstacleCountChanged>,
    zoom_events: &mut MessageWriter<ZoomChanged>,
) {
    obstacle_events.write(ObstacleCountChanged(applied.obstacle_count));
    if let Some(zoom) = applied.zoom {
        zoom_events.write(ZoomChanged(zoom));
    }
}

#[allow(clippy::too_many_arguments)]
pub fn mount_scene(
    mut assets: SceneAssets,
    mut scene: ResMut<PlanetScene>,
    mut rng: ResMut<ObstacleRng>,
    config: Res<ViewerConfig>,
    selected: Res<SelectedPlanet>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut obstacle_events: MessageWriter<ObstacleCountChanged>,
    mut zoom_events: MessageWriter<ZoomChanged>,
) {
    if scene.phase() == LifecyclePhase::Disposed {
        // A disposed manager holds nothing; start over with a fresh one
        *scene = PlanetScene::new(&config);
    }

    let surface = windows
        .single()
        .map(|window| SurfaceSize::new(window.width(), window.height()))
        .unwrap_or_default();

    match scene.mount(&mut assets.backend(), surface, &selected.0, &mut rng.0) {
        Ok(applied) => {
            info!(
                "Mounted {} scene with {} obstacles",
                selected.name, applied.obstacle_count
            );
            if applied.obstacle_count < config.obstacle_target() {
                warn!(
                    "Grid has room for only {} of {} obstacles",
                    applied.obstacle_count,
                    config.obstacle_target()
                );
            }
            publish(applied, &mut obstacle_events, &mut zoom_events);
        }
        Err(e) => error!("Failed to mount planet scene: {}", e),
    }
}

pub fn dispose_scene(mut assets: SceneAssets, mut scene: ResMut<PlanetScene>) {
    match scene.dispose(&mut assets.backend()) {
        Ok(()) => info!("Disposed planet scene"),
        Err(e) => error!("Failed to dispose planet scene: {}", e),
    }
}

pub fn apply_selected_planet(
    mut assets: SceneAssets,
    mut scene: ResMut<PlanetScene>,
    mut rng: ResMut<ObstacleRng>,
    selected: Res<SelectedPlanet>,
    cameras: Query<&Transform, With<SceneCamera>>,
    mut obstacle_events: MessageWriter<ObstacleCountChanged>,
    mut zoom_events: MessageWriter<ZoomChanged>,
) {
    let reference = camera_position(&scene, &cameras);
    match scene.set_planet(&mut assets.backend(), &selected.0, reference, &mut rng.0) {
        Ok(Some(applied)) => {
            info!(
                "Switched to {} (radius {}), {} obstacles",
                selected.name, selected.radius, applied.obstacle_count
            );
            publish(applied, &mut obstacle_events, &mut zoom_events);
        }
        Ok(None) => {}
        Err(e) => error!("Failed to switch to {}: {}", selected.name, e),
    }
}

/// Wheel `y` in pixels, signed so that positive zooms out.
///
/// Scrolling up reports positive `y` and zooms in.
pub fn wheel_delta_y(unit: MouseScrollUnit, y: f32) -> f32 {
    let pixels = match unit {
        MouseScrollUnit::Line => y * LINE_HEIGHT_PX,
        MouseScrollUnit::Pixel => y,
    };
    -pixels
}

pub fn handle_wheel_zoom(
    mut wheel: MessageReader<MouseWheel>,
    mut scene: ResMut<PlanetScene>,
    mut zoom_events: MessageWriter<ZoomChanged>,
) {
    for event in wheel.read() {
        let delta_y = wheel_delta_y(event.unit, event.y);
        match scene.wheel(delta_y) {
            Ok(wheel) => {
                debug!("Wheel {:.1}px -> zoom target {:.3}", delta_y, wheel.target);
                if let Some(zoom) = wheel.report {
                    zoom_events.write(ZoomChanged(zoom));
                }
            }
            Err(e) => error!("Ignoring wheel input: {}", e),
        }
    }
}

pub fn advance_zoom(
    time: Res<Time>,
    mut scene: ResMut<PlanetScene>,
    mut zoom_events: MessageWriter<ZoomChanged>,
) {
    if let Some(zoom) = scene.tick(time.delta_secs()) {
        zoom_events.write(ZoomChanged(zoom));
    }
}

pub fn apply_zoom_to_projection(
    scene: Res<PlanetScene>,
    mut cameras: Query<(&SceneCamera, &mut Projection)>,
) {
    let zoom = scene.zoom().zoom();
    for (camera, mut projection) in cameras.iter_mut() {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            let fov = zoomed_fov(camera.base_fov, zoom);
            if (perspective.fov - fov).abs() > f32::EPSILON {
                perspective.fov = fov;
            }
        }
    }
}

pub fn handle_resize(
    mut resized: MessageReader<WindowResized>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut assets: SceneAssets,
    mut scene: ResMut<PlanetScene>,
) {
    let Ok(primary) = windows.single() else {
        return;
    };
    let Some(last) = resized.read().filter(|e| e.window == primary).last() else {
        return;
    };

    let surface = SurfaceSize::new(last.width, last.height);
    debug!("Surface resized to {}x{}", surface.width, surface.height);
    if let Err(e) = scene.resize(&mut assets.backend(), surface) {
        error!("Failed to resize planet scene: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::zoom::{CameraZoomController, ZoomSettings};

    #[test]
    fn test_pixel_scroll_up_zooms_in() {
        assert_eq!(wheel_delta_y(MouseScrollUnit::Pixel, 120.0), -120.0);
        assert_eq!(wheel_delta_y(MouseScrollUnit::Pixel, -40.0), 40.0);
    }

    #[test]
    fn test_line_scroll_scaled_to_pixels() {
        assert_eq!(wheel_delta_y(MouseScrollUnit::Line, 1.0), -LINE_HEIGHT_PX);
        assert_eq!(wheel_delta_y(MouseScrollUnit::Line, -3.0), 3.0 * LINE_HEIGHT_PX);
    }

    #[test]
    fn test_scroll_up_raises_zoom() {
        let mut zoom = CameraZoomController::new(ZoomSettings::default(), 1.0);
        zoom.on_wheel_delta(wheel_delta_y(MouseScrollUnit::Line, 1.0), 1.0);
        assert!(zoom.zoom() > 1.0);

        let mut zoom = CameraZoomController::new(ZoomSettings::default(), 1.0);
        zoom.on_wheel_delta(wheel_delta_y(MouseScrollUnit::Pixel, -50.0), 1.0);
        assert!(zoom.zoom() < 1.0);
    }
}
