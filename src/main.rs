use bevy::light::GlobalAmbientLight;
use bevy::picking::prelude::*;
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{RenderCreation, WgpuSettings};
use bevy::window::{PresentMode, Window, WindowPlugin};

use bevy_panorbit_camera::PanOrbitCameraPlugin;

#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

mod core;
mod rover;
mod scene;
mod ui;
mod visualization;

use crate::core::config::ViewerConfig;
use rover::RoverPlugin;
use scene::PlanetScenePlugin;
use ui::UiPlugin;

pub fn setup(mut commands: Commands) {
    // Keep the night side of the planet readable
    commands.insert_resource(GlobalAmbientLight {
        brightness: 300.0,
        ..default()
    });
}

fn main() {
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Planet Rover Viewer".to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            .set(RenderPlugin {
                render_creation: RenderCreation::Automatic(WgpuSettings { ..default() }),
                ..default()
            }),
    );

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    // Loaded after DefaultPlugins so the log subscriber is up
    app.insert_resource(ViewerConfig::load());
    app.add_plugins(PanOrbitCameraPlugin);
    app.add_plugins(MeshPickingPlugin);

    app.add_plugins(PlanetScenePlugin);
    app.add_plugins(RoverPlugin);
    app.add_plugins(UiPlugin);
    app.add_systems(Startup, setup);

    app.run();
}
