//! User interface module
//!
//! Stands in for the host application: keyboard planet selection, mount toggling and a text
//! readout of what the scene reports back.

use bevy::prelude::*;

pub mod state;
pub mod systems;

pub use state::HudState;
pub use systems::{
    planet_hotkeys, record_scene_notifications, spawn_hud, toggle_scene_mount, update_hud_text,
};

/// Plugin for the host readout and hotkeys
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudState>()
            .add_systems(Startup, spawn_hud)
            .add_systems(
                Update,
                (
                    planet_hotkeys,
                    toggle_scene_mount,
                    record_scene_notifications,
                    update_hud_text,
                )
                    .chain(),
            );
    }
}
