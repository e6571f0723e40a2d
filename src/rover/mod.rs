//! Rover module
//!
//! Grid navigation rules and the systems that turn keyboard input into rover moves.

use bevy::prelude::*;

pub mod navigation;
pub mod systems;

pub use navigation::RoverState;

use crate::scene::SceneState;
use crate::scene::systems::mount_scene;
use navigation::RoverCommand;
use systems::{drive_rover, keyboard_rover_commands, queue_startup_commands};

/// A command for the rover, from the keyboard or any other host control.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoverCommandIssued(pub RoverCommand);

/// Plugin for rover control
pub struct RoverPlugin;

impl Plugin for RoverPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<RoverCommandIssued>()
            .add_systems(
                OnEnter(SceneState::Mounted),
                queue_startup_commands.after(mount_scene),
            )
            .add_systems(
                Update,
                (keyboard_rover_commands, drive_rover)
                    .chain()
                    .run_if(in_state(SceneState::Mounted)),
            );
    }
}
