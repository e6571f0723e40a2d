//! Rover input and movement systems

use bevy::prelude::*;

use crate::core::config::ViewerConfig;
use crate::rover::navigation::{MoveOutcome, RoverCommand, parse_commands};
use crate::rover::RoverCommandIssued;
use crate::scene::render::{SceneAssets, SceneCamera};
use crate::scene::systems::camera_position;
use crate::scene::PlanetScene;

const KEY_BINDINGS: [(KeyCode, RoverCommand); 4] = [
    (KeyCode::ArrowUp, RoverCommand::Forward),
    (KeyCode::ArrowDown, RoverCommand::Backward),
    (KeyCode::ArrowLeft, RoverCommand::Left),
    (KeyCode::ArrowRight, RoverCommand::Right),
];

pub fn keyboard_rover_commands(
    input: Res<ButtonInput<KeyCode>>,
    mut commands: MessageWriter<RoverCommandIssued>,
) {
    for (key, command) in KEY_BINDINGS {
        if input.just_pressed(key) {
            commands.write(RoverCommandIssued(command));
        }
    }
}

/// Replay the configured command string after each mount.
pub fn queue_startup_commands(
    config: Res<ViewerConfig>,
    mut commands: MessageWriter<RoverCommandIssued>,
) {
    if config.startup_commands.is_empty() {
        return;
    }
    match parse_commands(&config.startup_commands) {
        Ok(parsed) => {
            info!("Running {} startup rover commands", parsed.len());
            commands.write_batch(parsed.into_iter().map(RoverCommandIssued));
        }
        Err(e) => warn!("Skipping startup rover commands: {}", e),
    }
}

pub fn drive_rover(
    mut issued: MessageReader<RoverCommandIssued>,
    mut assets: SceneAssets,
    mut scene: ResMut<PlanetScene>,
    cameras: Query<&Transform, With<SceneCamera>>,
) {
    for RoverCommandIssued(command) in issued.read() {
        let reference = camera_position(&scene, &cameras);
        match scene.move_rover(&mut assets.backend(), *command, reference) {
            Ok(MoveOutcome::Blocked(cell)) => {
                info!("Rover blocked by obstacle at {}", cell);
            }
            Ok(_) => {
                let rover = scene.rover();
                debug!("Rover at {} facing {}", rover.cell, rover.heading);
            }
            Err(e) => error!("Rover command {:?} failed: {}", command, e),
        }
    }
}
