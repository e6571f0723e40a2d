//! Hotkeys and the HUD text

use bevy::prelude::*;

use crate::core::config::ViewerConfig;
use crate::core::planet::SelectedPlanet;
use crate::scene::{ObstacleCountChanged, PlanetScene, SceneState, ZoomChanged};
use crate::ui::state::HudState;

const PLANET_KEYS: [KeyCode; 4] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
];

/// Marker for the readout text node
#[derive(Component)]
pub struct HudText;

pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.85, 0.9, 0.95)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        HudText,
        Name::new("HUD"),
    ));
}

/// Digit keys pick a catalog planet. Re-selecting the current planet changes nothing.
pub fn planet_hotkeys(
    input: Res<ButtonInput<KeyCode>>,
    config: Res<ViewerConfig>,
    mut selected: ResMut<SelectedPlanet>,
) {
    for (index, key) in PLANET_KEYS.iter().enumerate() {
        if !input.just_pressed(*key) {
            continue;
        }
        if let Some(planet) = config.planets.get(index) {
            info!("Selected {}", planet.name);
            selected.set_if_neq(SelectedPlanet(planet.clone()));
        }
    }
}

pub fn toggle_scene_mount(
    input: Res<ButtonInput<KeyCode>>,
    state: Res<State<SceneState>>,
    mut next_state: ResMut<NextState<SceneState>>,
) {
    if !input.just_pressed(KeyCode::KeyU) {
        return;
    }
    match state.get() {
        SceneState::Mounted => next_state.set(SceneState::Disposed),
        SceneState::Uninitialized | SceneState::Disposed => next_state.set(SceneState::Mounted),
    }
}

pub fn record_scene_notifications(
    mut obstacle_events: MessageReader<ObstacleCountChanged>,
    mut zoom_events: MessageReader<ZoomChanged>,
    mut hud: ResMut<HudState>,
) {
    if let Some(ObstacleCountChanged(count)) = obstacle_events.read().last() {
        hud.obstacle_count = Some(*count);
    }
    if let Some(ZoomChanged(zoom)) = zoom_events.read().last() {
        hud.zoom = Some(*zoom);
    }
}

pub fn update_hud_text(
    hud: Res<HudState>,
    scene: Res<PlanetScene>,
    selected: Res<SelectedPlanet>,
    state: Res<State<SceneState>>,
    mut texts: Query<&mut Text, With<HudText>>,
) {
    let readout = match state.get() {
        SceneState::Mounted => hud.readout(&selected.name, Some(scene.rover())),
        SceneState::Uninitialized | SceneState::Disposed => {
            String::from("Scene unmounted\n\n[U] mount")
        }
    };
    for mut text in texts.iter_mut() {
        if text.0 != readout {
            text.0.clone_from(&readout);
        }
    }
}
