//! Planet scene module
//!
//! Owns the mounted scene: the lifecycle state machine, the Bevy backend it drives and the
//! systems that feed it window, wheel and planet-selection input.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod backend;
pub mod lifecycle;
pub mod render;
pub mod systems;

pub use lifecycle::{LifecyclePhase, LifecycleSettings, PlanetApplied, SceneLifecycle};

use crate::core::config::ViewerConfig;
use crate::core::planet::{PlanetDescriptor, SelectedPlanet};
use systems::{
    advance_zoom, apply_selected_planet, apply_zoom_to_projection, dispose_scene, handle_resize,
    handle_wheel_zoom, mount_scene, request_initial_mount,
};

/// Whether the scene is allocated. Every per-frame scene system is gated on `Mounted`.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneState {
    #[default]
    Uninitialized,
    Mounted,
    Disposed,
}

/// Sent once per planet change, after obstacles are sampled.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleCountChanged(pub usize);

/// Sent on every accepted zoom change, clamped values included.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ZoomChanged(pub f32);

/// The scene manager living in the Bevy world.
#[derive(Resource, Deref, DerefMut)]
pub struct PlanetScene(pub SceneLifecycle<Entity>);

impl PlanetScene {
    pub fn new(config: &ViewerConfig) -> Self {
        Self(SceneLifecycle::new(LifecycleSettings::from(config)))
    }
}

/// Random source for obstacle layouts.
#[derive(Resource, Deref, DerefMut)]
pub struct ObstacleRng(pub ChaCha8Rng);

impl ObstacleRng {
    pub fn from_config(config: &ViewerConfig) -> Self {
        let seed = config.obstacle_seed.unwrap_or_else(rand::random);
        debug!("Obstacle RNG seed {}", seed);
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Plugin for the planet scene
pub struct PlanetScenePlugin;

impl Plugin for PlanetScenePlugin {
    fn build(&self, app: &mut App) {
        let config = match app.world().get_resource::<ViewerConfig>() {
            Some(config) => config.clone(),
            None => {
                app.insert_resource(ViewerConfig::default());
                ViewerConfig::default()
            }
        };
        let initial = config.initial_planet().unwrap_or_else(|e| {
            let fallback = PlanetDescriptor::default();
            warn!("{}, starting on {}", e, fallback.name);
            fallback
        });

        app.init_state::<SceneState>()
            .add_message::<ObstacleCountChanged>()
            .add_message::<ZoomChanged>()
            .insert_resource(PlanetScene::new(&config))
            .insert_resource(ObstacleRng::from_config(&config))
            .insert_resource(SelectedPlanet(initial))
            .add_systems(Startup, request_initial_mount)
            .add_systems(OnEnter(SceneState::Mounted), mount_scene)
            .add_systems(OnExit(SceneState::Mounted), dispose_scene)
            .add_systems(
                Update,
                (
                    apply_selected_planet.run_if(resource_changed::<SelectedPlanet>),
                    handle_wheel_zoom,
                    advance_zoom,
                    apply_zoom_to_projection,
                    handle_resize,
                    render::sync_planet_surface_material,
                    render::sync_grid_line_width,
                )
                    .chain()
                    .run_if(in_state(SceneState::Mounted)),
            );
    }
}
