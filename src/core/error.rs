//! Error taxonomy for the planet scene.

use thiserror::Error;

use crate::scene::lifecycle::LifecyclePhase;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// Radius must be positive and the grid needs at least two segments.
    #[error("invalid geometry input: radius {radius}, segments {segments}")]
    InvalidGeometryInput { radius: f32, segments: u32 },
    #[error("invalid planet radius {0}, expected a positive finite value")]
    InvalidRadius(f32),
    /// A lifecycle operation ran in a phase where it would leak or touch freed resources.
    #[error("scene operation `{operation}` invoked while {phase:?}")]
    ResourceLeakRisk {
        operation: &'static str,
        phase: LifecyclePhase,
    },
    #[error("invalid color `{0}`, expected #RRGGBB")]
    InvalidColor(String),
    #[error("unknown rover command `{0}`")]
    UnknownCommand(char),
    #[error("unknown planet `{0}`")]
    UnknownPlanet(String),
}
