//! UI state management

use bevy::prelude::*;

use crate::rover::RoverState;

/// Last values received through the scene's outbound messages.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct HudState {
    pub obstacle_count: Option<usize>,
    pub zoom: Option<f32>,
}

impl HudState {
    pub fn readout(&self, planet: &str, rover: Option<&RoverState>) -> String {
        let rover = match rover {
            Some(rover) => format!("{} facing {}", rover.cell, rover.heading),
            None => String::from("-"),
        };
        let obstacles = self
            .obstacle_count
            .map_or_else(|| String::from("-"), |count| count.to_string());
        let zoom = self
            .zoom
            .map_or_else(|| String::from("-"), |zoom| format!("{:.2}x", zoom));

        format!(
            "Planet: {planet}\nRover: {rover}\nObstacles: {obstacles}\nZoom: {zoom}\n\n\
             [1-4] planet  [arrows] drive  [wheel] zoom  [U] mount/unmount"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::planet::GridCell;
    use crate::rover::navigation::Heading;

    #[test]
    fn test_readout_before_any_notification() {
        let text = HudState::default().readout("Mars", None);
        assert!(text.starts_with("Planet: Mars\nRover: -\nObstacles: -\nZoom: -"));
    }

    #[test]
    fn test_readout_with_values() {
        let hud = HudState {
            obstacle_count: Some(25),
            zoom: Some(1.5),
        };
        let rover = RoverState::new(GridCell::new(8, 3), Heading::East);
        let text = hud.readout("Earth", Some(&rover));
        assert!(text.contains("Rover: lat 8, lon 3 facing E"));
        assert!(text.contains("Obstacles: 25"));
        assert!(text.contains("Zoom: 1.50x"));
    }
}
