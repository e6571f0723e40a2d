//! Discrete rover movement on the lat/lon grid.
//!
//! The grid wraps on both axes. North is toward the +Y pole, i.e. decreasing `lat_index`;
//! East is increasing `lon_index`.

use std::fmt;

use crate::core::error::SceneError;
use crate::core::planet::GridCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Heading {
    #[default]
    North,
    East,
    South,
    West,
}

impl Heading {
    pub fn right(self) -> Self {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    pub fn left(self) -> Self {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    /// (d_lat, d_lon) for one step forward.
    fn step(self) -> (i64, i64) {
        match self {
            Heading::North => (-1, 0),
            Heading::East => (0, 1),
            Heading::South => (1, 0),
            Heading::West => (0, -1),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Heading::North => 'N',
            Heading::East => 'E',
            Heading::South => 'S',
            Heading::West => 'W',
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoverCommand {
    Forward,
    Backward,
    Left,
    Right,
}

impl TryFrom<char> for RoverCommand {
    type Error = SceneError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            'f' => Ok(RoverCommand::Forward),
            'b' => Ok(RoverCommand::Backward),
            'l' => Ok(RoverCommand::Left),
            'r' => Ok(RoverCommand::Right),
            other => Err(SceneError::UnknownCommand(other)),
        }
    }
}

/// Parse a command string such as `"ffrbl"`.
pub fn parse_commands(input: &str) -> Result<Vec<RoverCommand>, SceneError> {
    input.chars().map(RoverCommand::try_from).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Turned,
    /// The next cell holds an obstacle; the rover stayed put.
    Blocked(GridCell),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoverState {
    pub cell: GridCell,
    pub heading: Heading,
}

impl RoverState {
    pub fn new(cell: GridCell, heading: Heading) -> Self {
        Self { cell, heading }
    }

    /// Rover at the grid center, facing north.
    pub fn centered(segments: u32) -> Self {
        Self::new(GridCell::center(segments), Heading::North)
    }

    pub fn execute(
        &mut self,
        command: RoverCommand,
        segments: u32,
        obstacles: &[GridCell],
    ) -> MoveOutcome {
        match command {
            RoverCommand::Left => {
                self.heading = self.heading.left();
                MoveOutcome::Turned
            }
            RoverCommand::Right => {
                self.heading = self.heading.right();
                MoveOutcome::Turned
            }
            RoverCommand::Forward => self.step(1, segments, obstacles),
            RoverCommand::Backward => self.step(-1, segments, obstacles),
        }
    }

    fn step(&mut self, sign: i64, segments: u32, obstacles: &[GridCell]) -> MoveOutcome {
        let (d_lat, d_lon) = self.heading.step();
        let s = segments as i64;
        let next = GridCell::new(
            (self.cell.lat_index as i64 + sign * d_lat).rem_euclid(s) as u32,
            (self.cell.lon_index as i64 + sign * d_lon).rem_euclid(s) as u32,
        );
        if obstacles.contains(&next) {
            return MoveOutcome::Blocked(next);
        }
        self.cell = next;
        MoveOutcome::Moved
    }
}
