//! Visualization module
//!
//! Pure geometry for the planet scene: the lat/lon wireframe, surface placement and the
//! obstacle layout.

pub mod grid;
pub mod obstacles;
pub mod placement;
