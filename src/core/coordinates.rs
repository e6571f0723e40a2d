//! Spherical coordinate helpers for the lat/lon grid.
//!
//! Conventions used everywhere in the crate:
//! - `y` is the polar axis; polar angle `phi` is measured from +Y (0 at the north pole, PI at the south pole)
//! - azimuth `theta` is measured in the x/z plane from +X toward +Z, in `[0, 2*PI)`
//! - a grid of `segments` divides `phi` into `segments` bands and `theta` into `segments` sectors

use bevy::math::Vec3;
use std::f64::consts::{PI, TAU};

use crate::core::error::SceneError;
use crate::core::planet::GridCell;

/// Validated sphere radius and segment count. All geometry entry points take this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    radius: f32,
    segments: u32,
}

impl GridSpec {
    pub fn new(radius: f32, segments: u32) -> Result<Self, SceneError> {
        if !(radius > 0.0) || !radius.is_finite() || segments < 2 {
            return Err(SceneError::InvalidGeometryInput { radius, segments });
        }
        Ok(Self { radius, segments })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.lat_index < self.segments && cell.lon_index < self.segments
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCoordinates {
    // Radians, f64 for pole precision
    pub polar: f64,
    pub azimuth: f64,
}

impl From<Vec3> for SphericalCoordinates {
    fn from(value: Vec3) -> Self {
        let n = value.normalize();
        let polar = (n.y as f64).clamp(-1.0, 1.0).acos();
        let azimuth = (n.z as f64).atan2(n.x as f64).rem_euclid(TAU);
        SphericalCoordinates { polar, azimuth }
    }
}

impl SphericalCoordinates {
    /// Center of a cell, offset by half a cell in both directions so nothing sits on a seam.
    pub fn cell_center(cell: GridCell, segments: u32) -> Self {
        let s = segments as f64;
        SphericalCoordinates {
            polar: (cell.lat_index as f64 + 0.5) / s * PI,
            azimuth: (cell.lon_index as f64 + 0.5) / s * TAU,
        }
    }

    pub fn to_cartesian(&self, radius: f32) -> Vec3 {
        let mut ring = self.polar.sin();
        // Clamp residual ring radius at the poles to avoid f32 noise in x/z
        if self.polar.abs() < 1e-9 || (PI - self.polar).abs() < 1e-9 {
            ring = 0.0;
        }
        let x = ring * self.azimuth.cos();
        let y = self.polar.cos();
        let z = ring * self.azimuth.sin();
        Vec3::new(x as f32, y as f32, z as f32) * radius
    }

    /// Grid cell containing this direction.
    pub fn cell(&self, segments: u32) -> GridCell {
        let s = segments as f64;
        let lat = ((self.polar / PI) * s).floor() as u32;
        let lon = ((self.azimuth / TAU) * s).floor() as u32;
        GridCell::new(lat.min(segments - 1), lon.min(segments - 1))
    }

    pub fn as_degrees(&self) -> (f32, f32) {
        (self.polar.to_degrees() as f32, self.azimuth.to_degrees() as f32)
    }
}
