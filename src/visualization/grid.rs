//! Latitude/longitude wireframe generation.
//!
//! Every ring and arc is its own polyline; vertices are duplicated where lines cross.

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

use crate::core::coordinates::GridSpec;

pub type Polyline = Vec<Vec3>;

#[derive(Debug, Clone, Default)]
pub struct GridLines {
    /// `segments - 1` interior rings, north to south.
    pub latitude: Vec<Polyline>,
    /// `segments` pole-to-pole arcs.
    pub longitude: Vec<Polyline>,
}

impl GridLines {
    pub fn iter(&self) -> impl Iterator<Item = &Polyline> {
        self.latitude.iter().chain(self.longitude.iter())
    }

    pub fn len(&self) -> usize {
        self.latitude.len() + self.longitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the wireframe for a sphere; each line is sampled at `2 * segments + 1` points.
pub fn build_grid(spec: GridSpec) -> GridLines {
    let radius = spec.radius();
    let segments = spec.segments();
    let divisions = segments * 2;

    let latitude = (1..segments)
        .map(|i| {
            let phi = (i as f32 / segments as f32) * PI;
            let ring_radius = radius * phi.sin();
            let y = radius * phi.cos();
            (0..=divisions)
                .map(|j| {
                    let theta = (j as f32 / divisions as f32) * TAU;
                    Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin())
                })
                .collect()
        })
        .collect();

    let semicircle: Polyline = (0..=divisions)
        .map(|j| {
            let phi = (j as f32 / divisions as f32) * PI;
            Vec3::new(radius * phi.sin(), radius * phi.cos(), 0.0)
        })
        .collect();

    let longitude = (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * TAU;
            let rotation = Quat::from_rotation_y(theta);
            semicircle.iter().map(|p| rotation * *p).collect()
        })
        .collect();

    GridLines {
        latitude,
        longitude,
    }
}

/// Grid line width in pixels for a planet radius; bigger planets get heavier lines.
pub fn grid_line_width(radius: f32) -> f32 {
    2.0 + radius * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_on_sphere(lines: &GridLines, radius: f32) {
        for line in lines.iter() {
            for p in line {
                assert!(
                    (p.length() - radius).abs() < EPSILON * radius.max(1.0),
                    "point {p:?} is off the sphere of radius {radius}"
                );
            }
        }
    }

    #[test]
    fn test_line_counts_for_default_grid() {
        let lines = build_grid(GridSpec::new(1.001, 16).unwrap());
        assert_eq!(lines.latitude.len(), 15);
        assert_eq!(lines.longitude.len(), 16);
        assert_eq!(lines.len(), 31);
        assert!(lines.iter().all(|line| line.len() == 33));
    }

    #[test]
    fn test_all_points_lie_on_sphere() {
        for (radius, segments) in [(1.0, 16), (0.53, 16), (6.5, 7), (0.001, 3)] {
            let lines = build_grid(GridSpec::new(radius, segments).unwrap());
            assert_eq!(lines.latitude.len(), segments as usize - 1);
            assert_eq!(lines.longitude.len(), segments as usize);
            assert_on_sphere(&lines, radius);
        }
    }

    #[test]
    fn test_minimum_grid_of_two_segments() {
        let lines = build_grid(GridSpec::new(1.0, 2).unwrap());
        assert_eq!(lines.latitude.len(), 1);
        assert_eq!(lines.longitude.len(), 2);
        assert!(lines.iter().all(|line| line.len() == 5));
        // The only ring is the equator
        assert!(lines.latitude[0].iter().all(|p| p.y.abs() < EPSILON));
        assert_on_sphere(&lines, 1.0);
    }

    #[test]
    fn test_rings_are_closed_and_exclude_poles() {
        let lines = build_grid(GridSpec::new(1.0, 16).unwrap());
        for ring in &lines.latitude {
            let first = ring.first().unwrap();
            let last = ring.last().unwrap();
            assert!(first.distance(*last) < EPSILON);
            assert!(first.y.abs() < 1.0 - EPSILON);
        }
    }

    #[test]
    fn test_arcs_run_pole_to_pole() {
        let lines = build_grid(GridSpec::new(2.0, 16).unwrap());
        for arc in &lines.longitude {
            assert!((arc.first().unwrap().y - 2.0).abs() < EPSILON);
            assert!((arc.last().unwrap().y + 2.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_grid_line_width() {
        assert_eq!(grid_line_width(1.0), 4.0);
        assert!((grid_line_width(0.53) - 3.06).abs() < EPSILON);
    }
}
