//! Placing markers on the planet surface.

use bevy::prelude::*;

use crate::core::coordinates::{GridSpec, SphericalCoordinates};
use crate::core::planet::GridCell;

/// Local axis of a marker mesh that should point away from the planet.
pub const CANONICAL_UP: Vec3 = Vec3::Y;
/// Local axis of a marker mesh that counts as its front.
pub const CANONICAL_FORWARD: Vec3 = Vec3::NEG_Z;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePlacement {
    /// Point on the sphere surface.
    pub position: Vec3,
    pub orientation: Quat,
}

impl SurfacePlacement {
    pub fn normal(&self) -> Vec3 {
        self.position.normalize()
    }

    /// Transform for a mesh centered on its origin, raised by `lift` along the normal.
    pub fn transform(&self, lift: f32) -> Transform {
        Transform::from_translation(self.position + self.normal() * lift)
            .with_rotation(self.orientation)
    }
}

/// Place an object at the center of `cell`, standing on the surface and facing `reference`.
///
/// `reference` is a world-space point (normally the camera position); its projection onto the
/// tangent plane decides which way the object's forward axis points. The heading rotation is
/// pre-multiplied onto the surface alignment.
pub fn place_on_sphere(cell: GridCell, spec: GridSpec, reference: Vec3) -> SurfacePlacement {
    debug_assert!(spec.contains(cell), "cell {cell} outside a {} grid", spec.segments());

    let position =
        SphericalCoordinates::cell_center(cell, spec.segments()).to_cartesian(spec.radius());
    let normal = position.normalize();

    let alignment = Quat::from_rotation_arc(CANONICAL_UP, normal);
    let heading = heading_rotation(normal, alignment * CANONICAL_FORWARD, reference);

    SurfacePlacement {
        position,
        orientation: heading * alignment,
    }
}

/// Rotation about `normal` taking `forward` onto the tangent-plane projection of `reference`.
fn heading_rotation(normal: Vec3, forward: Vec3, reference: Vec3) -> Quat {
    let tangent = reference - normal * reference.dot(normal);
    if tangent.length_squared() < 1e-10 {
        // Reference straight above or below: any heading is as good as another
        return Quat::IDENTITY;
    }
    let tangent = tangent.normalize();
    let angle = normal.dot(forward.cross(tangent)).atan2(forward.dot(tangent));
    Quat::from_axis_angle(normal, angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPSILON: f32 = 1e-4;
    const CAMERA: Vec3 = Vec3::new(0.0, 0.0, 3.0);

    fn spec(radius: f32) -> GridSpec {
        GridSpec::new(radius, 16).unwrap()
    }

    #[test]
    fn test_position_magnitude_matches_radius() {
        for radius in [0.38_f32, 0.53, 1.0, 12.0] {
            for lat in 0..16 {
                for lon in 0..16 {
                    let placed = place_on_sphere(GridCell::new(lat, lon), spec(radius), CAMERA);
                    assert!(
                        (placed.position.length() - radius).abs() < EPSILON * radius,
                        "cell ({lat}, {lon}) at r={radius}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_position_is_cell_center_not_corner() {
        let cell = GridCell::new(3, 11);
        let placed = place_on_sphere(cell, spec(1.0), CAMERA);
        let coords = SphericalCoordinates::from(placed.position);
        assert_eq!(coords.cell(16), cell);

        let band = PI / 16.0;
        let offset = (coords.polar / band).fract();
        assert!((offset - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_up_axis_matches_surface_normal() {
        for cell in [GridCell::new(0, 0), GridCell::new(8, 8), GridCell::new(15, 3)] {
            let placed = place_on_sphere(cell, spec(0.53), CAMERA);
            let up = placed.orientation * CANONICAL_UP;
            assert!(up.distance(placed.normal()) < EPSILON, "cell {cell}");
        }
    }

    #[test]
    fn test_forward_points_toward_reference_in_tangent_plane() {
        let placed = place_on_sphere(GridCell::new(8, 8), spec(1.0), CAMERA);
        let normal = placed.normal();
        let expected = (CAMERA - normal * CAMERA.dot(normal)).normalize();
        let forward = placed.orientation * CANONICAL_FORWARD;
        assert!(forward.distance(expected) < EPSILON);
        assert!(forward.dot(normal).abs() < EPSILON);
    }

    #[test]
    fn test_reference_along_normal_keeps_alignment_only() {
        let cell = GridCell::new(5, 2);
        let base = place_on_sphere(cell, spec(1.0), CAMERA);
        let overhead = place_on_sphere(cell, spec(1.0), base.normal() * 4.0);
        let alignment = Quat::from_rotation_arc(CANONICAL_UP, overhead.normal());
        assert!(overhead.orientation.angle_between(alignment) < EPSILON);
    }

    #[test]
    fn test_reversed_composition_tilts_the_marker() {
        let cell = GridCell::new(4, 6);
        let placed = place_on_sphere(cell, spec(1.0), CAMERA);
        let normal = placed.normal();
        let alignment = Quat::from_rotation_arc(CANONICAL_UP, normal);
        let heading = placed.orientation * alignment.inverse();

        let reversed = alignment * heading;
        let tilted_up = reversed * CANONICAL_UP;
        assert!(tilted_up.distance(normal) > 1e-2);
    }

    #[test]
    fn test_transform_lifts_along_normal() {
        let placed = place_on_sphere(GridCell::new(8, 8), spec(1.0), CAMERA);
        let transform = placed.transform(0.1);
        assert!((transform.translation.length() - 1.1).abs() < EPSILON);
        assert_eq!(transform.rotation, placed.orientation);
    }
}
