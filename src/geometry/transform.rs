// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Object world transform

use crate::utils::math::deg_to_rad;
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Location, rotation and per-axis scale of a scene object.
///
/// Applied in the order scale -> rotate -> translate, matching a TRS world matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldTransform {
    pub location: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl WorldTransform {
    pub fn new(location: Vector3<f64>, rotation: UnitQuaternion<f64>, scale: Vector3<f64>) -> Self {
        Self {
            location,
            rotation,
            scale,
        }
    }

    pub fn identity() -> Self {
        Self {
            location: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_location(location: Vector3<f64>) -> Self {
        Self {
            location,
            ..Self::identity()
        }
    }

    /// Build from XYZ Euler angles in degrees (X applied first, then Y, then Z)
    pub fn from_euler_degrees(
        location: Vector3<f64>,
        rotation_deg: Vector3<f64>,
        scale: Vector3<f64>,
    ) -> Self {
        let rotation = UnitQuaternion::from_euler_angles(
            deg_to_rad(rotation_deg.x),
            deg_to_rad(rotation_deg.y),
            deg_to_rad(rotation_deg.z),
        );
        Self::new(location, rotation, scale)
    }

    /// Rotation angles in degrees, inverse of [`WorldTransform::from_euler_degrees`]
    pub fn euler_degrees(&self) -> Vector3<f64> {
        let (roll, pitch, yaw) = self.rotation.euler_angles();
        Vector3::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
    }

    /// Full world matrix
    pub fn matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.location)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Map a local-space point to world space
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let scaled = point.coords.component_mul(&self.scale);
        Point3::from(self.rotation * scaled + self.location)
    }

    /// Rotate a direction by the rotation component only.
    ///
    /// Scale is ignored, so unit vectors stay unit length.
    pub fn rotate_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }

    pub fn has_uniform_scale(&self) -> bool {
        let s = self.scale;
        (s.x - s.y).abs() < 1e-9 && (s.y - s.z).abs() < 1e-9
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity() {
        let t = WorldTransform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(t.transform_point(&p), p);
        assert_eq!(t.matrix(), Matrix4::identity());
    }

    #[test]
    fn test_point_matches_matrix() {
        let t = WorldTransform::from_euler_degrees(
            Vector3::new(1.0, -2.0, 0.5),
            Vector3::new(30.0, 45.0, 60.0),
            Vector3::new(2.0, 1.0, 0.5),
        );
        let p = Point3::new(0.3, 0.7, -1.1);
        let by_matrix = t.matrix().transform_point(&p);
        assert_relative_eq!(t.transform_point(&p), by_matrix, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_vector_ignores_scale_and_location() {
        let t = WorldTransform::from_euler_degrees(
            Vector3::new(5.0, 5.0, 5.0),
            Vector3::new(0.0, 0.0, 90.0),
            Vector3::new(3.0, 3.0, 3.0),
        );
        let v = t.rotate_vector(&Vector3::x());
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_euler_round_trip() {
        let angles = Vector3::new(10.0, 20.0, 30.0);
        let t = WorldTransform::from_euler_degrees(Vector3::zeros(), angles, Vector3::repeat(1.0));
        assert_relative_eq!(t.euler_degrees(), angles, epsilon = 1e-9);
    }

    #[test]
    fn test_uniform_scale() {
        assert!(WorldTransform::identity().has_uniform_scale());
        let t = WorldTransform::new(
            Vector3::zeros(),
            UnitQuaternion::identity(),
            Vector3::new(1.0, 2.0, 1.0),
        );
        assert!(!t.has_uniform_scale());
    }
}
