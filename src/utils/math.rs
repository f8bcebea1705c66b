// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::{Point3, Vector3};

/// Mirror a direction across the YZ plane (source to target handedness)
pub fn flip_x(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(-v.x, v.y, v.z)
}

/// Mirror a position across the YZ plane
pub fn flip_point_x(p: &Point3<f64>) -> Point3<f64> {
    Point3::new(-p.x, p.y, p.z)
}

/// Unit vector perpendicular to `v`, picking the world axis least aligned with it
pub fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let abs = v.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    v.cross(&axis)
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::x)
}

/// Convert degrees to radians
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}
