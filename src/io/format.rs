// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Fixed-point number formatting for T3D text
//!
//! The importer expects vector components as `+00001.234500`: explicit sign,
//! zero padded to 13 characters, 6 fractional digits. Scalars outside vectors
//! (brush location, UVs) use plain 6-digit fixed point.

use nalgebra::{Point3, Vector2, Vector3};

/// Total field width of a vector component, sign included
pub const COMPONENT_WIDTH: usize = 13;

/// One vector component, e.g. `+00001.500000`
pub fn format_component(value: f64) -> String {
    format!("{:+013.6}", value)
}

/// Three comma-joined components
pub fn format_vec3(v: &Vector3<f64>) -> String {
    format!(
        "{},{},{}",
        format_component(v.x),
        format_component(v.y),
        format_component(v.z)
    )
}

pub fn format_point3(p: &Point3<f64>) -> String {
    format_vec3(&p.coords)
}

/// Plain fixed point, e.g. `-12.000000`
pub fn format_float6(value: f64) -> String {
    format!("{:.6}", value)
}

/// `u,v` pair in plain fixed point
pub fn format_uv(uv: &Vector2<f64>) -> String {
    format!("{},{}", format_float6(uv.x), format_float6(uv.y))
}
