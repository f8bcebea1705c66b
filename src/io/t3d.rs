// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! T3D brush document builder
//!
//! Owns the line grammar of a single `Brush` actor:
//!
//! ```text
//! Begin Actor Class=Brush Name=LevelGeometry
//!     CsgOper=CSG_Add
//!     Location=(X=.., Y=.., Z=..)
//!     Begin Brush Name=Model
//!        Begin PolyList
//!           Begin Polygon Texture=.. Flags=4194305
//!           ...
//!           End Polygon
//!        End PolyList
//!     End Brush
//! End Actor
//! ```

use super::format::{format_float6, format_point3, format_uv, format_vec3};
use nalgebra::{Point3, Vector2, Vector3};
use std::fmt::Write;

/// Polygon flag bitmask written on every polygon
pub const POLYGON_FLAGS: u32 = 4194305;
/// Texture name used for faces without a material
pub const NO_TEXTURE: &str = "None";

pub const ACTOR_NAME: &str = "LevelGeometry";
pub const BRUSH_NAME: &str = "Model";

/// Vertex of a polygon in output space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonVertex {
    pub position: Point3<f64>,
    pub uv: Vector2<f64>,
}

/// One textured polygon with its texture basis
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRecord {
    pub texture: String,
    pub flags: u32,
    pub origin: Point3<f64>,
    pub normal: Vector3<f64>,
    pub texture_u: Vector3<f64>,
    pub texture_v: Vector3<f64>,
    pub vertices: Vec<PolygonVertex>,
}

/// Incremental writer for one brush actor
pub struct T3dWriter {
    buf: String,
}

impl T3dWriter {
    /// Start the actor with the brush location already in target axes
    pub fn begin(location: &Vector3<f64>) -> Result<Self, std::fmt::Error> {
        let mut buf = String::new();
        writeln!(buf, "Begin Actor Class=Brush Name={ACTOR_NAME}")?;
        writeln!(buf, "    CsgOper=CSG_Add")?;
        writeln!(
            buf,
            "    Location=(X={}, Y={}, Z={})",
            format_float6(location.x),
            format_float6(location.y),
            format_float6(location.z)
        )?;
        writeln!(buf, "    Begin Brush Name={BRUSH_NAME}")?;
        writeln!(buf, "       Begin PolyList")?;
        Ok(Self { buf })
    }

    /// Append one `Polygon` block
    pub fn polygon(&mut self, poly: &PolygonRecord) -> std::fmt::Result {
        let buf = &mut self.buf;
        writeln!(
            buf,
            "          Begin Polygon Texture={} Flags={}",
            poly.texture, poly.flags
        )?;
        writeln!(buf, "             Origin   {}", format_point3(&poly.origin))?;
        writeln!(buf, "             Normal   {}", format_vec3(&poly.normal))?;
        writeln!(buf, "             TextureU {}", format_vec3(&poly.texture_u))?;
        writeln!(buf, "             TextureV {}", format_vec3(&poly.texture_v))?;
        for vertex in &poly.vertices {
            writeln!(
                buf,
                "             Vertex   {}   UV {}",
                format_point3(&vertex.position),
                format_uv(&vertex.uv)
            )?;
        }
        writeln!(buf, "          End Polygon")
    }

    /// Close all open blocks and return the document
    pub fn finish(mut self) -> Result<String, std::fmt::Error> {
        writeln!(self.buf, "       End PolyList")?;
        writeln!(self.buf, "    End Brush")?;
        write!(self.buf, "End Actor")?;
        Ok(self.buf)
    }
}
