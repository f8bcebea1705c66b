// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Built-in meshes for quick exports and tests

use super::{Face, Material, Mesh};
use nalgebra::{Point3, Vector2, Vector3};

/// Name of the material slot every primitive carries
pub const DEFAULT_MATERIAL: &str = "Default";

/// Geometric primitives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Right triangle in the XY plane with legs of `size`
    Triangle { size: f64 },
    /// Single untriangulated square in the XY plane
    Quad { size: f64 },
    /// Centered cube built from 12 triangles
    Cube { size: f64 },
}

impl Primitive {
    pub fn triangle(size: f64) -> Self {
        Self::Triangle { size }
    }

    pub fn quad(size: f64) -> Self {
        Self::Quad { size }
    }

    pub fn cube(size: f64) -> Self {
        Self::Cube { size }
    }

    pub fn from_name(name: &str, size: f64) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "triangle" | "tri" => Some(Self::triangle(size)),
            "quad" | "plane" => Some(Self::quad(size)),
            "cube" | "box" => Some(Self::cube(size)),
            _ => None,
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        match *self {
            Self::Triangle { size } => generate_planar_mesh(
                &[
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(size, 0.0, 0.0),
                    Point3::new(0.0, size, 0.0),
                ],
                size,
            ),
            Self::Quad { size } => generate_planar_mesh(
                &[
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(size, 0.0, 0.0),
                    Point3::new(size, size, 0.0),
                    Point3::new(0.0, size, 0.0),
                ],
                size,
            ),
            Self::Cube { size } => generate_cube_mesh(size),
        }
    }
}

fn generate_planar_mesh(corners: &[Point3<f64>], size: f64) -> Mesh {
    let mut mesh = Mesh::new();
    let slot = mesh.add_material(Some(Material::new(DEFAULT_MATERIAL)));

    let indices: Vec<usize> = corners.iter().map(|&p| mesh.add_position(p)).collect();
    let face = mesh.add_face(Face::new(indices, Vector3::z()).with_material(slot));

    let uvs = corners
        .iter()
        .map(|p| Vector2::new(p.x / size, p.y / size))
        .collect();
    mesh.set_face_uvs(face, uvs);

    mesh
}

fn generate_cube_mesh(size: f64) -> Mesh {
    let mut mesh = Mesh::new();
    let slot = mesh.add_material(Some(Material::new(DEFAULT_MATERIAL)));
    let h = size / 2.0;

    // 8 vertices of the cube
    for p in [
        Point3::new(-h, -h, -h),
        Point3::new(h, -h, -h),
        Point3::new(h, h, -h),
        Point3::new(-h, h, -h),
        Point3::new(-h, -h, h),
        Point3::new(h, -h, h),
        Point3::new(h, h, h),
        Point3::new(-h, h, h),
    ] {
        mesh.add_position(p);
    }

    // 6 sides, two triangles each
    let faces = [
        // Top (z+)
        ([4, 5, 6], Vector3::new(0.0, 0.0, 1.0)),
        ([4, 6, 7], Vector3::new(0.0, 0.0, 1.0)),
        // Bottom (z-)
        ([1, 0, 3], Vector3::new(0.0, 0.0, -1.0)),
        ([1, 3, 2], Vector3::new(0.0, 0.0, -1.0)),
        // Right (x+)
        ([5, 1, 2], Vector3::new(1.0, 0.0, 0.0)),
        ([5, 2, 6], Vector3::new(1.0, 0.0, 0.0)),
        // Left (x-)
        ([0, 4, 7], Vector3::new(-1.0, 0.0, 0.0)),
        ([0, 7, 3], Vector3::new(-1.0, 0.0, 0.0)),
        // Back (y+)
        ([7, 6, 2], Vector3::new(0.0, 1.0, 0.0)),
        ([7, 2, 3], Vector3::new(0.0, 1.0, 0.0)),
        // Front (y-)
        ([0, 1, 5], Vector3::new(0.0, -1.0, 0.0)),
        ([0, 5, 4], Vector3::new(0.0, -1.0, 0.0)),
    ];

    for (indices, normal) in faces {
        let uvs = indices
            .iter()
            .map(|&i| project_uv(&mesh.positions[i], &normal, h, size))
            .collect();
        let face = mesh.add_face(Face::new(indices.to_vec(), normal).with_material(slot));
        mesh.set_face_uvs(face, uvs);
    }

    mesh
}

/// Planar projection of a cube corner onto the side facing `normal`
fn project_uv(p: &Point3<f64>, normal: &Vector3<f64>, h: f64, size: f64) -> Vector2<f64> {
    let (u, v) = if normal.z.abs() > 0.5 {
        (p.x, p.y)
    } else if normal.x.abs() > 0.5 {
        (p.y, p.z)
    } else {
        (p.x, p.z)
    };
    Vector2::new((u + h) / size, (v + h) / size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle() {
        let mesh = Primitive::triangle(1.0).to_mesh();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert!(mesh.is_triangulated());
    }

    #[test]
    fn test_quad_is_not_triangulated() {
        let mesh = Primitive::quad(2.0).to_mesh();
        assert_eq!(mesh.faces[0].vertices.len(), 4);
        assert_eq!(
            mesh.uv_layer.as_ref().unwrap().get(0, 2),
            Some(Vector2::new(1.0, 1.0))
        );
    }

    #[test]
    fn test_cube_normals_match_winding() {
        let mesh = Primitive::cube(10.0).to_mesh();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        for face in &mesh.faces {
            let computed = mesh.face_normal(face);
            assert!((computed - face.normal).norm() < 1e-9);
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Primitive::from_name("Cube", 1.0), Some(Primitive::cube(1.0)));
        assert_eq!(Primitive::from_name("plane", 1.0), Some(Primitive::quad(1.0)));
        assert!(Primitive::from_name("sphere", 1.0).is_none());
    }
}
