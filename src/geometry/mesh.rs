// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polygon mesh with material slots and a UV layer

use crate::error::{ExportError, ExportResult};
use nalgebra::{Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Material assigned to a slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Image names used by the material's texture nodes
    #[serde(default)]
    pub image_textures: Vec<String>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_textures: Vec::new(),
        }
    }

    pub fn with_texture(mut self, image: impl Into<String>) -> Self {
        self.image_textures.push(image.into());
        self
    }
}

/// Polygon face referencing vertex indices in winding order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<usize>,
    pub normal: Vector3<f64>,
    /// Material slot, `None` for an unassigned face
    pub material_index: Option<usize>,
}

impl Face {
    pub fn new(vertices: Vec<usize>, normal: Vector3<f64>) -> Self {
        Self {
            vertices,
            normal,
            material_index: None,
        }
    }

    pub fn with_material(mut self, index: usize) -> Self {
        self.material_index = Some(index);
        self
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Mean of the face's vertex positions in local space
    pub fn centroid(&self, positions: &[Point3<f64>]) -> Point3<f64> {
        if self.vertices.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, &i| acc + positions[i].coords);
        Point3::from(sum / self.vertices.len() as f64)
    }
}

/// UV coordinates keyed by (face, slot within face)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UvLayer {
    pub name: String,
    pub coords: Vec<Vec<Vector2<f64>>>,
}

impl UvLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coords: Vec::new(),
        }
    }

    pub fn get(&self, face: usize, slot: usize) -> Option<Vector2<f64>> {
        self.coords.get(face).and_then(|f| f.get(slot)).copied()
    }
}

/// Check that every face has at least 3 vertices and only references
/// existing positions
pub fn validate_faces(positions: &[Point3<f64>], faces: &[Face]) -> ExportResult<()> {
    let vertex_count = positions.len();
    for (face_index, face) in faces.iter().enumerate() {
        if face.vertices.len() < 3 {
            return Err(ExportError::invalid_input(format!(
                "face {} has {} vertices, at least 3 are required",
                face_index,
                face.vertices.len()
            )));
        }
        if let Some(&bad) = face.vertices.iter().find(|&&i| i >= vertex_count) {
            return Err(ExportError::invalid_input(format!(
                "face {face_index} references vertex {bad} but the mesh has {vertex_count} vertices"
            )));
        }
    }
    Ok(())
}

/// Polygon mesh in local space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Point3<f64>>,
    pub faces: Vec<Face>,
    pub uv_layer: Option<UvLayer>,
    pub materials: Vec<Option<Material>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex position and return its index
    pub fn add_position(&mut self, position: Point3<f64>) -> usize {
        let index = self.positions.len();
        self.positions.push(position);
        index
    }

    /// Add a face and return its index
    pub fn add_face(&mut self, face: Face) -> usize {
        let index = self.faces.len();
        self.faces.push(face);
        index
    }

    /// Add a material slot and return its index
    pub fn add_material(&mut self, material: Option<Material>) -> usize {
        let index = self.materials.len();
        self.materials.push(material);
        index
    }

    /// Set the UVs of `face`, creating the layer if the mesh has none
    pub fn set_face_uvs(&mut self, face: usize, uvs: Vec<Vector2<f64>>) {
        let layer = self.uv_layer.get_or_insert_with(|| UvLayer::new("UVMap"));
        if layer.coords.len() <= face {
            layer.coords.resize(face + 1, Vec::new());
        }
        layer.coords[face] = uvs;
    }

    pub fn validate(&self) -> ExportResult<()> {
        validate_faces(&self.positions, &self.faces)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Name of the material in `index`, if the slot exists and is filled
    pub fn material_name(&self, index: Option<usize>) -> Option<&str> {
        index
            .and_then(|i| self.materials.get(i))
            .and_then(|slot| slot.as_ref())
            .map(|m| m.name.as_str())
    }

    /// Newell normal of a face from its vertex positions
    pub fn face_normal(&self, face: &Face) -> Vector3<f64> {
        let mut normal = Vector3::zeros();
        let n = face.vertices.len();
        for i in 0..n {
            let a = self.positions[face.vertices[i]];
            let b = self.positions[face.vertices[(i + 1) % n]];
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        normal.try_normalize(1e-12).unwrap_or_else(Vector3::z)
    }

    pub fn is_triangulated(&self) -> bool {
        self.faces.iter().all(|f| f.vertices.len() == 3)
    }

    /// Fan-triangulate every face with more than 3 vertices.
    ///
    /// Normals, material slots and UVs are carried over to the new triangles.
    /// Returns the number of triangles added.
    pub fn triangulate(&mut self) -> usize {
        let old_faces = std::mem::take(&mut self.faces);
        let old_uvs = self.uv_layer.as_mut().map(|l| std::mem::take(&mut l.coords));
        let mut new_uvs = Vec::with_capacity(old_faces.len());
        let mut added = 0;

        for (face_index, face) in old_faces.into_iter().enumerate() {
            let uvs = old_uvs
                .as_ref()
                .and_then(|u| u.get(face_index))
                .cloned()
                .unwrap_or_default();

            if face.vertices.len() <= 3 {
                self.faces.push(face);
                new_uvs.push(uvs);
                continue;
            }

            for i in 1..face.vertices.len() - 1 {
                let corners = [0, i, i + 1];
                self.faces.push(Face {
                    vertices: corners.iter().map(|&c| face.vertices[c]).collect(),
                    normal: face.normal,
                    material_index: face.material_index,
                });
                let tri_uvs = if uvs.is_empty() {
                    Vec::new()
                } else {
                    corners
                        .iter()
                        .map(|&c| uvs.get(c).copied().unwrap_or_else(Vector2::zeros))
                        .collect()
                };
                new_uvs.push(tri_uvs);
            }
            added += face.vertices.len() - 3;
        }

        if let Some(layer) = self.uv_layer.as_mut() {
            layer.coords = new_uvs;
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_quad() -> Mesh {
        let mut mesh = Mesh::new();
        for p in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ] {
            mesh.add_position(p);
        }
        let slot = mesh.add_material(Some(Material::new("Floor")));
        let face = mesh.add_face(Face::new(vec![0, 1, 2, 3], Vector3::z()).with_material(slot));
        mesh.set_face_uvs(
            face,
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(1.0, 1.0),
                Vector2::new(0.0, 1.0),
            ],
        );
        mesh
    }

    #[test]
    fn test_centroid() {
        let mesh = unit_quad();
        let c = mesh.faces[0].centroid(&mesh.positions);
        assert_relative_eq!(c, Point3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_face_normal() {
        let mesh = unit_quad();
        assert_relative_eq!(mesh.face_normal(&mesh.faces[0]), Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_material_name() {
        let mut mesh = unit_quad();
        mesh.add_material(None);
        assert_eq!(mesh.material_name(Some(0)), Some("Floor"));
        assert_eq!(mesh.material_name(Some(1)), None);
        assert_eq!(mesh.material_name(Some(7)), None);
        assert_eq!(mesh.material_name(None), None);
    }

    #[test]
    fn test_validate() {
        let mut mesh = unit_quad();
        assert!(mesh.validate().is_ok());

        mesh.faces[0].vertices[3] = 9;
        assert!(matches!(mesh.validate(), Err(ExportError::InvalidInput(_))));

        mesh.faces[0].vertices = vec![0, 1];
        match mesh.validate() {
            Err(ExportError::InvalidInput(message)) => assert!(message.contains("at least 3")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_triangulate_quad() {
        let mut mesh = unit_quad();
        assert!(!mesh.is_triangulated());

        let added = mesh.triangulate();
        assert_eq!(added, 1);
        assert_eq!(mesh.face_count(), 2);
        assert!(mesh.is_triangulated());

        assert_eq!(mesh.faces[0].vertices, vec![0, 1, 2]);
        assert_eq!(mesh.faces[1].vertices, vec![0, 2, 3]);
        assert_eq!(mesh.faces[1].material_index, Some(0));

        let layer = mesh.uv_layer.as_ref().unwrap();
        assert_eq!(layer.get(1, 2), Some(Vector2::new(0.0, 1.0)));
    }

    #[test]
    fn test_triangulate_keeps_triangles() {
        let mut mesh = unit_quad();
        mesh.triangulate();
        let before = mesh.clone();
        assert_eq!(mesh.triangulate(), 0);
        assert_eq!(mesh, before);
    }
}
