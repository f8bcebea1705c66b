// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh to T3D brush exporter
//!
//! Walks the faces of a mesh once, in native order, and emits one textured
//! polygon per face. Per-polygon geometry is mirrored on X, while the brush
//! location swaps Y and Z and negates the new Z. Both remaps are what the
//! target importer accepts and must stay as they are.

use super::sink::Sink;
use super::t3d::{PolygonRecord, PolygonVertex, T3dWriter, NO_TEXTURE, POLYGON_FLAGS};
use crate::config::ExportSettings;
use crate::error::{ExportError, ExportResult};
use crate::geometry::{validate_faces, Face, MeshSource, SceneObject};
use crate::utils::math::{any_perpendicular, flip_point_x, flip_x};
use nalgebra::{Point3, Vector2, Vector3};
use tracing::{debug, info, warn};

const DEGENERATE_EPSILON: f64 = 1e-12;

/// Converts meshes into T3D brush documents
#[derive(Debug, Clone, Default)]
pub struct GeometryExporter {
    settings: ExportSettings,
}

impl GeometryExporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Export the object if it is a mesh.
    ///
    /// Fails with [`ExportError::InvalidInput`] when no object is given or the
    /// object holds something other than a mesh.
    pub fn export_object(&self, object: Option<&SceneObject>) -> ExportResult<String> {
        let object =
            object.ok_or_else(|| ExportError::invalid_input("No active mesh object is selected"))?;
        let source = object.as_mesh_source().ok_or_else(|| {
            ExportError::invalid_input(format!(
                "Object '{}' is a {}, not a mesh",
                object.name,
                object.data.kind()
            ))
        })?;
        self.export(&source)
    }

    /// Build the complete document for a mesh source
    pub fn export<S: MeshSource + ?Sized>(&self, source: &S) -> ExportResult<String> {
        let polygons = self.polygons(source)?;

        let location = brush_location(&source.world_transform().location, self.settings.scale);
        let mut writer = T3dWriter::begin(&location)?;
        for polygon in &polygons {
            writer.polygon(polygon)?;
        }
        Ok(writer.finish()?)
    }

    /// Export and hand the finished document to `sink`
    pub fn export_to<S, K>(&self, source: &S, sink: &mut K) -> ExportResult<()>
    where
        S: MeshSource + ?Sized,
        K: Sink + ?Sized,
    {
        let document = self.export(source)?;
        sink.write(&document)
    }

    /// Derive one polygon record per face, in face order
    pub fn polygons<S: MeshSource + ?Sized>(&self, source: &S) -> ExportResult<Vec<PolygonRecord>> {
        self.settings.validate()?;
        validate_faces(source.positions(), source.faces())?;

        let transform = source.world_transform();
        let scale = self.settings.scale;

        info!(
            "Exporting {} faces ({} vertices) at scale {}",
            source.faces().len(),
            source.positions().len(),
            scale
        );
        if !transform.has_uniform_scale() {
            warn!(
                "World transform has non-uniform scale {:?}; normals are only rotated",
                transform.scale
            );
        }

        let mut missing_uvs = 0;
        let polygons = source
            .faces()
            .iter()
            .enumerate()
            .map(|(face_index, face)| {
                let record = polygon_record(source, face_index, face, scale, &mut missing_uvs);
                debug!(
                    "Polygon {}: texture={} vertices={}",
                    face_index,
                    record.texture,
                    record.vertices.len()
                );
                record
            })
            .collect();

        if missing_uvs > 0 {
            warn!("{} face corners have no UV entry, exported as (0, 0)", missing_uvs);
        }

        Ok(polygons)
    }
}

/// Export with the given settings in one call
pub fn export_t3d(object: Option<&SceneObject>, settings: &ExportSettings) -> ExportResult<String> {
    GeometryExporter::new(*settings).export_object(object)
}

/// Brush location in target axes: `(x, z, -y)`, scaled
pub fn brush_location(location: &Vector3<f64>, scale: f64) -> Vector3<f64> {
    Vector3::new(location.x * scale, location.z * scale, -location.y * scale)
}

fn polygon_record<S: MeshSource + ?Sized>(
    source: &S,
    face_index: usize,
    face: &Face,
    scale: f64,
    missing_uvs: &mut usize,
) -> PolygonRecord {
    let transform = source.world_transform();
    let positions = source.positions();

    let texture = source
        .material_name(face.material_index)
        .filter(|name| !name.is_empty())
        .unwrap_or(NO_TEXTURE)
        .to_string();

    let vertices: Vec<Point3<f64>> = face
        .vertices
        .iter()
        .map(|&i| flip_point_x(&transform.transform_point(&positions[i])))
        .collect();

    let origin = flip_point_x(&transform.transform_point(&face.centroid(positions)));
    let normal = flip_x(&transform.rotate_vector(&face.normal));

    // U comes from the local normal and the first edge of the mirrored world
    // vertices, then goes through the same rotate-and-mirror as the normal.
    let edge = vertices[1] - vertices[0];
    let texture_u = flip_x(&transform.rotate_vector(&texture_u_axis(&face.normal, &edge, face_index)));
    let texture_v = normal.cross(&texture_u);

    let has_layer = source.has_uv_layer();
    let vertices = vertices
        .iter()
        .enumerate()
        .map(|(slot, position)| {
            let uv = source.uv(face_index, slot).unwrap_or_else(|| {
                if has_layer {
                    *missing_uvs += 1;
                }
                Vector2::zeros()
            });
            PolygonVertex {
                position: *position * scale,
                uv: uv * scale,
            }
        })
        .collect();

    PolygonRecord {
        texture,
        flags: POLYGON_FLAGS,
        origin,
        normal,
        texture_u,
        texture_v,
        vertices,
    }
}

/// `normalize(normal x edge)`, or any axis perpendicular to the normal when
/// the edge is parallel to it
fn texture_u_axis(normal: &Vector3<f64>, edge: &Vector3<f64>, face_index: usize) -> Vector3<f64> {
    normal
        .cross(edge)
        .try_normalize(DEGENERATE_EPSILON)
        .unwrap_or_else(|| {
            warn!("Face {} has a degenerate texture basis", face_index);
            any_perpendicular(normal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Material, Mesh, ObjectData, Primitive, WorldTransform};
    use approx::assert_relative_eq;

    fn single_triangle(material: Option<&str>) -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_position(Point3::new(0.0, 0.0, 0.0));
        mesh.add_position(Point3::new(1.0, 0.0, 0.0));
        mesh.add_position(Point3::new(0.0, 1.0, 0.0));
        let mut face = Face::new(vec![0, 1, 2], Vector3::z());
        if let Some(name) = material {
            face = face.with_material(mesh.add_material(Some(Material::new(name))));
        }
        mesh.add_face(face);
        mesh
    }

    fn exporter(scale: f64) -> GeometryExporter {
        GeometryExporter::new(ExportSettings::with_scale(scale))
    }

    #[test]
    fn test_no_object_is_invalid_input() {
        let result = exporter(1.0).export_object(None);
        assert!(matches!(result, Err(ExportError::InvalidInput(_))));
    }

    #[test]
    fn test_non_mesh_is_invalid_input() {
        let camera = SceneObject::new("Camera", ObjectData::Camera, WorldTransform::identity());
        let result = exporter(1.0).export_object(Some(&camera));
        match result {
            Err(ExportError::InvalidInput(message)) => assert!(message.contains("camera")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mesh = single_triangle(None);
        let transform = WorldTransform::identity();
        let exporter = GeometryExporter::new(ExportSettings { scale: 0.0 });
        let result = exporter.export(&crate::geometry::MeshInstance::new(&mesh, &transform));
        assert!(matches!(result, Err(ExportError::InvalidSettings(_))));
    }

    #[test]
    fn test_single_triangle_basis() -> ExportResult<()> {
        let mesh = single_triangle(Some("Wall"));
        let object = SceneObject::mesh("Tri", mesh, WorldTransform::identity());
        let source = object.as_mesh_source().unwrap();

        let polygons = exporter(1.0).polygons(&source)?;
        assert_eq!(polygons.len(), 1);

        let poly = &polygons[0];
        assert_eq!(poly.texture, "Wall");
        assert_eq!(poly.flags, 4194305);
        assert_relative_eq!(poly.origin, Point3::new(-1.0 / 3.0, 1.0 / 3.0, 0.0));
        assert_relative_eq!(poly.normal, Vector3::new(0.0, 0.0, 1.0));
        // edge (-1, 0, 0) after the mirror, z x edge = (0, -1, 0)
        assert_relative_eq!(poly.texture_u, Vector3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(poly.texture_v, Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(poly.vertices[1].position, Point3::new(-1.0, 0.0, 0.0));
        Ok(())
    }

    #[test]
    fn test_basis_is_orthonormal_under_rotation() -> ExportResult<()> {
        let transform = WorldTransform::from_euler_degrees(
            Vector3::new(3.0, -1.0, 2.0),
            Vector3::new(25.0, -40.0, 110.0),
            Vector3::repeat(1.5),
        );
        let object = SceneObject::mesh("Cube", Primitive::cube(4.0).to_mesh(), transform);
        let source = object.as_mesh_source().unwrap();

        for poly in exporter(10.0).polygons(&source)? {
            assert_relative_eq!(poly.normal.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(poly.texture_u.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(poly.texture_v.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(poly.normal.dot(&poly.texture_u), 0.0, epsilon = 1e-9);
            assert_relative_eq!(poly.texture_v.dot(&poly.normal), 0.0, epsilon = 1e-9);
            assert_relative_eq!(poly.texture_v.dot(&poly.texture_u), 0.0, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_degenerate_edge_falls_back() {
        let u = texture_u_axis(&Vector3::z(), &Vector3::new(0.0, 0.0, 2.0), 0);
        assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(u.dot(&Vector3::z()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_origin_and_normals_ignore_export_scale() -> ExportResult<()> {
        let object = SceneObject::mesh("Tri", single_triangle(None), WorldTransform::identity());
        let source = object.as_mesh_source().unwrap();

        let small = exporter(1.0).polygons(&source)?;
        let large = exporter(8.0).polygons(&source)?;
        assert_eq!(small[0].origin, large[0].origin);
        assert_eq!(small[0].normal, large[0].normal);
        assert_eq!(small[0].texture_u, large[0].texture_u);
        Ok(())
    }

    #[test]
    fn test_brush_location_remap() {
        let location = brush_location(&Vector3::new(1.0, 2.0, 3.0), 10.0);
        assert_eq!(location, Vector3::new(10.0, 30.0, -20.0));
    }

    #[test]
    fn test_missing_material_slot_is_none() -> ExportResult<()> {
        let mut mesh = single_triangle(None);
        mesh.faces[0].material_index = Some(4);
        let object = SceneObject::mesh("Tri", mesh, WorldTransform::identity());
        let polygons = exporter(1.0).polygons(&object.as_mesh_source().unwrap())?;
        assert_eq!(polygons[0].texture, "None");
        Ok(())
    }

    #[test]
    fn test_missing_uv_entries_export_as_zero() -> ExportResult<()> {
        let mut mesh = single_triangle(None);
        mesh.add_face(Face::new(vec![0, 2, 1], -Vector3::z()));
        // only the second face has UVs, the first gets an empty entry
        mesh.set_face_uvs(
            1,
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(0.0, 0.5),
                Vector2::new(0.5, 0.0),
            ],
        );
        let object = SceneObject::mesh("Tri", mesh, WorldTransform::identity());
        let source = object.as_mesh_source().unwrap();

        let polygons = exporter(2.0).polygons(&source)?;
        assert!(polygons[0].vertices.iter().all(|v| v.uv == Vector2::zeros()));
        assert_eq!(polygons[1].vertices[1].uv, Vector2::new(0.0, 1.0));
        assert_eq!(polygons[1].vertices[2].uv, Vector2::new(1.0, 0.0));

        let document = exporter(2.0).export(&source)?;
        let polygon_blocks: Vec<&str> = document.split("Begin Polygon").skip(1).collect();
        assert_eq!(polygon_blocks[0].matches("UV 0.000000,0.000000").count(), 3);
        assert!(polygon_blocks[1].contains("UV 0.000000,1.000000"));
        assert!(polygon_blocks[1].contains("UV 1.000000,0.000000"));
        Ok(())
    }

    #[test]
    fn test_export_to_sink() -> ExportResult<()> {
        let object = SceneObject::mesh("Tri", single_triangle(Some("Wall")), WorldTransform::identity());
        let mut sink = crate::io::StringSink::new();
        exporter(1.0).export_to(&object.as_mesh_source().unwrap(), &mut sink)?;
        let document = sink.contents.unwrap();
        assert!(document.starts_with("Begin Actor Class=Brush Name=LevelGeometry"));
        assert!(document.ends_with("End Actor"));
        Ok(())
    }
}
