// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene loading and saving (JSON scene descriptions and Wavefront OBJ)

use crate::error::{ExportError, ExportResult};
use crate::geometry::{
    Face, Material, Mesh, ObjectData, Scene, SceneObject, UvLayer, WorldTransform,
};
use nalgebra::{Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Supported scene file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Json,
    Obj,
}

impl SceneFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "json" => Some(SceneFormat::Json),
                "obj" => Some(SceneFormat::Obj),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SceneFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active: Option<String>,
    #[serde(default)]
    objects: Vec<ObjectDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ObjectKind {
    #[default]
    Mesh,
    Empty,
    Camera,
    Light,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObjectDef {
    name: String,
    #[serde(rename = "type", default)]
    kind: ObjectKind,
    #[serde(default)]
    transform: TransformDef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    materials: Vec<Option<MaterialDef>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    vertices: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    faces: Vec<FaceDef>,
    /// Name of the UV layer; a layer also exists when any face carries `uv`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uv_layer: Option<String>,
}

/// Rotation is XYZ Euler in degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct TransformDef {
    location: [f64; 3],
    rotation: [f64; 3],
    scale: [f64; 3],
}

impl Default for TransformDef {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MaterialDef {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    textures: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FaceDef {
    vertices: Vec<usize>,
    /// Computed from the vertices when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    normal: Option<[f64; 3]>,
    /// Material slot, -1 for none
    #[serde(default = "no_material")]
    material: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uv: Option<Vec<[f64; 2]>>,
}

fn no_material() -> i64 {
    -1
}

/// Load a scene, auto-detecting the format from the extension
pub fn load_scene(path: impl AsRef<Path>) -> ExportResult<Scene> {
    let path = path.as_ref();
    let format = SceneFormat::from_path(path).ok_or_else(|| ExportError::Parse {
        path: path.to_path_buf(),
        details: "unsupported scene format, expected .json or .obj".to_string(),
    })?;

    info!("Loading scene from {:?} (format: {:?})", path, format);

    let scene = match format {
        SceneFormat::Json => {
            let content = std::fs::read_to_string(path).map_err(|source| ExportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_scene_json(&content).map_err(|e| match e {
                ExportError::Parse { details, .. } => ExportError::Parse {
                    path: path.to_path_buf(),
                    details,
                },
                other => other,
            })?
        }
        SceneFormat::Obj => load_obj(path)?,
    };

    debug!(
        "Loaded {} objects, active: {:?}",
        scene.objects.len(),
        scene.active
    );
    Ok(scene)
}

/// Parse a JSON scene description
pub fn parse_scene_json(content: &str) -> ExportResult<Scene> {
    let file: SceneFile = serde_json::from_str(content).map_err(|e| ExportError::Parse {
        path: "<json>".into(),
        details: e.to_string(),
    })?;

    let mut scene = Scene::new();
    for def in file.objects {
        scene.add_object(object_from_def(def)?);
    }
    scene.active = file.active;
    Ok(scene)
}

/// Write a scene as a JSON scene description
pub fn save_scene(scene: &Scene, path: impl AsRef<Path>) -> ExportResult<()> {
    let path = path.as_ref();
    let json = scene_to_json(scene)?;
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a scene to pretty-printed JSON
pub fn scene_to_json(scene: &Scene) -> ExportResult<String> {
    let file = SceneFile {
        active: scene.active.clone(),
        objects: scene.objects.iter().map(object_to_def).collect(),
    };
    serde_json::to_string_pretty(&file).map_err(|e| ExportError::Parse {
        path: "<json>".into(),
        details: e.to_string(),
    })
}

fn object_from_def(def: ObjectDef) -> ExportResult<SceneObject> {
    let transform = WorldTransform::from_euler_degrees(
        Vector3::from(def.transform.location),
        Vector3::from(def.transform.rotation),
        Vector3::from(def.transform.scale),
    );

    let data = match def.kind {
        ObjectKind::Empty => ObjectData::Empty,
        ObjectKind::Camera => ObjectData::Camera,
        ObjectKind::Light => ObjectData::Light,
        ObjectKind::Mesh => ObjectData::Mesh(mesh_from_def(&def)?),
    };

    Ok(SceneObject::new(def.name, data, transform))
}

fn mesh_from_def(def: &ObjectDef) -> ExportResult<Mesh> {
    let mut mesh = Mesh::new();
    mesh.positions = def.vertices.iter().map(|&p| Point3::from(p)).collect();
    mesh.materials = def
        .materials
        .iter()
        .map(|slot| {
            slot.as_ref().map(|m| Material {
                name: m.name.clone(),
                image_textures: m.textures.clone(),
            })
        })
        .collect();

    let has_uvs = def.uv_layer.is_some() || def.faces.iter().any(|f| f.uv.is_some());
    if has_uvs {
        let name = def.uv_layer.clone().unwrap_or_else(|| "UVMap".to_string());
        mesh.uv_layer = Some(UvLayer::new(name));
    }

    for (face_index, face_def) in def.faces.iter().enumerate() {
        let mut face = Face::new(face_def.vertices.clone(), Vector3::z());
        face.material_index = usize::try_from(face_def.material).ok();
        mesh.add_face(face);

        if has_uvs {
            let uvs = face_def
                .uv
                .iter()
                .flatten()
                .map(|&uv| Vector2::from(uv))
                .collect();
            mesh.set_face_uvs(face_index, uvs);
        }
    }

    mesh.validate().map_err(|e| ExportError::Parse {
        path: "<json>".into(),
        details: format!("object '{}': {}", def.name, e),
    })?;

    // Authored normals are normalized; zero, non-finite or absent ones are
    // recomputed from the face's positions.
    let normals: Vec<Vector3<f64>> = mesh
        .faces
        .iter()
        .zip(&def.faces)
        .map(|(face, face_def)| {
            face_def
                .normal
                .map(Vector3::from)
                .filter(|n| n.iter().all(|c| c.is_finite()))
                .and_then(|n| n.try_normalize(1e-12))
                .unwrap_or_else(|| mesh.face_normal(face))
        })
        .collect();
    for (face, normal) in mesh.faces.iter_mut().zip(normals) {
        face.normal = normal;
    }

    Ok(mesh)
}

fn object_to_def(object: &SceneObject) -> ObjectDef {
    let transform = TransformDef {
        location: object.transform.location.into(),
        rotation: object.transform.euler_degrees().into(),
        scale: object.transform.scale.into(),
    };

    let mut def = ObjectDef {
        name: object.name.clone(),
        kind: ObjectKind::Mesh,
        transform,
        materials: Vec::new(),
        vertices: Vec::new(),
        faces: Vec::new(),
        uv_layer: None,
    };

    match &object.data {
        ObjectData::Empty => def.kind = ObjectKind::Empty,
        ObjectData::Camera => def.kind = ObjectKind::Camera,
        ObjectData::Light => def.kind = ObjectKind::Light,
        ObjectData::Mesh(mesh) => {
            def.materials = mesh
                .materials
                .iter()
                .map(|slot| {
                    slot.as_ref().map(|m| MaterialDef {
                        name: m.name.clone(),
                        textures: m.image_textures.clone(),
                    })
                })
                .collect();
            def.vertices = mesh.positions.iter().map(|p| p.coords.into()).collect();
            def.uv_layer = mesh.uv_layer.as_ref().map(|l| l.name.clone());
            def.faces = mesh
                .faces
                .iter()
                .enumerate()
                .map(|(face_index, face)| FaceDef {
                    vertices: face.vertices.clone(),
                    normal: Some(face.normal.into()),
                    material: face.material_index.map_or(-1, |i| i as i64),
                    uv: mesh
                        .uv_layer
                        .as_ref()
                        .and_then(|l| l.coords.get(face_index))
                        .filter(|uvs| !uvs.is_empty())
                        .map(|uvs| uvs.iter().map(|&uv| uv.into()).collect()),
                })
                .collect();
        }
    }

    def
}

/// Load a Wavefront OBJ as a single active mesh object.
///
/// Polygons are kept as authored, `usemtl` assigns material slots and
/// `map_Kd` becomes the slot's image texture.
pub fn load_obj(path: &Path) -> ExportResult<Scene> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: false,
            ..Default::default()
        },
    )
    .map_err(|e| ExportError::Parse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    let materials = materials.unwrap_or_else(|e| {
        warn!("Could not load materials for {:?}: {}", path, e);
        Vec::new()
    });

    let mut mesh = Mesh::new();
    for material in &materials {
        mesh.add_material(Some(Material {
            name: material.name.clone(),
            image_textures: material.diffuse_texture.iter().cloned().collect(),
        }));
    }

    for model in &models {
        let data = &model.mesh;
        let base = mesh.positions.len();
        for p in data.positions.chunks_exact(3) {
            mesh.add_position(Point3::new(p[0] as f64, p[1] as f64, p[2] as f64));
        }

        let arities: Vec<usize> = if data.face_arities.is_empty() {
            vec![3; data.indices.len() / 3]
        } else {
            data.face_arities.iter().map(|&a| a as usize).collect()
        };

        let mut cursor = 0;
        for arity in arities {
            let indices = data
                .indices
                .get(cursor..cursor + arity)
                .ok_or_else(|| ExportError::Parse {
                    path: path.to_path_buf(),
                    details: format!("model '{}' has truncated face indices", model.name),
                })?;
            cursor += arity;

            let mut face = Face::new(indices.iter().map(|&i| base + i as usize).collect(), Vector3::z());
            face.normal = mesh.face_normal(&face);
            face.material_index = data.material_id;
            let face_index = mesh.add_face(face);

            if !data.texcoords.is_empty() {
                let uvs = indices
                    .iter()
                    .map(|&i| {
                        let i = i as usize;
                        match data.texcoords.get(2 * i..2 * i + 2) {
                            Some(uv) => Vector2::new(uv[0] as f64, uv[1] as f64),
                            None => Vector2::zeros(),
                        }
                    })
                    .collect();
                mesh.set_face_uvs(face_index, uvs);
            }
        }
    }

    info!(
        "Loaded OBJ: {} vertices, {} faces, {} materials",
        mesh.vertex_count(),
        mesh.face_count(),
        mesh.materials.len()
    );

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Mesh")
        .to_string();
    let mut scene = Scene::new();
    scene.add_object(SceneObject::mesh(name.clone(), mesh, WorldTransform::identity()));
    scene.active = Some(name);
    Ok(scene)
}
