// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene objects and the read-only mesh view consumed by the exporter

use super::{Face, Mesh, WorldTransform};
use nalgebra::{Point3, Vector2};
use serde::{Deserialize, Serialize};

/// Read-only access to a mesh placed in the world
pub trait MeshSource {
    /// Local-space vertex positions
    fn positions(&self) -> &[Point3<f64>];

    /// Faces in native order
    fn faces(&self) -> &[Face];

    /// UV of a face corner, `None` without a UV layer or entry
    fn uv(&self, face: usize, slot: usize) -> Option<Vector2<f64>>;

    /// Whether a UV layer exists at all
    fn has_uv_layer(&self) -> bool;

    /// Name of the material in a slot, `None` for empty or missing slots
    fn material_name(&self, index: Option<usize>) -> Option<&str>;

    fn world_transform(&self) -> &WorldTransform;
}

/// A mesh borrowed together with its world transform
#[derive(Debug, Clone, Copy)]
pub struct MeshInstance<'a> {
    pub mesh: &'a Mesh,
    pub transform: &'a WorldTransform,
}

impl<'a> MeshInstance<'a> {
    pub fn new(mesh: &'a Mesh, transform: &'a WorldTransform) -> Self {
        Self { mesh, transform }
    }
}

impl MeshSource for MeshInstance<'_> {
    fn positions(&self) -> &[Point3<f64>] {
        &self.mesh.positions
    }

    fn faces(&self) -> &[Face] {
        &self.mesh.faces
    }

    fn uv(&self, face: usize, slot: usize) -> Option<Vector2<f64>> {
        self.mesh.uv_layer.as_ref().and_then(|l| l.get(face, slot))
    }

    fn has_uv_layer(&self) -> bool {
        self.mesh.uv_layer.is_some()
    }

    fn material_name(&self, index: Option<usize>) -> Option<&str> {
        self.mesh.material_name(index)
    }

    fn world_transform(&self) -> &WorldTransform {
        self.transform
    }
}

/// Data carried by a scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectData {
    Mesh(Mesh),
    Empty,
    Camera,
    Light,
}

impl ObjectData {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mesh(_) => "mesh",
            Self::Empty => "empty",
            Self::Camera => "camera",
            Self::Light => "light",
        }
    }
}

/// Named object with a world transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub data: ObjectData,
    pub transform: WorldTransform,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, data: ObjectData, transform: WorldTransform) -> Self {
        Self {
            name: name.into(),
            data,
            transform,
        }
    }

    pub fn mesh(name: impl Into<String>, mesh: Mesh, transform: WorldTransform) -> Self {
        Self::new(name, ObjectData::Mesh(mesh), transform)
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// View this object through [`MeshSource`] if it is a mesh
    pub fn as_mesh_source(&self) -> Option<MeshInstance<'_>> {
        self.as_mesh().map(|mesh| MeshInstance::new(mesh, &self.transform))
    }
}

/// Collection of objects with an optional active object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub active: Option<String>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    pub fn active_object(&self) -> Option<&SceneObject> {
        self.active.as_deref().and_then(|name| self.object(name))
    }

    /// Object picked by `name`, falling back to the active object
    pub fn select(&self, name: Option<&str>) -> Option<&SceneObject> {
        match name {
            Some(name) => self.object(name),
            None => self.active_object(),
        }
    }
}
