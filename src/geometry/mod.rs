// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation, transforms and scene objects

mod mesh;
mod object;
mod primitives;
mod transform;

pub use mesh::{validate_faces, Face, Material, Mesh, UvLayer};
pub use object::{MeshInstance, MeshSource, ObjectData, Scene, SceneObject};
pub use primitives::{Primitive, DEFAULT_MATERIAL};
pub use transform::WorldTransform;
