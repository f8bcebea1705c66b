// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! T3D brush exporter
//!
//! Converts triangulated meshes into Unreal-style T3D brush actors: one
//! `Brush` with one textured polygon per face, including the texture basis
//! (origin, normal, U and V axes) the engine needs to map materials.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod materials;
pub mod utils;

pub use config::ExportSettings;
pub use error::{ExportError, ExportResult};
pub use geometry::{Face, Material, Mesh, MeshSource, Primitive, Scene, SceneObject, WorldTransform};
pub use io::{export_t3d, load_scene, GeometryExporter, Sink};

use anyhow::{Context, Result};

/// Load a scene file and export one of its objects.
///
/// `object` selects by name; without it the scene's active object is used.
/// Faces with more than 3 vertices are fan-triangulated first when
/// `triangulate` is set.
pub fn export_file(
    path: &str,
    object: Option<&str>,
    settings: &ExportSettings,
    triangulate: bool,
) -> Result<String> {
    let mut scene =
        load_scene(path).with_context(|| format!("Failed to load scene: {}", path))?;

    if triangulate {
        let name = object
            .map(str::to_string)
            .or_else(|| scene.active.clone());
        if let Some(mesh) = name
            .as_deref()
            .and_then(|n| scene.object_mut(n))
            .and_then(|o| o.as_mesh_mut())
        {
            mesh.triangulate();
        }
    }

    let document = export_t3d(scene.select(object), settings)
        .with_context(|| format!("Failed to export {}", path))?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_file() -> Result<()> {
        let mut file = NamedTempFile::with_suffix(".json")?;
        write!(
            file,
            r#"{{ "active": "Plane", "objects": [{{ "name": "Plane",
                "vertices": [[0,0,0],[1,0,0],[1,1,0],[0,1,0]],
                "faces": [{{ "vertices": [0,1,2,3] }}] }}] }}"#
        )?;

        let path = file.path().to_str().unwrap();
        let settings = ExportSettings::with_scale(1.0);

        let triangulated = export_file(path, None, &settings, true)?;
        assert_eq!(triangulated.matches("Begin Polygon").count(), 2);

        let as_is = export_file(path, None, &settings, false)?;
        assert_eq!(as_is.matches("Begin Polygon").count(), 1);
        Ok(())
    }

    #[test]
    fn test_export_file_without_active_object() -> Result<()> {
        let mut file = NamedTempFile::with_suffix(".json")?;
        write!(file, r#"{{ "objects": [] }}"#)?;
        let path = file.path().to_str().unwrap();
        let err = export_file(path, None, &ExportSettings::default(), true).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExportError>(),
            Some(ExportError::InvalidInput(_))
        ));
        Ok(())
    }
}
