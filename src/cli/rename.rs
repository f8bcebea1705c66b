// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material renaming for JSON scenes

use crate::io::{self, SceneFormat};
use crate::materials::{rename_materials, RenameRule};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Rename the materials of every mesh in `input` and save the scene as JSON.
///
/// The scene is written to `output`, or back over `input` when no output is
/// given. The target must be a `.json` file so an OBJ input is never
/// overwritten with JSON. Returns the number of renamed materials and the
/// path written.
pub fn rename_scene_materials<'a>(
    input: &'a str,
    rule: RenameRule,
    output: Option<&'a str>,
) -> Result<(usize, &'a str)> {
    let target = output.unwrap_or(input);
    if SceneFormat::from_path(Path::new(target)) != Some(SceneFormat::Json) {
        if output.is_none() {
            bail!(
                "{} is not a JSON scene; pass --output <FILE>.json to write the renamed scene",
                input
            );
        }
        bail!("Output must be a .json scene: {}", target);
    }

    let mut scene =
        io::load_scene(input).with_context(|| format!("Failed to load scene: {}", input))?;

    let mut renamed = 0;
    for object in &mut scene.objects {
        if let Some(mesh) = object.as_mesh_mut() {
            renamed += rename_materials(&mut mesh.materials, rule);
        }
    }

    io::save_scene(&scene, target).with_context(|| format!("Failed to save scene: {}", target))?;
    Ok((renamed, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ROOM_OBJ: &str = "mtllib room.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl picnum42_wall\nf 1 2 3\n";
    const ROOM_MTL: &str = "newmtl picnum42_wall\nKd 1 1 1\n";

    fn room(dir: &TempDir) -> Result<String> {
        std::fs::write(dir.path().join("room.mtl"), ROOM_MTL)?;
        let path = dir.path().join("room.obj");
        std::fs::write(&path, ROOM_OBJ)?;
        Ok(path.to_string_lossy().into_owned())
    }

    #[test]
    fn test_obj_input_is_not_overwritten() -> Result<()> {
        let dir = TempDir::new()?;
        let input = room(&dir)?;

        let err = rename_scene_materials(&input, RenameRule::Picnum, None).unwrap_err();
        assert!(err.to_string().contains("not a JSON scene"));
        assert_eq!(std::fs::read_to_string(&input)?, ROOM_OBJ);
        Ok(())
    }

    #[test]
    fn test_output_must_be_json() -> Result<()> {
        let dir = TempDir::new()?;
        let input = room(&dir)?;
        let output = dir.path().join("renamed.obj").to_string_lossy().into_owned();

        assert!(rename_scene_materials(&input, RenameRule::Picnum, Some(output.as_str())).is_err());
        assert!(!Path::new(&output).exists());
        Ok(())
    }

    #[test]
    fn test_obj_input_with_json_output() -> Result<()> {
        let dir = TempDir::new()?;
        let input = room(&dir)?;
        let output = dir.path().join("room.json").to_string_lossy().into_owned();

        let (renamed, target) = rename_scene_materials(&input, RenameRule::Picnum, Some(output.as_str()))?;
        assert_eq!(renamed, 1);
        assert_eq!(target, output);
        assert_eq!(std::fs::read_to_string(&input)?, ROOM_OBJ);

        let scene = io::load_scene(&output)?;
        let mesh = scene.active_object().and_then(|o| o.as_mesh()).context("no mesh")?;
        assert_eq!(mesh.material_name(Some(0)), Some("42"));
        Ok(())
    }
}
