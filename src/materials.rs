// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material name cleanup and texture listing for imported Build maps
//!
//! Build-engine map importers name materials after the tile number, e.g.
//! `picnum1234_wall` or `picnum12_0001-002-x`. These helpers turn them into
//! the texture names the target package uses.

use crate::geometry::Material;
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

const PICNUM_PREFIX: &str = "picnum";

/// How to rewrite `picnum` material names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// `picnum1234_wall` -> `1234`
    Picnum,
    /// `picnum12_0001-002-x` -> `0001-002`
    Dn3dObject,
}

impl FromStr for RenameRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "picnum" => Ok(Self::Picnum),
            "dn3d" | "dn3d-object" => Ok(Self::Dn3dObject),
            other => Err(format!("unknown rename rule '{other}', expected picnum or dn3d")),
        }
    }
}

impl RenameRule {
    pub fn apply(&self, name: &str) -> Option<String> {
        match self {
            Self::Picnum => picnum_name(name),
            Self::Dn3dObject => dn3d_object_name(name),
        }
    }
}

/// Tile number of a `picnum` material name
pub fn picnum_name(name: &str) -> Option<String> {
    if !name.starts_with(PICNUM_PREFIX) {
        return None;
    }
    let stripped = name.replace(PICNUM_PREFIX, "");
    stripped.split('_').next().map(str::to_string)
}

/// `<group>-<index>` taken from the second `_` segment of a `picnum` name
pub fn dn3d_object_name(name: &str) -> Option<String> {
    if !name.starts_with(PICNUM_PREFIX) {
        return None;
    }
    let stripped = name.replace(PICNUM_PREFIX, "");
    let segment = stripped.split('_').nth(1)?;
    let mut parts = segment.split('-');
    match (parts.next(), parts.next()) {
        (Some(group), Some(index)) => Some(format!("{group}-{index}")),
        _ => None,
    }
}

/// Rename every filled slot the rule matches; returns how many were renamed
pub fn rename_materials(materials: &mut [Option<Material>], rule: RenameRule) -> usize {
    let mut renamed = 0;
    for material in materials.iter_mut().flatten() {
        if let Some(new_name) = rule.apply(&material.name) {
            debug!("Renaming material {} -> {}", material.name, new_name);
            material.name = new_name;
            renamed += 1;
        }
    }
    renamed
}

/// Unique image texture names used by the assigned materials
pub fn collect_texture_names(materials: &[Option<Material>]) -> BTreeSet<String> {
    materials
        .iter()
        .flatten()
        .flat_map(|m| m.image_textures.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picnum_name() {
        assert_eq!(picnum_name("picnum1234_wall").as_deref(), Some("1234"));
        assert_eq!(picnum_name("picnum77").as_deref(), Some("77"));
        assert_eq!(picnum_name("Wall"), None);
    }

    #[test]
    fn test_dn3d_object_name() {
        assert_eq!(
            dn3d_object_name("picnum12_0001-002-x").as_deref(),
            Some("0001-002")
        );
        assert_eq!(dn3d_object_name("picnum12_0001"), None);
        assert_eq!(dn3d_object_name("picnum12"), None);
        assert_eq!(dn3d_object_name("Floor_01-02"), None);
    }

    #[test]
    fn test_rename_materials() {
        let mut slots = vec![
            Some(Material::new("picnum100_floor")),
            None,
            Some(Material::new("Ceiling")),
        ];
        assert_eq!(rename_materials(&mut slots, RenameRule::Picnum), 1);
        assert_eq!(slots[0].as_ref().unwrap().name, "100");
        assert_eq!(slots[2].as_ref().unwrap().name, "Ceiling");
    }

    #[test]
    fn test_collect_texture_names() {
        let slots = vec![
            Some(Material::new("A").with_texture("rock.png").with_texture("moss.png")),
            None,
            Some(Material::new("B").with_texture("rock.png")),
            Some(Material::new("C")),
        ];
        let names: Vec<String> = collect_texture_names(&slots).into_iter().collect();
        assert_eq!(names, vec!["moss.png".to_string(), "rock.png".to_string()]);
    }

    #[test]
    fn test_rule_from_str() {
        assert_eq!("picnum".parse::<RenameRule>(), Ok(RenameRule::Picnum));
        assert_eq!("DN3D".parse::<RenameRule>(), Ok(RenameRule::Dn3dObject));
        assert!("other".parse::<RenameRule>().is_err());
    }
}
