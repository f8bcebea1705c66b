// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export settings

use crate::error::{ExportError, ExportResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Smallest accepted export scale
pub const MIN_SCALE: f64 = 0.01;
/// Largest accepted export scale
pub const MAX_SCALE: f64 = 100.0;
/// Scale used when nothing else is configured
pub const DEFAULT_SCALE: f64 = 10.0;

/// Settings file looked up in the working directory by [`ExportSettings::load`]
pub const SETTINGS_FILE: &str = "t3dbrush.toml";
/// Environment variable overriding the configured scale
pub const SCALE_ENV: &str = "T3D_EXPORT_SCALE";

/// Settings applied to a single export
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Uniform multiplier for vertex positions and UVs
    pub scale: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }
}

impl ExportSettings {
    /// Create settings with `scale` clamped into `[MIN_SCALE, MAX_SCALE]`
    #[must_use]
    pub fn with_scale(scale: f64) -> Self {
        let scale = if scale.is_nan() {
            DEFAULT_SCALE
        } else {
            scale.clamp(MIN_SCALE, MAX_SCALE)
        };
        Self { scale }
    }

    /// Reject settings that did not go through [`ExportSettings::with_scale`]
    pub fn validate(&self) -> ExportResult<()> {
        if !self.scale.is_finite() || !(MIN_SCALE..=MAX_SCALE).contains(&self.scale) {
            return Err(ExportError::InvalidSettings(format!(
                "scale {} is outside [{}, {}]",
                self.scale, MIN_SCALE, MAX_SCALE
            )));
        }
        Ok(())
    }

    /// Load settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;
        let settings: ExportSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path.as_ref()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `t3dbrush.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut settings = if PathBuf::from(SETTINGS_FILE).exists() {
            Self::from_file(SETTINGS_FILE)?
        } else {
            Self::default()
        };

        if let Ok(scale) = std::env::var(SCALE_ENV) {
            let scale: f64 = scale
                .trim()
                .parse()
                .with_context(|| format!("{SCALE_ENV} is not a number: {scale:?}"))?;
            settings.scale = scale;
            settings.validate()?;
        }

        Ok(settings)
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write settings file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
