// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch export of scene files

use crate::config::ExportSettings;
use crate::io::{FileSink, SceneFormat, Sink};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;
use walkdir::WalkDir;

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub exported: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    pub duration: Duration,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.exported.len() + self.failed.len()
    }
}

/// Expand files and directories into the scene files they contain, sorted
pub fn discover_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for input in inputs {
        if input.is_dir() {
            found.extend(
                WalkDir::new(input)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.path().to_path_buf())
                    .filter(|p| SceneFormat::from_path(p).is_some()),
            );
        } else if SceneFormat::from_path(input).is_some() {
            found.push(input.clone());
        } else {
            warn!("Skipping {:?}: not a .json or .obj scene", input);
        }
    }

    found.sort();
    found.dedup();
    found
}

/// Output path for a scene: `<out_dir>/<stem>.t3d`
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scene");
    out_dir.join(format!("{stem}.t3d"))
}

/// Export the active object of every input scene into `out_dir`.
///
/// A failing scene is recorded and the batch continues. Scenes whose
/// output path was already written in this run (same file stem in another
/// directory) are recorded as failures instead of overwriting it.
pub fn export_batch(
    inputs: &[PathBuf],
    out_dir: &Path,
    settings: &ExportSettings,
    triangulate: bool,
    show_progress: bool,
) -> Result<BatchSummary> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;

    let start = Instant::now();
    let mut summary = BatchSummary::default();
    let mut written: HashMap<PathBuf, PathBuf> = HashMap::new();

    let progress = if show_progress {
        let pb = ProgressBar::new(inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .context("Invalid progress template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    for input in inputs {
        if let Some(ref pb) = progress {
            pb.set_message(input.display().to_string());
        }

        let target = output_path(input, out_dir);
        let result = match written.get(&target) {
            Some(earlier) => Err(anyhow::anyhow!(
                "Output {:?} was already written from {:?}",
                target,
                earlier
            )),
            None => input
                .to_str()
                .context("Input path is not valid UTF-8")
                .and_then(|path| crate::export_file(path, None, settings, triangulate))
                .and_then(|document| {
                    FileSink::new(&target)
                        .write(&document)
                        .map_err(anyhow::Error::from)
                }),
        };

        if result.is_ok() {
            written.insert(target, input.clone());
        }
        match result {
            Ok(()) => summary.exported.push(input.clone()),
            Err(e) => summary.failed.push((input.clone(), format!("{e:#}"))),
        }

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message("Batch complete");
    }

    summary.duration = start.elapsed();
    Ok(summary)
}
