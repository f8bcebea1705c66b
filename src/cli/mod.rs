// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for the T3D exporter

pub mod batch;
pub mod rename;
pub mod reporter;

pub use batch::{discover_inputs, export_batch, output_path, BatchSummary};
pub use rename::rename_scene_materials;
pub use reporter::Reporter;
