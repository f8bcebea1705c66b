// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - scene loading, T3D formatting and export

pub mod format;
mod exporter;
mod scene;
mod sink;
mod t3d;

pub use exporter::{brush_location, export_t3d, GeometryExporter};
pub use scene::{load_obj, load_scene, parse_scene_json, save_scene, scene_to_json, SceneFormat};
pub use sink::{FileSink, Sink, StdoutSink, StringSink};
pub use t3d::{
    PolygonRecord, PolygonVertex, T3dWriter, ACTOR_NAME, BRUSH_NAME, NO_TEXTURE, POLYGON_FLAGS,
};
