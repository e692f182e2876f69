// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - scene import, map export and map parsing

mod export_map;
mod importer;
mod parser;

pub use export_map::{export_map, write_map, HEADER};
pub use importer::{import_scene_file, parse_scene, Scene, SceneObject};
pub use parser::{import_map_file, parse_map, MapDocument, MapFace, VERTEX_STRIDE};
