// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Worldmesh
//!
//! Converts polygon meshes with per-corner normals, UVs and colors into
//! attribute-unique vertex and index arrays, and writes them as `.n` world
//! mesh files.

pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod geometry;
pub mod io;
pub mod utils;

pub use config::{EffectiveOptions, ExportOptions};
pub use error::{AssemblyError, ConfigError, ExportError, Result};
pub use exporter::{ExportReport, Exporter};
pub use geometry::{
    assemble, weld, CombinedMesh, Face, MaterialTable, MeshSource, OutputFace, OutputVertex,
    SourceMesh, WeldedMesh,
};
pub use io::{export_map, import_scene_file, parse_map, write_map, MapDocument, SceneObject};
pub use utils::math::{Axis, AxisConversion};

/// Export a scene file to a map file with the given options
pub fn export_scene_file(
    scene: impl AsRef<std::path::Path>,
    output: impl AsRef<std::path::Path>,
    options: ExportOptions,
) -> Result<ExportReport> {
    let scene = import_scene_file(scene)?;
    Exporter::new(options)?.export(&scene.objects, output)
}
