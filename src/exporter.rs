// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Exporter API: assemble, resolve options, weld, write

use crate::config::{EffectiveOptions, ExportOptions};
use crate::error::Result;
use crate::geometry::{
    assemble, weld, AssembledScene, AssemblyOptions, CombinedMesh, MaterialTable, MeshSource,
    SkippedObject,
};
use crate::io::export_map;
use crate::utils::math::AxisConversion;
use log::info;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Summary of a finished export
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    /// Objects that made it into the file
    pub objects: Vec<String>,
    pub skipped: Vec<SkippedObject>,
    pub effective: EffectiveOptions,
    pub material_count: usize,
    pub source_vertex_count: usize,
    pub corner_count: usize,
    pub vertex_count: usize,
    pub face_count: usize,
    pub elapsed: Duration,
}

/// Runs exports with one set of options
#[derive(Debug, Clone)]
pub struct Exporter {
    options: ExportOptions,
    conversion: AxisConversion,
}

impl Exporter {
    /// Create an exporter, rejecting invalid axis or scale settings.
    pub fn new(options: ExportOptions) -> Result<Self> {
        let conversion = options.conversion()?;
        Ok(Self {
            options,
            conversion,
        })
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            selection_only: self.options.selection_only,
            apply_modifiers: self.options.apply_modifiers,
            global_matrix: self.conversion.to_matrix4(),
        }
    }

    /// Assemble the sources without writing anything.
    pub fn assemble<S: MeshSource>(&self, sources: &[S]) -> AssembledScene {
        assemble(sources, &self.assembly_options())
    }

    /// Export scene objects to `path`.
    pub fn export<S: MeshSource>(
        &self,
        sources: &[S],
        path: impl AsRef<Path>,
    ) -> Result<ExportReport> {
        let start = Instant::now();
        let scene = self.assemble(sources);
        let mut report = self.write_mesh(&scene.mesh, &scene.materials, path.as_ref())?;
        report.objects = scene.objects;
        report.skipped = scene.skipped;
        report.elapsed = start.elapsed();
        log_completion(&report);
        Ok(report)
    }

    /// Export an already combined mesh to `path`. The mesh is used as is; no
    /// axis conversion is applied.
    pub fn export_mesh(
        &self,
        mesh: &CombinedMesh,
        materials: &MaterialTable,
        path: impl AsRef<Path>,
    ) -> Result<ExportReport> {
        let start = Instant::now();
        let mut report = self.write_mesh(mesh, materials, path.as_ref())?;
        report.elapsed = start.elapsed();
        log_completion(&report);
        Ok(report)
    }

    fn write_mesh(
        &self,
        mesh: &CombinedMesh,
        materials: &MaterialTable,
        path: &Path,
    ) -> Result<ExportReport> {
        let effective = self.options.resolve(mesh);
        let welded = weld(mesh, &effective)?;
        export_map(path, materials, mesh, &welded, self.options.atomic_write)?;

        Ok(ExportReport {
            path: path.to_path_buf(),
            objects: Vec::new(),
            skipped: Vec::new(),
            effective,
            material_count: materials.len(),
            source_vertex_count: mesh.vertex_count(),
            corner_count: mesh.corner_count(),
            vertex_count: welded.vertex_count(),
            face_count: welded.face_count(),
            elapsed: Duration::ZERO,
        })
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self {
            options: ExportOptions::default(),
            conversion: AxisConversion::default(),
        }
    }
}

fn log_completion(report: &ExportReport) {
    info!(
        "Export completed {:?} in {:.3}s ({} vertices, {} faces)",
        report.path,
        report.elapsed.as_secs_f64(),
        report.vertex_count,
        report.face_count
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::geometry::Primitive;
    use crate::io::{import_map_file, SceneObject};
    use crate::utils::math::Axis;
    use tempfile::tempdir;

    #[test]
    fn test_rejects_invalid_options() {
        let options = ExportOptions {
            axis_forward: Axis::Z,
            axis_up: Axis::Z,
            ..Default::default()
        };
        assert!(matches!(
            Exporter::new(options),
            Err(ExportError::Config(_))
        ));
    }

    #[test]
    fn test_export_scene() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("scene.n");
        let objects = vec![
            SceneObject::new("cube", Primitive::cube([1.0, 1.0, 1.0], true).to_mesh()),
            SceneObject {
                mesh: None,
                ..SceneObject::new("lamp", Default::default())
            },
        ];

        let report = Exporter::default().export(&objects, &path)?;
        assert_eq!(report.objects, vec!["cube".to_string()]);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.effective.include_uv);
        assert!(!report.effective.include_color);
        // 6 flat sides with their own UV island: nothing welds across sides.
        assert_eq!(report.vertex_count, 24);
        assert_eq!(report.face_count, 6);

        let document = import_map_file(&path)?;
        assert_eq!(document.vertices.len(), 24);
        document.validate()
    }

    #[test]
    fn test_export_applies_global_scale() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("scaled.n");
        let options = ExportOptions {
            axis_forward: Axis::Y,
            axis_up: Axis::Z,
            global_scale: 2.0,
            ..Default::default()
        };
        let cube = Primitive::cube([1.0, 1.0, 1.0], false).to_mesh();
        let objects = [SceneObject::new("cube", cube)];
        Exporter::new(options)?.export(&objects, &path)?;

        let document = import_map_file(&path)?;
        let max_x = document.vertices.iter().map(|v| v[0]).fold(f64::MIN, f64::max);
        assert_eq!(max_x, 2.0);
        Ok(())
    }

    #[test]
    fn test_export_mesh_with_channels_disabled() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("grid.n");
        let mesh = CombinedMesh::from_source(&Primitive::grid(1.0, 2).to_mesh());
        let options = ExportOptions {
            include_uv: false,
            ..Default::default()
        };

        let materials: MaterialTable = ["Ground"].into_iter().collect();
        let exporter = Exporter::new(options)?;
        assert!(!exporter.options().include_uv);

        let report = exporter.export_mesh(&mesh, &materials, &path)?;
        assert!(!report.effective.include_uv);
        // Smooth planar grid without UVs welds back to its source vertices.
        assert_eq!(report.vertex_count, 9);
        assert_eq!(report.corner_count, 16);
        Ok(())
    }
}
