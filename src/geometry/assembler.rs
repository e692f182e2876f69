// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Merge source objects into one combined mesh in export space

use super::mesh::{CombinedMesh, MaterialTable, SourceMesh, FALLBACK_MATERIAL};
use crate::error::AssemblyError;
use log::{debug, warn};
use nalgebra::Matrix4;

/// An object that can hand over mesh data, typically backed by a host scene.
pub trait MeshSource {
    fn name(&self) -> &str;

    fn is_selected(&self) -> bool;

    /// Object-to-world transform
    fn world_matrix(&self) -> Matrix4<f64>;

    /// Mesh data in object space; the modifier-evaluated mesh when
    /// `apply_modifiers` is set and one exists.
    fn to_mesh(&self, apply_modifiers: bool) -> Result<SourceMesh, AssemblyError>;
}

/// Which objects to take and how to evaluate them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyOptions {
    pub selection_only: bool,
    pub apply_modifiers: bool,
    /// Applied after each object's world matrix
    pub global_matrix: Matrix4<f64>,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            selection_only: false,
            apply_modifiers: true,
            global_matrix: Matrix4::identity(),
        }
    }
}

/// Object left out of the combined mesh
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedObject {
    pub name: String,
    pub error: AssemblyError,
}

/// Combined mesh plus the merged material table
#[derive(Debug, Clone, Default)]
pub struct AssembledScene {
    pub mesh: CombinedMesh,
    pub materials: MaterialTable,
    pub objects: Vec<String>,
    pub skipped: Vec<SkippedObject>,
}

/// Merge `sources` into one mesh.
///
/// Objects that fail to produce a valid mesh are skipped and reported in
/// [`AssembledScene::skipped`]. Material slots are remapped onto the union of
/// slot names, so faces of different objects using the same material name end
/// up on the same slot. Faces without a named slot share [`FALLBACK_MATERIAL`].
pub fn assemble<S: MeshSource>(sources: &[S], options: &AssemblyOptions) -> AssembledScene {
    let mut scene = AssembledScene::default();

    for source in sources {
        if options.selection_only && !source.is_selected() {
            continue;
        }

        let mesh = match source
            .to_mesh(options.apply_modifiers)
            .and_then(|mesh| checked(source.name(), mesh))
        {
            Ok(mesh) => mesh,
            Err(error) => {
                warn!("Skipping object {:?}: {}", source.name(), error);
                scene.skipped.push(SkippedObject {
                    name: source.name().to_string(),
                    error,
                });
                continue;
            }
        };

        let remap = remap_materials(&mut scene.materials, &mesh);
        let matrix = options.global_matrix * source.world_matrix();
        scene.mesh.append(&mesh, &matrix, &remap);
        scene.objects.push(source.name().to_string());

        debug!(
            "Assembled {:?}: {} vertices, {} faces",
            source.name(),
            mesh.positions.len(),
            mesh.faces.len()
        );
    }

    scene.mesh.compute_normals();
    scene
}

fn checked(name: &str, mesh: SourceMesh) -> Result<SourceMesh, AssemblyError> {
    mesh.validate()
        .map_err(|message| AssemblyError::InvalidMesh {
            object: name.to_string(),
            message,
        })?;
    Ok(mesh)
}

// Unnamed slots, and faces of an object without slots, share the fallback
// material. It only enters the table when a face actually uses it.
fn remap_materials(table: &mut MaterialTable, mesh: &SourceMesh) -> Vec<usize> {
    let slot_count = mesh.materials.len().max(1);
    let mut used = vec![false; slot_count];
    for face in &mesh.faces {
        used[face.material] = true;
    }

    (0..slot_count)
        .map(|slot| match mesh.materials.get(slot) {
            Some(name) if !name.trim().is_empty() => table.slot_for(name),
            _ if used[slot] => table.slot_for(FALLBACK_MATERIAL),
            _ => 0,
        })
        .collect()
}
