// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation: per-object source meshes and the combined polygon mesh

use crate::error::{ExportError, Result};
use crate::utils::math::{newell_normal, normalize_or_zero};
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Color used for every corner when no color channel is exported.
pub const DEFAULT_COLOR: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

/// UV given to corners of merged objects that lack a UV layer.
pub const DEFAULT_UV: [f64; 2] = [0.0, 0.0];

/// Material name given to faces that have no named slot.
pub const FALLBACK_MATERIAL: &str = "None";

/// Polygon of a source mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<usize>,
    #[serde(default = "default_smooth")]
    pub smooth: bool,
    #[serde(default)]
    pub material: usize,
}

fn default_smooth() -> bool {
    true
}

impl Face {
    pub fn new(vertices: Vec<usize>, smooth: bool, material: usize) -> Self {
        Self {
            vertices,
            smooth,
            material,
        }
    }

    pub fn flat(vertices: Vec<usize>) -> Self {
        Self::new(vertices, false, 0)
    }

    pub fn smooth(vertices: Vec<usize>) -> Self {
        Self::new(vertices, true, 0)
    }
}

/// Mesh data of one object, in object space, as handed over by the host.
///
/// Corner layers (`uv`, `colors`) hold one entry per face corner, face after face.
/// An empty material name marks an empty slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMesh {
    pub positions: Vec<[f64; 3]>,
    pub faces: Vec<Face>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub uv: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub colors: Option<Vec<[f64; 4]>>,
}

impl SourceMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: [f64; 3]) -> usize {
        self.positions.push(position);
        self.positions.len() - 1
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn corner_count(&self) -> usize {
        self.faces.iter().map(|f| f.vertices.len()).sum()
    }

    /// Check face arity, vertex and material references, and corner layer lengths.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let slot_limit = self.materials.len().max(1);
        for (i, face) in self.faces.iter().enumerate() {
            if face.vertices.len() < 3 {
                return Err(format!(
                    "face {} has {} corners, expected at least 3",
                    i,
                    face.vertices.len()
                ));
            }
            if let Some(&v) = face.vertices.iter().find(|&&v| v >= self.positions.len()) {
                return Err(format!(
                    "face {} references vertex {} but only {} exist",
                    i,
                    v,
                    self.positions.len()
                ));
            }
            if face.material >= slot_limit {
                return Err(format!(
                    "face {} uses material slot {} but only {} exist",
                    i,
                    face.material,
                    self.materials.len()
                ));
            }
        }

        let corners = self.corner_count();
        if let Some(uv) = &self.uv {
            if uv.len() != corners {
                return Err(format!("uv layer has {} entries for {} corners", uv.len(), corners));
            }
        }
        if let Some(colors) = &self.colors {
            if colors.len() != corners {
                return Err(format!(
                    "color layer has {} entries for {} corners",
                    colors.len(),
                    corners
                ));
            }
        }
        Ok(())
    }
}

/// Face of the combined mesh. Its corners are `loop_start..loop_start + loop_total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub loop_start: usize,
    pub loop_total: usize,
    pub smooth: bool,
    pub material: usize,
    pub normal: Vector3<f64>,
}

impl Polygon {
    pub fn corners(&self) -> std::ops::Range<usize> {
        self.loop_start..self.loop_start + self.loop_total
    }
}

/// Merged polygon mesh in export space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedMesh {
    pub positions: Vec<Point3<f64>>,
    pub vertex_normals: Vec<Vector3<f64>>,
    pub polygons: Vec<Polygon>,
    /// Source vertex of every corner
    pub corner_vertices: Vec<usize>,
    /// Active UV channel, one entry per corner
    pub uv: Option<Vec<[f64; 2]>>,
    /// Active color channel, one entry per corner
    pub colors: Option<Vec<[f64; 4]>>,
}

impl CombinedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a combined mesh from a single source mesh without any transform.
    pub fn from_source(source: &SourceMesh) -> Self {
        let remap: Vec<usize> = (0..source.materials.len().max(1)).collect();
        let mut mesh = Self::new();
        mesh.append(source, &Matrix4::identity(), &remap);
        mesh.compute_normals();
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn corner_count(&self) -> usize {
        self.corner_vertices.len()
    }

    pub fn has_uv(&self) -> bool {
        self.uv.is_some()
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Append a source mesh, transforming positions by `matrix` and mapping
    /// each face's material slot through `material_remap`.
    ///
    /// Corner layers present on only one side are filled with [`DEFAULT_UV`] and
    /// [`DEFAULT_COLOR`]. Normals are left stale; call [`Self::compute_normals`]
    /// once everything is appended.
    pub fn append(&mut self, source: &SourceMesh, matrix: &Matrix4<f64>, material_remap: &[usize]) {
        let vertex_offset = self.positions.len();
        let corners_before = self.corner_vertices.len();

        self.positions.extend(
            source
                .positions
                .iter()
                .map(|p| matrix.transform_point(&Point3::new(p[0], p[1], p[2]))),
        );
        self.vertex_normals
            .resize(self.positions.len(), Vector3::zeros());

        for face in &source.faces {
            let loop_start = self.corner_vertices.len();
            self.corner_vertices
                .extend(face.vertices.iter().map(|v| v + vertex_offset));
            self.polygons.push(Polygon {
                loop_start,
                loop_total: face.vertices.len(),
                smooth: face.smooth,
                material: material_remap.get(face.material).copied().unwrap_or(0),
                normal: Vector3::zeros(),
            });
        }

        let added = self.corner_vertices.len() - corners_before;
        merge_layer(&mut self.uv, source.uv.as_deref(), corners_before, added, DEFAULT_UV);
        merge_layer(
            &mut self.colors,
            source.colors.as_deref(),
            corners_before,
            added,
            DEFAULT_COLOR,
        );
    }

    /// Recompute face normals and area-weighted vertex normals from positions.
    pub fn compute_normals(&mut self) {
        let mut accumulated = vec![Vector3::zeros(); self.positions.len()];

        for polygon in &mut self.polygons {
            let corners = &self.corner_vertices[polygon.corners()];
            let weighted = newell_normal(corners.iter().map(|&v| &self.positions[v]));
            polygon.normal = normalize_or_zero(weighted);
            for &v in corners {
                accumulated[v] += weighted;
            }
        }

        self.vertex_normals = accumulated.into_iter().map(normalize_or_zero).collect();
    }

    /// Check that every corner, vertex and channel reference resolves.
    pub fn validate(&self) -> Result<()> {
        if self.vertex_normals.len() != self.positions.len() {
            return Err(ExportError::malformed(format!(
                "{} vertex normals for {} vertices",
                self.vertex_normals.len(),
                self.positions.len()
            )));
        }

        for (i, polygon) in self.polygons.iter().enumerate() {
            if polygon.loop_total == 0 {
                return Err(ExportError::malformed(format!("face {} has no corners", i)));
            }
            if polygon.loop_start + polygon.loop_total > self.corner_vertices.len() {
                return Err(ExportError::malformed(format!(
                    "face {} spans corners {:?} but only {} exist",
                    i,
                    polygon.corners(),
                    self.corner_vertices.len()
                )));
            }
        }

        if let Some(v) = self
            .corner_vertices
            .iter()
            .find(|&&v| v >= self.positions.len())
        {
            return Err(ExportError::malformed(format!(
                "corner references vertex {} but only {} exist",
                v,
                self.positions.len()
            )));
        }

        let corners = self.corner_count();
        if let Some(uv) = &self.uv {
            if uv.len() != corners {
                return Err(ExportError::malformed(format!(
                    "uv channel has {} entries for {} corners",
                    uv.len(),
                    corners
                )));
            }
        }
        if let Some(colors) = &self.colors {
            if colors.len() != corners {
                return Err(ExportError::malformed(format!(
                    "color channel has {} entries for {} corners",
                    colors.len(),
                    corners
                )));
            }
        }
        Ok(())
    }
}

fn merge_layer<T: Copy>(
    target: &mut Option<Vec<T>>,
    incoming: Option<&[T]>,
    corners_before: usize,
    added: usize,
    default: T,
) {
    match (target.as_mut(), incoming) {
        (Some(layer), Some(values)) => layer.extend_from_slice(values),
        (Some(layer), None) => layer.resize(corners_before + added, default),
        (None, Some(values)) => {
            let mut layer = vec![default; corners_before];
            layer.extend_from_slice(values);
            *target = Some(layer);
        }
        (None, None) => {}
    }
}

/// Ordered material names; faces refer to them by slot index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialTable {
    names: Vec<String>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot of `name`, appending it if it is not in the table yet.
    pub fn slot_for(&mut self, name: &str) -> usize {
        match self.names.iter().position(|n| n == name) {
            Some(slot) => slot,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        }
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.names.get(slot).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for MaterialTable {
    fn from(names: Vec<String>) -> Self {
        Self { names }
    }
}

impl<'a> FromIterator<&'a str> for MaterialTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(str::to_string).collect(),
        }
    }
}
