// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Attribute-keyed vertex welding
//!
//! Every face corner is assigned to an output vertex keyed by its source vertex
//! and its rounded (normal, UV, color). Corners of one source vertex that agree
//! on all rounded attributes share an output vertex; any difference splits it.
//! Output vertices are never shared between source vertices.

use super::mesh::{CombinedMesh, DEFAULT_COLOR};
use crate::config::EffectiveOptions;
use crate::error::Result;
use crate::utils::math::{quantize2, quantize3, quantize4};
use ahash::AHashMap;
use log::debug;
use nalgebra::Vector3;

/// Rounded attributes of a corner. The source vertex is implied by the key
/// table the key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeKey {
    normal: [i64; 3],
    uv: Option<[i64; 2]>,
    color: [i64; 4],
}

impl AttributeKey {
    pub fn new(normal: &Vector3<f64>, uv: Option<[f64; 2]>, color: [f64; 4]) -> Self {
        Self {
            normal: quantize3(normal),
            uv: uv.map(quantize2),
            color: quantize4(color),
        }
    }
}

/// Deduplicated vertex; attributes are those of the first corner that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputVertex {
    pub source: usize,
    pub normal: Vector3<f64>,
    pub uv: Option<[f64; 2]>,
    pub color: [f64; 4],
}

/// Output vertex indices of one face, in corner order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFace {
    pub indices: Vec<usize>,
    pub material: usize,
}

/// Result of welding a combined mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeldedMesh {
    pub vertices: Vec<OutputVertex>,
    pub faces: Vec<OutputFace>,
}

impl WeldedMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Per-source-vertex key tables, built up while welding
struct KeyTables {
    tables: Vec<AHashMap<AttributeKey, usize>>,
    vertices: Vec<OutputVertex>,
}

impl KeyTables {
    fn new(vertex_count: usize, corner_count: usize) -> Self {
        Self {
            tables: vec![AHashMap::new(); vertex_count],
            vertices: Vec::with_capacity(corner_count),
        }
    }

    fn resolve(
        &mut self,
        source: usize,
        normal: Vector3<f64>,
        uv: Option<[f64; 2]>,
        color: [f64; 4],
    ) -> usize {
        let key = AttributeKey::new(&normal, uv, color);
        let vertices = &mut self.vertices;
        *self.tables[source].entry(key).or_insert_with(|| {
            vertices.push(OutputVertex {
                source,
                normal,
                uv,
                color,
            });
            vertices.len() - 1
        })
    }
}

/// Weld a combined mesh into attribute-unique vertices and per-face index lists.
///
/// `options` must already be resolved against `mesh` (see
/// [`crate::ExportOptions::resolve`]); a flag whose channel is missing is
/// treated as off.
pub fn weld(mesh: &CombinedMesh, options: &EffectiveOptions) -> Result<WeldedMesh> {
    mesh.validate()?;

    let uv_channel = mesh.uv.as_deref().filter(|_| options.include_uv);
    let color_channel = mesh.colors.as_deref().filter(|_| options.include_color);

    let mut tables = KeyTables::new(mesh.vertex_count(), mesh.corner_count());
    let mut faces = Vec::with_capacity(mesh.face_count());

    for polygon in &mesh.polygons {
        let mut indices = Vec::with_capacity(polygon.loop_total);

        for corner in polygon.corners() {
            let source = mesh.corner_vertices[corner];
            let normal = if polygon.smooth {
                mesh.vertex_normals[source]
            } else {
                polygon.normal
            };
            let uv = uv_channel.map(|channel| channel[corner]);
            let color = color_channel.map_or(DEFAULT_COLOR, |channel| channel[corner]);

            indices.push(tables.resolve(source, normal, uv, color));
        }

        faces.push(OutputFace {
            indices,
            material: polygon.material,
        });
    }

    debug!(
        "Welded {} corners into {} vertices ({} source vertices)",
        mesh.corner_count(),
        tables.vertices.len(),
        mesh.vertex_count()
    );

    Ok(WeldedMesh {
        vertices: tables.vertices,
        faces,
    })
}
