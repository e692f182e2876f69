// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! World mesh (.n) exporter
//!
//! Writes materials, welded vertices and faces in one sequential pass. Floats
//! always carry exactly six fractional digits so files diff cleanly across
//! platforms.

use crate::error::{ExportError, Result};
use crate::geometry::{CombinedMesh, MaterialTable, WeldedMesh, DEFAULT_UV};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// First line of every map file
pub const HEADER: &str = "node.utf8";

/// Write the map grammar to `sink`.
///
/// Nothing is written if a material name, a vertex reference or a material
/// index is invalid.
pub fn write_map<W: Write>(
    sink: W,
    materials: &MaterialTable,
    mesh: &CombinedMesh,
    welded: &WeldedMesh,
) -> Result<()> {
    validate_map_input(materials, mesh, welded)?;
    write_records(sink, materials, mesh, welded)
}

/// Check everything `write_map` rejects, without touching any sink.
fn validate_map_input(
    materials: &MaterialTable,
    mesh: &CombinedMesh,
    welded: &WeldedMesh,
) -> Result<()> {
    check_materials(materials)?;
    check_references(materials, mesh, welded)
}

fn write_records<W: Write>(
    sink: W,
    materials: &MaterialTable,
    mesh: &CombinedMesh,
    welded: &WeldedMesh,
) -> Result<()> {
    let mut w = BufWriter::new(sink);

    writeln!(w, "{}", HEADER)?;
    writeln!(w, "object worldMesh\n{{")?;

    // Materials
    writeln!(w, "\tarray string materials\n\t{{")?;
    for name in materials.iter() {
        writeln!(w, "\t\t{}", name)?;
    }
    writeln!(w, "\t}}")?;

    // Vertices
    writeln!(w, "\tarray float vertices\n\t{{")?;
    for vertex in &welded.vertices {
        let p = &mesh.positions[vertex.source];
        let n = &vertex.normal;
        let uv = vertex.uv.unwrap_or(DEFAULT_UV);
        let c = &vertex.color;
        writeln!(
            w,
            "\t\t{:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
            p.x, p.y, p.z, n.x, n.y, n.z, uv[0], uv[1], c[0], c[1], c[2], c[3]
        )?;
    }
    writeln!(w, "\t}}")?;

    // Faces
    writeln!(w, "\tarray object faces\n\t{{")?;
    for face in &welded.faces {
        writeln!(w, "\t\t{{")?;
        writeln!(w, "\t\t\tarray uint vertices\n\t\t\t{{")?;
        write!(w, "\t\t\t\t")?;
        for index in &face.indices {
            write!(w, "{} ", index)?;
        }
        writeln!(w, "\n\t\t\t}}")?;
        writeln!(w, "\t\t\tuint material {}", face.material)?;
        writeln!(w, "\t\t}}")?;
    }
    writeln!(w, "\t}}")?;

    writeln!(w, "}}")?;
    w.flush()?;
    Ok(())
}

/// Write a map file at `path`.
///
/// Invalid input is rejected before any file is opened. With `atomic`, the
/// data goes to a temporary file next to `path` that is renamed over it once
/// complete; a failure leaves `path` untouched. Without it, an I/O failure
/// mid-write leaves a partial file behind.
pub fn export_map(
    path: impl AsRef<Path>,
    materials: &MaterialTable,
    mesh: &CombinedMesh,
    welded: &WeldedMesh,
    atomic: bool,
) -> Result<()> {
    let path = path.as_ref();
    validate_map_input(materials, mesh, welded)?;

    if !atomic {
        let file = File::create(path)?;
        return write_records(file, materials, mesh, welded);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    write_records(temp.as_file_mut(), materials, mesh, welded)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| ExportError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

fn check_materials(materials: &MaterialTable) -> Result<()> {
    for (slot, name) in materials.iter().enumerate() {
        let reason = if name.trim().is_empty() {
            "name is blank"
        } else if name.contains(|c| c == '\n' || c == '\r') {
            "name contains a line break"
        } else if name.trim() != name {
            "name has leading or trailing whitespace"
        } else if name.starts_with('}') {
            "name starts with '}'"
        } else {
            continue;
        };
        return Err(ExportError::InvalidMaterialName {
            slot,
            name: name.to_string(),
            reason,
        });
    }
    Ok(())
}

fn check_references(
    materials: &MaterialTable,
    mesh: &CombinedMesh,
    welded: &WeldedMesh,
) -> Result<()> {
    if let Some(vertex) = welded
        .vertices
        .iter()
        .find(|v| v.source >= mesh.positions.len())
    {
        return Err(ExportError::malformed(format!(
            "output vertex refers to source vertex {} but only {} exist",
            vertex.source,
            mesh.positions.len()
        )));
    }
    for (i, face) in welded.faces.iter().enumerate() {
        if let Some(index) = face.indices.iter().find(|&&x| x >= welded.vertices.len()) {
            return Err(ExportError::malformed(format!(
                "face {} refers to output vertex {} but only {} exist",
                i,
                index,
                welded.vertices.len()
            )));
        }
        if face.material >= materials.len() {
            return Err(ExportError::malformed(format!(
                "face {} uses material slot {} but only {} exist",
                i,
                face.material,
                materials.len()
            )));
        }
    }
    Ok(())
}
