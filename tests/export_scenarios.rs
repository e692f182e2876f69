// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end export scenarios

use anyhow::Result;
use std::fs;
use tempfile::tempdir;
use worldmesh::geometry::{CombinedMesh, Face, MaterialTable, SourceMesh, FALLBACK_MATERIAL};
use worldmesh::io::{export_map, import_map_file, parse_map, write_map, SceneObject};
use worldmesh::{weld, Axis, EffectiveOptions, ExportError, ExportOptions, Exporter};

fn identity_options() -> ExportOptions {
    ExportOptions {
        axis_forward: Axis::Y,
        axis_up: Axis::Z,
        global_scale: 1.0,
        ..Default::default()
    }
}

fn render(materials: &MaterialTable, mesh: &CombinedMesh, options: &EffectiveOptions) -> String {
    let welded = weld(mesh, options).unwrap();
    let mut out = Vec::new();
    write_map(&mut out, materials, mesh, &welded).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_single_smooth_triangle_with_uv_and_no_color() -> Result<()> {
    let source = SourceMesh {
        positions: vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]],
        faces: vec![Face::smooth(vec![0, 1, 2])],
        materials: vec!["Default".into()],
        uv: Some(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
        colors: None,
    };
    let mesh = CombinedMesh::from_source(&source);
    let effective = ExportOptions::default().resolve(&mesh);
    assert!(effective.include_uv);
    assert!(!effective.include_color);

    let text = render(&["Default"].into_iter().collect(), &mesh, &effective);
    let document = parse_map(&text)?;

    assert_eq!(document.vertices.len(), 3);
    assert_eq!(document.faces.len(), 1);
    assert_eq!(document.faces[0].indices, vec![0, 1, 2]);

    let vertex_lines: Vec<&str> = text
        .lines()
        .filter(|line| line.starts_with("\t\t") && line.split_whitespace().count() == 12)
        .collect();
    assert_eq!(vertex_lines.len(), 3);
    for line in vertex_lines {
        assert!(line.ends_with(" 1.000000 1.000000 1.000000 1.000000"), "{}", line);
    }
    assert!(text.contains(
        "\t\t2.000000 0.000000 0.000000 0.000000 0.000000 1.000000 1.000000 0.000000 "
    ));
    Ok(())
}

#[test]
fn test_flat_quad_split_into_triangles_shares_edge_vertices() -> Result<()> {
    let source = SourceMesh {
        positions: vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        faces: vec![Face::flat(vec![0, 1, 2]), Face::flat(vec![0, 2, 3])],
        ..Default::default()
    };
    let mesh = CombinedMesh::from_source(&source);
    let welded = weld(&mesh, &EffectiveOptions::none())?;

    assert_eq!(welded.vertex_count(), 4);
    assert_eq!(welded.faces[0].indices, vec![0, 1, 2]);
    assert_eq!(welded.faces[1].indices, vec![0, 2, 3]);
    Ok(())
}

#[test]
fn test_empty_mesh_is_well_formed() -> Result<()> {
    let mesh = CombinedMesh::new();
    let materials: MaterialTable = ["Unused", "Also Unused"].into_iter().collect();
    let text = render(&materials, &mesh, &EffectiveOptions::none());

    let expected = "node.utf8\nobject worldMesh\n{\n\
                    \tarray string materials\n\t{\n\t\tUnused\n\t\tAlso Unused\n\t}\n\
                    \tarray float vertices\n\t{\n\t}\n\
                    \tarray object faces\n\t{\n\t}\n}\n";
    assert_eq!(text, expected);

    let document = parse_map(&text)?;
    assert_eq!(document.materials, vec!["Unused", "Also Unused"]);
    assert!(document.vertices.is_empty());
    assert!(document.faces.is_empty());
    Ok(())
}

#[test]
fn test_no_uv_channel_writes_zero_uv_columns() -> Result<()> {
    let source = SourceMesh {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        faces: vec![Face::flat(vec![0, 1, 2])],
        colors: Some(vec![[0.25, 0.5, 0.75, 1.0]; 3]),
        ..Default::default()
    };
    let mesh = CombinedMesh::from_source(&source);
    let effective = ExportOptions::default().resolve(&mesh);
    assert!(!effective.include_uv);

    let materials: MaterialTable = ["Default"].into_iter().collect();
    let document = parse_map(&render(&materials, &mesh, &effective))?;
    for vertex in &document.vertices {
        assert_eq!(&vertex[6..8], &[0.0, 0.0]);
        assert_eq!(&vertex[8..], &[0.25, 0.5, 0.75, 1.0]);
    }
    Ok(())
}

#[test]
fn test_merged_objects_keep_their_materials() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("merged.n");

    let triangle = |materials: &[&str], slot: usize| SourceMesh {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        faces: vec![Face::new(vec![0, 1, 2], true, slot)],
        materials: materials.iter().map(|m| m.to_string()).collect(),
        ..Default::default()
    };
    let objects = vec![
        SceneObject::new("wall", triangle(&["Brick", "Plaster"], 1)),
        SceneObject::new("floor", triangle(&["Wood", "Brick"], 1)),
    ];

    Exporter::new(identity_options())?.export(&objects, &path)?;
    let document = import_map_file(&path)?;

    assert_eq!(document.materials, vec!["Brick", "Plaster", "Wood"]);
    let slots: Vec<usize> = document.faces.iter().map(|f| f.material).collect();
    assert_eq!(slots, vec![1, 0]);
    Ok(())
}

#[test]
fn test_atomic_write_leaves_target_untouched_on_failure() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("existing.n");
    fs::write(&path, "previous contents")?;

    let mesh = CombinedMesh::new();
    let welded = weld(&mesh, &EffectiveOptions::none())?;
    let bad = MaterialTable::from(vec!["two\nlines".to_string()]);

    let result = export_map(&path, &bad, &mesh, &welded, true);
    assert!(matches!(result, Err(ExportError::InvalidMaterialName { .. })));
    assert_eq!(fs::read_to_string(&path)?, "previous contents");
    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_direct_write_keeps_target_on_invalid_input() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("existing.n");
    fs::write(&path, "previous contents")?;

    let mesh = CombinedMesh::new();
    let welded = weld(&mesh, &EffectiveOptions::none())?;
    let bad = MaterialTable::from(vec![String::new()]);

    let result = export_map(&path, &bad, &mesh, &welded, false);
    assert!(matches!(result, Err(ExportError::InvalidMaterialName { .. })));
    assert_eq!(fs::read_to_string(&path)?, "previous contents");
    Ok(())
}

#[test]
fn test_objects_without_materials_get_fallback_slot() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("mixed.n");

    let triangle = |materials: &[&str]| SourceMesh {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        faces: vec![Face::smooth(vec![0, 1, 2])],
        materials: materials.iter().map(|m| m.to_string()).collect(),
        ..Default::default()
    };
    let objects = [
        SceneObject::new("lava", triangle(&["Lava"])),
        SceneObject::new("plain", triangle(&[])),
        SceneObject::new("empty_slot", triangle(&["", "Ice"])),
    ];

    Exporter::new(identity_options())?.export(&objects, &path)?;
    let document = import_map_file(&path)?;

    assert_eq!(document.materials, vec!["Lava", FALLBACK_MATERIAL, "Ice"]);
    let names: Vec<&str> = document
        .faces
        .iter()
        .map(|f| document.materials[f.material].as_str())
        .collect();
    assert_eq!(names, vec!["Lava", FALLBACK_MATERIAL, FALLBACK_MATERIAL]);
    Ok(())
}

#[test]
fn test_scene_without_any_materials_is_still_valid() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("plain.n");
    let objects = [SceneObject::new(
        "plain",
        SourceMesh {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            faces: vec![Face::flat(vec![0, 1, 2])],
            ..Default::default()
        },
    )];

    Exporter::new(identity_options())?.export(&objects, &path)?;
    let document = import_map_file(&path)?;

    assert_eq!(document.materials, vec![FALLBACK_MATERIAL]);
    assert!(document
        .faces
        .iter()
        .all(|f| f.material < document.materials.len()));
    Ok(())
}

#[test]
fn test_selection_only_exports_selected_objects() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("selected.n");
    let cube = || worldmesh::geometry::Primitive::cube([1.0, 1.0, 1.0], true).to_mesh();
    let objects = [
        SceneObject::new("kept", cube()).selected(true),
        SceneObject::new("ignored", cube()),
    ];
    let options = ExportOptions {
        selection_only: true,
        ..identity_options()
    };

    let report = Exporter::new(options)?.export(&objects, &path)?;
    assert_eq!(report.objects, vec!["kept".to_string()]);
    assert_eq!(import_map_file(&path)?.faces.len(), 6);
    Ok(())
}

#[test]
fn test_missing_output_directory_is_an_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("out.n");
    let objects: Vec<SceneObject> = Vec::new();

    for atomic in [true, false] {
        let options = ExportOptions {
            atomic_write: atomic,
            ..identity_options()
        };
        let result = Exporter::new(options).unwrap().export(&objects, &path);
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}

#[test]
fn test_exported_file_matches_welded_counts() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("cube.n");
    let cube = worldmesh::geometry::Primitive::cube([2.0, 2.0, 2.0], true)
        .smooth(true)
        .to_mesh();
    let objects = [SceneObject::new("cube", cube)];

    let report = Exporter::new(identity_options())?.export(&objects, &path)?;
    let document = import_map_file(&path)?;
    document.validate()?;

    assert_eq!(document.vertices.len(), report.vertex_count);
    assert_eq!(document.faces.len(), report.face_count);
    assert_eq!(document.corner_count(), report.corner_count);
    // Smooth corners share a normal per vertex; only UV seams split them.
    // Bottom corners see two distinct UVs across their sides, top corners three.
    assert_eq!(report.vertex_count, 4 * 2 + 4 * 3);
    Ok(())
}
