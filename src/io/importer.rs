// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene description importer
//!
//! A scene file is JSON:
//!
//! ```json
//! {
//!   "objects": [
//!     {
//!       "name": "Floor",
//!       "selected": true,
//!       "matrix_world": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]],
//!       "mesh": { "positions": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
//!                 "faces": [{ "vertices": [0, 1, 2], "smooth": false }],
//!                 "materials": ["Stone"] },
//!       "evaluated": null
//!     }
//!   ]
//! }
//! ```
//!
//! `matrix_world` is row-major and defaults to identity. An object without a
//! `mesh` (a camera, a light) fails assembly and is skipped.

use crate::error::{AssemblyError, ExportError, Result};
use crate::geometry::{MeshSource, SourceMesh};
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const IDENTITY: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

fn identity() -> [[f64; 4]; 4] {
    IDENTITY
}

/// Objects to export, in scene order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub selected: bool,
    /// Row-major object-to-world transform
    #[serde(default = "identity")]
    pub matrix_world: [[f64; 4]; 4],
    #[serde(default)]
    pub mesh: Option<SourceMesh>,
    /// Mesh with modifiers applied, if the host evaluated one
    #[serde(default)]
    pub evaluated: Option<SourceMesh>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: SourceMesh) -> Self {
        Self {
            name: name.into(),
            selected: false,
            matrix_world: IDENTITY,
            mesh: Some(mesh),
            evaluated: None,
        }
    }

    pub fn with_matrix(mut self, matrix: &Matrix4<f64>) -> Self {
        for (r, row) in self.matrix_world.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = matrix[(r, c)];
            }
        }
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl MeshSource for SceneObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn world_matrix(&self) -> Matrix4<f64> {
        let m = &self.matrix_world;
        Matrix4::from_fn(|r, c| m[r][c])
    }

    fn to_mesh(&self, apply_modifiers: bool) -> std::result::Result<SourceMesh, AssemblyError> {
        let evaluated = self.evaluated.as_ref().filter(|_| apply_modifiers);
        evaluated
            .or(self.mesh.as_ref())
            .cloned()
            .ok_or_else(|| AssemblyError::NoMeshData {
                object: self.name.clone(),
            })
    }
}

/// Decode a scene from JSON text
pub fn parse_scene(source: &str) -> std::result::Result<Scene, serde_json::Error> {
    serde_json::from_str(source)
}

/// Load a scene file
pub fn import_scene_file(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let scene_error = |message: String| ExportError::Scene {
        path: path.to_path_buf(),
        message,
    };
    let source = fs::read_to_string(path).map_err(|e| scene_error(e.to_string()))?;
    parse_scene(&source).map_err(|e| scene_error(e.to_string()))
}
