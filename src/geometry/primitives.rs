// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator

use super::{Face, SourceMesh};

/// Geometric primitives
pub enum Primitive {
    /// Box of quads with a UV island per side
    Cube { size: [f64; 3], center: bool, smooth: bool },
    /// Plane of `cells x cells` quads in z = 0, UV spanning [0, 1]
    Grid { size: f64, cells: usize, smooth: bool },
}

impl Primitive {
    pub fn cube(size: [f64; 3], center: bool) -> Self {
        Self::Cube {
            size,
            center,
            smooth: false,
        }
    }

    pub fn grid(size: f64, cells: usize) -> Self {
        Self::Grid {
            size,
            cells: cells.max(1),
            smooth: true,
        }
    }

    pub fn smooth(self, smooth: bool) -> Self {
        match self {
            Self::Cube { size, center, .. } => Self::Cube {
                size,
                center,
                smooth,
            },
            Self::Grid { size, cells, .. } => Self::Grid {
                size,
                cells,
                smooth,
            },
        }
    }

    pub fn to_mesh(&self) -> SourceMesh {
        match self {
            Self::Cube {
                size,
                center,
                smooth,
            } => generate_cube_mesh(*size, *center, *smooth),
            Self::Grid {
                size,
                cells,
                smooth,
            } => generate_grid_mesh(*size, *cells, *smooth),
        }
    }
}

fn generate_cube_mesh(size: [f64; 3], center: bool, smooth: bool) -> SourceMesh {
    let offset = |extent: f64| if center { -extent / 2.0 } else { 0.0 };
    let (min_x, min_y, min_z) = (offset(size[0]), offset(size[1]), offset(size[2]));
    let (max_x, max_y, max_z) = (min_x + size[0], min_y + size[1], min_z + size[2]);

    let mut mesh = SourceMesh::new();
    for position in [
        [min_x, min_y, min_z],
        [max_x, min_y, min_z],
        [max_x, max_y, min_z],
        [min_x, max_y, min_z],
        [min_x, min_y, max_z],
        [max_x, min_y, max_z],
        [max_x, max_y, max_z],
        [min_x, max_y, max_z],
    ] {
        mesh.add_vertex(position);
    }

    // Counter-clockwise seen from outside
    let sides = [
        [4, 5, 6, 7], // z+
        [1, 0, 3, 2], // z-
        [5, 1, 2, 6], // x+
        [0, 4, 7, 3], // x-
        [7, 6, 2, 3], // y+
        [0, 1, 5, 4], // y-
    ];

    let island = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    let mut uv = Vec::with_capacity(24);
    for side in sides {
        mesh.add_face(Face::new(side.to_vec(), smooth, 0));
        uv.extend_from_slice(&island);
    }
    mesh.uv = Some(uv);
    mesh
}

fn generate_grid_mesh(size: f64, cells: usize, smooth: bool) -> SourceMesh {
    let mut mesh = SourceMesh::new();
    let step = size / cells as f64;
    let row = cells + 1;

    for j in 0..=cells {
        for i in 0..=cells {
            mesh.add_vertex([i as f64 * step, j as f64 * step, 0.0]);
        }
    }

    let mut uv = Vec::with_capacity(cells * cells * 4);
    for j in 0..cells {
        for i in 0..cells {
            let corners = [
                j * row + i,
                j * row + i + 1,
                (j + 1) * row + i + 1,
                (j + 1) * row + i,
            ];
            for &v in &corners {
                let (x, y) = (v % row, v / row);
                uv.push([x as f64 / cells as f64, y as f64 / cells as f64]);
            }
            mesh.add_face(Face::new(corners.to_vec(), smooth, 0));
        }
    }
    mesh.uv = Some(uv);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_generation() {
        let mesh = Primitive::cube([10.0, 10.0, 10.0], true).to_mesh();
        assert_eq!(mesh.positions.len(), 8);
        assert_eq!(mesh.faces.len(), 6);
        assert_eq!(mesh.corner_count(), 24);
        assert!(mesh.faces.iter().all(|f| !f.smooth));
        assert_eq!(mesh.positions[0], [-5.0, -5.0, -5.0]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_grid_generation() {
        let mesh = Primitive::grid(2.0, 4).to_mesh();
        assert_eq!(mesh.positions.len(), 25);
        assert_eq!(mesh.faces.len(), 16);
        assert_eq!(mesh.uv.as_ref().map(Vec::len), Some(64));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_smooth_toggle() {
        let mesh = Primitive::cube([1.0, 1.0, 1.0], false).smooth(true).to_mesh();
        assert!(mesh.faces.iter().all(|f| f.smooth));
    }
}
