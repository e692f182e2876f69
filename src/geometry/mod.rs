// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation, assembly and welding

mod assembler;
mod mesh;
mod primitives;
mod weld;

pub use assembler::{assemble, AssembledScene, AssemblyOptions, MeshSource, SkippedObject};
pub use mesh::{
    CombinedMesh, Face, MaterialTable, Polygon, SourceMesh, DEFAULT_COLOR, DEFAULT_UV,
    FALLBACK_MATERIAL,
};
pub use primitives::Primitive;
pub use weld::{weld, AttributeKey, OutputFace, OutputVertex, WeldedMesh};
