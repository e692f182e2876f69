// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! World mesh (.n) parser using pest

use crate::error::{ExportError, Result};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Parser)]
#[grammar = "io/map.pest"]
struct MapParser;

/// Floats per vertex line: position, normal, uv, color
pub const VERTEX_STRIDE: usize = 12;

/// Parsed contents of a map file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub materials: Vec<String>,
    pub vertices: Vec<[f64; VERTEX_STRIDE]>,
    pub faces: Vec<MapFace>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapFace {
    pub indices: Vec<usize>,
    pub material: usize,
}

impl MapDocument {
    /// Check that every face index points into the vertex array.
    pub fn validate(&self) -> Result<()> {
        for (i, face) in self.faces.iter().enumerate() {
            if let Some(index) = face.indices.iter().find(|&&x| x >= self.vertices.len()) {
                return Err(ExportError::parse(format!(
                    "face {} refers to vertex {} but only {} exist",
                    i,
                    index,
                    self.vertices.len()
                )));
            }
        }
        Ok(())
    }

    pub fn corner_count(&self) -> usize {
        self.faces.iter().map(|f| f.indices.len()).sum()
    }
}

/// Parse map source text
pub fn parse_map(source: &str) -> Result<MapDocument> {
    let map = MapParser::parse(Rule::map, source)
        .map_err(|e| ExportError::parse(e.to_string()))?
        .next()
        .ok_or_else(|| ExportError::parse("empty document"))?;

    let mut document = MapDocument::default();
    for section in map.into_inner() {
        match section.as_rule() {
            Rule::materials => {
                document.materials = section
                    .into_inner()
                    .map(|name| name.as_str().trim_end().to_string())
                    .collect();
            }
            Rule::vertices => {
                for line in section.into_inner() {
                    document.vertices.push(parse_vertex_line(line)?);
                }
            }
            Rule::faces => {
                for face in section.into_inner() {
                    document.faces.push(parse_face(face)?);
                }
            }
            _ => {}
        }
    }
    Ok(document)
}

/// Read and parse a map file
pub fn import_map_file(path: impl AsRef<Path>) -> Result<MapDocument> {
    let source = fs::read_to_string(path.as_ref())?;
    parse_map(&source)
}

fn parse_vertex_line(line: Pair<Rule>) -> Result<[f64; VERTEX_STRIDE]> {
    let (row, _) = line.line_col();
    let values = line
        .into_inner()
        .map(|value| {
            value
                .as_str()
                .parse::<f64>()
                .map_err(|e| ExportError::parse(format!("line {}: {}", row, e)))
        })
        .collect::<Result<Vec<f64>>>()?;

    values.as_slice().try_into().map_err(|_| {
        ExportError::parse(format!(
            "line {}: expected {} values per vertex, found {}",
            row,
            VERTEX_STRIDE,
            values.len()
        ))
    })
}

fn parse_face(face: Pair<Rule>) -> Result<MapFace> {
    let mut indices = Vec::new();
    let mut material = 0;
    for part in face.into_inner() {
        match part.as_rule() {
            Rule::index_line => {
                for index in part.into_inner() {
                    indices.push(parse_uint(index)?);
                }
            }
            Rule::uint => material = parse_uint(part)?,
            _ => {}
        }
    }
    Ok(MapFace { indices, material })
}

fn parse_uint(pair: Pair<Rule>) -> Result<usize> {
    let (row, _) = pair.line_col();
    pair.as_str()
        .parse()
        .map_err(|e| ExportError::parse(format!("line {}: {}", row, e)))
}
