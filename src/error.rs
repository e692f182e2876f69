// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for assembly, welding, export and configuration

use crate::utils::math::Axis;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that abort an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output sink could not be opened or a write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The temporary file could not be renamed over the target.
    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The combined mesh references corners, vertices or channel entries that do not exist.
    #[error("malformed mesh: {message}")]
    MalformedMesh { message: String },

    /// A material name cannot be represented on a single line of the map grammar.
    #[error("invalid material name in slot {slot} ({name:?}): {reason}")]
    InvalidMaterialName {
        slot: usize,
        name: String,
        reason: &'static str,
    },

    /// A scene description could not be read or decoded.
    #[error("failed to load scene {path}: {message}")]
    Scene { path: PathBuf, message: String },

    /// A map file does not follow the grammar.
    #[error("failed to parse map file: {message}")]
    Parse { message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ExportError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMesh {
            message: message.into(),
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// A source object that could not produce mesh data. Never fatal: the assembler skips the object.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    #[error("object {object:?} has no mesh data")]
    NoMeshData { object: String },

    #[error("object {object:?} has an invalid mesh: {message}")]
    InvalidMesh { object: String, message: String },
}

/// Invalid export options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("forward axis {forward} and up axis {up} must be on different axes")]
    ParallelAxes { forward: Axis, up: Axis },

    #[error("global scale {scale} is outside [0.01, 1000]")]
    ScaleOutOfRange { scale: f64 },

    #[error("unknown axis {0:?} (expected X, Y, Z, -X, -Y or -Z)")]
    UnknownAxis(String),

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: String, value: String },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
