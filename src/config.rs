// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export configuration: requested options in, effective options out

use crate::error::ConfigError;
use crate::geometry::CombinedMesh;
use crate::utils::math::{Axis, AxisConversion};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_INCLUDE_UV: &str = "WORLDMESH_INCLUDE_UV";
pub const ENV_INCLUDE_COLOR: &str = "WORLDMESH_INCLUDE_COLOR";
pub const ENV_SELECTION_ONLY: &str = "WORLDMESH_SELECTION_ONLY";
pub const ENV_APPLY_MODIFIERS: &str = "WORLDMESH_APPLY_MODIFIERS";
pub const ENV_SCALE: &str = "WORLDMESH_SCALE";

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "worldmesh.toml";

/// Export options as requested by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Export the active UV layer if the mesh has one
    pub include_uv: bool,
    /// Export the active color layer if the mesh has one
    pub include_color: bool,
    /// Only assemble selected objects
    pub selection_only: bool,
    /// Use modifier-evaluated meshes where available
    pub apply_modifiers: bool,
    pub axis_forward: Axis,
    pub axis_up: Axis,
    pub global_scale: f64,
    /// Write through a temporary file and rename on success
    pub atomic_write: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        let conversion = AxisConversion::default();
        Self {
            include_uv: true,
            include_color: true,
            selection_only: false,
            apply_modifiers: true,
            axis_forward: conversion.forward,
            axis_up: conversion.up,
            global_scale: conversion.scale,
            atomic_write: true,
        }
    }
}

impl ExportOptions {
    /// Load options from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or from `worldmesh.toml` if it exists, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut options = match path {
            Some(path) => Self::from_file(path)?,
            None if PathBuf::from(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        options.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(options)
    }

    /// Apply overrides from a variable lookup (the process environment in [`Self::load`]).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        for (var, flag) in [
            (ENV_INCLUDE_UV, &mut self.include_uv),
            (ENV_INCLUDE_COLOR, &mut self.include_color),
            (ENV_SELECTION_ONLY, &mut self.selection_only),
            (ENV_APPLY_MODIFIERS, &mut self.apply_modifiers),
        ] {
            if let Some(value) = lookup(var) {
                *flag = parse_bool(var, &value)?;
            }
        }

        if let Some(value) = lookup(ENV_SCALE) {
            self.global_scale = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_SCALE.to_string(),
                value,
            })?;
        }
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        use anyhow::Context;

        let content = toml::to_string_pretty(self).context("Failed to serialize options")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Validated axis/scale conversion for these options.
    pub fn conversion(&self) -> Result<AxisConversion, ConfigError> {
        AxisConversion::new(self.axis_forward, self.axis_up, self.global_scale)
    }

    /// Downgrade the channel flags against what the mesh actually carries.
    pub fn resolve(&self, mesh: &CombinedMesh) -> EffectiveOptions {
        let include_uv = self.include_uv && mesh.has_uv();
        let include_color = self.include_color && mesh.has_colors();

        if self.include_uv && !include_uv {
            debug!("No active UV channel, exporting without UVs");
        }
        if self.include_color && !include_color {
            debug!("No active color channel, exporting opaque white");
        }

        EffectiveOptions {
            include_uv,
            include_color,
        }
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Channel flags after resolution; the welder only ever sees these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveOptions {
    pub include_uv: bool,
    pub include_color: bool,
}

impl EffectiveOptions {
    pub fn none() -> Self {
        Self {
            include_uv: false,
            include_color: false,
        }
    }
}
