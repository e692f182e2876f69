// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use crate::error::ConfigError;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed-point scale of attribute keys: six decimal digits.
pub const KEY_SCALE: f64 = 1e6;

/// Round a value to six decimal digits and return it as a fixed-point integer
/// scaled by [`KEY_SCALE`].
///
/// Values that round to the same integer compare equal, so `0.0` and `-0.0` collapse.
/// NaN quantizes to 0.
pub fn quantize(value: f64) -> i64 {
    (value * KEY_SCALE).round() as i64
}

pub fn quantize2(v: [f64; 2]) -> [i64; 2] {
    [quantize(v[0]), quantize(v[1])]
}

pub fn quantize3(v: &Vector3<f64>) -> [i64; 3] {
    [quantize(v.x), quantize(v.y), quantize(v.z)]
}

pub fn quantize4(v: [f64; 4]) -> [i64; 4] {
    [quantize(v[0]), quantize(v[1]), quantize(v[2]), quantize(v[3])]
}

/// Unnormalized polygon normal (Newell's method). Its length is twice the polygon area.
pub fn newell_normal<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Vector3<f64> {
    let points: Vec<&Point3<f64>> = points.into_iter().collect();
    let mut normal = Vector3::zeros();
    for (i, current) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}

/// Normalize, mapping degenerate vectors to zero instead of NaN.
pub fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// Signed coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "X")]
    X,
    #[serde(rename = "Y")]
    Y,
    #[serde(rename = "Z")]
    Z,
    #[serde(rename = "-X")]
    NegX,
    #[serde(rename = "-Y")]
    NegY,
    #[serde(rename = "-Z")]
    NegZ,
}

impl Axis {
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
            Axis::NegX => -Vector3::x(),
            Axis::NegY => -Vector3::y(),
            Axis::NegZ => -Vector3::z(),
        }
    }

    fn component(self) -> usize {
        match self {
            Axis::X | Axis::NegX => 0,
            Axis::Y | Axis::NegY => 1,
            Axis::Z | Axis::NegZ => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::NegX => "-X",
            Axis::NegY => "-Y",
            Axis::NegZ => "-Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "X" => Ok(Axis::X),
            "Y" => Ok(Axis::Y),
            "Z" => Ok(Axis::Z),
            "-X" => Ok(Axis::NegX),
            "-Y" => Ok(Axis::NegY),
            "-Z" => Ok(Axis::NegZ),
            _ => Err(ConfigError::UnknownAxis(s.to_string())),
        }
    }
}

/// Authoring frame the conversion starts from.
pub const SOURCE_FORWARD: Axis = Axis::Y;
pub const SOURCE_UP: Axis = Axis::Z;

pub const MIN_SCALE: f64 = 0.01;
pub const MAX_SCALE: f64 = 1000.0;

/// Axis remapping followed by a uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisConversion {
    pub forward: Axis,
    pub up: Axis,
    pub scale: f64,
}

impl AxisConversion {
    pub fn new(forward: Axis, up: Axis, scale: f64) -> Result<Self, ConfigError> {
        if forward.component() == up.component() {
            return Err(ConfigError::ParallelAxes { forward, up });
        }
        if !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
            return Err(ConfigError::ScaleOutOfRange { scale });
        }
        Ok(Self { forward, up, scale })
    }

    /// Rotation taking the authoring frame (forward Y, up Z) onto (forward, up).
    pub fn rotation(&self) -> Matrix3<f64> {
        frame(self.forward, self.up) * frame(SOURCE_FORWARD, SOURCE_UP).transpose()
    }

    pub fn to_matrix4(&self) -> Matrix4<f64> {
        (self.rotation() * self.scale).to_homogeneous()
    }
}

impl Default for AxisConversion {
    fn default() -> Self {
        Self {
            forward: Axis::X,
            up: Axis::Y,
            scale: 5.0,
        }
    }
}

// Columns are (right, forward, up) with right = forward x up.
fn frame(forward: Axis, up: Axis) -> Matrix3<f64> {
    let f = forward.unit();
    let u = up.unit();
    Matrix3::from_columns(&[f.cross(&u), f, u])
}
