// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Compute precision requested from a backend.

/// The numeric precision a backend is asked to run a model in.
///
/// Only some backends accept reduced precision; the resolver rejects
/// unsupported combinations instead of falling back to [`Precision::Fp32`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Full 32-bit floating point (the backend default).
    #[default]
    #[serde(alias = "default")]
    Fp32,
    /// 16-bit floating point.
    Fp16,
    /// 16-bit integer, used by vendor accelerators.
    Int16,
}

impl Precision {
    /// All precisions in declaration order.
    pub const ALL: [Precision; 3] = [Precision::Fp32, Precision::Fp16, Precision::Int16];

    /// Parses a precision name. Accepts `"default"` as an alias of `"fp32"`.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fp32" | "f32" | "float32" | "default" => Some(Self::Fp32),
            "fp16" | "f16" | "half" | "float16" => Some(Self::Fp16),
            "int16" | "i16" => Some(Self::Int16),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            Precision::Fp32 => "fp32",
            Precision::Fp16 => "fp16",
            Precision::Int16 => "int16",
        }
    }

    /// Returns `true` for anything narrower than the fp32 default.
    pub fn is_reduced(self) -> bool {
        !matches!(self, Precision::Fp32)
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
