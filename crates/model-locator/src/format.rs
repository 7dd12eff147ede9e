// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! On-disk model formats.

/// Graph file extension for the native format.
pub(crate) const NATIVE_GRAPH_EXT: &str = "pdmodel";

/// Parameter file extension for the native format.
pub(crate) const NATIVE_PARAMS_EXT: &str = "pdiparams";

/// Single-file extension for the interchange format.
pub(crate) const INTERCHANGE_EXT: &str = "onnx";

/// How a model is serialised on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Separate graph (`.pdmodel`) and parameter (`.pdiparams`) files.
    #[serde(alias = "paddle")]
    Native,
    /// A single self-contained `.onnx` file.
    #[serde(alias = "onnx")]
    Interchange,
}

impl ModelFormat {
    /// All formats in declaration order.
    pub const ALL: [ModelFormat; 2] = [ModelFormat::Native, ModelFormat::Interchange];

    /// Parses a format name. Accepts `"native"`/`"paddle"` and
    /// `"interchange"`/`"onnx"`, case-insensitively.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "native" | "paddle" | "pdmodel" => Some(Self::Native),
            "interchange" | "onnx" => Some(Self::Interchange),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Interchange => "interchange",
        }
    }

    /// Extension of the graph file for this format.
    pub fn graph_extension(self) -> &'static str {
        match self {
            Self::Native => NATIVE_GRAPH_EXT,
            Self::Interchange => INTERCHANGE_EXT,
        }
    }

    /// Extension of the separate parameter file, if the format has one.
    pub fn params_extension(self) -> Option<&'static str> {
        match self {
            Self::Native => Some(NATIVE_PARAMS_EXT),
            Self::Interchange => None,
        }
    }
}

impl std::fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
