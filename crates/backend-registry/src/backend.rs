// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Backend categories and name parsing.

use crate::capability::{Capabilities, CAPABILITIES};
use crate::RegistryError;

/// The category of engine a model is handed to.
///
/// Many engine names map onto the same category (for instance `"paddle"`
/// and `"onnx_runtime"` are both [`BackendChoice::AcceleratedGeneric`]);
/// the accepted names are listed in the capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendChoice {
    /// General-purpose engine restricted to the host CPU.
    CpuGeneric,
    /// General-purpose engine on a GPU, with CPU fallback.
    AcceleratedGeneric,
    /// Ahead-of-time compiled engine specialised for input shapes. GPU only.
    #[serde(rename = "accelerated-tensor-compiled")]
    TensorCompiled,
    /// Vendor accelerator SDK. Accelerator card only.
    #[serde(rename = "accelerator-vendor-specific")]
    VendorAccelerator,
}

impl BackendChoice {
    /// All backends in table order.
    pub const ALL: [BackendChoice; 4] = [
        BackendChoice::CpuGeneric,
        BackendChoice::AcceleratedGeneric,
        BackendChoice::TensorCompiled,
        BackendChoice::VendorAccelerator,
    ];

    /// Looks a backend up by any of its registered names.
    ///
    /// Matching ignores case, surrounding whitespace, and treats `_` like `-`.
    pub fn from_str_loose(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace('_', "-");
        CAPABILITIES
            .iter()
            .find(|caps| caps.names.iter().any(|n| *n == normalized))
            .map(|caps| caps.backend)
    }

    /// Like [`BackendChoice::from_str_loose`] but returns a descriptive error.
    pub fn parse(name: &str) -> Result<Self, RegistryError> {
        Self::from_str_loose(name).ok_or_else(|| RegistryError::UnknownBackend {
            name: name.to_string(),
            expected: Self::ALL
                .iter()
                .map(|b| b.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        self.capabilities().names[0]
    }

    /// This backend's row of the compatibility table.
    pub fn capabilities(self) -> &'static Capabilities {
        Capabilities::lookup(self)
    }
}

impl std::str::FromStr for BackendChoice {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
