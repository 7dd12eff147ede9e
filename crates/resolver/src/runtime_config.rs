// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The resolved, validated runtime configuration.

use crate::BackendSettings;
use backend_registry::{BackendChoice, DeviceSelector};
use model_locator::{ModelFiles, ModelLocator};
use std::fmt;
use tensor_spec::{Precision, ShapeHint};

/// A fully validated description of how one model is to be loaded.
///
/// Only [`crate::resolve`] (and [`crate::ResolveRequest::resolve`]) can build
/// one, so holding a `RuntimeConfig` means every compatibility check has
/// passed. It is consumed by value by a [`crate::RuntimeFactory`] and is not
/// `Clone`.
#[derive(Debug, PartialEq, serde::Serialize)]
pub struct RuntimeConfig {
    backend: BackendChoice,
    device: DeviceSelector,
    device_id: i32,
    precision: Precision,
    shape_hint: ShapeHint,
    locator: ModelLocator,
    files: ModelFiles,
    settings: BackendSettings,
}

impl RuntimeConfig {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        backend: BackendChoice,
        device: DeviceSelector,
        device_id: i32,
        precision: Precision,
        shape_hint: ShapeHint,
        locator: ModelLocator,
        files: ModelFiles,
        settings: BackendSettings,
    ) -> Self {
        Self {
            backend,
            device,
            device_id,
            precision,
            shape_hint,
            locator,
            files,
            settings,
        }
    }

    pub fn backend(&self) -> BackendChoice {
        self.backend
    }

    pub fn device(&self) -> DeviceSelector {
        self.device
    }

    /// The device id exactly as requested.
    pub fn device_id(&self) -> i32 {
        self.device_id
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Shape ranges for compiled backends. Empty for every other backend.
    pub fn shape_hint(&self) -> &ShapeHint {
        &self.shape_hint
    }

    pub fn locator(&self) -> &ModelLocator {
        &self.locator
    }

    pub fn files(&self) -> &ModelFiles {
        &self.files
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    /// True for a shape-specialising backend given no shape ranges, which
    /// then compiles for fully dynamic inputs.
    pub fn is_fully_dynamic(&self) -> bool {
        self.backend.capabilities().shape_specialization && self.shape_hint.is_empty()
    }

    /// One-line human-readable description.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "{} on {} ({}) for {}",
            self.backend, self.device, self.precision, self.locator
        );
        if !self.shape_hint.is_empty() {
            s.push_str(&format!(", {} shape hint(s)", self.shape_hint.len()));
        } else if self.is_fully_dynamic() {
            s.push_str(", fully dynamic shapes");
        }
        s
    }
}

impl fmt::Display for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "backend:   {}", self.backend)?;
        writeln!(f, "device:    {} (id {})", self.device, self.device_id)?;
        writeln!(f, "precision: {}", self.precision)?;
        writeln!(f, "graph:     {}", self.files.graph.display())?;
        if let Some(params) = &self.files.params {
            writeln!(f, "params:    {}", params.display())?;
        }
        if let Some(cache) = &self.files.cache {
            writeln!(f, "cache:     {}", cache.display())?;
        }
        for (input, range) in self.shape_hint.iter() {
            writeln!(f, "shape:     {input} {range}")?;
        }
        write!(f, "settings:  {}", self.settings)
    }
}
