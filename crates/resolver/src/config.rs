// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Resolution requests loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! backend = "tensorrt"
//! model_dir = "./models/sd15"
//! model_prefix = "unet"
//! model_format = "native"
//! device_id = 0
//! precision = "fp16"
//!
//! [shape_hint.latent_input]
//! min_shape = [1, 4, 64, 64]
//! max_shape = [2, 4, 64, 64]
//!
//! [options]
//! workspace = "1G"
//! ```

use crate::{BackendOptions, ResolveError};
use model_locator::{ModelFormat, ModelLocator, DEFAULT_FILE_STEM};
use std::path::{Path, PathBuf};
use tensor_spec::{Precision, ShapeHint};

fn default_file_stem() -> String {
    DEFAULT_FILE_STEM.to_string()
}

/// Everything needed to resolve one model's runtime configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveRequest {
    /// Backend name; any alias from the compatibility table.
    pub backend: String,
    /// Directory holding one sub-directory per model.
    pub model_dir: PathBuf,
    /// Sub-directory of this model (may be empty).
    #[serde(default)]
    pub model_prefix: String,
    pub model_format: ModelFormat,
    /// Stem shared by the model files.
    #[serde(default = "default_file_stem")]
    pub file_stem: String,
    /// `-1` for the CPU, otherwise an accelerated device index.
    #[serde(default)]
    pub device_id: i32,
    #[serde(default)]
    pub precision: Precision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_hint: Option<ShapeHint>,
    #[serde(default)]
    pub options: BackendOptions,
}

impl ResolveRequest {
    /// Creates a request with default precision, device 0, no shape hint and
    /// default options.
    pub fn new(
        backend: impl Into<String>,
        model_dir: impl Into<PathBuf>,
        model_prefix: impl Into<String>,
        model_format: ModelFormat,
    ) -> Self {
        Self {
            backend: backend.into(),
            model_dir: model_dir.into(),
            model_prefix: model_prefix.into(),
            model_format,
            file_stem: default_file_stem(),
            device_id: 0,
            precision: Precision::default(),
            shape_hint: None,
            options: BackendOptions::default(),
        }
    }

    pub fn with_device_id(mut self, device_id: i32) -> Self {
        self.device_id = device_id;
        self
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_shape_hint(mut self, hint: ShapeHint) -> Self {
        self.shape_hint = Some(hint);
        self
    }

    pub fn with_options(mut self, options: BackendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }

    /// The model location described by this request.
    pub fn locator(&self) -> ModelLocator {
        ModelLocator::new(&self.model_dir, &self.model_prefix, self.model_format)
            .with_file_stem(&self.file_stem)
    }

    /// Loads a request from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ResolveError> {
        let content = read_config(path)?;
        parse_toml(&content, &path.display().to_string())
    }

    /// Parses a request from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ResolveError> {
        parse_toml(toml_str, "<toml>")
    }

    /// Serialises the request to TOML.
    pub fn to_toml(&self) -> Result<String, ResolveError> {
        to_toml(self)
    }
}

pub(crate) fn read_config(path: &Path) -> Result<String, ResolveError> {
    std::fs::read_to_string(path).map_err(|e| ResolveError::Config {
        origin: path.display().to_string(),
        detail: format!("cannot read file: {e}"),
    })
}

pub(crate) fn parse_toml<T: serde::de::DeserializeOwned>(
    toml_str: &str,
    origin: &str,
) -> Result<T, ResolveError> {
    toml::from_str(toml_str).map_err(|e| ResolveError::Config {
        origin: origin.to_string(),
        detail: format!("TOML parse error: {e}"),
    })
}

pub(crate) fn to_toml<T: serde::Serialize>(value: &T) -> Result<String, ResolveError> {
    toml::to_string_pretty(value).map_err(|e| ResolveError::Config {
        origin: "<toml>".to_string(),
        detail: format!("TOML serialise error: {e}"),
    })
}
