// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Deterministic model file path computation.
//!
//! A model lives under `{model_dir}/{model_prefix}/` and is made of files
//! sharing one stem (`inference` unless configured otherwise):
//!
//! ```text
//! m/unet/inference.pdmodel      graph      (native)
//! m/unet/inference.pdiparams    parameters (native)
//! m/unet/inference.onnx         graph      (interchange)
//! m/unet/inference.trt          compiled-kernel cache
//! ```
//!
//! Paths are computed only. Nothing here opens, creates, or stats a file.

use crate::{LocatorError, ModelFormat};
use std::path::{Component, Path, PathBuf};

/// Default stem shared by every file of a model.
pub const DEFAULT_FILE_STEM: &str = "inference";

/// Extension of the compiled-kernel cache file.
const CACHE_EXT: &str = "trt";

fn default_file_stem() -> String {
    DEFAULT_FILE_STEM.to_string()
}

/// Where a model is stored and in which format.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ModelLocator {
    /// Directory holding one sub-directory per model.
    pub model_dir: PathBuf,
    /// Sub-directory of this model inside `model_dir` (may be empty).
    pub model_prefix: String,
    /// Serialisation format of the model files.
    pub format: ModelFormat,
    /// Stem shared by the model's files.
    #[serde(default = "default_file_stem")]
    pub file_stem: String,
}

/// Concrete file paths for one model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ModelFiles {
    /// Graph file (`.pdmodel` or `.onnx`).
    pub graph: PathBuf,
    /// Parameter file, for formats that keep weights separately.
    pub params: Option<PathBuf>,
    /// Compiled-kernel cache, for backends that compile ahead of time.
    pub cache: Option<PathBuf>,
}

impl ModelLocator {
    /// Creates a locator with the default file stem.
    pub fn new(
        model_dir: impl Into<PathBuf>,
        model_prefix: impl Into<String>,
        format: ModelFormat,
    ) -> Self {
        Self {
            model_dir: model_dir.into(),
            model_prefix: model_prefix.into(),
            format,
            file_stem: default_file_stem(),
        }
    }

    /// Replaces the file stem (e.g. `"model"` for `model.pdmodel`).
    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }

    /// Checks that the prefix stays inside `model_dir` and the stem is a
    /// plain file name.
    pub fn validate(&self) -> Result<(), LocatorError> {
        let escapes = Path::new(&self.model_prefix).components().any(|c| {
            matches!(
                c,
                Component::RootDir | Component::Prefix(_) | Component::ParentDir
            )
        });
        if escapes {
            return Err(LocatorError::PrefixEscapesDir {
                prefix: self.model_prefix.clone(),
            });
        }

        let stem = self.file_stem.as_str();
        if stem.is_empty() || stem == "." || stem == ".." || stem.contains(['/', '\\']) {
            return Err(LocatorError::InvalidFileStem {
                stem: self.file_stem.clone(),
            });
        }

        Ok(())
    }

    /// Directory containing this model's files.
    pub fn model_root(&self) -> PathBuf {
        if self.model_prefix.is_empty() {
            self.model_dir.clone()
        } else {
            self.model_dir.join(&self.model_prefix)
        }
    }

    /// Computes the model's file paths.
    ///
    /// `with_cache` adds the compiled-kernel cache path; the caller decides
    /// based on the backend.
    pub fn files(&self, with_cache: bool) -> Result<ModelFiles, LocatorError> {
        self.validate()?;

        let root = self.model_root();
        let file = |ext: &str| root.join(format!("{}.{ext}", self.file_stem));

        Ok(ModelFiles {
            graph: file(self.format.graph_extension()),
            params: self.format.params_extension().map(file),
            cache: with_cache.then(|| file(CACHE_EXT)),
        })
    }
}

impl std::fmt::Display for ModelLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, stem '{}')",
            self.model_root().display(),
            self.format,
            self.file_stem
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(parts: &[&str]) -> PathBuf {
        parts.iter().collect()
    }

    #[test]
    fn test_native_paths() {
        let files = ModelLocator::new("m", "unet", ModelFormat::Native)
            .files(true)
            .unwrap();
        assert_eq!(files.graph, p(&["m", "unet", "inference.pdmodel"]));
        assert_eq!(files.params, Some(p(&["m", "unet", "inference.pdiparams"])));
        assert_eq!(files.cache, Some(p(&["m", "unet", "inference.trt"])));
    }

    #[test]
    fn test_interchange_paths() {
        let files = ModelLocator::new("m", "vae_decoder", ModelFormat::Interchange)
            .files(false)
            .unwrap();
        assert_eq!(files.graph, p(&["m", "vae_decoder", "inference.onnx"]));
        assert_eq!(files.params, None);
        assert_eq!(files.cache, None);
    }

    #[test]
    fn test_empty_prefix_and_custom_stem() {
        let files = ModelLocator::new("mobilenetv2", "", ModelFormat::Native)
            .with_file_stem("model")
            .files(false)
            .unwrap();
        assert_eq!(files.graph, p(&["mobilenetv2", "model.pdmodel"]));
        assert_eq!(files.params, Some(p(&["mobilenetv2", "model.pdiparams"])));
    }

    #[test]
    fn test_nested_prefix() {
        let files = ModelLocator::new("models", "sd/unet", ModelFormat::Interchange)
            .files(false)
            .unwrap();
        assert_eq!(files.graph, p(&["models", "sd", "unet", "inference.onnx"]));
    }

    #[test]
    fn test_prefix_cannot_escape() {
        for prefix in ["../unet", "/abs/unet", "a/../../b"] {
            let err = ModelLocator::new("m", prefix, ModelFormat::Native)
                .files(false)
                .unwrap_err();
            assert_eq!(err.field(), "model_prefix");
            assert_eq!(err.value(), prefix);
        }
    }

    #[test]
    fn test_bad_stem() {
        for stem in ["", "a/b", ".."] {
            let err = ModelLocator::new("m", "unet", ModelFormat::Native)
                .with_file_stem(stem)
                .validate()
                .unwrap_err();
            assert!(matches!(err, LocatorError::InvalidFileStem { .. }));
        }
    }

    #[test]
    fn test_paths_are_deterministic() {
        let loc = ModelLocator::new("m", "text_encoder", ModelFormat::Native);
        assert_eq!(loc.files(true).unwrap(), loc.files(true).unwrap());
    }

    #[test]
    fn test_toml_default_stem() {
        let loc: ModelLocator = toml::from_str(
            r#"
model_dir = "m"
model_prefix = "unet"
format = "paddle"
"#,
        )
        .unwrap();
        assert_eq!(loc.file_stem, "inference");
        assert_eq!(loc.format, ModelFormat::Native);
    }
}
