// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Multi-model pipeline profiles.
//!
//! A pipeline is several models that share a model directory, format and
//! device but may each run on a different backend or precision (a diffusion
//! pipeline runs a text encoder, a denoiser and a decoder). A
//! [`PipelineProfile`] resolves every component up front into a
//! [`PipelinePlan`]; nothing is built unless every component resolves.
//!
//! # TOML Format
//! ```toml
//! name = "stable-diffusion"
//! backend = "tensorrt"
//! model_dir = "./models/sd15"
//! model_format = "native"
//! precision = "fp16"
//!
//! [[component]]
//! name = "text_encoder"
//! model_prefix = "text_encoder"
//! backend = "onnx_runtime"
//! precision = "fp32"
//!
//! [[component]]
//! name = "unet"
//! model_prefix = "unet"
//!
//! [component.shape_hint.latent_input]
//! min_shape = [1, 4, 64, 64]
//! max_shape = [2, 4, 64, 64]
//! ```

use crate::{
    BackendOptions, ByteSize, ResolveError, ResolveRequest, RuntimeConfig, RuntimeFactory,
};
use backend_registry::BackendChoice;
use model_locator::{ModelFormat, DEFAULT_FILE_STEM};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tensor_spec::{Precision, Shape, ShapeHint, ShapeRange};

/// Errors raised while resolving a pipeline profile.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("pipeline '{0}' has no components")]
    Empty(String),

    #[error("component '{0}' is declared more than once")]
    DuplicateComponent(String),

    /// One component failed to resolve.
    #[error("component '{component}': {source}")]
    Component {
        component: String,
        #[source]
        source: ResolveError,
    },
}

/// A runtime factory failed on one component of a plan.
#[derive(Debug, thiserror::Error)]
#[error("failed to build component '{component}': {source}")]
pub struct BuildError<E: std::error::Error + 'static> {
    pub component: String,
    #[source]
    pub source: E,
}

/// One model of a pipeline. Unset fields inherit from the profile.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentProfile {
    pub name: String,
    pub model_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_stem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<Precision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<i32>,
    /// Forwarded only when the component's backend specialises for shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_hint: Option<ShapeHint>,
    /// Replaces the profile's options wholesale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BackendOptions>,
}

impl ComponentProfile {
    pub fn new(name: impl Into<String>, model_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_prefix: model_prefix.into(),
            file_stem: None,
            backend: None,
            precision: None,
            device_id: None,
            shape_hint: None,
            options: None,
        }
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_shape_hint(mut self, hint: ShapeHint) -> Self {
        self.shape_hint = Some(hint);
        self
    }

    pub fn with_options(mut self, options: BackendOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Model sub-directories of the built-in diffusion profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffusionPrefixes {
    pub text_encoder: String,
    pub unet: String,
    pub vae_decoder: String,
}

impl Default for DiffusionPrefixes {
    fn default() -> Self {
        Self {
            text_encoder: "text_encoder".into(),
            unet: "unet".into(),
            vae_decoder: "vae_decoder".into(),
        }
    }
}

/// A set of models resolved together.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineProfile {
    pub name: String,
    /// Default backend for components that do not override it.
    pub backend: String,
    pub model_dir: PathBuf,
    pub model_format: ModelFormat,
    #[serde(default)]
    pub device_id: i32,
    #[serde(default)]
    pub precision: Precision,
    #[serde(default)]
    pub options: BackendOptions,
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentProfile>,
}

impl PipelineProfile {
    /// Creates an empty profile.
    pub fn new(
        name: impl Into<String>,
        backend: impl Into<String>,
        model_dir: impl Into<PathBuf>,
        model_format: ModelFormat,
    ) -> Self {
        Self {
            name: name.into(),
            backend: backend.into(),
            model_dir: model_dir.into(),
            model_format,
            device_id: 0,
            precision: Precision::default(),
            options: BackendOptions::default(),
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: ComponentProfile) -> Self {
        self.components.push(component);
        self
    }

    /// The text-to-image diffusion pipeline: text encoder, denoiser (unet)
    /// and VAE decoder.
    ///
    /// The component mix depends on `backend`:
    /// - tensor-compiled: the text encoder runs on the accelerated generic
    ///   engine at fp32; the VAE decoder gets a 1G workspace.
    /// - vendor accelerator: text encoder and VAE decoder stay at fp32.
    /// - otherwise every component uses `backend` and `precision`.
    ///
    /// The VAE decoder and unet always carry their latent shape ranges; they
    /// are dropped at resolution time for backends that do not use them.
    pub fn stable_diffusion(
        backend: &str,
        model_dir: impl Into<PathBuf>,
        model_format: ModelFormat,
        device_id: i32,
        precision: Precision,
        prefixes: &DiffusionPrefixes,
    ) -> Self {
        let latent = ShapeRange::new(
            Shape::new(vec![1, 4, 64, 64]),
            Some(Shape::new(vec![2, 4, 64, 64])),
            Some(Shape::new(vec![2, 4, 64, 64])),
        );
        let vae_hint = ShapeHint::new().with("latent", latent.clone());
        let unet_hint = ShapeHint::new()
            .with("latent_input", latent)
            .with("timestep", ShapeRange::fixed(Shape::new(vec![1])))
            .with(
                "encoder_embedding",
                ShapeRange::new(
                    Shape::new(vec![1, 77, 768]),
                    Some(Shape::new(vec![2, 77, 768])),
                    Some(Shape::new(vec![2, 77, 768])),
                ),
            );

        let mut text_encoder = ComponentProfile::new("text_encoder", &prefixes.text_encoder);
        let mut vae_decoder = ComponentProfile::new("vae_decoder", &prefixes.vae_decoder)
            .with_shape_hint(vae_hint);
        let unet = ComponentProfile::new("unet", &prefixes.unet).with_shape_hint(unet_hint);

        match BackendChoice::from_str_loose(backend) {
            Some(BackendChoice::TensorCompiled) => {
                text_encoder = text_encoder
                    .with_backend(BackendChoice::AcceleratedGeneric.as_str())
                    .with_precision(Precision::Fp32);
                vae_decoder = vae_decoder.with_options(BackendOptions {
                    workspace: ByteSize::from_gb(1),
                    ..Default::default()
                });
            }
            Some(BackendChoice::VendorAccelerator) => {
                text_encoder = text_encoder.with_precision(Precision::Fp32);
                vae_decoder = vae_decoder.with_precision(Precision::Fp32);
            }
            _ => {}
        }

        let mut profile = Self::new("stable-diffusion", backend, model_dir, model_format)
            .with_component(text_encoder)
            .with_component(vae_decoder)
            .with_component(unet);
        profile.device_id = device_id;
        profile.precision = precision;
        profile
    }

    /// Loads a profile from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ResolveError> {
        let content = crate::config::read_config(path)?;
        crate::config::parse_toml(&content, &path.display().to_string())
    }

    /// Parses a profile from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ResolveError> {
        crate::config::parse_toml(toml_str, "<toml>")
    }

    /// Serialises the profile to TOML.
    pub fn to_toml(&self) -> Result<String, ResolveError> {
        crate::config::to_toml(self)
    }

    /// The fully inherited request for one component.
    ///
    /// A hint meant for a backend that does not use one is still validated
    /// before it is dropped.
    pub fn request_for(&self, component: &ComponentProfile) -> Result<ResolveRequest, ResolveError> {
        let backend = component.backend.as_deref().unwrap_or(&self.backend);

        let specialises = BackendChoice::from_str_loose(backend)
            .map_or(true, |b| b.capabilities().shape_specialization);
        let shape_hint = match &component.shape_hint {
            Some(hint) if !specialises => {
                hint.validate()?;
                tracing::debug!(
                    "component '{}': dropping shape hint, {backend} does not use one",
                    component.name
                );
                None
            }
            other => other.clone(),
        };

        Ok(ResolveRequest {
            backend: backend.to_string(),
            model_dir: self.model_dir.clone(),
            model_prefix: component.model_prefix.clone(),
            model_format: self.model_format,
            file_stem: component
                .file_stem
                .clone()
                .unwrap_or_else(|| DEFAULT_FILE_STEM.to_string()),
            device_id: component.device_id.unwrap_or(self.device_id),
            precision: component.precision.unwrap_or(self.precision),
            shape_hint,
            options: component
                .options
                .clone()
                .unwrap_or_else(|| self.options.clone()),
        })
    }

    /// Resolves every component, failing on the first that does not.
    pub fn resolve(&self) -> Result<PipelinePlan, PipelineError> {
        if self.components.is_empty() {
            return Err(PipelineError::Empty(self.name.clone()));
        }

        let mut seen = HashSet::new();
        let mut components = Vec::with_capacity(self.components.len());
        for component in &self.components {
            if !seen.insert(component.name.as_str()) {
                return Err(PipelineError::DuplicateComponent(component.name.clone()));
            }
            let config = self
                .request_for(component)
                .and_then(|request| request.resolve())
                .map_err(|source| PipelineError::Component {
                    component: component.name.clone(),
                    source,
                })?;
            components.push(PlannedComponent {
                name: component.name.clone(),
                config,
            });
        }

        tracing::info!(
            "pipeline '{}' resolved: {} component(s)",
            self.name,
            components.len()
        );
        Ok(PipelinePlan {
            name: self.name.clone(),
            components,
        })
    }
}

/// One resolved component of a [`PipelinePlan`].
#[derive(Debug, PartialEq, serde::Serialize)]
pub struct PlannedComponent {
    pub name: String,
    pub config: RuntimeConfig,
}

/// Every component of a pipeline, resolved, in declaration order.
#[derive(Debug, PartialEq, serde::Serialize)]
pub struct PipelinePlan {
    name: String,
    components: Vec<PlannedComponent>,
}

impl PipelinePlan {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[PlannedComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Looks a component's config up by name.
    pub fn get(&self, name: &str) -> Option<&RuntimeConfig> {
        self.components
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.config)
    }

    /// Hands each config to `factory` once, in order.
    pub fn build<F: RuntimeFactory>(
        self,
        factory: &F,
    ) -> Result<Vec<(String, F::Handle)>, BuildError<F::Error>> {
        self.components
            .into_iter()
            .map(|PlannedComponent { name, config }| match factory.create(config) {
                Ok(handle) => Ok((name, handle)),
                Err(source) => Err(BuildError {
                    component: name,
                    source,
                }),
            })
            .collect()
    }
}
