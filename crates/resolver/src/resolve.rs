// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The resolver: validates a backend request against the compatibility table
//! and produces a [`RuntimeConfig`].
//!
//! Checks run in a fixed order and the first failure is returned:
//!
//! 1. backend name
//! 2. device id
//! 3. precision on the selected device
//! 4. model format
//! 5. shape hint
//! 6. backend tuning options
//! 7. model prefix and file stem

use crate::{BackendOptions, ResolveError, ResolveRequest, RuntimeConfig};
use backend_registry::{BackendChoice, Capabilities, DeviceSelector};
use model_locator::{ModelFormat, ModelLocator};
use std::path::PathBuf;
use tensor_spec::{Precision, ShapeHint};

/// Resolves a runtime configuration for one model with default tuning options
/// and the default file stem.
///
/// # Examples
/// ```
/// use model_locator::ModelFormat;
/// use resolver::{resolve, ResolveError};
/// use tensor_spec::Precision;
///
/// let cfg = resolve("onnx_runtime", "models", "text_encoder", ModelFormat::Interchange, 0, Precision::Fp32, None)
///     .unwrap();
/// assert_eq!(cfg.files().graph, std::path::PathBuf::from("models/text_encoder/inference.onnx"));
///
/// let err = resolve("tensorrt", "models", "unet", ModelFormat::Native, -1, Precision::Fp16, None)
///     .unwrap_err();
/// assert!(matches!(err, ResolveError::DeviceMismatch { .. }));
/// ```
pub fn resolve(
    backend: &str,
    model_dir: impl Into<PathBuf>,
    model_prefix: &str,
    format: ModelFormat,
    device_id: i32,
    precision: Precision,
    shape_hint: Option<ShapeHint>,
) -> Result<RuntimeConfig, ResolveError> {
    let locator = ModelLocator::new(model_dir, model_prefix, format);
    resolve_parts(
        backend,
        locator,
        device_id,
        precision,
        shape_hint,
        &BackendOptions::default(),
    )
}

impl ResolveRequest {
    /// Resolves this request, including its tuning options and file stem.
    pub fn resolve(&self) -> Result<RuntimeConfig, ResolveError> {
        resolve_parts(
            &self.backend,
            self.locator(),
            self.device_id,
            self.precision,
            self.shape_hint.clone(),
            &self.options,
        )
    }
}

fn resolve_parts(
    backend_name: &str,
    locator: ModelLocator,
    device_id: i32,
    precision: Precision,
    shape_hint: Option<ShapeHint>,
    options: &BackendOptions,
) -> Result<RuntimeConfig, ResolveError> {
    tracing::debug!(
        backend = backend_name,
        device_id,
        %precision,
        model = %locator,
        "resolving runtime configuration"
    );

    let backend = BackendChoice::parse(backend_name)?;
    let caps = backend.capabilities();
    let device = caps.select_device(device_id)?;

    if !caps.supports_precision(device, precision) {
        return Err(ResolveError::IncompatiblePrecision {
            backend,
            device,
            precision,
            supported: supported_precisions(caps, device),
        });
    }

    if !caps.supports_format(locator.format) {
        return Err(ResolveError::IncompatibleFormat {
            backend,
            format: locator.format,
            supported: caps.format_list(),
        });
    }

    let shape_hint = shape_hint.unwrap_or_default();
    if !caps.shape_specialization {
        if let Some((input, _)) = shape_hint.iter().next() {
            return Err(ResolveError::InvalidShapeHint {
                input: input.to_string(),
                reason: format!(
                    "backend {backend} does not specialise for input shapes; \
                     shape hints are only accepted by shape-specialising backends"
                ),
            });
        }
    }
    shape_hint.validate()?;
    if caps.shape_specialization && shape_hint.is_empty() {
        tracing::warn!(
            "{backend} given no shape hint for {locator}; compiling for fully dynamic shapes"
        );
    }

    let settings = options.settings_for(backend)?;
    let files = locator.files(caps.compiled_cache)?;

    let config = RuntimeConfig::new(
        backend, device, device_id, precision, shape_hint, locator, files, settings,
    );
    tracing::info!("resolved {}", config.summary());
    Ok(config)
}

fn supported_precisions(caps: &Capabilities, device: DeviceSelector) -> String {
    caps.precisions
        .iter()
        .filter(|p| caps.supports_precision(device, **p))
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BackendSettings;
    use tensor_spec::ShapeRange;

    fn unet_hint() -> ShapeHint {
        ShapeHint::new().with(
            "latent",
            ShapeRange::new(
                vec![1, 4, 64, 64].into(),
                None,
                Some(vec![2, 4, 64, 64].into()),
            ),
        )
    }

    #[test]
    fn test_valid_request_echoes_inputs() {
        let cfg = resolve(
            "accelerated-generic",
            "models",
            "vae_decoder",
            ModelFormat::Native,
            3,
            Precision::Fp32,
            None,
        )
        .unwrap();
        assert_eq!(cfg.backend(), BackendChoice::AcceleratedGeneric);
        assert_eq!(cfg.device(), DeviceSelector::Gpu(3));
        assert_eq!(cfg.device_id(), 3);
        assert_eq!(cfg.precision(), Precision::Fp32);
        assert!(cfg.shape_hint().is_empty());
        assert_eq!(cfg.locator().model_prefix, "vae_decoder");
        assert!(cfg.files().cache.is_none());
        assert!(!cfg.is_fully_dynamic());
    }

    #[test]
    fn test_cpu_generic_on_cpu() {
        let cfg = resolve("cpu", "m", "", ModelFormat::Interchange, -1, Precision::Fp32, None)
            .unwrap();
        assert_eq!(cfg.device(), DeviceSelector::Cpu);
        assert_eq!(cfg.files().graph, PathBuf::from("m/inference.onnx"));
        assert!(matches!(cfg.settings(), BackendSettings::Generic { .. }));
    }

    #[test]
    fn test_fp16_on_cpu_rejected() {
        let err = resolve(
            "accelerated-generic",
            "m",
            "unet",
            ModelFormat::Native,
            -1,
            Precision::Fp16,
            None,
        )
        .unwrap_err();
        match err {
            ResolveError::IncompatiblePrecision {
                device, supported, ..
            } => {
                assert_eq!(device, DeviceSelector::Cpu);
                assert_eq!(supported, "fp32");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_tensor_compiled_cpu_rejected_before_precision() {
        let err = resolve("trt", "m", "unet", ModelFormat::Native, -1, Precision::Int16, None)
            .unwrap_err();
        assert!(matches!(err, ResolveError::DeviceMismatch { .. }));
    }

    #[test]
    fn test_unknown_backend_checked_first() {
        let err = resolve("rknpu2", "m", "../x", ModelFormat::Native, -7, Precision::Fp16, None)
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedBackend { .. }));
    }

    #[test]
    fn test_vendor_rejects_interchange() {
        let err = resolve(
            "paddle-kunlunxin",
            "m",
            "unet",
            ModelFormat::Interchange,
            0,
            Precision::Fp32,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::IncompatibleFormat { .. }));
        assert_eq!(err.field(), "model_format");
    }

    #[test]
    fn test_hint_rejected_on_non_specialising_backend() {
        let err = resolve(
            "ort",
            "m",
            "unet",
            ModelFormat::Native,
            0,
            Precision::Fp32,
            Some(unet_hint()),
        )
        .unwrap_err();
        match err {
            ResolveError::InvalidShapeHint { input, .. } => assert_eq!(input, "latent"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_hint_accepted_everywhere() {
        let cfg = resolve(
            "ort",
            "m",
            "unet",
            ModelFormat::Native,
            0,
            Precision::Fp32,
            Some(ShapeHint::new()),
        )
        .unwrap();
        assert!(cfg.shape_hint().is_empty());
    }

    #[test]
    fn test_tensor_compiled_without_hint_is_fully_dynamic() {
        let cfg = resolve("tensorrt", "m", "unet", ModelFormat::Native, 0, Precision::Fp16, None)
            .unwrap();
        assert!(cfg.is_fully_dynamic());
        assert!(cfg.summary().contains("fully dynamic"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let hint = ShapeHint::new().with(
            "latent",
            ShapeRange::new(vec![2, 4, 64, 64].into(), None, Some(vec![1, 4, 64, 64].into())),
        );
        let err = resolve("tensorrt", "m", "unet", ModelFormat::Native, 0, Precision::Fp16, Some(hint))
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidShapeHint { .. }));
        assert_eq!(err.value(), "latent");
    }

    #[test]
    fn test_prefix_escape_rejected() {
        let err = resolve("ort", "m", "../other", ModelFormat::Native, 0, Precision::Fp32, None)
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidLocator(_)));
        assert_eq!(err.field(), "model_prefix");
    }

    #[test]
    fn test_request_applies_options_and_stem() {
        let request = ResolveRequest::new("tensorrt", "m", "vae_decoder", ModelFormat::Native)
            .with_file_stem("model")
            .with_shape_hint(unet_hint())
            .with_options(BackendOptions {
                workspace: crate::ByteSize::from_gb(1),
                ..Default::default()
            });
        let cfg = request.resolve().unwrap();
        assert_eq!(cfg.files().graph, PathBuf::from("m/vae_decoder/model.pdmodel"));
        assert_eq!(
            cfg.files().cache.as_deref(),
            Some(std::path::Path::new("m/vae_decoder/model.trt"))
        );
        assert_eq!(
            cfg.settings(),
            &BackendSettings::TensorCompiled {
                workspace: crate::ByteSize::from_gb(1),
                max_batch_size: 1,
            }
        );
    }

    #[test]
    fn test_invalid_option_after_shape_checks() {
        let request = ResolveRequest::new("ort", "m", "unet", ModelFormat::Native)
            .with_options(BackendOptions {
                graph_opt_level: 9,
                ..Default::default()
            });
        let err = request.resolve().unwrap_err();
        assert!(matches!(err, ResolveError::InvalidOption { field: "graph_opt_level", .. }));
    }

    #[test]
    fn test_display_lists_files() {
        let cfg = resolve("tensorrt", "m", "unet", ModelFormat::Native, 0, Precision::Fp16, Some(unet_hint()))
            .unwrap();
        let text = cfg.to_string();
        assert!(text.contains("m/unet/inference.pdiparams"));
        assert!(text.contains("shape:     latent"));
        assert!(text.contains("workspace=2G"));
    }
}
