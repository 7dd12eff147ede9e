// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for runtime configuration resolution.

use backend_registry::{BackendChoice, DeviceSelector, RegistryError};
use model_locator::{LocatorError, ModelFormat};
use tensor_spec::{Precision, ShapeError};

/// Errors raised while resolving a [`crate::RuntimeConfig`].
///
/// Every variant is raised before any runtime resource is allocated, and each
/// names the offending field and value (see [`ResolveError::field`] and
/// [`ResolveError::value`]) so a caller can report it and retry with
/// corrected input.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The backend name is not in the compatibility table.
    #[error("unsupported backend '{name}'; expected one of: {expected}")]
    UnsupportedBackend { name: String, expected: String },

    /// The precision is not accepted by the backend on the selected device.
    #[error("precision {precision} is not supported by {backend} on {device} (supported: {supported})")]
    IncompatiblePrecision {
        backend: BackendChoice,
        device: DeviceSelector,
        precision: Precision,
        supported: String,
    },

    /// The device id does not fit the backend.
    #[error("device id {device_id} does not fit backend {backend}: {reason}")]
    DeviceMismatch {
        backend: BackendChoice,
        device_id: i32,
        reason: String,
    },

    /// A shape hint entry is malformed, or a hint was given to a backend that
    /// does not specialise for shapes.
    #[error("invalid shape hint for input '{input}': {reason}")]
    InvalidShapeHint { input: String, reason: String },

    /// The backend cannot load models in this format.
    #[error("model format {format} is not supported by {backend} (supported: {supported})")]
    IncompatibleFormat {
        backend: BackendChoice,
        format: ModelFormat,
        supported: String,
    },

    /// The model prefix or file stem cannot be turned into a path.
    #[error("invalid model location: {0}")]
    InvalidLocator(#[from] LocatorError),

    /// A backend tuning option is out of range.
    #[error("invalid option {field} = '{value}': {reason}")]
    InvalidOption {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A configuration file could not be read or parsed.
    #[error("configuration error in '{origin}': {detail}")]
    Config { origin: String, detail: String },
}

impl ResolveError {
    /// Name of the input field that caused the failure.
    pub fn field(&self) -> &'static str {
        match self {
            ResolveError::UnsupportedBackend { .. } => "backend",
            ResolveError::IncompatiblePrecision { .. } => "precision",
            ResolveError::DeviceMismatch { .. } => "device_id",
            ResolveError::InvalidShapeHint { .. } => "shape_hint",
            ResolveError::IncompatibleFormat { .. } => "model_format",
            ResolveError::InvalidLocator(e) => e.field(),
            ResolveError::InvalidOption { field, .. } => *field,
            ResolveError::Config { .. } => "config",
        }
    }

    /// The offending value, rendered as text.
    pub fn value(&self) -> String {
        match self {
            ResolveError::UnsupportedBackend { name, .. } => name.clone(),
            ResolveError::IncompatiblePrecision { precision, .. } => precision.to_string(),
            ResolveError::DeviceMismatch { device_id, .. } => device_id.to_string(),
            ResolveError::InvalidShapeHint { input, .. } => input.clone(),
            ResolveError::IncompatibleFormat { format, .. } => format.to_string(),
            ResolveError::InvalidLocator(e) => e.value().to_string(),
            ResolveError::InvalidOption { value, .. } => value.clone(),
            ResolveError::Config { origin, .. } => origin.clone(),
        }
    }
}

impl From<RegistryError> for ResolveError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownBackend { name, expected } => {
                ResolveError::UnsupportedBackend { name, expected }
            }
            RegistryError::CpuNotSupported { backend, device_id } => {
                let required = backend
                    .capabilities()
                    .accelerated_device
                    .map_or("accelerated", |k| k.as_str());
                ResolveError::DeviceMismatch {
                    backend,
                    device_id,
                    reason: format!("backend requires a {required} device, -1 selects the CPU"),
                }
            }
            RegistryError::AcceleratorNotSupported { backend, device_id } => {
                ResolveError::DeviceMismatch {
                    backend,
                    device_id,
                    reason: "backend runs on the CPU only; use device id -1".into(),
                }
            }
            RegistryError::InvalidDeviceId { backend, device_id } => ResolveError::DeviceMismatch {
                backend,
                device_id,
                reason: "expected -1 (CPU) or a device index >= 0".into(),
            },
        }
    }
}

impl From<ShapeError> for ResolveError {
    fn from(err: ShapeError) -> Self {
        ResolveError::InvalidShapeHint {
            input: err.input().unwrap_or_default().to_string(),
            reason: err.to_string(),
        }
    }
}
