// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The declarative backend compatibility table.
//!
//! | Backend | CPU fallback | Accelerated device | Precisions | Shape hints | Formats | Cache |
//! |---|---|---|---|---|---|---|
//! | cpu-generic | yes | none | fp32 | no | native, interchange | no |
//! | accelerated-generic | yes | GPU | fp32 | no | native, interchange | no |
//! | accelerated-tensor-compiled | no | GPU | fp32, fp16 | yes | native, interchange | yes |
//! | accelerator-vendor-specific | no | accelerator | fp32, fp16, int16 | no | native | no |
//!
//! A CPU device supports fp32 only, regardless of backend.

use crate::{BackendChoice, DeviceKind, DeviceSelector, RegistryError, CPU_DEVICE_ID};
use model_locator::ModelFormat;
use tensor_spec::Precision;

/// One row of the compatibility table.
#[derive(Debug)]
pub struct Capabilities {
    /// The backend this row describes.
    pub backend: BackendChoice,
    /// Accepted names, canonical name first. Lowercase, `-` separated.
    pub names: &'static [&'static str],
    /// Whether device id `-1` (CPU) is accepted.
    pub cpu_fallback: bool,
    /// Device kind selected by a non-negative device id.
    pub accelerated_device: Option<DeviceKind>,
    /// Precisions the backend accepts on its accelerated device.
    pub precisions: &'static [Precision],
    /// Whether the backend specialises for input shape ranges ahead of time.
    pub shape_specialization: bool,
    /// Model formats the backend can load.
    pub formats: &'static [ModelFormat],
    /// Whether the backend writes a compiled-kernel cache file.
    pub compiled_cache: bool,
    /// One-line description for listings.
    pub description: &'static str,
}

/// The compatibility table, indexed in [`BackendChoice::ALL`] order.
pub static CAPABILITIES: [Capabilities; 4] = [
    Capabilities {
        backend: BackendChoice::CpuGeneric,
        names: &["cpu-generic", "cpu", "openvino"],
        cpu_fallback: true,
        accelerated_device: None,
        precisions: &[Precision::Fp32],
        shape_specialization: false,
        formats: &[ModelFormat::Native, ModelFormat::Interchange],
        compiled_cache: false,
        description: "general-purpose engine on the host CPU",
    },
    Capabilities {
        backend: BackendChoice::AcceleratedGeneric,
        names: &[
            "accelerated-generic",
            "onnx-runtime",
            "onnxruntime",
            "ort",
            "paddle",
        ],
        cpu_fallback: true,
        accelerated_device: Some(DeviceKind::Gpu),
        precisions: &[Precision::Fp32],
        shape_specialization: false,
        formats: &[ModelFormat::Native, ModelFormat::Interchange],
        compiled_cache: false,
        description: "general-purpose engine on a GPU, CPU with device id -1",
    },
    Capabilities {
        backend: BackendChoice::TensorCompiled,
        names: &[
            "accelerated-tensor-compiled",
            "tensor-compiled",
            "tensorrt",
            "trt",
            "paddle-tensorrt",
            "paddle-trt",
        ],
        cpu_fallback: false,
        accelerated_device: Some(DeviceKind::Gpu),
        precisions: &[Precision::Fp32, Precision::Fp16],
        shape_specialization: true,
        formats: &[ModelFormat::Native, ModelFormat::Interchange],
        compiled_cache: true,
        description: "ahead-of-time compiled kernels specialised for input shapes",
    },
    Capabilities {
        backend: BackendChoice::VendorAccelerator,
        names: &[
            "accelerator-vendor-specific",
            "vendor-accelerator",
            "paddle-kunlunxin",
            "kunlunxin",
        ],
        cpu_fallback: false,
        accelerated_device: Some(DeviceKind::Accelerator),
        precisions: &[Precision::Fp32, Precision::Fp16, Precision::Int16],
        shape_specialization: false,
        formats: &[ModelFormat::Native],
        compiled_cache: false,
        description: "vendor accelerator SDK",
    },
];

impl Capabilities {
    /// Returns the table row for `backend`.
    pub fn lookup(backend: BackendChoice) -> &'static Capabilities {
        &CAPABILITIES[backend as usize]
    }

    /// Maps an integer device id onto a device for this backend.
    ///
    /// - `-1` selects the CPU, if the backend has a CPU fallback.
    /// - `>= 0` selects the backend's accelerated device at that index.
    /// - anything below `-1` is rejected.
    pub fn select_device(&self, device_id: i32) -> Result<DeviceSelector, RegistryError> {
        if device_id == CPU_DEVICE_ID {
            return if self.cpu_fallback {
                Ok(DeviceSelector::Cpu)
            } else {
                Err(RegistryError::CpuNotSupported {
                    backend: self.backend,
                    device_id,
                })
            };
        }

        let index = u32::try_from(device_id).map_err(|_| RegistryError::InvalidDeviceId {
            backend: self.backend,
            device_id,
        })?;

        match self.accelerated_device {
            Some(kind) => Ok(DeviceSelector::new(kind, index)),
            None => Err(RegistryError::AcceleratorNotSupported {
                backend: self.backend,
                device_id,
            }),
        }
    }

    /// Whether `precision` is accepted on `device` by this backend.
    pub fn supports_precision(&self, device: DeviceSelector, precision: Precision) -> bool {
        if device.is_cpu() && precision.is_reduced() {
            return false;
        }
        self.precisions.contains(&precision)
    }

    /// Whether this backend loads models stored in `format`.
    pub fn supports_format(&self, format: ModelFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Whether a GPU or accelerator is mandatory.
    pub fn requires_accelerator(&self) -> bool {
        !self.cpu_fallback
    }

    /// Comma-separated precision names, for messages and listings.
    pub fn precision_list(&self) -> String {
        self.precisions
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-separated format names, for messages and listings.
    pub fn format_list(&self) -> String {
        self.formats
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
