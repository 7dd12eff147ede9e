// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # backend-registry
//!
//! What each inference backend can do, in one declarative table.
//!
//! - [`BackendChoice`]: the four backend categories, parsed from engine names
//!   such as `"onnx_runtime"`, `"paddle-tensorrt"` or `"paddle-kunlunxin"`.
//! - [`DeviceSelector`]: CPU, GPU or accelerator, built from an integer
//!   device id where `-1` means the CPU.
//! - [`Capabilities`]: one row of the table: device kinds, precisions,
//!   formats, and whether the backend specialises for shape ranges.
//!
//! Questions about compatibility are answered by looking up a row, never by
//! branching on the backend.
//!
//! # Example
//! ```
//! use backend_registry::{BackendChoice, DeviceSelector};
//! use tensor_spec::Precision;
//!
//! let backend = BackendChoice::parse("paddle-tensorrt").unwrap();
//! let caps = backend.capabilities();
//! let device = caps.select_device(0).unwrap();
//! assert_eq!(device, DeviceSelector::Gpu(0));
//! assert!(caps.supports_precision(device, Precision::Fp16));
//! assert!(caps.select_device(-1).is_err());
//! ```

mod backend;
mod capability;
mod device;
mod error;

pub use backend::BackendChoice;
pub use capability::{Capabilities, CAPABILITIES};
pub use device::{DeviceKind, DeviceSelector, CPU_DEVICE_ID};
pub use error::RegistryError;
