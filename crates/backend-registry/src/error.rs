// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for backend lookup and device selection.

use crate::BackendChoice;

/// Errors raised when a backend name or device id does not fit the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No backend is registered under this name.
    #[error("unknown backend '{name}'; expected one of: {expected}")]
    UnknownBackend { name: String, expected: String },

    /// The backend needs an accelerated device but the CPU was selected.
    #[error("backend {backend} cannot run on the CPU (device id {device_id})")]
    CpuNotSupported {
        backend: BackendChoice,
        device_id: i32,
    },

    /// The backend runs on the CPU only but a device index was given.
    #[error("backend {backend} runs on the CPU only; device id {device_id} selects an accelerator")]
    AcceleratorNotSupported {
        backend: BackendChoice,
        device_id: i32,
    },

    /// Negative device ids other than `-1` mean nothing.
    #[error("invalid device id {device_id} for backend {backend}; expected -1 (CPU) or an index >= 0")]
    InvalidDeviceId {
        backend: BackendChoice,
        device_id: i32,
    },
}
