// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for model location.

/// Errors raised while computing model file paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    /// The model prefix would escape the model directory.
    #[error("model prefix '{prefix}' must be a relative path inside the model directory")]
    PrefixEscapesDir { prefix: String },

    /// The file stem is empty or contains a path separator.
    #[error("file stem '{stem}' must be a plain, non-empty file name")]
    InvalidFileStem { stem: String },
}

impl LocatorError {
    /// Name of the locator field at fault.
    pub fn field(&self) -> &'static str {
        match self {
            LocatorError::PrefixEscapesDir { .. } => "model_prefix",
            LocatorError::InvalidFileStem { .. } => "file_stem",
        }
    }

    /// The offending value.
    pub fn value(&self) -> &str {
        match self {
            LocatorError::PrefixEscapesDir { prefix } => prefix,
            LocatorError::InvalidFileStem { stem } => stem,
        }
    }
}
