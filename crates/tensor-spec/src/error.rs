// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for shape hints.

use crate::Shape;

/// Errors raised while building or validating dynamic shape hints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// Shape text could not be parsed.
    #[error("cannot parse shape '{text}': {detail}")]
    Parse { text: String, detail: String },

    /// A shape hint entry has no input name.
    #[error("shape hint entry has an empty input name")]
    EmptyInputName,

    /// A shape with no dimensions, or with a zero-sized dimension.
    #[error("input '{input}': degenerate {which} shape {shape}")]
    Degenerate {
        input: String,
        which: &'static str,
        shape: Shape,
    },

    /// min/opt/max shapes do not share the same rank.
    #[error("input '{input}': rank mismatch between min {min} and {which} {other}")]
    RankMismatch {
        input: String,
        which: &'static str,
        min: Shape,
        other: Shape,
    },

    /// The range is not ordered `min <= opt <= max` along some axis.
    #[error("input '{input}': {upper_name} shape {upper} is smaller than {lower_name} shape {lower} at axis {axis}")]
    Unordered {
        input: String,
        axis: usize,
        lower_name: &'static str,
        lower: Shape,
        upper_name: &'static str,
        upper: Shape,
    },
}

impl ShapeError {
    /// Name of the tensor input the error refers to, if any.
    pub fn input(&self) -> Option<&str> {
        match self {
            ShapeError::Parse { .. } | ShapeError::EmptyInputName => None,
            ShapeError::Degenerate { input, .. }
            | ShapeError::RankMismatch { input, .. }
            | ShapeError::Unordered { input, .. } => Some(input),
        }
    }
}
