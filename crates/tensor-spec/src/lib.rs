// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-spec
//!
//! Descriptions of model inputs and compute precision, as handed to a
//! backend before a model is loaded.
//!
//! This crate provides:
//! - [`Shape`]: a tensor shape (list of dimensions).
//! - [`ShapeRange`]: the min / opt / max shapes a compiled backend
//!   specialises one input for.
//! - [`ShapeHint`]: the per-input table of ranges for one model.
//! - [`Precision`]: requested compute precision (fp32, fp16, int16).
//!
//! Nothing here touches a device or the filesystem; all types are plain
//! values that can be validated and compared.

mod error;
mod hint;
mod precision;
mod range;
mod shape;

pub use error::ShapeError;
pub use hint::ShapeHint;
pub use precision::Precision;
pub use range::ShapeRange;
pub use shape::Shape;
