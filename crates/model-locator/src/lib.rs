// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-locator
//!
//! Computes where a model's files are expected to live on disk.
//!
//! - [`ModelFormat`]: native (graph + params) or interchange (single file).
//! - [`ModelLocator`]: model directory, prefix, format and file stem.
//! - [`ModelFiles`]: the concrete graph / params / cache paths.
//!
//! # Example
//! ```
//! use model_locator::{ModelFormat, ModelLocator};
//!
//! let files = ModelLocator::new("m", "unet", ModelFormat::Native)
//!     .files(true)
//!     .unwrap();
//! assert!(files.graph.ends_with("inference.pdmodel"));
//! assert!(files.cache.is_some());
//! ```
//!
//! Existence of the files is never checked; a missing file surfaces only when
//! the runtime tries to load it.

mod error;
mod format;
mod locator;

pub use error::LocatorError;
pub use format::ModelFormat;
pub use locator::{ModelFiles, ModelLocator, DEFAULT_FILE_STEM};
