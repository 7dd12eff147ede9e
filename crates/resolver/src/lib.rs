// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # resolver
//!
//! Turns a user's backend choice into a validated [`RuntimeConfig`] before
//! any runtime is constructed.
//!
//! The resolver takes:
//! - A backend name (any alias from `backend-registry`).
//! - A model location (`model-locator`).
//! - A device id, a precision and optional shape ranges (`tensor-spec`).
//! - Optional backend tuning options ([`BackendOptions`]).
//!
//! and either returns a [`RuntimeConfig`] whose every field has been checked
//! against the compatibility table, or a [`ResolveError`] naming the
//! offending field. It performs no I/O beyond the explicit TOML loaders and
//! holds no state; it is safe to call from any thread.
//!
//! ```text
//! ResolveRequest ──resolve()──▶ RuntimeConfig ──RuntimeFactory::create()──▶ runtime
//! PipelineProfile ─resolve()──▶ PipelinePlan ───build()──────────────────▶ runtimes
//! ```

mod config;
mod error;
mod factory;
mod options;
mod pipeline;
mod resolve;
mod runtime_config;

pub use config::ResolveRequest;
pub use error::ResolveError;
pub use factory::{DryRun, DryRunHandle, RuntimeFactory};
pub use options::{
    BackendOptions, BackendSettings, ByteSize, ParseByteSizeError, DEFAULT_L3_WORKSPACE,
    DEFAULT_WORKSPACE, GRAPH_OPT_LEVELS,
};
pub use pipeline::{
    BuildError, ComponentProfile, DiffusionPrefixes, PipelineError, PipelinePlan,
    PipelineProfile, PlannedComponent,
};
pub use resolve::resolve;
pub use runtime_config::RuntimeConfig;
