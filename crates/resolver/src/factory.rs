// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The seam between resolution and runtime construction.

use crate::RuntimeConfig;
use std::convert::Infallible;

/// Builds a live runtime from a resolved configuration.
///
/// Implementations own all device and file access; the resolver never does.
/// Each config is handed over by value and used exactly once.
pub trait RuntimeFactory {
    /// The runtime handle produced.
    type Handle;
    /// Construction failure (missing files, out of device memory, ...).
    type Error: std::error::Error + Send + Sync + 'static;

    fn create(&self, config: RuntimeConfig) -> Result<Self::Handle, Self::Error>;
}

/// A factory that allocates nothing and returns the config back, described.
///
/// Used to preview what a real factory would be asked to build.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun;

/// Handle returned by [`DryRun`].
#[derive(Debug, PartialEq, serde::Serialize)]
pub struct DryRunHandle {
    pub summary: String,
    pub config: RuntimeConfig,
}

impl RuntimeFactory for DryRun {
    type Handle = DryRunHandle;
    type Error = Infallible;

    fn create(&self, config: RuntimeConfig) -> Result<Self::Handle, Self::Error> {
        tracing::debug!("dry run: {}", config.summary());
        Ok(DryRunHandle {
            summary: config.summary(),
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_locator::ModelFormat;
    use tensor_spec::Precision;

    #[test]
    fn test_dry_run_returns_config() {
        let cfg = crate::resolve("ort", "m", "unet", ModelFormat::Native, 0, Precision::Fp32, None)
            .unwrap();
        let summary = cfg.summary();
        let handle = DryRun.create(cfg).unwrap();
        assert_eq!(handle.summary, summary);
        assert_eq!(handle.config.device_id(), 0);
    }
}
