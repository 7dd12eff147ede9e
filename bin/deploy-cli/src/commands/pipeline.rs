// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `deploy-rt pipeline` command: resolve every model of a pipeline.
//!
//! Without `--config` this resolves the built-in diffusion pipeline for the
//! chosen backend; with `--config` it resolves the profile in that file.

use crate::TargetArgs;
use anyhow::Context;
use resolver::{DiffusionPrefixes, DryRun, PipelineProfile};
use std::path::PathBuf;

pub fn execute(
    config: Option<PathBuf>,
    target: TargetArgs,
    prefixes: DiffusionPrefixes,
) -> anyhow::Result<()> {
    let profile = match config {
        Some(path) => PipelineProfile::from_file(&path)?,
        None => PipelineProfile::stable_diffusion(
            target
                .backend
                .as_deref()
                .context("--backend is required unless --config is given")?,
            target
                .model_dir
                .context("--model-dir is required unless --config is given")?,
            target.format,
            target.device_id,
            target.precision,
            &prefixes,
        ),
    };

    let plan = profile.resolve()?;
    let name = plan.name().to_string();
    let handles = plan.build(&DryRun)?;

    if target.json {
        let by_name: serde_json::Map<String, serde_json::Value> = handles
            .iter()
            .map(|(n, h)| Ok((n.clone(), serde_json::to_value(h)?)))
            .collect::<Result<_, serde_json::Error>>()
            .context("cannot render JSON")?;
        println!("{}", serde_json::to_string_pretty(&by_name)?);
        return Ok(());
    }

    super::banner(&format!("Pipeline '{name}'"));
    for (component, handle) in &handles {
        println!("  {component}");
        for line in handle.config.to_string().lines() {
            println!("   {line}");
        }
        println!();
    }
    println!("  {} component(s) resolved", handles.len());
    Ok(())
}
