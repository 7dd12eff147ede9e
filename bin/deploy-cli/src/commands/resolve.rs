// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `deploy-rt resolve` command: resolve and print one model's configuration.
//!
//! The request comes from `--config` when given, otherwise from the command
//! line. Resolution is followed by a dry-run construction, so the output is
//! exactly what a real runtime factory would receive.

use crate::TargetArgs;
use anyhow::Context;
use resolver::{BackendOptions, ByteSize, DryRun, ResolveError, ResolveRequest, RuntimeFactory};
use std::path::PathBuf;
use tensor_spec::ShapeHint;

pub struct ResolveArgs {
    pub config: Option<PathBuf>,
    pub target: TargetArgs,
    pub model_prefix: String,
    pub file_stem: String,
    pub shapes: Vec<String>,
    pub workspace: Option<ByteSize>,
    pub cpu_threads: Option<usize>,
}

pub fn execute(args: ResolveArgs) -> anyhow::Result<()> {
    let json = args.target.json;
    let request = match &args.config {
        Some(path) => ResolveRequest::from_file(path)?,
        None => request_from_args(args)?,
    };
    tracing::debug!("request: {request:?}");

    let config = request.resolve()?;
    let handle = match DryRun.create(config) {
        Ok(handle) => handle,
        Err(never) => match never {},
    };

    if json {
        let text = serde_json::to_string_pretty(&handle).context("cannot render JSON")?;
        println!("{text}");
        return Ok(());
    }

    super::banner("Runtime Configuration");
    println!("  {}", handle.summary);
    println!();
    for line in handle.config.to_string().lines() {
        println!("   {line}");
    }
    println!();
    Ok(())
}

fn request_from_args(args: ResolveArgs) -> anyhow::Result<ResolveRequest> {
    let target = args.target;
    let backend = target
        .backend
        .context("--backend is required unless --config is given")?;
    let model_dir = target
        .model_dir
        .context("--model-dir is required unless --config is given")?;

    let mut hint = ShapeHint::new();
    for entry in &args.shapes {
        hint.parse_entry(entry).map_err(ResolveError::from)?;
    }

    let mut options = BackendOptions {
        cpu_threads: args.cpu_threads,
        ..Default::default()
    };
    if let Some(workspace) = args.workspace {
        options.workspace = workspace;
    }

    let mut request = ResolveRequest::new(backend, model_dir, args.model_prefix, target.format)
        .with_device_id(target.device_id)
        .with_precision(target.precision)
        .with_file_stem(args.file_stem)
        .with_options(options);
    if !hint.is_empty() {
        request = request.with_shape_hint(hint);
    }
    Ok(request)
}
