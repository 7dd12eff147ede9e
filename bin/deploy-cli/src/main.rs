// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # deploy-rt
//!
//! Command-line front end for the runtime configuration resolver.
//!
//! ## Usage
//! ```bash
//! # Resolve one model
//! deploy-rt resolve --backend tensorrt --model-dir ./models --model-prefix unet \
//!     --precision fp16 --shape latent=1,4,64,64:2,4,64,64
//!
//! # Resolve from a request file
//! deploy-rt --config unet.toml resolve
//!
//! # Resolve the diffusion pipeline for a backend
//! deploy-rt pipeline --backend paddle-kunlunxin --model-dir ./models
//!
//! # List backends and what they support
//! deploy-rt backends
//! ```
//!
//! Invalid input exits with status 2 after printing
//! `error: invalid <field> '<value>': <message>`.

mod commands;

use clap::{Parser, Subcommand};
use model_locator::ModelFormat;
use resolver::{PipelineError, ResolveError};
use std::path::PathBuf;
use std::process::ExitCode;
use tensor_spec::Precision;

#[derive(Parser)]
#[command(
    name = "deploy-rt",
    about = "Resolve inference backend choices into validated runtime configurations",
    version,
    author
)]
struct Cli {
    /// Path to a TOML request or pipeline profile (overrides CLI arguments).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by `resolve` and `pipeline`.
#[derive(clap::Args)]
struct TargetArgs {
    /// Backend name (e.g. "tensorrt", "onnx_runtime", "paddle-kunlunxin").
    #[arg(short, long)]
    backend: Option<String>,

    /// Directory holding one sub-directory per model.
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Model format: native (paddle) or interchange (onnx).
    #[arg(short, long, default_value = "native", value_parser = parse_format)]
    format: ModelFormat,

    /// Device id: -1 for the CPU, otherwise a GPU / accelerator index.
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    device_id: i32,

    /// Precision: fp32, fp16 or int16.
    #[arg(short, long, default_value = "fp32", value_parser = parse_precision)]
    precision: Precision,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the runtime configuration of a single model.
    Resolve {
        #[command(flatten)]
        target: TargetArgs,

        /// Model sub-directory inside the model directory.
        #[arg(long, default_value = "")]
        model_prefix: String,

        /// Stem of the model files.
        #[arg(long, default_value = model_locator::DEFAULT_FILE_STEM)]
        file_stem: String,

        /// Input shape range, `name=min[:opt]:max` (repeatable).
        #[arg(short, long = "shape")]
        shapes: Vec<String>,

        /// Kernel compilation workspace for tensor-compiled backends (e.g. "1G").
        #[arg(long)]
        workspace: Option<resolver::ByteSize>,

        /// Worker threads for the generic backends.
        #[arg(long)]
        cpu_threads: Option<usize>,
    },

    /// Resolve every model of the text-to-image diffusion pipeline.
    Pipeline {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long, default_value = "text_encoder")]
        text_encoder_prefix: String,

        #[arg(long, default_value = "unet")]
        unet_prefix: String,

        #[arg(long, default_value = "vae_decoder")]
        vae_prefix: String,
    },

    /// List the supported backends and their capabilities.
    Backends,
}

fn parse_format(s: &str) -> Result<ModelFormat, String> {
    ModelFormat::from_str_loose(s)
        .ok_or_else(|| format!("unknown model format '{s}'; expected native or interchange"))
}

fn parse_precision(s: &str) -> Result<Precision, String> {
    Precision::from_str_loose(s)
        .ok_or_else(|| format!("unknown precision '{s}'; expected fp32, fp16 or int16"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Resolve {
            target,
            model_prefix,
            file_stem,
            shapes,
            workspace,
            cpu_threads,
        } => commands::resolve::execute(commands::resolve::ResolveArgs {
            config: cli.config,
            target,
            model_prefix,
            file_stem,
            shapes,
            workspace,
            cpu_threads,
        }),
        Commands::Pipeline {
            target,
            text_encoder_prefix,
            unet_prefix,
            vae_prefix,
        } => commands::pipeline::execute(
            cli.config,
            target,
            resolver::DiffusionPrefixes {
                text_encoder: text_encoder_prefix,
                unet: unet_prefix,
                vae_decoder: vae_prefix,
            },
        ),
        Commands::Backends => commands::backends::execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// Prints `err` and picks the exit status: 2 for rejected input, 1 otherwise.
fn report(err: &anyhow::Error) -> ExitCode {
    if let Some(e) = err.downcast_ref::<ResolveError>() {
        eprintln!("error: invalid {} '{}': {e}", e.field(), e.value());
        return ExitCode::from(2);
    }
    if let Some(e) = err.downcast_ref::<PipelineError>() {
        match e {
            PipelineError::Component { component, source } => eprintln!(
                "error: component '{component}': invalid {} '{}': {source}",
                source.field(),
                source.value()
            ),
            other => eprintln!("error: {other}"),
        }
        return ExitCode::from(2);
    }
    eprintln!("error: {err:#}");
    ExitCode::FAILURE
}
