// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

pub mod backends;
pub mod pipeline;
pub mod resolve;

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count
/// (warn, info, debug, trace).
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .init();
}

/// Prints the boxed command banner.
pub fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║{:^54}║", format!("deploy-rt · {title}"));
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}
