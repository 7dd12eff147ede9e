// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `deploy-rt backends` command: print the compatibility table.

use backend_registry::CAPABILITIES;

pub fn execute() -> anyhow::Result<()> {
    super::banner("Backends");

    println!(
        "  {:<30} {:<12} {:<18} {:<7} {:<20}",
        "Backend", "Device", "Precisions", "Shapes", "Formats",
    );
    println!("  {}", "-".repeat(90));

    for caps in &CAPABILITIES {
        let device = match (caps.accelerated_device, caps.requires_accelerator()) {
            (Some(kind), true) => kind.to_string(),
            (Some(kind), false) => format!("{kind}, cpu"),
            (None, _) => "cpu".to_string(),
        };
        println!(
            "  {:<30} {:<12} {:<18} {:<7} {:<20}",
            caps.backend.as_str(),
            device,
            caps.precision_list(),
            if caps.shape_specialization { "yes" } else { "no" },
            caps.format_list(),
        );
        println!("     {}", caps.description);
        if caps.names.len() > 1 {
            println!("     aliases: {}", caps.names[1..].join(", "));
        }
    }
    println!();
    println!("  The CPU (device id -1) supports fp32 only.");
    Ok(())
}
