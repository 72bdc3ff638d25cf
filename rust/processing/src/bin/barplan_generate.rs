// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: generate the three layout options for a bar building
//!
//! Usage:
//!   barplan-generate [options]
//!
//! Without a footprint the 60 m x 20 m minimal bar is used. Environment
//! variables `BARPLAN_SPRINKLERED`, `BARPLAN_ALIGNMENT` and
//! `BARPLAN_CORE_SIDE` preset the options of the same name.

use barplan_layout::{BuildingFootprint, LayoutOption};
use barplan_processing::{generate_options, CliConfig, LayoutRequest, SavedLayout};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

struct Args {
    request: LayoutRequest,
    output: Option<String>,
}

fn print_usage() {
    println!("Usage: barplan-generate [options]");
    println!();
    println!("Options:");
    println!("  --width <m>           Building length along the corridor (default 60)");
    println!("  --depth <m>           Building depth across the corridor (default 20)");
    println!("  --corridor <m>        Corridor width (default 1.83)");
    println!("  --core-side <side>    north, south or both");
    println!("  --alignment <0-1>     Wall alignment tolerance");
    println!("  --unsprinklered       Use unsprinklered egress limits");
    println!("  --request <file>      Read a JSON layout request instead");
    println!("  --output <file>       Write the saved layout blob");
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", flag))
}

fn number(args: &[String], i: usize, flag: &str) -> Result<f64, String> {
    let raw = value(args, i, flag)?;
    raw.parse()
        .map_err(|_| format!("invalid value '{}' for {}", raw, flag))
}

fn parse_args(args: &[String], config: &CliConfig) -> Result<Option<Args>, String> {
    let mut request = LayoutRequest::new(BuildingFootprint::new(60.0, 20.0));
    request.sprinklered = config.sprinklered;
    request.params.alignment_tolerance = config.alignment_tolerance;
    request.params.core_side = config.core_side;

    let mut from_file: Option<String> = None;
    let mut output = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(None),
            "--width" => {
                i += 1;
                request.footprint.width = number(args, i, "--width")?;
            }
            "--depth" => {
                i += 1;
                request.footprint.depth = number(args, i, "--depth")?;
            }
            "--corridor" => {
                i += 1;
                request.params.corridor_width = number(args, i, "--corridor")?;
            }
            "--core-side" => {
                i += 1;
                request.params.core_side = value(args, i, "--core-side")?.parse()?;
            }
            "--alignment" => {
                i += 1;
                request.params.alignment_tolerance = number(args, i, "--alignment")?;
            }
            "--unsprinklered" => {
                request.sprinklered = false;
            }
            "--request" => {
                i += 1;
                from_file = Some(value(args, i, "--request")?.to_string());
            }
            "--output" => {
                i += 1;
                output = Some(value(args, i, "--output")?.to_string());
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    if let Some(path) = from_file {
        let json = std::fs::read_to_string(&path)
            .map_err(|e| format!("Cannot read request '{}': {}", path, e))?;
        request = serde_json::from_str(&json)
            .map_err(|e| format!("Cannot parse request '{}': {}", path, e))?;
    }

    Ok(Some(Args { request, output }))
}

fn print_summary(options: &[LayoutOption]) {
    println!(
        "{:<22} {:>7} {:>6} {:>6} {:>8} {:>10} {:>9} {:>6}",
        "Option", "Score", "Units", "Cores", "Eff.", "Dead end", "Travel", "Egress"
    );
    for option in options {
        let plan = &option.plan;
        println!(
            "{:<22} {:>7.3} {:>6} {:>6} {:>7.1}% {:>9.2}m {:>8.2}m {:>6}",
            option.label,
            option.score,
            plan.stats.total_units,
            plan.egress.core_count,
            plan.stats.efficiency * 100.0,
            plan.egress.max_dead_end,
            plan.egress.max_travel_distance,
            if plan.is_compliant() { "Pass" } else { "Fail" },
        );
    }

    if let Some(first) = options.first() {
        println!();
        for (type_id, count) in &first.plan.stats.unit_counts {
            let target = first.plan.stats.target_counts.get(type_id).copied().unwrap_or(0);
            println!("  {:<10} {:>3} placed / {:>3} target", type_id, count, target);
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let config = CliConfig::from_env();

    let args = match parse_args(&args, &config) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        width = args.request.footprint.width,
        depth = args.request.footprint.depth,
        sprinklered = args.request.sprinklered,
        "Generating layout options"
    );

    let options = match generate_options(&args.request) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print_summary(&options);

    if let Some(path) = args.output {
        if let Err(e) = SavedLayout::new(args.request, options).save(&path) {
            eprintln!("Error: cannot write '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
