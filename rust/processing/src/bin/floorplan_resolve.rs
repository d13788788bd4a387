// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: resolve a floor-plan AST (JSON) into the canonical model,
//! wall segments, openings and a diagnostics report.
//!
//! Usage:
//!   floorplan-resolve <ast.json> [options]

use anyhow::{bail, Context, Result};
use floorplan_core::ast::Document;
use floorplan_processing::process_document;
use std::env;
use std::fs;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let input_path = &args[1];

    // Parse options
    let mut pretty = false;
    let mut report_only = false;
    let mut output_path: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--pretty" => {
                pretty = true;
            }
            "--report-only" => {
                report_only = true;
            }
            "--output" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    bail!("--output needs a path");
                };
                output_path = Some(path.clone());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let content = fs::read_to_string(input_path)
        .with_context(|| format!("cannot read '{}'", input_path))?;
    let doc: Document = serde_json::from_str(&content)
        .with_context(|| format!("'{}' is not a floor-plan AST", input_path))?;

    let processed = process_document(&doc);

    let json = match (report_only, pretty) {
        (true, true) => serde_json::to_string_pretty(&processed.report)?,
        (true, false) => serde_json::to_string(&processed.report)?,
        (false, true) => serde_json::to_string_pretty(&processed)?,
        (false, false) => serde_json::to_string(&processed)?,
    };

    match &output_path {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("cannot write '{}'", path))?;
            tracing::info!(path = %path, "Output written");
        }
        None => println!("{}", json),
    }

    for entry in processed.report.errors() {
        eprintln!("error: {}", entry.message);
    }
    for entry in processed.report.warnings() {
        eprintln!("warning: {}", entry.message);
    }

    if processed.report.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: floorplan-resolve <ast.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --pretty          Pretty-print the JSON output");
    eprintln!("  --report-only     Print only the diagnostics report");
    eprintln!("  --output <path>   Write JSON to a file instead of stdout");
    eprintln!();
    eprintln!("Set RUST_LOG to control logging (default: info).");
    eprintln!("Exits with status 1 when the report contains errors.");
}
