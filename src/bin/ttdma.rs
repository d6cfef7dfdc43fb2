// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use ttdma::core::config::SimConfig;
use ttdma::core::dma::Command;
use ttdma::core::error::Result;
use ttdma::core::save_state::SaveState;
use ttdma::core::system::System;
use ttdma::core::tracer::{format_entry, TransferTracer};

/// Tiny DMA engine simulator
#[derive(Parser)]
#[command(name = "ttdma")]
#[command(about = "Cycle-stepped DMA engine simulator", long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Command to run, in order: raw control byte (0x88) or single:S:D / burst:S:D
    #[arg(short = 'c', long = "command", value_parser = parse_command)]
    commands: Vec<Command>,

    /// Write the per-cycle trace here (.log for text, JSON otherwise)
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Write a snapshot of the final state here
    #[arg(long)]
    save_state: Option<PathBuf>,
}

/// Parse one `--command` value
fn parse_command(value: &str) -> std::result::Result<Command, String> {
    let value = value.trim();

    if let Some((mode, rest)) = value.split_once(':') {
        let (src, dst) = rest
            .split_once(':')
            .ok_or_else(|| format!("expected {}:SRC:DST, got {:?}", mode, value))?;
        let src: u8 = src.parse().map_err(|_| format!("bad source index {:?}", src))?;
        let dst: u8 = dst
            .parse()
            .map_err(|_| format!("bad destination index {:?}", dst))?;

        return match mode {
            "single" => Ok(Command::single(src, dst)),
            "burst" => Ok(Command::burst(src, dst)),
            _ => Err(format!("unknown mode {:?} (expected single or burst)", mode)),
        };
    }

    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    let raw = u8::from_str_radix(digits, 16)
        .map_err(|_| format!("expected a hex control byte, got {:?}", value))?;
    Command::from_start_byte(raw).map_err(|e| e.to_string())
}

/// Single 0 -> 4, then burst 0 -> 4
fn reference_scenario() -> Vec<Command> {
    vec![Command::single(0, 4), Command::burst(0, 4)]
}

/// Where the cycle trace goes once the commands have run
#[derive(Debug, PartialEq, Eq)]
enum TraceSink<'a> {
    /// Tracing off
    Off,
    /// `--trace` path
    File(&'a Path),
    /// Tracing enabled by config or environment with no path: dump to the log
    Log,
}

fn trace_sink<'a>(path: Option<&'a Path>, config: &SimConfig) -> TraceSink<'a> {
    match path {
        Some(path) => TraceSink::File(path),
        None if config.trace => TraceSink::Log,
        None => TraceSink::Off,
    }
}

fn write_trace(tracer: &TransferTracer, sink: &TraceSink<'_>) -> Result<()> {
    match sink {
        TraceSink::Off => {}
        TraceSink::File(path) => {
            if path.extension().is_some_and(|ext| ext == "log") {
                tracer.write_log(path)?;
            } else {
                tracer.write_json(path)?;
            }
            info!("Trace written to: {}", path.display());
        }
        TraceSink::Log => {
            info!("Tracing enabled without --trace, dumping {} edges", tracer.entries().len());
            for entry in tracer.entries() {
                info!("{}", format_entry(entry));
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let mut config = match path {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            SimConfig::load(path)?
        }
        None => SimConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}

fn main() -> Result<()> {
    // Load .env file if present (TTDMA_* overrides, RUST_LOG)
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize logger with default level INFO
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("ttdma v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = load_config(args.config.as_deref()).inspect_err(|e| {
        error!("Invalid configuration: {}", e);
    })?;

    let sink = trace_sink(args.trace.as_deref(), &config);

    let mut system = System::with_config(&config)?;
    if sink != TraceSink::Off {
        system.enable_tracing();
    }

    system.reset();
    info!("Reset released after {} cycles", system.cycles());

    let commands = if args.commands.is_empty() {
        info!("No commands given, running reference scenario");
        reference_scenario()
    } else {
        args.commands
    };

    for command in &commands {
        match system.execute(*command) {
            Ok(status) => {
                println!(
                    "{:<22} uo_out=0x{:02X} ({}) cycle={}",
                    command.to_string(),
                    status.to_byte(),
                    status,
                    system.cycles()
                );
            }
            Err(e) => {
                error!("{} failed: {}", command, e);
                return Err(e);
            }
        }
    }

    info!("Store: {:?}", String::from_utf8_lossy(system.store().as_slice()));

    if let Some(tracer) = system.tracer() {
        write_trace(tracer, &sink)?;
    }

    if let Some(path) = &args.save_state {
        SaveState::from_system(&system)
            .with_label("ttdma")
            .save_to_file(path)?;
        info!("Snapshot written to: {}", path.display());
    }

    info!("Total cycles: {}", system.cycles());

    Ok(())
}
