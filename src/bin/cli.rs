// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Worldmesh CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use worldmesh::cli::Reporter;
use worldmesh::{io, Axis, ExportOptions, Exporter};

#[derive(Parser)]
#[command(name = "worldmesh")]
#[command(about = "Export scenes as .n world mesh files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a JSON scene to a .n map file
    Export {
        /// Input scene file
        input: PathBuf,

        /// Output map file
        #[arg(short, long)]
        output: PathBuf,

        /// Options file (defaults to ./worldmesh.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Do not export the active UV layer
        #[arg(long)]
        no_uv: bool,

        /// Do not export the active color layer
        #[arg(long)]
        no_color: bool,

        /// Export selected objects only
        #[arg(long)]
        selection_only: bool,

        /// Use base meshes instead of modifier-evaluated ones
        #[arg(long)]
        no_modifiers: bool,

        /// Forward axis (X, Y, Z, -X, -Y, -Z)
        #[arg(long, allow_hyphen_values = true)]
        forward: Option<Axis>,

        /// Up axis (X, Y, Z, -X, -Y, -Z)
        #[arg(long, allow_hyphen_values = true)]
        up: Option<Axis>,

        /// Uniform scale applied after axis conversion
        #[arg(long)]
        scale: Option<f64>,

        /// Write directly to the output instead of through a temporary file
        #[arg(long)]
        no_atomic: bool,
    },

    /// Parse a .n map file and print a summary
    Inspect {
        /// Input map file
        input: PathBuf,

        /// Print the parsed document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default options to a TOML file
    Config {
        /// Output file
        #[arg(default_value = worldmesh::config::DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Export {
            input,
            output,
            config,
            no_uv,
            no_color,
            selection_only,
            no_modifiers,
            forward,
            up,
            scale,
            no_atomic,
        } => {
            let mut options = ExportOptions::load(config.as_deref())
                .context("Failed to load export options")?;
            options.include_uv &= !no_uv;
            options.include_color &= !no_color;
            options.selection_only |= selection_only;
            options.apply_modifiers &= !no_modifiers;
            options.atomic_write &= !no_atomic;
            if let Some(axis) = forward {
                options.axis_forward = axis;
            }
            if let Some(axis) = up {
                options.axis_up = axis;
            }
            if let Some(scale) = scale {
                options.global_scale = scale;
            }
            export_command(&input, &output, options, cli.verbose)?;
        }
        Commands::Inspect { input, json } => {
            inspect_command(&input, json)?;
        }
        Commands::Config { output } => {
            ExportOptions::default().save(&output)?;
            Reporter::success(&format!("Wrote default options to {}", output.display()));
        }
        Commands::Version => {
            println!("Worldmesh v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn export_command(
    input: &Path,
    output: &Path,
    options: ExportOptions,
    verbose: bool,
) -> Result<()> {
    if !input.exists() {
        Reporter::report_error(&format!("Input file not found: {}", input.display()));
        std::process::exit(1);
    }

    let exporter = Exporter::new(options).context("Invalid export options")?;
    let scene = io::import_scene_file(input)?;
    let report = exporter
        .export(&scene.objects, output)
        .with_context(|| format!("Failed to export {}", output.display()))?;

    Reporter::report_export(&report, verbose);
    Ok(())
}

fn inspect_command(input: &Path, json: bool) -> Result<()> {
    let document = io::import_map_file(input)
        .with_context(|| format!("Failed to read map file: {}", input.display()))?;
    document.validate()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        Reporter::report_document(&input.display().to_string(), &document);
    }
    Ok(())
}
