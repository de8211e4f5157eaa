//! Headless demo binary for the Nebula procedural core.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p nebula-demo` for the default noise terrain, or
//! `cargo run -p nebula-demo -- --generator maze --rows 16 --columns 16`.

mod pipeline;

use std::process::ExitCode;

use clap::Parser;
use nebula_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone() {
        Some(dir) => dir,
        None => match default_config_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    nebula_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match pipeline::run(&config) {
        Ok(report) => {
            info!(
                "done: {}x{} surface ({} triangles), heights {:?}, {} ticks, {} particles alive",
                report.terrain_rows,
                report.terrain_columns,
                report.frame.triangles,
                report.height_range,
                report.ticks_run,
                report.alive_particles
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("demo run failed: {e}");
            ExitCode::FAILURE
        }
    }
}
