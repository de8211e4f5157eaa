//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, GeneratorKind};

/// Nebula procedural demo command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "nebula", about = "Nebula procedural terrain and particle demo")]
pub struct CliArgs {
    /// Noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Turbulence octave count.
    #[arg(long, allow_negative_numbers = true)]
    pub octaves: Option<i32>,

    /// Frequency multiplier between octaves.
    #[arg(long)]
    pub lacunarity: Option<f64>,

    /// Heightfield source.
    #[arg(long, value_enum)]
    pub generator: Option<GeneratorKind>,

    /// Grid rows.
    #[arg(long)]
    pub rows: Option<usize>,

    /// Grid columns.
    #[arg(long)]
    pub columns: Option<usize>,

    /// Heightmap image for `--generator heightmap`.
    #[arg(long)]
    pub heightmap: Option<PathBuf>,

    /// Number of simulation ticks to run.
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.noise.seed = seed;
        }
        if let Some(octaves) = args.octaves {
            self.noise.octaves = octaves;
        }
        if let Some(lacunarity) = args.lacunarity {
            self.noise.lacunarity = lacunarity;
        }
        if let Some(generator) = args.generator {
            self.terrain.generator = generator;
        }
        if let Some(rows) = args.rows {
            self.terrain.rows = rows;
        }
        if let Some(columns) = args.columns {
            self.terrain.columns = columns;
        }
        if let Some(ref path) = args.heightmap {
            self.terrain.heightmap_path = Some(path.clone());
        }
        if let Some(ticks) = args.ticks {
            self.simulation.ticks = ticks;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            octaves: Some(5),
            generator: Some(GeneratorKind::Maze),
            rows: Some(8),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.noise.octaves, 5);
        assert_eq!(config.terrain.generator, GeneratorKind::Maze);
        assert_eq!(config.terrain.rows, 8);
        // Non-overridden fields retain defaults
        assert_eq!(config.terrain.columns, 64);
        assert_eq!(config.noise.lacunarity, 2.0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_from_argv() {
        let args = CliArgs::parse_from([
            "nebula",
            "--octaves",
            "-1",
            "--generator",
            "heightmap",
            "--heightmap",
            "island.png",
        ]);
        assert_eq!(args.octaves, Some(-1));
        assert_eq!(args.generator, Some(GeneratorKind::Heightmap));
        assert_eq!(args.heightmap, Some(PathBuf::from("island.png")));
    }
}
