//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Noise engine tunables.
    pub noise: NoiseConfig,
    /// Terrain generation settings.
    pub terrain: TerrainConfig,
    /// Surface smoothing settings.
    pub smoothing: SmoothingConfig,
    /// Particle emitter and system settings.
    pub particles: ParticleConfig,
    /// Simulation loop settings.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Noise engine tunables.
///
/// `octaves` and `lacunarity` are read by the turbulence accumulator on every
/// call. They are not validated: `octaves <= 0` yields an empty sum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Seed for the gradient/permutation table.
    pub seed: u32,
    /// Number of turbulence octaves.
    pub octaves: i32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
}

/// Which heightfield source feeds the terrain pipeline.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum GeneratorKind {
    /// Turbulence noise.
    #[default]
    Noise,
    /// Grayscale heightmap image.
    Heightmap,
    /// Recursive-backtracker maze with raised walls.
    Maze,
}

/// Terrain generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Heightfield source.
    pub generator: GeneratorKind,
    /// Grid rows (maze: cell rows; heightmap: 0 keeps the image height).
    pub rows: usize,
    /// Grid columns (maze: cell columns; heightmap: 0 keeps the image width).
    pub columns: usize,
    /// Distance between neighbouring grid points in world units.
    pub spacing: f64,
    /// Elevation multiplier applied to the source's normalized height.
    pub height_scale: f64,
    /// Noise-space distance between neighbouring grid points.
    pub frequency: f64,
    /// Seed for generators that draw random numbers (maze).
    pub seed: u64,
    /// Image path for the heightmap generator.
    pub heightmap_path: Option<PathBuf>,
}

/// Which smoother runs after generation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SmootherKind {
    /// Pass the generated surface through unchanged.
    None,
    /// Iterative neighbour averaging.
    #[default]
    Relaxation,
    /// Bilinear subdivision.
    Subdivision,
}

/// Edge handling for relaxation smoothing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum BoundaryMode {
    /// Edge points keep their elevation.
    #[default]
    Fixed,
    /// Edge points read neighbours reflected across the edge.
    Mirrored,
}

/// Surface smoothing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Smoother to run.
    pub smoother: SmootherKind,
    /// Relaxation passes (<= 0 is a no-op).
    pub iterations: i32,
    /// Points inserted per segment by subdivision (<= 0 is a no-op).
    pub subdivisions: i32,
    /// Relaxation blend weight toward the neighbour mean.
    pub weight: f64,
    /// Relaxation edge handling.
    pub boundary: BoundaryMode,
}

/// Particle behavior applied to every emitted particle.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParticleBehaviorKind {
    /// Fade color and size over the particle's lifetime.
    #[default]
    Decay,
    /// Accelerate toward the emitter origin while fading.
    Attract,
}

/// Particle emitter and system settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of particles owned by the system.
    pub count: u32,
    /// Emitter RNG seed.
    pub seed: u64,
    /// Per-particle behavior.
    pub behavior: ParticleBehaviorKind,
    /// Emission origin in world units.
    pub origin: [f32; 3],
    /// Radius of the emission sphere.
    pub spread: f32,
    /// Minimum initial speed.
    pub min_speed: f32,
    /// Maximum initial speed.
    pub max_speed: f32,
    /// Minimum lifetime in seconds.
    pub min_lifetime: f32,
    /// Maximum lifetime in seconds.
    pub max_lifetime: f32,
    /// Constant acceleration applied to every particle.
    pub gravity: [f32; 3],
    /// Pull strength for [`ParticleBehaviorKind::Attract`].
    pub attract_strength: f32,
    /// Initial billboard size.
    pub size: f32,
    /// Initial RGBA color.
    pub color: [f32; 4],
    /// Replace dead particles in place on the next tick.
    pub respawn: bool,
}

/// Simulation loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation rate in ticks per second.
    pub tick_rate: u32,
    /// Number of ticks to run (headless runs).
    pub ticks: u32,
}

impl SimulationConfig {
    /// Fixed timestep in seconds. A zero tick rate yields a zero step.
    pub fn dt(&self) -> f32 {
        if self.tick_rate == 0 {
            0.0
        } else {
            1.0 / self.tick_rate as f32
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 3,
            lacunarity: 2.0,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorKind::Noise,
            rows: 64,
            columns: 64,
            spacing: 1.0,
            height_scale: 16.0,
            frequency: 0.0625,
            seed: 0,
            heightmap_path: None,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            smoother: SmootherKind::Relaxation,
            iterations: 2,
            subdivisions: 1,
            weight: 0.5,
            boundary: BoundaryMode::Fixed,
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 256,
            seed: 0,
            behavior: ParticleBehaviorKind::Decay,
            origin: [0.0, 8.0, 0.0],
            spread: 0.5,
            min_speed: 1.0,
            max_speed: 4.0,
            min_lifetime: 1.0,
            max_lifetime: 3.0,
            gravity: [0.0, -9.81, 0.0],
            attract_strength: 6.0,
            size: 0.25,
            color: [1.0, 0.8, 0.4, 1.0],
            respawn: true,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            ticks: 300,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Default per-user configuration directory (`<config_dir>/nebula-engine`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("nebula-engine"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("octaves: 3"));
        assert!(ron_str.contains("lacunarity: 2.0"));
        assert!(ron_str.contains("generator: Noise"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.terrain.heightmap_path = Some(PathBuf::from("maps/island.png"));
        config.smoothing.boundary = BoundaryMode::Mirrored;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(noise: (octaves: 5), terrain: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.noise.octaves, 5);
        assert_eq!(config.noise.lacunarity, 2.0);
        assert_eq!(config.particles, ParticleConfig::default());
    }

    #[test]
    fn test_negative_tunables_are_accepted() {
        let ron_str = "(noise: (octaves: -2), smoothing: (iterations: -1))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.noise.octaves, -2);
        assert_eq!(config.smoothing.iterations, -1);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_dt_from_tick_rate() {
        let sim = SimulationConfig {
            tick_rate: 4,
            ticks: 1,
        };
        assert_eq!(sim.dt(), 0.25);
        let stopped = SimulationConfig {
            tick_rate: 0,
            ticks: 1,
        };
        assert_eq!(stopped.dt(), 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.noise.seed = 1234;
        config.terrain.generator = GeneratorKind::Maze;
        config.particles.respawn = false;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.noise.octaves = 6;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().noise.octaves, 6);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_reload_without_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::default().reload(dir.path());
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
