//! Configuration for the Nebula procedural pipelines.
//!
//! Holds the tunables read by the noise engine, terrain generators, smoothers
//! and particle systems. Settings persist to disk as RON, accept CLI
//! overrides via clap, and support hot-reload detection.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BoundaryMode, Config, DebugConfig, GeneratorKind, NoiseConfig, ParticleBehaviorKind,
    ParticleConfig, SimulationConfig, SmootherKind, SmoothingConfig, TerrainConfig,
    default_config_dir,
};
pub use error::ConfigError;
