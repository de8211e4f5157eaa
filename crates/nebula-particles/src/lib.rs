//! Particle simulation: individual particles with finite lifetimes, a seeded
//! emitter, and a system that ticks and renders a whole population.

pub mod emitter;
pub mod particle;
pub mod system;

pub use emitter::Emitter;
pub use particle::{Particle, ParticleBehavior};
pub use system::{ParticleSystem, RespawnPolicy, SystemStats};
