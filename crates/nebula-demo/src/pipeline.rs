//! Builds the terrain and particle pipelines from a loaded [`Config`] and
//! runs them headless against a [`FrameCapture`].

use glam::Vec3;
use nebula_config::{
    BoundaryMode, Config, GeneratorKind, ParticleBehaviorKind, ParticleConfig, SmootherKind,
    SmoothingConfig, TerrainConfig,
};
use nebula_mesh::{
    BoundaryPolicy, RelaxationParams, RelaxationSmoother, SubdivisionSmoother, SurfaceSmoother,
};
use nebula_particles::{Emitter, ParticleBehavior, ParticleSystem, RespawnPolicy};
use nebula_render::{FrameCapture, FrameStats, RenderSurface};
use nebula_terrain::{
    GenerationParams, GeometryGenerator, HeightmapFileGenerator, MazeGenerator, NoiseEngine,
    NoiseTerrainGenerator, TerrainError,
};
use tracing::{debug, info};

/// Errors that abort a demo run.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// `GeneratorKind::Heightmap` without `terrain.heightmap_path`.
    #[error("heightmap generator selected but no heightmap path configured")]
    MissingHeightmap,
    /// Generation failed.
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}

/// Summary of a completed run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunReport {
    /// Rows of the rendered surface.
    pub terrain_rows: usize,
    /// Columns of the rendered surface.
    pub terrain_columns: usize,
    /// Elevation range of the rendered surface.
    pub height_range: Option<(f64, f64)>,
    /// Simulation ticks actually run.
    pub ticks_run: u32,
    /// Live particles after the last tick.
    pub alive_particles: usize,
    /// Counts from the captured frame.
    pub frame: FrameStats,
}

/// Generator parameters from the terrain section.
pub fn generation_params(terrain: &TerrainConfig) -> GenerationParams {
    GenerationParams {
        rows: terrain.rows,
        columns: terrain.columns,
        spacing: terrain.spacing,
        height_scale: terrain.height_scale,
        seed: terrain.seed,
    }
}

/// Instantiate the configured heightfield source.
pub fn build_generator(config: &Config) -> Result<Box<dyn GeometryGenerator>, DemoError> {
    Ok(match config.terrain.generator {
        GeneratorKind::Noise => Box::new(NoiseTerrainGenerator::new(
            NoiseEngine::new(config.noise.clone()),
            config.terrain.frequency,
        )),
        GeneratorKind::Heightmap => {
            let path = config
                .terrain
                .heightmap_path
                .clone()
                .ok_or(DemoError::MissingHeightmap)?;
            Box::new(HeightmapFileGenerator::from_path(path))
        }
        GeneratorKind::Maze => Box::new(MazeGenerator::new()),
    })
}

/// Instantiate the configured smoother; `None` passes the surface through.
pub fn build_smoother(smoothing: &SmoothingConfig) -> Option<Box<dyn SurfaceSmoother>> {
    match smoothing.smoother {
        SmootherKind::None => None,
        SmootherKind::Relaxation => Some(Box::new(RelaxationSmoother::new(RelaxationParams {
            iterations: smoothing.iterations,
            weight: smoothing.weight,
            boundary: match smoothing.boundary {
                BoundaryMode::Fixed => BoundaryPolicy::Fixed,
                BoundaryMode::Mirrored => BoundaryPolicy::Mirrored,
            },
        }))),
        SmootherKind::Subdivision => Some(Box::new(SubdivisionSmoother::new(
            smoothing.subdivisions,
        ))),
    }
}

/// Emitter from the particle section; `Attract` pulls toward the origin.
pub fn build_emitter(particles: &ParticleConfig) -> Emitter {
    let origin = Vec3::from_array(particles.origin);
    Emitter {
        origin,
        spread: particles.spread,
        min_speed: particles.min_speed,
        max_speed: particles.max_speed,
        min_lifetime: particles.min_lifetime,
        max_lifetime: particles.max_lifetime,
        gravity: Vec3::from_array(particles.gravity),
        size: particles.size,
        color: particles.color,
        behavior: match particles.behavior {
            ParticleBehaviorKind::Decay => ParticleBehavior::Decay,
            ParticleBehaviorKind::Attract => ParticleBehavior::Attract {
                target: origin,
                strength: particles.attract_strength,
            },
        },
    }
}

/// Particle system seeded from the particle section. `respawn` selects
/// [`RespawnPolicy::Recycle`].
pub fn build_particle_system(particles: &ParticleConfig) -> ParticleSystem {
    let policy = if particles.respawn {
        RespawnPolicy::Recycle
    } else {
        RespawnPolicy::Once
    };
    ParticleSystem::new(
        build_emitter(particles),
        particles.count as usize,
        particles.seed,
        policy,
    )
}

/// Generate and smooth terrain, simulate particles, then render one frame.
pub fn run(config: &Config) -> Result<RunReport, DemoError> {
    let mut generator = build_generator(config)?;
    generator.generate_geometry(&generation_params(&config.terrain))?;
    info!(
        "generated {:?} terrain: {}x{}",
        config.terrain.generator,
        generator.geometry_length(),
        generator.geometry_width()
    );

    let mut smoother = build_smoother(&config.smoothing);
    if let Some(smoother) = smoother.as_mut() {
        smoother.generate_surface(generator.surface());
        debug!(
            "smoothed surface: {}x{}",
            smoother.surface().length(),
            smoother.surface().width()
        );
    }
    let surface = match &smoother {
        Some(smoother) => smoother.surface(),
        None => generator.surface(),
    };

    let mut system = build_particle_system(&config.particles);
    let dt = config.simulation.dt();
    let mut ticks_run = 0;
    for _ in 0..config.simulation.ticks {
        // A recycling system refills its slots on the next tick, so only a
        // one-shot system can end the run early.
        if system.policy() == RespawnPolicy::Once && system.is_dead() {
            break;
        }
        system.update(dt);
        ticks_run += 1;
    }
    let stats = system.stats();
    info!(
        "simulated {ticks_run} ticks at dt={dt:.4}: {}/{} particles alive, {} respawned",
        stats.alive,
        system.len(),
        system.respawned()
    );
    if let Some(centroid) = stats.centroid {
        debug!("particle centroid: {centroid}");
    }

    let mut capture = FrameCapture::new();
    capture.draw_grid(surface);
    system.render(&mut capture);
    let frame = capture.stats();
    info!(
        "frame: {} meshes, {} triangles, {} particles",
        frame.meshes, frame.triangles, frame.particles
    );

    Ok(RunReport {
        terrain_rows: surface.length(),
        terrain_columns: surface.width(),
        height_range: surface.height_range(),
        ticks_run,
        alive_particles: stats.alive,
        frame,
    })
}
