//! Turbulence-noise terrain generator.

use nebula_mesh::SurfaceGrid;

use crate::error::TerrainError;
use crate::generator::{GenerationParams, GeometryGenerator};
use crate::heightfield::{HeightfieldBuilder, HeightfieldParams};
use crate::noise_engine::NoiseEngine;

/// Grids at or above this many points are built on worker threads.
const PARALLEL_THRESHOLD: usize = 128 * 128;

/// Noise-space Y distance between the slices picked by consecutive seeds.
const SEED_SLICE_STEP: f64 = 1.618_034;

/// Builds `rows x columns` heightfields from a [`NoiseEngine`].
///
/// `params.seed` selects a slice through the 3D noise field, so different
/// seeds give different terrain from the same gradient table. Elevations lie
/// in `[0, height_scale * max_turbulence]`.
pub struct NoiseTerrainGenerator {
    noise: NoiseEngine,
    frequency: f64,
    threads: usize,
    grid: SurfaceGrid,
}

impl NoiseTerrainGenerator {
    /// Create a generator sampling `noise` every `frequency` noise units per grid step.
    pub fn new(noise: NoiseEngine, frequency: f64) -> Self {
        Self {
            noise,
            frequency,
            threads: num_cpus::get().max(1),
            grid: SurfaceGrid::empty(),
        }
    }

    /// Override the worker count used for large grids.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// The noise engine, for reading its tunables.
    pub fn noise(&self) -> &NoiseEngine {
        &self.noise
    }

    /// Mutable access to the noise tunables; changes apply to the next generation.
    pub fn noise_mut(&mut self) -> &mut NoiseEngine {
        &mut self.noise
    }

    fn heightfield_params(&self, params: &GenerationParams) -> HeightfieldParams {
        HeightfieldParams {
            spacing: params.spacing,
            height_scale: params.height_scale,
            frequency: self.frequency,
            slice: 0.5 + (params.seed % 4096) as f64 * SEED_SLICE_STEP,
        }
    }
}

impl GeometryGenerator for NoiseTerrainGenerator {
    fn generate_geometry(&mut self, params: &GenerationParams) -> Result<(), TerrainError> {
        let builder = HeightfieldBuilder::new(&self.noise, self.heightfield_params(params));
        let large = params.rows.saturating_mul(params.columns) >= PARALLEL_THRESHOLD;
        let grid = if large && self.threads > 1 {
            builder.build_parallel(params.rows, params.columns, self.threads)
        } else {
            builder.build(params.rows, params.columns)
        };
        log::debug!(
            "generated {}x{} noise terrain (octaves={}, lacunarity={})",
            grid.length(),
            grid.width(),
            self.noise.config().octaves,
            self.noise.config().lacunarity
        );
        self.grid = grid;
        Ok(())
    }

    fn surface(&self) -> &SurfaceGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_config::NoiseConfig;
    use nebula_render::FrameCapture;

    fn generator(octaves: i32) -> NoiseTerrainGenerator {
        NoiseTerrainGenerator::new(
            NoiseEngine::new(NoiseConfig {
                seed: 11,
                octaves,
                lacunarity: 2.0,
            }),
            0.0625,
        )
    }

    fn params(rows: usize, columns: usize) -> GenerationParams {
        GenerationParams {
            rows,
            columns,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_before_generation() {
        let g = generator(3);
        assert!(g.surface().is_empty());
        assert_eq!(g.geometry_length(), 0);
        assert_eq!(g.geometry_width(), 0);
    }

    #[test]
    fn test_dimensions_match_point_count() {
        let mut g = generator(3);
        g.generate_geometry(&params(6, 9)).unwrap();
        assert_eq!(g.geometry_length(), 6);
        assert_eq!(g.geometry_width(), 9);
        assert_eq!(
            g.geometry_length() * g.geometry_width(),
            g.surface().point_count()
        );
    }

    #[test]
    fn test_regeneration_replaces_grid() {
        let mut g = generator(3);
        g.generate_geometry(&params(10, 10)).unwrap();
        g.generate_geometry(&params(3, 4)).unwrap();
        assert_eq!(g.geometry_length(), 3);
        assert_eq!(g.geometry_width(), 4);
        assert_eq!(g.surface().point_count(), 12);
    }

    #[test]
    fn test_octave_change_applies_to_next_generation() {
        let mut g = generator(1);
        g.generate_geometry(&params(8, 8)).unwrap();
        let before = g.surface().clone();

        g.noise_mut().set_octaves(4);
        g.generate_geometry(&params(8, 8)).unwrap();
        assert_ne!(g.surface(), &before);
    }

    #[test]
    fn test_seed_selects_slice() {
        let mut g = generator(3);
        g.generate_geometry(&params(8, 8)).unwrap();
        let seed0 = g.surface().clone();
        g.generate_geometry(&GenerationParams {
            seed: 1,
            ..params(8, 8)
        })
        .unwrap();
        assert_ne!(g.surface(), &seed0);
    }

    #[test]
    fn test_parallel_path_matches_serial() {
        let mut serial = generator(2).with_threads(1);
        let mut parallel = generator(2).with_threads(4);
        serial.generate_geometry(&params(130, 130)).unwrap();
        parallel.generate_geometry(&params(130, 130)).unwrap();
        assert_eq!(serial.surface(), parallel.surface());
    }

    #[test]
    fn test_degenerate_dimension_gives_empty_grid() {
        let mut g = generator(3);
        g.generate_geometry(&params(usize::MAX, 0)).unwrap();
        assert!(g.surface().is_empty());
        g.generate_geometry(&params(0, usize::MAX)).unwrap();
        assert_eq!(g.geometry_length() * g.geometry_width(), 0);
    }

    #[test]
    fn test_render_hands_grid_to_surface() {
        let mut g = generator(3);
        g.generate_geometry(&params(4, 4)).unwrap();
        let mut capture = FrameCapture::new();
        g.render(&mut capture);
        let stats = capture.stats();
        assert_eq!(stats.meshes, 1);
        assert_eq!(stats.triangles, 18);
    }
}
