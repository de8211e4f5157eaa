//! The geometry-generator contract shared by every heightfield source.
//!
//! Downstream mesh consumers depend only on [`GeometryGenerator`], so noise
//! terrain, heightmap images and mazes are interchangeable.

use nebula_mesh::SurfaceGrid;
use nebula_render::RenderSurface;

use crate::error::TerrainError;

/// Parameters common to all generators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
    /// Requested row count. Each generator documents how it interprets this.
    pub rows: usize,
    /// Requested column count. Each generator documents how it interprets this.
    pub columns: usize,
    /// World distance between neighbouring grid points.
    pub spacing: f64,
    /// Elevation multiplier applied to the source's normalized height.
    pub height_scale: f64,
    /// Seed for generators that use randomness.
    pub seed: u64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            rows: 64,
            columns: 64,
            spacing: 1.0,
            height_scale: 16.0,
            seed: 0,
        }
    }
}

/// Produces a rectangular grid of points and owns it until the next generation.
///
/// Instances are not safe for concurrent mutation; callers serialize
/// `generate_geometry` calls. The reference returned by [`surface`](Self::surface)
/// is a read-only snapshot valid until the next mutating call.
pub trait GeometryGenerator {
    /// Produce a new grid, replacing (and dropping) the previous one.
    ///
    /// On error the previous grid is kept.
    fn generate_geometry(&mut self, params: &GenerationParams) -> Result<(), TerrainError>;

    /// The last generated grid; empty if nothing was generated yet.
    fn surface(&self) -> &SurfaceGrid;

    /// Row count of the last generated grid.
    fn geometry_length(&self) -> usize {
        self.surface().length()
    }

    /// Column count of the last generated grid.
    fn geometry_width(&self) -> usize {
        self.surface().width()
    }

    /// Hand the current grid to the renderer.
    fn render(&self, surface: &mut dyn RenderSurface) {
        surface.draw_grid(self.surface());
    }
}
