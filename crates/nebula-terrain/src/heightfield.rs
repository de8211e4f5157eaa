//! Heightfield construction from turbulence noise.
//!
//! Every cell is independent, so rows can be split across worker threads;
//! serial and parallel builds produce bit-identical grids.

use glam::DVec3;
use nebula_mesh::SurfaceGrid;

use crate::noise_engine::NoiseEngine;

/// Mapping from grid cells to noise space and world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightfieldParams {
    /// World distance between neighbouring grid points. Default: 1.0.
    pub spacing: f64,
    /// Multiplier applied to the turbulence value. Default: 1.0.
    pub height_scale: f64,
    /// Noise-space distance between neighbouring grid points. Default: 0.0625.
    pub frequency: f64,
    /// Noise-space Y coordinate of the sampled slice. Default: 0.5.
    pub slice: f64,
}

impl Default for HeightfieldParams {
    fn default() -> Self {
        Self {
            spacing: 1.0,
            height_scale: 1.0,
            frequency: 0.0625,
            slice: 0.5,
        }
    }
}

/// Samples a [`NoiseEngine`] over a rectangular grid.
pub struct HeightfieldBuilder<'a> {
    noise: &'a NoiseEngine,
    params: HeightfieldParams,
}

impl<'a> HeightfieldBuilder<'a> {
    /// Create a builder reading from `noise`.
    pub fn new(noise: &'a NoiseEngine, params: HeightfieldParams) -> Self {
        Self { noise, params }
    }

    /// Elevation of cell `(row, column)`.
    ///
    /// Cells are sampled at their centres (`+0.5`) so that the origin cell does
    /// not land on the noise lattice, where the field is always zero.
    pub fn elevation(&self, row: usize, column: usize) -> f64 {
        let nx = (column as f64 + 0.5) * self.params.frequency;
        let nz = (row as f64 + 0.5) * self.params.frequency;
        self.params.height_scale * self.noise.turbulence(nx, self.params.slice, nz)
    }

    fn point(&self, row: usize, column: usize, height: f64) -> DVec3 {
        DVec3::new(
            column as f64 * self.params.spacing,
            height,
            row as f64 * self.params.spacing,
        )
    }

    /// Build a `rows x columns` heightfield on the calling thread.
    pub fn build(&self, rows: usize, columns: usize) -> SurfaceGrid {
        SurfaceGrid::from_fn(rows, columns, |r, c| self.point(r, c, self.elevation(r, c)))
    }

    /// Build a heightfield with rows split into contiguous bands across `threads` workers.
    pub fn build_parallel(&self, rows: usize, columns: usize, threads: usize) -> SurfaceGrid {
        if rows == 0 || columns == 0 {
            return SurfaceGrid::empty();
        }
        let threads = threads.clamp(1, rows);
        let rows_per_band = rows.div_ceil(threads);
        let mut heights = vec![0.0; rows * columns];

        std::thread::scope(|scope| {
            for (band, chunk) in heights.chunks_mut(rows_per_band * columns).enumerate() {
                let first_row = band * rows_per_band;
                scope.spawn(move || {
                    for (i, h) in chunk.iter_mut().enumerate() {
                        *h = self.elevation(first_row + i / columns, i % columns);
                    }
                });
            }
        });

        log::trace!("heightfield {rows}x{columns} built on {threads} threads");
        SurfaceGrid::from_fn(rows, columns, |r, c| {
            self.point(r, c, heights[r * columns + c])
        })
    }
}
